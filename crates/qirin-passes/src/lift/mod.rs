//! Lambda lifting.
//!
//! Rewrites every lambda expression into a reference (partially applied when
//! the body captures locals) to a fresh top-level callable appended to the
//! enclosing namespace. Lifting is post-order: lambdas inside a lambda's
//! body are lifted before the lambda itself, so no generated callable ever
//! contains a lambda.

mod lift_body;

#[cfg(test)]
mod lift_tests;

use indexmap::IndexSet;

use qirin_hir::{
    Callable, CallableKind, ExprKind, Lambda, LocalSymbol, Namespace, NamespaceElement, Program,
    QualifiedName, Range, ResolvedType, Scope, Source, Statement, StatementKind, TypedExpr,
    binding_symbols,
};

use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::scope::{NameGenerator, ScopeTracker};
use crate::transform::{
    Transformer, checked_expr, rewrite_callable, rewrite_expr, rewrite_namespace,
    rewrite_statement,
};
use crate::Result;

/// Lift every lambda in `program` into a generated top-level callable.
///
/// On an invariant violation the original program is returned unchanged,
/// with the failure recorded as an error diagnostic.
pub fn lift_lambdas(program: &Program) -> (Program, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut lifter = LambdaLifter::default();

    match lifter.on_program(program.clone()) {
        Ok(lifted) => (lifted, diagnostics),
        Err(error) => {
            diagnostics
                .report(DiagnosticCode::PassFailure, Range::default())
                .arg(error.to_string())
                .emit();
            (program.clone(), diagnostics)
        }
    }
}

/// The callable currently being traversed. While a lambda delegates to the
/// body-lifting routine, its `kind` is substituted with the lambda's own
/// kind.
#[derive(Debug, Clone)]
pub(crate) struct CurrentCallable {
    pub name: QualifiedName,
    pub kind: CallableKind,
    pub source: Source,
}

#[derive(Default)]
pub(crate) struct LambdaLifter {
    /// Name of the namespace being rewritten.
    namespace: String,
    /// Symbols taken in that namespace, including callables generated so
    /// far; fresh-name probes run against this set.
    namespace_symbols: IndexSet<String>,
    /// Callables generated while inside the namespace, appended to its
    /// elements on exit.
    generated: Vec<Callable>,
    pub(crate) current: Option<CurrentCallable>,
    names: Option<NameGenerator>,
    pub(crate) scope: ScopeTracker,
}

impl Transformer for LambdaLifter {
    fn on_namespace(&mut self, namespace: Namespace) -> Result<Namespace> {
        self.namespace = namespace.name.clone();
        self.namespace_symbols = namespace
            .defined_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut namespace = rewrite_namespace(self, namespace)?;

        // Post-visit: drain this namespace's bucket in generation order.
        namespace.elements.extend(
            self.generated
                .drain(..)
                .map(NamespaceElement::Callable),
        );
        Ok(namespace)
    }

    fn on_callable(&mut self, callable: Callable) -> Result<Callable> {
        if callable.kind == CallableKind::TypeConstructor {
            return Ok(callable);
        }

        self.current = Some(CurrentCallable {
            name: callable.name.clone(),
            kind: callable.kind,
            source: callable.source.clone(),
        });
        self.names = Some(NameGenerator::for_callable(&callable.name));

        // Parameters are visible throughout every provided specialization.
        let params: Vec<_> = callable
            .input
            .params()
            .into_iter()
            .map(|param| LocalSymbol::immutable(&param.name, param.ty.clone()))
            .collect();
        self.scope.enter_scope(&params);
        let callable = rewrite_callable(self, callable);
        self.scope.exit_scope();

        self.current = None;
        self.names = None;
        callable
    }

    fn on_scope(&mut self, scope: Scope) -> Result<Scope> {
        self.scope.enter_scope(&scope.known_symbols);
        let mut statements = Vec::with_capacity(scope.statements.len());
        for statement in scope.statements {
            let statement = self.on_statement(statement)?;
            // Siblings that follow see this statement's bindings; the
            // statement's own subtree saw only what preceded it.
            self.scope.declare(statement.declared_symbols());
            statements.push(statement);
        }
        self.scope.exit_scope();
        Ok(Scope {
            known_symbols: scope.known_symbols,
            statements,
        })
    }

    fn on_statement(&mut self, statement: Statement) -> Result<Statement> {
        // Loop and allocation bindings are visible inside the nested body
        // only, so they get their own frame around it.
        let Statement { kind, range } = statement;
        match kind {
            StatementKind::For {
                pattern,
                iterable,
                body,
            } => {
                let iterable = checked_expr(self, iterable)?;
                let item_ty = lift_body::iteration_item_type(&iterable.ty);
                self.scope
                    .enter_scope(&binding_symbols(&pattern, &item_ty, false));
                let body = self.on_scope(body)?;
                self.scope.exit_scope();
                Ok(Statement {
                    kind: StatementKind::For {
                        pattern,
                        iterable,
                        body,
                    },
                    range,
                })
            }
            StatementKind::QubitAlloc {
                pattern,
                kind,
                body,
            } => {
                self.scope
                    .enter_scope(&binding_symbols(&pattern, &ResolvedType::Qubit, false));
                let body = self.on_scope(body)?;
                self.scope.exit_scope();
                Ok(Statement {
                    kind: StatementKind::QubitAlloc {
                        pattern,
                        kind,
                        body,
                    },
                    range,
                })
            }
            other => rewrite_statement(self, Statement { kind: other, range }),
        }
    }

    fn on_expr(&mut self, expr: TypedExpr) -> Result<TypedExpr> {
        let TypedExpr {
            kind,
            ty,
            type_args,
            info,
            range,
        } = expr;
        let lambda = match kind {
            ExprKind::Lambda(lambda) => lambda,
            other => {
                return rewrite_expr(
                    self,
                    TypedExpr {
                        kind: other,
                        ty,
                        type_args,
                        info,
                        range,
                    },
                );
            }
        };
        let Lambda { kind, param, body } = *lambda;

        // Inner lambdas first. The lambda's parameters are visible inside
        // its body, so they get a frame for the recursion.
        let input_ty = lift_body::lambda_input_type(&ty, &param)?;
        self.scope
            .enter_scope(&binding_symbols(&param, &input_ty, false));
        let body = checked_expr(self, body)?;
        self.scope.exit_scope();

        let lambda = Lambda { kind, param, body };

        // The generated callable's kind comes from the lambda, not from the
        // enclosing callable: substitute the current-callable record while
        // delegating, restore on exit.
        let saved = self.current.clone();
        if let Some(current) = &mut self.current {
            current.kind = lambda.kind;
        }
        let lifted = lift_body::lift_lambda(self, &lambda, &ty, range);
        self.current = saved;

        match lifted? {
            Some((replacement, generated)) => {
                self.namespace_symbols.insert(generated.name.name.clone());
                self.generated.push(generated);
                Ok(replacement)
            }
            // Lift refused: leave the lambda in place.
            None => Ok(TypedExpr {
                kind: ExprKind::Lambda(Box::new(lambda)),
                ty,
                type_args,
                info,
                range,
            }),
        }
    }
}

impl LambdaLifter {
    pub(crate) fn fresh_name(&mut self) -> QualifiedName {
        let Self {
            names,
            namespace_symbols,
            ..
        } = self;
        let names = names
            .as_mut()
            .expect("fresh_name is only called inside a callable");
        let name = names.fresh(|candidate| namespace_symbols.contains(candidate));
        QualifiedName::new(self.namespace.clone(), name)
    }
}
