use qirin_hir::{
    BinaryOp, BindingPattern, Callable, CallableInformation, CallableKind, ExprKind, Identifier,
    ParamPattern, Program, ResolvedType, Statement, StatementKind, TypedExpr, pretty,
};

use crate::diagnostics::DiagnosticCode;
use crate::lift::lift_lambdas;
use crate::test_fixtures::{callable, expr_stmt, no_params, operation, single_namespace};
use crate::visitor::{self, Visitor};

fn int_fn_ty() -> ResolvedType {
    ResolvedType::function(ResolvedType::Int, ResolvedType::Int)
}

fn let_stmt(name: &str, value: TypedExpr) -> Statement {
    Statement::new(StatementKind::Let {
        pattern: BindingPattern::name(name),
        value,
    })
}

fn add(lhs: TypedExpr, rhs: TypedExpr) -> TypedExpr {
    TypedExpr::bin_op(BinaryOp::Add, lhs, rhs, ResolvedType::Int)
}

struct LambdaFinder {
    found: bool,
}

impl Visitor for LambdaFinder {
    fn visit_expr(&mut self, expr: &TypedExpr) {
        if expr.is_lambda() {
            self.found = true;
        }
        visitor::walk_expr(self, expr);
    }
}

fn has_lambda(program: &Program) -> bool {
    let mut finder = LambdaFinder { found: false };
    finder.visit_program(program);
    finder.found
}

fn find_callable<'a>(program: &'a Program, local_name: &str) -> &'a Callable {
    program
        .callables()
        .find(|c| c.name.name == local_name)
        .unwrap_or_else(|| panic!("no callable named {local_name}"))
}

#[test]
fn lifts_a_simple_lambda_into_a_function() {
    // operation Foo() { let f = (x) -> x + 1; f(3); }
    let lambda = TypedExpr::lambda(
        CallableKind::Function,
        BindingPattern::name("x"),
        add(TypedExpr::local("x", ResolvedType::Int), TypedExpr::int_lit(1)),
        int_fn_ty(),
    );
    let foo = operation(
        "Sample",
        "Foo",
        vec![
            let_stmt("f", lambda),
            expr_stmt(TypedExpr::call(
                TypedExpr::local("f", int_fn_ty()),
                TypedExpr::int_lit(3),
                ResolvedType::Int,
            )),
        ],
    );

    let (lifted, diagnostics) = lift_lambdas(&single_namespace(vec![foo]));

    assert!(diagnostics.is_empty());
    assert!(!has_lambda(&lifted));
    insta::assert_snapshot!(pretty::program(&lifted), @r"
    namespace Sample {
        operation Foo () : Unit {
            let f = Sample.__Foo_Lambda_0__;
            f(3);
        }
        function __Foo_Lambda_0__ (x : Int) : Int {
            return (x + 1);
        }
    }
    ");
}

#[test]
fn captured_locals_become_a_prefixed_parameter_tuple() {
    // operation Bar(n : Int) { let g = (x) -> x + n; }
    let lambda = TypedExpr::lambda(
        CallableKind::Function,
        BindingPattern::name("x"),
        add(
            TypedExpr::local("x", ResolvedType::Int),
            TypedExpr::local("n", ResolvedType::Int),
        ),
        int_fn_ty(),
    );
    let bar = callable(
        CallableKind::Operation,
        "Sample",
        "Bar",
        ParamPattern::item("n", ResolvedType::Int),
        ResolvedType::Unit,
        vec![let_stmt("g", lambda)],
    );

    let (lifted, diagnostics) = lift_lambdas(&single_namespace(vec![bar]));

    assert!(diagnostics.is_empty());
    insta::assert_snapshot!(pretty::program(&lifted), @r"
    namespace Sample {
        operation Bar (n : Int) : Unit {
            let g = Sample.__Bar_Lambda_0__(n, _);
        }
        function __Bar_Lambda_0__ (n : Int, x : Int) : Int {
            return (x + n);
        }
    }
    ");

    let generated = find_callable(&lifted, "__Bar_Lambda_0__");
    assert_eq!(
        generated.signature.input,
        ResolvedType::tuple([ResolvedType::Int, ResolvedType::Int])
    );
    assert_eq!(generated.input.arity(), 2);

    // The call site supplies the captured `n` and leaves `x` open, so the
    // replacement has exactly the lambda's type.
    let body = find_callable(&lifted, "Bar").body().unwrap();
    let StatementKind::Let { value, .. } = &body.statements[0].kind else {
        panic!("expected the let binding");
    };
    assert_eq!(value.ty, int_fn_ty());
}

#[test]
fn unit_parameter_lambda_gets_the_synthetic_parameter() {
    // let h = () -> 42;
    let lambda = TypedExpr::lambda(
        CallableKind::Function,
        BindingPattern::Tuple(Vec::new()),
        TypedExpr::int_lit(42),
        ResolvedType::function(ResolvedType::Unit, ResolvedType::Int),
    );
    let baz = operation("Sample", "Baz", vec![let_stmt("h", lambda)]);

    let (lifted, diagnostics) = lift_lambdas(&single_namespace(vec![baz]));

    assert!(diagnostics.is_empty());
    let generated = find_callable(&lifted, "__Baz_Lambda_0__");
    let ParamPattern::Item(param) = &generated.input else {
        panic!("expected a single parameter");
    };
    assert_eq!(param.name, "__lambdaUnitParam__");
    assert_eq!(param.ty, ResolvedType::Unit);
    assert_eq!(generated.signature.output, ResolvedType::Int);
}

#[test]
fn operation_lambdas_generate_operations_with_their_characteristics() {
    let info = CallableInformation::new(true, false);
    let op_ty = ResolvedType::operation(ResolvedType::Qubit, ResolvedType::Unit, info);
    let lambda = TypedExpr::lambda(
        CallableKind::Operation,
        BindingPattern::name("q"),
        TypedExpr::unit(),
        op_ty,
    );
    // The enclosing callable is a *function*; the generated callable's kind
    // still follows the lambda.
    let host = callable(
        CallableKind::Function,
        "Sample",
        "Host",
        no_params(),
        ResolvedType::Unit,
        vec![let_stmt("op", lambda)],
    );

    let (lifted, diagnostics) = lift_lambdas(&single_namespace(vec![host]));

    assert!(diagnostics.is_empty());
    let generated = find_callable(&lifted, "__Host_Lambda_0__");
    assert_eq!(generated.kind, CallableKind::Operation);
    assert_eq!(generated.signature.info, info);
}

#[test]
fn nested_lambdas_lift_inside_out() {
    // let f = (y) -> ((x) -> x + y)(y);
    let inner = TypedExpr::lambda(
        CallableKind::Function,
        BindingPattern::name("x"),
        add(
            TypedExpr::local("x", ResolvedType::Int),
            TypedExpr::local("y", ResolvedType::Int),
        ),
        int_fn_ty(),
    );
    let outer = TypedExpr::lambda(
        CallableKind::Function,
        BindingPattern::name("y"),
        TypedExpr::call(inner, TypedExpr::local("y", ResolvedType::Int), ResolvedType::Int),
        int_fn_ty(),
    );
    let nest = operation("Sample", "Nest", vec![let_stmt("f", outer)]);

    let (lifted, diagnostics) = lift_lambdas(&single_namespace(vec![nest]));

    assert!(diagnostics.is_empty());
    assert!(!has_lambda(&lifted));

    // The inner lambda was generated first and captured the outer's
    // parameter; the outer one captured nothing.
    let inner_gen = find_callable(&lifted, "__Nest_Lambda_0__");
    assert_eq!(
        inner_gen.signature.input,
        ResolvedType::tuple([ResolvedType::Int, ResolvedType::Int])
    );
    let outer_gen = find_callable(&lifted, "__Nest_Lambda_1__");
    assert_eq!(outer_gen.signature.input, ResolvedType::Int);
}

#[test]
fn lambdas_capturing_mutable_locals_stay_in_place() {
    let lambda = TypedExpr::lambda(
        CallableKind::Function,
        BindingPattern::name("x"),
        add(
            TypedExpr::local("x", ResolvedType::Int),
            TypedExpr::local("m", ResolvedType::Int),
        ),
        int_fn_ty(),
    );
    let stubborn = operation(
        "Sample",
        "Stubborn",
        vec![
            Statement::new(StatementKind::Mutable {
                pattern: BindingPattern::name("m"),
                value: TypedExpr::int_lit(0),
            }),
            let_stmt("f", lambda),
        ],
    );
    let program = single_namespace(vec![stubborn]);

    let (lifted, diagnostics) = lift_lambdas(&program);

    assert!(diagnostics.is_empty());
    assert!(has_lambda(&lifted));
    assert_eq!(lifted.callables().count(), 1);
}

#[test]
fn lift_is_idempotent() {
    let lambda = TypedExpr::lambda(
        CallableKind::Function,
        BindingPattern::name("x"),
        add(
            TypedExpr::local("x", ResolvedType::Int),
            TypedExpr::local("n", ResolvedType::Int),
        ),
        int_fn_ty(),
    );
    let bar = callable(
        CallableKind::Operation,
        "Sample",
        "Bar",
        ParamPattern::item("n", ResolvedType::Int),
        ResolvedType::Unit,
        vec![let_stmt("g", lambda)],
    );
    let program = single_namespace(vec![bar]);

    let (once, _) = lift_lambdas(&program);
    let (twice, diagnostics) = lift_lambdas(&once);

    assert!(diagnostics.is_empty());
    assert_eq!(twice, once);
}

#[test]
fn tuple_parameters_map_element_wise() {
    let lambda = TypedExpr::lambda(
        CallableKind::Function,
        BindingPattern::Tuple(vec![
            BindingPattern::name("a"),
            BindingPattern::name("b"),
        ]),
        TypedExpr::local("a", ResolvedType::Int),
        ResolvedType::function(
            ResolvedType::tuple([ResolvedType::Int, ResolvedType::Bool]),
            ResolvedType::Int,
        ),
    );
    let pairs = operation("Sample", "Pairs", vec![let_stmt("f", lambda)]);

    let (lifted, diagnostics) = lift_lambdas(&single_namespace(vec![pairs]));

    assert!(diagnostics.is_empty());
    let generated = find_callable(&lifted, "__Pairs_Lambda_0__");
    assert_eq!(generated.input.arity(), 2);
    let params = generated.input.params();
    assert_eq!(params[0].name, "a");
    assert_eq!(params[1].ty, ResolvedType::Bool);
}

#[test]
fn shape_mismatch_aborts_and_returns_the_original_program() {
    // A two-symbol tuple bound to a non-tuple input type violates the
    // typed-tree invariant.
    let lambda = TypedExpr::lambda(
        CallableKind::Function,
        BindingPattern::Tuple(vec![
            BindingPattern::name("a"),
            BindingPattern::name("b"),
        ]),
        TypedExpr::local("a", ResolvedType::Int),
        int_fn_ty(),
    );
    let broken = operation("Sample", "Broken", vec![let_stmt("f", lambda)]);
    let program = single_namespace(vec![broken]);

    let (result, diagnostics) = lift_lambdas(&program);

    assert_eq!(result, program);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.as_slice()[0].code, DiagnosticCode::PassFailure);
}

#[test]
fn generated_callables_keep_free_names_referenced_through_globals() {
    // A lambda calling a global does not capture it.
    let helper = operation("Sample", "Helper", vec![]);
    let lambda = TypedExpr::lambda(
        CallableKind::Operation,
        BindingPattern::Tuple(Vec::new()),
        TypedExpr::call(
            TypedExpr::global(helper.name.clone(), helper.value_type()),
            TypedExpr::unit(),
            ResolvedType::Unit,
        ),
        ResolvedType::operation(
            ResolvedType::Unit,
            ResolvedType::Unit,
            CallableInformation::EMPTY,
        ),
    );
    let caller = operation("Sample", "Caller", vec![let_stmt("f", lambda)]);

    let (lifted, diagnostics) = lift_lambdas(&single_namespace(vec![caller, helper]));

    assert!(diagnostics.is_empty());
    let generated = find_callable(&lifted, "__Caller_Lambda_0__");
    // No captured environment: the parameter is just the synthetic unit.
    assert_eq!(generated.signature.input, ResolvedType::Unit);
    let StatementKind::Let { value, .. } = &find_callable(&lifted, "Caller")
        .body()
        .unwrap()
        .statements[0]
        .kind
    else {
        panic!("expected the let binding");
    };
    assert!(matches!(
        &value.kind,
        ExprKind::Ident(Identifier::Global(name)) if name.name == "__Caller_Lambda_0__"
    ));
}
