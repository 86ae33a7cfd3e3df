//! The capability solver.
//!
//! Computes the minimum runtime capability of every source-declared
//! callable: the join of its own analyser patterns with the final
//! capabilities of its transitive dependencies. Cycles are broken up front
//! by seeding every member of a source cycle with the component's joined
//! source capability; the dependent walk over the remaining condensation is
//! then well-founded and memoised.
//!
//! The memoisation cache lives for one inference run and is not safe to
//! share across threads.

use indexmap::{IndexMap, IndexSet};

use qirin_hir::{
    Attribute, Callable, Namespace, NamespaceElement, Program, QualifiedName, RuntimeCapability,
    required_capability,
};

use crate::analyzers::{self, CallPattern};
use crate::callgraph::CallGraph;
use crate::context::GlobalResolutions;
use crate::diagnostics::{DiagnosticCode, Diagnostics, Severity};

/// Annotate every source-declared callable lacking an explicit capability
/// attribute with its inferred `RequiresCapability`.
pub fn infer_capabilities(program: &Program) -> (Program, Diagnostics) {
    infer(program, None)
}

/// Like [`infer_capabilities`], and additionally reports every construct
/// and referenced-library dependency `target` cannot support.
pub fn infer_capabilities_against(
    program: &Program,
    target: RuntimeCapability,
) -> (Program, Diagnostics) {
    infer(program, Some(target))
}

fn infer(program: &Program, target: Option<RuntimeCapability>) -> (Program, Diagnostics) {
    let graph = CallGraph::build(program);
    let resolutions = GlobalResolutions::new(program);
    let mut solver = CapabilitySolver::new(&graph, &resolutions);
    solver.seed_cycles();

    // Resolve every source-declared callable up front; the iteration order
    // of the program fixes the diagnostic order.
    let mut inferred: IndexMap<QualifiedName, RuntimeCapability> = IndexMap::new();
    for callable in program.callables() {
        if !callable.source.is_code() {
            continue;
        }
        let mut visited = IndexSet::new();
        let capability = solver.final_capability(&callable.name, &mut visited);
        inferred.insert(callable.name.clone(), capability);
    }

    if let Some(target) = target {
        solver.report_against(program, target);
    }

    let diagnostics = solver.into_diagnostics();
    let annotated = attach_attributes(program, &inferred);
    (annotated, diagnostics)
}

struct CapabilitySolver<'a> {
    graph: &'a CallGraph,
    resolutions: &'a GlobalResolutions<'a>,
    /// Analyser results per callable, memoised for the run.
    source_caps: IndexMap<QualifiedName, RuntimeCapability>,
    /// Cycle-seeded starting points; everything else starts at its source
    /// capability.
    initial: IndexMap<QualifiedName, RuntimeCapability>,
    /// Final capabilities, memoised for the run.
    cache: IndexMap<QualifiedName, RuntimeCapability>,
    diagnostics: Diagnostics,
}

impl<'a> CapabilitySolver<'a> {
    fn new(graph: &'a CallGraph, resolutions: &'a GlobalResolutions<'a>) -> Self {
        Self {
            graph,
            resolutions,
            source_caps: IndexMap::new(),
            initial: IndexMap::new(),
            cache: IndexMap::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Join of the analyser patterns over the callable's own declaration.
    fn source_capability(&mut self, name: &QualifiedName) -> RuntimeCapability {
        if let Some(&capability) = self.source_caps.get(name) {
            return capability;
        }
        let capability = match self.resolutions.get(name) {
            Some(callable) => analyzers::source_capability(callable),
            None => RuntimeCapability::BASE,
        };
        self.source_caps.insert(name.clone(), capability);
        capability
    }

    /// The cycle pre-pass: every member of a cycle that touches source code
    /// starts at the join of the whole component's source capabilities.
    fn seed_cycles(&mut self) {
        for cycle in self.graph.cycles() {
            let in_source = cycle.iter().any(|name| {
                self.resolutions
                    .get(name)
                    .is_some_and(|callable| callable.source.is_code())
            });
            if !in_source {
                continue;
            }

            let cycle_cap = cycle
                .iter()
                .fold(RuntimeCapability::BASE, |acc, name| {
                    acc.combine(self.source_capability(name))
                });
            for name in cycle {
                let seeded = self.source_capability(&name).combine(cycle_cap);
                self.initial.insert(name, seeded);
            }
        }
    }

    fn initial_capability(&mut self, name: &QualifiedName) -> RuntimeCapability {
        if let Some(&seeded) = self.initial.get(name) {
            return seeded;
        }
        self.source_capability(name)
    }

    /// The dependent capability, memoised. `visited` tracks the current
    /// path only: a call back into it contributes nothing, because the
    /// cycle pre-pass already accounted for it.
    fn final_capability(
        &mut self,
        name: &QualifiedName,
        visited: &mut IndexSet<QualifiedName>,
    ) -> RuntimeCapability {
        if let Some(&capability) = self.cache.get(name) {
            return capability;
        }

        let Some(callable) = self.resolutions.get(name) else {
            return RuntimeCapability::BASE;
        };

        if let Some(explicit) = required_capability(&callable.attributes) {
            self.cache.insert(name.clone(), explicit);
            return explicit;
        }

        if !callable.source.is_code() {
            self.cache.insert(name.clone(), RuntimeCapability::BASE);
            return RuntimeCapability::BASE;
        }

        visited.insert(name.clone());
        let mut capability = self.initial_capability(name);
        let graph = self.graph;
        let mut seen = IndexSet::new();
        for site in graph.direct_dependencies(name) {
            if !seen.insert(&site.callee) || visited.contains(&site.callee) {
                continue;
            }
            if !self.resolutions.contains(&site.callee) {
                // Malformed call graph: log and let the callee contribute
                // base.
                self.diagnostics
                    .report(DiagnosticCode::UnknownCallable, site.range)
                    .arg(site.callee.to_string())
                    .emit();
                continue;
            }
            capability = capability.combine(self.final_capability(&site.callee, visited));
        }
        visited.swap_remove(name);

        self.cache.insert(name.clone(), capability);
        capability
    }

    /// Target-specific reporting: analyser diagnostics for source callables
    /// and explanatory warnings at call sites into referenced libraries.
    fn report_against(&mut self, program: &Program, target: RuntimeCapability) {
        for callable in program.callables() {
            if !callable.source.is_code() {
                continue;
            }

            for pattern in analyzers::analyze_callable(callable) {
                if let Some(diagnostic) = pattern.diagnose(target) {
                    self.diagnostics.push(diagnostic);
                }
            }

            self.explain_reference_calls(callable, target);
        }
    }

    /// For every direct dependency on a referenced-library callable whose
    /// requirements exceed the target, re-surface the library's own
    /// diagnostics as warnings at the call site, naming the callee, its
    /// source file, and the offending position inside it.
    fn explain_reference_calls(&mut self, caller: &Callable, target: RuntimeCapability) {
        let graph = self.graph;
        let mut seen = IndexSet::new();
        for site in graph.direct_dependencies(&caller.name) {
            if !seen.insert(&site.callee) {
                continue;
            }
            let Some(callee) = self.resolutions.get(&site.callee) else {
                continue;
            };
            if callee.source.is_code() {
                continue;
            }

            let mut visited = IndexSet::new();
            let capability = analyzers::source_capability(callee)
                .combine(self.final_capability(&site.callee, &mut visited));
            let call = CallPattern {
                callee: site.callee.clone(),
                type_args: site.type_args.clone(),
                range: site.range,
                capability,
            };
            if !call.should_report(target) {
                continue;
            }

            for pattern in analyzers::analyze_callable(callee) {
                let Some(original) = pattern.diagnose(target) else {
                    continue;
                };
                self.diagnostics
                    .report(original.code, call.range)
                    .severity(Severity::Warning)
                    .arg(callee.name.to_string())
                    .arg(callee.source.file.clone())
                    .arg(original.range.start.to_string())
                    .args(original.arguments)
                    .emit();
            }
        }
    }
}

/// Rebuild the program with inferred attributes attached. Callables outside
/// the inferred map (references, explicitly annotated) pass through
/// untouched.
fn attach_attributes(
    program: &Program,
    inferred: &IndexMap<QualifiedName, RuntimeCapability>,
) -> Program {
    let namespaces = program
        .namespaces
        .iter()
        .map(|namespace| {
            let elements = namespace
                .elements
                .iter()
                .map(|element| match element {
                    NamespaceElement::Callable(callable) => {
                        NamespaceElement::Callable(annotate(callable, inferred))
                    }
                    other => other.clone(),
                })
                .collect();
            Namespace {
                name: namespace.name.clone(),
                elements,
            }
        })
        .collect();
    Program { namespaces }
}

fn annotate(callable: &Callable, inferred: &IndexMap<QualifiedName, RuntimeCapability>) -> Callable {
    let mut callable = callable.clone();
    if required_capability(&callable.attributes).is_some() {
        return callable;
    }
    if let Some(&capability) = inferred.get(&callable.name) {
        callable
            .attributes
            .push(Attribute::requires_capability(capability));
    }
    callable
}
