//! The call graph and its cycles.
//!
//! Nodes are fully-qualified callable names; an edge `u -> v` exists when
//! the declaration of `u` mentions `v`. Built once per solver run and read
//! only afterwards. Cycle enumeration is Tarjan's SCC algorithm, keeping
//! components of size two or more plus self-referential singletons.

use indexmap::{IndexMap, IndexSet};

use qirin_hir::{ExprKind, Identifier, Program, QualifiedName, Range, TypeArgs, TypedExpr};

use crate::visitor::{self, Visitor};

/// How a call site reaches its callee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Direct,
    Adjoint,
    Controlled,
}

/// One mention of a callable inside another callable's declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub callee: QualifiedName,
    pub kind: CallKind,
    pub type_args: TypeArgs,
    pub range: Range,
}

#[derive(Debug, Default)]
pub struct CallGraph {
    deps: IndexMap<QualifiedName, Vec<CallSite>>,
}

impl CallGraph {
    pub fn build(program: &Program) -> Self {
        let mut deps = IndexMap::new();
        for callable in program.callables() {
            let mut collector = CallSiteCollector {
                sites: Vec::new(),
            };
            collector.visit_callable(callable);
            deps.insert(callable.name.clone(), collector.sites);
        }
        Self { deps }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &QualifiedName> {
        self.deps.keys()
    }

    pub fn direct_dependencies(&self, name: &QualifiedName) -> &[CallSite] {
        self.deps.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct callees of `name`, first-mention order.
    pub fn direct_callees(&self, name: &QualifiedName) -> IndexSet<&QualifiedName> {
        self.direct_dependencies(name)
            .iter()
            .map(|site| &site.callee)
            .collect()
    }

    /// Dependency groups keyed by call kind and type-argument resolution.
    pub fn grouped_dependencies(
        &self,
        name: &QualifiedName,
    ) -> IndexMap<(QualifiedName, CallKind, TypeArgs), Vec<Range>> {
        let mut groups: IndexMap<(QualifiedName, CallKind, TypeArgs), Vec<Range>> =
            IndexMap::new();
        for site in self.direct_dependencies(name) {
            groups
                .entry((site.callee.clone(), site.kind, site.type_args.clone()))
                .or_default()
                .push(site.range);
        }
        groups
    }

    /// Every cycle: strongly connected components of size two or more, and
    /// singletons with a self-edge.
    pub fn cycles(&self) -> Vec<Vec<QualifiedName>> {
        SccFinder::find(self)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1
                    || self
                        .direct_dependencies(&scc[0])
                        .iter()
                        .any(|site| site.callee == scc[0])
            })
            .collect()
    }
}

struct CallSiteCollector {
    sites: Vec<CallSite>,
}

impl CallSiteCollector {
    fn record(&mut self, callee: &QualifiedName, kind: CallKind, expr: &TypedExpr) {
        self.sites.push(CallSite {
            callee: callee.clone(),
            kind,
            type_args: expr.type_args.clone(),
            range: expr.range.unwrap_or_default(),
        });
    }
}

impl Visitor for CallSiteCollector {
    fn visit_expr(&mut self, expr: &TypedExpr) {
        match &expr.kind {
            ExprKind::Ident(Identifier::Global(name)) => {
                self.record(name, CallKind::Direct, expr);
            }
            ExprKind::Adjoint(inner) => {
                if let ExprKind::Ident(Identifier::Global(name)) = &inner.kind {
                    self.record(name, CallKind::Adjoint, inner);
                } else {
                    self.visit_expr(inner);
                }
                return;
            }
            ExprKind::Controlled(inner) => {
                if let ExprKind::Ident(Identifier::Global(name)) = &inner.kind {
                    self.record(name, CallKind::Controlled, inner);
                } else {
                    self.visit_expr(inner);
                }
                return;
            }
            _ => {}
        }
        visitor::walk_expr(self, expr);
    }
}

struct SccFinder<'a> {
    graph: &'a CallGraph,
    index: usize,
    stack: Vec<&'a QualifiedName>,
    on_stack: IndexSet<&'a QualifiedName>,
    indices: IndexMap<&'a QualifiedName, usize>,
    lowlinks: IndexMap<&'a QualifiedName, usize>,
    sccs: Vec<Vec<&'a QualifiedName>>,
}

impl<'a> SccFinder<'a> {
    fn find(graph: &'a CallGraph) -> Vec<Vec<QualifiedName>> {
        let mut finder = Self {
            graph,
            index: 0,
            stack: Vec::new(),
            on_stack: IndexSet::new(),
            indices: IndexMap::new(),
            lowlinks: IndexMap::new(),
            sccs: Vec::new(),
        };

        for name in graph.deps.keys() {
            if !finder.indices.contains_key(name) {
                finder.strongconnect(name);
            }
        }

        finder
            .sccs
            .into_iter()
            .map(|scc| scc.into_iter().cloned().collect())
            .collect()
    }

    fn strongconnect(&mut self, name: &'a QualifiedName) {
        self.indices.insert(name, self.index);
        self.lowlinks.insert(name, self.index);
        self.index += 1;
        self.stack.push(name);
        self.on_stack.insert(name);

        let graph = self.graph;
        for site in graph.direct_dependencies(name) {
            // Edges to callables outside the graph cannot close a cycle.
            let Some((callee, _)) = graph.deps.get_key_value(&site.callee) else {
                continue;
            };
            if !self.indices.contains_key(callee) {
                self.strongconnect(callee);
                let callee_lowlink = self.lowlinks[callee];
                let my_lowlink = self.lowlinks.get_mut(name).unwrap();
                *my_lowlink = (*my_lowlink).min(callee_lowlink);
            } else if self.on_stack.contains(callee) {
                let callee_index = self.indices[callee];
                let my_lowlink = self.lowlinks.get_mut(name).unwrap();
                *my_lowlink = (*my_lowlink).min(callee_index);
            }
        }

        if self.lowlinks[name] == self.indices[name] {
            let mut scc = Vec::new();
            loop {
                let member = self.stack.pop().unwrap();
                self.on_stack.swap_remove(member);
                let done = member == name;
                scc.push(member);
                if done {
                    break;
                }
            }
            self.sccs.push(scc);
        }
    }
}
