//! Variable visibility tracking and fresh-symbol generation.

use indexmap::IndexMap;

use qirin_hir::{LocalSymbol, QualifiedName};

/// Tracks the locals visible at the current traversal point.
///
/// One frame per scope. A frame starts with the scope's known-symbols and
/// grows as the statements of that scope are visited; the invariant is that
/// at the moment any expression is visited, the tracker holds exactly the
/// locals visible to that expression at its source position.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    frames: Vec<Vec<LocalSymbol>>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn enter_scope(&mut self, known_symbols: &[LocalSymbol]) {
        self.frames.push(known_symbols.to_vec());
    }

    pub fn exit_scope(&mut self) {
        self.frames.pop();
    }

    /// Extend the innermost frame. Called after a statement has been
    /// visited, so following siblings see its bindings and the statement's
    /// own subtree does not.
    pub fn declare(&mut self, symbols: impl IntoIterator<Item = LocalSymbol>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.extend(symbols);
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The innermost binding for `name`, honoring shadowing.
    pub fn get(&self, name: &str) -> Option<&LocalSymbol> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.iter().rev().find(|symbol| symbol.name == name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All visible locals in declaration order. Shadowed bindings appear
    /// once, at their first declaration position, with the innermost
    /// definition.
    pub fn visible(&self) -> Vec<LocalSymbol> {
        let mut seen: IndexMap<&str, &LocalSymbol> = IndexMap::new();
        for frame in &self.frames {
            for symbol in frame {
                seen.insert(symbol.name.as_str(), symbol);
            }
        }
        seen.into_values().cloned().collect()
    }
}

/// Names fresh top-level symbols for generated callables.
///
/// The counter is monotonic per enclosing callable; candidates are probed
/// against the namespace's symbol table, and a collision falls back to a
/// candidate salted with a hash of the enclosing callable's fully-qualified
/// name before counting on.
#[derive(Debug)]
pub struct NameGenerator {
    prefix: String,
    seed: u32,
    counter: u64,
}

impl NameGenerator {
    /// Generator for lambdas lifted out of `enclosing`.
    pub fn for_callable(enclosing: &QualifiedName) -> Self {
        Self::with_prefix(format!("__{}_Lambda_", enclosing.name), enclosing)
    }

    pub fn with_prefix(prefix: String, enclosing: &QualifiedName) -> Self {
        Self {
            prefix,
            seed: crc32fast::hash(enclosing.to_string().as_bytes()),
            counter: 0,
        }
    }

    /// The next name not rejected by `is_taken`.
    pub fn fresh(&mut self, is_taken: impl Fn(&str) -> bool) -> String {
        loop {
            let candidate = format!("{}{}__", self.prefix, self.counter);
            self.counter += 1;
            if !is_taken(&candidate) {
                return candidate;
            }
            let salted = format!("{}{}_{:08x}__", self.prefix, self.counter - 1, self.seed);
            if !is_taken(&salted) {
                return salted;
            }
            // Both candidates taken: keep counting. A namespace holds
            // finitely many symbols, so this terminates.
        }
    }
}
