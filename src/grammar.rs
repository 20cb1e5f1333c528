//! Context-free string rewriting (the "genotype" side of the pipeline).
//!
//! A [`Grammar`] is an axiom plus one replacement string per symbol. Every generation
//! rewrites all symbols of the previous generation simultaneously; symbols without a
//! rule are terminals and pass through unchanged.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Successor of the branching variable in the standard tree grammar.
const TREE_RULE: &str = "X[-&<X][<++&X]||X[--&>X][+&X]";

/// Successor of the branching variable when every sub-branch ends in a leaf.
const DENSE_LEAVES_RULE: &str = "X[-&<XL][<++&XL]||X[--&>XL][+&XL]";

/// A deterministic, context-free L-System.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    /// The initial symbol string.
    pub axiom: String,
    /// Replacement string per symbol.
    pub rules: HashMap<char, String>,
}

impl Grammar {
    /// Creates a grammar with the given axiom and no rules.
    pub fn new(axiom: impl Into<String>) -> Self {
        Self {
            axiom: axiom.into(),
            rules: HashMap::new(),
        }
    }

    /// Adds (or replaces) the rule for `symbol` (builder pattern).
    pub fn with_rule(mut self, symbol: char, successor: impl Into<String>) -> Self {
        self.rules.insert(symbol, successor.into());
        self
    }

    /// The tree grammar used by the interactive renderer.
    ///
    /// Axiom `FFX` grows a two-segment trunk, then `X` splits into four bracketed
    /// sub-branches per generation. With `dense_leaves` each sub-branch additionally
    /// ends in a leaf symbol `L`.
    pub fn tree(dense_leaves: bool) -> Self {
        let rule = if dense_leaves {
            DENSE_LEAVES_RULE
        } else {
            TREE_RULE
        };
        Self::new("FFX").with_rule('X', rule)
    }

    /// Rewrites the axiom `iterations` times.
    ///
    /// The output can grow exponentially with `iterations`; bounding it is the
    /// caller's job (see [`Grammar::iterations_within`]).
    pub fn generate(&self, iterations: u32) -> String {
        generate(&self.axiom, &self.rules, iterations)
    }

    /// Length in characters of [`Grammar::generate`]'s output, without building it.
    ///
    /// Saturates at `usize::MAX` instead of overflowing.
    pub fn expanded_len(&self, iterations: u32) -> usize {
        // len_n(c) = 1 for terminals, sum of len_{n-1} over the successor otherwise.
        let mut lengths: HashMap<char, usize> = HashMap::new();
        for _ in 0..iterations {
            let next: HashMap<char, usize> = self
                .rules
                .iter()
                .map(|(&symbol, successor)| {
                    let len = successor.chars().fold(0usize, |acc, c| {
                        acc.saturating_add(lengths.get(&c).copied().unwrap_or(1))
                    });
                    (symbol, len)
                })
                .collect();
            lengths = next;
        }

        self.axiom.chars().fold(0usize, |acc, c| {
            acc.saturating_add(lengths.get(&c).copied().unwrap_or(1))
        })
    }

    /// The largest iteration count up to `iterations` whose output is at most
    /// `max_len` characters. Falls back to 0 (the axiom) when nothing fits.
    pub fn iterations_within(&self, iterations: u32, max_len: usize) -> u32 {
        (0..=iterations)
            .rev()
            .find(|&n| self.expanded_len(n) <= max_len)
            .unwrap_or(0)
    }
}

/// Rewrites `axiom` with `rules` for `iterations` generations.
///
/// Each generation reads only the previous generation's string, so a successor is never
/// rewritten again within the generation that produced it.
pub fn generate(axiom: &str, rules: &HashMap<char, String>, iterations: u32) -> String {
    let mut current = axiom.to_string();

    for _ in 0..iterations {
        let mut next = String::with_capacity(current.len() * 2);
        for c in current.chars() {
            match rules.get(&c) {
                Some(successor) => next.push_str(successor),
                None => next.push(c),
            }
        }
        current = next;
    }

    tracing::debug!(
        axiom_len = axiom.len(),
        iterations,
        output_len = current.len(),
        "generated l-system string"
    );
    current
}
