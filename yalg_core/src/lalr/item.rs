use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::lalr::{Grammar, Symbol};

/// Canonical LR(1) item `[A -> α·β, a]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lr1Item {
    pub production: usize,
    pub dot: usize,
    pub lookahead: String,
}

impl Lr1Item {
    pub fn new<S: Into<String>>(production: usize, dot: usize, lookahead: S) -> Self {
        Self {
            production,
            dot,
            lookahead: lookahead.into(),
        }
    }

    /// Production and dot, the key LALR(1) states are merged by
    pub fn core(&self) -> (usize, usize) {
        (self.production, self.dot)
    }

    pub fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        grammar
            .production(self.production)
            .and_then(|production| production.rhs.get(self.dot))
    }

    pub fn advance(&self) -> Lr1Item {
        Lr1Item {
            production: self.production,
            dot: self.dot + 1,
            lookahead: self.lookahead.clone(),
        }
    }
}

/// LALR(1) item
///
/// Items sharing a core are merged, the lookahead set is the union of their lookaheads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Item {
    pub production: usize,
    pub dot: usize,
    // Using BTreeSet here, as it implements Hash
    pub lookahead: BTreeSet<String>,
}

impl Item {
    pub fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        grammar
            .production(self.production)
            .and_then(|production| production.rhs.get(self.dot))
    }

    pub fn is_pos_at_end(&self, grammar: &Grammar) -> bool {
        grammar
            .production(self.production)
            .map_or(true, |production| self.dot >= production.rhs.len())
    }

    pub fn augmented_rule_string(&self, grammar: &Grammar) -> String {
        let production = match grammar.production(self.production) {
            Some(production) => production,
            None => return format!("<production {}>", self.production),
        };
        let mut result = format!("{} →", production.lhs);
        for p in 0..=production.rhs.len() {
            if p == self.dot {
                result.push_str(" •");
            }
            if p < production.rhs.len() {
                result.push_str(&format!(" {}", production.rhs[p]));
            }
        }
        result
    }

    pub fn lookahead_string(&self) -> String {
        let lookahead_strings: Vec<&str> = self.lookahead.iter().map(String::as_str).collect();
        lookahead_strings.join(", ")
    }

    /// Display adapter, items only know their production by id
    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> ItemDisplay<'a> {
        ItemDisplay {
            item: self,
            grammar,
        }
    }
}

pub struct ItemDisplay<'a> {
    item: &'a Item,
    grammar: &'a Grammar,
}

impl<'a> fmt::Display for ItemDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {{{}}}",
            self.item.augmented_rule_string(self.grammar),
            self.item.lookahead_string()
        )
    }
}
