use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::lalr::{Grammar, Symbol, END_MARKER, EPSILON};

/// FIRST and FOLLOW sets of every nonterminal
///
/// FIRST sets contain `ε` when the nonterminal derives the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirstFollow {
    pub first: BTreeMap<String, BTreeSet<String>>,
    pub follow: BTreeMap<String, BTreeSet<String>>,
}

impl FirstFollow {
    pub fn compute(grammar: &Grammar) -> Self {
        let mut sets = FirstFollow {
            first: grammar
                .nonterminals
                .iter()
                .map(|name| (name.clone(), BTreeSet::new()))
                .collect(),
            follow: grammar
                .nonterminals
                .iter()
                .map(|name| (name.clone(), BTreeSet::new()))
                .collect(),
        };
        sets.compute_first(grammar);
        sets.compute_follow(grammar);
        sets
    }

    fn compute_first(&mut self, grammar: &Grammar) {
        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.productions.iter() {
                let first = self.first_of_sequence(&production.rhs);
                let entry = self.first.entry(production.lhs.clone()).or_default();
                let before = entry.len();
                entry.extend(first);
                changed |= entry.len() != before;
            }
        }
    }

    fn compute_follow(&mut self, grammar: &Grammar) {
        self.follow
            .entry(grammar.start.clone())
            .or_default()
            .insert(END_MARKER.to_owned());

        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.productions.iter() {
                for (position, symbol) in production.rhs.iter().enumerate() {
                    let name = match symbol {
                        Symbol::Nonterminal(name) => name,
                        Symbol::Terminal(_) => continue,
                    };
                    let mut addition = self.first_of_sequence(&production.rhs[position + 1..]);
                    if addition.remove(EPSILON) {
                        if let Some(follow) = self.follow.get(&production.lhs) {
                            addition.extend(follow.iter().cloned());
                        }
                    }
                    let entry = self.follow.entry(name.clone()).or_default();
                    let before = entry.len();
                    entry.extend(addition);
                    changed |= entry.len() != before;
                }
            }
        }
    }

    /// FIRST of a single symbol
    pub fn first_of(&self, symbol: &Symbol) -> BTreeSet<String> {
        match symbol {
            Symbol::Terminal(name) => {
                let mut set = BTreeSet::new();
                set.insert(name.clone());
                set
            }
            Symbol::Nonterminal(name) => self.first.get(name).cloned().unwrap_or_default(),
        }
    }

    /// FIRST of a symbol sequence, contains `ε` iff every symbol is nullable
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        for symbol in symbols {
            let mut first = self.first_of(symbol);
            let nullable = first.remove(EPSILON);
            result.extend(first);
            if !nullable {
                return result;
            }
        }
        result.insert(EPSILON.to_owned());
        result
    }

    pub fn follow_of(&self, nonterminal: &str) -> Option<&BTreeSet<String>> {
        self.follow.get(nonterminal)
    }
}
