use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{GenerationError, GrammarError};
use crate::lalr::symbol::is_nonterminal_name;
use crate::lalr::{Production, Symbol, AUGMENTED_START, END_MARKER, EPSILON};

const ARROW: &str = "->";
const ALTERNATIVE: &str = "|";

/// Context-free grammar
///
/// Symbols are plain names. A name starting with an uppercase letter is a nonterminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grammar {
    pub start: String,
    pub productions: Vec<Production>,
    pub terminals: BTreeSet<String>,
    pub nonterminals: BTreeSet<String>,
}

impl Grammar {
    /// Create a grammar, renumbering the productions by position
    pub fn new<S: Into<String>>(start: S, productions: Vec<Production>) -> Self {
        let mut grammar = Grammar {
            start: start.into(),
            productions,
            terminals: BTreeSet::new(),
            nonterminals: BTreeSet::new(),
        };
        grammar.reindex();
        grammar
    }

    /// Parse rule text of the form `LHS -> S1 S2 ... Sn`, one production per rule
    ///
    /// Symbols are separated by whitespace only, so `|` is an ordinary terminal. An empty
    /// right-hand side or a lone `ε` is the empty production. The first rule's left-hand side is
    /// the start symbol.
    pub fn from_rules<S: AsRef<str>>(rules: &[S]) -> Result<Self, GrammarError> {
        Self::parse_rules(rules, false)
    }

    /// Like [`Grammar::from_rules`], but a standalone `|` separates alternatives
    ///
    /// `E -> E + T | T` yields two productions. An empty alternative is the empty production.
    pub fn from_alternative_rules<S: AsRef<str>>(rules: &[S]) -> Result<Self, GrammarError> {
        Self::parse_rules(rules, true)
    }

    fn parse_rules<S: AsRef<str>>(rules: &[S], split_alternatives: bool) -> Result<Self, GrammarError> {
        let mut start = None;
        let mut productions = Vec::new();
        for rule in rules {
            let (lhs, alternatives) = parse_rule(rule.as_ref(), split_alternatives)?;
            if start.is_none() {
                start = Some(lhs.clone());
            }
            for rhs in alternatives {
                productions.push(Production::new(productions.len(), lhs.clone(), rhs));
            }
        }
        match start {
            Some(start) => Ok(Grammar::new(start, productions)),
            None => Err(GrammarError::EmptyGrammar),
        }
    }

    fn reindex(&mut self) {
        self.terminals.clear();
        self.nonterminals.clear();
        for (id, production) in self.productions.iter_mut().enumerate() {
            production.id = id;
            self.nonterminals.insert(production.lhs.clone());
            for symbol in production.rhs.iter() {
                match symbol {
                    Symbol::Terminal(name) => self.terminals.insert(name.clone()),
                    Symbol::Nonterminal(name) => self.nonterminals.insert(name.clone()),
                };
            }
        }
        if self.is_augmented() {
            self.terminals.insert(END_MARKER.to_owned());
        }
    }

    /// Whether production 0 is the augmenting `S' -> S`
    pub fn is_augmented(&self) -> bool {
        self.start == AUGMENTED_START
            && self
                .productions
                .first()
                .map_or(false, |production| production.lhs == AUGMENTED_START)
    }

    /// Grammar with `S' -> start` prepended as production 0 and `$` added to the terminals
    ///
    /// Augmenting an augmented grammar returns it unchanged.
    pub fn augment(&self) -> Grammar {
        if self.is_augmented() {
            return self.clone();
        }
        let mut productions = Vec::with_capacity(self.productions.len() + 1);
        productions.push(Production::new(
            0,
            AUGMENTED_START,
            vec![Symbol::Nonterminal(self.start.clone())],
        ));
        productions.extend(self.productions.iter().cloned());
        Grammar::new(AUGMENTED_START, productions)
    }

    pub fn production(&self, id: usize) -> Option<&Production> {
        self.productions.get(id)
    }

    pub fn productions_of<'a>(&'a self, nonterminal: &'a str) -> impl Iterator<Item = &'a Production> {
        self.productions
            .iter()
            .filter(move |production| production.lhs == nonterminal)
    }

    /// Check that tables can be generated for this grammar
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.productions_of(&self.start).next().is_none() {
            return Err(GenerationError::MissingStartRule);
        }
        for production in self.productions.iter() {
            for symbol in production.rhs.iter() {
                if let Symbol::Nonterminal(name) = symbol {
                    if self.productions_of(name).next().is_none() {
                        return Err(GenerationError::UndefinedNonterminal(name.clone()));
                    }
                }
            }
        }
        Ok(())
    }
}

fn parse_rule(
    rule: &str,
    split_alternatives: bool,
) -> Result<(String, Vec<Vec<Symbol>>), GrammarError> {
    let arrow = rule
        .find(ARROW)
        .ok_or_else(|| GrammarError::MissingArrow(rule.to_owned()))?;
    let lhs = rule[..arrow].trim();
    if lhs.is_empty() {
        return Err(GrammarError::EmptyLeftSide(rule.to_owned()));
    }
    check_reserved(lhs)?;
    if !is_nonterminal_name(lhs) {
        return Err(GrammarError::TerminalLeftSide {
            rule: rule.to_owned(),
            lhs: lhs.to_owned(),
        });
    }

    let mut alternatives = vec![Vec::new()];
    for name in rule[arrow + ARROW.len()..].split_whitespace() {
        match name {
            ALTERNATIVE if split_alternatives => alternatives.push(Vec::new()),
            EPSILON => {}
            _ => {
                check_reserved(name)?;
                if let Some(current) = alternatives.last_mut() {
                    current.push(Symbol::classify(name));
                }
            }
        }
    }
    Ok((lhs.to_owned(), alternatives))
}

fn check_reserved(name: &str) -> Result<(), GrammarError> {
    if name == END_MARKER || name == AUGMENTED_START {
        Err(GrammarError::ReservedSymbol(name.to_owned()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use matches::assert_matches;

    #[test]
    fn test_from_rules() {
        let grammar =
            Grammar::from_alternative_rules(&["S -> E", "E -> E + T | T", "T -> id | num"])
                .unwrap();
        assert_eq!(grammar.start, "S");
        assert_eq!(grammar.productions.len(), 5);
        assert_eq!(grammar.productions[2].to_string(), "E -> T");
        assert_eq!(grammar.productions[4].id, 4);
        let terminals: Vec<_> = grammar.terminals.iter().map(String::as_str).collect();
        assert_eq!(terminals, vec!["+", "id", "num"]);
        assert_eq!(grammar.nonterminals.len(), 3);
    }

    #[test]
    fn test_empty_alternatives() {
        let grammar =
            Grammar::from_alternative_rules(&["B -> ( B ) B | ε", "M ->", "N -> x |"]).unwrap();
        assert!(grammar.productions[1].is_empty());
        assert!(grammar.productions[2].is_empty());
        assert!(grammar.productions[4].is_empty());
        assert_eq!(grammar.productions.len(), 5);
    }

    #[test]
    fn test_bar_is_a_terminal_in_plain_rules() {
        let grammar = Grammar::from_rules(&["S -> a | b", "S -> ε", "T ->"]).unwrap();
        assert_eq!(grammar.productions.len(), 3);
        assert_eq!(grammar.productions[0].to_string(), "S -> a | b");
        assert_eq!(grammar.productions[0].len(), 3);
        assert!(grammar.terminals.contains("|"));
        assert!(grammar.productions[1].is_empty());
        assert!(grammar.productions[2].is_empty());

        let split = Grammar::from_alternative_rules(&["S -> a | b"]).unwrap();
        assert_eq!(split.productions.len(), 2);
        assert!(!split.terminals.contains("|"));
    }

    #[test]
    fn test_augment_renumbers_and_is_idempotent() {
        let grammar = Grammar::from_alternative_rules(&["S -> a S | b"]).unwrap();
        let augmented = grammar.augment();
        assert!(augmented.is_augmented());
        assert_eq!(augmented.productions[0].to_string(), "S' -> S");
        assert_eq!(augmented.productions[2].to_string(), "S -> b");
        assert!(augmented
            .productions
            .iter()
            .enumerate()
            .all(|(i, p)| p.id == i));
        assert!(augmented.terminals.contains(END_MARKER));
        assert_eq!(augmented.augment(), augmented);
    }

    #[test]
    fn test_malformed_rules() {
        assert_matches!(Grammar::from_rules(&["S E"]), Err(GrammarError::MissingArrow(_)));
        assert_matches!(Grammar::from_rules(&[" -> a"]), Err(GrammarError::EmptyLeftSide(_)));
        assert_matches!(
            Grammar::from_rules(&["s -> a"]),
            Err(GrammarError::TerminalLeftSide { .. })
        );
        assert_matches!(Grammar::from_rules(&["S -> a $"]), Err(GrammarError::ReservedSymbol(_)));
        assert_matches!(Grammar::from_rules(&["S' -> a"]), Err(GrammarError::ReservedSymbol(_)));
        assert_matches!(Grammar::from_rules::<&str>(&[]), Err(GrammarError::EmptyGrammar));
    }

    #[test]
    fn test_validate() {
        let grammar = Grammar::from_rules(&["S -> A b"]).unwrap();
        assert_eq!(
            grammar.validate(),
            Err(GenerationError::UndefinedNonterminal("A".to_owned()))
        );
        let grammar = Grammar::new("S", vec![Production::new(0, "T", vec![])]);
        assert_eq!(grammar.validate(), Err(GenerationError::MissingStartRule));
        assert!(Grammar::from_rules(&["S -> a"]).unwrap().validate().is_ok());
    }
}
