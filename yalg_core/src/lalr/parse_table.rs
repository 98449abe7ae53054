use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};
use serde::Serialize;

use crate::error::GenerationError;
use crate::lalr::{
    merge, Action, CanonicalCollection, FirstFollow, Grammar, LalrAutomaton, Production, State,
    Symbol, END_MARKER,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

/// Two actions competing for one ACTION entry
///
/// The action registered first is kept in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub state: usize,
    pub symbol: String,
    pub kind: ConflictKind,
    pub kept: Action,
    pub rejected: Action,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ConflictKind::ShiftReduce => "Shift-reduce",
            ConflictKind::ReduceReduce => "Reduce-reduce",
        };
        write!(
            f,
            "{} conflict in state {} on {}: kept {}, rejected {}",
            kind, self.state, self.symbol, self.kept, self.rejected
        )
    }
}

/// LALR(1) ACTION and GOTO tables
///
/// `grammar` is the augmented grammar, production ids in `Action::Reduce` refer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseTable {
    pub grammar: Grammar,
    pub states: Vec<State>,
    pub sets: FirstFollow,
    pub lr1_state_count: usize,
    pub conflicts: Vec<Conflict>,
}

impl ParseTable {
    /// Generate an LALR(1) parse table
    ///
    /// Conflicts do not fail generation, they are logged and collected in `conflicts`.
    pub fn generate(grammar: Grammar) -> Result<Self, GenerationError> {
        ParseTableGenerator::from_grammar(grammar)?.generate()
    }

    pub fn action(&self, state: usize, terminal: &str) -> Option<Action> {
        self.states
            .get(state)
            .and_then(|state| state.action_map.get(terminal))
            .copied()
    }

    pub fn goto(&self, state: usize, nonterminal: &str) -> Option<usize> {
        self.states
            .get(state)
            .and_then(|state| state.goto_map.get(nonterminal))
            .copied()
    }

    pub fn production(&self, id: usize) -> Option<&Production> {
        self.grammar.production(id)
    }

    /// Terminals with an ACTION entry in `state`, sorted
    pub fn expected_terminals(&self, state: usize) -> Vec<String> {
        self.states
            .get(state)
            .map(|state| state.action_map.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn ensure_conflict_free(&self) -> Result<(), GenerationError> {
        if self.conflicts.is_empty() {
            Ok(())
        } else {
            Err(GenerationError::Conflicts(self.conflicts.clone()))
        }
    }

    pub fn lalr_state_count(&self) -> usize {
        self.states.len()
    }
}

struct ParseTableGenerator {
    grammar: Grammar,
    sets: FirstFollow,
    conflicts: Vec<Conflict>,
}

impl ParseTableGenerator {
    fn from_grammar(grammar: Grammar) -> Result<Self, GenerationError> {
        grammar.validate()?;
        let grammar = grammar.augment();
        let sets = FirstFollow::compute(&grammar);
        Ok(Self {
            grammar,
            sets,
            conflicts: Vec::new(),
        })
    }

    fn generate(mut self) -> Result<ParseTable, GenerationError> {
        let collection = CanonicalCollection::build(&self.grammar, &self.sets);
        let automaton = merge::merge(&collection);
        let LalrAutomaton {
            states: merged,
            transitions,
            ..
        } = automaton;

        let mut states: Vec<State> = merged.into_iter().map(State::new).collect();
        for (idx, state) in states.iter_mut().enumerate() {
            self.add_shift_and_goto_entries(idx, state, &transitions);
            self.add_reduce_actions(idx, state);
        }

        for conflict in self.conflicts.iter() {
            warn!("{}", conflict);
        }
        debug!(
            "Parse table: {} LR(1) states, {} LALR(1) states, {} actions, {} gotos",
            collection.len(),
            states.len(),
            states.iter().map(|s| s.action_map.len()).sum::<usize>(),
            states.iter().map(|s| s.goto_map.len()).sum::<usize>()
        );

        Ok(ParseTable {
            grammar: self.grammar,
            states,
            sets: self.sets,
            lr1_state_count: collection.len(),
            conflicts: self.conflicts,
        })
    }

    /// Items with the dot before a symbol that has a transition
    ///
    /// Terminals become shift actions, nonterminals goto entries.
    fn add_shift_and_goto_entries(
        &mut self,
        idx: usize,
        state: &mut State,
        transitions: &BTreeMap<(usize, Symbol), usize>,
    ) {
        let mut shifts = Vec::new();
        for item in state.items.iter() {
            let symbol = match item.next_symbol(&self.grammar) {
                Some(symbol) => symbol,
                None => continue,
            };
            let target = match transitions.get(&(idx, symbol.clone())) {
                Some(&target) => target,
                None => continue,
            };
            match symbol {
                Symbol::Terminal(name) => shifts.push((name.clone(), Action::Shift(target))),
                Symbol::Nonterminal(name) => {
                    state.goto_map.insert(name.clone(), target);
                }
            }
        }
        for (terminal, action) in shifts {
            self.register(idx, state, terminal, action);
        }
    }

    /// Items with the dot at the end
    ///
    /// The augmenting production accepts on `$`, every other production reduces on each of its
    /// lookaheads.
    fn add_reduce_actions(&mut self, idx: usize, state: &mut State) {
        let mut reductions = Vec::new();
        for item in state.items.iter() {
            if !item.is_pos_at_end(&self.grammar) {
                continue;
            }
            for lookahead in item.lookahead.iter() {
                let action = if item.production == 0 && lookahead == END_MARKER {
                    Action::Accept
                } else {
                    Action::Reduce(item.production)
                };
                reductions.push((lookahead.clone(), action));
            }
        }
        for (terminal, action) in reductions {
            self.register(idx, state, terminal, action);
        }
    }

    /// Insert an ACTION entry, recording a conflict instead of overwriting a different action
    fn register(&mut self, idx: usize, state: &mut State, terminal: String, action: Action) {
        match state.action_map.get(&terminal) {
            None => {
                state.action_map.insert(terminal, action);
            }
            Some(&existing) if existing == action => {}
            Some(&existing) => {
                let kind = match (existing, action) {
                    (Action::Shift(_), _) | (_, Action::Shift(_)) => ConflictKind::ShiftReduce,
                    _ => ConflictKind::ReduceReduce,
                };
                self.conflicts.push(Conflict {
                    state: idx,
                    symbol: terminal,
                    kind,
                    kept: existing,
                    rejected: action,
                });
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use matches::assert_matches;

    fn table(rules: &[&str]) -> ParseTable {
        ParseTable::generate(Grammar::from_alternative_rules(rules).unwrap()).unwrap()
    }

    #[test]
    fn test_multiple_start_rules_accept() {
        let parse_table = table(&["S -> a | b"]);

        assert_matches!(parse_table.states[0].action_map["a"], Action::Shift(_));
        assert_matches!(parse_table.states[0].action_map["b"], Action::Shift(_));
        let after_start = parse_table.goto(0, "S").unwrap();
        assert_matches!(parse_table.action(after_start, "$"), Some(Action::Accept));
        assert!(!parse_table.has_conflicts());
    }

    #[test]
    fn test_expression_grammar_entries() {
        let parse_table = table(&["S -> E", "E -> E + T | T", "T -> id | num"]);
        assert!(parse_table.ensure_conflict_free().is_ok());
        assert_eq!(parse_table.expected_terminals(0), vec!["id", "num"]);

        let after_id = match parse_table.action(0, "id") {
            Some(Action::Shift(state)) => state,
            other => panic!("unexpected action {:?}", other),
        };
        // T -> id is production 4 of the augmented grammar
        assert_eq!(parse_table.action(after_id, "+"), Some(Action::Reduce(4)));
        assert_eq!(parse_table.action(after_id, "$"), Some(Action::Reduce(4)));
        assert_eq!(parse_table.action(after_id, "id"), None);
    }

    #[test]
    fn test_shift_reduce_conflict_keeps_shift() {
        let parse_table = table(&["E -> E + E | id"]);
        assert!(parse_table.has_conflicts());
        let conflict = &parse_table.conflicts[0];
        assert_eq!(conflict.kind, ConflictKind::ShiftReduce);
        assert_eq!(conflict.symbol, "+");
        assert_matches!(conflict.kept, Action::Shift(_));
        assert_eq!(conflict.rejected, Action::Reduce(1));
        assert_eq!(
            parse_table.action(conflict.state, "+"),
            Some(conflict.kept)
        );
        assert_matches!(
            parse_table.ensure_conflict_free(),
            Err(GenerationError::Conflicts(ref conflicts)) if conflicts.len() == 1
        );
    }

    #[test]
    fn test_reduce_reduce_conflict_keeps_lower_production() {
        let parse_table = table(&["S -> A | B", "A -> x", "B -> x"]);
        let conflict = &parse_table.conflicts[0];
        assert_eq!(conflict.kind, ConflictKind::ReduceReduce);
        assert_eq!(conflict.kept, Action::Reduce(3));
        assert_eq!(conflict.rejected, Action::Reduce(4));
    }

    #[test]
    fn test_merge_can_introduce_reduce_reduce_conflicts() {
        // LR(1) but not LALR(1)
        let parse_table = table(&[
            "S -> a A d | b B d | a B e | b A e",
            "A -> c",
            "B -> c",
        ]);
        assert!(parse_table.lalr_state_count() < parse_table.lr1_state_count);
        assert!(parse_table
            .conflicts
            .iter()
            .all(|conflict| conflict.kind == ConflictKind::ReduceReduce));
        assert_eq!(parse_table.conflicts.len(), 2);
    }

    #[test]
    fn test_state_counts() {
        let parse_table = table(&["S -> C C", "C -> c C | d"]);
        assert_eq!(parse_table.lr1_state_count, 10);
        assert_eq!(parse_table.lalr_state_count(), 7);
    }

    #[test]
    fn test_generation_errors() {
        assert_eq!(
            ParseTable::generate(Grammar::from_alternative_rules(&["S -> A"]).unwrap()),
            Err(GenerationError::UndefinedNonterminal("A".to_owned()))
        );
    }

    #[test]
    fn test_empty_production_reduces_on_follow() {
        let parse_table = table(&["B -> ( B ) B | ε"]);
        assert!(!parse_table.has_conflicts());
        // B -> ε is production 2
        assert_eq!(parse_table.action(0, "$"), Some(Action::Reduce(2)));
        assert_eq!(parse_table.action(0, ")"), None);
    }
}
