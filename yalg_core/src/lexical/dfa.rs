use std::collections::{BTreeMap, BTreeSet};

/// Scanner transition table, `state -> symbol -> next state`
pub type TransitionTable = BTreeMap<usize, BTreeMap<char, usize>>;

/// Deterministic finite automaton
///
/// The transition function is partial: a missing entry means "no transition".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub states: BTreeSet<usize>,
    pub alphabet: BTreeSet<char>,
    pub transitions: BTreeMap<(usize, char), usize>,
    pub start: usize,
    pub accepts: BTreeSet<usize>,
    /// Token tag winning at each accepting state, resolved by priority during construction
    pub accept_tags: BTreeMap<usize, String>,
}

impl Dfa {
    pub fn new() -> Self {
        Dfa {
            states: BTreeSet::new(),
            alphabet: BTreeSet::new(),
            transitions: BTreeMap::new(),
            start: 0,
            accepts: BTreeSet::new(),
            accept_tags: BTreeMap::new(),
        }
    }

    pub fn next(&self, state: usize, symbol: char) -> Option<usize> {
        self.transitions.get(&(state, symbol)).copied()
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.accepts.contains(&state)
    }

    /// Whether the whole of `input` is in the language of the automaton
    pub fn accepts(&self, input: &str) -> bool {
        let mut state = self.start;
        for c in input.chars() {
            match self.next(state, c) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.is_accepting(state)
    }

    pub fn transition_table(&self) -> TransitionTable {
        let mut table = TransitionTable::new();
        for (&(state, symbol), &next) in self.transitions.iter() {
            table.entry(state).or_insert_with(BTreeMap::new).insert(symbol, next);
        }
        table
    }
}

impl Default for Dfa {
    fn default() -> Self {
        Dfa::new()
    }
}
