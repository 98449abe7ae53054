use std::collections::{BTreeMap, BTreeSet};

use crate::lexical::{State, StateId};

/// Nondeterministic finite automaton
///
/// States live in an arena keyed by id; transitions only ever refer to ids. A transition on
/// `None` is an epsilon transition.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub states: BTreeMap<StateId, State>,
    pub alphabet: BTreeSet<char>,
    pub transitions: BTreeMap<(StateId, Option<char>), BTreeSet<StateId>>,
    pub start: StateId,
    pub accepts: BTreeSet<StateId>,
}

impl Nfa {
    /// Create a fragment that only contains its start state
    pub fn with_start(start: State) -> Self {
        let mut nfa = Nfa {
            states: BTreeMap::new(),
            alphabet: BTreeSet::new(),
            transitions: BTreeMap::new(),
            start: start.id,
            accepts: BTreeSet::new(),
        };
        nfa.add_state(start);
        nfa
    }

    pub fn add_state(&mut self, state: State) {
        if state.accepting {
            self.accepts.insert(state.id);
        }
        self.states.insert(state.id, state);
    }

    pub fn add_transition(&mut self, from: StateId, symbol: Option<char>, to: StateId) {
        debug_assert!(self.states.contains_key(&from) && self.states.contains_key(&to));
        if let Some(c) = symbol {
            self.alphabet.insert(c);
        }
        self.transitions
            .entry((from, symbol))
            .or_insert_with(BTreeSet::new)
            .insert(to);
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    /// Targets of all transitions leaving `from` on `symbol`
    pub fn targets<'a>(
        &'a self,
        from: StateId,
        symbol: Option<char>,
    ) -> impl Iterator<Item = StateId> + 'a {
        self.transitions
            .get(&(from, symbol))
            .into_iter()
            .flat_map(|targets| targets.iter().copied())
    }

    /// Turn every accept state into an ordinary state and return the former accept set
    pub fn demote_accepts(&mut self) -> BTreeSet<StateId> {
        let accepts = std::mem::replace(&mut self.accepts, BTreeSet::new());
        for id in accepts.iter() {
            if let Some(state) = self.states.get_mut(id) {
                state.accepting = false;
            }
        }
        accepts
    }

    /// Move all states and transitions of `other` into `self`
    ///
    /// Start and accept states of `self` are left untouched, the caller wires the fragments.
    pub fn absorb(&mut self, other: Nfa) {
        self.states.extend(other.states);
        self.alphabet.extend(other.alphabet);
        for (key, targets) in other.transitions {
            self.transitions
                .entry(key)
                .or_insert_with(BTreeSet::new)
                .extend(targets);
        }
    }

    /// Label every accept state with a token tag and rule priority
    pub fn tag_accepts(&mut self, tag: &str, priority: Option<usize>) {
        for id in self.accepts.iter() {
            if let Some(state) = self.states.get_mut(id) {
                state.tag = Some(tag.to_owned());
                state.priority = priority;
            }
        }
    }

    /// Every state mentioned by a transition or the accept set is owned by the automaton
    pub fn is_closed(&self) -> bool {
        let known = |id: &StateId| self.states.contains_key(id);
        known(&self.start)
            && self.accepts.iter().all(known)
            && self
                .transitions
                .iter()
                .all(|((from, _), targets)| known(from) && targets.iter().all(known))
    }
}
