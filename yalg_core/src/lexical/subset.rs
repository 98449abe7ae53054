//! NFA to DFA conversion by subset construction

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::debug;

use crate::lexical::{Dfa, Nfa, StateId};

/// All states reachable from `states` through epsilon transitions, `states` included
pub fn epsilon_closure(nfa: &Nfa, states: &BTreeSet<StateId>) -> BTreeSet<StateId> {
    let mut closure = states.clone();
    let mut stack: Vec<StateId> = states.iter().copied().collect();
    while let Some(state) = stack.pop() {
        for target in nfa.targets(state, None) {
            if closure.insert(target) {
                stack.push(target);
            }
        }
    }
    closure
}

/// Union of the `symbol` transitions leaving any state of `states`
pub fn move_on(nfa: &Nfa, states: &BTreeSet<StateId>, symbol: char) -> BTreeSet<StateId> {
    states
        .iter()
        .flat_map(|&state| nfa.targets(state, Some(symbol)))
        .collect()
}

/// Build a DFA equivalent to `nfa`
///
/// DFA states are numbered in discovery order, the start closure is state 0. When a closure
/// contains several accepting NFA states, the tag of the one with the lowest priority wins.
pub fn construct(nfa: &Nfa) -> Dfa {
    let mut dfa = Dfa::new();
    dfa.alphabet = nfa.alphabet.clone();

    let mut ids: BTreeMap<BTreeSet<StateId>, usize> = BTreeMap::new();
    let mut queue = VecDeque::new();

    let mut start = BTreeSet::new();
    start.insert(nfa.start);
    let start = epsilon_closure(nfa, &start);
    register(nfa, &mut dfa, &mut ids, &mut queue, start);

    while let Some((id, closure)) = queue.pop_front() {
        for &symbol in nfa.alphabet.iter() {
            let moved = move_on(nfa, &closure, symbol);
            if moved.is_empty() {
                continue;
            }
            let target_closure = epsilon_closure(nfa, &moved);
            let target = match ids.get(&target_closure) {
                Some(&target) => target,
                None => register(nfa, &mut dfa, &mut ids, &mut queue, target_closure),
            };
            dfa.transitions.insert((id, symbol), target);
        }
    }

    debug!(
        "Subset construction: {} NFA states -> {} DFA states",
        nfa.states.len(),
        dfa.states.len()
    );
    dfa
}

fn register(
    nfa: &Nfa,
    dfa: &mut Dfa,
    ids: &mut BTreeMap<BTreeSet<StateId>, usize>,
    queue: &mut VecDeque<(usize, BTreeSet<StateId>)>,
    closure: BTreeSet<StateId>,
) -> usize {
    let id = ids.len();
    dfa.states.insert(id);

    let winner = closure
        .iter()
        .filter(|state| nfa.accepts.contains(state))
        .filter_map(|state| nfa.state(*state))
        .min_by_key(|state| state.rank());
    if let Some(winner) = winner {
        dfa.accepts.insert(id);
        if let Some(tag) = &winner.tag {
            dfa.accept_tags.insert(id, tag.clone());
        }
    }

    ids.insert(closure.clone(), id);
    queue.push_back((id, closure));
    id
}
