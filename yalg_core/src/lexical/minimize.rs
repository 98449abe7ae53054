//! DFA minimization by partition refinement

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::lexical::Dfa;

/// Collapse transition-equivalent states of `dfa`
///
/// Accepting states start out split by their accept tag so that two rules never collapse into
/// one state. Groups are numbered by their smallest member, the group holding state 0 stays 0.
pub fn minimize(dfa: &Dfa) -> Dfa {
    let mut partition = initial_partition(dfa);

    loop {
        let group_of = group_index(&partition);
        let mut refined = Vec::with_capacity(partition.len());
        for group in partition.iter() {
            let mut by_signature: BTreeMap<Vec<isize>, BTreeSet<usize>> = BTreeMap::new();
            for &state in group.iter() {
                by_signature
                    .entry(signature(dfa, &group_of, state))
                    .or_insert_with(BTreeSet::new)
                    .insert(state);
            }
            refined.extend(by_signature.into_iter().map(|(_, members)| members));
        }
        let stable = refined.len() == partition.len();
        partition = refined;
        if stable {
            break;
        }
    }

    partition.sort_by_key(|group| group.iter().next().copied());
    let group_of = group_index(&partition);

    let mut minimized = Dfa::new();
    minimized.alphabet = dfa.alphabet.clone();
    minimized.start = group_of[&dfa.start];
    for (id, group) in partition.iter().enumerate() {
        minimized.states.insert(id);
        if let Some(accepting) = group.iter().find(|state| dfa.is_accepting(**state)) {
            minimized.accepts.insert(id);
            if let Some(tag) = dfa.accept_tags.get(accepting) {
                minimized.accept_tags.insert(id, tag.clone());
            }
        }
        let representative = match group.iter().next() {
            Some(&state) => state,
            None => continue,
        };
        for &symbol in dfa.alphabet.iter() {
            if let Some(target) = dfa.next(representative, symbol) {
                minimized.transitions.insert((id, symbol), group_of[&target]);
            }
        }
    }

    debug!(
        "Minimization: {} DFA states -> {} states",
        dfa.states.len(),
        minimized.states.len()
    );
    minimized
}

fn initial_partition(dfa: &Dfa) -> Vec<BTreeSet<usize>> {
    let mut rejecting = BTreeSet::new();
    let mut accepting: BTreeMap<Option<&String>, BTreeSet<usize>> = BTreeMap::new();
    for &state in dfa.states.iter() {
        if dfa.is_accepting(state) {
            accepting
                .entry(dfa.accept_tags.get(&state))
                .or_insert_with(BTreeSet::new)
                .insert(state);
        } else {
            rejecting.insert(state);
        }
    }
    let mut partition: Vec<_> = accepting.into_iter().map(|(_, group)| group).collect();
    if !rejecting.is_empty() {
        partition.push(rejecting);
    }
    partition
}

fn group_index(partition: &[BTreeSet<usize>]) -> BTreeMap<usize, usize> {
    partition
        .iter()
        .enumerate()
        .flat_map(|(index, group)| group.iter().map(move |&state| (state, index)))
        .collect()
}

/// Destination group per alphabet symbol, -1 for a missing transition
fn signature(dfa: &Dfa, group_of: &BTreeMap<usize, usize>, state: usize) -> Vec<isize> {
    dfa.alphabet
        .iter()
        .map(|&symbol| match dfa.next(state, symbol) {
            Some(target) => group_of[&target] as isize,
            None => -1,
        })
        .collect()
}
