//! LALR(1) state merging

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::lalr::{CanonicalCollection, Item, Symbol};

/// LALR(1) automaton, canonical states merged by core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LalrAutomaton {
    /// Merged items of each state, ordered by production and dot
    pub states: Vec<Vec<Item>>,
    pub transitions: BTreeMap<(usize, Symbol), usize>,
    /// Merged state of each canonical state
    pub origin: Vec<usize>,
}

type Core = BTreeSet<(usize, usize)>;

/// Merge canonical states sharing a core, unioning the lookaheads of equal-core items
///
/// Merged states are numbered by the first canonical state of each group, so state 0 stays
/// the initial state.
pub fn merge(collection: &CanonicalCollection) -> LalrAutomaton {
    let mut groups: BTreeMap<Core, usize> = BTreeMap::new();
    let mut merged: Vec<BTreeMap<(usize, usize), BTreeSet<String>>> = Vec::new();
    let mut origin = Vec::with_capacity(collection.states.len());

    for items in collection.states.iter() {
        let core: Core = items.iter().map(|item| item.core()).collect();
        let next = groups.len();
        let group = *groups.entry(core).or_insert(next);
        if group == merged.len() {
            merged.push(BTreeMap::new());
        }
        for item in items.iter() {
            merged[group]
                .entry(item.core())
                .or_insert_with(BTreeSet::new)
                .insert(item.lookahead.clone());
        }
        origin.push(group);
    }

    let transitions = collection
        .transitions
        .iter()
        .map(|((from, symbol), to)| ((origin[*from], symbol.clone()), origin[*to]))
        .collect();

    let states = merged
        .into_iter()
        .map(|items| {
            items
                .into_iter()
                .map(|((production, dot), lookahead)| Item {
                    production,
                    dot,
                    lookahead,
                })
                .collect()
        })
        .collect::<Vec<Vec<Item>>>();

    debug!(
        "LALR(1) merge: {} canonical states -> {} states",
        collection.states.len(),
        states.len()
    );
    LalrAutomaton {
        states,
        transitions,
        origin,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lalr::{FirstFollow, Grammar};

    #[test]
    fn test_merge_dragon_book_grammar() {
        let grammar = Grammar::from_alternative_rules(&["S -> C C", "C -> c C | d"])
            .unwrap()
            .augment();
        let sets = FirstFollow::compute(&grammar);
        let collection = CanonicalCollection::build(&grammar, &sets);
        let automaton = merge(&collection);

        assert_eq!(collection.len(), 10);
        assert_eq!(automaton.states.len(), 7);
        assert_eq!(automaton.origin[0], 0);

        // C -> d· is reached with lookaheads {c, d} and {$}, merged into one item
        let reduce_d = automaton
            .states
            .iter()
            .flatten()
            .find(|item| item.production == 3 && item.dot == 1)
            .unwrap();
        let lookahead: Vec<_> = reduce_d.lookahead.iter().map(String::as_str).collect();
        assert_eq!(lookahead, vec!["$", "c", "d"]);
    }

    #[test]
    fn test_transitions_are_consistent_after_merge() {
        let grammar = Grammar::from_alternative_rules(&["S -> C C", "C -> c C | d"])
            .unwrap()
            .augment();
        let sets = FirstFollow::compute(&grammar);
        let collection = CanonicalCollection::build(&grammar, &sets);
        let automaton = merge(&collection);

        for ((from, symbol), to) in collection.transitions.iter() {
            let merged_from = automaton.origin[*from];
            assert_eq!(
                automaton.transitions[&(merged_from, symbol.clone())],
                automaton.origin[*to]
            );
        }
    }
}
