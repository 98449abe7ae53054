//! Canonical collection of LR(1) item sets

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use log::debug;

use crate::lalr::{FirstFollow, Grammar, Lr1Item, Symbol, END_MARKER, EPSILON};

/// Type alias for LR(1) item sets
pub type ItemSet = BTreeSet<Lr1Item>;

/// Numbered LR(1) states and their goto transitions
///
/// State 0 is the closure of `[S' -> ·S, $]`, further states are numbered in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCollection {
    pub states: Vec<ItemSet>,
    pub transitions: BTreeMap<(usize, Symbol), usize>,
}

impl CanonicalCollection {
    /// Build the collection for an augmented grammar
    pub fn build(grammar: &Grammar, sets: &FirstFollow) -> Self {
        let mut initial = ItemSet::new();
        initial.insert(Lr1Item::new(0, 0, END_MARKER));
        let initial = closure(grammar, sets, initial);

        let mut collection = CanonicalCollection {
            states: vec![initial.clone()],
            transitions: BTreeMap::new(),
        };
        let mut state_map: HashMap<ItemSet, usize> = HashMap::new();
        state_map.insert(initial, 0);
        let mut next_states = VecDeque::new();
        next_states.push_back(0);

        while let Some(current) = next_states.pop_front() {
            let symbols: BTreeSet<Symbol> = collection.states[current]
                .iter()
                .filter_map(|item| item.next_symbol(grammar))
                .cloned()
                .collect();
            for symbol in symbols {
                let target = goto(grammar, sets, &collection.states[current], &symbol);
                if target.is_empty() {
                    continue;
                }
                let idx = match state_map.get(&target) {
                    Some(&idx) => idx,
                    None => {
                        let idx = collection.states.len();
                        collection.states.push(target.clone());
                        state_map.insert(target, idx);
                        next_states.push_back(idx);
                        idx
                    }
                };
                collection.transitions.insert((current, symbol), idx);
            }
        }

        debug!("Canonical LR(1) collection: {} states", collection.states.len());
        collection
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Close an item set under `[A -> α·Bβ, a]  =>  [B -> ·γ, b]` for every `b` in FIRST(βa)
pub fn closure(grammar: &Grammar, sets: &FirstFollow, items: ItemSet) -> ItemSet {
    let mut closure = items;
    let mut unclosed: Vec<Lr1Item> = closure.iter().cloned().collect();

    while let Some(item) = unclosed.pop() {
        let production = match grammar.production(item.production) {
            Some(production) => production,
            None => continue,
        };
        let nonterminal = match production.rhs.get(item.dot) {
            Some(Symbol::Nonterminal(name)) => name,
            _ => continue,
        };

        let mut lookaheads = sets.first_of_sequence(&production.rhs[item.dot + 1..]);
        if lookaheads.remove(EPSILON) {
            lookaheads.insert(item.lookahead.clone());
        }

        for expansion in grammar.productions_of(nonterminal) {
            for lookahead in lookaheads.iter() {
                let new_item = Lr1Item::new(expansion.id, 0, lookahead.as_str());
                if !closure.contains(&new_item) {
                    closure.insert(new_item.clone());
                    unclosed.push(new_item);
                }
            }
        }
    }
    closure
}

/// Advance the dot over `symbol` in every item expecting it, then close
pub fn goto(grammar: &Grammar, sets: &FirstFollow, items: &ItemSet, symbol: &Symbol) -> ItemSet {
    let kernel: ItemSet = items
        .iter()
        .filter(|item| item.next_symbol(grammar) == Some(symbol))
        .map(Lr1Item::advance)
        .collect();
    if kernel.is_empty() {
        return kernel;
    }
    closure(grammar, sets, kernel)
}

#[cfg(test)]
mod test {
    use super::*;

    fn collection(rules: &[&str]) -> (Grammar, CanonicalCollection) {
        let grammar = Grammar::from_alternative_rules(rules).unwrap().augment();
        let sets = FirstFollow::compute(&grammar);
        let collection = CanonicalCollection::build(&grammar, &sets);
        (grammar, collection)
    }

    #[test]
    fn test_initial_closure() {
        let (_, collection) = collection(&["S -> C C", "C -> c C | d"]);
        let state0 = &collection.states[0];
        // S' -> ·S,$   S -> ·C C,$   C -> ·c C,c/d   C -> ·d,c/d
        assert_eq!(state0.len(), 6);
        assert!(state0.contains(&Lr1Item::new(0, 0, "$")));
        assert!(state0.contains(&Lr1Item::new(2, 0, "c")));
        assert!(state0.contains(&Lr1Item::new(3, 0, "d")));
    }

    #[test]
    fn test_canonical_state_count() {
        let (_, collection) = collection(&["S -> C C", "C -> c C | d"]);
        assert_eq!(collection.len(), 10);
        assert!(collection
            .transitions
            .contains_key(&(0, Symbol::Nonterminal("S".to_owned()))));
    }

    #[test]
    fn test_goto_on_missing_symbol_is_empty() {
        let (grammar, collection) = collection(&["S -> a"]);
        let sets = FirstFollow::compute(&grammar);
        let target = goto(&grammar, &sets, &collection.states[0], &Symbol::classify("b"));
        assert!(target.is_empty());
    }
}
