use crate::lexical::{Nfa, State, StateFactory};

/// Thompson construction
///
/// Every constructor returns a fresh NFA fragment with one start state. Composite constructors
/// consume their operands and demote the operands' accept states.
pub struct Thompson<'f> {
    factory: &'f mut StateFactory,
}

impl<'f> Thompson<'f> {
    pub fn new(factory: &'f mut StateFactory) -> Self {
        Self { factory }
    }

    fn state(&mut self) -> State {
        self.factory.new_state()
    }

    fn accept_state(&mut self) -> State {
        let mut state = self.factory.new_state();
        state.accepting = true;
        state
    }

    /// Fragment matching only the empty string
    pub fn empty(&mut self) -> Nfa {
        let start = self.accept_state();
        Nfa::with_start(start)
    }

    pub fn char(&mut self, c: char) -> Nfa {
        let start = self.state();
        let accept = self.accept_state();
        let (from, to) = (start.id, accept.id);
        let mut nfa = Nfa::with_start(start);
        nfa.add_state(accept);
        nfa.add_transition(from, Some(c), to);
        nfa
    }

    /// One edge per code point in `[from, to]`
    pub fn range(&mut self, from: char, to: char) -> Nfa {
        let start = self.state();
        let accept = self.accept_state();
        let (start_id, accept_id) = (start.id, accept.id);
        let mut nfa = Nfa::with_start(start);
        nfa.add_state(accept);
        for c in from..=to {
            nfa.add_transition(start_id, Some(c), accept_id);
        }
        nfa
    }

    pub fn concat(&mut self, mut first: Nfa, second: Nfa) -> Nfa {
        let second_start = second.start;
        let second_accepts = second.accepts.clone();
        let first_accepts = first.demote_accepts();
        first.absorb(second);
        for id in first_accepts {
            first.add_transition(id, None, second_start);
        }
        first.accepts = second_accepts;
        first
    }

    pub fn union(&mut self, mut left: Nfa, mut right: Nfa) -> Nfa {
        let start = self.state();
        let accept = self.accept_state();
        let (start_id, accept_id) = (start.id, accept.id);
        let branch_starts = [left.start, right.start];
        let mut branch_accepts = left.demote_accepts();
        branch_accepts.extend(right.demote_accepts());

        let mut nfa = Nfa::with_start(start);
        nfa.absorb(left);
        nfa.absorb(right);
        nfa.add_state(accept);
        for branch_start in branch_starts.iter() {
            nfa.add_transition(start_id, None, *branch_start);
        }
        for id in branch_accepts {
            nfa.add_transition(id, None, accept_id);
        }
        nfa
    }

    pub fn star(&mut self, inner: Nfa) -> Nfa {
        self.repeat(inner, true)
    }

    pub fn plus(&mut self, inner: Nfa) -> Nfa {
        self.repeat(inner, false)
    }

    fn repeat(&mut self, mut inner: Nfa, allow_empty: bool) -> Nfa {
        let start = self.state();
        let accept = self.accept_state();
        let (start_id, accept_id) = (start.id, accept.id);
        let inner_start = inner.start;
        let inner_accepts = inner.demote_accepts();

        let mut nfa = Nfa::with_start(start);
        nfa.absorb(inner);
        nfa.add_state(accept);
        nfa.add_transition(start_id, None, inner_start);
        for id in inner_accepts {
            nfa.add_transition(id, None, accept_id);
            nfa.add_transition(id, None, inner_start);
        }
        if allow_empty {
            nfa.add_transition(start_id, None, accept_id);
        }
        nfa
    }

    /// Flat concatenation of the characters of `text`
    pub fn literal(&mut self, text: &str) -> Nfa {
        let mut chars = text.chars();
        let mut nfa = match chars.next() {
            Some(c) => self.char(c),
            None => return self.empty(),
        };
        for c in chars {
            let next = self.char(c);
            nfa = self.concat(nfa, next);
        }
        nfa
    }

    fn letter(&mut self) -> Nfa {
        let lower = self.range('a', 'z');
        let upper = self.range('A', 'Z');
        self.union(lower, upper)
    }

    /// `[A-Za-z][A-Za-z0-9]*`
    pub fn identifier(&mut self) -> Nfa {
        let head = self.letter();
        let letter = self.letter();
        let digit = self.range('0', '9');
        let tail = self.union(letter, digit);
        let tail = self.star(tail);
        self.concat(head, tail)
    }

    /// `[0-9]+`
    pub fn number(&mut self) -> Nfa {
        let digit = self.range('0', '9');
        self.plus(digit)
    }

    /// Join rule automata under a fresh start state
    ///
    /// Each rule keeps its own accept states, tags and priorities.
    pub fn alternatives(&mut self, rules: Vec<Nfa>) -> Nfa {
        let start = self.state();
        let start_id = start.id;
        let mut nfa = Nfa::with_start(start);
        for rule in rules {
            let rule_start = rule.start;
            let rule_accepts = rule.accepts.clone();
            nfa.absorb(rule);
            nfa.accepts.extend(rule_accepts);
            nfa.add_transition(start_id, None, rule_start);
        }
        nfa
    }
}
