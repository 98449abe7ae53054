use std::hash::{Hash, Hasher};

pub type StateId = usize;

/// Automaton state
///
/// Identity is the id alone: tag and priority are assigned after the state already sits in
/// sets and maps, so they must not take part in `Eq` or `Hash`.
#[derive(Debug, Clone)]
pub struct State {
    pub id: StateId,
    pub accepting: bool,
    pub tag: Option<String>,
    /// Lower value wins when several rules accept the same input
    pub priority: Option<usize>,
}

impl State {
    pub fn new(id: StateId) -> Self {
        Self {
            id,
            accepting: false,
            tag: None,
            priority: None,
        }
    }

    /// Ordering key used for priority resolution, untagged rules rank last
    pub fn rank(&self) -> (usize, StateId) {
        (self.priority.unwrap_or(usize::MAX), self.id)
    }
}

impl PartialEq for State {
    fn eq(&self, other: &State) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Issues unique state ids for one generation run
#[derive(Debug, Default)]
pub struct StateFactory {
    next: StateId,
}

impl StateFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_state(&mut self) -> State {
        let state = State::new(self.next);
        self.next += 1;
        state
    }

    /// Number of states issued so far
    pub fn issued(&self) -> usize {
        self.next
    }
}
