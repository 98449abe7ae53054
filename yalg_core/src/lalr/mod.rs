mod symbol;
pub use self::symbol::{Symbol, AUGMENTED_START, END_MARKER, EPSILON};

mod production;
pub use self::production::Production;

mod grammar;
pub use self::grammar::Grammar;

mod first_follow;
pub use self::first_follow::FirstFollow;

mod item;
pub use self::item::{Item, ItemDisplay, Lr1Item};

pub mod lr1;
pub use self::lr1::{CanonicalCollection, ItemSet};

pub mod merge;
pub use self::merge::LalrAutomaton;

mod action;
pub use self::action::Action;

mod state;
pub use self::state::State;

mod parse_table;
pub use self::parse_table::{Conflict, ConflictKind, ParseTable};
