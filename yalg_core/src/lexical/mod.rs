//! Regular expressions to scanner tables
//!
//! Pattern text is compiled by Thompson construction into an NFA, converted into a DFA by subset
//! construction and minimized. Only the minimized transition table and its accept tags are kept,
//! in [`LexerTables`], and walked by the maximal-munch [`Scanner`].

mod dfa;
mod generator;
pub mod minimize;
mod nfa;
pub mod regex;
mod scanner;
mod state;
pub mod subset;
mod thompson;

pub use dfa::{Dfa, TransitionTable};
pub use generator::{GenerationStats, LexerTables, LexicalRule, IDENTIFIER_PATTERN, NUMBER_PATTERN};
pub use nfa::Nfa;
pub use scanner::{Scanner, Token, UnrecognizedPolicy};
pub use state::{State, StateFactory, StateId};
pub use thompson::Thompson;
