mod driver;
mod error;
mod lalr;
pub mod lexical;
mod traits;

pub use crate::driver::*;
pub use crate::error::{GenerationError, GrammarError, LexicalError, ParseError};
pub use crate::lalr::*;
pub use crate::lexical::{LexerTables, LexicalRule, Scanner, Token, UnrecognizedPolicy};
pub use crate::traits::{PassThrough, SemanticAction};
