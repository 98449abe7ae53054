use thiserror::Error;

use crate::lalr::Conflict;

/// Errors raised while compiling lexical rules or scanning input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexicalError {
    #[error("Malformed pattern {pattern:?} at {position}: {reason}")]
    MalformedPattern {
        pattern: String,
        position: usize,
        reason: &'static str,
    },
    #[error("Unrecognized character {character:?} at offset {offset}")]
    UnrecognizedCharacter { character: char, offset: usize },
}

/// Errors in grammar rule text, detected before any table is built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Grammar rule {0:?} is missing `->`")]
    MissingArrow(String),
    #[error("Grammar rule {0:?} has an empty left-hand side")]
    EmptyLeftSide(String),
    #[error("Left-hand side {lhs:?} of rule {rule:?} is not a nonterminal")]
    TerminalLeftSide { rule: String, lhs: String },
    #[error("Symbol {0:?} is reserved")]
    ReservedSymbol(String),
    #[error("Grammar contains no rules")]
    EmptyGrammar,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Missing start rule")]
    MissingStartRule,
    #[error("Nonterminal {0} is used but has no productions")]
    UndefinedNonterminal(String),
    #[error("Grammar is not LALR(1): {} conflict(s)", .0.len())]
    Conflicts(Vec<Conflict>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No ACTION entry for the current state and lookahead
    #[error("Parse error: did not expect {lookahead} ({value:?}) at token {position} in state {state}")]
    Syntax {
        state: usize,
        lookahead: String,
        value: String,
        position: usize,
        expected: Vec<String>,
    },
    /// The table lacks a GOTO entry a reduction needs. Never happens for generated tables.
    #[error("Parse table is missing GOTO[{state}, {nonterminal}]")]
    UndefinedGoto { state: usize, nonterminal: String },
    /// A reduce entry names a production the grammar does not have
    #[error("Parse table refers to unknown production {0}")]
    UndefinedProduction(usize),
}
