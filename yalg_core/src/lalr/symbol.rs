use std::fmt;

use serde::Serialize;

/// End-of-input marker appended to every token stream
pub const END_MARKER: &str = "$";
/// Written in place of an empty right-hand side
pub const EPSILON: &str = "ε";
/// Left-hand side of the augmenting production `S' -> S`
pub const AUGMENTED_START: &str = "S'";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Symbol {
    Terminal(String),
    Nonterminal(String),
}

impl Symbol {
    /// Classify a grammar symbol by spelling: nonterminals start with an uppercase letter
    pub fn classify(name: &str) -> Symbol {
        if is_nonterminal_name(name) {
            Symbol::Nonterminal(name.to_owned())
        } else {
            Symbol::Terminal(name.to_owned())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(name) | Symbol::Nonterminal(name) => name,
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            Symbol::Terminal(_) => true,
            Symbol::Nonterminal(_) => false,
        }
    }

    pub fn is_nonterminal(&self) -> bool {
        !self.is_terminal()
    }
}

pub fn is_nonterminal_name(name: &str) -> bool {
    name.chars().next().map_or(false, char::is_uppercase)
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use matches::assert_matches;

    #[test]
    fn test_classify() {
        assert_matches!(Symbol::classify("Expr"), Symbol::Nonterminal(_));
        assert_matches!(Symbol::classify("E'"), Symbol::Nonterminal(_));
        assert_matches!(Symbol::classify(AUGMENTED_START), Symbol::Nonterminal(_));
        assert_matches!(Symbol::classify("id"), Symbol::Terminal(_));
        assert_matches!(Symbol::classify("+"), Symbol::Terminal(_));
        assert_matches!(Symbol::classify(END_MARKER), Symbol::Terminal(_));
        assert_eq!(Symbol::classify("num").to_string(), "num");
    }
}
