use std::fmt;

use serde::Serialize;

use crate::lalr::{Symbol, EPSILON};

/// Grammar production `lhs -> rhs`
///
/// `id` equals the production's position in its grammar. An empty `rhs` is the ε production.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Production {
    pub id: usize,
    pub lhs: String,
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn new<S: Into<String>>(id: usize, lhs: S, rhs: Vec<Symbol>) -> Self {
        Self {
            id,
            lhs: lhs.into(),
            rhs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }

    /// Number of stack entries a reduction by this production pops
    pub fn len(&self) -> usize {
        self.rhs.len()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        if self.rhs.is_empty() {
            return write!(f, " {}", EPSILON);
        }
        for symbol in self.rhs.iter() {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let production = Production::new(
            1,
            "E",
            vec![Symbol::classify("E"), Symbol::classify("+"), Symbol::classify("T")],
        );
        assert_eq!(production.to_string(), "E -> E + T");
        assert_eq!(production.len(), 3);
        assert_eq!(Production::new(2, "M", vec![]).to_string(), "M -> ε");
    }
}
