use std::collections::BTreeMap;
use std::fmt;

use log::{trace, warn};
use serde::Serialize;

use crate::error::LexicalError;
use crate::lexical::TransitionTable;

/// A scanned token, `tag` is the terminal name the parser sees
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub tag: String,
    pub value: String,
}

impl Token {
    pub fn new<T: Into<String>, V: Into<String>>(tag: T, value: V) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {:?})", self.tag, self.value)
    }
}

/// What the scanner does with a character that starts no token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnrecognizedPolicy {
    /// Drop the character and continue after it
    Skip,
    /// Stop with `LexicalError::UnrecognizedCharacter`
    Fail,
}

impl Default for UnrecognizedPolicy {
    fn default() -> Self {
        UnrecognizedPolicy::Skip
    }
}

/// Maximal-munch scanner over a transition table whose start state is 0
#[derive(Debug, Clone)]
pub struct Scanner<'t> {
    table: &'t TransitionTable,
    accept_tags: &'t BTreeMap<usize, String>,
    policy: UnrecognizedPolicy,
}

impl<'t> Scanner<'t> {
    pub fn new(table: &'t TransitionTable, accept_tags: &'t BTreeMap<usize, String>) -> Self {
        Self {
            table,
            accept_tags,
            policy: UnrecognizedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnrecognizedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnrecognizedPolicy {
        self.policy
    }

    /// Tokenize `input`
    ///
    /// Under `Fail` the first unrecognized character is an error. Under `Skip` this never fails.
    pub fn scan(&self, input: &str) -> Result<Vec<Token>, LexicalError> {
        let mut tokens = Vec::new();
        let mut skipped = Vec::new();
        self.run(input, &mut tokens, &mut skipped)?;
        Ok(tokens)
    }

    /// Tokenize `input`, skipping unrecognized characters regardless of the policy and
    /// reporting each of them
    pub fn scan_with_diagnostics(&self, input: &str) -> (Vec<Token>, Vec<LexicalError>) {
        let lenient = Scanner {
            policy: UnrecognizedPolicy::Skip,
            ..self.clone()
        };
        let mut tokens = Vec::new();
        let mut skipped = Vec::new();
        // cannot fail under `Skip`
        let _ = lenient.run(input, &mut tokens, &mut skipped);
        (tokens, skipped)
    }

    fn step(&self, state: usize, symbol: char) -> Option<usize> {
        self.table.get(&state).and_then(|row| row.get(&symbol)).copied()
    }

    fn run(
        &self,
        input: &str,
        tokens: &mut Vec<Token>,
        skipped: &mut Vec<LexicalError>,
    ) -> Result<(), LexicalError> {
        let chars: Vec<(usize, char)> = input.char_indices().collect();
        let offset = |index: usize| chars.get(index).map_or(input.len(), |&(offset, _)| offset);

        let mut pos = 0;
        while pos < chars.len() {
            if chars[pos].1.is_whitespace() {
                pos += 1;
                continue;
            }

            let mut state = 0;
            let mut longest: Option<(usize, &String)> = None;
            let mut end = pos;
            while let Some(next) = chars.get(end).and_then(|&(_, c)| self.step(state, c)) {
                state = next;
                end += 1;
                if let Some(tag) = self.accept_tags.get(&state) {
                    longest = Some((end, tag));
                }
            }

            match longest {
                Some((end, tag)) => {
                    let token = Token::new(tag.as_str(), &input[offset(pos)..offset(end)]);
                    trace!("Scanned {}", token);
                    tokens.push(token);
                    pos = end;
                }
                None => {
                    let (offset, character) = chars[pos];
                    let error = LexicalError::UnrecognizedCharacter { character, offset };
                    if self.policy == UnrecognizedPolicy::Fail {
                        return Err(error);
                    }
                    warn!("{}, skipped", error);
                    skipped.push(error);
                    pos += 1;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use matches::assert_matches;

    /// `=` tagged ASSIGN, `==` tagged EQ, `a+` tagged ID
    fn tables() -> (TransitionTable, BTreeMap<usize, String>) {
        let mut table = TransitionTable::new();
        let mut row = BTreeMap::new();
        row.insert('=', 1);
        row.insert('a', 3);
        table.insert(0, row);
        let mut row = BTreeMap::new();
        row.insert('=', 2);
        table.insert(1, row);
        let mut row = BTreeMap::new();
        row.insert('a', 3);
        table.insert(3, row);

        let mut tags = BTreeMap::new();
        tags.insert(1, "ASSIGN".to_owned());
        tags.insert(2, "EQ".to_owned());
        tags.insert(3, "ID".to_owned());
        (table, tags)
    }

    #[test]
    fn test_maximal_munch() {
        let (table, tags) = tables();
        let scanner = Scanner::new(&table, &tags);
        let tokens = scanner.scan("aa == a =a").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new("ID", "aa"),
                Token::new("EQ", "=="),
                Token::new("ID", "a"),
                Token::new("ASSIGN", "="),
                Token::new("ID", "a"),
            ]
        );
    }

    #[test]
    fn test_three_equals_split_longest_first() {
        let (table, tags) = tables();
        let tokens = Scanner::new(&table, &tags).scan("===").unwrap();
        assert_eq!(tokens, vec![Token::new("EQ", "=="), Token::new("ASSIGN", "=")]);
    }

    #[test]
    fn test_skip_policy_drops_unknown_characters() {
        let (table, tags) = tables();
        let scanner = Scanner::new(&table, &tags);
        assert_eq!(scanner.policy(), UnrecognizedPolicy::Skip);
        let tokens = scanner.scan("a ? a").unwrap();
        assert_eq!(tokens.len(), 2);

        let (tokens, skipped) = scanner.scan_with_diagnostics("a?é a");
        assert_eq!(tokens.len(), 2);
        assert_eq!(
            skipped,
            vec![
                LexicalError::UnrecognizedCharacter { character: '?', offset: 1 },
                LexicalError::UnrecognizedCharacter { character: 'é', offset: 2 },
            ]
        );
    }

    #[test]
    fn test_fail_policy_reports_offset() {
        let (table, tags) = tables();
        let scanner = Scanner::new(&table, &tags).with_policy(UnrecognizedPolicy::Fail);
        assert_matches!(
            scanner.scan("aa #"),
            Err(LexicalError::UnrecognizedCharacter { character: '#', offset: 3 })
        );
        assert!(scanner.scan("").unwrap().is_empty());
    }
}
