//! Recursive-descent parser for the supported regular expression subset
//!
//! ```text
//! expr   -> term ('|' term)*
//! term   -> factor*
//! factor -> atom ('*' | '+')?
//! atom   -> char | '(' expr ')' | '[' class ']' | '\' char
//! ```
//!
//! The parser builds the NFA directly through the Thompson constructor, there is no separate
//! syntax tree. Characters without a special meaning, including unsupported operators such as
//! `?` or `.`, match themselves.

use crate::error::LexicalError;
use crate::lexical::{Nfa, Thompson};

/// Parse `pattern` into an NFA fragment
pub fn parse(thompson: &mut Thompson, pattern: &str) -> Result<Nfa, LexicalError> {
    let mut parser = RegexParser {
        thompson,
        pattern,
        chars: pattern.chars().collect(),
        pos: 0,
    };
    let nfa = parser.expr()?;
    match parser.peek() {
        None => Ok(nfa),
        Some(_) => Err(parser.error("unmatched `)`")),
    }
}

struct RegexParser<'a, 'f> {
    thompson: &'a mut Thompson<'f>,
    pattern: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a, 'f> RegexParser<'a, 'f> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, reason: &'static str) -> LexicalError {
        LexicalError::MalformedPattern {
            pattern: self.pattern.to_owned(),
            position: self.pos,
            reason,
        }
    }

    fn expr(&mut self) -> Result<Nfa, LexicalError> {
        let mut nfa = self.term()?;
        while self.eat('|') {
            let next = self.term()?;
            nfa = self.thompson.union(nfa, next);
        }
        Ok(nfa)
    }

    fn term(&mut self) -> Result<Nfa, LexicalError> {
        let mut nfa: Option<Nfa> = None;
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let next = self.factor()?;
            nfa = Some(match nfa {
                Some(prev) => self.thompson.concat(prev, next),
                None => next,
            });
        }
        Ok(match nfa {
            Some(nfa) => nfa,
            None => self.thompson.empty(),
        })
    }

    fn factor(&mut self) -> Result<Nfa, LexicalError> {
        let atom = self.atom()?;
        Ok(if self.eat('*') {
            self.thompson.star(atom)
        } else if self.eat('+') {
            self.thompson.plus(atom)
        } else {
            atom
        })
    }

    fn atom(&mut self) -> Result<Nfa, LexicalError> {
        match self.bump() {
            Some('(') => {
                let nfa = self.expr()?;
                if self.eat(')') {
                    Ok(nfa)
                } else {
                    Err(self.error("unmatched `(`"))
                }
            }
            Some('[') => self.class(),
            Some('\\') => match self.bump() {
                Some(c) => Ok(self.thompson.char(c)),
                None => Err(self.error("dangling escape")),
            },
            Some(c) => Ok(self.thompson.char(c)),
            None => Err(self.error("unexpected end of pattern")),
        }
    }

    /// Bracket class body after the opening `[`, parts are unioned left to right
    fn class(&mut self) -> Result<Nfa, LexicalError> {
        let mut nfa: Option<Nfa> = None;
        loop {
            let start = match self.bump() {
                None => return Err(self.error("unterminated `[`")),
                Some(']') => break,
                Some('\\') => match self.bump() {
                    Some(c) => c,
                    None => return Err(self.error("unterminated `[`")),
                },
                Some(c) => c,
            };
            let is_range = self.peek() == Some('-')
                && self.chars.get(self.pos + 1).map_or(false, |&c| c != ']');
            let part = if is_range {
                self.pos += 1;
                let end = match self.bump() {
                    Some(c) => c,
                    None => return Err(self.error("unterminated `[`")),
                };
                if end < start {
                    return Err(self.error("reversed range in character class"));
                }
                self.thompson.range(start, end)
            } else {
                self.thompson.char(start)
            };
            nfa = Some(match nfa {
                Some(prev) => self.thompson.union(prev, part),
                None => part,
            });
        }
        nfa.ok_or_else(|| self.error("empty character class"))
    }
}
