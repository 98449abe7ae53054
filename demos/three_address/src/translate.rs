//! Syntax-directed translation of statements into three-address code
//!
//! Boolean conditions are translated into jumps whose targets are filled in by backpatching once
//! the destination is known. `M -> ε` records the index of the next instruction.

use std::error::Error;
use std::fmt;
use std::mem;

use log::{debug, warn};

use yalg_core::{
    Grammar, LexerTables, LexicalRule, LrParser, ParseTable, Production, SemanticAction,
    StackSymbol, Token,
};

use crate::code::{Instruction, InstructionBuffer, Operand};

pub const LEXICAL_RULES: &[(&str, &str)] = &[
    ("begin", "begin"),
    ("end", "end"),
    ("if", "if"),
    ("then", "then"),
    ("while", "while"),
    ("do", "do"),
    ("or", "or"),
    ("and", "and"),
    ("not", "not"),
    ("true", "true"),
    ("false", "false"),
    ("id", "id"),
    ("num", "num"),
    (":=", ":="),
    ("<|<=|=|<>|>|>=", "rel"),
    ("\\+", "+"),
    ("-", "-"),
    ("\\*", "*"),
    ("/", "/"),
    (";", ";"),
    ("\\(", "("),
    ("\\)", ")"),
];

pub const GRAMMAR_RULES: &[&str] = &[
    "S -> id := E | if B then M S | while M B do M S | begin L end",
    "L -> L ; M S | S",
    "B -> B or M B | B and M B | not B | ( B ) | E rel E | true | false",
    "E -> E + T | E - T | T",
    "T -> T * F | T / F | F",
    "F -> ( E ) | id | num",
    "M -> ε",
];

/// Semantic value of a grammar symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr {
    /// Where the value of an expression lives
    Place(Operand),
    /// Jumps taken when a condition is true or false
    Bool {
        truelist: Vec<usize>,
        falselist: Vec<usize>,
    },
    /// Jumps leaving a statement
    Stmt { nextlist: Vec<usize> },
    /// Index of the instruction following a marker
    Marker(usize),
    /// Text of an operator token
    Lexeme(String),
    Error,
}

/// Semantic action emitting three-address code
#[derive(Debug, Default)]
pub struct ThreeAddress {
    code: InstructionBuffer,
    temporaries: usize,
    errors: Vec<String>,
}

impl ThreeAddress {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_temporary(&mut self) -> Operand {
        self.temporaries += 1;
        Operand::Temporary(self.temporaries)
    }

    fn error(&mut self, production: &Production, message: &str) -> Attr {
        let error = format!("{}: {}", production, message);
        warn!("{}", error);
        self.errors.push(error);
        Attr::Error
    }

    /// Patch the jumps leaving the program to the end of the code and return it
    pub fn finish(mut self, program: Option<Attr>) -> Result<InstructionBuffer, TranslationError> {
        if let Some(Attr::Stmt { nextlist }) = program {
            let end = self.code.next_index();
            self.code.backpatch(&nextlist, end);
        }
        if self.errors.is_empty() {
            Ok(self.code)
        } else {
            Err(TranslationError::Semantic(self.errors))
        }
    }

    fn binary(&mut self, production: &Production, left: Attr, op: &str, right: Attr) -> Attr {
        match (left, right) {
            (Attr::Place(left), Attr::Place(right)) => {
                let target = self.new_temporary();
                self.code.emit(Instruction::Binary {
                    target: target.clone(),
                    left,
                    op: op.to_owned(),
                    right,
                });
                Attr::Place(target)
            }
            _ => self.error(production, "operands must be expressions"),
        }
    }

    fn relation(&mut self, production: &Production, left: Attr, rel: Attr, right: Attr) -> Attr {
        match (left, rel, right) {
            (Attr::Place(left), Attr::Lexeme(rel), Attr::Place(right)) => {
                let jump_true = self.code.emit(Instruction::IfGoto {
                    left,
                    rel,
                    right,
                    target: None,
                });
                let jump_false = self.code.emit(Instruction::Goto { target: None });
                Attr::Bool {
                    truelist: vec![jump_true],
                    falselist: vec![jump_false],
                }
            }
            _ => self.error(production, "comparison needs two expressions"),
        }
    }

    fn constant(&mut self, value: bool) -> Attr {
        let jump = self.code.emit(Instruction::Goto { target: None });
        if value {
            Attr::Bool {
                truelist: vec![jump],
                falselist: Vec::new(),
            }
        } else {
            Attr::Bool {
                truelist: Vec::new(),
                falselist: vec![jump],
            }
        }
    }

    fn or(&mut self, production: &Production, left: Attr, marker: Attr, right: Attr) -> Attr {
        match (left, marker, right) {
            (
                Attr::Bool {
                    truelist: mut left_true,
                    falselist: left_false,
                },
                Attr::Marker(next),
                Attr::Bool {
                    truelist: right_true,
                    falselist: right_false,
                },
            ) => {
                self.code.backpatch(&left_false, next);
                left_true.extend(right_true);
                Attr::Bool {
                    truelist: left_true,
                    falselist: right_false,
                }
            }
            _ => self.error(production, "operands must be conditions"),
        }
    }

    fn and(&mut self, production: &Production, left: Attr, marker: Attr, right: Attr) -> Attr {
        match (left, marker, right) {
            (
                Attr::Bool {
                    truelist: left_true,
                    falselist: mut left_false,
                },
                Attr::Marker(next),
                Attr::Bool {
                    truelist: right_true,
                    falselist: right_false,
                },
            ) => {
                self.code.backpatch(&left_true, next);
                left_false.extend(right_false);
                Attr::Bool {
                    truelist: right_true,
                    falselist: left_false,
                }
            }
            _ => self.error(production, "operands must be conditions"),
        }
    }

    fn assign(&mut self, production: &Production, target: Attr, value: Attr) -> Attr {
        match (target, value) {
            (Attr::Place(target @ Operand::Name(_)), Attr::Place(value)) => {
                self.code.emit(Instruction::Copy { target, value });
                Attr::Stmt {
                    nextlist: Vec::new(),
                }
            }
            _ => self.error(production, "can only assign an expression to a name"),
        }
    }

    fn if_then(&mut self, production: &Production, cond: Attr, marker: Attr, body: Attr) -> Attr {
        match (cond, marker, body) {
            (
                Attr::Bool {
                    truelist,
                    falselist: mut nextlist,
                },
                Attr::Marker(body_start),
                Attr::Stmt {
                    nextlist: body_next,
                },
            ) => {
                self.code.backpatch(&truelist, body_start);
                nextlist.extend(body_next);
                Attr::Stmt { nextlist }
            }
            _ => self.error(production, "malformed conditional"),
        }
    }

    fn while_do(
        &mut self,
        production: &Production,
        head: Attr,
        cond: Attr,
        marker: Attr,
        body: Attr,
    ) -> Attr {
        match (head, cond, marker, body) {
            (
                Attr::Marker(head),
                Attr::Bool {
                    truelist,
                    falselist,
                },
                Attr::Marker(body_start),
                Attr::Stmt {
                    nextlist: body_next,
                },
            ) => {
                self.code.backpatch(&body_next, head);
                self.code.backpatch(&truelist, body_start);
                self.code.emit(Instruction::Goto { target: Some(head) });
                Attr::Stmt {
                    nextlist: falselist,
                }
            }
            _ => self.error(production, "malformed loop"),
        }
    }

    fn sequence(&mut self, production: &Production, first: Attr, marker: Attr, second: Attr) -> Attr {
        match (first, marker, second) {
            (Attr::Stmt { nextlist }, Attr::Marker(next), second @ Attr::Stmt { .. }) => {
                self.code.backpatch(&nextlist, next);
                second
            }
            _ => self.error(production, "malformed statement list"),
        }
    }
}

fn take(values: &mut [Attr], index: usize) -> Attr {
    values
        .get_mut(index)
        .map_or(Attr::Error, |value| mem::replace(value, Attr::Error))
}

impl SemanticAction for ThreeAddress {
    type Value = Attr;

    fn shift(&mut self, token: &Token) -> Option<Attr> {
        match token.tag.as_str() {
            "id" => Some(Attr::Place(Operand::Name(token.value.clone()))),
            "num" => Some(Attr::Place(Operand::Constant(token.value.clone()))),
            "rel" | "+" | "-" | "*" | "/" => Some(Attr::Lexeme(token.value.clone())),
            _ => None,
        }
    }

    fn reduce(&mut self, production: &Production, symbols: Vec<StackSymbol<Attr>>) -> Option<Attr> {
        let rhs: Vec<&str> = production.rhs.iter().map(|symbol| symbol.name()).collect();
        let mut values: Vec<Attr> = symbols
            .into_iter()
            .map(|symbol| symbol.value.unwrap_or(Attr::Error))
            .collect();
        let v = &mut values;

        let attr = match (production.lhs.as_str(), rhs.as_slice()) {
            ("M", []) => Attr::Marker(self.code.next_index()),
            ("F", ["(", "E", ")"]) | ("B", ["(", "B", ")"]) => take(v, 1),
            ("E", [_, op, _]) | ("T", [_, op, _]) => {
                let (left, right) = (take(v, 0), take(v, 2));
                self.binary(production, left, op, right)
            }
            ("B", ["E", "rel", "E"]) => {
                let (left, rel, right) = (take(v, 0), take(v, 1), take(v, 2));
                self.relation(production, left, rel, right)
            }
            ("B", ["true"]) => self.constant(true),
            ("B", ["false"]) => self.constant(false),
            ("B", ["not", "B"]) => match take(v, 1) {
                Attr::Bool {
                    truelist,
                    falselist,
                } => Attr::Bool {
                    truelist: falselist,
                    falselist: truelist,
                },
                _ => self.error(production, "operand must be a condition"),
            },
            ("B", [_, "or", _, _]) => {
                let (left, marker, right) = (take(v, 0), take(v, 2), take(v, 3));
                self.or(production, left, marker, right)
            }
            ("B", [_, "and", _, _]) => {
                let (left, marker, right) = (take(v, 0), take(v, 2), take(v, 3));
                self.and(production, left, marker, right)
            }
            ("S", ["id", ":=", "E"]) => {
                let (target, value) = (take(v, 0), take(v, 2));
                self.assign(production, target, value)
            }
            ("S", ["if", "B", "then", "M", "S"]) => {
                let (cond, marker, body) = (take(v, 1), take(v, 3), take(v, 4));
                self.if_then(production, cond, marker, body)
            }
            ("S", ["while", "M", "B", "do", "M", "S"]) => {
                let (head, cond, marker, body) = (take(v, 1), take(v, 2), take(v, 4), take(v, 5));
                self.while_do(production, head, cond, marker, body)
            }
            ("S", ["begin", "L", "end"]) => take(v, 1),
            ("L", ["L", ";", "M", "S"]) => {
                let (first, marker, second) = (take(v, 0), take(v, 2), take(v, 3));
                self.sequence(production, first, marker, second)
            }
            // F -> id | num, T -> F, E -> T, L -> S
            (_, [_]) => take(v, 0),
            _ => self.error(production, "no translation for production"),
        };
        Some(attr)
    }
}

/// Scanner and parse table for the statement language
pub struct Translator {
    lexer: LexerTables,
    parse_table: ParseTable,
}

impl Translator {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let rules: Vec<LexicalRule> = LEXICAL_RULES
            .iter()
            .map(|(pattern, tag)| LexicalRule::new(*pattern, *tag))
            .collect();
        let lexer = LexerTables::build(&rules);
        let grammar = Grammar::from_alternative_rules(GRAMMAR_RULES)?;
        let parse_table = ParseTable::generate(grammar)?;
        debug!(
            "Statement grammar: {} states, {} conflicts",
            parse_table.lalr_state_count(),
            parse_table.conflicts.len()
        );
        Ok(Self { lexer, parse_table })
    }

    pub fn parse_table(&self) -> &ParseTable {
        &self.parse_table
    }

    pub fn translate(&self, source: &str) -> Result<InstructionBuffer, Box<dyn Error>> {
        let tokens = self.lexer.scanner().scan(source)?;
        let mut action = ThreeAddress::new();
        let outcome = LrParser::new(&self.parse_table).parse(&tokens, &mut action)?;
        Ok(action.finish(outcome.value)?)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum TranslationError {
    Semantic(Vec<String>),
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            TranslationError::Semantic(errors) => write!(f, "{}", errors.join("\n")),
        }
    }
}

impl Error for TranslationError {}
