use yalg_core::lexical::{IDENTIFIER_PATTERN, NUMBER_PATTERN};
use yalg_core::{
    Grammar, LexerTables, LexicalRule, ParseTable, Production, SemanticAction, StackSymbol, Token,
};

pub const EXPRESSION_RULES: &[&str] = &["S -> E", "E -> E + T | T", "T -> id | num"];

pub fn expression_grammar() -> Grammar {
    Grammar::from_alternative_rules(EXPRESSION_RULES).unwrap()
}

pub fn expression_table() -> ParseTable {
    ParseTable::generate(expression_grammar()).unwrap()
}

/// Scanner tables for the tokens of the expression grammar
pub fn expression_lexer() -> LexerTables {
    LexerTables::build(&[
        LexicalRule::new(IDENTIFIER_PATTERN, "id"),
        LexicalRule::new(NUMBER_PATTERN, "num"),
        LexicalRule::new(r"\+", "+"),
    ])
}

/// Tokens whose value equals their tag
pub fn tokens(tags: &[&str]) -> Vec<Token> {
    tags.iter().map(|tag| Token::new(*tag, *tag)).collect()
}

/// Records every callback the parser makes
#[derive(Debug, Default)]
pub struct RecordingAction {
    pub shifted: Vec<String>,
    pub reduced: Vec<String>,
}

impl SemanticAction for RecordingAction {
    type Value = usize;

    fn shift(&mut self, token: &Token) -> Option<usize> {
        self.shifted.push(token.value.clone());
        Some(1)
    }

    /// Counts the leaves below each symbol
    fn reduce(&mut self, production: &Production, symbols: Vec<StackSymbol<usize>>) -> Option<usize> {
        self.reduced.push(production.to_string());
        Some(symbols.iter().filter_map(|symbol| symbol.value).sum())
    }
}
