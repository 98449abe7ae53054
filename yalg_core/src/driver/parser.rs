use log::trace;
use serde::Serialize;

use crate::driver::{ParseTreeNode, StackSymbol, TreeBuilder};
use crate::error::ParseError;
use crate::lalr::{Action, ParseTable, Production, END_MARKER};
use crate::lexical::Token;
use crate::traits::{PassThrough, SemanticAction};

/// Result of a successful parse
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome<V> {
    /// Value synthesized for the start symbol
    pub value: Option<V>,
    pub tree: ParseTreeNode,
    /// Ids of the productions reduced by, in order
    pub trace: Vec<usize>,
}

impl<V> ParseOutcome<V> {
    /// The reduced productions in order, the reverse of a rightmost derivation
    pub fn productions<'t>(&self, table: &'t ParseTable) -> Vec<&'t Production> {
        self.trace
            .iter()
            .filter_map(|&id| table.production(id))
            .collect()
    }
}

/// Shift-reduce parser driven by an LALR(1) table
///
/// The parser itself holds no state between calls, so one table can serve any number of parses.
#[derive(Debug, Clone, Copy)]
pub struct LrParser<'t> {
    table: &'t ParseTable,
}

impl<'t> LrParser<'t> {
    pub fn new(table: &'t ParseTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t ParseTable {
        self.table
    }

    /// Parse without semantic values, returning the production trace
    pub fn recognize(&self, tokens: &[Token]) -> Result<Vec<usize>, ParseError> {
        self.parse(tokens, &mut PassThrough).map(|outcome| outcome.trace)
    }

    /// Parse `tokens`, the end marker is appended internally
    pub fn parse<A>(&self, tokens: &[Token], action: &mut A) -> Result<ParseOutcome<A::Value>, ParseError>
    where
        A: SemanticAction,
    {
        let end = Token::new(END_MARKER, "");
        let mut states: Vec<usize> = vec![0];
        let mut symbols: Vec<StackSymbol<A::Value>> = Vec::new();
        let mut tree = TreeBuilder::new();
        let mut trace_ids = Vec::new();
        let mut position = 0;

        loop {
            let token = tokens.get(position).unwrap_or(&end);
            let state = states.last().copied().unwrap_or(0);

            // `$` is only ever the appended end marker
            if position < tokens.len() && token.tag == END_MARKER {
                return Err(self.syntax_error(state, token, position));
            }

            match self.table.action(state, &token.tag) {
                Some(Action::Shift(next)) => {
                    trace!("state {}: shift {} -> {}", state, token, next);
                    let value = action.shift(token);
                    symbols.push(StackSymbol::new(token.tag.as_str(), value));
                    tree.shift(token);
                    states.push(next);
                    position += 1;
                }
                Some(Action::Reduce(id)) => {
                    let production = self
                        .table
                        .production(id)
                        .ok_or(ParseError::UndefinedProduction(id))?;
                    trace!("state {}: reduce {}", state, production);

                    let count = production.len();
                    if count >= states.len() || count > symbols.len() {
                        return Err(ParseError::UndefinedGoto {
                            state,
                            nonterminal: production.lhs.clone(),
                        });
                    }
                    states.truncate(states.len() - count);
                    let popped = symbols.split_off(symbols.len() - count);
                    let value = action.reduce(production, popped);

                    let top = states.last().copied().unwrap_or(0);
                    let next = self.table.goto(top, &production.lhs).ok_or_else(|| {
                        ParseError::UndefinedGoto {
                            state: top,
                            nonterminal: production.lhs.clone(),
                        }
                    })?;
                    trace!("state {}: goto {} -> {}", top, production.lhs, next);

                    states.push(next);
                    symbols.push(StackSymbol::new(production.lhs.as_str(), value));
                    tree.reduce(production);
                    trace_ids.push(id);
                }
                Some(Action::Accept) if position < tokens.len() => {
                    return Err(self.syntax_error(state, token, position));
                }
                Some(Action::Accept) => {
                    trace!("state {}: accept", state);
                    let value = symbols.pop().and_then(|symbol| symbol.value);
                    return Ok(ParseOutcome {
                        value,
                        tree: tree.finish(),
                        trace: trace_ids,
                    });
                }
                None => return Err(self.syntax_error(state, token, position)),
            }
        }
    }

    fn syntax_error(&self, state: usize, token: &Token, position: usize) -> ParseError {
        ParseError::Syntax {
            state,
            lookahead: token.tag.clone(),
            value: token.value.clone(),
            position,
            expected: self.table.expected_terminals(state),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lalr::Grammar;
    use matches::assert_matches;

    fn tokens(tags: &[&str]) -> Vec<Token> {
        tags.iter().map(|tag| Token::new(*tag, *tag)).collect()
    }

    fn expression_table() -> ParseTable {
        let grammar =
            Grammar::from_alternative_rules(&["S -> E", "E -> E + T | T", "T -> id | num"])
                .unwrap();
        ParseTable::generate(grammar).unwrap()
    }

    /// Evaluates sums of numbers
    struct Sum;

    impl SemanticAction for Sum {
        type Value = i64;

        fn shift(&mut self, token: &Token) -> Option<i64> {
            token.value.parse().ok()
        }

        fn reduce(&mut self, production: &Production, symbols: Vec<StackSymbol<i64>>) -> Option<i64> {
            match production.len() {
                3 => Some(symbols[0].value? + symbols[2].value?),
                _ => symbols.into_iter().next()?.value,
            }
        }
    }

    #[test]
    fn test_trace() {
        let table = expression_table();
        let parser = LrParser::new(&table);
        let trace: Vec<String> = parser
            .parse(&tokens(&["id", "+", "id"]), &mut PassThrough)
            .unwrap()
            .productions(&table)
            .iter()
            .map(|production| production.to_string())
            .collect();
        assert_eq!(trace, vec!["T -> id", "E -> T", "T -> id", "E -> E + T", "S -> E"]);
    }

    #[test]
    fn test_semantic_values() {
        let table = expression_table();
        let input = vec![
            Token::new("num", "1"),
            Token::new("+", "+"),
            Token::new("num", "20"),
            Token::new("+", "+"),
            Token::new("num", "300"),
        ];
        let outcome = LrParser::new(&table).parse(&input, &mut Sum).unwrap();
        assert_eq!(outcome.value, Some(321));
        assert_eq!(outcome.tree.name(), "S");
        assert_eq!(outcome.tree.leaf_values(), vec!["1", "+", "20", "+", "300"]);
    }

    #[test]
    fn test_syntax_error() {
        let table = expression_table();
        let parser = LrParser::new(&table);
        assert_matches!(
            parser.recognize(&tokens(&["id", "+", "+", "id"])),
            Err(ParseError::Syntax { position: 2, ref lookahead, .. }) if lookahead == "+"
        );
        assert_matches!(
            parser.recognize(&tokens(&["id", "+"])),
            Err(ParseError::Syntax { position: 2, ref lookahead, ref expected, .. })
                if lookahead == "$" && expected == &["id", "num"]
        );
        assert_matches!(parser.recognize(&[]), Err(ParseError::Syntax { position: 0, .. }));
    }

    #[test]
    fn test_empty_productions() {
        let grammar = Grammar::from_alternative_rules(&["B -> ( B ) B | ε"]).unwrap();
        let table = ParseTable::generate(grammar).unwrap();
        let parser = LrParser::new(&table);

        assert_eq!(parser.recognize(&[]).unwrap(), vec![2]);
        assert!(parser.recognize(&tokens(&["(", "(", ")", ")", "(", ")"])).is_ok());
        assert!(parser.recognize(&tokens(&["(", ")", ")"])).is_err());

        let outcome = parser.parse(&tokens(&["(", ")"]), &mut PassThrough).unwrap();
        // B -> ε under the parentheses and after them, then the outer B
        assert_eq!(outcome.trace, vec![2, 2, 1]);
        assert_eq!(outcome.value, Some("(".to_owned()));
    }

    #[test]
    fn test_end_marker_in_input_is_rejected() {
        let table = expression_table();
        let parser = LrParser::new(&table);
        assert_matches!(
            parser.recognize(&tokens(&["id", "$", "+", "+"])),
            Err(ParseError::Syntax { position: 1, ref lookahead, .. }) if lookahead == "$"
        );
        assert_matches!(
            parser.recognize(&tokens(&["id", "$"])),
            Err(ParseError::Syntax { position: 1, .. })
        );
    }

    #[test]
    fn test_missing_goto_is_reported() {
        let mut table = expression_table();
        for state in table.states.iter_mut() {
            state.goto_map.remove("T");
        }
        assert_eq!(
            LrParser::new(&table).recognize(&tokens(&["id"])),
            Err(ParseError::UndefinedGoto {
                state: 0,
                nonterminal: "T".to_owned(),
            })
        );
    }

    #[test]
    fn test_unknown_production_is_reported() {
        let mut table = expression_table();
        let after_id = match table.action(0, "id") {
            Some(Action::Shift(state)) => state,
            other => panic!("unexpected action {:?}", other),
        };
        let bogus = table.grammar.productions.len() + 7;
        table.states[after_id]
            .action_map
            .insert(END_MARKER.to_owned(), Action::Reduce(bogus));
        assert_eq!(
            LrParser::new(&table).recognize(&tokens(&["id"])),
            Err(ParseError::UndefinedProduction(bogus))
        );
    }

    #[test]
    fn test_parser_is_reusable() {
        let table = expression_table();
        let parser = LrParser::new(&table);
        let first = parser.recognize(&tokens(&["num"])).unwrap();
        assert!(parser.recognize(&tokens(&["+"])).is_err());
        assert_eq!(parser.recognize(&tokens(&["num"])).unwrap(), first);
    }
}
