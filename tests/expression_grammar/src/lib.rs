#![cfg(test)]

use matches::assert_matches;
use test_utils::{expression_grammar, expression_lexer, expression_table, tokens, RecordingAction};
use yalg_core::{LexerTables, LrParser, ParseError, ParseTable, UnrecognizedPolicy};

#[test]
fn test_accepts_sum() {
    let table = expression_table();
    let mut action = RecordingAction::default();
    let outcome = LrParser::new(&table)
        .parse(&tokens(&["id", "+", "id"]), &mut action)
        .unwrap();

    assert_eq!(
        action.reduced,
        vec!["T -> id", "E -> T", "T -> id", "E -> E + T", "S -> E"]
    );
    assert_eq!(action.shifted, vec!["id", "+", "id"]);
    assert_eq!(outcome.value, Some(3));
    assert_eq!(outcome.trace.len(), 5);
}

#[test]
fn test_rejects_doubled_operator() {
    let table = expression_table();
    let result = LrParser::new(&table).recognize(&tokens(&["id", "+", "+", "id"]));
    assert_matches!(
        result,
        Err(ParseError::Syntax { position: 2, ref lookahead, .. }) if lookahead == "+"
    );
}

#[test]
fn test_scanned_source() {
    let lexer = expression_lexer();
    let table = expression_table();
    let input = lexer.scanner().scan("a1 + 42 + b").unwrap();
    let tags: Vec<&str> = input.iter().map(|token| token.tag.as_str()).collect();
    assert_eq!(tags, vec!["id", "+", "num", "+", "id"]);

    let outcome = LrParser::new(&table).parse(&input, &mut RecordingAction::default()).unwrap();
    assert_eq!(outcome.tree.leaf_values(), vec!["a1", "+", "42", "+", "b"]);
}

#[test]
fn test_strict_scanning() {
    let lexer = expression_lexer();
    assert_eq!(lexer.scanner().scan("a ? b").unwrap().len(), 2);
    assert!(lexer
        .scanner()
        .with_policy(UnrecognizedPolicy::Fail)
        .scan("a ? b")
        .is_err());
}

#[test]
fn test_lalr_is_not_larger_than_lr1() {
    let table = expression_table();
    assert!(table.lalr_state_count() <= table.lr1_state_count);
    assert!(!table.has_conflicts());
}

#[test]
fn test_generation_is_deterministic() {
    let first = ParseTable::generate(expression_grammar()).unwrap();
    let second = ParseTable::generate(expression_grammar()).unwrap();
    assert_eq!(first.states, second.states);

    let first = expression_lexer();
    let second = expression_lexer();
    assert_eq!(first.table, second.table);
    assert_eq!(first.accept_tags, second.accept_tags);
}

#[test]
fn test_bracket_pattern() {
    let lexer = LexerTables::generate("[a-z][a-z0-9]*", "id");
    assert_eq!(lexer.matches("x1y2"), Some("id"));
    assert_eq!(lexer.matches("ABC"), None);
    assert_eq!(lexer.matches("1x"), None);
}

#[test]
fn test_keyword_automaton() {
    let lexer = LexerTables::generate("begin", "begin");
    assert_eq!(lexer.state_count(), 6);
    assert_eq!(lexer.accept_tags.len(), 1);
    assert_eq!(lexer.matches("begin"), Some("begin"));
    assert_eq!(lexer.matches("begi"), None);
    assert_eq!(lexer.matches("beginn"), None);
}
