use std::error::Error;
use std::fmt;
use std::fs;

use prettytable as pt;
use prettytable::cell;
use prettytable::row;

use yalg_core::{LrParser, ParseError, PassThrough, UnrecognizedPolicy};

use crate::config::{Expectation, GrammarConfig};

/// Scan and parse a source file, printing tokens, production sequence and parse tree
pub fn parse_source(
    config_filename: &str,
    source_filename: &str,
    strict: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let config = GrammarConfig::load(config_filename)?;
    let lexer = config.lexer();
    let parse_table = config.parse_table()?;
    let source = fs::read_to_string(source_filename)?;

    let policy = if strict {
        UnrecognizedPolicy::Fail
    } else {
        UnrecognizedPolicy::Skip
    };
    let tokens = lexer.scanner().with_policy(policy).scan(&source)?;
    let outcome = LrParser::new(&parse_table).parse(&tokens, &mut PassThrough)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("Tokens:");
    for token in tokens.iter() {
        println!("  {}", token);
    }
    println!("Productions:");
    for production in outcome.productions(&parse_table) {
        println!("  {:>3}  {}", production.id, production);
    }
    println!("Parse tree:");
    print!("{}", outcome.tree);
    Ok(())
}

/// Run the test cases of a configuration and print a summary
pub fn check(config_filename: &str) -> Result<(), Box<dyn Error>> {
    let config = GrammarConfig::load(config_filename)?;
    let summary = run_test_cases(&config)?;

    println!("{}", config.name);
    println!("{}", summary.table);
    println!("{} passed, {} failed", summary.passed, summary.failed);

    if summary.failed > 0 {
        Err(Box::new(CheckError {
            failed: summary.failed,
        }))
    } else {
        Ok(())
    }
}

struct CheckSummary {
    table: pt::Table,
    passed: usize,
    failed: usize,
}

fn run_test_cases(config: &GrammarConfig) -> Result<CheckSummary, Box<dyn Error>> {
    let lexer = config.lexer();
    let parse_table = config.parse_table()?;
    let parser = LrParser::new(&parse_table);
    let scanner = lexer.scanner();

    let mut table = pt::Table::new();
    table.add_row(row!["#", "Input", "Expected", "Actual", "Result", "Description"]);

    let mut failed = 0;
    for (i, test_case) in config.test_cases.iter().enumerate() {
        let (actual, detail) = match scanner.scan(&test_case.input) {
            Ok(tokens) => match parser.recognize(&tokens) {
                Ok(_) => (Expectation::Legal, String::new()),
                Err(err) => (Expectation::Illegal, describe(&err)),
            },
            Err(err) => (Expectation::Illegal, err.to_string()),
        };
        let passed = actual == test_case.expected;
        if !passed {
            failed += 1;
        }
        let description = match &test_case.description {
            Some(description) if detail.is_empty() => description.clone(),
            Some(description) => format!("{}\n{}", description, detail),
            None => detail,
        };
        let result = if passed { "pass" } else { "FAIL" };
        table.add_row(row![
            i,
            test_case.input,
            test_case.expected,
            actual,
            result,
            description
        ]);
    }

    Ok(CheckSummary {
        table,
        passed: config.test_cases.len() - failed,
        failed,
    })
}

fn describe(err: &ParseError) -> String {
    match err {
        ParseError::Syntax {
            lookahead,
            position,
            expected,
            ..
        } => format!(
            "unexpected {} at token {}, expected one of: {}",
            lookahead,
            position,
            expected.join(" ")
        ),
        other => other.to_string(),
    }
}

#[derive(Debug)]
struct CheckError {
    failed: usize,
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} test case(s) failed", self.failed)
    }
}

impl Error for CheckError {}

#[cfg(test)]
mod test {
    use super::*;

    const EXPRESSION_CONFIG: &str =
        concat!(env!("CARGO_MANIFEST_DIR"), "/grammars/expression.json");

    #[test]
    fn test_expression_cases_pass() {
        let config = GrammarConfig::load(EXPRESSION_CONFIG).unwrap();
        let summary = run_test_cases(&config).unwrap();
        assert_eq!(summary.passed, 4);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.table.len(), 5);
        assert!(check(EXPRESSION_CONFIG).is_ok());
    }

    #[test]
    fn test_wrong_expectation_is_counted() {
        let mut config = GrammarConfig::load(EXPRESSION_CONFIG).unwrap();
        config.test_cases[0].expected = Expectation::Illegal;
        let summary = run_test_cases(&config).unwrap();
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_parse_source_file() {
        let source = concat!(env!("CARGO_MANIFEST_DIR"), "/grammars/expression.txt");
        assert!(parse_source(EXPRESSION_CONFIG, source, false, false).is_ok());
        assert!(parse_source(EXPRESSION_CONFIG, source, true, true).is_ok());
        assert!(parse_source(EXPRESSION_CONFIG, "no/such/file.txt", false, false).is_err());
    }
}
