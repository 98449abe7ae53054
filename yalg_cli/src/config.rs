use std::error::Error;
use std::fmt;
use std::fs;

use serde::Deserialize;

use yalg_core::{Grammar, LexerTables, LexicalRule, ParseTable, END_MARKER, EPSILON};

/// Grammar configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct GrammarConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub lexical_rules: Vec<LexicalRule>,
    pub grammar_rules: Vec<String>,
    /// Whether a standalone `|` in a grammar rule separates alternatives
    #[serde(default)]
    pub alternatives: bool,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected: Expectation,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    Legal,
    Illegal,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Expectation::Legal => write!(f, "legal"),
            Expectation::Illegal => write!(f, "illegal"),
        }
    }
}

impl GrammarConfig {
    pub fn load(filename: &str) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(filename)?;
        let config = Self::from_json(&content)?;
        log::debug!(
            "Loaded configuration {:?}: {} lexical rules, {} grammar rules, {} test cases",
            config.name,
            config.lexical_rules.len(),
            config.grammar_rules.len(),
            config.test_cases.len()
        );
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, Box<dyn Error>> {
        let config: GrammarConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingName);
        }
        if self.lexical_rules.is_empty() {
            return Err(ConfigError::NoLexicalRules);
        }
        if let Some(rule) = self
            .lexical_rules
            .iter()
            .find(|rule| rule.tag == END_MARKER || rule.tag == EPSILON)
        {
            return Err(ConfigError::ReservedTag(rule.tag.clone()));
        }
        if self.grammar_rules.is_empty() {
            return Err(ConfigError::NoGrammarRules);
        }
        if let Some(rule) = self.grammar_rules.iter().find(|rule| !rule.contains("->")) {
            return Err(ConfigError::MalformedRule(rule.clone()));
        }
        Ok(())
    }

    pub fn lexer(&self) -> LexerTables {
        LexerTables::build(&self.lexical_rules)
    }

    pub fn parse_table(&self) -> Result<ParseTable, Box<dyn Error>> {
        let grammar = if self.alternatives {
            Grammar::from_alternative_rules(&self.grammar_rules)?
        } else {
            Grammar::from_rules(&self.grammar_rules)?
        };
        let parse_table = ParseTable::generate(grammar)?;
        Ok(parse_table)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingName,
    NoLexicalRules,
    NoGrammarRules,
    MalformedRule(String),
    ReservedTag(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            ConfigError::MissingName => write!(f, "Configuration has no name"),
            ConfigError::NoLexicalRules => write!(f, "Configuration has no lexical rules"),
            ConfigError::NoGrammarRules => write!(f, "Configuration has no grammar rules"),
            ConfigError::MalformedRule(rule) => {
                write!(f, "Grammar rule {:?} is missing \"->\"", rule)
            }
            ConfigError::ReservedTag(tag) => {
                write!(f, "Token name {:?} is reserved", tag)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod test {
    use super::*;
    use matches::assert_matches;

    const EXPRESSION: &str = r#"{
        "name": "expression",
        "lexical_rules": [
            { "pattern": "id", "token": "id" },
            { "pattern": "\\+", "token": "+" }
        ],
        "grammar_rules": ["S -> E", "E -> E + T | T", "T -> id"],
        "alternatives": true,
        "test_cases": [
            { "input": "a + b", "expected": "legal" },
            { "input": "a + + b", "expected": "illegal", "description": "double plus" }
        ]
    }"#;

    #[test]
    fn test_load_expression_config() {
        let config = GrammarConfig::from_json(EXPRESSION).unwrap();
        assert_eq!(config.lexical_rules[1].tag, "+");
        assert_eq!(config.test_cases[1].expected, Expectation::Illegal);
        assert!(config.parse_table().unwrap().conflicts.is_empty());
        assert_eq!(config.lexer().matches("x1"), Some("id"));
    }

    #[test]
    fn test_validation() {
        let mut config = GrammarConfig::from_json(EXPRESSION).unwrap();
        config.grammar_rules.push("T num".to_owned());
        assert_eq!(
            config.validate(),
            Err(ConfigError::MalformedRule("T num".to_owned()))
        );
        config.lexical_rules.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoLexicalRules));
        config.name = " ".to_owned();
        assert_eq!(config.validate(), Err(ConfigError::MissingName));
    }

    #[test]
    fn test_reserved_token_names() {
        let json = EXPRESSION.replace(r#""token": "+""#, r#""token": "$""#);
        assert_matches!(
            GrammarConfig::from_json(&json).unwrap_err().downcast_ref::<ConfigError>(),
            Some(ConfigError::ReservedTag(tag)) if tag == "$"
        );
    }

    #[test]
    fn test_rules_without_alternatives() {
        let mut config = GrammarConfig::from_json(EXPRESSION).unwrap();
        config.alternatives = false;
        config.grammar_rules = vec!["S -> a | b".to_owned()];
        let parse_table = config.parse_table().unwrap();
        assert!(parse_table.grammar.terminals.contains("|"));
        assert_eq!(parse_table.grammar.productions.len(), 2);
    }

    #[test]
    fn test_unknown_expectation_is_rejected() {
        let json = EXPRESSION.replace("\"illegal\"", "\"maybe\"");
        assert!(GrammarConfig::from_json(&json).is_err());
    }
}
