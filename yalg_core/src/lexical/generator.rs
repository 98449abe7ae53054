use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::LexicalError;
use crate::lexical::{minimize, regex, subset, Nfa, Scanner, StateFactory, Thompson, TransitionTable};

/// Pattern keyword expanding to `[A-Za-z][A-Za-z0-9]*`
pub const IDENTIFIER_PATTERN: &str = "id";
/// Pattern keyword expanding to `[0-9]+`
pub const NUMBER_PATTERN: &str = "num";

/// One lexical rule, earlier rules win ties between equally long matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalRule {
    pub pattern: String,
    #[serde(rename = "token")]
    pub tag: String,
}

impl LexicalRule {
    pub fn new<P: Into<String>, T: Into<String>>(pattern: P, tag: T) -> Self {
        Self {
            pattern: pattern.into(),
            tag: tag.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub nfa_states: usize,
    pub dfa_states: usize,
    pub minimized_states: usize,
}

/// Scanner tables extracted from the minimized DFA
///
/// The automata themselves are dropped after generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexerTables {
    pub table: TransitionTable,
    pub accept_tags: BTreeMap<usize, String>,
    /// Alphabet of the automaton, sorted
    pub alphabet: Vec<char>,
    pub stats: GenerationStats,
    /// Patterns that failed to parse and were compiled as literal text instead
    #[serde(skip)]
    pub fallbacks: Vec<LexicalError>,
}

impl LexerTables {
    /// Compile an ordered rule list into one scanner
    pub fn build(rules: &[LexicalRule]) -> Self {
        let mut factory = StateFactory::new();
        let mut thompson = Thompson::new(&mut factory);
        let mut fallbacks = Vec::new();

        let mut automata = Vec::with_capacity(rules.len());
        for (priority, rule) in rules.iter().enumerate() {
            let mut nfa = compile_pattern(&mut thompson, &rule.pattern, &mut fallbacks);
            nfa.tag_accepts(&rule.tag, Some(priority));
            automata.push(nfa);
        }
        let nfa = thompson.alternatives(automata);
        Self::from_nfa(&nfa, fallbacks)
    }

    /// Compile a single pattern into a scanner that tags its matches with `tag`
    pub fn generate(pattern: &str, tag: &str) -> Self {
        Self::build(&[LexicalRule::new(pattern, tag)])
    }

    fn from_nfa(nfa: &Nfa, fallbacks: Vec<LexicalError>) -> Self {
        let dfa = subset::construct(nfa);
        let minimized = minimize::minimize(&dfa);
        let stats = GenerationStats {
            nfa_states: nfa.states.len(),
            dfa_states: dfa.states.len(),
            minimized_states: minimized.states.len(),
        };
        debug!(
            "Lexer generated: {} NFA / {} DFA / {} minimized states",
            stats.nfa_states, stats.dfa_states, stats.minimized_states
        );
        LexerTables {
            table: minimized.transition_table(),
            accept_tags: minimized.accept_tags,
            alphabet: minimized.alphabet.into_iter().collect(),
            stats,
            fallbacks,
        }
    }

    pub fn scanner(&self) -> Scanner<'_> {
        Scanner::new(&self.table, &self.accept_tags)
    }

    pub fn state_count(&self) -> usize {
        self.stats.minimized_states
    }

    /// Whether the whole of `input` is one token, and which
    pub fn matches(&self, input: &str) -> Option<&str> {
        let mut state = 0;
        for c in input.chars() {
            state = *self.table.get(&state)?.get(&c)?;
        }
        self.accept_tags.get(&state).map(String::as_str)
    }
}

fn compile_pattern(
    thompson: &mut Thompson,
    pattern: &str,
    fallbacks: &mut Vec<LexicalError>,
) -> Nfa {
    match pattern {
        IDENTIFIER_PATTERN => thompson.identifier(),
        NUMBER_PATTERN => thompson.number(),
        _ => match regex::parse(thompson, pattern) {
            Ok(nfa) => nfa,
            Err(error) => {
                warn!("{}, matching it literally", error);
                fallbacks.push(error);
                thompson.literal(pattern)
            }
        },
    }
}
