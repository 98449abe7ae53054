use crate::driver::StackSymbol;
use crate::lalr::Production;
use crate::lexical::Token;

/// Semantic actions invoked by the parser
///
/// The parser calls `shift` once per consumed token and `reduce` once per reduction, before the
/// GOTO transition is taken. Returned values travel on the symbol stack and are handed back to
/// `reduce` in right-hand side order.
pub trait SemanticAction {
    type Value;

    fn shift(&mut self, token: &Token) -> Option<Self::Value>;

    /// Synthesize the value of `production.lhs`
    ///
    /// Defaults to passing the value of the first symbol through, `None` for an ε production.
    fn reduce(
        &mut self,
        production: &Production,
        symbols: Vec<StackSymbol<Self::Value>>,
    ) -> Option<Self::Value> {
        let _ = production;
        symbols.into_iter().next().and_then(|symbol| symbol.value)
    }
}

/// Carries token text upwards unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl SemanticAction for PassThrough {
    type Value = String;

    fn shift(&mut self, token: &Token) -> Option<String> {
        Some(token.value.clone())
    }
}
