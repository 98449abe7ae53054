/// Entry of the parser's symbol stack
///
/// `V` is the attribute record of the symbol, typically an enum with one variant per kind of
/// semantic value. There is no separate attribute map.
#[derive(Debug, Clone, PartialEq)]
pub struct StackSymbol<V> {
    /// Terminal tag or nonterminal name
    pub name: String,
    /// Value produced by the semantic action, if any
    pub value: Option<V>,
}

impl<V> StackSymbol<V> {
    pub fn new<S: Into<String>>(name: S, value: Option<V>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn take_value(&mut self) -> Option<V> {
        self.value.take()
    }
}
