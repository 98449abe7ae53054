mod parse_tree;
pub use self::parse_tree::{ParseTreeNode, TreeBuilder};

mod parser;
pub use self::parser::{LrParser, ParseOutcome};

mod symbol;
pub use self::symbol::StackSymbol;
