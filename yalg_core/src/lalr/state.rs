use std::collections::BTreeMap;

use serde::Serialize;

use crate::lalr::{Action, Item};

/// LALR(1) parser state with its ACTION and GOTO rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct State {
    pub items: Vec<Item>,
    pub action_map: BTreeMap<String, Action>,
    pub goto_map: BTreeMap<String, usize>,
}

impl State {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            action_map: BTreeMap::new(),
            goto_map: BTreeMap::new(),
        }
    }
}
