use std::error::Error;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

use yalg_core::{Action, LexerTables, ParseTable};

use crate::config::GrammarConfig;

/// Which automaton of a configuration to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Graph {
    Lalr,
    Dfa,
}

pub fn write_graphviz_graph(
    config_filename: &str,
    graph: Graph,
    output_filename: &str,
) -> Result<(), Box<dyn Error>> {
    let graphviz_string = render(config_filename, graph)?;
    fs::write(output_filename, graphviz_string)?;
    Ok(())
}

pub fn show_graphviz_graph(config_filename: &str, graph: Graph) -> Result<(), Box<dyn Error>> {
    let graphviz_string = render(config_filename, graph)?;
    // We need the tempfile filename in order to open it with an associated application
    let mut temp_file = NamedTempFile::new()?;
    let path = format!("{}.dot", temp_file.path().display());
    write!(temp_file, "{}", graphviz_string)?;
    temp_file.persist(&path)?;
    open::that(&path)?;
    Ok(())
}

fn render(config_filename: &str, graph: Graph) -> Result<String, Box<dyn Error>> {
    let config = GrammarConfig::load(config_filename)?;
    Ok(match graph {
        Graph::Lalr => render_lalr_graph(&config.parse_table()?),
        Graph::Dfa => render_dfa_graph(&config.lexer()),
    })
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_label(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn render_lalr_graph(parse_table: &ParseTable) -> String {
    let mut lines = Vec::new();
    lines.push("digraph lalr_states {".to_owned());
    for (state_idx, state) in parse_table.states.iter().enumerate() {
        // Create graphviz box with table for the state
        let table_rows: Vec<String> = state
            .items
            .iter()
            .map(|item| {
                let mut la_string = escape_html(&item.lookahead_string());
                if item.is_pos_at_end(&parse_table.grammar) {
                    // Use underline to mark a reduce action
                    la_string = format!("<U>{}</U>", la_string);
                }
                format!(
                    "      <TR><TD>{}</TD><TD>{}</TD></TR>",
                    escape_html(&item.augmented_rule_string(&parse_table.grammar)),
                    la_string
                )
            })
            .collect();
        let table_row_string = table_rows.join("\n");
        let table_head = format!(
            "      <TR><TD><B>State #{}</B></TD><TD><B>Lookahead</B></TD></TR>",
            state_idx
        );
        let line = format!(
            r#"  State{} [shape=plain label=<
    <TABLE BORDER="0" CELLBORDER="1" CELLSPACING="0">
{}
{}
    </TABLE>
  >];"#,
            state_idx, table_head, table_row_string
        );
        lines.push(line);
        // Create state transitions
        for (nonterminal, other_state_idx) in state.goto_map.iter() {
            lines.push(format!(
                r#"  State{} -> State{} [label="{}"];"#,
                state_idx,
                other_state_idx,
                escape_label(nonterminal)
            ))
        }
        for (terminal, action) in state.action_map.iter() {
            if let Action::Shift(other_state_idx) = action {
                lines.push(format!(
                    r#"  State{} -> State{} [label="{}"];"#,
                    state_idx,
                    other_state_idx,
                    escape_label(terminal)
                ))
            }
        }
    }
    lines.push("}".to_owned());
    lines.join("\n")
}

fn render_dfa_graph(lexer: &LexerTables) -> String {
    let mut lines = Vec::new();
    lines.push("digraph scanner_dfa {".to_owned());
    lines.push("  rankdir=LR;".to_owned());
    lines.push("  start [shape=point];".to_owned());
    lines.push("  start -> D0;".to_owned());
    for state in 0..lexer.state_count() {
        match lexer.accept_tags.get(&state) {
            Some(tag) => lines.push(format!(
                r#"  D{} [shape=doublecircle label="{}\n{}"];"#,
                state,
                state,
                escape_label(tag)
            )),
            None => lines.push(format!(r#"  D{} [shape=circle label="{}"];"#, state, state)),
        }
    }
    for (state, row) in lexer.table.iter() {
        // One edge per target state, labelled with every symbol leading there
        let mut targets: Vec<(usize, Vec<char>)> = Vec::new();
        for (&symbol, &next) in row.iter() {
            match targets.iter_mut().find(|(target, _)| *target == next) {
                Some((_, symbols)) => symbols.push(symbol),
                None => targets.push((next, vec![symbol])),
            }
        }
        for (next, symbols) in targets {
            let label: String = symbols.into_iter().collect();
            lines.push(format!(
                r#"  D{} -> D{} [label="{}"];"#,
                state,
                next,
                escape_label(&label)
            ));
        }
    }
    lines.push("}".to_owned());
    lines.join("\n")
}
