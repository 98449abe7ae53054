use std::error::Error;
use std::fs::{self, File};

use prettytable as pt;
use prettytable::cell;
use prettytable::row;

use yalg_core::{LexerTables, ParseTable};

use crate::config::GrammarConfig;

pub fn print_table(config_filename: &str) -> Result<(), Box<dyn Error>> {
    let parse_table = GrammarConfig::load(config_filename)?.parse_table()?;
    let pretty_table = generate_pretty_table(&parse_table);
    println!("{}", pretty_table);
    print_conflicts(&parse_table);
    Ok(())
}

pub fn write_table_csv(config_filename: &str, csv_filename: &str) -> Result<(), Box<dyn Error>> {
    let parse_table = GrammarConfig::load(config_filename)?.parse_table()?;
    let pretty_table = generate_pretty_table(&parse_table);
    let csv_file = File::create(csv_filename)?;
    pretty_table.to_csv(csv_file)?;
    print_conflicts(&parse_table);
    Ok(())
}

pub fn write_table_json(config_filename: &str, json_filename: &str) -> Result<(), Box<dyn Error>> {
    let parse_table = GrammarConfig::load(config_filename)?.parse_table()?;
    fs::write(json_filename, serde_json::to_string_pretty(&parse_table)?)?;
    print_conflicts(&parse_table);
    Ok(())
}

pub fn print_lexer_table(config_filename: &str) -> Result<(), Box<dyn Error>> {
    let lexer = GrammarConfig::load(config_filename)?.lexer();
    println!("{}", generate_lexer_table(&lexer));
    println!(
        "{} NFA states, {} DFA states, {} minimized states",
        lexer.stats.nfa_states, lexer.stats.dfa_states, lexer.stats.minimized_states
    );
    for fallback in lexer.fallbacks.iter() {
        println!("Warning: {}, matched literally", fallback);
    }
    Ok(())
}

pub fn write_lexer_csv(config_filename: &str, csv_filename: &str) -> Result<(), Box<dyn Error>> {
    let lexer = GrammarConfig::load(config_filename)?.lexer();
    let csv_file = File::create(csv_filename)?;
    generate_lexer_table(&lexer).to_csv(csv_file)?;
    Ok(())
}

fn print_conflicts(parse_table: &ParseTable) {
    println!(
        "{} LR(1) states merged into {} LALR(1) states",
        parse_table.lr1_state_count,
        parse_table.lalr_state_count()
    );
    if parse_table.conflicts.is_empty() {
        return;
    }
    println!("Grammar is not LALR(1):");
    for conflict in parse_table.conflicts.iter() {
        println!("  {}", conflict);
    }
}

fn generate_pretty_table(parse_table: &ParseTable) -> pt::Table {
    let mut table = pt::Table::new();

    let mut title_row = row!["#", "LALR item closure", "Lookahead"];

    for t in parse_table.grammar.terminals.iter() {
        title_row.add_cell(cell!(t));
    }

    for n in parse_table.grammar.nonterminals.iter() {
        title_row.add_cell(cell!(n));
    }

    table.add_row(title_row);

    for (i, state) in parse_table.states.iter().enumerate() {
        let (items, lookaheads): (Vec<_>, Vec<_>) = state
            .items
            .iter()
            .map(|item| {
                (
                    item.augmented_rule_string(&parse_table.grammar),
                    item.lookahead_string(),
                )
            })
            .unzip();

        let mut row = row![i, items.join("\n"), lookaheads.join("\n")];

        for t in parse_table.grammar.terminals.iter() {
            row.add_cell(cell![state
                .action_map
                .get(t)
                .map_or("".to_owned(), |a| a.to_string())]);
        }

        for n in parse_table.grammar.nonterminals.iter() {
            row.add_cell(cell![state
                .goto_map
                .get(n)
                .map_or("".to_owned(), |idx| idx.to_string())]);
        }

        table.add_row(row);
    }

    table
}

fn generate_lexer_table(lexer: &LexerTables) -> pt::Table {
    let mut table = pt::Table::new();

    let mut title_row = row!["#", "Accepts"];
    for c in lexer.alphabet.iter() {
        title_row.add_cell(cell!(format!("{:?}", c)));
    }
    table.add_row(title_row);

    for state in 0..lexer.state_count() {
        let accepts = lexer.accept_tags.get(&state).cloned().unwrap_or_default();
        let mut row = row![state, accepts];
        let transitions = lexer.table.get(&state);
        for c in lexer.alphabet.iter() {
            row.add_cell(cell![transitions
                .and_then(|row| row.get(c))
                .map_or("".to_owned(), |next| next.to_string())]);
        }
        table.add_row(row);
    }

    table
}
