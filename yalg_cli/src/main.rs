use std::env;
use std::error::Error;
use std::process;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::LevelFilter;

mod config;
mod graphviz;
mod run;
mod table;

fn main() {
    if let Err(err) = cli() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn config_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("config")
        .help("JSON grammar configuration")
        .required(true)
}

fn init_logging(matches: &ArgMatches) {
    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn cli() -> Result<(), Box<dyn Error>> {
    let matches = App::new("yalg_cli")
        .about("Generates scanners and LALR(1) parsers from JSON grammar configurations")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Increase log verbosity, may be repeated"),
        )
        .subcommand(
            SubCommand::with_name("lexer")
                .arg(config_arg())
                .arg(
                    Arg::with_name("csv")
                        .long("--csv")
                        .takes_value(true)
                        .help("Write the transition table to a specified CSV file"),
                )
                .about("Prints the minimized DFA transition table of the lexical rules"),
        )
        .subcommand(
            SubCommand::with_name("table")
                .arg(config_arg())
                .arg(
                    Arg::with_name("csv")
                        .long("--csv")
                        .takes_value(true)
                        .help("Write the parse table to a specified CSV file"),
                )
                .arg(
                    Arg::with_name("json")
                        .long("--json")
                        .takes_value(true)
                        .conflicts_with("csv")
                        .help("Write the parse table to a specified JSON file"),
                )
                .about("Prints the LALR(1) parse table of the grammar rules"),
        )
        .subcommand(
            SubCommand::with_name("graph")
                .arg(config_arg())
                .arg(
                    Arg::with_name("dfa")
                        .long("--dfa")
                        .help("Draw the scanner DFA instead of the LALR(1) states"),
                )
                .arg(
                    Arg::with_name("output")
                        .long("--output")
                        .short("-o")
                        .takes_value(true)
                        .help("Write the generated graphviz graph to a file (*.dot)"),
                )
                .about("Outputs a graphviz graph of the LALR(1) states or the scanner DFA"),
        )
        .subcommand(
            SubCommand::with_name("parse")
                .arg(config_arg())
                .arg(
                    Arg::with_name("source")
                        .help("Source file to scan and parse")
                        .required(true),
                )
                .arg(
                    Arg::with_name("strict")
                        .long("--strict")
                        .help("Fail on characters no lexical rule matches instead of skipping them"),
                )
                .arg(
                    Arg::with_name("json")
                        .long("--json")
                        .help("Print the production trace and parse tree as JSON"),
                )
                .about("Scans and parses a source file"),
        )
        .subcommand(
            SubCommand::with_name("check")
                .arg(config_arg())
                .about("Runs the test cases of a configuration"),
        )
        .setting(AppSettings::ArgRequiredElseHelp)
        .get_matches();

    init_logging(&matches);

    match matches.subcommand() {
        ("lexer", Some(opts)) => {
            let filename = opts.value_of("config").unwrap_or_default();
            match opts.value_of("csv") {
                Some(csv_filename) => table::write_lexer_csv(filename, csv_filename)?,
                None => table::print_lexer_table(filename)?,
            }
        }
        ("table", Some(opts)) => {
            let filename = opts.value_of("config").unwrap_or_default();
            if let Some(csv_filename) = opts.value_of("csv") {
                table::write_table_csv(filename, csv_filename)?;
            } else if let Some(json_filename) = opts.value_of("json") {
                table::write_table_json(filename, json_filename)?;
            } else {
                table::print_table(filename)?;
            }
        }
        ("graph", Some(opts)) => {
            let filename = opts.value_of("config").unwrap_or_default();
            let graph = if opts.is_present("dfa") {
                graphviz::Graph::Dfa
            } else {
                graphviz::Graph::Lalr
            };
            match opts.value_of("output") {
                Some(output_filename) => {
                    graphviz::write_graphviz_graph(filename, graph, output_filename)?
                }
                None => graphviz::show_graphviz_graph(filename, graph)?,
            }
        }
        ("parse", Some(opts)) => {
            run::parse_source(
                opts.value_of("config").unwrap_or_default(),
                opts.value_of("source").unwrap_or_default(),
                opts.is_present("strict"),
                opts.is_present("json"),
            )?;
        }
        ("check", Some(opts)) => {
            run::check(opts.value_of("config").unwrap_or_default())?;
        }
        _ => {}
    }

    Ok(())
}
