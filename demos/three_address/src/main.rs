use std::env;
use std::error::Error;
use std::fs;
use std::process;

mod code;
mod translate;

use crate::translate::Translator;

const DEMO_PROGRAM: &str = "\
begin
  i := 0;
  while i < n and not done = 1 do
    begin
      s := s + i * 2;
      i := i + 1
    end;
  if s > 100 or i = n then result := s
end";

fn run() -> Result<(), Box<dyn Error>> {
    let source = match env::args().nth(1) {
        Some(filename) => fs::read_to_string(filename)?,
        None => DEMO_PROGRAM.to_owned(),
    };
    let translator = Translator::new()?;
    log::info!(
        "{} and/or conflicts resolved by shifting",
        translator.parse_table().conflicts.len()
    );
    let code = translator.translate(&source)?;
    println!("{}", source.trim());
    println!();
    print!("{}", code);
    Ok(())
}

fn main() {
    pretty_env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
