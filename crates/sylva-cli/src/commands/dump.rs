use std::path::PathBuf;

use sylva_core::Colors;
use sylva_table::dump;

use super::grammar_loader::load_grammar;

pub struct DumpArgs {
    pub grammar: PathBuf,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let table = match load_grammar(&args.grammar) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let colors = Colors::new(args.color);
    print!("{}", dump(&table, colors));
}
