use std::path::PathBuf;

use sylva_runtime::Parser;

use super::diagnostics::{render_errors, syntax_errors};
use super::grammar_loader::load_grammar;
use super::source_loader::load_source;
use super::tree_output::{dump_tree, tree_json};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Tree { spans: bool },
    Json,
    None,
}

pub struct ParseArgs {
    pub grammar: PathBuf,
    pub source_path: PathBuf,
    pub format: OutputFormat,
    pub color: bool,
}

pub fn run(args: ParseArgs) {
    let table = load_grammar(&args.grammar).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });
    let source = load_source(&args.source_path).unwrap_or_else(|msg| {
        eprintln!("error: {}", msg);
        std::process::exit(1);
    });

    let tree = match Parser::new(table).parse(&source, None) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    match args.format {
        OutputFormat::Tree { spans } => print!("{}", dump_tree(&tree, spans)),
        OutputFormat::Json => println!("{}", tree_json(&tree, &source)),
        OutputFormat::None => {}
    }

    if tree.has_error() {
        let path = args.source_path.to_string_lossy();
        let errors = syntax_errors(&tree);
        eprint!("{}", render_errors(&source, &path, &errors, args.color));
        std::process::exit(1);
    }
}
