//! Trace parser execution for debugging.

use std::path::PathBuf;
use std::sync::Arc;

use sylva_core::Colors;
use sylva_runtime::{Parser, PrintTracer, Verbosity};

use super::grammar_loader::load_grammar;
use super::source_loader::load_source;
use super::tree_output::dump_tree;

pub struct TraceArgs {
    pub grammar: PathBuf,
    pub source_path: PathBuf,
    pub verbosity: Verbosity,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let table = load_grammar(&args.grammar).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });
    let source = load_source(&args.source_path).unwrap_or_else(|msg| {
        eprintln!("error: {}", msg);
        std::process::exit(1);
    });

    let colors = Colors::new(args.color);
    let mut tracer = PrintTracer::new(&table, &source, args.verbosity, colors);
    let mut parser = Parser::new(Arc::clone(&table));
    let result = parser.parse_with_tracer(&source, None, &mut tracer);
    tracer.print();

    let tree = match result {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    println!("{}---{}", colors.dim, colors.reset);
    print!("{}", dump_tree(&tree, true));
    if tree.has_error() {
        std::process::exit(1);
    }
}
