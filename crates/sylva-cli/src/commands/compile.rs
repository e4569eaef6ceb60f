use std::path::PathBuf;

use super::grammar_loader::compile_grammar;

pub struct CompileArgs {
    pub grammar_path: PathBuf,
    pub output: PathBuf,
    pub color: bool,
}

pub fn run(args: CompileArgs) {
    let bytes = match compile_grammar(&args.grammar_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::write(&args.output, &bytes) {
        eprintln!("error: failed to write '{}': {}", args.output.display(), e);
        std::process::exit(1);
    }

    let colors = sylva_core::Colors::new(args.color);
    eprintln!(
        "{}compiled{} {} ({} bytes)",
        colors.green,
        colors.reset,
        args.output.display(),
        bytes.len()
    );
}
