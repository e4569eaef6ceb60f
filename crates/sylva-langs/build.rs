use std::path::PathBuf;

use sylva_core::Grammar;

const GRAMMARS: &[&str] = &["veryl"];

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR not set");
    println!("cargo::rerun-if-changed=build.rs");

    for name in GRAMMARS {
        let source = PathBuf::from(&manifest_dir)
            .join("grammars")
            .join(format!("{name}.json"));
        println!("cargo::rerun-if-changed={}", source.display());

        let grammar = Grammar::from_path(&source)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", source.display()));
        let bytes = sylva_compiler::compile(&grammar)
            .unwrap_or_else(|e| panic!("failed to compile grammar '{name}': {e}"));

        let target = PathBuf::from(&out_dir).join(format!("{name}.sylt"));
        std::fs::write(&target, bytes)
            .unwrap_or_else(|e| panic!("failed to write {}: {e}", target.display()));
    }
}
