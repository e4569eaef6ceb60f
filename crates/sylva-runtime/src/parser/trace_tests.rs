use sylva_core::Colors;

use crate::test_utils::hello;
use crate::{Parser, PrintTracer, Verbosity};

fn trace(text: &str, verbosity: Verbosity) -> String {
    let table = hello();
    let mut tracer = PrintTracer::new(&table, text, verbosity, Colors::OFF);
    Parser::new(table.clone())
        .parse_with_tracer(text, None, &mut tracer)
        .unwrap();
    tracer.lines().join("\n")
}

#[test]
fn default_shows_parser_steps() {
    insta::assert_snapshot!(trace("hello", Verbosity::Default), @r#"
    0   shift   "hello" → 2
    2   reduce  source_file (1) → 1
    1   accept
    "#);
}

#[test]
fn verbose_adds_tokens() {
    insta::assert_snapshot!(trace("hello", Verbosity::Verbose), @r#"
    0   lex     "hello" 0..5
    0   shift   "hello" → 2
    2   lex     end 5..5
    2   reduce  source_file (1) → 1
    1   accept
    "#);
}

#[test]
fn very_verbose_adds_modes_and_text() {
    insta::assert_snapshot!(trace("hello", Verbosity::VeryVerbose), @r#"
    0   lex     "hello" 0..5 mode 0 "hello"
    0   shift   "hello" → 2
    2   lex     end 5..5 mode 1 ""
    2   reduce  source_file (1) → 1
    1   accept
    "#);
}

#[test]
fn recoveries_are_traced() {
    insta::assert_snapshot!(trace("", Verbosity::Default), @"0   recover wrap 0..0");
    insta::assert_snapshot!(trace("hellox", Verbosity::Default), @r#"
    0   shift   "hello" → 2
    2   recover skip 5..6
    2   reduce  source_file (1) → 1
    1   accept
    "#);
}
