//! Human-readable table listing for `sylva dump`.

use std::fmt::Write as _;

use sylva_core::Colors;

use crate::ids::{StateId, Symbol};
use crate::table::GrammarTable;
use crate::types::{Action, SymbolInfo};

pub fn dump(table: &GrammarTable, colors: Colors) -> String {
    let mut out = String::new();
    let c = colors;

    writeln!(out, "{}[grammar]{}", c.dim, c.reset).unwrap();
    writeln!(out, "name    = {}{}{}", c.blue, table.name(), c.reset).unwrap();
    writeln!(out, "version = {}", table.version()).unwrap();
    writeln!(
        out,
        "start   = {}{}{}",
        c.blue,
        table.symbol_name(table.start_symbol()),
        c.reset
    )
    .unwrap();

    dump_symbols(&mut out, table, c);
    dump_fields(&mut out, table, c);
    dump_productions(&mut out, table, c);
    dump_states(&mut out, table, c);
    dump_lex_modes(&mut out, table, c);

    out
}

fn width(count: usize) -> usize {
    count.max(1).ilog10() as usize + 1
}

fn symbol_label(info: &SymbolInfo, c: Colors) -> String {
    if info.literal {
        format!("{}{:?}{}", c.green, info.name, c.reset)
    } else if info.name == "ERROR" && info.terminal {
        format!("{}{}{}", c.red, info.name, c.reset)
    } else {
        format!("{}{}{}", c.blue, info.name, c.reset)
    }
}

fn label(table: &GrammarTable, symbol: Symbol, c: Colors) -> String {
    table
        .symbol(symbol)
        .map_or_else(|| format!("#{}", symbol.0), |info| symbol_label(info, c))
}

fn dump_symbols(out: &mut String, table: &GrammarTable, c: Colors) {
    let w = width(table.symbol_count());
    writeln!(out, "\n{}[symbols]{}", c.dim, c.reset).unwrap();

    for (symbol, info) in table.symbols() {
        let mut flags = Vec::new();
        flags.push(if info.terminal { "terminal" } else { "rule" });
        if info.named {
            flags.push("named");
        }
        if !info.visible {
            flags.push("hidden");
        }
        if info.extra {
            flags.push("extra");
        }
        if info.immediate {
            flags.push("immediate");
        }

        write!(
            out,
            "{}{:>w$}{} {} {}{}{}",
            c.dim,
            symbol.0,
            c.reset,
            symbol_label(info, c),
            c.dim,
            flags.join(" "),
            c.reset
        )
        .unwrap();
        if let Some(lexeme) = table.lexeme(symbol) {
            write!(out, " /{}/", lexeme.pattern()).unwrap();
        }
        if info.lex_prec != 0 {
            write!(out, " prec={}", info.lex_prec).unwrap();
        }
        out.push('\n');
    }
}

fn dump_fields(out: &mut String, table: &GrammarTable, c: Colors) {
    if table.field_count() == 0 {
        return;
    }
    writeln!(out, "\n{}[fields]{}", c.dim, c.reset).unwrap();
    for i in 1..=table.field_count() {
        let Some(id) = std::num::NonZeroU16::new(i as u16) else {
            continue;
        };
        let name = table.field_name(id).unwrap_or_default();
        writeln!(out, "{}{i}{} {name}", c.dim, c.reset).unwrap();
    }
}

fn dump_productions(out: &mut String, table: &GrammarTable, c: Colors) {
    let w = width(table.production_count());
    writeln!(out, "\n{}[productions]{}", c.dim, c.reset).unwrap();

    for id in 0..table.production_count() {
        let Some(production) = table.production(id as u16) else {
            continue;
        };
        write!(
            out,
            "{}{:>w$}{} {} ({} children)",
            c.dim,
            id,
            c.reset,
            label(table, production.lhs, c),
            production.child_count()
        )
        .unwrap();

        let fields: Vec<String> = production
            .fields
            .iter()
            .enumerate()
            .filter_map(|(i, field)| {
                let name = table.field_name((*field)?)?;
                Some(format!("{i}:{name}"))
            })
            .collect();
        if !fields.is_empty() {
            write!(out, " {}", fields.join(" ")).unwrap();
        }
        out.push('\n');
    }
}

fn dump_states(out: &mut String, table: &GrammarTable, c: Colors) {
    let w = width(table.state_count());
    writeln!(out, "\n{}[states]{}", c.dim, c.reset).unwrap();

    for state in 0..table.state_count() as StateId {
        writeln!(
            out,
            "{}{:>w$}{} {}lex mode {}{}",
            c.dim,
            state,
            c.reset,
            c.dim,
            table.lex_mode(state),
            c.reset
        )
        .unwrap();

        for &(symbol, action) in table.actions(state) {
            let action = match action {
                Action::Shift(target) => format!("shift {target}"),
                Action::Reduce(production) => format!("reduce {production}"),
                Action::Accept => "accept".to_owned(),
                Action::Goto(target) => format!("goto {target}"),
            };
            writeln!(out, "{:w$}   {} → {}", "", label(table, symbol, c), action).unwrap();
        }
    }
}

fn dump_lex_modes(out: &mut String, table: &GrammarTable, c: Colors) {
    writeln!(out, "\n{}[lex_modes]{}", c.dim, c.reset).unwrap();

    for mode in 0..table.lex_mode_count() {
        write!(out, "{}{mode}{}", c.dim, c.reset).unwrap();
        for &symbol in table.lex_mode_symbols(mode as u16) {
            write!(out, " {}", label(table, symbol, c)).unwrap();
        }
        out.push('\n');
    }
}
