//! Section assembly and header generation.

use sylva_table::{Header, SECTION_ALIGN, action_kind, symbol_flags};

use super::regex_table::RegexTableBuilder;
use super::string_table::StringTableBuilder;
use crate::lalr::{ParseTable, TableAction};
use crate::lower::LoweredGrammar;
use crate::{Error, Result};

/// Serialize a lowered grammar and its parse table.
pub(crate) fn emit(grammar: &LoweredGrammar, table: &ParseTable) -> Result<Vec<u8>> {
    let mut strings = StringTableBuilder::new();
    let mut regexes = RegexTableBuilder::new();
    let name = strings.intern(&grammar.name)?;

    let mut symbols = Vec::with_capacity(grammar.symbols.len() * 8);
    for symbol in &grammar.symbols {
        let name = strings.intern(&symbol.name)?;
        let mut flags = 0u8;
        let mut lexeme = 0u16;
        let mut lex_prec = 0i16;
        if symbol.terminal {
            flags |= symbol_flags::TERMINAL;
        }
        if symbol.named {
            flags |= symbol_flags::NAMED;
        }
        if symbol.visible {
            flags |= symbol_flags::VISIBLE;
        }
        if symbol.extra {
            flags |= symbol_flags::EXTRA;
        }
        if let Some(token) = symbol.lexeme() {
            if token.literal {
                flags |= symbol_flags::LITERAL;
            }
            if token.immediate {
                flags |= symbol_flags::IMMEDIATE;
            }
            let pattern = strings.intern(&token.pattern)?;
            lexeme = regexes.intern(&token.pattern, pattern, &symbol.name)?;
            lex_prec = token.prec;
        }
        symbols.extend_from_slice(&name.to_le_bytes());
        symbols.push(flags);
        symbols.push(0);
        symbols.extend_from_slice(&lexeme.to_le_bytes());
        symbols.extend_from_slice(&lex_prec.to_le_bytes());
    }

    let mut fields = Vec::with_capacity(grammar.fields.len() * 2);
    for field in &grammar.fields {
        fields.extend_from_slice(&strings.intern(field)?.to_le_bytes());
    }

    let mut productions = Vec::with_capacity(grammar.productions.len() * 8);
    let mut production_fields = Vec::new();
    let mut production_fields_count = 0u32;
    for production in &grammar.productions {
        let child_count = u16::try_from(production.rhs.len()).map_err(|_| Error::TooMany {
            what: "children in one production",
            count: production.rhs.len(),
        })?;
        productions.extend_from_slice(&production.lhs.0.to_le_bytes());
        productions.extend_from_slice(&child_count.to_le_bytes());
        productions.extend_from_slice(&production_fields_count.to_le_bytes());
        for field in &production.fields {
            let raw = field.map_or(0, |f| f.get());
            production_fields.extend_from_slice(&raw.to_le_bytes());
        }
        production_fields_count += child_count as u32;
    }

    let mut states = Vec::with_capacity(table.states.len() * 8);
    let mut actions = Vec::new();
    let mut actions_count = 0u32;
    for state in &table.states {
        let mut entries: Vec<(u16, u8, u16)> = state
            .actions
            .iter()
            .map(|(symbol, action)| match *action {
                TableAction::Shift(target) => (symbol.0, action_kind::SHIFT, target),
                TableAction::Reduce(production) => (symbol.0, action_kind::REDUCE, production),
                TableAction::Accept => (symbol.0, action_kind::ACCEPT, 0),
            })
            .chain(
                state
                    .gotos
                    .iter()
                    .map(|(symbol, &target)| (symbol.0, action_kind::GOTO, target)),
            )
            .collect();
        entries.sort_by_key(|&(symbol, _, _)| symbol);

        let actions_len = u16::try_from(entries.len()).map_err(|_| Error::TooMany {
            what: "actions in one state",
            count: entries.len(),
        })?;
        states.extend_from_slice(&actions_count.to_le_bytes());
        states.extend_from_slice(&actions_len.to_le_bytes());
        states.extend_from_slice(&state.lex_mode.to_le_bytes());

        for (symbol, kind, value) in entries {
            actions.extend_from_slice(&symbol.to_le_bytes());
            actions.push(kind);
            actions.push(0);
            actions.extend_from_slice(&value.to_le_bytes());
            actions.extend_from_slice(&0u16.to_le_bytes());
        }
        actions_count += actions_len as u32;
    }

    let mut lex_modes = Vec::with_capacity(table.lex_modes.len() * 8);
    let mut lex_mode_symbols = Vec::new();
    let mut lex_mode_symbols_count = 0u32;
    for mode in &table.lex_modes {
        lex_modes.extend_from_slice(&lex_mode_symbols_count.to_le_bytes());
        lex_modes.extend_from_slice(&(mode.len() as u16).to_le_bytes());
        lex_modes.extend_from_slice(&[0; 2]);
        for symbol in mode {
            lex_mode_symbols.extend_from_slice(&symbol.0.to_le_bytes());
        }
        lex_mode_symbols_count += mode.len() as u32;
    }

    let (str_blob, str_table) = strings.emit();
    let (regex_blob, regex_table) = regexes.emit();

    // Header → StringBlob → RegexBlob → StringTable → RegexTable → Symbols →
    // Fields → Productions → ProductionFields → States → Actions →
    // LexModes → LexModeSymbols
    let mut output = vec![0u8; 64];
    emit_section(&mut output, &str_blob);
    emit_section(&mut output, &regex_blob);
    emit_section(&mut output, &str_table);
    emit_section(&mut output, &regex_table);
    emit_section(&mut output, &symbols);
    emit_section(&mut output, &fields);
    emit_section(&mut output, &productions);
    emit_section(&mut output, &production_fields);
    emit_section(&mut output, &states);
    emit_section(&mut output, &actions);
    emit_section(&mut output, &lex_modes);
    emit_section(&mut output, &lex_mode_symbols);
    pad_to_section(&mut output);

    let total_size = u32::try_from(output.len()).map_err(|_| Error::TooMany {
        what: "table bytes",
        count: output.len(),
    })?;

    let mut header = Header {
        total_size,
        str_blob_size: str_blob.len() as u32,
        regex_blob_size: regex_blob.len() as u32,
        actions_count,
        production_fields_count,
        lex_mode_symbols_count,
        str_table_count: strings.len() as u16,
        regex_table_count: regexes.len() as u16,
        symbols_count: grammar.symbols.len() as u16,
        fields_count: grammar.fields.len() as u16,
        productions_count: u16::try_from(grammar.productions.len()).map_err(|_| {
            Error::TooMany {
                what: "productions",
                count: grammar.productions.len(),
            }
        })?,
        states_count: table.states.len() as u16,
        lex_modes_count: table.lex_modes.len() as u16,
        name,
        start_symbol: grammar.start.0,
        ..Default::default()
    };
    header.checksum = crc32fast::hash(&output[64..]);
    output[..64].copy_from_slice(&header.to_bytes());

    tracing::debug!(
        bytes = output.len(),
        strings = strings.len(),
        regexes = regexes.len() - 1,
        "emitted grammar table"
    );
    Ok(output)
}

fn emit_section(output: &mut Vec<u8>, section: &[u8]) {
    pad_to_section(output);
    output.extend_from_slice(section);
}

/// Pad a buffer to the section alignment boundary.
fn pad_to_section(buf: &mut Vec<u8>) {
    let rem = buf.len() % SECTION_ALIGN;
    if rem != 0 {
        buf.resize(buf.len() + SECTION_ALIGN - rem, 0);
    }
}
