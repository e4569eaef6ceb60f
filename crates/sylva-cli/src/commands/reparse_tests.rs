use sylva_core::Colors;

use super::reparse::reparse;
use super::test_utils::table;

#[test]
fn reports_reuse() {
    let old = "a = 1;\nb = 2;\nc = 3;\n";
    let new = "a = 1;\nb = 25;\nc = 3;\n";
    let report = reparse(&table(), old, new).unwrap();

    assert!(report.matches);
    assert!(!report.has_error);
    assert_eq!(report.edit.start_byte, 12);
    assert_eq!(report.edit.new_end_byte, 13);
    assert!(report.incremental.nodes_reused > 0);
    assert!(report.incremental.tokens_lexed < report.full.tokens_lexed);

    let rendered = report.render(Colors::OFF);
    assert!(rendered.starts_with("edit     12..12 → 12..13 (1:5 → 1:6)\n"), "{rendered}");
    assert!(rendered.ends_with("result   matches full parse\n"), "{rendered}");
}

#[test]
fn reports_recovery() {
    let report = reparse(&table(), "a = 1;", "a = ;").unwrap();
    assert!(report.matches);
    assert!(report.has_error);
    assert!(report.render(Colors::OFF).contains("recover  "));
}
