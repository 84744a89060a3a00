use bibtex_core::diagnostics::CollectingSink;
use bibtex_core::postprocess::ParseOptions;
use bibtex_core::session::ParseSession;

#[test]
fn macro_defined_then_used_expands_and_pastes() {
    // spec scenario 1: @string{and = " and "} then @string{names = "J" # and # "B"}
    let mut session = ParseSession::new(Box::new(CollectingSink::new()));
    session.parse_all(r#"@string{and = " and "}"#, "t.bib", ParseOptions::default());
    session.parse_all(
        r#"@string{names = "J" # and # "B"}"#,
        "t.bib",
        ParseOptions::default(),
    );
    assert_eq!(session.macro_text("names"), Some("J and B"));
}

#[test]
fn undefined_macro_in_a_regular_field_warns_and_becomes_empty() {
    let mut session = ParseSession::new(Box::new(CollectingSink::new()));
    let entries = session.parse_all(
        "@article{k, month = jan}",
        "t.bib",
        ParseOptions { expand: true, paste: true, ..ParseOptions::default() },
    );
    assert_eq!(entries[0].field("month").unwrap().value.parts[0].as_text(), "");
    assert!(session.warning_count() >= 1);
}

#[test]
fn macro_expansion_survives_a_second_round_without_panicking() {
    // spec scenario 2: the documented double-free regression.
    let mut session = ParseSession::new(Box::new(CollectingSink::new()));
    session.parse_all("@string{year = 1995}", "t.bib", ParseOptions::default());
    let entries = session.parse_all(
        "@article{k, year = year}",
        "t.bib",
        ParseOptions { expand: true, paste: true, ..ParseOptions::default() },
    );
    let once = &entries[0].field("year").unwrap().value;
    let twice = session.post_process_value(
        once,
        ParseOptions { expand: true, paste: true, ..ParseOptions::default() },
        "t.bib",
        1,
    );
    assert_eq!(twice.parts[0].as_text(), "1995");
}

#[test]
fn redefining_a_macro_warns_but_keeps_parsing() {
    let mut session = ParseSession::new(Box::new(CollectingSink::new()));
    session.parse_all(r#"@string{x = "one"}"#, "t.bib", ParseOptions::default());
    session.parse_all(r#"@string{x = "two"}"#, "t.bib", ParseOptions::default());
    assert_eq!(session.macro_text("x"), Some("two"));
    assert!(session.warning_count() >= 1);
}

#[test]
fn deleting_a_macro_makes_it_undefined_again() {
    let mut session = ParseSession::new(Box::new(CollectingSink::new()));
    session.add_macro_text("jan", "January".into(), "t.bib", 1);
    assert_eq!(session.macro_length("jan"), 7);
    session.delete_macro("jan");
    assert_eq!(session.macro_text("jan"), None);
    assert_eq!(session.macro_length("jan"), 0);
}
