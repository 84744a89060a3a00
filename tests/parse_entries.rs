use bibtex_core::ast::EntryMetatype;
use bibtex_core::diagnostics::CollectingSink;
use bibtex_core::postprocess::ParseOptions;
use bibtex_core::session::ParseSession;

fn parse(input: &str) -> (Vec<bibtex_core::Entry>, usize) {
    let mut session = ParseSession::new(Box::new(CollectingSink::new()));
    let entries = session.parse_all(input, "t.bib", ParseOptions::default());
    (entries, session.warning_count())
}

#[test]
fn parses_a_simple_article() {
    let (entries, warnings) = parse(
        r#"@article{knuth1984, title = "The TeXbook", year = 1984}"#,
    );
    assert_eq!(warnings, 0);
    assert_eq!(entries.len(), 1);
    let e = &entries[0];
    assert_eq!(e.metatype, EntryMetatype::Regular);
    assert_eq!(e.cite_key.as_deref(), Some("knuth1984"));
    assert_eq!(e.field("title").unwrap().value.parts[0].as_text(), "The TeXbook");
    assert_eq!(e.field("year").unwrap().value.parts[0].as_text(), "1984");
}

#[test]
fn parses_paren_delimited_entry() {
    let (entries, _) = parse(r#"@book(k, title = "A Book")"#);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].cite_key.as_deref(), Some("k"));
}

#[test]
fn trailing_comma_in_field_list_is_accepted() {
    let (entries, warnings) = parse(r#"@misc{k, note = "x",}"#);
    assert_eq!(warnings, 0);
    assert_eq!(entries.len(), 1);
}

#[test]
fn comment_entries_are_freeform_and_have_no_fields() {
    let (entries, _) = parse("@comment{anything at all, even = unbalanced text}");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].metatype, EntryMetatype::Comment);
    assert!(entries[0].fields.is_empty());
}

#[test]
fn preamble_entry_holds_a_single_value() {
    let (entries, _) = parse(r#"@preamble{"\newcommand{\noop}{}"}"#);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].metatype, EntryMetatype::Preamble);
}

#[test]
fn missing_closing_delimiter_recovers_to_the_next_entry() {
    let (entries, warnings) = parse(
        r#"@article{k, title = "A" @book{k2, title = "B"}"#,
    );
    assert!(warnings >= 1);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_type, "book");
}

#[test]
fn multiple_entries_all_parse() {
    let (entries, _) = parse(
        r#"
        @article{a, title = "A"}
        @article{b, title = "B"}
        @article{c, title = "C"}
        "#,
    );
    assert_eq!(entries.len(), 3);
}
