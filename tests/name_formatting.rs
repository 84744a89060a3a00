use bibtex_core::diagnostics::CollectingSink;
use bibtex_core::name::{format_name, split_name, Name, NameFormat, NamePart};
use rstest::rstest;

fn split(name: &str) -> Name {
    let mut sink = CollectingSink::new();
    split_name(name, "t.bib", 1, 0, &mut sink)
}

#[test]
fn abbreviated_hyphenated_first_name_renders_each_component() {
    // "Jean-Paul Sartre" abbreviated first, each hyphen component gets its
    // own trailing period, joined by a literal hyphen.
    let n = split("Jean-Paul Sartre");
    let mut format = NameFormat::default();
    format.first.abbreviated = true;
    format.first.post_token = ".".into();
    format.last.pre_part = " ".into();
    assert_eq!(format_name(&n, &format), "J.-P. Sartre");
}

#[test]
fn last_first_order_with_comma_separator() {
    let n = split("Ford, Jr, Henry");
    let mut format = NameFormat::default();
    format.order = vec![NamePart::Last, NamePart::Jr, NamePart::First];
    format.jr.pre_part = ", ".into();
    format.first.pre_part = ", ".into();
    assert_eq!(format_name(&n, &format), "Ford, Jr, Henry");
}

#[test]
fn empty_parts_are_skipped_without_stray_separators() {
    let n = split("Beethoven");
    let mut format = NameFormat::default();
    format.von.pre_part = " ".into();
    format.last.pre_part = " ".into();
    assert_eq!(format_name(&n, &format), "Beethoven");
}

#[test]
fn special_character_first_initial_keeps_braces_balanced() {
    let n = split("{\\\"O}rjan Johansson");
    let mut format = NameFormat::default();
    format.first.abbreviated = true;
    format.first.post_token = ".".into();
    format.last.pre_part = " ".into();
    assert_eq!(format_name(&n, &format), "{\\\"O}. Johansson");
}

#[rstest]
#[case("Donald E. Knuth", true, "D. E. Knuth")]
#[case("Donald E. Knuth", false, "Donald E. Knuth")]
fn abbreviation_toggle_table(#[case] input: &str, #[case] abbreviated: bool, #[case] expected: &str) {
    let n = split(input);
    let mut format = NameFormat::default();
    format.first.abbreviated = abbreviated;
    if abbreviated {
        format.first.post_token = ".".into();
    }
    format.last.pre_part = " ".into();
    assert_eq!(format_name(&n, &format), expected);
}

#[test]
fn debug_snapshot_of_an_abbreviated_name_format() {
    let mut format = NameFormat::default();
    format.first.abbreviated = true;
    format.first.post_token = ".".into();
    insta::assert_debug_snapshot!(format);
}

proptest::proptest! {
    #[test]
    fn format_name_never_panics_on_arbitrary_split_names(s in "\\PC*") {
        let mut sink = CollectingSink::new();
        let n = split_name(&s, "t.bib", 1, 0, &mut sink);
        let format = NameFormat::default();
        let _ = format_name(&n, &format);
    }

    #[test]
    fn abbreviated_full_form_brace_count_is_balanced(s in "[A-Za-z ]{0,30}") {
        let n = split(&s);
        let mut format = NameFormat::default();
        format.first.abbreviated = true;
        format.von.abbreviated = true;
        format.last.abbreviated = true;
        format.von.pre_part = " ".into();
        format.last.pre_part = " ".into();
        let rendered = format_name(&n, &format);
        let open = rendered.chars().filter(|&c| c == '{').count();
        let close = rendered.chars().filter(|&c| c == '}').count();
        prop_assert_eq!(open, close);
    }
}
