//! Export tests (AST → markdown) and the parse/serialize round-trip law.

use contract_editor::{parse, serialize};

use crate::common::fixture;

#[test]
fn strong_scenario_is_byte_identical() {
    let doc = parse("**hello world**").unwrap();
    let md = serialize(&doc).unwrap();
    assert_eq!(md, "**hello world**\n");
}

#[test]
fn fixture_round_trips_structurally() {
    let source = fixture("acceptance-of-delivery.md");
    let doc = parse(&source).unwrap();
    let md = serialize(&doc).unwrap();
    assert_eq!(parse(&md).unwrap(), doc);
}

#[test]
fn serialized_output_is_a_fixpoint() {
    // once normalized, serialize ∘ parse changes nothing
    let source = fixture("acceptance-of-delivery.md");
    let first = serialize(&parse(&source).unwrap()).unwrap();
    let second = serialize(&parse(&first).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unaffected_regions_round_trip_byte_for_byte() {
    // a normalized document re-emits its clause region verbatim
    let source = fixture("acceptance-of-delivery.md");
    let normalized = serialize(&parse(&source).unwrap()).unwrap();
    let clause_region: Vec<&str> = normalized
        .lines()
        .skip_while(|line| !line.starts_with("<!-- clause id=shipment-1"))
        .take_while(|line| !line.starts_with("<!-- /clause shipment-1"))
        .collect();
    assert!(!clause_region.is_empty());
    let again = serialize(&parse(&normalized).unwrap()).unwrap();
    for line in clause_region {
        assert!(again.contains(line), "line {line:?} must survive");
    }
}

#[test]
fn block_separators_normalize_to_one_blank_line() {
    let doc = parse("alpha\n\n\n\nbeta\n\n\ngamma\n").unwrap();
    assert_eq!(serialize(&doc).unwrap(), "alpha\n\nbeta\n\ngamma\n");
}

#[test]
fn output_ends_with_exactly_one_newline() {
    let doc = parse("only line").unwrap();
    let md = serialize(&doc).unwrap();
    assert!(md.ends_with('\n'));
    assert!(!md.ends_with("\n\n"));
}

#[test]
fn heading_levels_survive() {
    for source in ["# one\n", "## two\n", "### three\n"] {
        let doc = parse(source).unwrap();
        let md = serialize(&doc).unwrap();
        assert_eq!(parse(&md).unwrap(), doc, "source {source:?}");
    }
}

#[test]
fn nested_emphasis_survives() {
    for source in [
        "***both***\n",
        "**bold *and italic* inside**\n",
        "*italic **and bold** inside*\n",
        "plain **bold** plain *italic* plain\n",
    ] {
        let doc = parse(source).unwrap();
        let md = serialize(&doc).unwrap();
        assert_eq!(parse(&md).unwrap(), doc, "source {source:?}");
    }
}

#[test]
fn link_round_trips_with_and_without_title() {
    for source in [
        "[text](https://example.com)\n",
        "[text](https://example.com \"A Title\")\n",
        "before [text](https://example.com) after\n",
    ] {
        let doc = parse(source).unwrap();
        let md = serialize(&doc).unwrap();
        assert_eq!(parse(&md).unwrap(), doc, "source {source:?}");
    }
}
