//! Clause fence parsing and fidelity.

use contract_editor::ast::BlockNode;
use contract_editor::{parse, serialize, EditorError};

#[test]
fn fence_attributes_survive_a_round_trip_unchanged() {
    let source = "<!-- clause id=pay-1 type=payment locked=true -->\n\nPay on time.\n\n<!-- /clause pay-1 -->\n";
    let md = serialize(&parse(source).unwrap()).unwrap();
    assert!(md.contains("<!-- clause id=pay-1 type=payment locked=true -->"));
    assert!(md.contains("<!-- /clause pay-1 -->"));
}

#[test]
fn bare_close_fences_are_accepted() {
    let source = "<!-- clause id=a type=b -->\n\nbody\n\n<!-- /clause -->\n";
    let doc = parse(source).unwrap();
    match &doc.children[0] {
        BlockNode::Clause(clause) => assert_eq!(clause.id, "a"),
        other => panic!("expected clause, found {other:?}"),
    }
}

#[test]
fn nested_fences_close_innermost_first() {
    let source = "<!-- clause id=outer type=t -->\n\n<!-- clause id=inner type=t -->\n\ndeep\n\n<!-- /clause -->\n\n<!-- /clause -->\n";
    let doc = parse(source).unwrap();
    match &doc.children[0] {
        BlockNode::Clause(outer) => {
            assert_eq!(outer.id, "outer");
            match &outer.children[0] {
                BlockNode::Clause(inner) => assert_eq!(inner.id, "inner"),
                other => panic!("expected inner clause, found {other:?}"),
            }
        }
        other => panic!("expected clause, found {other:?}"),
    }
}

#[test]
fn unbalanced_fences_fail_with_parse_error_only() {
    for source in [
        "<!-- clause id=a type=b -->\n\norphan open\n",
        "orphan close\n\n<!-- /clause -->\n",
        "<!-- clause id=a type=b -->\n\nbody\n\n<!-- /clause wrong -->\n",
    ] {
        match parse(source) {
            Err(EditorError::Parse(_)) => {}
            other => panic!("source {source:?}: expected parse error, found {other:?}"),
        }
    }
}

#[test]
fn malformed_open_fences_degrade_like_comments() {
    // no id/type pairs: not a fence, just an invisible comment
    let doc = parse("<!-- clause without attributes -->\n\ntext\n").unwrap();
    assert_eq!(doc.children.len(), 1);
    assert!(matches!(doc.children[0], BlockNode::Paragraph(_)));
}

#[test]
fn empty_clauses_are_legal() {
    let source = "<!-- clause id=todo type=placeholder -->\n\n<!-- /clause todo -->\n";
    let doc = parse(source).unwrap();
    match &doc.children[0] {
        BlockNode::Clause(clause) => assert!(clause.children.is_empty()),
        other => panic!("expected clause, found {other:?}"),
    }
    let md = serialize(&doc).unwrap();
    assert_eq!(parse(&md).unwrap(), doc);
}

#[test]
fn clause_round_trip_preserves_the_absent_locked_attribute() {
    let source = "<!-- clause id=a type=b -->\n\nbody\n\n<!-- /clause a -->\n";
    let doc = parse(source).unwrap();
    match &doc.children[0] {
        BlockNode::Clause(clause) => assert_eq!(clause.locked, None),
        other => panic!("expected clause, found {other:?}"),
    }
    let md = serialize(&doc).unwrap();
    assert!(md.contains("<!-- clause id=a type=b -->"));
    assert_eq!(parse(&md).unwrap(), doc);
}
