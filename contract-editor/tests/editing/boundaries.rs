//! Clause-boundary behavior: structural atomicity under deletion.

use contract_editor::boundary::{can_delete, normalize_deletion};
use contract_editor::{collect_runs, parse, EditorOptions, Intent};

use crate::common::{controller_with, run_selection, set_range};

const THREE_PARTS: &str = "before the clause\n\n<!-- clause id=pay type=payment locked=false -->\n\npayment clause body\n\n<!-- /clause pay -->\n\nafter the clause\n";

#[test]
fn deletion_reaching_into_a_clause_swallows_it_whole() {
    let mut controller = controller_with(THREE_PARTS, EditorOptions::default());
    // from inside "before the clause" into the middle of the clause body
    set_range(&mut controller, (0, 6), (1, 7));
    let outcome = controller.on_intent(Intent::DeleteRange).unwrap();
    assert!(!outcome.markdown.contains("clause id=pay"));
    assert!(!outcome.markdown.contains("payment clause body"));
    assert!(outcome.markdown.contains("after the clause"));
    // no dangling fences of any kind
    assert!(!outcome.markdown.contains("<!--"));
}

#[test]
fn deletion_leaving_a_clause_also_swallows_it() {
    let mut controller = controller_with(THREE_PARTS, EditorOptions::default());
    // from the middle of the clause body into "after the clause"
    set_range(&mut controller, (1, 8), (2, 5));
    let outcome = controller.on_intent(Intent::DeleteRange).unwrap();
    assert!(!outcome.markdown.contains("clause id=pay"));
    assert!(outcome.markdown.contains("before the clause"));
}

#[test]
fn deletion_inside_a_clause_stays_inside() {
    let mut controller = controller_with(THREE_PARTS, EditorOptions::default());
    // "clause " within the body
    set_range(&mut controller, (1, 8), (1, 15));
    let outcome = controller.on_intent(Intent::DeleteRange).unwrap();
    assert!(outcome.markdown.contains("clause id=pay"));
    assert!(outcome.markdown.contains("payment body"));
}

#[test]
fn covering_deletion_needs_no_widening() {
    let doc = parse(THREE_PARTS).unwrap();
    let mut keys = contract_editor::KeyAllocator::new();
    let tree = contract_editor::ast_to_tree(&doc, &mut keys, &contract_editor::LockOptions::default());
    let runs = collect_runs(&tree);
    let covering = run_selection(&tree, (1, 0), (1, runs[1].len));
    assert!(can_delete(&tree, &covering));
    assert_eq!(normalize_deletion(&tree, &covering).unwrap(), covering);
}

#[test]
fn partial_overlap_fails_can_delete_until_normalized() {
    let doc = parse(THREE_PARTS).unwrap();
    let mut keys = contract_editor::KeyAllocator::new();
    let tree = contract_editor::ast_to_tree(&doc, &mut keys, &contract_editor::LockOptions::default());
    let partial = run_selection(&tree, (0, 3), (1, 4));
    assert!(!can_delete(&tree, &partial));
    let widened = normalize_deletion(&tree, &partial).unwrap();
    assert_ne!(widened, partial);
    assert!(can_delete(&tree, &widened));
}

#[test]
fn nested_clause_deletion_keeps_the_outer_clause_balanced() {
    let source = "<!-- clause id=outer type=section locked=false -->\n\nlead text\n\n<!-- clause id=inner type=term locked=false -->\n\ninner body\n\n<!-- /clause inner -->\n\ntail text\n\n<!-- /clause outer -->\n";
    let mut controller = controller_with(source, EditorOptions::default());
    // from inside "lead text" into "inner body": widens over the inner
    // clause only, the outer stays
    set_range(&mut controller, (0, 5), (1, 5));
    let outcome = controller.on_intent(Intent::DeleteRange).unwrap();
    assert!(outcome.markdown.contains("clause id=outer"));
    assert!(outcome.markdown.contains("/clause outer"));
    assert!(!outcome.markdown.contains("clause id=inner"));
    assert!(outcome.markdown.contains("tail text"));
}

#[test]
fn deleting_everything_leaves_an_empty_document() {
    let mut controller = controller_with(THREE_PARTS, EditorOptions::default());
    let runs = collect_runs(controller.tree());
    set_range(&mut controller, (0, 0), (runs.len() - 1, runs.last().unwrap().len));
    let outcome = controller.on_intent(Intent::DeleteRange).unwrap();
    assert_eq!(outcome.markdown, "");
}
