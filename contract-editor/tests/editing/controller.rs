//! Controller surface: loading, intents, callbacks, export.

use contract_editor::{
    collect_runs, EditingController, EditorError, EditorOptions, Intent, Selection,
};
use std::cell::RefCell;
use std::rc::Rc;

use crate::common::{controller_with, fixture, set_caret, set_range};

#[test]
fn loading_the_fixture_exports_a_normalized_equivalent() {
    let source = fixture("acceptance-of-delivery.md");
    let mut controller = controller_with(&source, EditorOptions::default());
    let exported = controller.export_markdown().unwrap();
    assert_eq!(
        contract_editor::parse(&exported).unwrap(),
        contract_editor::parse(&source).unwrap()
    );
}

#[test]
fn malformed_fences_surface_as_a_failed_load() {
    let mut controller = EditingController::new(EditorOptions::default());
    let result = controller.load_markdown("<!-- clause id=a type=b -->\n\nno close\n");
    assert!(matches!(result, Err(EditorError::Parse(_))));
    // the controller still holds a usable (empty) document
    assert_eq!(controller.export_markdown().unwrap(), "");
}

#[test]
fn every_accepted_edit_notifies_with_fresh_markdown() {
    let mut controller = controller_with("grow\n", EditorOptions::default());
    let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    controller.set_on_change(move |markdown| sink.borrow_mut().push(markdown.to_string()));

    set_caret(&mut controller, 0, 4);
    controller
        .on_intent(Intent::InsertText("ing".to_string()))
        .unwrap();
    controller
        .on_intent(Intent::InsertText(" pains".to_string()))
        .unwrap();
    assert_eq!(
        log.borrow().as_slice(),
        ["growing\n", "growing pains\n"]
    );
}

#[test]
fn selection_changes_do_not_notify() {
    let mut controller = controller_with("quiet\n", EditorOptions::default());
    let count: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));
    let sink = count.clone();
    controller.set_on_change(move |_| *sink.borrow_mut() += 1);
    set_caret(&mut controller, 0, 0);
    set_caret(&mut controller, 0, 3);
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn edits_inside_a_clause_report_its_id() {
    let source =
        "<!-- clause id=notice-1 type=notice locked=false -->\n\ngive notice early\n\n<!-- /clause notice-1 -->\n";
    let mut controller = controller_with(source, EditorOptions::default());
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    controller.set_on_clause_updated(move |id| sink.borrow_mut().push(id.to_string()));

    set_caret(&mut controller, 0, 0);
    controller
        .on_intent(Intent::InsertText("please ".to_string()))
        .unwrap();
    assert_eq!(seen.borrow().as_slice(), ["notice-1"]);
}

#[test]
fn edits_outside_clauses_report_nothing() {
    let source = "free text\n\n<!-- clause id=c type=t -->\n\nlocked body\n\n<!-- /clause c -->\n";
    let mut controller = controller_with(source, EditorOptions::default());
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    controller.set_on_clause_updated(move |id| sink.borrow_mut().push(id.to_string()));

    set_caret(&mut controller, 0, 0);
    controller
        .on_intent(Intent::InsertText("more ".to_string()))
        .unwrap();
    assert!(seen.borrow().is_empty());
}

#[test]
fn intents_without_a_selection_are_out_of_range() {
    let mut controller = controller_with("text\n", EditorOptions::default());
    assert_eq!(
        controller.on_intent(Intent::InsertText("x".to_string())),
        Err(EditorError::Rejected(
            contract_editor::RejectReason::OutOfRange
        ))
    );
}

#[test]
fn selection_keys_survive_an_edit_elsewhere() {
    let mut controller = controller_with("first\n\nsecond\n", EditorOptions::default());
    let runs_before = collect_runs(controller.tree());
    set_caret(&mut controller, 0, 5);
    controller
        .on_intent(Intent::InsertText("!".to_string()))
        .unwrap();
    let runs_after = collect_runs(controller.tree());
    // the untouched paragraph keeps its run key
    assert_eq!(runs_before[1].key, runs_after[1].key);
}

#[test]
fn host_value_replacement_discards_the_session() {
    let mut controller = controller_with("old value\n", EditorOptions::default());
    set_range(&mut controller, (0, 0), (0, 3));
    controller.load_markdown("new value\n").unwrap();
    assert_eq!(controller.selection(), None::<Selection>);
    assert_eq!(controller.export_markdown().unwrap(), "new value\n");
}

#[test]
fn reload_keeps_keys_of_unchanged_nodes() {
    let source = "stable paragraph\n\nchanging paragraph\n";
    let mut controller = controller_with(source, EditorOptions::default());
    let before = collect_runs(controller.tree());
    controller
        .load_markdown("stable paragraph\n\na different ending\n")
        .unwrap();
    let after = collect_runs(controller.tree());
    // unchanged first paragraph keeps its run key, the edited one does not
    assert_eq!(before[0].key, after[0].key);
    assert_ne!(before[1].key, after[1].key);
}

#[test]
fn outcome_tree_matches_the_controller_tree() {
    let mut controller = controller_with("check\n", EditorOptions::default());
    set_caret(&mut controller, 0, 0);
    let outcome = controller
        .on_intent(Intent::InsertText("re".to_string()))
        .unwrap();
    assert!(outcome.tree.same_version(controller.tree()));
    assert_eq!(outcome.markdown, "recheck\n");
}
