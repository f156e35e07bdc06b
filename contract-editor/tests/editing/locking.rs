//! Lock-region behavior: locked text never changes, navigation still works.

use contract_editor::{
    collect_runs, EditorError, EditorOptions, Intent, Mark, RejectReason,
};

use crate::common::{controller_with, select_all, set_caret, set_range};

const LOCKED_CLAUSE: &str =
    "free intro\n\n<!-- clause id=fixed type=boilerplate -->\n\nimmutable body\n\n<!-- /clause fixed -->\n";

#[test]
fn global_lock_text_rejects_all_inserts_and_output_is_stable() {
    let options = EditorOptions {
        lock_text: true,
        ..EditorOptions::default()
    };
    let mut controller = controller_with("the whole document\n", options);
    set_caret(&mut controller, 0, 0);
    let before = controller.export_markdown().unwrap();
    for attempt in 0..3 {
        assert_eq!(
            controller.on_intent(Intent::InsertText("nope".to_string())),
            Err(EditorError::Rejected(RejectReason::Locked)),
            "attempt {attempt}"
        );
        assert_eq!(controller.export_markdown().unwrap(), before);
    }
}

#[test]
fn clause_boilerplate_is_locked_by_default() {
    let mut controller = controller_with(LOCKED_CLAUSE, EditorOptions::default());
    // run 1 is the clause body
    set_range(&mut controller, (1, 0), (1, 5));
    for intent in [
        Intent::InsertText("x".to_string()),
        Intent::DeleteRange,
        Intent::ApplyMark(Mark::Bold),
        Intent::ApplyMark(Mark::Italic),
        Intent::ApplyMark(Mark::Code),
        Intent::ApplyBlockquote,
        Intent::ApplyLink {
            href: "https://example.com".to_string(),
            title: None,
        },
    ] {
        assert_eq!(
            controller.on_intent(intent.clone()),
            Err(EditorError::Rejected(RejectReason::Locked)),
            "intent {intent:?}"
        );
    }
    assert!(controller.export_markdown().unwrap().contains("immutable body"));
}

#[test]
fn locked_text_content_never_changes_across_attempts() {
    let mut controller = controller_with(LOCKED_CLAUSE, EditorOptions::default());
    let before = controller.export_markdown().unwrap();
    select_all(&mut controller);
    let _ = controller.on_intent(Intent::ApplyMark(Mark::Bold));
    let _ = controller.on_intent(Intent::DeleteRange);
    set_caret(&mut controller, 1, 3);
    let _ = controller.on_intent(Intent::InsertText("oops".to_string()));
    assert_eq!(controller.export_markdown().unwrap(), before);
}

#[test]
fn cursor_placement_inside_locked_regions_is_allowed() {
    let mut controller = controller_with(LOCKED_CLAUSE, EditorOptions::default());
    // placing a caret in the locked clause body works
    set_caret(&mut controller, 1, 4);
    assert!(controller.selection().is_some());
}

#[test]
fn unlocked_text_next_to_a_locked_clause_stays_editable() {
    let mut controller = controller_with(LOCKED_CLAUSE, EditorOptions::default());
    set_caret(&mut controller, 0, 4);
    let outcome = controller
        .on_intent(Intent::InsertText("r".to_string()))
        .unwrap();
    assert!(outcome.markdown.starts_with("freer intro"));
    assert!(outcome.markdown.contains("immutable body"));
}

#[test]
fn editable_clause_override_unlocks_its_body() {
    let source =
        "<!-- clause id=open type=variable locked=false -->\n\nchange me\n\n<!-- /clause open -->\n";
    let mut controller = controller_with(source, EditorOptions::default());
    set_caret(&mut controller, 0, 0);
    let outcome = controller
        .on_intent(Intent::InsertText("please ".to_string()))
        .unwrap();
    assert!(outcome.markdown.contains("please change me"));
}

#[test]
fn locked_keys_report_locked_through_the_controller() {
    let mut controller = controller_with(LOCKED_CLAUSE, EditorOptions::default());
    let runs = collect_runs(controller.tree());
    assert!(!controller.is_locked(runs[0].key));
    assert!(controller.is_locked(runs[1].key));
}
