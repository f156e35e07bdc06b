//! Formatting commands through the controller: marks, blockquotes, links.

use contract_editor::tree::verify_canonical;
use contract_editor::{EditorOptions, Intent, Mark};

use crate::common::{controller_with, select_all, set_global_range, set_range};

#[test]
fn bold_toggle_round_trips_through_markdown() {
    let mut controller = controller_with("hello world\n", EditorOptions::default());
    set_range(&mut controller, (0, 0), (0, 5));
    let outcome = controller.on_intent(Intent::ApplyMark(Mark::Bold)).unwrap();
    assert_eq!(outcome.markdown, "**hello** world\n");
    assert!(verify_canonical(&outcome.tree).is_ok());

    let outcome = controller.on_intent(Intent::ApplyMark(Mark::Bold)).unwrap();
    assert_eq!(outcome.markdown, "hello world\n");
    assert!(verify_canonical(&outcome.tree).is_ok());
}

#[test]
fn overlapping_marks_nest_in_the_output() {
    let mut controller = controller_with("alpha beta gamma\n", EditorOptions::default());
    select_all(&mut controller);
    controller.on_intent(Intent::ApplyMark(Mark::Bold)).unwrap();
    // italicize just "beta" inside the bold run
    set_range(&mut controller, (0, 6), (0, 10));
    let outcome = controller
        .on_intent(Intent::ApplyMark(Mark::Italic))
        .unwrap();
    assert_eq!(outcome.markdown, "**alpha *beta* gamma**\n");
    assert!(verify_canonical(&outcome.tree).is_ok());
}

#[test]
fn code_mark_produces_inline_code() {
    let mut controller = controller_with("run the setup step\n", EditorOptions::default());
    set_range(&mut controller, (0, 8), (0, 13));
    let outcome = controller.on_intent(Intent::ApplyMark(Mark::Code)).unwrap();
    assert_eq!(outcome.markdown, "run the `setup` step\n");
}

#[test]
fn mark_canonicalization_holds_after_every_operation() {
    let mut controller = controller_with("one two three four five\n", EditorOptions::default());
    let spans = [(0usize, 7usize), (4, 13), (8, 18), (0, 23), (9, 12)];
    for (from, to) in spans {
        for mark in [Mark::Bold, Mark::Italic] {
            set_global_range(&mut controller, from, to);
            let outcome = controller.on_intent(Intent::ApplyMark(mark)).unwrap();
            assert!(verify_canonical(&outcome.tree).is_ok());
        }
    }
}

#[test]
fn blockquote_toggle_is_idempotent_through_markdown() {
    let mut controller = controller_with("a quiet paragraph\n", EditorOptions::default());
    select_all(&mut controller);
    let wrapped = controller.on_intent(Intent::ApplyBlockquote).unwrap();
    assert_eq!(wrapped.markdown, "> a quiet paragraph\n");
    let unwrapped = controller.on_intent(Intent::ApplyBlockquote).unwrap();
    assert_eq!(unwrapped.markdown, "a quiet paragraph\n");
}

#[test]
fn blockquote_wraps_a_paragraph_inside_a_clause() {
    let source =
        "<!-- clause id=c type=t locked=false -->\n\neditable body\n\n<!-- /clause c -->\n";
    let mut controller = controller_with(source, EditorOptions::default());
    select_all(&mut controller);
    let outcome = controller.on_intent(Intent::ApplyBlockquote).unwrap();
    assert!(outcome.markdown.contains("> editable body"));
    assert!(outcome.markdown.contains("<!-- clause id=c type=t locked=false -->"));
}

#[test]
fn link_command_emits_markdown_link_syntax() {
    let mut controller = controller_with("read the terms today\n", EditorOptions::default());
    set_range(&mut controller, (0, 9), (0, 14));
    let outcome = controller
        .on_intent(Intent::ApplyLink {
            href: "https://example.com/terms".to_string(),
            title: None,
        })
        .unwrap();
    assert_eq!(
        outcome.markdown,
        "read the [terms](https://example.com/terms) today\n"
    );
}

#[test]
fn zero_width_link_selection_changes_nothing() {
    let mut controller = controller_with("static text\n", EditorOptions::default());
    let before = controller.export_markdown().unwrap();
    set_range(&mut controller, (0, 3), (0, 3));
    let outcome = controller
        .on_intent(Intent::ApplyLink {
            href: "https://example.com".to_string(),
            title: None,
        })
        .unwrap();
    assert_eq!(outcome.markdown, before);
}

#[test]
fn relinking_replaces_the_target() {
    let mut controller = controller_with(
        "see [the form](https://old.example.com) here\n",
        EditorOptions::default(),
    );
    // run 1 is the link text
    set_range(&mut controller, (1, 0), (1, 8));
    let outcome = controller
        .on_intent(Intent::ApplyLink {
            href: "https://new.example.com".to_string(),
            title: Some("Form".to_string()),
        })
        .unwrap();
    assert_eq!(
        outcome.markdown,
        "see [the form](https://new.example.com \"Form\") here\n"
    );
}
