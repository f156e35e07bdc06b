//! Shared helpers for integration tests.

use contract_editor::{
    anchor_at_global, collect_runs, Anchor, Bias, EditingController, EditorOptions, Intent,
    Selection, Tree,
};
use std::path::PathBuf;

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"))
}

pub fn controller_with(source: &str, options: EditorOptions) -> EditingController {
    let mut controller = EditingController::new(options);
    controller.load_markdown(source).expect("fixture parses");
    controller
}

/// Selection between (run index, offset) pairs over the tree's runs in
/// document order.
pub fn run_selection(tree: &Tree, from: (usize, usize), to: (usize, usize)) -> Selection {
    let runs = collect_runs(tree);
    Selection::new(
        Anchor::new(runs[from.0].key, from.1),
        Anchor::new(runs[to.0].key, to.1),
    )
}

/// Select every text run in the document and tell the controller.
pub fn select_all(controller: &mut EditingController) -> Selection {
    let runs = collect_runs(controller.tree());
    let first = runs.first().expect("document has text");
    let last = runs.last().expect("document has text");
    let selection = Selection::new(Anchor::new(first.key, 0), Anchor::new(last.key, last.len));
    controller
        .on_intent(Intent::SetSelection(selection))
        .expect("selection resolves");
    selection
}

/// Place a collapsed caret and tell the controller.
pub fn set_caret(controller: &mut EditingController, run: usize, offset: usize) -> Selection {
    let runs = collect_runs(controller.tree());
    let selection = Selection::collapsed(Anchor::new(runs[run].key, offset));
    controller
        .on_intent(Intent::SetSelection(selection))
        .expect("selection resolves");
    selection
}

/// Select a range given as global char positions over the document text.
pub fn set_global_range(
    controller: &mut EditingController,
    from: usize,
    to: usize,
) -> Selection {
    let runs = collect_runs(controller.tree());
    let anchor = anchor_at_global(&runs, from, Bias::Start).expect("document has text");
    let focus = anchor_at_global(&runs, to, Bias::End).expect("document has text");
    let selection = Selection::new(anchor, focus);
    controller
        .on_intent(Intent::SetSelection(selection))
        .expect("selection resolves");
    selection
}

/// Set a ranged selection and tell the controller.
pub fn set_range(
    controller: &mut EditingController,
    from: (usize, usize),
    to: (usize, usize),
) -> Selection {
    let selection = run_selection(controller.tree(), from, to);
    controller
        .on_intent(Intent::SetSelection(selection))
        .expect("selection resolves");
    selection
}
