//! Clause atomicity and lock-region queries.
//!
//! Clauses are structurally atomic with respect to deletion: a range that
//! partially overlaps a clause widens to swallow the whole clause, so that
//! clause metadata can never dangle without matching content. Locked
//! regions reject every mutating edit while leaving cursor placement and
//! navigation alone.

use crate::error::EditorError;
use crate::selection::{anchor_at_global, global_pos, resolve, Bias, ResolvedRange, Selection};
use crate::tree::index::{collect_runs, locked_at, KeyIndex, NodePath, RunRef};
use crate::tree::nodes::{NodeKey, Tree};

/// Whether the node behind `key` sits in a locked region.
pub fn is_locked(tree: &Tree, index: &KeyIndex, key: NodeKey) -> bool {
    index
        .path(key)
        .map(|path| locked_at(tree, path))
        .unwrap_or(false)
}

/// Whether `selection` can be deleted as-is: it must not touch a locked
/// run and must not straddle any clause boundary.
pub fn can_delete(tree: &Tree, selection: &Selection) -> bool {
    let runs = collect_runs(tree);
    let range = match resolve(&runs, selection) {
        Ok(range) => range,
        Err(_) => return false,
    };
    if range_touches_locked(&runs, &range) {
        return false;
    }
    let start = global_pos(&runs, range.start);
    let end = global_pos(&runs, range.end);
    widen_over_clauses(&runs, start, end) == (start, end)
}

/// Widen a deletion range to the boundaries of any clause whose boundary
/// it straddles. A range that covers a clause entirely, stays wholly
/// inside it, or does not touch it comes back unchanged.
pub fn normalize_deletion(tree: &Tree, selection: &Selection) -> Result<Selection, EditorError> {
    let runs = collect_runs(tree);
    let range = resolve(&runs, selection)?;
    if range.is_collapsed() {
        return Ok(*selection);
    }
    let start = global_pos(&runs, range.start);
    let end = global_pos(&runs, range.end);
    let (wide_start, wide_end) = widen_over_clauses(&runs, start, end);
    if (wide_start, wide_end) == (start, end) {
        return Ok(*selection);
    }
    let anchor = anchor_at_global(&runs, wide_start, Bias::Start);
    let focus = anchor_at_global(&runs, wide_end, Bias::End);
    match (anchor, focus) {
        (Some(anchor), Some(focus)) => Ok(Selection::new(anchor, focus)),
        _ => Ok(*selection),
    }
}

fn widen_over_clauses(runs: &[RunRef], mut start: usize, mut end: usize) -> (usize, usize) {
    let intervals = clause_intervals(runs);
    loop {
        let mut changed = false;
        for (_, (clause_start, clause_end)) in &intervals {
            let intersects = start < *clause_end && end > *clause_start;
            let covers_clause = start <= *clause_start && end >= *clause_end;
            let stays_inside = start >= *clause_start && end <= *clause_end;
            // only a range that straddles a boundary widens; edits wholly
            // inside a clause, or covering it, are already well-formed
            if intersects && !covers_clause && !stays_inside {
                if *clause_start < start {
                    start = *clause_start;
                    changed = true;
                }
                if *clause_end > end {
                    end = *clause_end;
                    changed = true;
                }
            }
        }
        if !changed {
            return (start, end);
        }
    }
}

/// Global char interval covered by each clause that owns at least one run.
pub(crate) fn clause_intervals(runs: &[RunRef]) -> Vec<(NodePath, (usize, usize))> {
    let mut intervals: Vec<(NodePath, (usize, usize))> = Vec::new();
    let mut cum = 0usize;
    for run in runs {
        for clause in &run.clauses {
            match intervals.iter_mut().find(|(path, _)| path == clause) {
                Some((_, (start, end))) => {
                    *start = (*start).min(cum);
                    *end = (*end).max(cum + run.len);
                }
                None => intervals.push((clause.clone(), (cum, cum + run.len))),
            }
        }
        cum += run.len;
    }
    intervals
}

/// Whether any covered (non-empty) portion of the range falls on a locked
/// run. A zero-width touch at a locked run's boundary does not count:
/// cursors may sit next to locked text.
pub(crate) fn range_touches_locked(runs: &[RunRef], range: &ResolvedRange) -> bool {
    for ix in range.start.0..=range.end.0 {
        let run = &runs[ix];
        let covered_start = if ix == range.start.0 { range.start.1 } else { 0 };
        let covered_end = if ix == range.end.0 { range.end.1 } else { run.len };
        if covered_end > covered_start && run.locked {
            return true;
        }
    }
    false
}
