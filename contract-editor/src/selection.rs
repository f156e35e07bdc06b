//! Selection anchors over the document tree.

use crate::error::{EditorError, RejectReason};
use crate::tree::index::RunRef;
use crate::tree::nodes::NodeKey;

/// One end of a selection: a text run key plus a char offset into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub key: NodeKey,
    pub offset: usize,
}

impl Anchor {
    pub fn new(key: NodeKey, offset: usize) -> Self {
        Anchor { key, offset }
    }
}

/// A possibly-empty range between two anchors. `anchor` is where the
/// selection started, `focus` where it ends; either may precede the other
/// in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Anchor,
    pub focus: Anchor,
}

impl Selection {
    pub fn new(anchor: Anchor, focus: Anchor) -> Self {
        Selection { anchor, focus }
    }

    pub fn collapsed(at: Anchor) -> Self {
        Selection {
            anchor: at,
            focus: at,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// A selection resolved against a run listing: ordered (start, end)
/// positions as (run index, char offset) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl ResolvedRange {
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Resolve a selection against the current run listing. Anchors must
/// reference text runs present in the tree, with offsets within bounds.
pub fn resolve(runs: &[RunRef], selection: &Selection) -> Result<ResolvedRange, EditorError> {
    let a = resolve_anchor(runs, &selection.anchor)?;
    let f = resolve_anchor(runs, &selection.focus)?;
    let (start, end) = if a <= f { (a, f) } else { (f, a) };
    Ok(ResolvedRange { start, end })
}

fn resolve_anchor(runs: &[RunRef], anchor: &Anchor) -> Result<(usize, usize), EditorError> {
    let ix = runs
        .iter()
        .position(|run| run.key == anchor.key)
        .ok_or(EditorError::Rejected(RejectReason::OutOfRange))?;
    if anchor.offset > runs[ix].len {
        return Err(EditorError::Rejected(RejectReason::OutOfRange));
    }
    Ok((ix, anchor.offset))
}

/// Global char position of a (run index, offset) pair.
pub fn global_pos(runs: &[RunRef], at: (usize, usize)) -> usize {
    runs[..at.0].iter().map(|run| run.len).sum::<usize>() + at.1
}

/// Which side of a run boundary an anchor at an exact boundary position
/// lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Prefer the start of the following run
    Start,
    /// Prefer the end of the preceding run
    End,
}

/// Map a global char position back onto an anchor. Returns `None` for a
/// tree with no text runs.
pub fn anchor_at_global(runs: &[RunRef], pos: usize, bias: Bias) -> Option<Anchor> {
    if runs.is_empty() {
        return None;
    }
    let mut cum = 0usize;
    for (ix, run) in runs.iter().enumerate() {
        let end = cum + run.len;
        let inside = match bias {
            Bias::Start => pos < end || (pos == end && ix + 1 == runs.len()),
            Bias::End => pos <= end,
        };
        if inside {
            return Some(Anchor::new(run.key, pos.min(end) - cum));
        }
        cum = end;
    }
    let last = runs.last().expect("runs not empty");
    Some(Anchor::new(last.key, last.len))
}
