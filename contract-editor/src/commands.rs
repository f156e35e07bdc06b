//! The formatting-command engine and primitive text edits.
//!
//! Every operation takes the current tree by reference and returns a new
//! tree version; untouched subtrees are shared between versions. A refused
//! operation returns `EditorError::Rejected` and leaves nothing behind.
//!
//! Text runs are the unit of mutation. Formatting splits runs at range
//! boundaries, flips mark bits on the covered segments, and re-merges
//! adjacent runs with identical mark sets afterwards, so no two adjacent
//! sibling runs ever share a mark set.

use std::rc::Rc;

use url::Url;

use crate::boundary::{clause_intervals, range_touches_locked};
use crate::error::{EditorError, RejectReason};
use crate::selection::{
    anchor_at_global, global_pos, resolve, Anchor, Bias, ResolvedRange, Selection,
};
use crate::tree::index::{collect_runs, NodePath, RunRef};
use crate::tree::nodes::{KeyAllocator, Mark, MarkSet, Tree, TreeKind, TreeNode};
use crate::tree::transform::canonicalize_children;

/// Outcome of one engine operation: the next tree version and where the
/// selection lands in it (`None` when no text runs remain).
#[derive(Debug, Clone, PartialEq)]
pub struct EditResult {
    pub tree: Tree,
    pub selection: Option<Selection>,
}

fn unchanged(tree: &Tree, selection: &Selection) -> EditResult {
    EditResult {
        tree: tree.clone(),
        selection: Some(*selection),
    }
}

fn corrupt(what: &str) -> EditorError {
    EditorError::Invariant(format!("{what} disappeared mid-operation"))
}

/// Insert text at a collapsed selection; a non-empty selection is deleted
/// first. Newlines are flattened to spaces — paragraph splitting is not an
/// insertion.
pub fn insert_text(
    tree: &Tree,
    selection: &Selection,
    text: &str,
    keys: &mut KeyAllocator,
) -> Result<EditResult, EditorError> {
    let runs = collect_runs(tree);
    let range = resolve(&runs, selection)?;
    if !range.is_collapsed() {
        let deleted = delete_range(tree, selection)?;
        let collapsed = deleted
            .selection
            .ok_or(EditorError::Rejected(RejectReason::OutOfRange))?;
        return insert_text(&deleted.tree, &collapsed, text, keys);
    }

    let (run_ix, offset) = range.start;
    let run = &runs[run_ix];
    if run.locked {
        return Err(EditorError::Rejected(RejectReason::Locked));
    }
    let sanitized = text.replace('\n', " ");
    if sanitized.is_empty() {
        return Ok(unchanged(tree, selection));
    }

    let mut next = tree.clone();
    let node = next.node_mut(&run.path).ok_or_else(|| corrupt("run"))?;
    if let TreeKind::Text { text: existing, .. } = &mut node.kind {
        let at = byte_offset(existing, offset);
        existing.insert_str(at, &sanitized);
    }
    let caret = Anchor::new(run.key, offset + sanitized.chars().count());
    Ok(EditResult {
        tree: next,
        selection: Some(Selection::collapsed(caret)),
    })
}

/// Delete the selected range. The caller is expected to normalize the
/// range over clause boundaries first; clauses the range covers entirely
/// are removed whole, and a deletion that bridges two paragraphs of the
/// same parent merges them.
pub fn delete_range(tree: &Tree, selection: &Selection) -> Result<EditResult, EditorError> {
    let runs = collect_runs(tree);
    let range = resolve(&runs, selection)?;
    if range.is_collapsed() {
        return Ok(unchanged(tree, selection));
    }
    if range_touches_locked(&runs, &range) {
        return Err(EditorError::Rejected(RejectReason::Locked));
    }

    let start_global = global_pos(&runs, range.start);
    let end_global = global_pos(&runs, range.end);
    let mut next = tree.clone();

    // 1. Splice covered text out of every run in range. Paths are stable
    //    through this step.
    let mut fully_covered = vec![false; runs.len()];
    for ix in range.start.0..=range.end.0 {
        let run = &runs[ix];
        let covered_start = if ix == range.start.0 { range.start.1 } else { 0 };
        let covered_end = if ix == range.end.0 { range.end.1 } else { run.len };
        if covered_end <= covered_start {
            continue;
        }
        fully_covered[ix] = covered_start == 0 && covered_end == run.len;
        let node = next.node_mut(&run.path).ok_or_else(|| corrupt("run"))?;
        if let TreeKind::Text { text, .. } = &mut node.kind {
            let from = byte_offset(text, covered_start);
            let to = byte_offset(text, covered_end);
            text.replace_range(from..to, "");
        }
    }

    // 2. Decide what disappears: clauses the range covers entirely, leaf
    //    blocks whose every run was covered, and emptied runs inside
    //    surviving blocks.
    let mut removals: Vec<NodePath> = Vec::new();

    for (clause_path, (clause_start, clause_end)) in clause_intervals(&runs) {
        if start_global <= clause_start && end_global >= clause_end {
            removals.push(clause_path);
        }
    }

    let mut leaf_stats: Vec<(NodePath, usize, usize)> = Vec::new();
    for (ix, run) in runs.iter().enumerate() {
        let leaf = leaf_block_path(tree, &run.path);
        match leaf_stats.iter_mut().find(|(path, _, _)| *path == leaf) {
            Some((_, total, covered)) => {
                *total += 1;
                if fully_covered[ix] {
                    *covered += 1;
                }
            }
            None => leaf_stats.push((leaf, 1, usize::from(fully_covered[ix]))),
        }
    }
    for (leaf, total, covered) in &leaf_stats {
        if total == covered && *covered > 0 {
            removals.push(leaf.clone());
        }
    }
    for (ix, run) in runs.iter().enumerate() {
        if fully_covered[ix] && !covered_by(&removals, &run.path) {
            removals.push(run.path.clone());
        }
    }

    // 3. Merge the boundary paragraphs when the deletion bridges two
    //    surviving paragraphs under the same parent.
    let start_leaf = leaf_block_path(tree, &runs[range.start.0].path);
    let end_leaf = leaf_block_path(tree, &runs[range.end.0].path);
    let start_survives = !covered_by(&removals, &start_leaf);
    let end_survives = !covered_by(&removals, &end_leaf);
    if start_leaf != end_leaf && start_survives && end_survives {
        let same_parent = start_leaf[..start_leaf.len() - 1] == end_leaf[..end_leaf.len() - 1];
        let both_paragraphs = is_paragraph(tree, &start_leaf) && is_paragraph(tree, &end_leaf);
        if same_parent && both_paragraphs {
            let moved: Vec<Rc<TreeNode>> = next
                .node_at(&end_leaf)
                .ok_or_else(|| corrupt("paragraph"))?
                .children
                .iter()
                .filter_map(cleaned_inline)
                .collect();
            let target = next.node_mut(&start_leaf).ok_or_else(|| corrupt("paragraph"))?;
            target.children.extend(moved);
            removals.push(end_leaf.clone());
        }
    }

    // 4. Apply removals deepest-first so sibling indices stay valid.
    removals.sort();
    removals.dedup();
    removals.reverse();
    for path in &removals {
        remove_at(&mut next, path);
    }

    prune_empty_containers(&mut next);

    if start_survives {
        if let Some(node) = next.node_mut(&start_leaf) {
            drop_empty_runs(node);
            canonicalize_children(&mut node.children);
        }
    }

    let new_runs = collect_runs(&next);
    let selection = anchor_at_global(&new_runs, start_global, Bias::End).map(Selection::collapsed);
    Ok(EditResult {
        tree: next,
        selection,
    })
}

/// Toggle an inline mark over the selected text. Whitespace at the range
/// edges is excluded before toggling; delimiters flanking whitespace would
/// not survive a markdown round trip.
pub fn apply_mark(
    tree: &Tree,
    selection: &Selection,
    mark: Mark,
    keys: &mut KeyAllocator,
) -> Result<EditResult, EditorError> {
    let runs = collect_runs(tree);
    let range = resolve(&runs, selection)?;
    if range.is_collapsed() {
        return Ok(unchanged(tree, selection));
    }
    let range = match shrink_to_content(tree, &runs, range) {
        Some(range) => range,
        None => return Ok(unchanged(tree, selection)),
    };
    if range_touches_locked(&runs, &range) {
        return Err(EditorError::Rejected(RejectReason::Locked));
    }

    // toggle semantics: add unless every covered run already carries it
    let mut add = false;
    for ix in range.start.0..=range.end.0 {
        let run = &runs[ix];
        let covered_start = if ix == range.start.0 { range.start.1 } else { 0 };
        let covered_end = if ix == range.end.0 { range.end.1 } else { run.len };
        if covered_end <= covered_start {
            continue;
        }
        if !run_marks(tree, run).contains(mark) {
            add = true;
        }
    }

    let start_global = global_pos(&runs, range.start);
    let end_global = global_pos(&runs, range.end);
    let mut next = tree.clone();
    let mut touched_parents: Vec<NodePath> = Vec::new();

    // reverse order keeps earlier sibling indices valid across splits
    for ix in (range.start.0..=range.end.0).rev() {
        let run = &runs[ix];
        let covered_start = if ix == range.start.0 { range.start.1 } else { 0 };
        let covered_end = if ix == range.end.0 { range.end.1 } else { run.len };
        if covered_end <= covered_start {
            continue;
        }
        let Some((&child_ix, parent_path)) = run.path.split_last() else {
            continue;
        };
        if !touched_parents.iter().any(|p| p.as_slice() == parent_path) {
            touched_parents.push(parent_path.to_vec());
        }
        let parent = next
            .node_mut(parent_path)
            .ok_or_else(|| corrupt("run parent"))?;
        let original = parent
            .children
            .get(child_ix)
            .ok_or_else(|| corrupt("run"))?;
        let (text, marks, locked) = match &original.kind {
            TreeKind::Text { text, marks } => (text.clone(), *marks, original.locked),
            _ => continue,
        };
        let original_key = original.key;

        if covered_start == 0 && covered_end == run.len {
            let node = Rc::make_mut(&mut parent.children[child_ix]);
            if let TreeKind::Text { marks, .. } = &mut node.kind {
                marks.set(mark, add);
            }
            continue;
        }

        // split into before / covered / after segments; the first segment
        // keeps the original key so anchors before the range stay valid
        let mut segments: Vec<Rc<TreeNode>> = Vec::new();
        let before = slice_chars(&text, 0, covered_start);
        let covered = slice_chars(&text, covered_start, covered_end);
        let after = slice_chars(&text, covered_end, run.len);
        let mut key_used = false;
        let mut push_segment = |segment: String, segment_marks: MarkSet| {
            if segment.is_empty() {
                return;
            }
            let key = if !key_used {
                key_used = true;
                original_key
            } else {
                keys.next_key()
            };
            segments.push(Rc::new(TreeNode::new(
                key,
                TreeKind::Text {
                    text: segment,
                    marks: segment_marks,
                },
                locked,
            )));
        };
        push_segment(before, marks);
        let mut covered_marks = marks;
        covered_marks.set(mark, add);
        push_segment(covered, covered_marks);
        push_segment(after, marks);
        parent.children.splice(child_ix..child_ix + 1, segments);
    }

    for parent_path in &touched_parents {
        if let Some(parent) = next.node_mut(parent_path) {
            canonicalize_children(&mut parent.children);
        }
    }

    let new_runs = collect_runs(&next);
    let anchor = anchor_at_global(&new_runs, start_global, Bias::Start);
    let focus = anchor_at_global(&new_runs, end_global, Bias::End);
    Ok(EditResult {
        tree: next,
        selection: anchor
            .zip(focus)
            .map(|(anchor, focus)| Selection::new(anchor, focus)),
    })
}

/// Wrap the selected paragraphs in a blockquote, or unwrap when the
/// selection already sits inside one. Applying the command twice returns
/// the original tree.
pub fn apply_blockquote(
    tree: &Tree,
    selection: &Selection,
    keys: &mut KeyAllocator,
) -> Result<EditResult, EditorError> {
    let runs = collect_runs(tree);
    let range = resolve(&runs, selection)?;

    let start_block = wrap_block_path(tree, &runs[range.start.0].path);
    let end_block = wrap_block_path(tree, &runs[range.end.0].path);
    if start_block[..start_block.len() - 1] != end_block[..end_block.len() - 1] {
        return Err(EditorError::Rejected(RejectReason::InvalidBoundary));
    }
    let parent_path = start_block[..start_block.len() - 1].to_vec();
    let first_ix = *start_block.last().unwrap_or(&0);
    let last_ix = *end_block.last().unwrap_or(&0);

    // a locked run anywhere in the affected blocks refuses the command
    for run in &runs {
        if run.path.starts_with(&parent_path) && run.path.len() > parent_path.len() {
            let sibling = run.path[parent_path.len()];
            if (first_ix..=last_ix).contains(&sibling) && run.locked {
                return Err(EditorError::Rejected(RejectReason::Locked));
            }
        }
    }

    let parent = tree
        .node_at(&parent_path)
        .ok_or_else(|| corrupt("block parent"))?;
    let span: Vec<Rc<TreeNode>> = parent.children[first_ix..=last_ix].to_vec();
    let all_quotes = span
        .iter()
        .all(|block| matches!(block.kind, TreeKind::Blockquote));
    let all_paragraphs = span
        .iter()
        .all(|block| matches!(block.kind, TreeKind::Paragraph));

    let mut next = tree.clone();
    if all_quotes {
        // unwrap: each blockquote dissolves into its children
        let parent = next
            .node_mut(&parent_path)
            .ok_or_else(|| corrupt("block parent"))?;
        for ix in (first_ix..=last_ix).rev() {
            let lifted = parent.children[ix].children.clone();
            parent.children.splice(ix..ix + 1, lifted);
        }
    } else if all_paragraphs {
        let mut quote = TreeNode::new(keys.next_key(), TreeKind::Blockquote, false);
        quote.children = span;
        let parent = next
            .node_mut(&parent_path)
            .ok_or_else(|| corrupt("block parent"))?;
        parent
            .children
            .splice(first_ix..=last_ix, [Rc::new(quote)]);
    } else {
        return Err(EditorError::Rejected(RejectReason::InvalidBoundary));
    }

    Ok(EditResult {
        tree: next,
        selection: Some(*selection),
    })
}

/// Turn the selected text into a link, or retarget the link the selection
/// already sits inside. A zero-width selection is a no-op.
pub fn apply_link(
    tree: &Tree,
    selection: &Selection,
    href: &str,
    title: Option<&str>,
    keys: &mut KeyAllocator,
) -> Result<EditResult, EditorError> {
    let runs = collect_runs(tree);
    let range = resolve(&runs, selection)?;
    if range.is_collapsed() {
        return Ok(unchanged(tree, selection));
    }
    if range_touches_locked(&runs, &range) {
        return Err(EditorError::Rejected(RejectReason::Locked));
    }
    if !href_is_usable(href) {
        return Err(EditorError::Rejected(RejectReason::InvalidBoundary));
    }

    // selection entirely inside one existing link: edit it in place
    let start_link = link_ancestor(tree, &runs[range.start.0].path);
    let end_link = link_ancestor(tree, &runs[range.end.0].path);
    if let (Some(a), Some(b)) = (&start_link, &end_link) {
        if a == b {
            let mut next = tree.clone();
            let node = next.node_mut(a).ok_or_else(|| corrupt("link"))?;
            node.kind = TreeKind::Link {
                href: href.to_string(),
                title: title.map(str::to_string),
            };
            return Ok(EditResult {
                tree: next,
                selection: Some(*selection),
            });
        }
    }

    let leaf = leaf_block_path(tree, &runs[range.start.0].path);
    if leaf != leaf_block_path(tree, &runs[range.end.0].path) {
        return Err(EditorError::Rejected(RejectReason::InvalidBoundary));
    }
    if !is_inline_block(tree, &leaf) {
        return Err(EditorError::Rejected(RejectReason::InvalidBoundary));
    }

    let start_global = global_pos(&runs, range.start);
    let end_global = global_pos(&runs, range.end);
    let leaf_start = runs
        .iter()
        .take_while(|run| !run.path.starts_with(&leaf))
        .map(|run| run.len)
        .sum::<usize>();
    let local_start = start_global - leaf_start;
    let local_end = end_global - leaf_start;

    let mut next = tree.clone();
    let leaf_node = next.node_mut(&leaf).ok_or_else(|| corrupt("block"))?;
    let rebuilt = relink_children(
        &leaf_node.children,
        local_start,
        local_end,
        href,
        title,
        keys,
    );
    leaf_node.children = rebuilt;
    canonicalize_children(&mut leaf_node.children);

    let new_runs = collect_runs(&next);
    let anchor = anchor_at_global(&new_runs, start_global, Bias::Start);
    let focus = anchor_at_global(&new_runs, end_global, Bias::End);
    Ok(EditResult {
        tree: next,
        selection: anchor
            .zip(focus)
            .map(|(anchor, focus)| Selection::new(anchor, focus)),
    })
}

/// Rebuild a block's inline children with the covered char interval
/// wrapped in a fresh link. Links the interval intersects are dissolved
/// first; their uncovered remainder becomes plain text runs.
fn relink_children(
    children: &[Rc<TreeNode>],
    local_start: usize,
    local_end: usize,
    href: &str,
    title: Option<&str>,
    keys: &mut KeyAllocator,
) -> Vec<Rc<TreeNode>> {
    // flatten: dissolve links that intersect the interval
    let mut flat: Vec<Rc<TreeNode>> = Vec::new();
    let mut pos = 0usize;
    for child in children {
        let child_len: usize = subtree_text_len(child);
        let intersects = pos < local_end && pos + child_len > local_start;
        match &child.kind {
            TreeKind::Link { .. } if intersects => flat.extend(child.children.iter().cloned()),
            _ => flat.push(child.clone()),
        }
        pos += child_len;
    }

    let mut rebuilt: Vec<Rc<TreeNode>> = Vec::new();
    let mut linked: Vec<Rc<TreeNode>> = Vec::new();
    let mut pos = 0usize;
    for child in flat {
        let child_len = subtree_text_len(&child);
        let child_start = pos;
        let child_end = pos + child_len;
        pos = child_end;

        if let TreeKind::Text { text, marks } = &child.kind {
            let covered_start = local_start.clamp(child_start, child_end) - child_start;
            let covered_end = local_end.clamp(child_start, child_end) - child_start;
            if covered_end <= covered_start {
                // entirely before or after the interval
                if child_start >= local_end {
                    flush_link(&mut rebuilt, &mut linked, href, title, keys);
                }
                rebuilt.push(child.clone());
                continue;
            }
            let mut key_used = false;
            let mut segment = |from: usize, to: usize, keys: &mut KeyAllocator| {
                let slice = slice_chars(text, from, to);
                if slice.is_empty() {
                    return None;
                }
                let key = if !key_used {
                    key_used = true;
                    child.key
                } else {
                    keys.next_key()
                };
                Some(Rc::new(TreeNode::new(
                    key,
                    TreeKind::Text {
                        text: slice,
                        marks: *marks,
                    },
                    child.locked,
                )))
            };
            if let Some(before) = segment(0, covered_start, keys) {
                rebuilt.push(before);
            }
            if let Some(covered) = segment(covered_start, covered_end, keys) {
                linked.push(covered);
            }
            let after = segment(covered_end, child_len, keys);
            if child_end >= local_end {
                flush_link(&mut rebuilt, &mut linked, href, title, keys);
            }
            if let Some(after) = after {
                rebuilt.push(after);
            }
        } else if child_start >= local_start && child_end <= local_end {
            linked.push(child.clone());
        } else {
            flush_link(&mut rebuilt, &mut linked, href, title, keys);
            rebuilt.push(child.clone());
        }
    }
    flush_link(&mut rebuilt, &mut linked, href, title, keys);
    rebuilt
}

fn flush_link(
    rebuilt: &mut Vec<Rc<TreeNode>>,
    linked: &mut Vec<Rc<TreeNode>>,
    href: &str,
    title: Option<&str>,
    keys: &mut KeyAllocator,
) {
    if linked.is_empty() {
        return;
    }
    let mut link = TreeNode::new(
        keys.next_key(),
        TreeKind::Link {
            href: href.to_string(),
            title: title.map(str::to_string),
        },
        false,
    );
    link.children = std::mem::take(linked);
    canonicalize_children(&mut link.children);
    rebuilt.push(Rc::new(link));
}

/// Absolute URLs, fragments, and relative paths are acceptable link
/// targets; anything else refuses the command.
fn href_is_usable(href: &str) -> bool {
    if href.is_empty() {
        return false;
    }
    if Url::parse(href).is_ok() {
        return true;
    }
    href.starts_with('/')
        || href.starts_with("./")
        || href.starts_with("../")
        || href.starts_with('#')
}

fn run_marks(tree: &Tree, run: &RunRef) -> MarkSet {
    match tree.node_at(&run.path).map(|node| &node.kind) {
        Some(TreeKind::Text { marks, .. }) => *marks,
        _ => MarkSet::empty(),
    }
}

fn run_text<'t>(tree: &'t Tree, run: &RunRef) -> &'t str {
    match tree.node_at(&run.path).map(|node| &node.kind) {
        Some(TreeKind::Text { text, .. }) => text,
        _ => "",
    }
}

/// Exclude whitespace at the range edges; `None` when nothing but
/// whitespace is covered.
fn shrink_to_content(
    tree: &Tree,
    runs: &[RunRef],
    range: ResolvedRange,
) -> Option<ResolvedRange> {
    let mut start = range.start;
    let mut end = range.end;
    loop {
        if start >= end {
            return None;
        }
        let run = &runs[start.0];
        if start.1 >= run.len {
            start = (start.0 + 1, 0);
            continue;
        }
        let ch = run_text(tree, run).chars().nth(start.1).unwrap_or(' ');
        if ch.is_whitespace() {
            start.1 += 1;
            continue;
        }
        break;
    }
    loop {
        if end <= start {
            return None;
        }
        if end.1 == 0 {
            end = (end.0 - 1, runs[end.0 - 1].len);
            continue;
        }
        let run = &runs[end.0];
        let ch = run_text(tree, run).chars().nth(end.1 - 1).unwrap_or(' ');
        if ch.is_whitespace() {
            end.1 -= 1;
            continue;
        }
        break;
    }
    Some(ResolvedRange { start, end })
}

/// The run's enclosing leaf block: the paragraph, heading, or code block
/// that directly holds inline content.
fn leaf_block_path(tree: &Tree, run_path: &[usize]) -> NodePath {
    let mut node: &TreeNode = &tree.root;
    let mut path = Vec::new();
    for &ix in run_path {
        let Some(child) = node.children.get(ix) else {
            break;
        };
        path.push(ix);
        if matches!(
            child.kind,
            TreeKind::Paragraph | TreeKind::Heading { .. } | TreeKind::CodeBlock { .. }
        ) {
            return path;
        }
        node = child;
    }
    path
}

fn is_paragraph(tree: &Tree, path: &[usize]) -> bool {
    matches!(
        tree.node_at(path).map(|node| &node.kind),
        Some(TreeKind::Paragraph)
    )
}

fn is_inline_block(tree: &Tree, path: &[usize]) -> bool {
    matches!(
        tree.node_at(path).map(|node| &node.kind),
        Some(TreeKind::Paragraph | TreeKind::Heading { .. })
    )
}

/// The block that blockquote wrapping operates on: the deepest ancestor
/// whose parent is the document or a clause.
fn wrap_block_path(tree: &Tree, run_path: &[usize]) -> NodePath {
    let mut node: &TreeNode = &tree.root;
    let mut result: NodePath = run_path.to_vec();
    let mut path = Vec::new();
    for &ix in run_path {
        let boundary = matches!(node.kind, TreeKind::Document | TreeKind::Clause { .. });
        path.push(ix);
        if boundary {
            result = path.clone();
        }
        node = match node.children.get(ix) {
            Some(child) => child,
            None => break,
        };
    }
    result
}

fn link_ancestor(tree: &Tree, run_path: &[usize]) -> Option<NodePath> {
    let mut node: &TreeNode = &tree.root;
    let mut path = Vec::new();
    for &ix in run_path {
        let child = node.children.get(ix)?;
        path.push(ix);
        if matches!(child.kind, TreeKind::Link { .. }) {
            return Some(path);
        }
        node = child;
    }
    None
}

fn subtree_text_len(node: &TreeNode) -> usize {
    if node.is_text() {
        return node.text_len();
    }
    node.children.iter().map(|c| subtree_text_len(c)).sum()
}

fn covered_by(removals: &[NodePath], path: &[usize]) -> bool {
    removals
        .iter()
        .any(|removed| path.starts_with(removed.as_slice()))
}

fn remove_at(tree: &mut Tree, path: &[usize]) {
    let Some((&child_ix, parent_path)) = path.split_last() else {
        return;
    };
    if let Some(parent) = tree.node_mut(parent_path) {
        if child_ix < parent.children.len() {
            parent.children.remove(child_ix);
        }
    }
}

fn drop_empty_runs(node: &mut TreeNode) {
    node.children
        .retain(|child| !(child.is_text() && child.text_len() == 0));
}

/// A copy of an inline node with emptied runs stripped; `None` when
/// nothing with content remains.
fn cleaned_inline(child: &Rc<TreeNode>) -> Option<Rc<TreeNode>> {
    match &child.kind {
        TreeKind::Text { .. } => {
            if child.text_len() == 0 {
                None
            } else {
                Some(child.clone())
            }
        }
        TreeKind::Link { .. } => {
            let children: Vec<Rc<TreeNode>> =
                child.children.iter().filter_map(cleaned_inline).collect();
            if children.is_empty() {
                None
            } else {
                let mut link = (**child).clone();
                link.children = children;
                Some(Rc::new(link))
            }
        }
        _ => Some(child.clone()),
    }
}

/// Remove containers left without children by a deletion. Paragraphs and
/// headings survive empty; clause removal is the boundary model's call.
fn prune_empty_containers(tree: &mut Tree) {
    loop {
        let mut empties: Vec<NodePath> = Vec::new();
        let mut path = Vec::new();
        collect_empty_containers(&tree.root, &mut path, &mut empties);
        if empties.is_empty() {
            return;
        }
        empties.sort();
        empties.reverse();
        for path in &empties {
            remove_at(tree, path);
        }
    }
}

fn collect_empty_containers(node: &TreeNode, path: &mut NodePath, out: &mut Vec<NodePath>) {
    for (ix, child) in node.children.iter().enumerate() {
        path.push(ix);
        let prunable = matches!(
            child.kind,
            TreeKind::Blockquote | TreeKind::List { .. } | TreeKind::ListItem | TreeKind::Link { .. }
        );
        if prunable && child.children.is_empty() {
            out.push(path.clone());
        } else {
            collect_empty_containers(child, path, out);
        }
        path.pop();
    }
}

fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(ix, _)| ix)
        .unwrap_or(text.len())
}

fn slice_chars(text: &str, from: usize, to: usize) -> String {
    let start = byte_offset(text, from);
    let end = byte_offset(text, to);
    text[start..end].to_string()
}
