//! AST ⇄ document tree transformers.
//!
//! The two directions are mutual structural inverses up to key assignment:
//! `tree_to_ast(ast_to_tree(ast))` reproduces `ast` under structural
//! equality. Keys are never part of AST equality.
//!
//! Inline content changes shape across the boundary. The AST nests
//! `Strong`/`Emphasis`/`Code` spans; the tree flattens them into text runs
//! carrying mark sets, which is what formatting commands split and merge.
//! Going back, runs are regrouped into spans whose nesting matches what a
//! CommonMark parser would produce for the serialized output (emphasis
//! outside strong on full overlap, widest mark wins otherwise), so the
//! round-trip law holds for every tree the editor can build.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{self, BlockNode, InlineNode};
use crate::error::EditorError;
use crate::tree::nodes::{KeyAllocator, Mark, MarkSet, NodeKey, Tree, TreeKind, TreeNode};

/// Lock assignment policy applied while building a tree.
#[derive(Debug, Clone, Copy)]
pub struct LockOptions {
    /// Global override: the entire document is locked
    pub lock_all: bool,
    /// Whether clauses without an explicit `locked` attribute are locked
    pub default_clause_locked: bool,
}

impl Default for LockOptions {
    fn default() -> Self {
        LockOptions {
            lock_all: false,
            default_clause_locked: true,
        }
    }
}

/// Build a document tree from an AST, assigning fresh keys throughout.
pub fn ast_to_tree(doc: &ast::Document, keys: &mut KeyAllocator, opts: &LockOptions) -> Tree {
    Builder {
        keys,
        opts,
        continuity: None,
    }
    .build(doc)
}

/// Build a document tree from an AST, reusing keys from `prior` for nodes
/// with unchanged kind, position, and content so selection anchors and
/// clause identities survive the rebuild.
pub fn ast_to_tree_with_continuity(
    doc: &ast::Document,
    keys: &mut KeyAllocator,
    opts: &LockOptions,
    prior: &Tree,
) -> Tree {
    let mut map = HashMap::new();
    let mut path = Vec::new();
    collect_fingerprints(&prior.root, &mut path, &mut map);
    Builder {
        keys,
        opts,
        continuity: Some(map),
    }
    .build(doc)
}

fn collect_fingerprints(
    node: &TreeNode,
    path: &mut Vec<usize>,
    map: &mut HashMap<String, NodeKey>,
) {
    map.insert(fingerprint(path, &node.kind), node.key);
    for (ix, child) in node.children.iter().enumerate() {
        path.push(ix);
        collect_fingerprints(child, path, map);
        path.pop();
    }
}

fn fingerprint(path: &[usize], kind: &TreeKind) -> String {
    let (tag, payload) = match kind {
        TreeKind::Document => ("document", String::new()),
        TreeKind::Heading { level } => ("heading", level.to_string()),
        TreeKind::Paragraph => ("paragraph", String::new()),
        TreeKind::Blockquote => ("blockquote", String::new()),
        TreeKind::CodeBlock { language } => ("code_block", language.clone().unwrap_or_default()),
        TreeKind::List { ordered } => ("list", ordered.to_string()),
        TreeKind::ListItem => ("list_item", String::new()),
        TreeKind::Clause { id, .. } => ("clause", id.clone()),
        TreeKind::Text { text, marks } => (
            "text",
            format!(
                "{}|{}{}{}",
                text, marks.bold as u8, marks.italic as u8, marks.code as u8
            ),
        ),
        TreeKind::Link { href, .. } => ("link", href.clone()),
        TreeKind::LineBreak => ("line_break", String::new()),
    };
    format!("{path:?}|{tag}|{payload}")
}

struct Builder<'a> {
    keys: &'a mut KeyAllocator,
    opts: &'a LockOptions,
    continuity: Option<HashMap<String, NodeKey>>,
}

impl Builder<'_> {
    fn build(mut self, doc: &ast::Document) -> Tree {
        let locked = self.opts.lock_all;
        let mut root = TreeNode::new(
            self.key_for(&[], &TreeKind::Document),
            TreeKind::Document,
            locked,
        );
        let mut path = Vec::new();
        for block in &doc.children {
            path.push(root.children.len());
            let child = self.build_block(block, &mut path, locked);
            path.pop();
            root.children.push(Rc::new(child));
        }
        Tree::new(root)
    }

    fn key_for(&mut self, path: &[usize], kind: &TreeKind) -> NodeKey {
        if let Some(map) = &mut self.continuity {
            if let Some(key) = map.remove(&fingerprint(path, kind)) {
                return key;
            }
        }
        self.keys.next_key()
    }

    fn build_block(&mut self, block: &BlockNode, path: &mut Vec<usize>, inherited: bool) -> TreeNode {
        match block {
            BlockNode::Heading(h) => {
                let kind = TreeKind::Heading { level: h.level };
                let mut node = TreeNode::new(self.key_for(path, &kind), kind, inherited);
                self.build_inlines(&h.content, MarkSet::empty(), inherited, path, &mut node.children);
                canonicalize_children(&mut node.children);
                node
            }
            BlockNode::Paragraph(p) => {
                let mut node =
                    TreeNode::new(self.key_for(path, &TreeKind::Paragraph), TreeKind::Paragraph, inherited);
                self.build_inlines(&p.content, MarkSet::empty(), inherited, path, &mut node.children);
                canonicalize_children(&mut node.children);
                node
            }
            BlockNode::Blockquote(b) => {
                let mut node = TreeNode::new(
                    self.key_for(path, &TreeKind::Blockquote),
                    TreeKind::Blockquote,
                    inherited,
                );
                for child in &b.children {
                    path.push(node.children.len());
                    let built = self.build_block(child, path, inherited);
                    path.pop();
                    node.children.push(Rc::new(built));
                }
                node
            }
            BlockNode::CodeBlock(c) => {
                let kind = TreeKind::CodeBlock {
                    language: c.language.clone(),
                };
                let mut node = TreeNode::new(self.key_for(path, &kind), kind, inherited);
                path.push(0);
                let run_kind = TreeKind::Text {
                    text: c.literal.clone(),
                    marks: MarkSet::empty(),
                };
                let run = TreeNode::new(self.key_for(path, &run_kind), run_kind, inherited);
                path.pop();
                node.children.push(Rc::new(run));
                node
            }
            BlockNode::List(l) => {
                let kind = TreeKind::List { ordered: l.ordered };
                let mut node = TreeNode::new(self.key_for(path, &kind), kind, inherited);
                for item in &l.items {
                    path.push(node.children.len());
                    let mut item_node = TreeNode::new(
                        self.key_for(path, &TreeKind::ListItem),
                        TreeKind::ListItem,
                        inherited,
                    );
                    for child in &item.children {
                        path.push(item_node.children.len());
                        let built = self.build_block(child, path, inherited);
                        path.pop();
                        item_node.children.push(Rc::new(built));
                    }
                    path.pop();
                    node.children.push(Rc::new(item_node));
                }
                node
            }
            BlockNode::Clause(c) => {
                let locked = if self.opts.lock_all {
                    true
                } else {
                    c.locked.unwrap_or(self.opts.default_clause_locked)
                };
                let kind = TreeKind::Clause {
                    id: c.id.clone(),
                    clause_type: c.clause_type.clone(),
                    locked_attr: c.locked,
                };
                let mut node = TreeNode::new(self.key_for(path, &kind), kind, locked);
                for child in &c.children {
                    path.push(node.children.len());
                    let built = self.build_block(child, path, locked);
                    path.pop();
                    node.children.push(Rc::new(built));
                }
                node
            }
        }
    }

    fn build_inlines(
        &mut self,
        content: &[InlineNode],
        marks: MarkSet,
        locked: bool,
        path: &mut Vec<usize>,
        out: &mut Vec<Rc<TreeNode>>,
    ) {
        for inline in content {
            match inline {
                InlineNode::Text(text) => {
                    path.push(out.len());
                    let kind = TreeKind::Text {
                        text: text.clone(),
                        marks,
                    };
                    let run = TreeNode::new(self.key_for(path, &kind), kind, locked);
                    path.pop();
                    out.push(Rc::new(run));
                }
                InlineNode::Strong(children) => {
                    self.build_inlines(children, marks.with(Mark::Bold), locked, path, out)
                }
                InlineNode::Emphasis(children) => {
                    self.build_inlines(children, marks.with(Mark::Italic), locked, path, out)
                }
                InlineNode::Code(text) => {
                    path.push(out.len());
                    let kind = TreeKind::Text {
                        text: text.clone(),
                        marks: marks.with(Mark::Code),
                    };
                    let run = TreeNode::new(self.key_for(path, &kind), kind, locked);
                    path.pop();
                    out.push(Rc::new(run));
                }
                InlineNode::Link(link) => {
                    path.push(out.len());
                    let kind = TreeKind::Link {
                        href: link.href.clone(),
                        title: link.title.clone(),
                    };
                    let mut node = TreeNode::new(self.key_for(path, &kind), kind, locked);
                    self.build_inlines(&link.content, marks, locked, path, &mut node.children);
                    canonicalize_children(&mut node.children);
                    path.pop();
                    out.push(Rc::new(node));
                }
                InlineNode::LineBreak => {
                    path.push(out.len());
                    let node =
                        TreeNode::new(self.key_for(path, &TreeKind::LineBreak), TreeKind::LineBreak, locked);
                    path.pop();
                    out.push(Rc::new(node));
                }
            }
        }
    }
}

/// Convert a document tree back to an AST.
pub fn tree_to_ast(tree: &Tree) -> ast::Document {
    ast::Document {
        children: blocks_to_ast(&tree.root.children),
    }
}

fn blocks_to_ast(children: &[Rc<TreeNode>]) -> Vec<BlockNode> {
    children.iter().filter_map(|c| block_to_ast(c)).collect()
}

fn block_to_ast(node: &TreeNode) -> Option<BlockNode> {
    match &node.kind {
        TreeKind::Heading { level } => Some(BlockNode::Heading(ast::Heading {
            level: *level,
            content: children_to_inlines(&node.children, true),
        })),
        TreeKind::Paragraph => {
            let content = children_to_inlines(&node.children, true);
            if content.is_empty() {
                None
            } else {
                Some(BlockNode::Paragraph(ast::Paragraph { content }))
            }
        }
        TreeKind::Blockquote => {
            let children = blocks_to_ast(&node.children);
            if children.is_empty() {
                None
            } else {
                Some(BlockNode::Blockquote(ast::Blockquote { children }))
            }
        }
        TreeKind::CodeBlock { language } => {
            let mut literal = String::new();
            for child in &node.children {
                if let TreeKind::Text { text, .. } = &child.kind {
                    literal.push_str(text);
                }
            }
            if !literal.is_empty() && !literal.ends_with('\n') {
                literal.push('\n');
            }
            Some(BlockNode::CodeBlock(ast::CodeBlock {
                language: language.clone(),
                literal,
            }))
        }
        TreeKind::List { ordered } => {
            let items: Vec<ast::ListItem> = node
                .children
                .iter()
                .filter_map(|item| {
                    let children = blocks_to_ast(&item.children);
                    if children.is_empty() {
                        None
                    } else {
                        Some(ast::ListItem { children })
                    }
                })
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(BlockNode::List(ast::List {
                    ordered: *ordered,
                    items,
                }))
            }
        }
        TreeKind::Clause {
            id,
            clause_type,
            locked_attr,
        } => Some(BlockNode::Clause(ast::Clause {
            id: id.clone(),
            clause_type: clause_type.clone(),
            locked: *locked_attr,
            children: blocks_to_ast(&node.children),
        })),
        // Inline kinds have no block counterpart; a document node never
        // nests.
        _ => None,
    }
}

/// Convert the inline children of a block node back to AST inline spans.
///
/// `trim_edges` drops leading/trailing whitespace at the block boundary,
/// which a CommonMark parser would strip anyway; keeping it would break the
/// round-trip law without changing what the reader sees.
fn children_to_inlines(children: &[Rc<TreeNode>], trim_edges: bool) -> Vec<InlineNode> {
    let mut out = Vec::new();
    let mut pending: Vec<(String, MarkSet)> = Vec::new();
    for child in children {
        match &child.kind {
            TreeKind::Text { text, marks } => {
                if !text.is_empty() {
                    pending.push((text.clone(), *marks));
                }
            }
            TreeKind::Link { href, title } => {
                flush_runs(&mut pending, &mut out);
                let content = children_to_inlines(&child.children, false);
                if content.is_empty() {
                    continue;
                }
                if href.is_empty() {
                    for inline in content {
                        push_inline(&mut out, inline);
                    }
                } else {
                    out.push(InlineNode::Link(ast::Link {
                        href: href.clone(),
                        title: title.clone(),
                        content,
                    }));
                }
            }
            TreeKind::LineBreak => {
                flush_runs(&mut pending, &mut out);
                out.push(InlineNode::LineBreak);
            }
            _ => flush_runs(&mut pending, &mut out),
        }
    }
    flush_runs(&mut pending, &mut out);
    if trim_edges {
        trim_edge_whitespace(&mut out);
    }
    out
}

fn flush_runs(pending: &mut Vec<(String, MarkSet)>, out: &mut Vec<InlineNode>) {
    if pending.is_empty() {
        return;
    }
    let runs = std::mem::take(pending);
    for inline in group_runs(&runs) {
        push_inline(out, inline);
    }
}

/// Append an inline node, merging adjacent plain text.
fn push_inline(out: &mut Vec<InlineNode>, inline: InlineNode) {
    if let InlineNode::Text(new) = &inline {
        if let Some(InlineNode::Text(prev)) = out.last_mut() {
            prev.push_str(new);
            return;
        }
    }
    out.push(inline);
}

/// Regroup a flat run sequence into nested inline spans.
///
/// The widest mark from the current position wins the outer span; on a tie
/// emphasis wraps strong, matching how `***x***` re-parses. Whitespace at a
/// span edge is moved outside the span, since delimiters flanking
/// whitespace would not re-parse as formatting.
fn group_runs(runs: &[(String, MarkSet)]) -> Vec<InlineNode> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < runs.len() {
        let (text, marks) = &runs[i];
        if marks.bold || marks.italic {
            let bold_span = if marks.bold {
                span_len(runs, i, |m| m.bold)
            } else {
                0
            };
            let italic_span = if marks.italic {
                span_len(runs, i, |m| m.italic)
            } else {
                0
            };
            let (strip, span) = if bold_span > italic_span {
                (Mark::Bold, bold_span)
            } else {
                (Mark::Italic, italic_span)
            };
            let mut slice: Vec<(String, MarkSet)> = runs[i..i + span].to_vec();
            for run in &mut slice {
                run.1.set(strip, false);
            }
            let (lead, trail) = extract_edge_whitespace(&mut slice);
            if !lead.is_empty() {
                push_inline(&mut out, InlineNode::Text(lead));
            }
            let children = group_runs(&slice);
            if !children.is_empty() {
                let span_node = match strip {
                    Mark::Bold => InlineNode::Strong(children),
                    Mark::Italic => InlineNode::Emphasis(children),
                    Mark::Code => unreachable!("code is never a grouping mark"),
                };
                out.push(span_node);
            }
            if !trail.is_empty() {
                push_inline(&mut out, InlineNode::Text(trail));
            }
            i += span;
        } else {
            if marks.code {
                out.push(InlineNode::Code(text.clone()));
            } else {
                push_inline(&mut out, InlineNode::Text(text.clone()));
            }
            i += 1;
        }
    }
    out
}

fn span_len(runs: &[(String, MarkSet)], from: usize, has: impl Fn(&MarkSet) -> bool) -> usize {
    runs[from..].iter().take_while(|(_, m)| has(m)).count()
}

/// Pull whitespace off the outer edges of a span's runs. Code runs keep
/// their spacing; backtick spans preserve it on re-parse.
fn extract_edge_whitespace(slice: &mut Vec<(String, MarkSet)>) -> (String, String) {
    let mut lead = String::new();
    let mut trail = String::new();
    if let Some((text, marks)) = slice.first_mut() {
        if !marks.code {
            let trimmed = text.trim_start();
            lead = text[..text.len() - trimmed.len()].to_string();
            *text = trimmed.to_string();
        }
    }
    if slice.first().map(|(t, _)| t.is_empty()).unwrap_or(false) {
        slice.remove(0);
    }
    if let Some((text, marks)) = slice.last_mut() {
        if !marks.code {
            let trimmed = text.trim_end();
            trail = text[trimmed.len()..].to_string();
            *text = trimmed.to_string();
        }
    }
    if slice.last().map(|(t, _)| t.is_empty()).unwrap_or(false) {
        slice.pop();
    }
    (lead, trail)
}

fn trim_edge_whitespace(inlines: &mut Vec<InlineNode>) {
    if let Some(InlineNode::Text(text)) = inlines.first_mut() {
        *text = text.trim_start().to_string();
        if text.is_empty() {
            inlines.remove(0);
        }
    }
    if let Some(InlineNode::Text(text)) = inlines.last_mut() {
        *text = text.trim_end().to_string();
        if text.is_empty() {
            inlines.pop();
        }
    }
}

/// Merge adjacent text runs with identical mark sets and lock state. The
/// first run's key survives the merge.
pub(crate) fn canonicalize_children(children: &mut Vec<Rc<TreeNode>>) {
    let mut ix = 1;
    while ix < children.len() {
        let mergeable = {
            let (prev, curr) = (&children[ix - 1], &children[ix]);
            match (&prev.kind, &curr.kind) {
                (
                    TreeKind::Text { marks: a, .. },
                    TreeKind::Text {
                        text: curr_text,
                        marks: b,
                    },
                ) if a == b && prev.locked == curr.locked => Some(curr_text.clone()),
                _ => None,
            }
        };
        if let Some(tail) = mergeable {
            let prev = Rc::make_mut(&mut children[ix - 1]);
            if let TreeKind::Text { text, .. } = &mut prev.kind {
                text.push_str(&tail);
            }
            children.remove(ix);
        } else {
            ix += 1;
        }
    }
}

/// Check the mark-canonicalization invariant over the whole tree: no two
/// adjacent sibling text runs may carry identical mark sets.
pub fn verify_canonical(tree: &Tree) -> Result<(), EditorError> {
    verify_node(&tree.root)
}

fn verify_node(node: &TreeNode) -> Result<(), EditorError> {
    for pair in node.children.windows(2) {
        if let (
            TreeKind::Text { marks: a, .. },
            TreeKind::Text { marks: b, .. },
        ) = (&pair[0].kind, &pair[1].kind)
        {
            if a == b && pair[0].locked == pair[1].locked {
                return Err(EditorError::Invariant(format!(
                    "adjacent text runs {} and {} share a mark set",
                    pair[0].key, pair[1].key
                )));
            }
        }
    }
    for child in &node.children {
        verify_node(child)?;
    }
    Ok(())
}
