//! The editable document tree.
//!
//! The tree mirrors the AST shape but is mutation-oriented: every node
//! carries a stable key (assigned once, preserved across edits so selection
//! anchors and clause identities survive re-renders) and a `locked` flag.
//! Inline nesting is flattened into text runs carrying mark sets, which is
//! the shape formatting commands operate on.
//!
//! Children are held behind `Rc`: cloning a tree is cheap, and edits copy
//! only the spine down to the mutated node (`Rc::make_mut`), so the prior
//! version stays valid for the caller that still holds it.

use std::rc::Rc;

/// Stable identity of a tree node within one editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

impl NodeKey {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "k{}", self.0)
    }
}

/// Hands out fresh keys. Session-scoped; owned by the controller.
#[derive(Debug, Default)]
pub struct KeyAllocator {
    next: u64,
}

impl KeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_key(&mut self) -> NodeKey {
        let key = NodeKey(self.next);
        self.next += 1;
        key
    }

    /// Make sure future keys never collide with keys already present in a
    /// host-supplied tree.
    pub fn ensure_above(&mut self, floor: u64) {
        if self.next <= floor {
            self.next = floor + 1;
        }
    }
}

/// An inline formatting attribute applied to a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Code,
}

/// The set of marks carried by one text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkSet {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

impl MarkSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Code => self.code,
        }
    }

    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Code => self.code = on,
        }
    }

    pub fn with(mut self, mark: Mark) -> Self {
        self.set(mark, true);
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.bold && !self.italic && !self.code
    }
}

/// Kind and kind-specific payload of a tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeKind {
    Document,
    Heading { level: u8 },
    Paragraph,
    Blockquote,
    CodeBlock { language: Option<String> },
    List { ordered: bool },
    ListItem,
    Clause { id: String, clause_type: String, locked_attr: Option<bool> },
    Text { text: String, marks: MarkSet },
    Link { href: String, title: Option<String> },
    LineBreak,
}

/// One node of the editable document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub key: NodeKey,
    pub locked: bool,
    pub kind: TreeKind,
    pub children: Vec<Rc<TreeNode>>,
}

impl TreeNode {
    pub fn new(key: NodeKey, kind: TreeKind, locked: bool) -> Self {
        TreeNode {
            key,
            locked,
            kind,
            children: Vec::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, TreeKind::Text { .. })
    }

    pub fn is_clause(&self) -> bool {
        matches!(self.kind, TreeKind::Clause { .. })
    }

    /// Char length of this node's literal text; 0 for non-text nodes.
    pub fn text_len(&self) -> usize {
        match &self.kind {
            TreeKind::Text { text, .. } => text.chars().count(),
            _ => 0,
        }
    }
}

/// A versioned document tree. Cloning is cheap; mutation goes through
/// [`Tree::node_mut`], which copies only the path down to the target.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub root: Rc<TreeNode>,
}

impl Tree {
    pub fn new(root: TreeNode) -> Self {
        Tree {
            root: Rc::new(root),
        }
    }

    /// Two versions share a root iff no edit separates them.
    pub fn same_version(&self, other: &Tree) -> bool {
        Rc::ptr_eq(&self.root, &other.root)
    }

    /// Immutable lookup by path (sequence of child indices from the root).
    pub fn node_at(&self, path: &[usize]) -> Option<&TreeNode> {
        let mut node: &TreeNode = &self.root;
        for &ix in path {
            node = node.children.get(ix)?;
        }
        Some(node)
    }

    /// Mutable lookup by path. Copies each node along the path whose `Rc`
    /// is shared with another tree version, leaving those versions intact.
    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut TreeNode> {
        let mut node: &mut TreeNode = Rc::make_mut(&mut self.root);
        for &ix in path {
            let slot = node.children.get_mut(ix)?;
            node = Rc::make_mut(slot);
        }
        Some(node)
    }
}
