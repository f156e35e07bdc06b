//! Key-to-path index and document-order run listing.
//!
//! Selection lookup needs to go from a node key to its position in the
//! tree. Rather than embedding parent back-references in nodes (cyclic
//! ownership), an index from key to path is rebuilt alongside the tree
//! after every accepted edit.

use std::collections::HashMap;

use crate::tree::nodes::{NodeKey, Tree, TreeKind, TreeNode};

/// Path from the root to a node, as child indices.
pub type NodePath = Vec<usize>;

/// Map from node key to tree path.
#[derive(Debug, Default)]
pub struct KeyIndex {
    paths: HashMap<NodeKey, NodePath>,
}

impl KeyIndex {
    pub fn build(tree: &Tree) -> Self {
        let mut index = KeyIndex::default();
        let mut path = Vec::new();
        index.visit(&tree.root, &mut path);
        index
    }

    fn visit(&mut self, node: &TreeNode, path: &mut NodePath) {
        self.paths.insert(node.key, path.clone());
        for (ix, child) in node.children.iter().enumerate() {
            path.push(ix);
            self.visit(child, path);
            path.pop();
        }
    }

    pub fn path(&self, key: NodeKey) -> Option<&NodePath> {
        self.paths.get(&key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.paths.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// One text run in document order, with the context range operations need.
#[derive(Debug, Clone)]
pub struct RunRef {
    pub key: NodeKey,
    pub path: NodePath,
    /// Char length of the run's text
    pub len: usize,
    /// Lock state; the transformer materializes lock propagation onto
    /// every node, so the run's own flag is authoritative
    pub locked: bool,
    /// Paths of every enclosing clause, outermost first
    pub clauses: Vec<NodePath>,
}

/// All text runs of the tree in document order.
pub fn collect_runs(tree: &Tree) -> Vec<RunRef> {
    let mut runs = Vec::new();
    let mut path = Vec::new();
    let mut clauses = Vec::new();
    visit_runs(&tree.root, &mut path, &mut clauses, &mut runs);
    runs
}

fn visit_runs(
    node: &TreeNode,
    path: &mut NodePath,
    clauses: &mut Vec<NodePath>,
    runs: &mut Vec<RunRef>,
) {
    if let TreeKind::Text { .. } = node.kind {
        runs.push(RunRef {
            key: node.key,
            path: path.clone(),
            len: node.text_len(),
            locked: node.locked,
            clauses: clauses.clone(),
        });
        return;
    }
    let is_clause = node.is_clause();
    if is_clause {
        clauses.push(path.clone());
    }
    for (ix, child) in node.children.iter().enumerate() {
        path.push(ix);
        visit_runs(child, path, clauses, runs);
        path.pop();
    }
    if is_clause {
        clauses.pop();
    }
}

/// Lock state of the node at `path`.
pub fn locked_at(tree: &Tree, path: &[usize]) -> bool {
    tree.node_at(path).map(|node| node.locked).unwrap_or(false)
}
