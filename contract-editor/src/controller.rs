//! The editing controller: sole owner of the current tree version.
//!
//! The controller receives user intents from the rendering surface,
//! consults the boundary model, delegates mutation to the command engine,
//! and hands the host a new tree plus the re-serialized markdown. Before a
//! mutation commits, the re-derived AST must survive a serialize/parse
//! round trip and the tree must satisfy mark canonicalization; a failure
//! discards the mutation and keeps the prior version.

use crate::boundary;
use crate::commands::{self, EditResult};
use crate::error::{EditorError, RejectReason};
use crate::markdown;
use crate::selection::{resolve, Selection};
use crate::tree::index::{collect_runs, KeyIndex};
use crate::tree::nodes::{KeyAllocator, Mark, NodeKey, Tree, TreeKind, TreeNode};
use crate::tree::transform::{
    ast_to_tree, ast_to_tree_with_continuity, tree_to_ast, verify_canonical, LockOptions,
};

/// Explicit configuration record; the controller keeps no global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Global override: the entire document is read-only
    pub lock_text: bool,
    /// Whether clauses without an explicit `locked` attribute are treated
    /// as locked boilerplate
    pub default_clause_locked: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        EditorOptions {
            lock_text: false,
            default_clause_locked: true,
        }
    }
}

/// A user intent delivered by the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetSelection(Selection),
    InsertText(String),
    DeleteRange,
    ApplyMark(Mark),
    ApplyBlockquote,
    ApplyLink { href: String, title: Option<String> },
}

/// What the host gets back after an intent: the current tree version and
/// its markdown value.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub tree: Tree,
    pub markdown: String,
}

type Callback = Box<dyn FnMut(&str)>;

pub struct EditingController {
    options: EditorOptions,
    keys: KeyAllocator,
    tree: Tree,
    index: KeyIndex,
    selection: Option<Selection>,
    markdown: Option<String>,
    on_change: Option<Callback>,
    on_clause_updated: Option<Callback>,
}

impl EditingController {
    pub fn new(options: EditorOptions) -> Self {
        let mut keys = KeyAllocator::new();
        let tree = Tree::new(TreeNode::new(
            keys.next_key(),
            TreeKind::Document,
            options.lock_text,
        ));
        let index = KeyIndex::build(&tree);
        EditingController {
            options,
            keys,
            tree,
            index,
            selection: None,
            markdown: Some(String::new()),
            on_change: None,
            on_clause_updated: None,
        }
    }

    /// Notification invoked with the new markdown after every accepted
    /// mutating edit.
    pub fn set_on_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Notification invoked with a clause id whenever an accepted edit
    /// falls inside that clause.
    pub fn set_on_clause_updated(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_clause_updated = Some(Box::new(callback));
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Load a new markdown value from the host. The previous tree and
    /// selection are discarded, not merged; nodes whose kind, position, and
    /// content are unchanged keep their keys so clause identities and any
    /// host-side anchors survive the reload.
    pub fn load_markdown(&mut self, source: &str) -> Result<(), EditorError> {
        let ast = markdown::parse(source)?;
        let options = self.lock_options();
        self.tree = if self.tree.root.children.is_empty() {
            ast_to_tree(&ast, &mut self.keys, &options)
        } else {
            ast_to_tree_with_continuity(&ast, &mut self.keys, &options, &self.tree)
        };
        self.index = KeyIndex::build(&self.tree);
        self.selection = None;
        self.markdown = None;
        Ok(())
    }

    /// Load a host-built tree. Under `lock_text` every node becomes
    /// locked, matching the markdown load path.
    pub fn load_tree(&mut self, tree: Tree) {
        let mut tree = tree;
        self.keys.ensure_above(max_key(&tree.root).as_u64());
        if self.options.lock_text {
            lock_all(&mut tree);
        }
        self.tree = tree;
        self.index = KeyIndex::build(&self.tree);
        self.selection = None;
        self.markdown = None;
    }

    /// The markdown value of the current tree, re-derived lazily.
    pub fn export_markdown(&mut self) -> Result<String, EditorError> {
        self.current_markdown()
    }

    pub fn on_intent(&mut self, intent: Intent) -> Result<EditOutcome, EditorError> {
        let selection = match &intent {
            Intent::SetSelection(selection) => {
                let runs = collect_runs(&self.tree);
                resolve(&runs, selection)?;
                self.selection = Some(*selection);
                let markdown = self.current_markdown()?;
                return Ok(EditOutcome {
                    tree: self.tree.clone(),
                    markdown,
                });
            }
            _ => self
                .selection
                .ok_or(EditorError::Rejected(RejectReason::OutOfRange))?,
        };

        let (effective, result) = match intent {
            Intent::InsertText(text) => (
                selection,
                commands::insert_text(&self.tree, &selection, &text, &mut self.keys)?,
            ),
            Intent::DeleteRange => {
                let widened = boundary::normalize_deletion(&self.tree, &selection)?;
                (widened, commands::delete_range(&self.tree, &widened)?)
            }
            Intent::ApplyMark(mark) => (
                selection,
                commands::apply_mark(&self.tree, &selection, mark, &mut self.keys)?,
            ),
            Intent::ApplyBlockquote => (
                selection,
                commands::apply_blockquote(&self.tree, &selection, &mut self.keys)?,
            ),
            Intent::ApplyLink { href, title } => (
                selection,
                commands::apply_link(
                    &self.tree,
                    &selection,
                    &href,
                    title.as_deref(),
                    &mut self.keys,
                )?,
            ),
            Intent::SetSelection(_) => unreachable!("handled above"),
        };
        self.commit(&effective, result)
    }

    fn commit(
        &mut self,
        effective: &Selection,
        result: EditResult,
    ) -> Result<EditOutcome, EditorError> {
        if result.tree.same_version(&self.tree) {
            // accepted no-op: keep the selection, notify nobody
            self.selection = result.selection;
            let markdown = self.current_markdown()?;
            return Ok(EditOutcome {
                tree: self.tree.clone(),
                markdown,
            });
        }

        verify_canonical(&result.tree)?;
        let ast = tree_to_ast(&result.tree);
        let markdown = markdown::serialize(&ast)?;
        let reparsed = markdown::parse(&markdown).map_err(|e| {
            EditorError::Invariant(format!("serialized markdown failed to re-parse: {e}"))
        })?;
        if reparsed != ast {
            return Err(EditorError::Invariant(
                "serialize/parse round trip diverged".to_string(),
            ));
        }

        let touched = self.touched_clause_ids(effective);
        self.tree = result.tree;
        self.index = KeyIndex::build(&self.tree);
        self.selection = result.selection;
        self.markdown = Some(markdown.clone());

        if let Some(callback) = &mut self.on_change {
            callback(&markdown);
        }
        if let Some(callback) = &mut self.on_clause_updated {
            for id in &touched {
                callback(id);
            }
        }
        Ok(EditOutcome {
            tree: self.tree.clone(),
            markdown,
        })
    }

    /// Clause ids the effective range intersects, in document order.
    fn touched_clause_ids(&self, selection: &Selection) -> Vec<String> {
        let runs = collect_runs(&self.tree);
        let range = match resolve(&runs, selection) {
            Ok(range) => range,
            Err(_) => return Vec::new(),
        };
        let mut ids: Vec<String> = Vec::new();
        for run in &runs[range.start.0..=range.end.0] {
            for clause_path in &run.clauses {
                if let Some(TreeKind::Clause { id, .. }) =
                    self.tree.node_at(clause_path).map(|node| &node.kind)
                {
                    if !ids.iter().any(|seen| seen == id) {
                        ids.push(id.clone());
                    }
                }
            }
        }
        ids
    }

    /// Whether the node behind `key` sits in a locked region.
    pub fn is_locked(&self, key: NodeKey) -> bool {
        boundary::is_locked(&self.tree, &self.index, key)
    }

    fn current_markdown(&mut self) -> Result<String, EditorError> {
        if let Some(markdown) = &self.markdown {
            return Ok(markdown.clone());
        }
        let markdown = markdown::serialize(&tree_to_ast(&self.tree))?;
        self.markdown = Some(markdown.clone());
        Ok(markdown)
    }

    fn lock_options(&self) -> LockOptions {
        LockOptions {
            lock_all: self.options.lock_text,
            default_clause_locked: self.options.default_clause_locked,
        }
    }
}

fn max_key(node: &TreeNode) -> NodeKey {
    let mut max = node.key;
    for child in &node.children {
        max = max.max(max_key(child));
    }
    max
}

fn lock_all(tree: &mut Tree) {
    fn walk(node: &mut TreeNode) {
        node.locked = true;
        for child in &mut node.children {
            walk(std::rc::Rc::make_mut(child));
        }
    }
    walk(std::rc::Rc::make_mut(&mut tree.root));
}
