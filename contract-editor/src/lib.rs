//! Editing core for the contract markdown dialect
//!
//!     This crate turns legal-contract templates written in a constrained
//!     markdown dialect into an editable, selectively-locked document tree,
//!     and turns edited trees back into markdown losslessly enough that a
//!     parse of the output reproduces the same structure.
//!
//!     This is a pure lib: it powers whatever surface renders the document
//!     but is shell agnostic, that is no code here supposes a terminal, a
//!     DOM, or any host environment.
//!
//!     The file structure:
//!     .
//!     ├── error.rs            # Error taxonomy (parse / rejected / invariant)
//!     ├── ast                 # The markdown-facing syntax tree
//!     ├── markdown
//!     │   ├── parser.rs       # markdown → AST (comrak + clause fences)
//!     │   └── serializer.rs   # AST → markdown (comrak)
//!     ├── tree
//!     │   ├── nodes.rs        # keyed, lockable document tree
//!     │   ├── index.rs        # key → path index, document-order runs
//!     │   └── transform.rs    # AST ⇄ tree, key continuity, lock policy
//!     ├── selection.rs        # anchors, ranges, global positions
//!     ├── boundary.rs         # clause atomicity and lock queries
//!     ├── commands.rs         # formatting engine + primitive edits
//!     ├── controller.rs       # the editing controller
//!     ├── render.rs           # render instructions for the host surface
//!     └── inspect.rs          # deterministic tag rendering
//!
//! Core Algorithms
//!
//!     The heavy lifting is the bidirectional inline transformation: the
//!     AST nests strong/emphasis/code spans, while the editable tree keeps
//!     flat text runs carrying mark sets. Formatting commands split runs at
//!     selection boundaries and re-merge neighbors with identical mark
//!     sets; the way back regroups runs into span nesting that re-parses
//!     identically. Clause fences ride through markdown as HTML-comment
//!     annotations and are folded into nested clause nodes by a stack pass.
//!
//! Library Choices
//!
//!     Markdown is never parsed or printed by hand here: comrak owns both
//!     directions, and this crate adapts its AST to and from the contract
//!     shapes. Link targets are validated with the url crate.

pub mod ast;
pub mod boundary;
pub mod commands;
pub mod controller;
pub mod error;
pub mod inspect;
pub mod markdown;
pub mod render;
pub mod selection;
pub mod tree;

pub use commands::EditResult;
pub use controller::{EditOutcome, EditingController, EditorOptions, Intent};
pub use error::{EditorError, RejectReason};
pub use inspect::ast_to_tag;
pub use markdown::{parse, serialize};
pub use render::{render_tree, RenderInstruction, RenderNode};
pub use selection::{anchor_at_global, global_pos, Anchor, Bias, Selection};
pub use tree::{
    ast_to_tree, ast_to_tree_with_continuity, collect_runs, tree_to_ast, KeyAllocator, LockOptions,
    Mark, MarkSet, NodeKey, Tree, TreeKind, TreeNode,
};
