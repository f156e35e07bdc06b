//! The editable document tree: keyed nodes, the key index, and the
//! AST ⇄ tree transformers.

pub mod index;
pub mod nodes;
pub mod transform;

pub use index::{collect_runs, KeyIndex, NodePath, RunRef};
pub use nodes::{KeyAllocator, Mark, MarkSet, NodeKey, Tree, TreeKind, TreeNode};
pub use transform::{
    ast_to_tree, ast_to_tree_with_continuity, tree_to_ast, verify_canonical, LockOptions,
};
