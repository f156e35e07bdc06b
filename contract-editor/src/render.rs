//! Render instructions for the host surface.
//!
//! The rendering surface dispatches on node kind; the core hands it a
//! serializable instruction per node instead of depending on the surface's
//! dispatch mechanism. Keys and lock state ride along so the surface can
//! anchor selections and grey out locked regions.

use serde::Serialize;

use crate::tree::nodes::{Tree, TreeKind, TreeNode};

/// What the surface should draw for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderInstruction {
    Document,
    Heading {
        level: u8,
    },
    Paragraph,
    Blockquote,
    CodeBlock {
        language: Option<String>,
    },
    List {
        ordered: bool,
    },
    ListItem,
    Clause {
        id: String,
        clause_type: String,
    },
    Text {
        text: String,
        bold: bool,
        italic: bool,
        code: bool,
    },
    Link {
        href: String,
        title: Option<String>,
    },
    LineBreak,
}

/// One node of the render projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub key: u64,
    pub locked: bool,
    #[serde(flatten)]
    pub instruction: RenderInstruction,
    pub children: Vec<RenderNode>,
}

/// Project the whole tree into render instructions.
pub fn render_tree(tree: &Tree) -> RenderNode {
    render_node(&tree.root)
}

fn render_node(node: &TreeNode) -> RenderNode {
    RenderNode {
        key: node.key.as_u64(),
        locked: node.locked,
        instruction: instruction_for(&node.kind),
        children: node.children.iter().map(|child| render_node(child)).collect(),
    }
}

fn instruction_for(kind: &TreeKind) -> RenderInstruction {
    match kind {
        TreeKind::Document => RenderInstruction::Document,
        TreeKind::Heading { level } => RenderInstruction::Heading { level: *level },
        TreeKind::Paragraph => RenderInstruction::Paragraph,
        TreeKind::Blockquote => RenderInstruction::Blockquote,
        TreeKind::CodeBlock { language } => RenderInstruction::CodeBlock {
            language: language.clone(),
        },
        TreeKind::List { ordered } => RenderInstruction::List { ordered: *ordered },
        TreeKind::ListItem => RenderInstruction::ListItem,
        TreeKind::Clause {
            id, clause_type, ..
        } => RenderInstruction::Clause {
            id: id.clone(),
            clause_type: clause_type.clone(),
        },
        TreeKind::Text { text, marks } => RenderInstruction::Text {
            text: text.clone(),
            bold: marks.bold,
            italic: marks.italic,
            code: marks.code,
        },
        TreeKind::Link { href, title } => RenderInstruction::Link {
            href: href.clone(),
            title: title.clone(),
        },
        TreeKind::LineBreak => RenderInstruction::LineBreak,
    }
}
