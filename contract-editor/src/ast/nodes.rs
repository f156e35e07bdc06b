//! Core data structures for the contract document AST.
//!
//! The AST is the interchange shape between the markdown layer and the
//! editable document tree. It carries no keys and no lock state; structural
//! equality (`PartialEq`) is the equality the round-trip law is stated in.

use serde::{Deserialize, Serialize};

/// A block-level node of the contract dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockNode {
    Heading(Heading),
    Paragraph(Paragraph),
    Blockquote(Blockquote),
    CodeBlock(CodeBlock),
    List(List),
    Clause(Clause),
}

/// Represents the root of a document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub children: Vec<BlockNode>,
}

/// Represents a heading with a specific level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub content: Vec<InlineNode>,
}

/// Represents a paragraph of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub content: Vec<InlineNode>,
}

/// A blockquote; contiguous `>` continuation lines parse into one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blockquote {
    pub children: Vec<BlockNode>,
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub literal: String,
}

/// Represents a list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

/// Represents an item in a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub children: Vec<BlockNode>,
}

/// A named, typed, structurally atomic region of contract text.
///
/// `locked` mirrors the fence annotation: `None` means the clause follows
/// the document default for boilerplate, `Some(v)` is an explicit override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub id: String,
    pub clause_type: String,
    pub locked: Option<bool>,
    pub children: Vec<BlockNode>,
}

/// Inline content, such as text, strong, emphasis, code, or links.
///
/// Adjacently tagged: newtype variants carry strings and sequences, which
/// internal tagging cannot represent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InlineNode {
    Text(String),
    Emphasis(Vec<InlineNode>),
    Strong(Vec<InlineNode>),
    Code(String),
    Link(Link),
    LineBreak,
}

/// A hyperlink over inline content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub title: Option<String>,
    pub content: Vec<InlineNode>,
}

/// Concatenated literal text of an inline sequence, ignoring formatting.
pub fn inline_text(content: &[InlineNode]) -> String {
    let mut out = String::new();
    collect_inline_text(content, &mut out);
    out
}

fn collect_inline_text(content: &[InlineNode], out: &mut String) {
    for inline in content {
        match inline {
            InlineNode::Text(text) | InlineNode::Code(text) => out.push_str(text),
            InlineNode::Emphasis(children) | InlineNode::Strong(children) => {
                collect_inline_text(children, out)
            }
            InlineNode::Link(link) => collect_inline_text(&link.content, out),
            InlineNode::LineBreak => out.push(' '),
        }
    }
}

impl Document {
    pub fn with_content(children: Vec<BlockNode>) -> Self {
        Document { children }
    }

    /// Concatenated literal text of the whole document, block by block.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_block_text(&self.children, &mut out);
        out
    }
}

fn collect_block_text(blocks: &[BlockNode], out: &mut String) {
    for block in blocks {
        match block {
            BlockNode::Heading(h) => collect_inline_text(&h.content, out),
            BlockNode::Paragraph(p) => collect_inline_text(&p.content, out),
            BlockNode::Blockquote(b) => collect_block_text(&b.children, out),
            BlockNode::CodeBlock(c) => out.push_str(&c.literal),
            BlockNode::List(l) => {
                for item in &l.items {
                    collect_block_text(&item.children, out);
                }
            }
            BlockNode::Clause(c) => collect_block_text(&c.children, out),
        }
        out.push('\n');
    }
}
