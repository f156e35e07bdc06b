//! Markdown parsing (contract markdown → AST)
//!
//! Pipeline: markdown string → comrak AST → contract AST.
//!
//! The only fatal condition is a structurally unbalanced clause fence: a
//! close without an open, an open left unclosed at end of input, or a
//! labeled close naming a different clause than the innermost open fence.
//! Everything else degrades to literal text.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};

use crate::ast::{self, BlockNode, Document, InlineNode};
use crate::error::EditorError;

/// Parse contract markdown into a `Document` AST.
pub fn parse(source: &str) -> Result<Document, EditorError> {
    let arena = Arena::new();
    let options = parser_options();
    let root = parse_document(&arena, source, &options);

    let mut stack: Vec<ClauseFrame> = Vec::new();
    let mut top: Vec<BlockNode> = Vec::new();

    for child in root.children() {
        match classify_fence(child) {
            FenceAction::Open {
                id,
                clause_type,
                locked,
            } => {
                stack.push(ClauseFrame {
                    id,
                    clause_type,
                    locked,
                    children: Vec::new(),
                });
            }
            FenceAction::Close(label) => {
                let frame = stack.pop().ok_or_else(|| {
                    EditorError::Parse("clause close fence without a matching open".to_string())
                })?;
                if let Some(label) = label {
                    if label != frame.id {
                        return Err(EditorError::Parse(format!(
                            "clause close fence names '{label}' but the open fence is '{}'",
                            frame.id
                        )));
                    }
                }
                let clause = BlockNode::Clause(ast::Clause {
                    id: frame.id,
                    clause_type: frame.clause_type,
                    locked: frame.locked,
                    children: frame.children,
                });
                push_block(&mut stack, &mut top, clause);
            }
            FenceAction::NotAFence => {
                if let Some(block) = convert_block(child) {
                    push_block(&mut stack, &mut top, block);
                }
            }
        }
    }

    if let Some(frame) = stack.last() {
        return Err(EditorError::Parse(format!(
            "clause fence '{}' is never closed",
            frame.id
        )));
    }

    Ok(Document { children: top })
}

/// The dialect is CommonMark core; no comrak extensions.
fn parser_options() -> ComrakOptions<'static> {
    ComrakOptions::default()
}

struct ClauseFrame {
    id: String,
    clause_type: String,
    locked: Option<bool>,
    children: Vec<BlockNode>,
}

fn push_block(stack: &mut Vec<ClauseFrame>, top: &mut Vec<BlockNode>, block: BlockNode) {
    match stack.last_mut() {
        Some(frame) => frame.children.push(block),
        None => top.push(block),
    }
}

enum FenceAction {
    Open {
        id: String,
        clause_type: String,
        locked: Option<bool>,
    },
    Close(Option<String>),
    NotAFence,
}

fn classify_fence<'a>(node: &'a AstNode<'a>) -> FenceAction {
    let data = node.data.borrow();
    let literal = match &data.value {
        NodeValue::HtmlBlock(html) => html.literal.clone(),
        _ => return FenceAction::NotAFence,
    };
    if let Some((id, clause_type, locked)) = parse_clause_open(&literal) {
        return FenceAction::Open {
            id,
            clause_type,
            locked,
        };
    }
    if let Some(label) = parse_clause_close(&literal) {
        return FenceAction::Close(label);
    }
    FenceAction::NotAFence
}

/// Parse a clause open fence: `<!-- clause id=x type=y [locked=bool] -->`.
/// Returns `None` for anything that is not well-formed; the block then
/// degrades like any other HTML.
fn parse_clause_open(html: &str) -> Option<(String, String, Option<bool>)> {
    let trimmed = html.trim();
    let inner = trimmed
        .strip_prefix("<!-- clause")?
        .strip_suffix("-->")?;
    if !inner.starts_with(char::is_whitespace) {
        return None;
    }

    let mut id = None;
    let mut clause_type = None;
    let mut locked = None;
    for part in inner.split_whitespace() {
        let (key, value) = part.split_once('=')?;
        match key {
            "id" => id = Some(value.to_string()),
            "type" => clause_type = Some(value.to_string()),
            "locked" => {
                locked = match value {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                }
            }
            _ => {}
        }
    }
    Some((id?, clause_type?, locked))
}

/// Parse a clause close fence: `<!-- /clause -->` or `<!-- /clause id -->`.
fn parse_clause_close(html: &str) -> Option<Option<String>> {
    let trimmed = html.trim();
    let inner = trimmed
        .strip_prefix("<!-- /clause")?
        .strip_suffix("-->")?;
    if !inner.is_empty() && !inner.starts_with(char::is_whitespace) {
        return None;
    }
    let label = inner.trim();
    if label.is_empty() {
        Some(None)
    } else if label.chars().any(char::is_whitespace) {
        None
    } else {
        Some(Some(label.to_string()))
    }
}

fn convert_block<'a>(node: &'a AstNode<'a>) -> Option<BlockNode> {
    let data = node.data.borrow();
    match &data.value {
        NodeValue::Heading(heading) => Some(BlockNode::Heading(ast::Heading {
            level: heading.level,
            content: convert_inlines(node),
        })),
        NodeValue::Paragraph => {
            let content = convert_inlines(node);
            if content.is_empty() {
                None
            } else {
                Some(BlockNode::Paragraph(ast::Paragraph { content }))
            }
        }
        NodeValue::BlockQuote => {
            let children: Vec<BlockNode> = node.children().filter_map(convert_block).collect();
            if children.is_empty() {
                None
            } else {
                Some(BlockNode::Blockquote(ast::Blockquote { children }))
            }
        }
        NodeValue::CodeBlock(code) => Some(BlockNode::CodeBlock(ast::CodeBlock {
            language: if code.info.is_empty() {
                None
            } else {
                Some(code.info.clone())
            },
            literal: code.literal.clone(),
        })),
        NodeValue::List(list) => {
            let ordered = matches!(list.list_type, ListType::Ordered);
            let items: Vec<ast::ListItem> = node
                .children()
                .filter_map(|item| {
                    let children: Vec<BlockNode> =
                        item.children().filter_map(convert_block).collect();
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
                Some(BlockNode::List(ast::List { ordered, items }))
            }
        }
        NodeValue::ThematicBreak => Some(BlockNode::Paragraph(ast::Paragraph {
            content: vec![InlineNode::Text("---".to_string())],
        })),
        NodeValue::HtmlBlock(html) => {
            // Comments are invisible; other raw HTML degrades to its text
            let literal = html.literal.trim();
            if literal.starts_with("<!--") || literal.is_empty() {
                None
            } else {
                Some(BlockNode::Paragraph(ast::Paragraph {
                    content: vec![InlineNode::Text(literal.to_string())],
                }))
            }
        }
        _ => {
            // Unknown block kind: fall back to its literal text
            let mut text = String::new();
            collect_text(node, &mut text);
            let text = text.trim().to_string();
            if text.is_empty() {
                None
            } else {
                Some(BlockNode::Paragraph(ast::Paragraph {
                    content: vec![InlineNode::Text(text)],
                }))
            }
        }
    }
}

fn convert_inlines<'a>(node: &'a AstNode<'a>) -> Vec<InlineNode> {
    let mut out = Vec::new();
    for child in node.children() {
        convert_inline(child, &mut out);
    }
    out
}

fn convert_inline<'a>(node: &'a AstNode<'a>, out: &mut Vec<InlineNode>) {
    let data = node.data.borrow();
    match &data.value {
        NodeValue::Text(text) => push_text(out, text),
        NodeValue::SoftBreak => push_text(out, " "),
        NodeValue::LineBreak => out.push(InlineNode::LineBreak),
        NodeValue::Code(code) => out.push(InlineNode::Code(code.literal.clone())),
        NodeValue::Strong => {
            let children = convert_inlines(node);
            if !children.is_empty() {
                out.push(InlineNode::Strong(children));
            }
        }
        NodeValue::Emph => {
            let children = convert_inlines(node);
            if !children.is_empty() {
                out.push(InlineNode::Emphasis(children));
            }
        }
        NodeValue::Link(link) => {
            let content = convert_inlines(node);
            if content.is_empty() {
                return;
            }
            if link.url.is_empty() {
                // Links without a target degrade to their text
                for inline in content {
                    push_inline(out, inline);
                }
            } else {
                out.push(InlineNode::Link(ast::Link {
                    href: link.url.clone(),
                    title: if link.title.is_empty() {
                        None
                    } else {
                        Some(link.title.clone())
                    },
                    content,
                }));
            }
        }
        NodeValue::Image(_) => {
            let mut alt = String::new();
            collect_text(node, &mut alt);
            push_text(out, &alt);
        }
        NodeValue::HtmlInline(html) => push_text(out, html),
        _ => {}
    }
}

fn push_text(out: &mut Vec<InlineNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(InlineNode::Text(prev)) = out.last_mut() {
        prev.push_str(text);
        return;
    }
    out.push(InlineNode::Text(text.to_string()));
}

fn push_inline(out: &mut Vec<InlineNode>, inline: InlineNode) {
    if let InlineNode::Text(text) = &inline {
        push_text(out, text);
        return;
    }
    out.push(inline);
}

/// Collect literal text from a node subtree (used for degradation).
fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => out.push_str(text),
        NodeValue::Code(code) => out.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}
