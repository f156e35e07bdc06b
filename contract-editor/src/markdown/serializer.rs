//! Markdown serialization (AST → contract markdown)
//!
//! Pipeline: contract AST → comrak AST → CommonMark string (via comrak's
//! own serializer), followed by a block-separator normalization pass.
//!
//! For any AST this system's parser or editor produces, `parse(serialize(ast))`
//! is structurally equal to `ast`. Clause fences are emitted as HTML-comment
//! blocks whose id/type/locked attributes survive the round trip unchanged.

use std::cell::RefCell;

use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeHtmlBlock,
    NodeLink, NodeList, NodeValue,
};
use comrak::{format_commonmark, Arena, ComrakOptions};

use crate::ast::{BlockNode, Document, InlineNode};
use crate::error::EditorError;

/// Serialize a `Document` AST to contract markdown.
pub fn serialize(doc: &Document) -> Result<String, EditorError> {
    let arena = Arena::new();
    let root = make(&arena, NodeValue::Document);
    for block in &doc.children {
        build_block(&arena, root, block);
    }

    let mut output = Vec::new();
    format_commonmark(root, &serializer_options(), &mut output)
        .map_err(|e| EditorError::Invariant(format!("commonmark serialization failed: {e}")))?;
    let markdown = String::from_utf8(output)
        .map_err(|e| EditorError::Invariant(format!("serializer produced invalid UTF-8: {e}")))?;

    Ok(normalize_block_separation(&markdown))
}

fn serializer_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    // Clause fence comments must pass through verbatim
    options.render.unsafe_ = true;
    // Emit code blocks as fences (honoring the `fenced: true` we build them
    // with); without this comrak falls back to indented blocks, which inject
    // leading whitespace and corrupt the interior of the code.
    options.render.prefer_fenced = true;
    options
}

fn make<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn build_block<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, block: &BlockNode) {
    match block {
        BlockNode::Heading(heading) => {
            let node = make(
                arena,
                NodeValue::Heading(NodeHeading {
                    level: heading.level.min(6),
                    setext: false,
                }),
            );
            parent.append(node);
            build_inlines(arena, node, &heading.content);
        }
        BlockNode::Paragraph(paragraph) => {
            let node = make(arena, NodeValue::Paragraph);
            parent.append(node);
            build_inlines(arena, node, &paragraph.content);
        }
        BlockNode::Blockquote(quote) => {
            let node = make(arena, NodeValue::BlockQuote);
            parent.append(node);
            for child in &quote.children {
                build_block(arena, node, child);
            }
        }
        BlockNode::CodeBlock(code) => {
            let fence_length = longest_backtick_run(&code.literal).max(2) + 1;
            let node = make(
                arena,
                NodeValue::CodeBlock(NodeCodeBlock {
                    fenced: true,
                    fence_char: b'`',
                    fence_length,
                    fence_offset: 0,
                    info: code.language.clone().unwrap_or_default(),
                    literal: code.literal.clone(),
                }),
            );
            parent.append(node);
        }
        BlockNode::List(list) => {
            let node = make(arena, NodeValue::List(list_data(list.ordered)));
            parent.append(node);
            for item in &list.items {
                let item_node = make(arena, NodeValue::Item(list_data(list.ordered)));
                node.append(item_node);
                for child in &item.children {
                    build_block(arena, item_node, child);
                }
            }
        }
        BlockNode::Clause(clause) => {
            let mut fence = format!("<!-- clause id={} type={}", clause.id, clause.clause_type);
            if let Some(locked) = clause.locked {
                fence.push_str(&format!(" locked={locked}"));
            }
            fence.push_str(" -->");
            parent.append(make(
                arena,
                NodeValue::HtmlBlock(NodeHtmlBlock {
                    block_type: 0,
                    literal: fence,
                }),
            ));
            for child in &clause.children {
                build_block(arena, parent, child);
            }
            parent.append(make(
                arena,
                NodeValue::HtmlBlock(NodeHtmlBlock {
                    block_type: 0,
                    literal: format!("<!-- /clause {} -->", clause.id),
                }),
            ));
        }
    }
}

fn list_data(ordered: bool) -> NodeList {
    NodeList {
        list_type: if ordered {
            ListType::Ordered
        } else {
            ListType::Bullet
        },
        marker_offset: 0,
        padding: if ordered { 3 } else { 2 },
        start: 1,
        delimiter: ListDelimType::Period,
        bullet_char: b'-',
        tight: true,
    }
}

fn build_inlines<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    content: &[InlineNode],
) {
    for inline in content {
        match inline {
            InlineNode::Text(text) => {
                // Literal newlines would split the paragraph on re-parse
                let sanitized = text.replace('\n', " ");
                parent.append(make(arena, NodeValue::Text(sanitized)));
            }
            InlineNode::Strong(children) => {
                let node = make(arena, NodeValue::Strong);
                parent.append(node);
                build_inlines(arena, node, children);
            }
            InlineNode::Emphasis(children) => {
                let node = make(arena, NodeValue::Emph);
                parent.append(node);
                build_inlines(arena, node, children);
            }
            InlineNode::Code(text) => {
                parent.append(make(
                    arena,
                    NodeValue::Code(NodeCode {
                        num_backticks: longest_backtick_run(text) + 1,
                        literal: text.clone(),
                    }),
                ));
            }
            InlineNode::Link(link) => {
                if link.href.is_empty() {
                    // No target: emit the text alone
                    build_inlines(arena, parent, &link.content);
                } else {
                    let node = make(
                        arena,
                        NodeValue::Link(NodeLink {
                            url: link.href.clone(),
                            title: link.title.clone().unwrap_or_default(),
                        }),
                    );
                    parent.append(node);
                    build_inlines(arena, node, &link.content);
                }
            }
            InlineNode::LineBreak => {
                parent.append(make(arena, NodeValue::LineBreak));
            }
        }
    }
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Normalize block separation to exactly one blank line between blocks and
/// a single trailing newline. Fenced code block interiors are left alone.
fn normalize_block_separation(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut blank_pending = false;
    let mut wrote_any = false;
    let mut open_fence: Option<usize> = None;

    for line in markdown.lines() {
        let fence_run = leading_backtick_run(line);
        match open_fence {
            Some(open_len) => {
                out.push_str(line);
                out.push('\n');
                if fence_run >= open_len && line.trim_start().trim_matches('`').trim().is_empty() {
                    open_fence = None;
                }
                continue;
            }
            None => {
                if line.trim_end().is_empty() {
                    if wrote_any {
                        blank_pending = true;
                    }
                    continue;
                }
                if blank_pending {
                    out.push('\n');
                    blank_pending = false;
                }
                out.push_str(line);
                out.push('\n');
                wrote_any = true;
                if fence_run >= 3 {
                    open_fence = Some(fence_run);
                }
            }
        }
    }
    out
}

fn leading_backtick_run(line: &str) -> usize {
    line.trim_start().chars().take_while(|&c| c == '`').count()
}
