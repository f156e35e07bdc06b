//! Deterministic tag rendering of the AST, for inspection and tests.
//!
//! The output is an indented XML-like view with one tag per node kind.
//! It is not a wire format; it exists so humans and snapshot tests can
//! look at document structure without counting enum variants.

use crate::ast::{BlockNode, Document, InlineNode};

/// Render a document AST as indented tags.
pub fn ast_to_tag(doc: &Document) -> String {
    let mut out = String::from("<document>\n");
    for block in &doc.children {
        render_block(block, 1, &mut out);
    }
    out.push_str("</document>\n");
    out
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn render_block(block: &BlockNode, depth: usize, out: &mut String) {
    match block {
        BlockNode::Heading(heading) => {
            indent(depth, out);
            out.push_str(&format!("<heading level=\"{}\">", heading.level));
            render_inlines(&heading.content, out);
            out.push_str("</heading>\n");
        }
        BlockNode::Paragraph(paragraph) => {
            indent(depth, out);
            out.push_str("<paragraph>");
            render_inlines(&paragraph.content, out);
            out.push_str("</paragraph>\n");
        }
        BlockNode::Blockquote(quote) => {
            indent(depth, out);
            out.push_str("<blockquote>\n");
            for child in &quote.children {
                render_block(child, depth + 1, out);
            }
            indent(depth, out);
            out.push_str("</blockquote>\n");
        }
        BlockNode::CodeBlock(code) => {
            indent(depth, out);
            match &code.language {
                Some(language) => {
                    out.push_str(&format!("<code-block language=\"{language}\">"))
                }
                None => out.push_str("<code-block>"),
            }
            out.push_str(&escape(code.literal.trim_end_matches('\n')));
            out.push_str("</code-block>\n");
        }
        BlockNode::List(list) => {
            indent(depth, out);
            out.push_str(if list.ordered { "<list ordered=\"true\">\n" } else { "<list>\n" });
            for item in &list.items {
                indent(depth + 1, out);
                out.push_str("<item>\n");
                for child in &item.children {
                    render_block(child, depth + 2, out);
                }
                indent(depth + 1, out);
                out.push_str("</item>\n");
            }
            indent(depth, out);
            out.push_str("</list>\n");
        }
        BlockNode::Clause(clause) => {
            indent(depth, out);
            out.push_str(&format!(
                "<clause id=\"{}\" type=\"{}\"",
                clause.id, clause.clause_type
            ));
            if let Some(locked) = clause.locked {
                out.push_str(&format!(" locked=\"{locked}\""));
            }
            out.push_str(">\n");
            for child in &clause.children {
                render_block(child, depth + 1, out);
            }
            indent(depth, out);
            out.push_str("</clause>\n");
        }
    }
}

fn render_inlines(content: &[InlineNode], out: &mut String) {
    for inline in content {
        match inline {
            InlineNode::Text(text) => out.push_str(&escape(text)),
            InlineNode::Strong(children) => {
                out.push_str("<strong>");
                render_inlines(children, out);
                out.push_str("</strong>");
            }
            InlineNode::Emphasis(children) => {
                out.push_str("<em>");
                render_inlines(children, out);
                out.push_str("</em>");
            }
            InlineNode::Code(text) => {
                out.push_str("<code>");
                out.push_str(&escape(text));
                out.push_str("</code>");
            }
            InlineNode::Link(link) => {
                out.push_str(&format!("<link href=\"{}\">", link.href));
                render_inlines(&link.content, out);
                out.push_str("</link>");
            }
            InlineNode::LineBreak => out.push_str("<br/>"),
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
