//! Import tests for the contract markdown dialect (markdown → AST)

use contract_editor::ast::{inline_text, BlockNode, InlineNode};
use contract_editor::{ast_to_tag, parse};
use insta::assert_snapshot;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::fixture;

#[test]
fn fixture_parses_into_the_expected_block_mix() {
    let doc = parse(&fixture("acceptance-of-delivery.md")).unwrap();

    let mut clauses = 0;
    let mut headings = 0;
    let mut quotes = 0;
    let mut lists = 0;
    let mut code = 0;
    for block in &doc.children {
        match block {
            BlockNode::Clause(_) => clauses += 1,
            BlockNode::Heading(_) => headings += 1,
            BlockNode::Blockquote(_) => quotes += 1,
            BlockNode::List(_) => lists += 1,
            BlockNode::CodeBlock(_) => code += 1,
            BlockNode::Paragraph(_) => {}
        }
    }
    assert_eq!(clauses, 2);
    assert_eq!(headings, 2);
    assert_eq!(quotes, 1);
    assert_eq!(lists, 1);
    assert_eq!(code, 1);
}

#[test]
fn strong_scenario() {
    let doc = parse("**hello world**").unwrap();
    match &doc.children[0] {
        BlockNode::Paragraph(p) => assert_eq!(
            p.content,
            vec![InlineNode::Strong(vec![InlineNode::Text(
                "hello world".to_string()
            )])]
        ),
        other => panic!("expected paragraph, found {other:?}"),
    }
}

#[test]
fn italic_scenario() {
    let doc = parse("*hello world*").unwrap();
    match &doc.children[0] {
        BlockNode::Paragraph(p) => assert_eq!(
            p.content,
            vec![InlineNode::Emphasis(vec![InlineNode::Text(
                "hello world".to_string()
            )])]
        ),
        other => panic!("expected paragraph, found {other:?}"),
    }
}

#[test]
fn code_scenario() {
    let doc = parse("`tag123`").unwrap();
    match &doc.children[0] {
        BlockNode::Paragraph(p) => {
            assert_eq!(p.content, vec![InlineNode::Code("tag123".to_string())])
        }
        other => panic!("expected paragraph, found {other:?}"),
    }
}

static LINE_ONE: Lazy<Regex> = Lazy::new(|| Regex::new("line one").expect("valid regex"));
static LINE_TWO: Lazy<Regex> = Lazy::new(|| Regex::new("line two").expect("valid regex"));

#[test]
fn blockquote_scenario_merges_continuation_lines() {
    let doc = parse("> line one\n> line two").unwrap();
    let quotes: Vec<_> = doc
        .children
        .iter()
        .filter(|block| matches!(block, BlockNode::Blockquote(_)))
        .collect();
    assert_eq!(quotes.len(), 1, "continuation lines are one blockquote");
    match quotes[0] {
        BlockNode::Blockquote(quote) => {
            let text = match &quote.children[0] {
                BlockNode::Paragraph(p) => inline_text(&p.content),
                other => panic!("expected paragraph, found {other:?}"),
            };
            assert!(LINE_ONE.is_match(&text));
            assert!(LINE_TWO.is_match(&text));
        }
        _ => unreachable!(),
    }
}

#[test]
fn link_content_and_target_are_captured() {
    let doc = parse(&fixture("acceptance-of-delivery.md")).unwrap();
    let mut found = false;
    for block in &doc.children {
        if let BlockNode::List(list) = block {
            for item in &list.items {
                if let Some(BlockNode::Paragraph(p)) = item.children.first() {
                    for inline in &p.content {
                        if let InlineNode::Link(link) = inline {
                            assert_eq!(link.href, "https://forms.example.com/acceptance");
                            assert_eq!(link.title.as_deref(), Some("Acceptance Form"));
                            assert_eq!(inline_text(&link.content), "acceptance form");
                            found = true;
                        }
                    }
                }
            }
        }
    }
    assert!(found, "fixture list contains the acceptance-form link");
}

#[test]
fn tag_view_of_a_small_contract() {
    let doc = parse("## Terms\n\nPay **now**, not `later`.\n").unwrap();
    assert_snapshot!(ast_to_tag(&doc), @r###"
    <document>
      <heading level="2">Terms</heading>
      <paragraph>Pay <strong>now</strong>, not <code>later</code>.</paragraph>
    </document>
    "###);
}

#[test]
fn tag_view_of_a_clause() {
    let doc = parse(
        "<!-- clause id=pay type=payment locked=true -->\n\nPay promptly.\n\n<!-- /clause pay -->\n",
    )
    .unwrap();
    assert_snapshot!(ast_to_tag(&doc), @r###"
    <document>
      <clause id="pay" type="payment" locked="true">
        <paragraph>Pay promptly.</paragraph>
      </clause>
    </document>
    "###);
}
