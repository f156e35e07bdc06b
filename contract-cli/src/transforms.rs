//! Output transforms for the CLI: each convert target maps a parsed AST
//! to a printable string.

use contract_editor::ast::{BlockNode, Clause, Document};
use contract_editor::{
    ast_to_tag, ast_to_tree, render_tree, serialize, EditorOptions, KeyAllocator, LockOptions,
};

/// Convert targets accepted by `contract convert --to`.
pub const CONVERT_TARGETS: &[&str] = &["markdown", "ast-json", "tree-json", "tag"];

/// Run a convert target over a parsed document.
pub fn run(doc: &Document, target: &str, options: &EditorOptions) -> Result<String, String> {
    match target {
        "markdown" => serialize(doc).map_err(|e| e.to_string()),
        "ast-json" => serde_json::to_string_pretty(doc)
            .map(|json| json + "\n")
            .map_err(|e| e.to_string()),
        "tree-json" => {
            let mut keys = KeyAllocator::new();
            let lock = LockOptions {
                lock_all: options.lock_text,
                default_clause_locked: options.default_clause_locked,
            };
            let tree = ast_to_tree(doc, &mut keys, &lock);
            serde_json::to_string_pretty(&render_tree(&tree))
                .map(|json| json + "\n")
                .map_err(|e| e.to_string())
        }
        "tag" => Ok(ast_to_tag(doc)),
        other => Err(format!("unknown convert target '{other}'")),
    }
}

/// Clause metadata surfaced by `contract clauses`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseInfo {
    pub id: String,
    pub clause_type: String,
    pub locked: Option<bool>,
}

/// All clauses in document order, nested ones included.
pub fn collect_clauses(doc: &Document) -> Vec<ClauseInfo> {
    let mut out = Vec::new();
    collect_from_blocks(&doc.children, &mut out);
    out
}

fn collect_from_blocks(blocks: &[BlockNode], out: &mut Vec<ClauseInfo>) {
    for block in blocks {
        match block {
            BlockNode::Clause(clause) => {
                out.push(info_of(clause));
                collect_from_blocks(&clause.children, out);
            }
            BlockNode::Blockquote(quote) => collect_from_blocks(&quote.children, out),
            BlockNode::List(list) => {
                for item in &list.items {
                    collect_from_blocks(&item.children, out);
                }
            }
            _ => {}
        }
    }
}

fn info_of(clause: &Clause) -> ClauseInfo {
    ClauseInfo {
        id: clause.id.clone(),
        clause_type: clause.clause_type.clone(),
        locked: clause.locked,
    }
}

/// Tab-separated id/type/locked listing, one clause per line.
pub fn clause_table(doc: &Document, options: &EditorOptions) -> String {
    let mut out = String::new();
    for clause in collect_clauses(doc) {
        let locked = clause
            .locked
            .unwrap_or(options.lock_text || options.default_clause_locked);
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            clause.id,
            clause.clause_type,
            if locked { "locked" } else { "editable" }
        ));
    }
    out
}
