//! The contract markdown dialect (parse and serialize).
//!
//! The dialect is CommonMark restricted to headings, paragraphs, emphasis,
//! strong, inline code, links, blockquotes, lists, and fenced code blocks,
//! plus clause fences carried as structured HTML-comment annotations:
//!
//! ```text
//! <!-- clause id=payment-1 type=payment locked=true -->
//!
//! The payor shall pay the amount within thirty days.
//!
//! <!-- /clause payment-1 -->
//! ```
//!
//! Both directions lean on comrak: parsing goes markdown → comrak AST →
//! contract AST (with a stack-based pass folding flat fence blocks into
//! nested `Clause` nodes), serializing goes contract AST → comrak AST →
//! CommonMark text.

pub mod parser;
pub mod serializer;

pub use parser::parse;
pub use serializer::serialize;
