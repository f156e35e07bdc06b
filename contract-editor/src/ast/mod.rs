//! Abstract syntax tree for the contract markdown dialect.

pub mod nodes;

pub use nodes::{
    inline_text, BlockNode, Blockquote, Clause, CodeBlock, Document, Heading, InlineNode, Link,
    List, ListItem, Paragraph,
};
