//! Structural parsing of patch XML.
//!
//! Two independent passes consume the same text:
//!
//! 1. The **tree pass** ([`parse_tree`]) builds an [`Element`] tree
//!    optimized for semantic traversal (named children, attribute
//!    lookup). Malformed markup fails the whole parse — a partial tree
//!    would produce misleading outlines and ranges, so callers treat a
//!    [`ParseError`] as "no index available, keep the last good one".
//! 2. The **span pass** ([`build_span_index`]) streams over the text a
//!    second time and records, for every opening tag, the byte offset
//!    immediately after its matching close tag. It exists for exact
//!    textual replace-ranges and may be skipped entirely by read-only
//!    callers. Run it only on text the tree pass accepted.
//!
//! Keeping the passes separate keeps span bookkeeping out of the tree
//! builder; the two are correlated by the start-tag byte offset.

mod error;
mod node;
mod spans;
mod tree;

pub use error::ParseError;
pub use node::{Element, XmlNode, PATH_ATTRIBUTES};
pub use spans::{TagSpanIndex, build_span_index};
pub use tree::parse_tree;
