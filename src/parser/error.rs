//! Parse error type for the tree pass.

use smol_str::SmolStr;
use text_size::TextSize;
use thiserror::Error;

/// A fatal markup error.
///
/// The tree pass aborts on the first error and returns no partial tree.
/// Offsets point into the parsed text and can be translated to
/// line/column through [`crate::base::LineIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Malformed markup reported by the tokenizer (mismatched close tag,
    /// invalid entity reference, duplicate attribute, ...).
    #[error("syntax error at offset {offset:?}: {message}")]
    Syntax { message: String, offset: TextSize },

    /// An element was still open when the document ended.
    #[error("unterminated element <{name}> at offset {offset:?}")]
    UnterminatedElement { name: SmolStr, offset: TextSize },

    /// The document contains no root element.
    #[error("document has no root element")]
    MissingRoot,

    /// A second root element, or character data outside the root.
    #[error("unexpected content outside the root element at offset {offset:?}")]
    TrailingContent { offset: TextSize },
}

impl ParseError {
    /// Byte offset the error points at, if it has one.
    pub fn offset(&self) -> Option<TextSize> {
        match self {
            Self::Syntax { offset, .. }
            | Self::UnterminatedElement { offset, .. }
            | Self::TrailingContent { offset } => Some(*offset),
            Self::MissingRoot => None,
        }
    }
}
