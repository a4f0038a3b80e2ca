//! Derived outline of a patch document.
//!
//! The outline is a flattened, level-tagged sequence of labeled entries —
//! one per patch operation, record, grouping construct or include — with
//! source ranges suitable for "select whole block". It is rebuilt from
//! scratch on every re-index and never mutated incrementally.
//!
//! Free-floating comments become structure: `# comments` at the top
//! level act as section headers, any other comment labels the next
//! group. Everything nested inside an operation is patch *content*, not
//! new structure, and surfaces as flat property entries.

mod builder;
mod entry;
mod tree;

pub use builder::build_outline;
pub use entry::{EntryKind, OutlineEntry};
pub use tree::{OutlineNode, outline_tree};
