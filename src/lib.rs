//! # modops-base
//!
//! Core library for ModOps patch XML parsing, document indexing, and
//! symbol resolution.
//!
//! Patch documents describe incremental modifications against a large
//! baseline of GUID-identified records. This crate turns such a document
//! into three things tooling can consume:
//!
//! 1. a navigable, line/column-addressed index of the XML tree,
//! 2. an outline of patch operations with human-readable labels and
//!    accurate source ranges,
//! 3. resolution of numeric GUIDs to inheritance-aware display names
//!    through a caller-owned [`SymbolDirectory`].
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! outline   → patch outline (labeled entries, tree reconstruction)
//!   ↓
//! document  → PatchDocument: tree + line addressing + record extraction
//!   ↓
//! symbols   → AssetRecord, SymbolDirectory, display-name resolution
//!   ↓
//! parser    → tolerant tree pass, streaming tag-span pass
//!   ↓
//! project   → mod descriptor (JSON with comments), directory population
//!   ↓
//! base      → LineIndex, Position/Span, text utilities
//! ```
//!
//! Everything is a pure function over an immutable text snapshot: parsing
//! a newer snapshot produces a fresh index, nothing is mutated in place,
//! and the engine holds no caches of its own. Callers that need
//! debouncing or cancellation layer it above this crate.

// ============================================================================
// MODULES (dependency order: base → parser → symbols → document → outline)
// ============================================================================

/// Foundation types: LineIndex, Position, Span, text utilities
pub mod base;

/// Parser: tolerant XML tree pass and streaming tag-span pass
pub mod parser;

/// Symbols: asset records, symbol directory, display-name resolution
pub mod symbols;

/// Document index: line-addressed elements, record extraction, path queries
pub mod document;

/// Outline: derived patch-operation summary with labels and ranges
pub mod outline;

/// Project: mod metadata descriptors and directory population
pub mod project;

// Re-export foundation types
pub use base::{LineIndex, Position, Span};

// Re-export the types most callers touch
pub use document::{PatchDocument, PatchType};
pub use outline::{EntryKind, OutlineEntry, build_outline, outline_tree};
pub use parser::{Element, ParseError, TagSpanIndex, XmlNode};
pub use project::{ModDescriptor, TargetVersion};
pub use symbols::{AssetRecord, SymbolDirectory, best_display_name};
