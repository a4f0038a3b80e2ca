//! Asset records and GUID resolution.
//!
//! Patch documents reference baseline records by numeric GUID. This
//! module holds the record type extracted from documents, the
//! caller-owned [`SymbolDirectory`] that maps GUIDs to records across all
//! loaded sources, and the display-name policy that turns a record into
//! the best human-readable label.
//!
//! The directory is an explicit value passed into resolution functions —
//! never ambient global state — so resolution stays pure and testable.
//! Callers decide when to rebuild or [`SymbolDirectory::clear`] it.

mod directory;
mod display;
mod record;

pub use directory::{ResolvedTemplate, SymbolDirectory};
pub use display::{best_display_name, guid_with_name, name_with_origin};
pub use record::{AssetRecord, SourceLocation};
