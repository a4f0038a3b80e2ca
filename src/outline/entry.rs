//! Outline entry types.

use smol_str::SmolStr;

use crate::base::Span;

/// What an outline entry represents, for icons and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A `# comment` section header.
    Section,
    /// A patch operation.
    Operation,
    /// A grouping construct.
    Group,
    /// A record definition.
    Record,
    /// A record whose template marks it as an unlock/trigger event.
    Event,
    /// A localization-text record or text property.
    Key,
    /// A template definition.
    Template,
    /// An include directive.
    Include,
    /// Patch content one level below an operation.
    Property,
    /// Anything else that made it into the outline.
    Other,
}

/// One outline entry.
///
/// Entries form a flattened sequence ordered by source position; a tree
/// is reconstructed from `level` with the usual indent stack (see
/// [`super::outline_tree`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Human-readable label.
    pub label: String,
    /// Secondary text (operation kind, template, repeat count, ...).
    pub detail: String,
    /// GUID of the record behind this entry, when it has one.
    pub guid: Option<SmolStr>,
    /// Nesting level; entries nest under the closest earlier entry with
    /// a smaller level.
    pub level: u32,
    /// Full source range of the block this entry covers.
    pub range: Span,
    /// Range of the name/anchor to highlight when selected.
    pub selection: Span,
    pub kind: EntryKind,
}
