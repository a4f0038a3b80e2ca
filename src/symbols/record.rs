//! The record type behind a GUID.

use std::sync::Arc;

use smol_str::SmolStr;

/// Where a record was defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Identifier of the defining file (usually its path).
    pub path: Arc<str>,
    /// 0-indexed line of the defining element.
    pub line: u32,
}

/// A baseline or mod record identified by a numeric GUID.
///
/// All fields except the GUID are optional: records are assembled from
/// whatever a document declares, and language files or the baseline may
/// fill in `english` later. Records merged under the same GUID follow
/// last-write-wins in caller-supplied load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetRecord {
    /// Numeric identifier in string form.
    pub guid: SmolStr,
    /// Internal name from the defining document.
    pub name: Option<String>,
    /// Localized display text, when known.
    pub english: Option<String>,
    /// Declared template (schema/category) name.
    pub template: Option<String>,
    /// GUID of the base record this one inherits its shape from.
    pub base_asset: Option<SmolStr>,
    /// Name of the mod that defined the record, when known.
    pub origin: Option<String>,
    /// Definition site, when known.
    pub location: Option<SourceLocation>,
}

impl AssetRecord {
    pub fn new(guid: impl Into<SmolStr>) -> Self {
        Self {
            guid: guid.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_english(mut self, english: impl Into<String>) -> Self {
        self.english = Some(english.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_base_asset(mut self, guid: impl Into<SmolStr>) -> Self {
        self.base_asset = Some(guid.into());
        self
    }
}
