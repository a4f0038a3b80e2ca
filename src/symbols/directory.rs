//! Caller-owned GUID → record directory.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

use super::record::AssetRecord;

/// Directory of all known records, keyed by GUID.
///
/// The engine only queries this store; populating it (from the baseline,
/// from scanned mods) is the caller's job. Records inserted later win
/// over earlier ones with the same GUID — insertion order is the
/// caller-supplied load order, which is significant.
#[derive(Debug, Clone, Default)]
pub struct SymbolDirectory {
    records: FxHashMap<SmolStr, AssetRecord>,
}

/// Outcome of resolving a record's template through its inheritance hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTemplate<'a> {
    /// The record declares a template itself.
    Declared(&'a str),
    /// Inherited from the base record the GUID points at.
    Inherited {
        template: Option<&'a str>,
        base_name: Option<&'a str>,
    },
    /// The base GUID is not in the directory.
    Unresolved { base_guid: &'a str },
    /// Neither a template nor a base reference is present.
    Unknown,
}

impl SymbolDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look a GUID up. A miss is an expected outcome, never an error.
    pub fn resolve(&self, guid: &str) -> Option<&AssetRecord> {
        self.records.get(guid)
    }

    /// All known records, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &AssetRecord> {
        self.records.values()
    }

    /// Insert one record, replacing any previous record with that GUID.
    pub fn insert(&mut self, record: AssetRecord) {
        self.records.insert(record.guid.clone(), record);
    }

    /// Insert many records in order; later entries win.
    pub fn extend(&mut self, records: impl IntoIterator<Item = AssetRecord>) {
        for record in records {
            self.insert(record);
        }
    }

    /// Drop everything. Callers invalidate explicitly, there is no
    /// implicit refresh.
    pub fn clear(&mut self) {
        debug!(records = self.records.len(), "clearing symbol directory");
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve the template a record belongs to.
    ///
    /// A declared template wins. Otherwise the base-asset GUID is
    /// resolved one hop (the directory is responsible for any further
    /// chaining) and the base record's template is reported. A failed
    /// lookup degrades to [`ResolvedTemplate::Unresolved`] carrying the
    /// base GUID rather than failing.
    pub fn resolve_template<'a>(&'a self, record: &'a AssetRecord) -> ResolvedTemplate<'a> {
        if let Some(template) = record.template.as_deref() {
            return ResolvedTemplate::Declared(template);
        }
        let Some(base_guid) = record.base_asset.as_deref() else {
            return ResolvedTemplate::Unknown;
        };
        match self.resolve(base_guid) {
            Some(base) => ResolvedTemplate::Inherited {
                template: base.template.as_deref(),
                base_name: base.name.as_deref(),
            },
            None => {
                debug!(base_guid, "base asset not in directory");
                ResolvedTemplate::Unresolved { base_guid }
            }
        }
    }

    /// The template name itself, from the record or its base. `None`
    /// when unknown or unresolvable.
    pub fn template_of<'a>(&'a self, record: &'a AssetRecord) -> Option<&'a str> {
        match self.resolve_template(record) {
            ResolvedTemplate::Declared(template) => Some(template),
            ResolvedTemplate::Inherited { template, .. } => template,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_miss_is_none() {
        let directory = SymbolDirectory::new();
        assert!(directory.resolve("123").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let mut directory = SymbolDirectory::new();
        directory.insert(AssetRecord::new("1").with_name("first"));
        directory.insert(AssetRecord::new("1").with_name("second"));

        assert_eq!(directory.len(), 1);
        assert_eq!(directory.resolve("1").unwrap().name.as_deref(), Some("second"));
    }

    #[test]
    fn test_resolve_template_declared_wins() {
        let mut directory = SymbolDirectory::new();
        directory.insert(AssetRecord::new("2").with_template("Base"));

        let record = AssetRecord::new("1")
            .with_template("Own")
            .with_base_asset("2");
        assert_eq!(
            directory.resolve_template(&record),
            ResolvedTemplate::Declared("Own")
        );
    }

    #[test]
    fn test_resolve_template_one_hop() {
        let mut directory = SymbolDirectory::new();
        directory.insert(
            AssetRecord::new("2")
                .with_template("Base")
                .with_name("BaseName"),
        );

        let record = AssetRecord::new("1").with_base_asset("2");
        assert_eq!(
            directory.resolve_template(&record),
            ResolvedTemplate::Inherited {
                template: Some("Base"),
                base_name: Some("BaseName"),
            }
        );
    }

    #[test]
    fn test_resolve_template_unresolved_base() {
        let directory = SymbolDirectory::new();
        let record = AssetRecord::new("1").with_base_asset("404");
        assert_eq!(
            directory.resolve_template(&record),
            ResolvedTemplate::Unresolved { base_guid: "404" }
        );
    }

    #[test]
    fn test_template_of() {
        let mut directory = SymbolDirectory::new();
        directory.insert(AssetRecord::new("2").with_template("Base"));

        assert_eq!(
            directory.template_of(&AssetRecord::new("1").with_base_asset("2")),
            Some("Base")
        );
        assert_eq!(directory.template_of(&AssetRecord::new("1")), None);
    }
}
