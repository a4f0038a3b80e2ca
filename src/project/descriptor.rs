//! Mod metadata descriptors (`modinfo.json` / `modinfo.jsonc`).
//!
//! Two schema variants exist, keyed by the declared baseline version:
//! the older flat `ModDependencies`/`LoadAfterIds` form and the newer
//! nested `Dependencies.Require`/`Dependencies.LoadAfter` form. Both
//! expose `Development.Dependencies` as an override of the legacy
//! `OptionalDependencies` field. A single version-sniffing parse
//! produces a tagged [`Schema`]; everything downstream matches on the
//! tag instead of probing optional fields.
//!
//! Reading never fails: a missing or unparsable descriptor degrades to
//! empty dependency sets plus a folder-derived identifier, so every mod
//! stays addressable.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::warn;

use super::jsonc;
use super::version::TargetVersion;

const MODINFO_JSON: &str = "modinfo.json";
const MODINFO_JSONC: &str = "modinfo.jsonc";

/// Folder that only the newer baseline layout contains; its presence
/// selects the newer schema when no version is declared.
const V8_BASELINE_MARKER: &str = "data/base/config";

/// Relative path of the main asset patch in the older layout.
pub const V7_ASSETS_PATH: &str = "data/config/export/main/asset";
/// Relative path of the main asset patch in the newer layout.
pub const V8_ASSETS_PATH: &str = "data/base/config/export";

/// Deployment target used when the descriptor declares none.
pub const DEFAULT_DEPLOY_PATH: &str = "${mods}/${modName}";

/// Malformed descriptor content.
///
/// Only surfaced by the strict entry point; [`ModDescriptor::read`]
/// degrades to defaults instead.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("malformed descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn is_modinfo_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|n| n == MODINFO_JSON || n == MODINFO_JSONC)
}

// ============================================================================
// Raw serde model
// ============================================================================

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

fn opt_one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    one_or_many(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawDescriptor {
    #[serde(rename = "ModID")]
    mod_id: Option<String>,
    #[serde(rename = "Version")]
    version: Option<serde_json::Value>,
    #[serde(rename = "GameVersion")]
    game_version: Option<serde_json::Value>,
    #[serde(rename = "ModDependencies", deserialize_with = "one_or_many")]
    mod_dependencies: Vec<String>,
    #[serde(rename = "LoadAfterIds", deserialize_with = "one_or_many")]
    load_after_ids: Vec<String>,
    #[serde(rename = "OptionalDependencies", deserialize_with = "one_or_many")]
    optional_dependencies: Vec<String>,
    #[serde(rename = "Dependencies")]
    dependencies: Option<RawDependencies>,
    #[serde(rename = "Development")]
    development: Option<RawDevelopment>,
    #[serde(rename = "ModName")]
    mod_name: Option<RawLocalized>,
    #[serde(rename = "Category")]
    category: Option<RawLocalized>,
    #[serde(rename = "out")]
    out: Option<String>,
    #[serde(rename = "bundle", deserialize_with = "opt_one_or_many")]
    bundle: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawDependencies {
    #[serde(rename = "Require", deserialize_with = "one_or_many")]
    require: Vec<String>,
    #[serde(rename = "LoadAfter", deserialize_with = "one_or_many")]
    load_after: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawDevelopment {
    #[serde(rename = "Dependencies", deserialize_with = "opt_one_or_many")]
    dependencies: Option<Vec<String>>,
    #[serde(rename = "DeployPath")]
    deploy_path: Option<String>,
    #[serde(rename = "Bundle", deserialize_with = "opt_one_or_many")]
    bundle: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawLocalized {
    #[serde(rename = "English")]
    english: Option<String>,
}

// ============================================================================
// Public model
// ============================================================================

/// Version-keyed dependency lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// Older flat form.
    V7 {
        mod_dependencies: Vec<String>,
        load_after_ids: Vec<String>,
    },
    /// Newer nested form.
    V8 {
        require: Vec<String>,
        load_after: Vec<String>,
    },
}

/// Development-time settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Development {
    pub dependencies: Option<Vec<String>>,
    pub deploy_path: Option<String>,
    pub bundle: Option<Vec<String>>,
}

/// A parsed mod metadata descriptor. Immutable value object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModDescriptor {
    id: String,
    version: Option<String>,
    schema: Schema,
    optional_dependencies: Vec<String>,
    development: Development,
    out: Option<String>,
    bundle: Option<Vec<String>>,
    display_name: Option<String>,
    mod_path: Option<PathBuf>,
    descriptor_name: Option<String>,
}

impl ModDescriptor {
    /// Read a descriptor from a `modinfo.{json,jsonc}` file or a mod
    /// folder containing one (the `.jsonc` name wins).
    ///
    /// Never fails: unreadable or malformed input degrades to empty
    /// collections, and the identifier falls back to the folder name.
    pub fn read(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let (mod_path, descriptor_path) = if path.is_file() {
            (
                path.parent().unwrap_or(path).to_path_buf(),
                Some(path.to_path_buf()),
            )
        } else {
            let jsonc_path = path.join(MODINFO_JSONC);
            let json_path = path.join(MODINFO_JSON);
            let found = if jsonc_path.is_file() {
                Some(jsonc_path)
            } else if json_path.is_file() {
                Some(json_path)
            } else {
                None
            };
            (path.to_path_buf(), found)
        };

        let raw = descriptor_path
            .as_deref()
            .and_then(|p| match fs::read_to_string(p) {
                Ok(text) => Some(text),
                Err(err) => {
                    warn!(path = %p.display(), error = %err, "cannot read descriptor");
                    None
                }
            })
            .and_then(|text| match parse_raw(&text) {
                Ok(raw) => Some(raw),
                Err(err) => {
                    warn!(error = %err, "malformed descriptor, using defaults");
                    None
                }
            })
            .unwrap_or_default();

        let fallback_id = mod_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        let v8_layout = mod_path.join(V8_BASELINE_MARKER).is_dir();

        let mut descriptor = Self::from_raw(raw, &fallback_id, v8_layout);
        descriptor.mod_path = Some(mod_path);
        descriptor.descriptor_name = descriptor_path
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()));
        descriptor
    }

    /// Parse descriptor text. Strict: malformed JSON is an error.
    ///
    /// `fallback_id` stands in when no `ModID` is declared.
    pub fn from_json(text: &str, fallback_id: &str) -> Result<Self, DescriptorError> {
        Ok(Self::from_raw(parse_raw(text)?, fallback_id, false))
    }

    fn from_raw(raw: RawDescriptor, fallback_id: &str, v8_layout: bool) -> Self {
        let target = sniff_version(&raw, v8_layout);

        let schema = match target {
            TargetVersion::V7 => Schema::V7 {
                mod_dependencies: raw.mod_dependencies,
                load_after_ids: raw.load_after_ids,
            },
            TargetVersion::V8 => {
                let deps = raw.dependencies.unwrap_or_default();
                Schema::V8 {
                    require: deps.require,
                    load_after: deps.load_after,
                }
            }
        };

        let id = match raw.mod_id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => fallback_id.to_string(),
        };

        let display_name = raw
            .mod_name
            .and_then(|n| n.english)
            .map(|name| match raw.category.and_then(|c| c.english) {
                Some(category) => format!("[{category}] {name}"),
                None => name,
            });

        let development = raw
            .development
            .map(|dev| Development {
                dependencies: dev.dependencies,
                deploy_path: dev.deploy_path,
                bundle: dev.bundle,
            })
            .unwrap_or_default();

        Self {
            id,
            version: raw.version.map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            schema,
            optional_dependencies: raw.optional_dependencies,
            development,
            out: raw.out,
            bundle: raw.bundle,
            display_name,
            mod_path: None,
            descriptor_name: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn target(&self) -> TargetVersion {
        match self.schema {
            Schema::V7 { .. } => TargetVersion::V7,
            Schema::V8 { .. } => TargetVersion::V8,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// `[Category] Name` when declared, else the folder name.
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.display_name.as_deref() {
            return name;
        }
        self.mod_path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .unwrap_or(&self.id)
    }

    /// Folder the descriptor belongs to, when read from disk.
    pub fn mod_path(&self) -> Option<&Path> {
        self.mod_path.as_deref()
    }

    /// Full path of the descriptor file, when one exists on disk.
    pub fn descriptor_path(&self) -> Option<PathBuf> {
        match (&self.mod_path, &self.descriptor_name) {
            (Some(dir), Some(name)) => Some(dir.join(name)),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Dependency sets
    // ------------------------------------------------------------------

    /// Union of required, development-or-optional and load-after
    /// dependencies, deduplicated, in insertion order.
    pub fn all_dependencies(&self) -> Vec<String> {
        let development = self
            .development
            .dependencies
            .as_ref()
            .unwrap_or(&self.optional_dependencies);

        let (required, load_after) = match &self.schema {
            Schema::V7 {
                mod_dependencies,
                load_after_ids,
            } => (mod_dependencies, load_after_ids),
            Schema::V8 {
                require,
                load_after,
            } => (require, load_after),
        };

        let mut all: IndexSet<&String> = IndexSet::new();
        all.extend(required);
        all.extend(development);
        all.extend(load_after);
        all.into_iter().cloned().collect()
    }

    /// Dependencies that must be present *and* ordered: the intersection
    /// of the required and load-after lists.
    pub fn required_load_after(&self) -> Vec<String> {
        let (required, load_after) = match &self.schema {
            Schema::V7 {
                mod_dependencies,
                load_after_ids,
            } => (mod_dependencies, load_after_ids),
            Schema::V8 {
                require,
                load_after,
            } => (require, load_after),
        };

        required
            .iter()
            .filter(|dep| load_after.contains(dep))
            .cloned()
            .collect()
    }

    /// Deployment path template.
    pub fn deploy_path(&self) -> &str {
        self.development
            .deploy_path
            .as_deref()
            .or(self.out.as_deref())
            .unwrap_or(DEFAULT_DEPLOY_PATH)
    }

    /// Paths bundled into the deployed mod.
    pub fn bundled(&self) -> &[String] {
        self.development
            .bundle
            .as_deref()
            .or(self.bundle.as_deref())
            .unwrap_or(&[])
    }
}

fn parse_raw(text: &str) -> Result<RawDescriptor, DescriptorError> {
    Ok(serde_json::from_str(&jsonc::strip(text))?)
}

/// Explicit version field wins; otherwise the newer baseline folder
/// layout selects the newer schema, and the older one is the
/// backward-compatible default.
fn sniff_version(raw: &RawDescriptor, v8_layout: bool) -> TargetVersion {
    match &raw.game_version {
        Some(value) => {
            let is_v8 = value.as_str() == Some("8") || value.as_u64() == Some(8);
            if is_v8 {
                TargetVersion::V8
            } else {
                TargetVersion::V7
            }
        }
        None if v8_layout => TargetVersion::V8,
        None => TargetVersion::V7,
    }
}
