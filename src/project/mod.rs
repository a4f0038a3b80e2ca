//! Project-level concerns: mod metadata and bulk indexing.
//!
//! This is the only module that touches the file system
//! ([`ModDescriptor::read`]); everything else operates on in-memory
//! snapshots handed in by the caller.

mod descriptor;
pub mod jsonc;
mod populate;
mod version;

pub use descriptor::{
    DEFAULT_DEPLOY_PATH, DescriptorError, Development, ModDescriptor, Schema, V7_ASSETS_PATH,
    V8_ASSETS_PATH, is_modinfo_file,
};
pub use populate::{DocumentSource, populate_directory};
pub use version::TargetVersion;
