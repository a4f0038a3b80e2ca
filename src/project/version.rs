//! Target baseline version.

use std::fmt;

/// Major version of the baseline a mod targets.
///
/// Two versions are supported; descriptors that declare neither default
/// to the older one for backward compatibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TargetVersion {
    #[default]
    V7,
    V8,
}

impl TargetVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetVersion::V7 => "7",
            TargetVersion::V8 => "8",
        }
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
