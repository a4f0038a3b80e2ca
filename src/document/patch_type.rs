//! Path-based classification of patch documents.

use std::path::Path;

/// What kind of content a patch file carries, derived from its path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PatchType {
    /// Asset patches (`assets.xml`, `assets_.xml`, `*.include.xml`).
    Assets,
    /// Template definitions (`templates.xml`).
    Templates,
    /// Infotip definitions (files under an `infotips` folder).
    Infotips,
    /// Localization texts (files under a `gui` folder).
    Texts,
    /// Anything else, including documents without a path.
    #[default]
    Generic,
}

impl PatchType {
    /// Classify a file path. `None` means an unsaved or synthetic
    /// document and classifies as [`PatchType::Generic`].
    pub fn from_path(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return PatchType::Generic;
        };
        let path = Path::new(path);
        let basename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if basename == "assets.xml" || basename == "assets_.xml" || basename.ends_with(".include.xml")
        {
            return PatchType::Assets;
        }
        if basename == "templates.xml" {
            return PatchType::Templates;
        }

        let parent = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("");
        match parent {
            "gui" => PatchType::Texts,
            "infotips" => PatchType::Infotips,
            _ => PatchType::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("data/config/export/main/asset/assets.xml"), PatchType::Assets)]
    #[case(Some("mod/assets_.xml"), PatchType::Assets)]
    #[case(Some("mod/buildings.include.xml"), PatchType::Assets)]
    #[case(Some("mod/templates.xml"), PatchType::Templates)]
    #[case(Some("data/config/gui/texts_english.xml"), PatchType::Texts)]
    #[case(Some("data/infotips/export.xml"), PatchType::Infotips)]
    #[case(Some("mod/other.xml"), PatchType::Generic)]
    #[case(None, PatchType::Generic)]
    fn test_from_path(#[case] path: Option<&str>, #[case] expected: PatchType) {
        assert_eq!(PatchType::from_path(path), expected);
    }
}
