//! Display-name policy for records.

use super::record::AssetRecord;

/// Templates whose `name` field is usually more descriptive than the
/// localized text. Kept as a literal special case.
const NAME_FIRST_TEMPLATES: [&str; 1] = ["ItemEffectTargetPool"];

/// Best human-readable name for a record: `english` > `name` > `guid`.
///
/// `english` is skipped for the templates in [`NAME_FIRST_TEMPLATES`],
/// and when `name` is a longer version of it (the name field often
/// repeats the localized text with extra qualifiers, e.g.
/// `"Iron Ore"` for `"Ore"` or `"Iron Ore Mine"` for `"Iron Ore"`).
pub fn best_display_name(record: &AssetRecord) -> &str {
    let Some(english) = record.english.as_deref() else {
        return match record.name.as_deref() {
            Some(name) => name,
            None => &record.guid,
        };
    };

    let Some(name) = record.name.as_deref() else {
        return english;
    };

    if let Some(template) = record.template.as_deref() {
        if NAME_FIRST_TEMPLATES.contains(&template) {
            return name;
        }
    }

    let english_lower = english.to_lowercase();
    let name_lower = name.to_lowercase();

    if english_lower == name_lower {
        return english;
    }

    if name_lower.contains(&english_lower) {
        return name;
    }

    english
}

/// GUID with a name attached: `"123: Name"`, or just the GUID.
pub fn guid_with_name(record: &AssetRecord) -> String {
    match record.name.as_deref().or(record.english.as_deref()) {
        Some(name) => format!("{}: {}", record.guid, name),
        None => record.guid.to_string(),
    }
}

/// Name with template, and the defining mod when it differs from
/// `exclude_origin`: `"Name (Template, Mod)"`.
pub fn name_with_origin(record: &AssetRecord, exclude_origin: Option<&str>) -> String {
    let text = record
        .english
        .as_deref()
        .or(record.name.as_deref())
        .unwrap_or("");
    let template = record.template.as_deref().unwrap_or("?");

    match (&record.origin, exclude_origin) {
        (Some(origin), Some(exclude)) if exclude != origin => {
            format!("{text} ({template}, {origin})")
        }
        _ => format!("{text} ({template})"),
    }
}
