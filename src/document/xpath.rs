//! Minimal helpers for the XPath-like target paths on patch operations.
//!
//! Paths look like `/Values/Standard` or
//! `//Asset[Values/Standard/GUID='123']/Values/ItemConfig`. Only the
//! pieces tooling needs are implemented: predicate-aware splitting, the
//! last segment, and GUID extraction from predicates.

/// Split by `/`, but not inside `[ ... ]` predicates. Empty segments
/// (leading or doubled slashes) are skipped.
pub fn split(xpath: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0u32;
    let mut start = 0usize;

    for (i, ch) in xpath.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                if i > start {
                    parts.push(&xpath[start..i]);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < xpath.len() {
        parts.push(&xpath[start..]);
    }

    parts
}

fn remove_predicate(segment: &str) -> &str {
    let segment = segment.trim();
    match segment.find('[') {
        Some(idx) => segment[..idx].trim_end(),
        None => segment,
    }
}

/// Last path segment, with predicates dropped when `drop_predicate`.
///
/// With `item_parent`, a trailing `Item` segment is reported together
/// with its parent (`List/Item`) — a bare `Item` says nothing.
pub fn basename(xpath: &str, drop_predicate: bool, item_parent: bool) -> Option<String> {
    let parts = split(xpath);
    let last_raw = *parts.last()?;
    let last = if drop_predicate {
        remove_predicate(last_raw)
    } else {
        last_raw
    };

    if item_parent && last == "Item" && parts.len() > 1 {
        let parent_raw = parts[parts.len() - 2];
        let parent = if drop_predicate {
            remove_predicate(parent_raw)
        } else {
            parent_raw
        };
        return Some(format!("{parent}/{last}"));
    }

    Some(last.to_string())
}

/// Extract a GUID from a path predicate, e.g.
/// `//Asset[Values/Standard/GUID='123']` → `"123"`.
///
/// Takes the first digit run of length ≥ 4 inside brackets, so index
/// predicates like `Item[1]` are not mistaken for GUIDs.
pub fn guid(xpath: &str) -> Option<&str> {
    let mut depth = 0u32;
    let mut run_start: Option<usize> = None;

    for (i, ch) in xpath.char_indices() {
        let in_run = run_start.is_some();
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '0'..='9' if depth > 0 => {
                if !in_run {
                    run_start = Some(i);
                }
                continue;
            }
            _ => {}
        }
        if let Some(start) = run_start.take() {
            if i - start >= 4 {
                return Some(&xpath[start..i]);
            }
        }
    }
    if let Some(start) = run_start {
        if xpath.len() - start >= 4 {
            return Some(&xpath[start..]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_skips_predicate_slashes() {
        assert_eq!(
            split("//Asset[Values/Standard/GUID='123']/Values"),
            vec!["Asset[Values/Standard/GUID='123']", "Values"]
        );
        assert_eq!(split("/Values/Standard"), vec!["Values", "Standard"]);
        assert_eq!(split(""), Vec::<&str>::new());
    }

    #[test]
    fn test_basename() {
        assert_eq!(
            basename("/Values/Standard[1]", true, false),
            Some("Standard".to_string())
        );
        assert_eq!(
            basename("/Values/Standard[1]", false, false),
            Some("Standard[1]".to_string())
        );
        assert_eq!(basename("", true, false), None);
    }

    #[test]
    fn test_basename_item_parent() {
        assert_eq!(
            basename("/Values/ItemList/Item", true, true),
            Some("ItemList/Item".to_string())
        );
        assert_eq!(basename("Item", true, true), Some("Item".to_string()));
    }

    #[test]
    fn test_guid_from_predicate() {
        assert_eq!(guid("//Asset[Values/Standard/GUID='100123']"), Some("100123"));
        assert_eq!(guid("//Values[GUID=1337000]/Item"), Some("1337000"));
        // index predicates are not GUIDs
        assert_eq!(guid("/Values/Item[1]"), None);
        // digits outside predicates are not GUIDs
        assert_eq!(guid("/Texts123456/Item"), None);
        assert_eq!(guid("/Values/Standard"), None);
    }
}
