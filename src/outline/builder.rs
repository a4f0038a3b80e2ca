//! Outline construction.
//!
//! A single pre-order walk (explicit stack) over the parsed tree,
//! threading two pieces of carry-state through sibling visits: the
//! pending section label (seeded from the root tag name, replaced by
//! `# comments` at depth 1) and the pending group label (any other
//! non-empty comment, consumed by the next element).

use smol_str::SmolStr;

use crate::base::{Position, Span, ellipse};
use crate::document::{PatchDocument, xpath};
use crate::parser::{Element, XmlNode};
use crate::symbols::{SymbolDirectory, best_display_name};

use super::entry::{EntryKind, OutlineEntry};

/// Record templates surfaced as event-kind entries.
const EVENT_TEMPLATES: [&str; 3] = ["FeatureUnlock", "Unlock", "Trigger"];

struct Relevance {
    kind: EntryKind,
    /// Children of this element are patch content, not structure.
    is_leaf: bool,
    /// Childless elements of this kind are dangling placeholders.
    needs_children: bool,
}

fn relevance(tag: &str) -> Option<Relevance> {
    match tag {
        "ModOp" => Some(Relevance {
            kind: EntryKind::Operation,
            is_leaf: true,
            needs_children: false,
        }),
        "Group" => Some(Relevance {
            kind: EntryKind::Group,
            is_leaf: false,
            needs_children: false,
        }),
        "Asset" => Some(Relevance {
            kind: EntryKind::Record,
            is_leaf: false,
            needs_children: true,
        }),
        "Template" => Some(Relevance {
            kind: EntryKind::Template,
            is_leaf: false,
            needs_children: true,
        }),
        "Include" => Some(Relevance {
            kind: EntryKind::Include,
            is_leaf: false,
            needs_children: false,
        }),
        _ => None,
    }
}

struct StackNode<'a> {
    depth: u32,
    node: &'a XmlNode,
    /// The parent was an operation: emit as flat property, do not descend.
    leaf: bool,
}

struct PendingEntry {
    label: String,
    detail: String,
    guid: Option<SmolStr>,
    level: u32,
    /// `None` is back-filled from the following entries afterwards.
    range: Option<Span>,
    selection: Span,
    kind: EntryKind,
}

/// Build the outline for one document snapshot.
///
/// Pure over its inputs: running it twice on the same snapshot yields an
/// identical sequence. Unresolvable GUIDs degrade to raw identifiers,
/// and a node the builder cannot make sense of is skipped on its own —
/// one malformed operation must not hide the rest of the document.
pub fn build_outline(doc: &PatchDocument, directory: &SymbolDirectory) -> Vec<OutlineEntry> {
    let root = doc.root();

    let mut section: Option<String> = Some(root.name.to_string());
    let mut group: Option<String> = None;
    let mut entries: Vec<PendingEntry> = Vec::new();
    let mut stack: Vec<StackNode<'_>> = Vec::new();

    match root.name.as_str() {
        // ModOps: a patch document; Assets: read-only diff display
        "ModOps" | "Assets" => push_children(&mut stack, root, 0, false),
        // Asset: definition display of a single record
        "Asset" => {
            if let Some(values) = root.child_named("Values") {
                push_children(&mut stack, values, 0, true);
            }
        }
        _ => {}
    }

    while let Some(top) = stack.pop() {
        match top.node {
            XmlNode::Comment(raw) => {
                let comment = raw.trim();
                if comment.starts_with('#') && top.depth == 1 {
                    let stripped = comment.replace('#', "");
                    let stripped = stripped.trim();
                    if !stripped.is_empty() {
                        section = Some(stripped.to_string());
                        group = None;
                    }
                } else if !comment.is_empty() {
                    group = Some(comment.to_string());
                }
            }
            XmlNode::Element(element) => {
                let mut relevant = relevance(&element.name);
                if let Some(r) = &relevant {
                    if r.needs_children && structural_child_count(element) == 0 {
                        relevant = None;
                    }
                }

                // a pending section opens right before the next entry
                if let Some(label) = section.take() {
                    let line = find_comment_up(doc, element.position.line, &label);
                    entries.push(PendingEntry {
                        label,
                        detail: String::new(),
                        guid: None,
                        level: top.depth.saturating_sub(1),
                        range: None,
                        selection: Span::from_coords(line, 0, line, 1),
                        kind: EntryKind::Section,
                    });
                }

                if relevant.is_some() || top.leaf {
                    if let Some(r) = &relevant {
                        if !top.leaf {
                            push_children(&mut stack, element, top.depth, r.is_leaf);
                        }
                    }
                    if let Some(entry) =
                        element_entry(doc, directory, element, &top, relevant.as_ref(), group.as_deref())
                    {
                        entries.push(entry);
                    }
                }
                group = None;
            }
            XmlNode::Text(_) => {}
        }
    }

    merge_only_child_groups(&mut entries);
    finish(doc, entries)
}

/// Push element and comment children in reverse, preserving document
/// order when popping. Text children are patch values, not structure.
fn push_children<'a>(stack: &mut Vec<StackNode<'a>>, parent: &'a Element, depth: u32, leaf: bool) {
    for child in parent.children.iter().rev() {
        if matches!(child, XmlNode::Element(_) | XmlNode::Comment(_)) {
            stack.push(StackNode {
                depth: depth + 1,
                node: child,
                leaf,
            });
        }
    }
}

fn structural_child_count(element: &Element) -> usize {
    element
        .children
        .iter()
        .filter(|c| matches!(c, XmlNode::Element(_) | XmlNode::Comment(_)))
        .count()
}

/// Build the entry for one element, dispatching on its shape.
///
/// Returns `None` for nodes that carry nothing presentable; the caller
/// keeps going with the rest of the document.
fn element_entry(
    doc: &PatchDocument,
    directory: &SymbolDirectory,
    element: &Element,
    top: &StackNode<'_>,
    relevant: Option<&Relevance>,
    group: Option<&str>,
) -> Option<PendingEntry> {
    // with the span pass skipped, ranges are back-filled instead
    let range = doc.spans().map(|_| doc.element_range(element));
    let selection = doc.name_range(element);

    let mut entry = PendingEntry {
        label: String::new(),
        detail: String::new(),
        guid: None,
        level: top.depth,
        range,
        selection,
        kind: relevant.map(|r| r.kind).unwrap_or(EntryKind::Other),
    };

    // Text content below an operation
    if element.name == "Text" && top.leaf {
        if let Some(text) = element.child_named("Text") {
            let text = ellipse(text.text(), 35);
            entry.label = if text.is_empty() { "Text".to_string() } else { text };
            entry.kind = EntryKind::Key;
            return Some(entry);
        }
    }

    // Template definition
    if element.name == "Template" {
        if let Some(name) = element.child_named("Name") {
            let value = name.text().trim();
            entry.label = if value.is_empty() {
                "<template>".to_string()
            } else {
                value.to_string()
            };
            entry.detail = "Template".to_string();
            entry.kind = EntryKind::Template;
            return Some(entry);
        }
    }

    // Record definition
    if element.name == "Asset" && element.child_named("Values").is_some() {
        let template = element.value_with_path("Template").unwrap_or("");
        entry.kind = if EVENT_TEMPLATES.contains(&template) {
            EntryKind::Event
        } else if template == "Text" {
            EntryKind::Key
        } else {
            EntryKind::Record
        };
        entry.label = record_label(element, directory);
        entry.detail = record_detail(element, directory);
        entry.guid = non_empty(element.value_with_path("Values.Standard.GUID")).map(SmolStr::new);
        return Some(entry);
    }

    // Patch content below an operation
    if top.leaf && element.name != "Asset" {
        let mut name: Option<String> = None;
        if element.name == "Item" || element.name == "ModItem" {
            if let Some(item) = element.first_leaf_child() {
                if let Some(value) = non_empty(Some(item.text())) {
                    name = Some(match directory.resolve(&value) {
                        Some(record) => best_display_name(record).to_string(),
                        None => value,
                    });
                }
            }
        }
        match name {
            Some(name) => {
                entry.label = name;
                entry.detail = element.name.to_string();
            }
            None => entry.label = element.name.to_string(),
        }
        entry.kind = EntryKind::Property;
        return Some(entry);
    }

    // Operation
    if element.name == "ModOp" {
        entry.label = operation_label(element, directory);
        entry.detail = operation_detail(element);
        entry.kind = EntryKind::Operation;
        return Some(entry);
    }

    // Group, Include, childless diff entries
    entry.label = generic_label(element, directory, group);
    entry.detail = generic_detail(element);
    if element.name == "Asset" {
        entry.guid = non_empty(element.value_with_path("Values.Standard.GUID")).map(SmolStr::new);
    }
    Some(entry)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Operation label: resolved target name and path segment, then the path
/// segment alone, then the declared operation subtype, then the tag.
fn operation_label(element: &Element, directory: &SymbolDirectory) -> String {
    let path_value = element.path_attribute().map(|(_, value)| value);

    let guids = element
        .attr("GUID")
        .or_else(|| path_value.and_then(xpath::guid));

    let mut name = guids
        .and_then(|guids| {
            let first = guids.split(',').next().unwrap_or("").trim();
            directory.resolve(first)
        })
        .map(|record| best_display_name(record).to_string())
        .unwrap_or_default();

    if let Some(path_value) = path_value {
        if let Some(segment) = xpath::basename(path_value, true, true) {
            if !segment.is_empty() {
                name = if name.is_empty() {
                    segment
                } else {
                    format!("{segment} ({name})")
                };
            }
        }
    }

    if !name.is_empty() {
        return name;
    }
    match non_empty(element.attr("Type")) {
        Some(kind) => kind,
        None => element.name.to_string(),
    }
}

/// Operation detail: the targeting attribute when it doubles as the
/// operation kind, else the declared `Type`.
fn operation_detail(element: &Element) -> String {
    match element.path_attribute() {
        Some((attr, _)) if attr != "Path" => attr.to_string(),
        _ => match non_empty(element.attr("Type")) {
            Some(kind) => kind,
            None => element.name.to_string(),
        },
    }
}

/// Record label: directory display name, else the (declared or
/// inherited) template, else the raw GUID, else the internal name.
fn record_label(element: &Element, directory: &SymbolDirectory) -> String {
    let guid = non_empty(element.value_with_path("Values.Standard.GUID"));

    if let Some(guid) = &guid {
        if let Some(record) = directory.resolve(guid) {
            return best_display_name(record).to_string();
        }
    }

    let (template, _) = element_template(element, directory);
    if let Some(template) = template {
        return template;
    }
    if let Some(guid) = guid {
        return guid;
    }
    match non_empty(element.value_with_path("Values.Standard.Name")) {
        Some(name) => name,
        None => element.name.to_string(),
    }
}

/// Record detail: `Template: BaseName` when inherited, the template or
/// the dangling base GUID otherwise.
fn record_detail(element: &Element, directory: &SymbolDirectory) -> String {
    match element_template(element, directory) {
        (Some(template), Some(name)) => format!("{template}: {name}"),
        (Some(template), None) => template,
        (None, Some(name)) => name,
        (None, None) => String::new(),
    }
}

/// Template of a record element: `(template, base name)`.
///
/// A declared `Template` child wins; otherwise `BaseAssetGUID` is
/// resolved one hop through the directory. An unresolvable base yields
/// `(None, base guid)` rather than failing.
fn element_template(
    element: &Element,
    directory: &SymbolDirectory,
) -> (Option<String>, Option<String>) {
    if let Some(template) = non_empty(element.value_with_path("Template")) {
        return (Some(template), None);
    }
    let Some(base) = non_empty(element.value_with_path("BaseAssetGUID")) else {
        return (None, None);
    };
    match directory.resolve(&base) {
        Some(record) => (record.template.clone(), record.name.clone()),
        None => (None, Some(base)),
    }
}

fn generic_label(element: &Element, directory: &SymbolDirectory, group: Option<&str>) -> String {
    match element.name.as_str() {
        "ModOp" => operation_label(element, directory),
        "Group" => {
            if let Some(label) = group {
                label.to_string()
            } else if element.attr("MaxRepeat").is_some() {
                "Loop".to_string()
            } else {
                element.name.to_string()
            }
        }
        "Asset" => match non_empty(element.value_with_path("Values.Standard.Name"))
            .or_else(|| non_empty(element.value_with_path("Values.Standard.GUID")))
        {
            Some(name) => name,
            None => element.name.to_string(),
        },
        "Template" => match non_empty(element.value_with_path("Name")) {
            Some(name) => name,
            None => element.name.to_string(),
        },
        "Include" => {
            let file = element.attr("File").unwrap_or("");
            let basename = std::path::Path::new(file)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("");
            let stem = basename.split('.').next().unwrap_or("");
            if stem.is_empty() {
                "<file>".to_string()
            } else {
                stem.to_string()
            }
        }
        _ => element.name.to_string(),
    }
}

fn generic_detail(element: &Element) -> String {
    match element.name.as_str() {
        "Group" => match element.attr("MaxRepeat") {
            Some(count) => format!("MaxRepeat={count}"),
            None => String::new(),
        },
        "Include" => element.name.to_string(),
        _ => String::new(),
    }
}

/// Line the section comment actually sits on: scan up to ten lines
/// upward for its text, falling back to the anchor element's line.
fn find_comment_up(doc: &PatchDocument, start: u32, comment: &str) -> u32 {
    let min = start.saturating_sub(9);
    let mut line = start;
    loop {
        if doc.line_text(line).contains(comment) {
            return line;
        }
        if line == min {
            return start;
        }
        line -= 1;
    }
}

/// Splice out `Group`-labeled entries whose subtree is exactly one child
/// subtree, repeatedly until a fixpoint. Groups exist for patch-ordering
/// control; a single-purpose wrapper adds no display information.
fn merge_only_child_groups(entries: &mut Vec<PendingEntry>) {
    loop {
        let removable = (0..entries.len()).find(|&i| {
            if entries[i].kind != EntryKind::Group || entries[i].label != "Group" {
                return false;
            }
            child_subtree_count(entries, i) == 1
        });
        match removable {
            Some(i) => {
                entries.remove(i);
            }
            None => break,
        }
    }
}

/// Number of direct child subtrees below entry `i`: entries at the
/// shallowest level within its subtree span.
fn child_subtree_count(entries: &[PendingEntry], i: usize) -> usize {
    let level = entries[i].level;
    let subtree: Vec<u32> = entries[i + 1..]
        .iter()
        .map(|e| e.level)
        .take_while(|&l| l > level)
        .collect();
    match subtree.iter().min() {
        Some(&min) => subtree.iter().filter(|&&l| l == min).count(),
        None => 0,
    }
}

/// Back-fill missing ranges: a section (or any entry built without the
/// span pass) extends to the line before the next entry at its level or
/// shallower, or to the end of the document.
fn finish(doc: &PatchDocument, entries: Vec<PendingEntry>) -> Vec<OutlineEntry> {
    let last_line = doc.line_count().saturating_sub(1);

    (0..entries.len())
        .map(|i| {
            let entry = &entries[i];
            let range = entry.range.unwrap_or_else(|| {
                let mut end_line = last_line;
                for later in &entries[i + 1..] {
                    if later.level <= entry.level {
                        end_line = later.selection.start.line.saturating_sub(1);
                        break;
                    }
                }
                Span::new(
                    entry.selection.start,
                    Position::new(end_line, doc.line_index().line_len(end_line)),
                )
            });
            OutlineEntry {
                label: entry.label.clone(),
                detail: entry.detail.clone(),
                guid: entry.guid.clone(),
                level: entry.level,
                range,
                selection: entry.selection,
                kind: entry.kind,
            }
        })
        .collect()
}
