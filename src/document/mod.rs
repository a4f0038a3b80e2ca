//! Per-document index over one parsed patch snapshot.
//!
//! [`PatchDocument`] ties the two parser passes together with the line
//! index and walks the tree once to build line-addressed element buckets
//! and the document's [`AssetRecord`] map. Everything here is a snapshot:
//! re-parse on any edit, nothing updates in place.

mod patch_type;
pub mod xpath;

pub use patch_type::PatchType;

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use text_size::TextSize;

use crate::base::{LineIndex, Position, Span};
use crate::parser::{Element, ParseError, TagSpanIndex, build_span_index, parse_tree};
use crate::symbols::{AssetRecord, SourceLocation, SymbolDirectory};

/// Tag names that wrap content without contributing to a node path.
const PATH_WRAPPER_TAGS: [&str; 3] = ["Asset", "ModOp", "Assets"];

/// An element pinned to its source line.
///
/// `names` is the ancestor tag chain including the element itself (empty
/// for the root element); `node_path` holds the element-child indices
/// leading to it from the root, for looking the element back up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedElement {
    pub names: Vec<SmolStr>,
    pub node_path: Vec<u32>,
    pub column: u32,
}

/// A fully indexed patch document snapshot.
pub struct PatchDocument {
    line_index: LineIndex,
    root: Element,
    spans: Option<TagSpanIndex>,
    lines: Vec<Vec<PositionedElement>>,
    records: IndexMap<SmolStr, AssetRecord>,
    patch_type: PatchType,
    path: Option<Arc<str>>,
}

impl PatchDocument {
    /// Parse and index `text`, including the tag-span pass.
    ///
    /// Fails on malformed markup; callers keep their last good document
    /// in that case.
    pub fn parse(text: &str, path: Option<&str>) -> Result<Self, ParseError> {
        let mut doc = Self::parse_fast(text, path)?;
        doc.spans = Some(build_span_index(text));
        Ok(doc)
    }

    /// Parse and index `text` without the tag-span pass.
    ///
    /// For hover-only and read-only callers; [`Self::element_range`]
    /// degrades to the name range.
    pub fn parse_fast(text: &str, path: Option<&str>) -> Result<Self, ParseError> {
        let line_index = LineIndex::new(text);
        let root = parse_tree(text, &line_index)?;
        let path: Option<Arc<str>> = path.map(Arc::from);

        let mut doc = Self {
            patch_type: PatchType::from_path(path.as_deref()),
            lines: vec![Vec::new(); line_index.line_count() as usize],
            records: IndexMap::new(),
            line_index,
            root,
            spans: None,
            path,
        };
        doc.index_tree();
        Ok(doc)
    }

    /// Walk the tree once (explicit stack, pre-order) collecting the
    /// line buckets and the record map.
    fn index_tree(&mut self) {
        struct Frame<'a> {
            history: Vec<&'a Element>,
            node_path: Vec<u32>,
            element: &'a Element,
        }

        let mut lines = std::mem::take(&mut self.lines);
        let mut records: IndexMap<SmolStr, AssetRecord> = IndexMap::new();

        let mut stack = vec![Frame {
            history: Vec::new(),
            node_path: Vec::new(),
            element: &self.root,
        }];

        while let Some(frame) = stack.pop() {
            let element = frame.element;
            let position = self.line_index.position_at(element.start);

            if let Some(bucket) = lines.get_mut(position.line as usize) {
                bucket.push(PositionedElement {
                    names: frame.history.iter().map(|el| el.name.clone()).collect(),
                    node_path: frame.node_path.clone(),
                    column: position.column,
                });
            }

            if element.name == "GUID" {
                if let Some(record) = record_at(&frame.history, self.path.as_ref()) {
                    records.insert(record.guid.clone(), record);
                    // everything below the GUID leaf is patch content
                    continue;
                }
            }

            // push in reverse so popping preserves document order
            let children: Vec<&Element> = element.element_children().collect();
            for (index, child) in children.into_iter().enumerate().rev() {
                let mut history = frame.history.clone();
                history.push(child);
                let mut node_path = frame.node_path.clone();
                node_path.push(index as u32);
                stack.push(Frame {
                    history,
                    node_path,
                    element: child,
                });
            }
        }

        self.lines = lines;
        self.records = records;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn text(&self) -> &str {
        self.line_index.text()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn patch_type(&self) -> PatchType {
        self.patch_type
    }

    pub fn spans(&self) -> Option<&TagSpanIndex> {
        self.spans.as_ref()
    }

    pub fn line_count(&self) -> u32 {
        self.line_index.line_count()
    }

    /// Text of one line, or `""` out of range.
    pub fn line_text(&self, line: u32) -> &str {
        self.line_index.line_at(line).unwrap_or("")
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    /// Records declared by this document, in document order.
    pub fn records(&self) -> &IndexMap<SmolStr, AssetRecord> {
        &self.records
    }

    pub fn record(&self, guid: &str) -> Option<&AssetRecord> {
        self.records.get(guid)
    }

    /// Copy this document's records into a directory, stamping the
    /// defining mod. Last write wins, so call in load order.
    pub fn merge_into(&self, directory: &mut SymbolDirectory, origin: Option<&str>) {
        directory.extend(self.records.values().map(|record| {
            let mut record = record.clone();
            if record.origin.is_none() {
                record.origin = origin.map(String::from);
            }
            record
        }));
    }

    // ------------------------------------------------------------------
    // Line addressing
    // ------------------------------------------------------------------

    pub fn has_line(&self, line: u32) -> bool {
        (line as usize) < self.lines.len()
    }

    /// Elements starting on `line`, left to right.
    pub fn elements_on_line(&self, line: u32) -> &[PositionedElement] {
        self.lines
            .get(line as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn last_element_on_line(&self, line: u32) -> Option<&PositionedElement> {
        self.elements_on_line(line).last()
    }

    /// The element whose start tag is closest to the left of
    /// `line`/`column`, searching upward through earlier lines.
    pub fn closest_element_left(&self, line: u32, column: u32) -> Option<&PositionedElement> {
        let this_line = self.lines.get(line as usize)?;

        if this_line.is_empty() || this_line[0].column > column {
            let mut l = line as usize;
            while l > 0 {
                l -= 1;
                if let Some(found) = self.lines[l].last() {
                    return Some(found);
                }
            }
            return this_line.first();
        }

        let mut i = 0;
        while i < this_line.len() - 1 && this_line[i + 1].column <= column {
            i += 1;
        }
        Some(&this_line[i])
    }

    /// Look an element up by its element-child index path.
    pub fn element_at(&self, node_path: &[u32]) -> Option<&Element> {
        let mut current = &self.root;
        for &index in node_path {
            current = current.element_child(index as usize)?;
        }
        Some(current)
    }

    /// Tag path at a cursor position, e.g. `/Values/Standard`.
    ///
    /// Leading `Asset`/`ModOp` wrappers (and an `Assets` diff root) are
    /// stripped; a `ModOp` with a `Path` attribute contributes that path
    /// as the prefix instead. `remove_last` drops the innermost tag.
    pub fn node_path(&self, line: u32, column: u32, remove_last: bool) -> Option<String> {
        let positioned = self.closest_element_left(line, column)?;
        let mut names: &[SmolStr] = &positioned.names;
        let mut prefix: Option<String> = None;
        let mut skipped = 0usize;

        while let Some(first) = names.first() {
            if !PATH_WRAPPER_TAGS.contains(&first.as_str()) {
                break;
            }
            prefix = None;
            if first == "ModOp" {
                if let Some(path) = self
                    .element_at(&positioned.node_path[..=skipped])
                    .and_then(|el| el.attr("Path"))
                {
                    let mut value = path.to_string();
                    if !value.ends_with('/') {
                        value.push('/');
                    }
                    prefix = Some(value);
                }
            }
            names = &names[1..];
            skipped += 1;
        }

        let mut names: Vec<&str> = names.iter().map(SmolStr::as_str).collect();
        if remove_last && !names.is_empty() {
            names.pop();
        }

        Some(format!(
            "{}{}",
            prefix.unwrap_or_else(|| "/".to_string()),
            names.join("/")
        ))
    }

    // ------------------------------------------------------------------
    // Ranges
    // ------------------------------------------------------------------

    /// Range of the tag name inside the start tag.
    pub fn name_range(&self, element: &Element) -> Span {
        let start = self
            .line_index
            .position_at(element.start + TextSize::from(1));
        Span::new(
            start,
            Position::new(start.line, start.column + element.name.len() as u32),
        )
    }

    /// Full range of an element from `<` to just past its close tag,
    /// via the span index. Falls back to the name range for self-closing
    /// elements or when the span pass was skipped.
    pub fn element_range(&self, element: &Element) -> Span {
        match self.spans.as_ref().and_then(|s| s.end_of(element.start)) {
            Some(end) => Span::new(
                self.line_index.position_at(element.start),
                self.line_index.position_at(end),
            ),
            None => self.name_range(element),
        }
    }
}

/// Recognize `[..., Asset, Values, Standard, GUID]`-shaped chains and
/// build the record. The chain includes the GUID leaf itself.
fn record_at(history: &[&Element], path: Option<&Arc<str>>) -> Option<AssetRecord> {
    let guid_element = *history.last()?;
    let guid = guid_element.text().trim();
    if guid.is_empty() {
        return None;
    }

    let parent = history.get(history.len().checked_sub(2)?)?;
    if parent.name != "Standard" {
        return None;
    }
    let name = parent.value_with_path("Name")?.trim();
    if name.is_empty() {
        return None;
    }

    let asset = history
        .len()
        .checked_sub(4)
        .and_then(|i| history.get(i))
        .copied();

    let non_empty = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    Some(AssetRecord {
        guid: SmolStr::new(guid),
        name: Some(name.to_string()),
        english: None,
        template: non_empty(asset.and_then(|a| a.value_with_path("Template"))),
        base_asset: non_empty(asset.and_then(|a| a.value_with_path("BaseAssetGUID")))
            .map(SmolStr::new),
        origin: None,
        location: match (path, asset) {
            (Some(path), Some(asset)) => Some(SourceLocation {
                path: Arc::clone(path),
                line: asset.position.line,
            }),
            _ => None,
        },
    })
}
