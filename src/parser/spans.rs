//! Streaming tag-span pass.
//!
//! Maps the byte offset of every opening tag to the byte offset
//! immediately after its matching close tag. This is the index behind
//! "select the whole operation" ranges; the tree pass stays free of this
//! bookkeeping and read-only callers can skip the pass entirely.

use quick_xml::Reader;
use quick_xml::events::Event;
use rustc_hash::FxHashMap;
use text_size::TextSize;

/// Start-tag offset → offset one past the matching `>` of the close tag.
///
/// Self-closing tags have no entry. Only meaningful for text the tree
/// pass accepted; for every well-formed, non-self-closing element a
/// lookup by its start offset succeeds.
#[derive(Debug, Clone, Default)]
pub struct TagSpanIndex {
    spans: FxHashMap<TextSize, TextSize>,
}

impl TagSpanIndex {
    /// End offset for the element opening at `start`.
    pub fn end_of(&self, start: TextSize) -> Option<TextSize> {
        self.spans.get(&start).copied()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Build the span index with a single streaming pass over `text`.
///
/// Maintains a LIFO stack of open start-tag offsets and pops one on each
/// close tag. The pass assumes the tree pass already validated the text;
/// on a reader error it stops and returns what it has.
pub fn build_span_index(text: &str) -> TagSpanIndex {
    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.trim_text(true);
    config.check_end_names = true;

    let mut index = TagSpanIndex::default();
    let mut open_starts: Vec<TextSize> = Vec::new();

    loop {
        let event = reader.read_event();
        let after = reader.buffer_position() as u32;

        match event {
            Ok(Event::Start(e)) => {
                open_starts.push(TextSize::from(after - e.len() as u32 - 2));
            }
            Ok(Event::End(_)) => {
                if let Some(start) = open_starts.pop() {
                    index.spans.insert(start, TextSize::from(after));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => break,
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_ends_after_close_tag() {
        let text = "<ModOps>\n  <ModOp Type=\"add\">x</ModOp>\n</ModOps>";
        let index = build_span_index(text);

        let modop_start = text.find("<ModOp").unwrap() as u32;
        let end = u32::from(index.end_of(TextSize::from(modop_start)).unwrap());
        assert_eq!(&text[..end as usize], &text[..text.find("</ModOp>").unwrap() + 8]);
        assert_eq!(text.as_bytes()[end as usize - 1], b'>');

        let root_end = u32::from(index.end_of(TextSize::from(0)).unwrap());
        assert_eq!(root_end as usize, text.len());
    }

    #[test]
    fn test_self_closing_has_no_entry() {
        let text = "<ModOps><Include File=\"a.xml\"/></ModOps>";
        let index = build_span_index(text);

        let include_start = text.find("<Include").unwrap() as u32;
        assert!(index.end_of(TextSize::from(include_start)).is_none());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_every_open_element_indexed() {
        let text = "<A><B><C>1</C><C>2</C></B></A>";
        let index = build_span_index(text);

        for (pos, _) in text.match_indices('<') {
            if text.as_bytes()[pos + 1] == b'/' {
                continue;
            }
            let end = index.end_of(TextSize::from(pos as u32));
            assert!(end.is_some(), "no span for element at {pos}");
            assert_eq!(text.as_bytes()[u32::from(end.unwrap()) as usize - 1], b'>');
        }
    }
}
