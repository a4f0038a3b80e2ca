//! Tolerant tree pass.
//!
//! Builds the [`Element`] tree with an explicit stack — never recursion,
//! because patch documents nest arbitrarily deep. Any markup error aborts
//! the whole parse: a partial tree would silently misrepresent the
//! document.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smol_str::SmolStr;
use text_size::TextSize;

use crate::base::LineIndex;

use super::error::ParseError;
use super::node::{Element, XmlNode};

/// Parse `text` into an element tree.
///
/// `line_index` must index the same text; node positions are derived
/// through it at parse time.
pub fn parse_tree(text: &str, line_index: &LineIndex) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.trim_text(true);
    config.check_end_names = true;

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event();
        let after = TextSize::from(reader.buffer_position() as u32);

        match event {
            Ok(Event::Start(e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(ParseError::TrailingContent { offset: after });
                }
                let start = u32::from(after) - e.len() as u32 - 2;
                stack.push(make_element(&e, TextSize::from(start), line_index)?);
            }
            Ok(Event::Empty(e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(ParseError::TrailingContent { offset: after });
                }
                let start = u32::from(after) - e.len() as u32 - 3;
                let element = make_element(&e, TextSize::from(start), line_index)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let Some(element) = stack.pop() else {
                    return Err(ParseError::Syntax {
                        message: "close tag without matching open tag".into(),
                        offset: after,
                    });
                };
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Text(e)) => {
                let value = e.unescape().map_err(|err| ParseError::Syntax {
                    message: err.to_string(),
                    offset: after,
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Text(value.into_owned())),
                    // trim_text already dropped whitespace, so this is real
                    // character data outside any element
                    None => return Err(ParseError::TrailingContent { offset: after }),
                }
            }
            Ok(Event::CData(e)) => {
                let value = String::from_utf8_lossy(&e).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Text(value)),
                    None => return Err(ParseError::TrailingContent { offset: after }),
                }
            }
            Ok(Event::Comment(e)) => {
                // comments outside the root carry no structure, drop them
                if let Some(parent) = stack.last_mut() {
                    let value = String::from_utf8_lossy(&e).into_owned();
                    parent.children.push(XmlNode::Comment(value));
                }
            }
            Ok(Event::Eof) => break,
            // declaration, processing instructions, doctype
            Ok(_) => {}
            Err(err) => {
                return Err(ParseError::Syntax {
                    message: err.to_string(),
                    offset: after,
                });
            }
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::UnterminatedElement {
            name: open.name.clone(),
            offset: open.start,
        });
    }

    root.ok_or(ParseError::MissingRoot)
}

fn make_element(
    e: &BytesStart<'_>,
    start: TextSize,
    line_index: &LineIndex,
) -> Result<Element, ParseError> {
    let name = SmolStr::new(String::from_utf8_lossy(e.name().as_ref()));
    let mut element = Element::new(name, start, line_index.position_at(start));

    for attr in e.attributes() {
        let attr = attr.map_err(|err| ParseError::Syntax {
            message: err.to_string(),
            offset: start,
        })?;
        let key = SmolStr::new(String::from_utf8_lossy(attr.key.as_ref()));
        let value = attr
            .unescape_value()
            .map_err(|err| ParseError::Syntax {
                message: err.to_string(),
                offset: start,
            })?
            .into_owned();
        element.attributes.insert(key, value);
    }

    Ok(element)
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => *root = Some(element),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Position;

    fn parse(text: &str) -> Result<Element, ParseError> {
        parse_tree(text, &LineIndex::new(text))
    }

    #[test]
    fn test_parse_simple_tree() {
        let root = parse("<ModOps><ModOp Type=\"add\"><Asset/></ModOp></ModOps>").unwrap();
        assert_eq!(root.name, "ModOps");
        let modop = root.element_child(0).unwrap();
        assert_eq!(modop.name, "ModOp");
        assert_eq!(modop.attr("Type"), Some("add"));
        assert_eq!(modop.element_child(0).unwrap().name, "Asset");
    }

    #[test]
    fn test_start_offsets_and_positions() {
        let text = "<ModOps>\n  <ModOp Type=\"add\"/>\n</ModOps>";
        let root = parse(text).unwrap();
        assert_eq!(root.start, TextSize::from(0));
        assert_eq!(root.position, Position::new(0, 0));

        let modop = root.element_child(0).unwrap();
        assert_eq!(u32::from(modop.start), text.find("<ModOp").unwrap() as u32);
        assert_eq!(modop.position, Position::new(1, 2));
    }

    #[test]
    fn test_text_and_comment_children() {
        let root = parse("<A><!-- note --><B>value</B></A>").unwrap();
        assert!(matches!(&root.children[0], XmlNode::Comment(c) if c == " note "));
        assert_eq!(root.child_named("B").unwrap().text(), "value");
    }

    #[test]
    fn test_entity_references_unescaped() {
        let root = parse("<A>a &amp; b &lt;c&gt;</A>").unwrap();
        assert_eq!(root.text(), "a & b <c>");
    }

    #[test]
    fn test_invalid_entity_fails() {
        assert!(matches!(
            parse("<A>&nosuch;</A>"),
            Err(ParseError::Syntax { .. })
        ));
    }

    #[test]
    fn test_unterminated_element_fails() {
        let err = parse("<ModOps><ModOp Type=\"add\">").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnterminatedElement { ref name, .. } if name == "ModOp"
        ));
    }

    #[test]
    fn test_mismatched_close_fails() {
        assert!(parse("<A><B></A></B>").is_err());
    }

    #[test]
    fn test_close_without_open_fails() {
        assert!(parse("</A>").is_err());
    }

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(parse(""), Err(ParseError::MissingRoot));
    }

    #[test]
    fn test_second_root_fails() {
        assert!(matches!(
            parse("<A/><B/>"),
            Err(ParseError::TrailingContent { .. })
        ));
    }

    #[test]
    fn test_text_outside_root_fails() {
        assert!(parse("<A/>stray").is_err());
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let depth = 20_000;
        let mut text = String::new();
        for _ in 0..depth {
            text.push_str("<Group>");
        }
        text.push_str("<ModOp/>");
        for _ in 0..depth {
            text.push_str("</Group>");
        }
        let root = parse(&text).unwrap();
        assert_eq!(root.name, "Group");
    }

    #[test]
    fn test_whitespace_only_text_skipped() {
        let root = parse("<A>\n   <B/>\n</A>").unwrap();
        assert_eq!(root.children.len(), 1);
    }
}
