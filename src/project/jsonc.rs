//! JSON-with-comments preprocessing.
//!
//! Mod metadata permits `//` and `/* */` comments plus trailing commas.
//! This pass blanks them out (preserving newlines, so error positions in
//! the stripped text still line up) before the strict JSON parse.

/// Replace comments and trailing commas with spaces.
pub fn strip(text: &str) -> String {
    let mut out: Vec<char> = text.chars().collect();

    #[derive(PartialEq)]
    enum State {
        Normal,
        String,
        Escape,
        LineComment,
        BlockComment,
    }

    let mut state = State::Normal;
    let mut i = 0;
    while i < out.len() {
        let ch = out[i];
        match state {
            State::Normal => match ch {
                '"' => state = State::String,
                '/' if out.get(i + 1) == Some(&'/') => {
                    state = State::LineComment;
                    out[i] = ' ';
                }
                '/' if out.get(i + 1) == Some(&'*') => {
                    state = State::BlockComment;
                    out[i] = ' ';
                    out[i + 1] = ' ';
                    i += 1;
                }
                _ => {}
            },
            State::String => match ch {
                '\\' => state = State::Escape,
                '"' => state = State::Normal,
                _ => {}
            },
            State::Escape => state = State::String,
            State::LineComment => {
                if ch == '\n' || ch == '\r' {
                    state = State::Normal;
                } else {
                    out[i] = ' ';
                }
            }
            State::BlockComment => {
                if ch == '*' && out.get(i + 1) == Some(&'/') {
                    out[i] = ' ';
                    out[i + 1] = ' ';
                    i += 1;
                    state = State::Normal;
                } else if ch != '\n' && ch != '\r' {
                    out[i] = ' ';
                }
            }
        }
        i += 1;
    }

    // trailing commas: a comma whose next non-whitespace is } or ]
    let mut in_string = false;
    let mut escaped = false;
    for i in 0..out.len() {
        let ch = out[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            ',' => {
                let next = out[i + 1..].iter().find(|c| !c.is_whitespace());
                if matches!(next, Some('}') | Some(']')) {
                    out[i] = ' ';
                }
            }
            _ => {}
        }
    }

    out.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comments() {
        let json = "{\n  \"a\": 1, // the answer\n  \"b\": 2\n}";
        let stripped = strip(json);
        assert!(!stripped.contains("answer"));
        let value: serde_json::Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_block_comments_keep_lines() {
        let json = "{\n/* multi\nline */ \"a\": 1\n}";
        let stripped = strip(json);
        assert_eq!(stripped.lines().count(), json.lines().count());
        assert!(serde_json::from_str::<serde_json::Value>(&stripped).is_ok());
    }

    #[test]
    fn test_slashes_inside_strings_kept() {
        let json = r#"{"url": "https://example.com", "p": "a/*b*/c"}"#;
        let stripped = strip(json);
        let value: serde_json::Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["p"], "a/*b*/c");
    }

    #[test]
    fn test_trailing_commas() {
        let json = "{\"a\": [1, 2, ], \"b\": {\"c\": 3,},}";
        let stripped = strip(json);
        let value: serde_json::Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(value["a"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_commas_inside_strings_kept() {
        let json = r#"{"a": "x,}"}"#;
        let stripped = strip(json);
        let value: serde_json::Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(value["a"], "x,}");
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let json = r#"{"a": "say \" // not a comment"}"#;
        let stripped = strip(json);
        assert!(stripped.contains("not a comment"));
    }
}
