/// Look up `key` in a struct tag of the conventional form
/// `key:"value" other:"value"`.
///
/// Returns the unquoted value, or `None` when the key is absent or the tag is
/// malformed before the key is reached.
#[must_use]
pub fn lookup_tag(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        let name_end = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
            .unwrap_or(rest.len());
        if name_end == 0 || !rest[name_end..].starts_with(":\"") {
            return None;
        }
        let name = &rest[..name_end];
        rest = &rest[name_end + 2..];

        let (value, remaining) = read_quoted(rest)?;
        if name == key {
            return Some(value);
        }
        rest = remaining;
    }
}

/// Read a quoted value whose opening quote was already consumed
fn read_quoted(input: &str) -> Option<(String, &str)> {
    let mut value = String::new();
    let mut chars = input.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => return Some((value, &input[idx + 1..])),
            '\\' => {
                let (_, escaped) = chars.next()?;
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    other => value.push(other),
                }
            }
            other => value.push(other),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_key_among_several() {
        let tag = r#"json:"spec,omitempty" yaml:"spec""#;
        assert_eq!(lookup_tag(tag, "json").as_deref(), Some("spec,omitempty"));
        assert_eq!(lookup_tag(tag, "yaml").as_deref(), Some("spec"));
        assert_eq!(lookup_tag(tag, "xml"), None);
    }

    #[test]
    fn handles_empty_and_escaped_values() {
        assert_eq!(lookup_tag(r#"json:",inline""#, "json").as_deref(), Some(",inline"));
        assert_eq!(lookup_tag(r#"json:"a\"b""#, "json").as_deref(), Some("a\"b"));
        assert_eq!(lookup_tag("", "json"), None);
    }

    #[test]
    fn malformed_tag_yields_none() {
        assert_eq!(lookup_tag("json", "json"), None);
        assert_eq!(lookup_tag(r#"json:"unterminated"#, "json"), None);
    }
}
