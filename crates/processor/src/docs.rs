//! Documentation text cleanup.

fn is_marker_line(line: &str) -> bool {
    line.trim_start().starts_with('+')
}

fn is_ignored_package_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('+')
        || trimmed
            .get(..9)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("copyright"))
}

/// Type, field or constant documentation.
///
/// Marker lines are dropped. Unless `raw` is set, lines of a paragraph are
/// joined with single spaces and paragraphs are separated by a blank line.
#[must_use]
pub fn extract_doc(text: &str, raw: bool) -> String {
    let lines = text.lines().filter(|line| !is_marker_line(line));

    if raw {
        let kept: Vec<&str> = lines.collect();
        return kept.join("\n").trim_end().to_string();
    }

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.join("\n\n")
}

/// Package documentation with marker and copyright lines removed
#[must_use]
pub fn package_doc(text: &str) -> String {
    text.lines()
        .filter(|line| !is_ignored_package_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip one pair of matching string quotes from a literal
#[must_use]
pub fn unquote(literal: &str) -> &str {
    for quote in ['"', '`'] {
        if let Some(inner) = literal
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    literal
}
