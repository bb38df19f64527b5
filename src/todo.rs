use std::sync::OnceLock;

use regex::Regex;

pub(crate) const UNCHECKED: &str = "- [ ] ";
pub(crate) const CHECKED: &str = "- [x] ";

/// A todo line as reported to callers: checkbox state, display text with the
/// inline metadata tokens stripped, and the extracted metadata values.
///
/// `line_index` is the 0-based position within the file. It is not stable
/// across concurrent edits; there is no locking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TodoEntry {
    pub line_index: usize,
    pub done: bool,
    pub text: String,
    pub priority: Option<String>,
    pub due: Option<String>,
}

fn metadata_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[(priority|due)::([^\[\]]*)\]").expect("metadata token pattern")
    })
}

/// Recognizes a checkbox line and extracts its inline metadata.
///
/// Only lines starting with the exact `- [ ] ` / `- [x] ` prefixes match;
/// indentation or a capital `X` do not count.
pub(crate) fn parse_line(line_index: usize, line: &str) -> Option<TodoEntry> {
    let (done, rest) = if let Some(rest) = line.strip_prefix(UNCHECKED) {
        (false, rest)
    } else if let Some(rest) = line.strip_prefix(CHECKED) {
        (true, rest)
    } else {
        return None;
    };

    let mut priority = None;
    let mut due = None;
    for caps in metadata_re().captures_iter(rest) {
        let value = caps[2].trim();
        if value.is_empty() {
            continue;
        }
        match &caps[1] {
            "priority" if priority.is_none() => priority = Some(value.to_string()),
            "due" if due.is_none() => due = Some(value.to_string()),
            _ => {}
        }
    }

    let stripped = metadata_re().replace_all(rest, "");
    let text = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    Some(TodoEntry {
        line_index,
        done,
        text,
        priority,
        due,
    })
}

/// Flips the checkbox prefix, leaving the rest of the line untouched.
pub(crate) fn toggle_line(line: &str) -> Option<String> {
    if let Some(rest) = line.strip_prefix(UNCHECKED) {
        Some(format!("{CHECKED}{rest}"))
    } else if let Some(rest) = line.strip_prefix(CHECKED) {
        Some(format!("{UNCHECKED}{rest}"))
    } else {
        None
    }
}

/// Builds an unchecked todo line with optional metadata tokens.
pub(crate) fn render_line(text: &str, priority: Option<&str>, due: Option<&str>) -> String {
    let mut line = String::from(UNCHECKED);
    line.push_str(text);
    for (key, value) in [("priority", priority), ("due", due)] {
        let Some(value) = value else { continue };
        if !line.ends_with(' ') {
            line.push(' ');
        }
        line.push_str(&format!("[{key}::{value}]"));
    }
    line
}
