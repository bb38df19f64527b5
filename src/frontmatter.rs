/// A frontmatter value: either a scalar string or a list of strings.
///
/// The variant is decided once at parse time (`key: value` vs. `key:` followed
/// by `  - item` lines), never inferred downstream.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Scalar(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }
}

/// Ordered field-name → value mapping from a note's frontmatter block.
///
/// Keys are free-form (they may contain spaces and non-ASCII text) and keep
/// their first-seen order through a parse/serialize round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: Vec<(String, FieldValue)>,
}

impl Frontmatter {
    /// Splits a note into its frontmatter mapping and body.
    ///
    /// The block must start at the first line with a `---` fence and be
    /// closed by another `---` line; anything else (no fence, unclosed fence)
    /// degrades to an empty mapping with the whole input as body. This never
    /// fails.
    pub fn parse(raw: &str) -> (Frontmatter, &str) {
        let Some(rest) = raw
            .strip_prefix("---\n")
            .or_else(|| raw.strip_prefix("---\r\n"))
        else {
            return (Frontmatter::default(), raw);
        };

        let mut idx = 0usize;
        let bytes = rest.as_bytes();
        while idx < bytes.len() {
            let line_end = match bytes[idx..].iter().position(|b| *b == b'\n') {
                Some(off) => idx + off + 1,
                None => bytes.len(),
            };
            let line = &rest[idx..line_end];
            if line.trim_end_matches(['\r', '\n']) == "---" {
                return (parse_fields(&rest[..idx]), &rest[line_end..]);
            }
            idx = line_end;
        }

        (Frontmatter::default(), raw)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.fields
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Replaces the value for `key` in place, or appends the key at the end.
    pub fn set(&mut self, key: &str, value: FieldValue) {
        match self.get_mut(key) {
            Some(slot) => *slot = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(FieldValue::as_list)
    }

    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_scalar)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Emits the frontmatter block, fences included.
    ///
    /// Lists always serialize as `key:` followed by one `  - item` line per
    /// element; an empty list emits just `key:` and parses back to an empty
    /// list, so round trips are stable.
    pub fn serialize(&self) -> String {
        let mut out = String::from("---\n");
        for (key, value) in &self.fields {
            match value {
                FieldValue::Scalar(v) => {
                    out.push_str(key);
                    out.push_str(": ");
                    out.push_str(v);
                    out.push('\n');
                }
                FieldValue::List(items) => {
                    out.push_str(key);
                    out.push_str(":\n");
                    for item in items {
                        out.push_str("  - ");
                        out.push_str(item);
                        out.push('\n');
                    }
                }
            }
        }
        out.push_str("---\n");
        out
    }
}

impl serde::Serialize for Frontmatter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn parse_fields(src: &str) -> Frontmatter {
    let mut fm = Frontmatter::default();
    let mut current: Option<String> = None;

    for line in src.lines() {
        if let Some(item) = parse_list_item(line) {
            let Some(key) = current.as_deref() else {
                continue;
            };
            match fm.get_mut(key) {
                Some(FieldValue::List(items)) => items.push(item.to_string()),
                // A list item under a scalar key converts the key to a list.
                Some(slot) => *slot = FieldValue::List(vec![item.to_string()]),
                None => {}
            }
            continue;
        }

        let Some((key, value)) = split_declaration(line) else {
            continue;
        };
        if value.is_empty() {
            fm.set(&key, FieldValue::List(Vec::new()));
        } else {
            fm.set(&key, FieldValue::Scalar(value));
        }
        current = Some(key);
    }

    fm
}

/// A list item is leading whitespace, `-`, whitespace, then the item text.
fn parse_list_item(line: &str) -> Option<&str> {
    let after_indent = line.trim_start();
    if after_indent.len() == line.len() {
        return None;
    }
    let rest = after_indent.strip_prefix('-')?;
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let item = rest.trim();
    (!item.is_empty()).then_some(item)
}

fn split_declaration(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}
