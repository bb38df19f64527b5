/// A `## ` section located in a note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SectionSpan<'a> {
    pub name: &'a str,
    /// Byte offset of the header line's first byte.
    pub start: usize,
    /// Byte offset one past the section's last byte: the start of the next
    /// header line, or the end of the body.
    pub end: usize,
}

/// Scans the body line by line for `## ` headers.
///
/// Headers are whole lines; a `## name` occurring mid-line or a section whose
/// name merely contains another's as a substring never matches.
pub(crate) fn section_spans(body: &str) -> Vec<SectionSpan<'_>> {
    let mut spans: Vec<SectionSpan<'_>> = Vec::new();
    let mut offset = 0usize;

    for line in body.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if let Some(name) = trimmed.strip_prefix("## ") {
            if let Some(prev) = spans.last_mut() {
                prev.end = offset;
            }
            spans.push(SectionSpan {
                name,
                start: offset,
                end: body.len(),
            });
        }
        offset += line.len();
    }

    spans
}

/// Inserts `entry` as the last item of the named section, creating the
/// section when absent.
///
/// A missing section is created immediately before `anchor` so the anchor
/// section stays visually last; if the anchor is missing too, the new section
/// goes at the end of the body. Section names match exactly, untrimmed, so
/// asking for the anchor itself appends into it like any other section.
pub fn merge_section(body: &str, section: &str, entry: &str, anchor: &str) -> String {
    let spans = section_spans(body);

    if let Some(ix) = spans.iter().position(|s| s.name == section) {
        let span = &spans[ix];
        if ix + 1 < spans.len() {
            let before = &body[..span.end];
            let after = &body[span.end..];
            return format!("{}\n{entry}\n\n{}", before.trim_end(), after.trim_start());
        }
        return format!("{}\n{entry}\n\n", body.trim_end());
    }

    if let Some(anchor_span) = spans.iter().find(|s| s.name == anchor) {
        let before = &body[..anchor_span.start];
        let after = &body[anchor_span.start..];
        return format!("{}\n\n## {section}\n\n{entry}\n\n{after}", before.trim_end());
    }

    format!("{}\n\n## {section}\n\n{entry}\n\n", body.trim_end())
}
