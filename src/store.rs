use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::frontmatter::{FieldValue, Frontmatter};
use crate::section::merge_section;
use crate::todo::{self, TodoEntry};
use crate::{Error, Result, StoreConfig, tags};

/// One parsed daily note.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NoteDocument {
    pub date: String,
    pub frontmatter: Frontmatter,
    pub body: String,
    pub raw: String,
}

/// Everything a single append carries.
#[derive(Debug, Clone, Default)]
pub struct AppendRequest {
    pub date: String,
    pub content: String,
    pub tags: Vec<String>,
    /// Target section; the configured default when not set.
    pub section: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    /// Already-uploaded attachment filenames to embed under the entry.
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    Created,
    Updated { tags_added: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RecentNote {
    pub date: String,
    pub tags: Vec<String>,
    pub preview: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Health {
    pub vault: bool,
    pub daily_dir: bool,
}

/// Read-modify-write store over one markdown file per date.
///
/// Every mutation is a whole-file read followed by a whole-file write with no
/// locking: two concurrent appends to the same date race and the last writer
/// wins. Acceptable for the single-user setup this serves.
#[derive(Debug, Clone)]
pub struct DailyStore {
    root: PathBuf,
    cfg: StoreConfig,
}

impl DailyStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(root, StoreConfig::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, cfg: StoreConfig) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(Error::VaultNotFound(root));
        }
        Ok(Self { root, cfg })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    pub fn daily_dir(&self) -> PathBuf {
        self.root.join(&self.cfg.daily_dir)
    }

    pub fn note_path(&self, date: &str) -> PathBuf {
        self.daily_dir().join(format!("{date}.md"))
    }

    pub fn health(&self) -> Health {
        Health {
            vault: self.root.exists(),
            daily_dir: self.daily_dir().exists(),
        }
    }

    /// Weekday name for a date, from the configured Sunday-first table.
    pub fn day_name(&self, date: NaiveDate) -> &str {
        &self.cfg.day_names[date.weekday().num_days_from_sunday() as usize]
    }

    pub fn read(&self, date: &str) -> Result<NoteDocument> {
        validate_date(date)?;
        let path = self.note_path(date);
        let raw = read_note_file(&path, date)?;
        let (fm, body) = Frontmatter::parse(&raw);
        Ok(NoteDocument {
            date: date.to_string(),
            frontmatter: fm,
            body: body.to_string(),
            raw,
        })
    }

    /// Appends one entry, creating the day's note when needed.
    pub fn append(&self, req: &AppendRequest) -> Result<AppendOutcome> {
        let date = validate_date(&req.date)?;
        let text = req.content.trim();
        if text.is_empty() && req.attachments.is_empty() {
            return Err(Error::EmptyContent);
        }

        let section = req.section.as_deref().unwrap_or(&self.cfg.default_section);
        let entry = self.build_entry(section, text, req);

        let dir = self.daily_dir();
        std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        let path = self.note_path(&req.date);
        if path.exists() {
            self.append_existing(&path, section, &entry, &req.tags)
        } else {
            self.create_note(&path, &req.date, date, section, &entry, &req.tags)
        }
    }

    /// Flips the checkbox on the 0-based `line_index` of the date's file.
    pub fn toggle_todo(&self, date: &str, line_index: usize) -> Result<usize> {
        validate_date(date)?;
        let path = self.note_path(date);
        let raw = read_note_file(&path, date)?;

        let mut lines: Vec<&str> = raw.split('\n').collect();
        if line_index >= lines.len() {
            return Err(Error::InvalidLineIndex {
                index: line_index,
                line_count: lines.len(),
            });
        }
        let toggled =
            todo::toggle_line(lines[line_index]).ok_or(Error::NotATodoLine { index: line_index })?;
        lines[line_index] = &toggled;

        let content = lines.join("\n");
        std::fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
        Ok(line_index)
    }

    /// Every checkbox line in the date's file, metadata extracted and stripped.
    pub fn list_todos(&self, date: &str) -> Result<Vec<TodoEntry>> {
        validate_date(date)?;
        let path = self.note_path(date);
        let raw = read_note_file(&path, date)?;
        Ok(raw
            .split('\n')
            .enumerate()
            .filter_map(|(ix, line)| todo::parse_line(ix, line))
            .collect())
    }

    /// Frontmatter tag frequencies over the most recent daily files.
    pub fn tag_counts(&self) -> Result<Vec<TagCount>> {
        let dir = self.daily_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = self.md_files(&dir)?;
        files.reverse();
        files.truncate(self.cfg.tag_scan_limit);

        let mut counts: HashMap<String, usize> = HashMap::new();
        for path in files {
            let raw = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            let (fm, _) = Frontmatter::parse(&raw);
            if let Some(tags) = fm.list("tags") {
                for tag in tags {
                    *counts.entry(tag.clone()).or_default() += 1;
                }
            }
        }

        let mut rows: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        Ok(rows)
    }

    /// The most recent notes with their tags and a short body preview.
    pub fn recent_notes(&self) -> Result<Vec<RecentNote>> {
        let dir = self.daily_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut dated: Vec<(String, PathBuf)> = self
            .md_files(&dir)?
            .into_iter()
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?;
                is_date_shaped(stem).then(|| (stem.to_string(), path.clone()))
            })
            .collect();
        dated.reverse();
        dated.truncate(self.cfg.recent_limit);

        let mut notes = Vec::with_capacity(dated.len());
        for (date, path) in dated {
            let raw = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            let (fm, body) = Frontmatter::parse(&raw);
            notes.push(RecentNote {
                date,
                tags: fm.list("tags").unwrap_or_default().to_vec(),
                preview: preview(body),
            });
        }
        Ok(notes)
    }

    fn build_entry(&self, section: &str, text: &str, req: &AppendRequest) -> String {
        let mut entry = if section == self.cfg.todo_section {
            todo::render_line(text, req.priority.as_deref(), req.due.as_deref())
        } else if text.is_empty() {
            format!("- *({})*", timestamp())
        } else {
            format!("- {text} *({})*", timestamp())
        };
        for name in &req.attachments {
            entry.push_str(&format!("\n  - ![[{}/{name}]]", self.cfg.attachment_dir));
        }
        entry
    }

    fn create_note(
        &self,
        path: &Path,
        date_str: &str,
        date: NaiveDate,
        section: &str,
        entry: &str,
        new_tags: &[String],
    ) -> Result<AppendOutcome> {
        let mut fm = Frontmatter::default();
        fm.set(
            &self.cfg.date_field,
            FieldValue::Scalar(date_str.to_string()),
        );
        fm.set(
            "tags",
            FieldValue::List(tags::initial_tags(&self.cfg.baseline_tag, new_tags)),
        );

        let anchor = self.cfg.anchor_section.as_str();
        let mut body = format!("\n# {date_str} ({})\n\n", self.day_name(date));
        if section != anchor {
            body.push_str(&format!("## {section}\n\n{entry}\n\n"));
            body.push_str(&format!("## {anchor}\n\n"));
        } else {
            body.push_str(&format!("## {anchor}\n\n{entry}\n\n"));
        }

        let content = format!("{}{}", fm.serialize(), body);
        std::fs::write(path, content).map_err(|e| Error::io(path, e))?;
        Ok(AppendOutcome::Created)
    }

    fn append_existing(
        &self,
        path: &Path,
        section: &str,
        entry: &str,
        new_tags: &[String],
    ) -> Result<AppendOutcome> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let (mut fm, body) = Frontmatter::parse(&raw);

        let existing = fm.list("tags").unwrap_or_default().to_vec();
        let merged = tags::merge_tags(&existing, new_tags);
        fm.set("tags", FieldValue::List(merged.tags));

        let new_body = merge_section(body, section, entry, &self.cfg.anchor_section);
        let content = format!("{}{}", fm.serialize(), new_body);
        std::fs::write(path, content).map_err(|e| Error::io(path, e))?;
        Ok(AppendOutcome::Updated {
            tags_added: merged.added,
        })
    }

    /// Daily-dir markdown files, name-sorted ascending.
    fn md_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(dir)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            if path.extension().and_then(|s| s.to_str()) == Some("md") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn read_note_file(path: &Path, date: &str) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(raw),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::NotFound(date.to_string()))
        }
        Err(e) => Err(Error::io(path, e)),
    }
}

fn date_shape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern"))
}

fn is_date_shaped(s: &str) -> bool {
    date_shape_re().is_match(s)
}

/// Requires the strict `YYYY-MM-DD` shape and a real calendar date.
fn validate_date(date: &str) -> Result<NaiveDate> {
    if !is_date_shaped(date) {
        return Err(Error::InvalidDate(date.to_string()));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| Error::InvalidDate(date.to_string()))
}

fn timestamp() -> String {
    Local::now().format("%H:%M").to_string()
}

/// First three non-empty body lines, capped at 120 characters.
fn preview(body: &str) -> String {
    body.lines()
        .filter(|l| !l.trim().is_empty())
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(120)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_validation_requires_strict_shape() {
        assert!(validate_date("2025-01-05").is_ok());
        assert!(matches!(
            validate_date("2025/01/05"),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            validate_date("2025-1-5"),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            validate_date("2025-13-40"),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn preview_takes_three_lines_and_caps_length() {
        let body = "\n# head\n\nfirst\n\nsecond\nthird\nfourth\n";
        assert_eq!(preview(body), "# head first second");

        let long = "가".repeat(200);
        assert_eq!(preview(&long).chars().count(), 120);
    }
}
