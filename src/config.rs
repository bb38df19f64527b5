use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Subdirectory of the vault holding one `<date>.md` file per day.
    pub daily_dir: PathBuf,
    /// Folder name attachment embeds are referenced from.
    pub attachment_dir: String,
    /// Frontmatter field holding the note date.
    pub date_field: String,
    /// Tag stamped onto every newly created note, always first.
    pub baseline_tag: String,
    /// Section used when the caller does not name one.
    pub default_section: String,
    /// Section whose entries are rendered as todo checkboxes.
    pub todo_section: String,
    /// Reflection section kept last; new sections are inserted before it.
    pub anchor_section: String,
    /// Weekday names, Sunday first.
    pub day_names: [String; 7],
    /// How many recent files the tag aggregator scans.
    pub tag_scan_limit: usize,
    /// How many notes the recent listing returns.
    pub recent_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            daily_dir: PathBuf::from("10.Daily Notes"),
            attachment_dir: "99.Attachments".into(),
            date_field: "날짜".into(),
            baseline_tag: "daily".into(),
            default_section: "메모".into(),
            todo_section: "오늘할일".into(),
            anchor_section: "오늘 회고".into(),
            day_names: [
                "일요일".into(),
                "월요일".into(),
                "화요일".into(),
                "수요일".into(),
                "목요일".into(),
                "금요일".into(),
                "토요일".into(),
            ],
            tag_scan_limit: 30,
            recent_limit: 7,
        }
    }
}
