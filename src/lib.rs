mod config;
mod error;
mod frontmatter;
mod section;
mod store;
mod tags;
mod todo;

pub use crate::config::StoreConfig;
pub use crate::error::{Error, Result};
pub use crate::frontmatter::{FieldValue, Frontmatter};
pub use crate::section::merge_section;
pub use crate::store::{
    AppendOutcome, AppendRequest, DailyStore, Health, NoteDocument, RecentNote, TagCount,
};
pub use crate::tags::{TagMerge, initial_tags, merge_tags};
pub use crate::todo::TodoEntry;
