/// Result of reconciling a note's tags with caller-supplied ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMerge {
    /// Union of both sets: existing order first, then new tags as given.
    pub tags: Vec<String>,
    /// Caller-supplied tags that were not present before the merge.
    pub added: Vec<String>,
}

/// Merges `new` into `existing`, deduplicating by exact string equality.
pub fn merge_tags(existing: &[String], new: &[String]) -> TagMerge {
    let mut tags: Vec<String> = Vec::with_capacity(existing.len() + new.len());
    for tag in existing {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }

    let mut added = Vec::new();
    for tag in new {
        if !tags.contains(tag) {
            tags.push(tag.clone());
            added.push(tag.clone());
        }
    }

    TagMerge { tags, added }
}

/// Tag set for a brand-new note: the baseline tag first, then the rest.
pub fn initial_tags(baseline: &str, new: &[String]) -> Vec<String> {
    let mut tags = vec![baseline.to_string()];
    for tag in new {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}
