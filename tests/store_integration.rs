use vaultvoice::{AppendOutcome, AppendRequest, DailyStore, Error};

fn append_req(date: &str, content: &str) -> AppendRequest {
    AppendRequest {
        date: date.into(),
        content: content.into(),
        ..AppendRequest::default()
    }
}

#[test]
fn first_append_creates_a_templated_note() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;

    let req = AppendRequest {
        tags: vec!["x".into()],
        section: Some("메모".into()),
        ..append_req("2025-01-05", "hello")
    };
    assert_eq!(store.append(&req)?, AppendOutcome::Created);

    let doc = store.read("2025-01-05")?;
    assert_eq!(doc.frontmatter.scalar("날짜"), Some("2025-01-05"));
    assert_eq!(
        doc.frontmatter.list("tags"),
        Some(&["daily".to_string(), "x".to_string()][..])
    );

    // 2025-01-05 is a Sunday.
    assert!(doc.body.contains("# 2025-01-05 (일요일)"));
    assert!(doc.raw.contains("## 메모\n\n- hello *("));
    assert!(doc.raw.contains(")*"));
    assert!(doc.raw.contains("## 오늘 회고"));

    let memo_ix = doc.body.find("## 메모").expect("memo section");
    let anchor_ix = doc.body.find("## 오늘 회고").expect("anchor section");
    assert!(memo_ix < anchor_ix);
    Ok(())
}

#[test]
fn second_append_lands_under_the_same_section() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;

    let first = AppendRequest {
        tags: vec!["x".into()],
        ..append_req("2025-01-05", "hello")
    };
    store.append(&first)?;

    let second = AppendRequest {
        tags: vec!["x".into()],
        ..append_req("2025-01-05", "world")
    };
    let outcome = store.append(&second)?;
    assert_eq!(
        outcome,
        AppendOutcome::Updated {
            tags_added: Vec::new()
        }
    );

    let doc = store.read("2025-01-05")?;
    assert_eq!(
        doc.frontmatter.list("tags"),
        Some(&["daily".to_string(), "x".to_string()][..])
    );

    let hello_ix = doc.body.find("- hello").expect("first entry");
    let world_ix = doc.body.find("- world").expect("second entry");
    let anchor_ix = doc.body.find("## 오늘 회고").expect("anchor");
    assert!(hello_ix < world_ix);
    assert!(world_ix < anchor_ix);
    Ok(())
}

#[test]
fn new_tags_are_reported_and_merged_once() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;

    store.append(&append_req("2025-01-05", "hello"))?;
    let with_tags = AppendRequest {
        tags: vec!["daily".into(), "회의".into()],
        ..append_req("2025-01-05", "meeting notes")
    };
    let outcome = store.append(&with_tags)?;
    assert_eq!(
        outcome,
        AppendOutcome::Updated {
            tags_added: vec!["회의".into()]
        }
    );

    let doc = store.read("2025-01-05")?;
    assert_eq!(
        doc.frontmatter.list("tags"),
        Some(&["daily".to_string(), "회의".to_string()][..])
    );
    Ok(())
}

#[test]
fn todo_entries_render_checkbox_and_metadata() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;

    let req = AppendRequest {
        section: Some("오늘할일".into()),
        priority: Some("낮음".into()),
        due: Some("2025-02-01".into()),
        ..append_req("2025-01-06", "wash car")
    };
    store.append(&req)?;

    let doc = store.read("2025-01-06")?;
    assert!(
        doc.raw
            .contains("- [ ] wash car [priority::낮음] [due::2025-02-01]")
    );

    let todos = store.list_todos("2025-01-06")?;
    assert_eq!(todos.len(), 1);
    let todo = &todos[0];
    assert!(!todo.done);
    assert_eq!(todo.text, "wash car");
    assert_eq!(todo.priority.as_deref(), Some("낮음"));
    assert_eq!(todo.due.as_deref(), Some("2025-02-01"));

    let expected_ix = doc
        .raw
        .split('\n')
        .position(|l| l.starts_with("- [ ]"))
        .expect("todo line");
    assert_eq!(todo.line_index, expected_ix);
    Ok(())
}

#[test]
fn toggle_flips_and_restores_the_exact_file() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;

    let req = AppendRequest {
        section: Some("오늘할일".into()),
        ..append_req("2025-01-06", "wash car")
    };
    store.append(&req)?;

    let before = store.read("2025-01-06")?.raw;
    let line = store
        .list_todos("2025-01-06")?
        .first()
        .expect("one todo")
        .line_index;

    store.toggle_todo("2025-01-06", line)?;
    let checked = store.read("2025-01-06")?;
    assert!(checked.raw.contains("- [x] wash car"));
    assert!(store.list_todos("2025-01-06")?[0].done);

    store.toggle_todo("2025-01-06", line)?;
    assert_eq!(store.read("2025-01-06")?.raw, before);
    Ok(())
}

#[test]
fn toggle_rejects_bad_targets() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;

    store.append(&append_req("2025-01-06", "plain entry"))?;

    assert!(matches!(
        store.toggle_todo("2025-01-06", 9999),
        Err(Error::InvalidLineIndex { .. })
    ));
    assert!(matches!(
        store.toggle_todo("2025-01-06", 0),
        Err(Error::NotATodoLine { index: 0 })
    ));
    assert!(matches!(
        store.toggle_todo("2025-01-07", 0),
        Err(Error::NotFound(_))
    ));
    Ok(())
}

#[test]
fn invalid_date_is_rejected_without_writing() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;

    let result = store.append(&append_req("2025/01/01", "hello"));
    assert!(matches!(result, Err(Error::InvalidDate(_))));
    assert!(!store.daily_dir().exists());

    assert!(matches!(
        store.read("01-05-2025"),
        Err(Error::InvalidDate(_))
    ));
    Ok(())
}

#[test]
fn empty_content_requires_attachments() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;

    let empty = append_req("2025-01-05", "   ");
    assert!(matches!(store.append(&empty), Err(Error::EmptyContent)));

    let with_attachment = AppendRequest {
        attachments: vec!["photo.png".into()],
        ..append_req("2025-01-05", "")
    };
    store.append(&with_attachment)?;

    let doc = store.read("2025-01-05")?;
    assert!(doc.raw.contains("  - ![[99.Attachments/photo.png]]"));
    Ok(())
}

#[test]
fn attachments_nest_under_their_entry() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;

    let req = AppendRequest {
        attachments: vec!["cat.png".into(), "memo.m4a".into()],
        ..append_req("2025-01-05", "photo dump")
    };
    store.append(&req)?;

    let doc = store.read("2025-01-05")?;
    let entry_ix = doc.raw.find("- photo dump *(").expect("entry line");
    let first = doc
        .raw
        .find("  - ![[99.Attachments/cat.png]]")
        .expect("first attachment");
    let second = doc
        .raw
        .find("  - ![[99.Attachments/memo.m4a]]")
        .expect("second attachment");
    assert!(entry_ix < first);
    assert!(first < second);
    Ok(())
}

#[test]
fn unknown_section_is_inserted_before_the_reflection_section() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;

    store.append(&append_req("2025-01-05", "hello"))?;
    let req = AppendRequest {
        section: Some("운동".into()),
        ..append_req("2025-01-05", "squats")
    };
    store.append(&req)?;

    let doc = store.read("2025-01-05")?;
    let memo_ix = doc.body.find("## 메모").expect("memo");
    let new_ix = doc.body.find("## 운동").expect("new section");
    let anchor_ix = doc.body.find("## 오늘 회고").expect("anchor");
    assert!(memo_ix < new_ix);
    assert!(new_ix < anchor_ix);
    assert!(doc.body.contains("- squats"));
    Ok(())
}

#[test]
fn appending_into_the_anchor_section_keeps_it_last() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;

    let req = AppendRequest {
        section: Some("오늘 회고".into()),
        ..append_req("2025-01-05", "good day")
    };
    assert_eq!(store.append(&req)?, AppendOutcome::Created);

    let doc = store.read("2025-01-05")?;
    assert!(doc.raw.contains("## 오늘 회고\n\n- good day *("));
    // The anchor is the only section; it is not duplicated.
    assert_eq!(doc.raw.matches("## 오늘 회고").count(), 1);
    Ok(())
}

#[test]
fn missing_note_reads_as_not_found() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let store = DailyStore::open(temp.path())?;
    assert!(matches!(
        store.read("2025-01-05"),
        Err(Error::NotFound(_))
    ));
    Ok(())
}
