use assert_cmd::Command;
use predicates::prelude::*;

fn vv(vault: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("vv").expect("binary builds");
    cmd.arg("--vault").arg(vault);
    cmd
}

#[test]
fn append_then_show_round_trips() {
    let temp = tempfile::tempdir().expect("temp dir");

    vv(temp.path())
        .args(["append", "hello from the cli", "--date", "2025-01-05", "--tag", "cli"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created 2025-01-05"));

    vv(temp.path())
        .args(["show", "--date", "2025-01-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## 메모"))
        .stdout(predicate::str::contains("- hello from the cli *("))
        .stdout(predicate::str::contains("  - cli"));
}

#[test]
fn todos_and_toggle_work_end_to_end() {
    let temp = tempfile::tempdir().expect("temp dir");

    vv(temp.path())
        .args([
            "append",
            "wash car",
            "--date",
            "2025-01-06",
            "--section",
            "오늘할일",
            "--priority",
            "낮음",
        ])
        .assert()
        .success();

    let output = vv(temp.path())
        .args(["todos", "--date", "2025-01-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] wash car"))
        .stdout(predicate::str::contains("priority=낮음"))
        .get_output()
        .stdout
        .clone();

    let line: usize = String::from_utf8(output)
        .expect("utf-8 output")
        .split('\t')
        .next()
        .expect("line index column")
        .trim()
        .parse()
        .expect("numeric line index");

    vv(temp.path())
        .args(["toggle", &line.to_string(), "--date", "2025-01-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("toggled line {line}")));

    vv(temp.path())
        .args(["todos", "--date", "2025-01-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] wash car"));
}

#[test]
fn invalid_dates_fail_loudly() {
    let temp = tempfile::tempdir().expect("temp dir");

    vv(temp.path())
        .args(["append", "hello", "--date", "2025/01/01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn tags_report_counts() {
    let temp = tempfile::tempdir().expect("temp dir");

    vv(temp.path())
        .args(["append", "a", "--date", "2025-01-01", "--tag", "work"])
        .assert()
        .success();
    vv(temp.path())
        .args(["append", "b", "--date", "2025-01-02"])
        .assert()
        .success();

    vv(temp.path())
        .args(["tags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2\t#daily"))
        .stdout(predicate::str::contains("1\t#work"));
}
