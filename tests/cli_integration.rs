//! Integration tests for the `wl` CLI.
//!
//! Each test creates a temp workspace directory, runs `wl` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const TASKS: &str = "\
# WeekList Tasks

## Week of January 6, 2025

- [ ][o      ] Write report (id:ab12;created:2025-01-06)
  - [v][v      ] Outline (id:cd34;created:2025-01-06;parentId:ab12)
- [ ][       ] Gym (id:ef56;created:2025-01-07)
";

/// Create a workspace with a tasks file and no config
fn create_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("tasks.md"), TASKS).unwrap();
    tmp
}

fn wl(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wl"))
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .expect("failed to run wl")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn show_prints_week_grid() {
    let ws = create_workspace();
    let out = wl(ws.path(), &["show", "2025-2"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("2025-2 (week of January 6, 2025)"));
    assert!(text.contains("o . . . . . .  [ ] Write report ab12"));
    assert!(text.contains("v . . . . . .    [v] Outline cd34"));
}

#[test]
fn weeks_json() {
    let ws = create_workspace();
    let out = wl(ws.path(), &["--json", "weeks"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value[0]["week"], "2025-2");
    assert_eq!(value[0]["tasks"], 3);
    assert_eq!(value[0]["done"], 1);
}

#[test]
fn mark_cycles_status_and_rewrites_file() {
    let ws = create_workspace();
    let out = wl(ws.path(), &["mark", "ab12", "mon"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "ab12 monday: completed\n");

    let text = fs::read_to_string(ws.path().join("tasks.md")).unwrap();
    assert!(text.contains("- [ ][v      ] Write report (id:ab12;created:2025-01-06)"));
}

#[test]
fn mark_unknown_task_fails() {
    let ws = create_workspace();
    let out = wl(ws.path(), &["mark", "nope", "mon"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("task not found: nope"));
}

#[test]
fn done_toggles_checkbox() {
    let ws = create_workspace();
    let out = wl(ws.path(), &["done", "ef56"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "ef56 done\n");

    let text = fs::read_to_string(ws.path().join("tasks.md")).unwrap();
    assert!(text.contains("- [v][       ] Gym (id:ef56;created:2025-01-07)"));
}

#[test]
fn fmt_check_passes_on_canonical_file() {
    let ws = create_workspace();
    let out = wl(ws.path(), &["fmt", "--check"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
}

#[test]
fn fmt_rewrites_non_canonical_file() {
    let ws = create_workspace();
    let messy = "## Week of January 6, 2025\n- [ ][o------] Write report (id:ab12;created:2025-01-06)\n";
    fs::write(ws.path().join("tasks.md"), messy).unwrap();

    let check = wl(ws.path(), &["fmt", "--check"]);
    assert!(!check.status.success());

    let out = wl(ws.path(), &["fmt"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = fs::read_to_string(ws.path().join("tasks.md")).unwrap();
    assert_eq!(
        text,
        "# WeekList Tasks\n\n## Week of January 6, 2025\n\n- [ ][o      ] Write report (id:ab12;created:2025-01-06)\n"
    );
}

#[test]
fn share_then_open_round_trip() {
    let ws = create_workspace();
    fs::write(
        ws.path().join("weeklist.toml"),
        "[share]\nbase_url = \"https://example.test/s/\"\n",
    )
    .unwrap();

    let out = wl(ws.path(), &["share", "2025-2", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let url = value["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("https://example.test/s/"));

    let opened = wl(ws.path(), &["open", &url]);
    assert!(opened.status.success(), "stderr: {}", stderr(&opened));
    let text = stdout(&opened);
    assert!(text.contains("## Week of January 6, 2025"));
    assert!(text.contains("- [ ][o      ] Write report (id:0;"));
    assert!(text.contains("  - [v][v      ] Outline (id:1;"));
    assert!(text.contains(";parentId:0)"));
}

#[test]
fn share_week_whose_parent_lives_elsewhere() {
    let ws = create_workspace();
    let tasks = "\
# WeekList Tasks

## Week of January 6, 2025

- [ ][       ] Carry over (id:ab12;created:2025-01-06)

## Week of January 13, 2025

  - [ ][o      ] Follow up (id:cd34;created:2025-01-13;parentId:ab12)
";
    fs::write(ws.path().join("tasks.md"), tasks).unwrap();

    let out = wl(ws.path(), &["share", "2025-3", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let url = value["url"].as_str().unwrap().to_string();

    let opened = wl(ws.path(), &["open", &url]);
    assert!(opened.status.success(), "stderr: {}", stderr(&opened));
    let text = stdout(&opened);
    assert!(text.contains("- [ ][o      ] Follow up (id:0;"));
    assert!(!text.contains("parentId"));
}

#[test]
fn share_empty_week_fails() {
    let ws = create_workspace();
    let out = wl(ws.path(), &["share", "2025-20"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("no tasks in week 2025-20"));
}

#[test]
fn open_garbage_is_not_found() {
    let ws = create_workspace();
    let out = wl(ws.path(), &["open", "definitely-not-a-slug"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("share link not found"));
}
