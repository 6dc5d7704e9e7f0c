//! Integration tests for the `tt` CLI.
//!
//! Each test points `tt` at a temp data directory, runs it as a subprocess,
//! and verifies stdout/stderr and/or store file contents.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `tt` against the given data directory, returning (stdout, stderr, success).
fn run_tt(data_dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_tt"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("TASK_TRACKER_DIR")
        .env_remove("TT_LOG")
        .output()
        .expect("failed to run tt");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tt` expecting success, return stdout.
fn run_tt_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tt(data_dir, args);
    if !success {
        panic!(
            "tt {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `tt` expecting failure, return stderr.
fn run_tt_err(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tt(data_dir, args);
    if success {
        panic!("tt {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

/// Create a task and return its ID
fn create(data_dir: &Path, args: &[&str]) -> String {
    let mut full = vec!["create"];
    full.extend_from_slice(args);
    let out = run_tt_ok(data_dir, &full);
    out.trim()
        .strip_prefix("Task created with ID: ")
        .unwrap_or_else(|| panic!("unexpected create output: {}", out))
        .to_string()
}

// ---------------------------------------------------------------------------
// Startup and usage
// ---------------------------------------------------------------------------

#[test]
fn test_no_command_prints_usage_and_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("data");
    let output = Command::new(env!("CARGO_BIN_EXE_tt"))
        .arg("--data-dir")
        .arg(&data)
        .output()
        .expect("failed to run tt");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("create"));
    // Nothing is initialized without a command
    assert!(!data.exists());
}

#[test]
fn test_unknown_command_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stderr = run_tt_err(tmp.path(), &["frobnicate"]);
    assert!(stderr.contains("frobnicate"));
}

#[test]
fn test_first_run_creates_stores() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("nested/data");

    run_tt_ok(&data, &["list"]);

    for name in ["active.csv", "completed.csv"] {
        let text = fs::read_to_string(data.join(name)).unwrap();
        assert_eq!(text, "id,title,state,note\r\n");
    }
}

#[test]
fn test_data_dir_from_env() {
    let tmp = tempfile::TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_tt"))
        .args(["create", "From env"])
        .env("TASK_TRACKER_DIR", tmp.path())
        .env_remove("TT_LOG")
        .output()
        .expect("failed to run tt");
    assert!(output.status.success());

    let active = fs::read_to_string(tmp.path().join("active.csv")).unwrap();
    assert!(active.contains("From env"));
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_create_and_view() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = create(tmp.path(), &["Write report"]);
    assert_eq!(id.len(), 8);

    let out = run_tt_ok(tmp.path(), &["view", &id]);
    assert!(out.contains("TASK DETAILS:"));
    assert!(out.contains(&format!("ID: {}", id)));
    assert!(out.contains("Title: Write report"));
    assert!(out.contains("State: Open"));
    assert!(out.contains("Notes: None"));
}

#[test]
fn test_create_with_note_alias() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tt_ok(tmp.path(), &["c", "Call dentist", "-n", "after 2pm"]);
    let id = out.trim().strip_prefix("Task created with ID: ").unwrap();

    let out = run_tt_ok(tmp.path(), &["view", id]);
    assert!(out.contains("Notes:\nafter 2pm"));
}

#[test]
fn test_create_blank_title_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stderr = run_tt_err(tmp.path(), &["create", "   "]);
    assert!(stderr.contains("error: title is required"));

    let active = fs::read_to_string(tmp.path().join("active.csv")).unwrap();
    assert_eq!(active, "id,title,state,note\r\n");
}

#[test]
fn test_report_scenario() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = create(tmp.path(), &["Write report"]);

    let out = run_tt_ok(tmp.path(), &["update", &id, "--title", "Write report v2"]);
    assert_eq!(out.trim(), format!("Task {} has been updated.", id));

    let out = run_tt_ok(tmp.path(), &["complete", &id]);
    assert_eq!(out.trim(), format!("Task {} has been marked as completed.", id));

    let out = run_tt_ok(tmp.path(), &["list", "--completed"]);
    assert!(out.starts_with("COMPLETED TASKS:"));
    assert!(out.contains("Write report v2"));
    assert!(out.contains("| Completed |"));
    assert_eq!(out.matches(&id).count(), 1);

    let out = run_tt_ok(tmp.path(), &["list"]);
    assert!(out.contains("ACTIVE TASKS:"));
    assert!(out.contains("No tasks found."));
}

#[test]
fn test_update_without_fields_is_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = create(tmp.path(), &["Task"]);
    run_tt_err(tmp.path(), &["update", &id]);
}

#[test]
fn test_update_note_replaces() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = create(tmp.path(), &["Task", "--note", "old note"]);

    run_tt_ok(tmp.path(), &["upd", &id, "-n", "new note"]);
    let out = run_tt_ok(tmp.path(), &["view", &id]);
    assert!(out.contains("new note"));
    assert!(!out.contains("old note"));
}

#[test]
fn test_annotate_twice() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = create(tmp.path(), &["Shopping"]);

    let out = run_tt_ok(tmp.path(), &["annotate", &id, "buy milk"]);
    assert_eq!(out.trim(), format!("Note added to task {}.", id));
    run_tt_ok(tmp.path(), &["note", &id, "buy bread"]);

    let out = run_tt_ok(tmp.path(), &["view", &id]);
    let note_lines: Vec<&str> = out
        .lines()
        .skip_while(|l| *l != "Notes:")
        .skip(1)
        .collect();
    assert_eq!(note_lines.len(), 2);
    assert!(note_lines[0].starts_with('[') && note_lines[0].ends_with("] buy milk"));
    assert!(note_lines[1].ends_with("] buy bread"));
}

#[test]
fn test_annotate_blank_text_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = create(tmp.path(), &["Task"]);
    let stderr = run_tt_err(tmp.path(), &["annotate", &id, ""]);
    assert!(stderr.contains("note content is required"));
}

#[test]
fn test_complete_twice_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = create(tmp.path(), &["Finish"]);

    run_tt_ok(tmp.path(), &["done", &id]);
    let stderr = run_tt_err(tmp.path(), &["done", &id]);
    assert!(stderr.contains(&format!("no active task found with ID: {}", id)));
}

#[test]
fn test_remove_twice_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = create(tmp.path(), &["Temporary"]);

    let out = run_tt_ok(tmp.path(), &["rm", &id]);
    assert_eq!(out.trim(), format!("Task {} has been removed.", id));

    let active_before = fs::read(tmp.path().join("active.csv")).unwrap();
    let stderr = run_tt_err(tmp.path(), &["remove", &id]);
    assert!(stderr.contains(&format!("no task found with ID: {}", id)));
    assert_eq!(fs::read(tmp.path().join("active.csv")).unwrap(), active_before);
}

#[test]
fn test_remove_completed_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = create(tmp.path(), &["Old"]);
    run_tt_ok(tmp.path(), &["complete", &id]);

    run_tt_ok(tmp.path(), &["remove", &id]);
    let completed = fs::read_to_string(tmp.path().join("completed.csv")).unwrap();
    assert_eq!(completed, "id,title,state,note\r\n");
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_list_all_shows_both_sections() {
    let tmp = tempfile::TempDir::new().unwrap();
    let open = create(tmp.path(), &["Still open"]);
    let done = create(tmp.path(), &["Finished"]);
    run_tt_ok(tmp.path(), &["complete", &done]);

    let out = run_tt_ok(tmp.path(), &["ls", "-a"]);
    let active_at = out.find("ACTIVE TASKS:").unwrap();
    let completed_at = out.find("COMPLETED TASKS:").unwrap();
    assert!(active_at < completed_at);

    let open_at = out.find(&open).unwrap();
    let done_at = out.find(&done).unwrap();
    assert!(active_at < open_at && open_at < completed_at);
    assert!(completed_at < done_at);
}

#[test]
fn test_list_truncates_long_note_but_view_does_not() {
    let tmp = tempfile::TempDir::new().unwrap();
    let note = "0123456789".repeat(5);
    let id = create(tmp.path(), &["Long", "--note", &note]);

    let out = run_tt_ok(tmp.path(), &["list"]);
    assert!(out.contains(&format!("{}...", &note[..37])));
    assert!(!out.contains(&note));

    let out = run_tt_ok(tmp.path(), &["view", &id]);
    assert!(out.contains(&note));
}

#[test]
fn test_note_width_from_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    create(tmp.path(), &["Task", "--note", "abcdefghijklmnop"]);
    fs::write(tmp.path().join("config.toml"), "[display]\nnote_width = 10\n").unwrap();

    let out = run_tt_ok(tmp.path(), &["list"]);
    assert!(out.contains("| abcdefg... |"));
}

#[test]
fn test_invalid_config_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(tmp.path()).unwrap();
    fs::write(tmp.path().join("config.toml"), "[display]\nnote_width = 2\n").unwrap();

    let stderr = run_tt_err(tmp.path(), &["list"]);
    assert!(stderr.contains("note_width"));
}

#[test]
fn test_view_missing_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stderr = run_tt_err(tmp.path(), &["view", "deadbeef"]);
    assert!(stderr.contains("no task found with ID: deadbeef"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = create(tmp.path(), &["Json task", "--note", "a\nb"]);

    let out = run_tt_ok(tmp.path(), &["list", "--all", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["store"], "active");
    assert_eq!(arr[0]["tasks"][0]["id"], id.as_str());
    assert_eq!(arr[0]["tasks"][0]["note"], "a\nb");
    assert_eq!(arr[1]["store"], "completed");
    assert_eq!(arr[1]["tasks"].as_array().unwrap().len(), 0);
}

#[test]
fn test_view_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = create(tmp.path(), &["Json task"]);
    run_tt_ok(tmp.path(), &["complete", &id]);

    let out = run_tt_ok(tmp.path(), &["view", &id, "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["store"], "completed");
    assert_eq!(parsed["state"], "completed");
    assert_eq!(parsed["title"], "Json task");
}

// ---------------------------------------------------------------------------
// Damaged stores
// ---------------------------------------------------------------------------

#[test]
fn test_corrupt_store_is_masked_for_reads_only() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tt_ok(tmp.path(), &["list"]);
    let corrupt = "id,title,state,note\r\nab12cd34,\"never closed\r\n";
    fs::write(tmp.path().join("active.csv"), corrupt).unwrap();

    let (stdout, stderr, success) = run_tt(tmp.path(), &["list"]);
    assert!(success);
    assert!(stdout.contains("No tasks found."));
    assert!(stderr.contains("unterminated quoted field"));

    let stderr = run_tt_err(tmp.path(), &["create", "New task"]);
    assert!(stderr.contains("active.csv"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("active.csv")).unwrap(),
        corrupt
    );
}

#[test]
fn test_check_clean_and_duplicated() {
    let tmp = tempfile::TempDir::new().unwrap();
    create(tmp.path(), &["Fine"]);
    let out = run_tt_ok(tmp.path(), &["check"]);
    assert!(out.contains("✓ stores are valid"));

    // Simulate a completion interrupted after the completed store was written
    fs::write(
        tmp.path().join("active.csv"),
        "id,title,state,note\r\nab12cd34,Half done,O,\r\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("completed.csv"),
        "id,title,state,note\r\nab12cd34,Half done,X,\r\n",
    )
    .unwrap();

    let out = run_tt_ok(tmp.path(), &["check"]);
    assert!(out.contains("ab12cd34 is in both the active and completed stores"));
    assert!(out.contains("✗ stores have errors"));

    // Completing again repairs it
    run_tt_ok(tmp.path(), &["complete", "ab12cd34"]);
    let out = run_tt_ok(tmp.path(), &["check", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["valid"], true);
}
