//! Integration tests for the `twd` CLI.
//!
//! Each test creates a temp workspace with a fake backend script wired in
//! through `.twdrc`, runs `twd` as a subprocess, and checks its output and
//! exit status.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

const EXPORT: &str = r#"[
  {"id":1,"status":"pending","description":"Buy milk","priority":"L","tags":["home"]},
  {"id":2,"status":"completed","description":"Fix bug: patch the thing","priority":"H"},
  {"id":3,"status":"pending","description":"Call mom","priority":"H"}
]"#;

/// Stands in for the task backend: exports `$TASKDATA/export.json`, fails on
/// `fail`, acknowledges `add`, and prints a report for anything else.
const FAKE_BACKEND: &str = r#"#!/bin/sh
last=""
for a in "$@"; do last="$a"; done
if [ "$last" = "export" ]; then
  cat "$TASKDATA/export.json"
  exit 0
fi
case "$1" in
  fail) echo "boom: no such thing" >&2; exit 7 ;;
  add) echo "Created task 3." ; exit 0 ;;
  *) echo "ID Description"; exit 0 ;;
esac
"#;

struct Workspace {
    tmp: TempDir,
}

impl Workspace {
    /// A project directory with `.task/export.json`, a fake backend and
    /// an empty HOME.
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace { tmp };
        fs::create_dir_all(ws.home()).unwrap();
        fs::create_dir_all(ws.project().join(".task")).unwrap();
        fs::write(ws.project().join(".task/export.json"), EXPORT).unwrap();

        let backend = ws.tmp.path().join("fake-task");
        fs::write(&backend, FAKE_BACKEND).unwrap();
        fs::set_permissions(&backend, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(
            ws.project().join(".twdrc"),
            format!("backend.program = {}\n", backend.display()),
        )
        .unwrap();
        ws
    }

    fn home(&self) -> PathBuf {
        self.tmp.path().join("home")
    }

    fn project(&self) -> PathBuf {
        self.tmp.path().join("project")
    }

    fn run_in(&self, dir: &Path, args: &[&str]) -> (String, String, Option<i32>) {
        let output = Command::new(env!("CARGO_BIN_EXE_twd"))
            .args(args)
            .current_dir(dir)
            .env("HOME", self.home())
            .env_remove("TASKDATA")
            .env_remove("TWD_LOG")
            .env("NO_COLOR", "1")
            .output()
            .expect("failed to run twd");
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        (stdout, stderr, output.status.code())
    }

    fn run(&self, args: &[&str]) -> (String, String, Option<i32>) {
        self.run_in(&self.project(), args)
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        if code != Some(0) {
            panic!("twd {:?} failed ({:?}):\nstdout: {}\nstderr: {}", args, code, stdout, stderr);
        }
        stdout
    }
}

#[test]
fn test_pending_section_before_completed() {
    let ws = Workspace::new();
    let out = ws.run_ok(&["-c", "vertical", "-s", "id,description", "-w", "60"]);
    assert_eq!(
        out,
        "╭PENDING──────╮\n\
         │  1 Buy milk │\n\
         │  3 Call mom │\n\
         ╰─────────────╯\n\
         ╭COMPLETED────────────────────╮\n\
         │  2 Fix bug: patch the thing │\n\
         ╰─────────────────────────────╯\n"
    );
}

#[test]
fn test_default_layout_is_horizontal() {
    let ws = Workspace::new();
    let out = ws.run_ok(&["-w", "80"]);
    let first = out.lines().next().unwrap();
    assert!(first.starts_with("╭PENDING"), "{out}");
    assert!(first.contains("╭COMPLETED"), "{out}");
    assert!(out.contains("home"));
}

#[test]
fn test_mutating_command_echoed_and_marked() {
    let ws = Workspace::new();
    let out = ws.run_ok(&["-c", "vertical", "-s", "id,description", "add", "Call", "mom"]);
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("Created task 3."));
    assert!(out.contains("│ ▶ 3 Call mom │"), "{out}");
}

#[test]
fn test_report_output_not_echoed() {
    let ws = Workspace::new();
    let out = ws.run_ok(&["-c", "vertical", "list"]);
    assert!(!out.contains("ID Description"), "{out}");
    assert!(out.starts_with("╭PENDING"), "{out}");
}

#[test]
fn test_unknown_fields_exit_4() {
    let ws = Workspace::new();
    let (stdout, stderr, code) = ws.run(&["-s", "id,colour,descrption"]);
    assert_eq!(code, Some(4));
    assert!(stdout.is_empty());
    assert!(stderr.contains("colour, descrption"), "{stderr}");
}

#[test]
fn test_unknown_fields_rejected_before_command_runs() {
    let ws = Workspace::new();
    let (stdout, stderr, code) = ws.run(&["-s", "id,colour", "add", "Call", "mom"]);
    assert_eq!(code, Some(4));
    assert!(!stdout.contains("Created task"), "{stdout}");
    assert!(stderr.contains("colour"), "{stderr}");
}

#[test]
fn test_declared_uda_accepted_with_command() {
    let ws = Workspace::new();
    let rc = ws.project().join(".twdrc");
    let mut text = fs::read_to_string(&rc).unwrap();
    text.push_str("uda.size.type = string\n");
    fs::write(&rc, text).unwrap();
    let out = ws.run_ok(&["-s", "id,size", "add", "x"]);
    assert!(out.starts_with("Created task 3."), "{out}");
}

#[test]
fn test_unreadable_data_dir_exit_5() {
    let ws = Workspace::new();
    let file = ws.tmp.path().join("not-a-dir");
    fs::write(&file, "").unwrap();
    let (_, stderr, code) = ws.run(&["-d", file.to_str().unwrap()]);
    assert_eq!(code, Some(5));
    assert!(stderr.contains("not a directory"), "{stderr}");
}

#[test]
fn test_backend_failure_exit_code() {
    let ws = Workspace::new();
    let (_, stderr, code) = ws.run(&["fail"]);
    assert_eq!(code, Some(7));
    assert!(stderr.contains("boom: no such thing"), "{stderr}");
}

#[test]
fn test_no_data_location_exit_2() {
    let ws = Workspace::new();
    let elsewhere = ws.tmp.path().join("elsewhere");
    fs::create_dir_all(&elsewhere).unwrap();
    let (_, stderr, code) = ws.run_in(&elsewhere, &[]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("no task data found"), "{stderr}");
}

#[test]
fn test_explicit_data_dir_initialized() {
    let ws = Workspace::new();
    let fresh = ws.tmp.path().join("fresh");
    let (stdout, _, code) = ws.run(&["-d", fresh.to_str().unwrap()]);
    assert_eq!(code, Some(0));
    assert!(fresh.is_dir());
    assert!(stdout.is_empty(), "{stdout}");
}

#[test]
fn test_group_by_priority_with_sort() {
    let ws = Workspace::new();
    let out = ws.run_ok(&["-c", "vertical", "-g", "priority", "-s", "id", "--sort", "id", "--reverse"]);
    let h = out.find("╭H").unwrap();
    let l = out.find("╭L").unwrap();
    assert!(h < l, "{out}");
    let three = out.find(" 3 ").unwrap();
    let two = out.find(" 2 ").unwrap();
    assert!(three < two, "{out}");
}

#[test]
fn test_card_layout() {
    let ws = Workspace::new();
    let out = ws.run_ok(&["-t", "card", "-k", "vertical", "-c", "vertical", "-s", "id,description,tags"]);
    assert!(out.contains("╭1:Buy milk"), "{out}");
    assert!(out.contains("[home]"), "{out}");
    assert!(out.contains("╭2:Fix bug"), "{out}");
}

#[test]
fn test_layout_from_config_file() {
    let ws = Workspace::new();
    let rc = ws.project().join(".twdrc");
    let mut text = fs::read_to_string(&rc).unwrap();
    text.push_str("layout.sections = vertical\nlayout.show = id\nlayout.sections.order = completed\n");
    fs::write(&rc, text).unwrap();
    let out = ws.run_ok(&[]);
    assert!(out.starts_with("╭COMPLETED"), "{out}");
    assert!(!out.contains("PENDING"), "{out}");
}

#[test]
fn test_csv_source() {
    let ws = Workspace::new();
    let csv = ws.tmp.path().join("tasks.csv");
    fs::write(
        &csv,
        "id,status,description,tags\n1,pending,Buy milk,home\n2,completed,Fix bug,\n",
    )
    .unwrap();
    let out = ws.run_ok(&["--csv", csv.to_str().unwrap(), "-c", "vertical"]);
    assert!(out.contains("1 Buy milk home"), "{out}");
    assert!(out.find("PENDING").unwrap() < out.find("COMPLETED").unwrap());
}

#[test]
fn test_missing_csv_initialized() {
    let ws = Workspace::new();
    let csv = ws.tmp.path().join("new.csv");
    let (stdout, _, code) = ws.run(&["--csv", csv.to_str().unwrap()]);
    assert_eq!(code, Some(0));
    assert!(stdout.is_empty(), "{stdout}");
    assert_eq!(fs::read_to_string(&csv).unwrap(), "id,status,description,tags\n");
}

#[test]
fn test_unknown_theme_fails() {
    let ws = Workspace::new();
    let (_, stderr, code) = ws.run(&["-T", "solarized"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("nojhan"), "{stderr}");
}
