//! End-to-end runs of the `tabkeep` binary against temporary files.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Value, json};
use tempfile::TempDir;

struct Workspace {
	dir: TempDir,
}

impl Workspace {
	fn new(tabs: Value) -> Self {
		let dir = TempDir::new().unwrap();
		std::fs::write(dir.path().join("tabs.json"), tabs.to_string()).unwrap();
		Self { dir }
	}

	fn store(&self) -> PathBuf {
		self.dir.path().join("storage.json")
	}

	fn tabs(&self) -> PathBuf {
		self.dir.path().join("tabs.json")
	}

	fn run(&self, args: &[&str]) -> (bool, Value, String) {
		let output = Command::new(env!("CARGO_BIN_EXE_tabkeep"))
			.args(args)
			.arg("--store")
			.arg(self.store())
			.arg("--tabs")
			.arg(self.tabs())
			.env_remove("RUST_LOG")
			.output()
			.expect("failed to execute tabkeep");

		let stdout = String::from_utf8_lossy(&output.stdout);
		let stderr = String::from_utf8_lossy(&output.stderr).to_string();
		let json = serde_json::from_str(&stdout).unwrap_or(Value::Null);
		(output.status.success(), json, stderr)
	}

	fn write_tabs(&self, tabs: Value) {
		std::fs::write(self.tabs(), tabs.to_string()).unwrap();
	}
}

fn read_json(path: &Path) -> Value {
	serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn browser() -> Value {
	json!({
		"focusedWindowId": 1,
		"tabs": [
			{"id": 10, "windowId": 1, "index": 0, "url": "https://a.test", "title": "A"},
			{"id": 11, "windowId": 1, "index": 1, "url": "https://b.test", "title": "B", "active": true},
			{"id": 12, "windowId": 1, "index": 2, "url": "https://c.test", "title": "C"}
		]
	})
}

#[test]
fn add_then_list() {
	let ws = Workspace::new(browser());

	let (ok, response, stderr) = ws.run(&["send", r#"{"type":"ADD_CURRENT_TAB"}"#]);
	assert!(ok, "stderr: {stderr}");
	assert_eq!(response, json!({"ok": true}));

	let (ok, response, _) = ws.run(&["list"]);
	assert!(ok);
	let saved = response["saved"].as_array().unwrap();
	assert_eq!(saved.len(), 1);
	assert_eq!(saved[0]["tabId"], 11);
	assert_eq!(saved[0]["title"], "B");
	assert_eq!(saved[0]["autoRepointed"], false);
}

#[test]
fn closing_saved_tab_repoints_to_successor() {
	let ws = Workspace::new(browser());
	ws.run(&["send", r#"{"type":"ADD_CURRENT_TAB"}"#]);

	ws.write_tabs(json!({
		"focusedWindowId": 1,
		"tabs": [
			{"id": 10, "windowId": 1, "index": 0, "url": "https://a.test", "title": "A"},
			{"id": 12, "windowId": 1, "index": 1, "url": "https://c.test", "title": "C", "active": true}
		]
	}));
	let (ok, response, _) = ws.run(&["event", r#"{"event":"removed","tabId":11,"windowId":1}"#]);
	assert!(ok);
	assert_eq!(response, json!({"written": true}));

	let stored = read_json(&ws.store());
	assert_eq!(stored["savedTabs"][0]["tabId"], 12);
	assert_eq!(stored["savedTabs"][0]["autoRepointed"], true);

	let (_, response, _) = ws.run(&["send", r#"{"type":"CLEAR_REPOINTED_FLAG","tabId":12}"#]);
	assert_eq!(response, json!({"ok": true}));
	assert_eq!(read_json(&ws.store())["savedTabs"][0]["autoRepointed"], false);
}

#[test]
fn hydrated_list_does_not_touch_store() {
	let ws = Workspace::new(browser());
	ws.run(&["send", r#"{"type":"ADD_CURRENT_TAB"}"#]);
	let before = std::fs::read_to_string(ws.store()).unwrap();

	let mut tabs = browser();
	tabs["tabs"][1]["title"] = json!("B renamed");
	ws.write_tabs(tabs);

	let (ok, response, _) = ws.run(&["list", "--hydrated"]);
	assert!(ok);
	assert_eq!(response["saved"][0]["title"], "B renamed");
	assert_eq!(std::fs::read_to_string(ws.store()).unwrap(), before);
}

#[test]
fn focus_tab_updates_snapshot() {
	let ws = Workspace::new(browser());

	let (ok, response, _) = ws.run(&["send", r#"{"type":"FOCUS_TAB","tabId":12,"windowId":1}"#]);
	assert!(ok);
	assert_eq!(response, json!({"ok": true}));

	let tabs = read_json(&ws.tabs());
	assert_eq!(tabs["tabs"][2]["active"], true);
	assert!(tabs["tabs"][1].get("active").is_none());
}

#[test]
fn invalid_message_fails() {
	let ws = Workspace::new(browser());

	let (ok, _, stderr) = ws.run(&["send", r#"{"type":"PING"}"#]);
	assert!(!ok);
	assert!(stderr.contains("invalid message"), "stderr: {stderr}");
}
