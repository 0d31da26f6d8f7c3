use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn shotarc_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("shotarc");
    path
}

const MANIFEST: &str = r#"{
  "a1": {"url": "http://host/march.png", "date": "2022-03-01 09:30:00", "name": "march.png"},
  "b2": {"url": "http://host/july.png", "date": "2022-07-01 18:00:00", "name": "july.png"},
  "c3": {"url": "http://host/2023/01/shot.png", "date": "2023-01-15 10:00:00", "name": "shot.png"}
}"#;

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("archive");

    for subdir in ["2022-03", "2022-07", "2023-01"] {
        fs::create_dir_all(root.join(subdir)).unwrap();
    }
    fs::write(root.join("2022-03").join("march.png"), b"march-bytes").unwrap();
    fs::write(root.join("2022-07").join("july.png"), b"july-bytes").unwrap();
    fs::write(root.join("2023-01").join("shot.png"), b"january-bytes").unwrap();

    fs::write(root.join("index.json"), MANIFEST).unwrap();

    let config_dir = tmp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[archive]
root = "{}"

[server]
bind = "127.0.0.1:7878"
"#,
        root.display()
    );

    let config_path = config_dir.join("archive.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_shotarc(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = shotarc_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run shotarc binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn lines(stdout: &str) -> Vec<String> {
    stdout.lines().map(|l| l.to_string()).collect()
}

#[test]
fn test_years_lists_distinct_years() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_shotarc(&config_path, &["years"]);
    assert!(success, "years failed: stderr={}", stderr);
    assert_eq!(lines(&stdout), vec!["2022", "2023"]);
}

#[test]
fn test_months_for_year() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_shotarc(&config_path, &["months", "2022"]);
    assert!(success);
    assert_eq!(lines(&stdout), vec!["3", "7"]);
}

#[test]
fn test_months_for_unknown_year_is_empty() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_shotarc(&config_path, &["months", "1999"]);
    assert!(success, "Unknown year should not be an error");
    assert!(stdout.trim().is_empty(), "Expected no output, got: {}", stdout);
}

#[test]
fn test_paths_for_year_and_month() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_shotarc(&config_path, &["paths", "2022", "3"]);
    assert!(success);
    assert_eq!(lines(&stdout), vec!["march.png"]);

    let (stdout, _, success) = run_shotarc(&config_path, &["paths", "2022", "1"]);
    assert!(success, "Empty month should not be an error");
    assert!(stdout.trim().is_empty());
}

#[test]
fn test_paths_deterministic() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout1, _, _) = run_shotarc(&config_path, &["paths", "2022", "7"]);
    let (stdout2, _, _) = run_shotarc(&config_path, &["paths", "2022", "7"]);
    assert_eq!(
        stdout1, stdout2,
        "Path listings should be deterministic across runs"
    );
}

#[test]
fn test_resolve_round_trip() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_shotarc(&config_path, &["resolve", "2023/01/shot.png"]);
    assert!(success, "resolve failed: stderr={}", stderr);
    let path = stdout.trim();
    assert!(
        path.ends_with("2023-01/shot.png"),
        "Expected path under 2023-01, got: {}",
        path
    );
    assert!(Path::new(path).is_absolute());
}

#[test]
fn test_resolve_unknown_key_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_shotarc(&config_path, &["resolve", "nonexistent.png"]);
    assert!(!success, "resolve with unknown key should fail");
    assert!(
        stderr.contains("no archive entry"),
        "Should report missing entry, got: {}",
        stderr
    );
}

#[test]
fn test_stats_summary() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_shotarc(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("entries: 3"));
    assert!(stdout.contains("2022"));
    assert!(stdout.contains("2023"));
}

#[test]
fn test_root_flag_bypasses_config_file() {
    let (tmp, _) = setup_test_env();
    let root = tmp.path().join("archive");

    let output = Command::new(shotarc_binary())
        .arg("--root")
        .arg(&root)
        .arg("years")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(lines(&stdout), vec!["2022", "2023"]);
}

#[test]
fn test_missing_root_fails_startup() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("archive.toml");
    fs::write(
        &config_path,
        "[archive]\nroot = \"/no/such/directory\"\n",
    )
    .unwrap();

    let (_, stderr, success) = run_shotarc(&config_path, &["years"]);
    assert!(!success, "Missing archive root should abort startup");
    assert!(
        stderr.contains("does not point to a directory"),
        "Should report bad root, got: {}",
        stderr
    );
}

#[test]
fn test_missing_manifest_fails_startup() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("archive");
    fs::create_dir_all(&root).unwrap();

    let config_path = tmp.path().join("archive.toml");
    fs::write(
        &config_path,
        format!("[archive]\nroot = \"{}\"\n", root.display()),
    )
    .unwrap();

    let (_, stderr, success) = run_shotarc(&config_path, &["years"]);
    assert!(!success, "Missing manifest should abort startup");
    assert!(
        stderr.contains("does not contain"),
        "Should report missing manifest, got: {}",
        stderr
    );
}

#[test]
fn test_malformed_manifest_fails() {
    let (tmp, config_path) = setup_test_env();
    fs::write(tmp.path().join("archive").join("index.json"), "{ not json").unwrap();

    let (_, stderr, success) = run_shotarc(&config_path, &["years"]);
    assert!(!success, "Malformed manifest should fail the build");
    assert!(
        stderr.contains("not valid JSON"),
        "Should report invalid JSON, got: {}",
        stderr
    );
}

#[test]
fn test_non_object_manifest_fails() {
    let (tmp, config_path) = setup_test_env();
    fs::write(tmp.path().join("archive").join("index.json"), "[1, 2, 3]").unwrap();

    let (_, stderr, success) = run_shotarc(&config_path, &["years"]);
    assert!(!success, "Non-object manifest should fail the build");
    assert!(
        stderr.contains("not a JSON object"),
        "Should report wrong shape, got: {}",
        stderr
    );
}

#[test]
fn test_bad_records_skipped_with_warning() {
    let (tmp, config_path) = setup_test_env();
    fs::write(
        tmp.path().join("archive").join("index.json"),
        r#"{
          "bad-date": {"url": "http://host/x.png", "date": "not-a-date", "name": "x.png"},
          "no-name": {"url": "http://host/y.png", "date": "2022-03-01 09:00:00"},
          "ok": {"url": "http://host/z.png", "date": "2022-03-01 09:00:00", "name": "z.png"}
        }"#,
    )
    .unwrap();

    let (stdout, stderr, success) = run_shotarc(&config_path, &["paths", "2022", "3"]);
    assert!(success, "Bad records must not fail the build");
    assert_eq!(lines(&stdout), vec!["z.png"]);
    assert!(
        stderr.contains("Warning:") && stderr.contains("bad-date") && stderr.contains("no-name"),
        "Should warn about each skipped record, got: {}",
        stderr
    );
}

#[test]
fn test_duplicate_lookup_key_last_wins() {
    let (tmp, config_path) = setup_test_env();
    // Two records derive the same key; the one later in the manifest wins,
    // regardless of how their IDs sort.
    fs::write(
        tmp.path().join("archive").join("index.json"),
        r#"{
          "z9": {"url": "http://host/shot.png", "date": "2022-03-01 09:00:00", "name": "old.png"},
          "a1": {"url": "http://host/shot.png", "date": "2022-03-02 09:00:00", "name": "new.png"}
        }"#,
    )
    .unwrap();

    let (stdout, _, success) = run_shotarc(&config_path, &["resolve", "shot.png"]);
    assert!(success);
    assert!(
        stdout.trim().ends_with("new.png"),
        "Later record should win, got: {}",
        stdout
    );
}

#[test]
fn test_relative_manifest_url() {
    let (tmp, config_path) = setup_test_env();
    fs::write(
        tmp.path().join("archive").join("index.json"),
        r#"{
          "r1": {"url": "rel/key.png", "date": "2022-03-01 09:00:00", "name": "key.png"}
        }"#,
    )
    .unwrap();

    let (stdout, _, success) = run_shotarc(&config_path, &["paths", "2022", "3"]);
    assert!(success);
    assert_eq!(lines(&stdout), vec!["rel/key.png"]);
}

#[test]
fn test_empty_manifest_serves_empty_listings() {
    let (tmp, config_path) = setup_test_env();
    fs::write(tmp.path().join("archive").join("index.json"), "{}").unwrap();

    let (stdout, _, success) = run_shotarc(&config_path, &["years"]);
    assert!(success, "Empty manifest is not an error");
    assert!(stdout.trim().is_empty());

    let (stdout, _, success) = run_shotarc(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("entries: 0"));
}
