use std::fs;
use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

const SAMPLE: &str = "# Title\n\nHello **world**\n";

fn setup_file(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    let mut file = fs::File::create(&path).expect("create file");
    file.write_all(contents.as_bytes()).expect("write file");
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout is JSON")
}

fn binary(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("markdown-gdoc").expect("binary");
    cmd.current_dir(dir);
    cmd
}

#[test]
fn compile_markdown_prints_submission() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "report.md", SAMPLE);

    let value = stdout_json(binary(temp.path()).args(["compile", "report.md"]));

    assert_eq!(value["document"], json!({"title": "Untitled document"}));
    let requests = value["requests"].as_array().expect("requests array");
    assert_eq!(requests.len(), 8);
    assert_eq!(
        requests[0],
        json!({"insertText": {"location": {"index": 1}, "text": "Title\n\n"}})
    );
    assert_eq!(
        requests[1]["updateParagraphStyle"]["paragraphStyle"],
        json!({"namedStyleType": "TITLE"})
    );
    assert_eq!(
        requests[7],
        json!({"insertText": {"location": {"index": 19}, "text": "\n\n"}})
    );
}

#[test]
fn compile_json_applies_config_header_and_document() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(
        temp.path(),
        ".markdown-gdoc.toml",
        r#"
        [document]
        title = "Weekly"
        folder_id = "folder-1"

        [header]
        enabled = true
        image_uri = "https://example.com/logo.png"
        caption = "Team"
        "#,
    );
    let payload = json!({"gptOutput": SAMPLE}).to_string();
    setup_file(temp.path(), "output.json", &payload);

    let value = stdout_json(binary(temp.path()).args([
        "compile",
        "output.json",
        "--document-id",
        "doc-9",
        "--header-segment",
        "kix.hdr",
        "--compact",
    ]));

    assert_eq!(
        value["document"],
        json!({"title": "Weekly", "folderId": "folder-1", "documentId": "doc-9"})
    );
    let requests = value["requests"].as_array().expect("requests array");
    assert_eq!(requests.len(), 13);
    assert_eq!(
        requests[0]["insertInlineImage"]["location"],
        json!({"segmentId": "kix.hdr", "index": 0})
    );
    assert_eq!(
        requests[3]["updateTextStyle"]["range"],
        json!({"segmentId": "kix.hdr", "startIndex": 1, "endIndex": 5})
    );
    assert_eq!(requests[5]["insertText"]["location"], json!({"index": 1}));
}

#[test]
fn no_header_flag_drops_configured_header() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(
        temp.path(),
        ".markdown-gdoc.toml",
        "[header]\nenabled = true\nimage_uri = \"https://example.com/logo.png\"\n",
    );
    setup_file(temp.path(), "report.md", SAMPLE);

    let value = stdout_json(binary(temp.path()).args(["compile", "report.md", "--no-header"]));
    assert_eq!(value["requests"].as_array().map(Vec::len), Some(8));
}

#[test]
fn text_unit_flag_changes_measurement() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "emoji.md", "## 😀\n");

    let value = stdout_json(binary(temp.path()).args(["compile", "emoji.md", "--text-unit", "bytes"]));
    assert_eq!(
        value["requests"][2]["updateTextStyle"]["range"],
        json!({"startIndex": 1, "endIndex": 5})
    );
}

#[test]
fn json_without_content_key_exits_with_invalid_input() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "empty.json", r#"{"other": "x"}"#);

    binary(temp.path())
        .args(["compile", "empty.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no content in empty.json"));
}

#[test]
fn stdin_json_is_unwrapped() {
    let temp = TempDir::new().expect("tempdir");
    let payload = json!({"gptOutput": "Just text."}).to_string();

    let value = stdout_json(
        binary(temp.path())
            .args(["compile", "-"])
            .write_stdin(payload),
    );
    assert_eq!(
        value["requests"][0],
        json!({"insertText": {"location": {"index": 1}, "text": "Just text."}})
    );
}

#[test]
fn multiple_inputs_are_written_to_out_dir() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "docs/a.md", "# A\n");
    setup_file(temp.path(), "docs/b.md", "Plain paragraph.\n");

    binary(temp.path())
        .args(["compile", "docs/a.md", "docs/b.md", "--out-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    for stem in ["a", "b"] {
        let path = temp.path().join("out").join(format!("{stem}.requests.json"));
        let raw = fs::read_to_string(&path).expect("read requests file");
        let value: Value = serde_json::from_str(&raw).expect("requests file is JSON");
        assert!(value["requests"].as_array().is_some_and(|r| !r.is_empty()));
    }
}

#[test]
fn one_failing_input_does_not_block_the_others() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "good.md", "# Good\n");

    binary(temp.path())
        .args(["compile", "good.md", "missing.md"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("failed to read missing.md"));

    assert!(temp.path().join("good.requests.json").exists());
}

#[test]
fn invalid_config_exits_with_config_code() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(
        temp.path(),
        ".markdown-gdoc.toml",
        "[compiler]\ntext_unit = \"graphemes\"\n",
    );
    setup_file(temp.path(), "report.md", SAMPLE);

    binary(temp.path())
        .args(["compile", "report.md"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("configuration validation failed"));
}

#[test]
fn header_command_prints_image_only_batch_for_empty_caption() {
    let temp = TempDir::new().expect("tempdir");

    let value = stdout_json(binary(temp.path()).args([
        "header",
        "--image-uri",
        "https://example.com/logo.png",
    ]));
    let requests = value["requests"].as_array().expect("requests array");
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1],
        json!({"updateParagraphStyle": {
            "range": {"startIndex": 0, "endIndex": 1},
            "paragraphStyle": {"alignment": "CENTER"},
            "fields": "alignment"
        }})
    );
}

#[test]
fn header_command_requires_an_image() {
    let temp = TempDir::new().expect("tempdir");
    binary(temp.path())
        .arg("header")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("header image is not configured"));
}

#[test]
fn styles_lists_every_kind() {
    let temp = TempDir::new().expect("tempdir");
    binary(temp.path())
        .arg("styles")
        .assert()
        .success()
        .stdout(predicate::str::contains("heading 1"))
        .stdout(predicate::str::contains("span italic"));

    let value = stdout_json(binary(temp.path()).args(["styles", "--format", "json"]));
    let entries = value.as_array().expect("styles array");
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[2]["kind"], json!("heading 3"));
    assert_eq!(
        entries[2]["paragraphStyle"],
        json!({"namedStyleType": "HEADING_3"})
    );
}

#[test]
fn inputs_sharing_a_stem_are_rejected_before_writing() {
    let temp = TempDir::new().expect("tempdir");
    setup_file(temp.path(), "a/report.md", "# A\n");
    setup_file(temp.path(), "b/report.md", "# B\n");

    binary(temp.path())
        .args(["compile", "a/report.md", "b/report.md", "--out-dir", "out"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("would both write"));

    assert!(!temp.path().join("out").join("report.requests.json").exists());
}

#[test]
fn stdin_given_twice_is_rejected() {
    let temp = TempDir::new().expect("tempdir");

    binary(temp.path())
        .args(["compile", "-", "-"])
        .write_stdin("# Title\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("stdin (`-`) can only be given once"));
}
