use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use markdown_gdoc_config::{Config, ConfigError, ConfigSourceKind, LoadOptions};
use markdown_gdoc_core::TextUnit;
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

fn validation_message(working_dir: &Path) -> String {
    let err = Config::load(LoadOptions::default().with_working_dir(working_dir))
        .expect_err("expected validation failure");
    match err {
        ConfigError::Validation(errors) => errors.to_string(),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.sources.working_directory, working_dir);
    assert_eq!(config.document.title, "Untitled document");
    assert_eq!(config.document.folder_id, None);
    assert_eq!(config.input.json_key, "gptOutput");
    assert!(!config.input.skip_first_block);
    assert_eq!(config.compiler.text_unit, TextUnit::Utf16);
    assert!(!config.header.enabled);
    assert_eq!(config.header.image_width_pt, 100.0);
    assert_eq!(config.header.font_size_pt, 16.0);
    assert!(config.header.spec().is_none());

    assert_eq!(config.sources.layers.len(), 1);
    assert_eq!(config.sources.layers[0].kind, ConfigSourceKind::Default);
}

#[test]
fn applies_precedence_and_merges_fields() {
    let temp = TempDir::new().expect("tempdir");
    let git_root = canonical(temp.path());
    fs::create_dir(git_root.join(".git")).expect("create .git");

    write_file(
        git_root.join(".markdown-gdoc.toml"),
        r#"
        [document]
        title = "Root title"
        folder_id = "folder-root"

        [compiler]
        text_unit = "chars"

        [header]
        image_uri = "https://example.com/root.png"
        caption = "Root caption"
        "#,
    );

    let workspace = git_root.join("workspace");
    fs::create_dir(&workspace).expect("create workspace");

    write_file(
        workspace.join(".markdown-gdoc.toml"),
        r#"
        [document]
        title = "Weekly report"

        [input]
        json_key = "body"
        skip_first_block = true
        "#,
    );

    let override_path = workspace.join("override.toml");
    write_file(
        &override_path,
        r#"
        [header]
        enabled = true
        font_size_pt = 18.0
        "#,
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(&workspace)
            .with_override_path(&override_path),
    )
    .expect("load config with precedence");

    assert_eq!(config.document.title, "Weekly report");
    assert_eq!(config.document.folder_id.as_deref(), Some("folder-root"));
    assert_eq!(config.input.json_key, "body");
    assert!(config.input.skip_first_block);
    assert_eq!(config.compiler.text_unit, TextUnit::Chars);

    let header = config.header.spec().expect("header enabled");
    assert_eq!(header.image_uri, "https://example.com/root.png");
    assert_eq!(header.caption_text, "Root caption");
    assert_eq!(header.font_size_pt, 18.0);
    assert_eq!(header.image_height_pt, 100.0);

    let kinds: Vec<_> = config
        .sources
        .layers
        .iter()
        .map(|layer| layer.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ConfigSourceKind::Default,
            ConfigSourceKind::GitRoot,
            ConfigSourceKind::Local,
            ConfigSourceKind::Override
        ]
    );
}

#[test]
fn missing_override_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(&working_dir)
            .with_override_path("absent.toml"),
    )
    .expect_err("expected missing override");

    match err {
        ConfigError::OverrideNotFound { path } => {
            assert_eq!(path, working_dir.join("absent.toml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(working_dir.join(".markdown-gdoc.toml"), "[document\ntitle = 1");

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("expected parse failure");
    assert!(matches!(err, ConfigError::Parse { .. }), "unexpected error: {err}");
}

#[test]
fn unknown_text_unit_surfaces_validation_error() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".markdown-gdoc.toml"),
        r#"
        [compiler]
        text_unit = "graphemes"
        "#,
    );

    let joined = validation_message(&working_dir);
    assert!(
        joined.contains("compiler.text_unit: unknown text unit 'graphemes'"),
        "unexpected error output: {joined}"
    );
    assert!(joined.contains("local config at"), "unexpected error output: {joined}");
}

#[test]
fn enabled_header_requires_image_uri() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".markdown-gdoc.toml"),
        r#"
        [header]
        enabled = true
        caption = "Quarterly"
        "#,
    );

    let joined = validation_message(&working_dir);
    assert!(
        joined.contains("header.image_uri is required"),
        "unexpected error output: {joined}"
    );
}

#[test]
fn collects_every_validation_failure() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".markdown-gdoc.toml"),
        r#"
        [document]
        title = "  "

        [input]
        json_key = ""

        [header]
        enabled = true
        image_uri = "https://example.com/logo.png"
        image_width_pt = -5.0
        "#,
    );

    let joined = validation_message(&working_dir);
    assert_eq!(joined.lines().count(), 3, "unexpected error output: {joined}");
    assert!(joined.contains("document.title must not be empty"));
    assert!(joined.contains("input.json_key must not be empty"));
    assert!(joined.contains("header.image_width_pt must be a positive number"));
}
