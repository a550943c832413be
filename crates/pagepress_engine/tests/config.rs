use std::fs;
use std::path::PathBuf;

use pagepress_engine::{Config, ConfigError, StorageKind, TextEscaping};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_config(dir: &TempDir, json: &str) -> PathBuf {
    let path = dir.path().join("pagepress.config.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn loads_full_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{
            "content": { "folder": "site/content/posts" },
            "storage": {
                "type": "s3",
                "s3": {
                    "bucket": "media",
                    "region": "eu-north-1",
                    "pathPrefix": "blog",
                    "urlPrefix": "https://cdn.example.com/blog",
                    "endpoint": "http://localhost:9000"
                }
            },
            "notion": {
                "status": { "draft": "In progress" },
                "categoryMap": { "Tech": "tech", "生活": "life" },
                "properties": { "title": "Title" }
            },
            "render": { "useShortcodes": false, "escape": "markdown" },
            "fetch": { "requestTimeoutSecs": 30, "redirectLimit": 3 }
        }"#,
    );

    let config = Config::load(&path).unwrap();
    assert_eq!(config.content.folder, PathBuf::from("site/content/posts"));
    assert_eq!(config.storage.kind, StorageKind::S3);
    assert_eq!(config.storage.s3.bucket, "media");
    assert_eq!(
        config.storage.s3.endpoint.as_deref(),
        Some("http://localhost:9000")
    );
    assert_eq!(config.notion.status.draft, "In progress");
    assert_eq!(config.notion.category_map["生活"], "life");
    assert_eq!(config.notion.properties.title, "Title");
    assert_eq!(config.notion.properties.categories, "Categories");
    assert!(!config.render.use_shortcodes);
    assert_eq!(config.render.escape, TextEscaping::Markdown);
    assert_eq!(config.fetch.request_timeout_secs, Some(30));
    assert_eq!(config.fetch.redirect_limit, 3);
    config.validate().unwrap();
}

#[test]
fn defaults_apply_to_missing_sections() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{ "content": { "folder": "out" } }"#);

    let config = Config::load(&path).unwrap();
    assert_eq!(config.storage.kind, StorageKind::None);
    assert_eq!(config.notion.status.draft, "Draft");
    assert!(config.render.use_shortcodes);
    assert_eq!(config.render.escape, TextEscaping::None);
    assert_eq!(config.fetch.redirect_limit, 10);
    assert_eq!(config.fetch.connect_timeout_secs, None);
    config.validate().unwrap();
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{ "content": "#);
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn unknown_storage_type_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{ "storage": { "type": "ftp" } }"#);
    assert!(matches!(
        Config::load(&path).unwrap_err(),
        ConfigError::Parse { .. }
    ));
}

#[test]
fn validate_rejects_empty_output_folder() {
    let err = Config::default().validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("content.folder")));
}

#[test]
fn validate_rejects_missing_archetype() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.content.folder = dir.path().to_path_buf();
    config.content.archetype = Some(dir.path().join("missing.md"));

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("archetype")));
}

#[test]
fn validate_rejects_incomplete_s3_settings() {
    let mut config = Config::default();
    config.content.folder = PathBuf::from("out");
    config.storage.kind = StorageKind::S3;
    config.storage.s3.bucket = "media".to_string();
    config.storage.s3.region = "us-east-1".to_string();

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("urlPrefix")));
}

#[test]
fn validate_rejects_local_storage_without_path() {
    let mut config = Config::default();
    config.content.folder = PathBuf::from("out");
    config.storage.kind = StorageKind::Local;

    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::Invalid(_)
    ));
}

#[test]
fn archetype_with_syntax_error_fails_at_build() {
    let dir = TempDir::new().unwrap();
    let archetype = dir.path().join("post.md");
    fs::write(&archetype, "---\ntitle: {{ Title\n---\n").unwrap();

    let mut config = Config::default();
    config.content.folder = dir.path().join("out");
    config.content.archetype = Some(archetype);

    assert!(matches!(
        config.build_assembler().err(),
        Some(ConfigError::Template(_))
    ));
}

#[test]
fn builds_assembler_with_local_storage() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.content.folder = dir.path().join("content");
    config.storage.kind = StorageKind::Local;
    config.storage.local.path = dir.path().join("static/images");
    config.storage.local.url_prefix = "/images".to_string();

    let assembler = config.build_assembler().unwrap();
    assert_eq!(assembler.output_root(), dir.path().join("content"));
}
