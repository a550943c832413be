use std::path::Path;

use chrono::Utc;
use pagepress_engine::{
    output_path, resolve_filename, title_slug, MetadataOutcome, MetadataProcessor,
    MetadataSettings, Page, PropertyValue, TextRun,
};
use pretty_assertions::assert_eq;

fn filename_for(id: &str, title: &str) -> String {
    let page = Page::new(id, Utc::now(), Utc::now()).with_property(
        "Name",
        PropertyValue::Title {
            value: vec![TextRun::plain(title)],
        },
    );
    let processor = MetadataProcessor::new(MetadataSettings::default());
    match processor.derive(&page) {
        MetadataOutcome::Proceed(metadata) => resolve_filename(&page, &metadata),
        MetadataOutcome::Skip { category } => panic!("unexpected skip on {category}"),
    }
}

fn is_slug_filename(name: &str) -> bool {
    name.strip_suffix(".md").is_some_and(|stem| {
        stem.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    })
}

#[test]
fn latin_titles_become_hyphenated_slugs() {
    assert_eq!(filename_for("p1", "Hello World"), "hello-world.md");
    assert_eq!(
        filename_for("p1", "Rust 2024: What's New?"),
        "rust-2024-what-s-new.md"
    );
}

#[test]
fn accents_are_transliterated() {
    assert_eq!(filename_for("p1", "Crème Brûlée"), "creme-brulee.md");
}

#[test]
fn han_titles_are_romanized() {
    let name = filename_for("p1", "你好世界");
    assert_eq!(name, "ni-hao-shi-jie.md");
}

#[test]
fn empty_or_symbol_titles_fall_back_to_page_id() {
    assert_eq!(filename_for("8a1f2c", ""), "8a1f2c.md");
    assert_eq!(filename_for("8a1f2c", "   "), "8a1f2c.md");
    assert_eq!(filename_for("8a1f2c", "!!! ???"), "8a1f2c.md");
}

#[test]
fn filenames_are_slugs_or_page_ids() {
    let titles = [
        "Hello World",
        "  --Leading and trailing--  ",
        "C++ & Rust",
        "Ünïcödé",
        "日本語のタイトル",
        "emoji 🚀 launch",
        "",
        "***",
    ];
    for title in titles {
        let name = filename_for("page-id", title);
        assert!(
            is_slug_filename(&name) || name == "page-id.md",
            "{title:?} produced {name:?}"
        );
        assert!(!name.starts_with('-') && !name.contains("--"), "{name:?}");
    }
}

#[test]
fn title_slug_has_no_edge_hyphens() {
    assert_eq!(title_slug("--a--b--").as_deref(), Some("a-b"));
}

#[test]
fn output_path_joins_category_and_filename() {
    assert_eq!(
        output_path(Path::new("/site/content"), "tech", "hello.md"),
        Path::new("/site/content/tech/hello.md")
    );
}
