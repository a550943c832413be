use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::metadata::PageMetadata;

/// Flat field map handed to the document template, one field per front
/// matter key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FrontMatter {
    pub title: String,
    pub meta_title: String,
    pub description: String,
    pub date: String,
    pub image: String,
    pub author: String,
    pub draft: bool,
    pub weight: i64,
    pub toc: bool,
    pub comments: bool,
    pub slug: String,
    pub lastmod: String,
    /// Inline list literal, e.g. `["a", "b"]`.
    pub tags: String,
    /// Inline list literal of the original category names.
    pub categories: String,
}

impl FrontMatter {
    pub fn from_metadata(metadata: &PageMetadata) -> Self {
        Self {
            title: metadata.title.clone(),
            meta_title: metadata.meta_title.clone().unwrap_or_default(),
            description: metadata.description.clone().unwrap_or_default(),
            date: timestamp(&metadata.created),
            image: metadata.cover.clone().unwrap_or_default(),
            author: metadata.author.clone().unwrap_or_default(),
            draft: metadata.draft,
            weight: metadata.weight,
            toc: metadata.toc.unwrap_or(false),
            comments: metadata.comments.unwrap_or(false),
            slug: metadata.slug.clone().unwrap_or_default(),
            lastmod: timestamp(&metadata.modified),
            tags: list_literal(&metadata.tags),
            categories: list_literal(&metadata.categories),
        }
    }
}

/// A converted page, ready for templating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    pub category_dir: String,
    pub filename: String,
    pub front_matter: FrontMatter,
    pub body: String,
}

impl OutputDocument {
    /// Path relative to the output root.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.category_dir).join(&self.filename)
    }
}

/// Template context: the front matter fields plus `Content`.
#[derive(Serialize)]
pub(crate) struct TemplateFields<'a> {
    #[serde(flatten)]
    pub front_matter: &'a FrontMatter,
    #[serde(rename = "Content")]
    pub content: &'a str,
}

impl<'a> From<&'a OutputDocument> for TemplateFields<'a> {
    fn from(document: &'a OutputDocument) -> Self {
        Self {
            front_matter: &document.front_matter,
            content: &document.body,
        }
    }
}

fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn list_literal(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("\"{item}\"")).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::list_literal;

    #[test]
    fn list_literal_forms() {
        assert_eq!(list_literal(&[]), "[]");
        assert_eq!(
            list_literal(&["a".to_string(), "b".to_string()]),
            "[\"a\", \"b\"]"
        );
    }
}
