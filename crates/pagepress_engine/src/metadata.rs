use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pagepress_logging::press_warn;
use serde::{Deserialize, Serialize};

use crate::model::{Page, PropertyValue};
use crate::rich_text::plain_text;

/// Names of the page properties the processor reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyNames {
    pub title: String,
    /// Single-select category property; takes precedence over `categories`.
    pub category: String,
    /// Multi-select category property.
    pub categories: String,
    pub tags: String,
    pub status: String,
    pub description: String,
    pub meta_title: String,
    pub slug: String,
    pub toc: String,
    pub comments: String,
    pub weight: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            title: "Name".to_string(),
            category: "Category".to_string(),
            categories: "Categories".to_string(),
            tags: "Tags".to_string(),
            status: "Status".to_string(),
            description: "Description".to_string(),
            meta_title: "Meta Title".to_string(),
            slug: "Slug".to_string(),
            toc: "Toc".to_string(),
            comments: "Comments".to_string(),
            weight: "Weight".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataSettings {
    /// Source category name to output directory name.
    pub category_map: BTreeMap<String, String>,
    /// Status value that marks a page as a draft.
    pub draft_status: String,
    pub properties: PropertyNames,
}

/// Normalized page-level metadata for one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub description: Option<String>,
    pub meta_title: Option<String>,
    pub slug: Option<String>,
    pub draft: bool,
    pub toc: Option<bool>,
    pub comments: Option<bool>,
    pub weight: i64,
    /// Category names as authored; these go into front matter.
    pub categories: Vec<String>,
    /// Mapped directory of the first category, if the page has any.
    pub category_dir: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetadataOutcome {
    Proceed(PageMetadata),
    /// The page carries a category with no configured mapping.
    Skip { category: String },
}

#[derive(Debug, Clone)]
pub struct MetadataProcessor {
    settings: MetadataSettings,
}

impl MetadataProcessor {
    pub fn new(settings: MetadataSettings) -> Self {
        Self { settings }
    }

    /// Derives metadata or decides to skip the page. Missing or mistyped
    /// properties count as absent.
    pub fn derive(&self, page: &Page) -> MetadataOutcome {
        let names = &self.settings.properties;

        let (categories, category_dir) = match self.resolve_categories(page) {
            Ok(resolved) => resolved,
            Err(category) => {
                press_warn!(
                    "Skipping page {}: category '{}' has no mapping",
                    page.id,
                    category
                );
                return MetadataOutcome::Skip { category };
            }
        };

        let draft = match page.property(&names.status) {
            Some(PropertyValue::Status { value: Some(status) })
            | Some(PropertyValue::Select { value: Some(status) }) => {
                *status == self.settings.draft_status
            }
            _ => false,
        };

        MetadataOutcome::Proceed(PageMetadata {
            title: self.title_of(page),
            created: page.created_time,
            modified: page.last_edited_time,
            author: page.created_by.clone().filter(|name| !name.is_empty()),
            cover: page.cover.clone().filter(|url| !url.is_empty()),
            description: text_property(page, &names.description),
            meta_title: text_property(page, &names.meta_title),
            slug: text_property(page, &names.slug),
            draft,
            toc: checkbox_property(page, &names.toc),
            comments: checkbox_property(page, &names.comments),
            weight: match page.property(&names.weight) {
                Some(PropertyValue::Number { value: Some(weight) }) => *weight as i64,
                _ => 0,
            },
            categories,
            category_dir,
            tags: match page.property(&names.tags) {
                Some(PropertyValue::MultiSelect { value }) => value.clone(),
                _ => Vec::new(),
            },
        })
    }

    /// Plain title text, empty when the page has no usable title property.
    pub fn title_of(&self, page: &Page) -> String {
        text_property(page, &self.settings.properties.title).unwrap_or_default()
    }

    /// All-or-nothing: `Err` names the first category without a mapping.
    fn resolve_categories(
        &self,
        page: &Page,
    ) -> Result<(Vec<String>, Option<String>), String> {
        let names = &self.settings.properties;
        let categories: Vec<String> = match page.property(&names.category) {
            Some(PropertyValue::Select { value }) => {
                value.iter().filter(|name| !name.is_empty()).cloned().collect()
            }
            _ => match page.property(&names.categories) {
                Some(PropertyValue::MultiSelect { value }) => value.clone(),
                _ => Vec::new(),
            },
        };

        let mut mapped = Vec::with_capacity(categories.len());
        for category in &categories {
            match self.settings.category_map.get(category) {
                Some(dir) => mapped.push(dir.clone()),
                None => return Err(category.clone()),
            }
        }

        Ok((categories, mapped.into_iter().next()))
    }
}

fn text_property(page: &Page, name: &str) -> Option<String> {
    match page.property(name) {
        Some(PropertyValue::Title { value }) | Some(PropertyValue::RichText { value }) => {
            Some(plain_text(value)).filter(|text| !text.is_empty())
        }
        _ => None,
    }
}

fn checkbox_property(page: &Page, name: &str) -> Option<bool> {
    match page.property(name) {
        Some(PropertyValue::Checkbox { value }) => Some(*value),
        _ => None,
    }
}
