use std::path::{Path, PathBuf};

use deunicode::deunicode;

use crate::metadata::PageMetadata;
use crate::model::Page;

/// Output filename for a page: `{slug}.md`, or `{page.id}.md` when the title
/// yields no usable slug.
///
/// The slug is the ASCII transliteration of the title, lowercased, with each
/// run of characters outside `[a-z0-9]` collapsed to a single `-`.
pub fn resolve_filename(page: &Page, metadata: &PageMetadata) -> String {
    match title_slug(&metadata.title) {
        Some(slug) => format!("{slug}.md"),
        None => format!("{}.md", page.id),
    }
}

pub fn title_slug(title: &str) -> Option<String> {
    if title.trim().is_empty() {
        return None;
    }

    let ascii = deunicode(title).to_ascii_lowercase();
    let slug = ascii
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

/// `{root}/{category_dir}/{filename}`
pub fn output_path(root: &Path, category_dir: &str, filename: &str) -> PathBuf {
    root.join(category_dir).join(filename)
}
