//! Recursive Markdown rendering of a page's block tree.
//!
//! Every [`ContentNode`] variant has one rendering rule below. Children are
//! visited depth-first in document order; the tree is trusted to be acyclic.
use pagepress_logging::{press_debug, press_trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::media::{last_path_segment, MediaContext, MediaError, MediaStore};
use crate::model::{Column, ContentNode, Icon, MediaSource, TableRow, TextRun};
use crate::rich_text::{format_runs_with, TextEscaping};

const BULLET_CHILD_INDENT: &str = "  ";
const NUMBERED_CHILD_INDENT: &str = "   ";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("media externalization failed: {0}")]
    Media(#[from] MediaError),
    #[error("heading level {0} is outside 1..=3")]
    InvalidHeadingLevel(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Emit site-generator shortcodes for embeds such as PDFs.
    pub use_shortcodes: bool,
    pub escape: TextEscaping,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            use_shortcodes: true,
            escape: TextEscaping::None,
        }
    }
}

pub struct BlockRenderer<'a> {
    options: RenderOptions,
    media: Option<&'a dyn MediaStore>,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            media: None,
        }
    }

    /// Image sources are passed through `media` before being referenced.
    pub fn with_media(mut self, media: &'a dyn MediaStore) -> Self {
        self.media = Some(media);
        self
    }

    /// Renders top-level blocks into one Markdown body.
    pub fn render_blocks(
        &self,
        blocks: &[ContentNode],
        context: &MediaContext,
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        self.render_all(blocks, context, &mut out)?;
        Ok(out)
    }

    /// Appends the Markdown for `node` and its descendants to `out`.
    ///
    /// Stops at the first error; `out` may then hold partial output.
    pub fn render(
        &self,
        node: &ContentNode,
        context: &MediaContext,
        out: &mut String,
    ) -> Result<(), RenderError> {
        press_trace!("Rendering {} block", node.variant_name());
        match node {
            ContentNode::Heading { level, runs } => self.heading(*level, runs, out)?,
            ContentNode::Paragraph { runs, children } => {
                self.paragraph(runs, out);
                self.render_all(children, context, out)?;
            }
            ContentNode::BulletItem { runs, children } => {
                self.list_item("- ", BULLET_CHILD_INDENT, runs, children, context, out)?
            }
            ContentNode::NumberedItem { runs, children } => {
                self.list_item("1. ", NUMBERED_CHILD_INDENT, runs, children, context, out)?
            }
            ContentNode::Todo { runs, checked } => {
                let checkbox = if *checked { "[x]" } else { "[ ]" };
                out.push_str(&format!("- {checkbox} {}\n", self.text(runs)));
            }
            ContentNode::Toggle { runs, children } => {
                out.push_str(&format!(
                    "<details>\n<summary>{}</summary>\n\n",
                    self.text(runs)
                ));
                self.render_all(children, context, out)?;
                out.push_str("</details>\n");
            }
            ContentNode::Quote { runs, children } => {
                for line in self.text(runs).split('\n') {
                    out.push_str(&format!("> {line}\n"));
                }
                self.render_all(children, context, out)?;
            }
            ContentNode::Code { runs, language } => self.code(runs, language, out),
            ContentNode::Callout {
                runs,
                icon,
                children,
            } => {
                out.push_str(&format!(
                    "> {} {}\n\n",
                    callout_icon(icon.as_ref()),
                    self.text(runs)
                ));
                self.render_all(children, context, out)?;
            }
            ContentNode::Image { source, caption } => self.image(source, caption, context, out)?,
            ContentNode::Video { source } => video(source.url(), out),
            ContentNode::File { source } => self.file(source.url(), out),
            ContentNode::Bookmark { url, caption } => {
                let title = if caption.is_empty() {
                    url.clone()
                } else {
                    self.text(caption)
                };
                out.push_str(&format!("[{title}]({url})\n\n"));
            }
            ContentNode::Equation { expression } => {
                out.push_str(&format!("$$\n{expression}\n$$\n\n"));
            }
            ContentNode::Divider => out.push_str("---\n"),
            ContentNode::Table { rows } => self.table(rows, out),
            ContentNode::ColumnList { columns } => self.columns(columns, context, out)?,
            ContentNode::Unsupported => press_debug!("Skipping unsupported block"),
        }
        Ok(())
    }

    fn render_all(
        &self,
        nodes: &[ContentNode],
        context: &MediaContext,
        out: &mut String,
    ) -> Result<(), RenderError> {
        for node in nodes {
            self.render(node, context, out)?;
        }
        Ok(())
    }

    fn text(&self, runs: &[TextRun]) -> String {
        format_runs_with(runs, self.options.escape)
    }

    fn heading(&self, level: u8, runs: &[TextRun], out: &mut String) -> Result<(), RenderError> {
        if !(1..=3).contains(&level) {
            return Err(RenderError::InvalidHeadingLevel(level));
        }
        let prefix = "#".repeat(usize::from(level));
        out.push_str(&format!("{prefix} {}\n\n", self.text(runs)));
        Ok(())
    }

    fn paragraph(&self, runs: &[TextRun], out: &mut String) {
        let text = self.text(runs);
        if text.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&text);
            out.push_str("\n\n");
        }
    }

    /// The indent is written once before each child, so only the first line
    /// a multi-line child produces ends up indented.
    fn list_item(
        &self,
        marker: &str,
        indent: &str,
        runs: &[TextRun],
        children: &[ContentNode],
        context: &MediaContext,
        out: &mut String,
    ) -> Result<(), RenderError> {
        out.push_str(&format!("{marker}{}\n", self.text(runs)));
        for child in children {
            out.push_str(indent);
            self.render(child, context, out)?;
        }
        Ok(())
    }

    fn code(&self, runs: &[TextRun], language: &str, out: &mut String) {
        let language = if language == "plain text" { "" } else { language };
        // Fenced content is literal; escaping would corrupt it.
        let code = format_runs_with(runs, TextEscaping::None);
        out.push_str(&format!("```{language}\n{code}\n```\n\n"));
    }

    fn image(
        &self,
        source: &MediaSource,
        caption: &[TextRun],
        context: &MediaContext,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let mut caption = self.text(caption);
        if caption.is_empty() {
            caption = "image".to_string();
        }

        let mut url = source.url().to_string();
        if let Some(media) = self.media {
            url = media.save(&url, context)?;
        }

        out.push_str(&format!("![{caption}]({url})\n\n"));
        Ok(())
    }

    fn file(&self, url: &str, out: &mut String) {
        if url.is_empty() {
            return;
        }
        let filename = last_path_segment(url).unwrap_or_else(|| url.to_string());

        if filename.to_lowercase().ends_with(".pdf") {
            if self.options.use_shortcodes {
                out.push_str(&format!("{{{{< pdf src=\"{url}\" >}}}}\n\n"));
            } else {
                out.push_str(&format!(
                    "<embed src=\"{url}\" type=\"application/pdf\" width=\"100%\" height=\"600px\">\n\n"
                ));
            }
            return;
        }

        out.push_str(&format!("[{filename}]({url})\n\n"));
    }

    /// The first row is the header; its width sets the separator row.
    fn table(&self, rows: &[TableRow], out: &mut String) {
        let Some((header, body)) = rows.split_first() else {
            return;
        };

        self.table_row(header, out);
        out.push_str(&vec!["---"; header.cells.len()].join(" | "));
        out.push('\n');
        for row in body {
            self.table_row(row, out);
        }
        out.push('\n');
    }

    fn table_row(&self, row: &TableRow, out: &mut String) {
        let cells: Vec<String> = row.cells.iter().map(|cell| self.text(cell)).collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }

    fn columns(
        &self,
        columns: &[Column],
        context: &MediaContext,
        out: &mut String,
    ) -> Result<(), RenderError> {
        out.push_str("<div class=\"row\">\n");
        for column in columns {
            out.push_str("<div class=\"col\">\n");
            self.render_all(&column.children, context, out)?;
            out.push_str("</div>\n");
        }
        out.push_str("</div>\n");
        Ok(())
    }
}

fn callout_icon(icon: Option<&Icon>) -> &str {
    match icon {
        Some(Icon::Emoji { emoji }) if !emoji.is_empty() => emoji.as_str(),
        Some(Icon::External { .. }) => "🔗",
        Some(Icon::File { .. }) => "📎",
        _ => "💡",
    }
}

fn video(url: &str, out: &mut String) {
    if is_youtube(url) {
        out.push_str(&format!("{{{{< youtube {} >}}}}\n\n", youtube_id(url)));
    } else {
        out.push_str(&format!("<video controls src=\"{url}\"></video>\n\n"));
    }
}

fn is_youtube(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| host.contains("youtube.com") || host.contains("youtu.be"))
}

/// Video id from `youtu.be/<id>` or `watch?v=<id>`; the URL itself otherwise.
fn youtube_id(url: &str) -> &str {
    url.split_once("youtu.be/")
        .or_else(|| url.split_once("watch?v="))
        .map(|(_, rest)| rest.split(['&', '?']).next().unwrap_or(rest))
        .unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::{callout_icon, is_youtube, youtube_id};
    use crate::model::Icon;

    #[test]
    fn youtube_id_from_short_link() {
        assert_eq!(youtube_id("https://youtu.be/abc123?t=10"), "abc123");
    }

    #[test]
    fn youtube_id_from_watch_link() {
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=xyz&list=PL1"),
            "xyz"
        );
    }

    #[test]
    fn youtube_detection_uses_host() {
        assert!(is_youtube("https://www.youtube.com/watch?v=1"));
        assert!(is_youtube("https://youtu.be/1"));
        assert!(!is_youtube("https://cdn.example.com/youtube.com.mp4"));
    }

    #[test]
    fn callout_icon_fallbacks() {
        let emoji = Icon::Emoji {
            emoji: "🔥".to_string(),
        };
        let external = Icon::External {
            url: "https://x".to_string(),
        };
        let file = Icon::File {
            url: "https://y".to_string(),
        };
        assert_eq!(callout_icon(Some(&emoji)), "🔥");
        assert_eq!(callout_icon(Some(&external)), "🔗");
        assert_eq!(callout_icon(Some(&file)), "📎");
        assert_eq!(callout_icon(None), "💡");
    }
}
