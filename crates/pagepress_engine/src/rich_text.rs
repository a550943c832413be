use serde::{Deserialize, Serialize};

use crate::model::{RunKind, TextRun};

/// How literal run content is treated before style delimiters are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEscaping {
    /// Content is copied verbatim; Markdown-significant characters pass through.
    #[default]
    None,
    /// Markdown-significant characters are backslash-escaped.
    Markdown,
}

/// Formats runs as inline Markdown without escaping.
pub fn format_runs(runs: &[TextRun]) -> String {
    format_runs_with(runs, TextEscaping::None)
}

/// Formats runs as inline Markdown.
///
/// Each text run is wrapped in turn with bold, italic, strikethrough, code
/// and link delimiters. The wraps are plain string operations, so overlapping
/// styles nest in that fixed order. Non-text runs are dropped.
pub fn format_runs_with(runs: &[TextRun], escaping: TextEscaping) -> String {
    let mut out = String::new();
    for run in runs.iter().filter(|run| run.kind == RunKind::Text) {
        let mut content = match escaping {
            TextEscaping::None => run.content.clone(),
            TextEscaping::Markdown => escape_markdown(&run.content),
        };
        let styles = &run.annotations;
        if styles.bold {
            content = format!("**{content}**");
        }
        if styles.italic {
            content = format!("*{content}*");
        }
        if styles.strikethrough {
            content = format!("~~{content}~~");
        }
        if styles.code {
            content = format!("`{content}`");
        }
        if let Some(url) = run.link.as_deref() {
            content = format!("[{content}]({url})");
        }
        out.push_str(&content);
    }
    out
}

/// Concatenates the content of text runs with no styling.
pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter()
        .filter(|run| run.kind == RunKind::Text)
        .map(|run| run.content.as_str())
        .collect()
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 10);
    let mut chars = text.chars().peekable();
    let mut at_line_start = true;

    while let Some(c) = chars.next() {
        match c {
            '\\' | '*' | '_' | '[' | ']' | '`' | '|' | '<' | '>' | '~' | '$' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '#' if at_line_start => {
                escaped.push('\\');
                escaped.push(c);
            }
            '!' if chars.peek() == Some(&'[') => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
        at_line_start = c == '\n';
    }

    escaped
}
