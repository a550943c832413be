use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of an inline run. Only [`RunKind::Text`] carries renderable content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    #[default]
    Text,
    Mention,
    Equation,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
}

/// A span of inline text with independent style flags and an optional link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRun {
    pub kind: RunKind,
    pub content: String,
    pub annotations: Annotations,
    pub link: Option<String>,
}

impl TextRun {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn of_kind(kind: RunKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.annotations.strikethrough = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.annotations.code = true;
        self
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }
}

/// Location of a media asset: a hosted upload, an external link, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSource {
    pub file: Option<String>,
    pub external: Option<String>,
}

impl MediaSource {
    pub fn hosted(url: impl Into<String>) -> Self {
        Self {
            file: Some(url.into()),
            external: None,
        }
    }

    pub fn external(url: impl Into<String>) -> Self {
        Self {
            file: None,
            external: Some(url.into()),
        }
    }

    /// Hosted URL when present, else the external one, else empty.
    pub fn url(&self) -> &str {
        self.file
            .as_deref()
            .filter(|url| !url.is_empty())
            .or(self.external.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
    External { url: String },
    File { url: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRow {
    pub cells: Vec<Vec<TextRun>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    pub children: Vec<ContentNode>,
}

/// One block of a page's content tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentNode {
    Heading {
        level: u8,
        #[serde(default)]
        runs: Vec<TextRun>,
    },
    Paragraph {
        #[serde(default)]
        runs: Vec<TextRun>,
        #[serde(default)]
        children: Vec<ContentNode>,
    },
    BulletItem {
        #[serde(default)]
        runs: Vec<TextRun>,
        #[serde(default)]
        children: Vec<ContentNode>,
    },
    NumberedItem {
        #[serde(default)]
        runs: Vec<TextRun>,
        #[serde(default)]
        children: Vec<ContentNode>,
    },
    Todo {
        #[serde(default)]
        runs: Vec<TextRun>,
        #[serde(default)]
        checked: bool,
    },
    Toggle {
        #[serde(default)]
        runs: Vec<TextRun>,
        #[serde(default)]
        children: Vec<ContentNode>,
    },
    Quote {
        #[serde(default)]
        runs: Vec<TextRun>,
        #[serde(default)]
        children: Vec<ContentNode>,
    },
    Code {
        #[serde(default)]
        runs: Vec<TextRun>,
        #[serde(default)]
        language: String,
    },
    Callout {
        #[serde(default)]
        runs: Vec<TextRun>,
        #[serde(default)]
        icon: Option<Icon>,
        #[serde(default)]
        children: Vec<ContentNode>,
    },
    Image {
        #[serde(default)]
        source: MediaSource,
        #[serde(default)]
        caption: Vec<TextRun>,
    },
    Video {
        #[serde(default)]
        source: MediaSource,
    },
    File {
        #[serde(default)]
        source: MediaSource,
    },
    Bookmark {
        url: String,
        #[serde(default)]
        caption: Vec<TextRun>,
    },
    Equation {
        expression: String,
    },
    Divider,
    Table {
        #[serde(default)]
        rows: Vec<TableRow>,
    },
    ColumnList {
        #[serde(default)]
        columns: Vec<Column>,
    },
    /// Any block type the renderer does not know about.
    #[serde(other)]
    Unsupported,
}

impl ContentNode {
    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        Self::Paragraph {
            runs,
            children: Vec::new(),
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::BulletItem { .. } => "bullet_item",
            Self::NumberedItem { .. } => "numbered_item",
            Self::Todo { .. } => "todo",
            Self::Toggle { .. } => "toggle",
            Self::Quote { .. } => "quote",
            Self::Code { .. } => "code",
            Self::Callout { .. } => "callout",
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::File { .. } => "file",
            Self::Bookmark { .. } => "bookmark",
            Self::Equation { .. } => "equation",
            Self::Divider => "divider",
            Self::Table { .. } => "table",
            Self::ColumnList { .. } => "column_list",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Typed page property value as delivered by the content source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        value: Vec<TextRun>,
    },
    RichText {
        #[serde(default)]
        value: Vec<TextRun>,
    },
    Select {
        #[serde(default)]
        value: Option<String>,
    },
    MultiSelect {
        #[serde(default)]
        value: Vec<String>,
    },
    Status {
        #[serde(default)]
        value: Option<String>,
    },
    Checkbox {
        #[serde(default)]
        value: bool,
    },
    Number {
        #[serde(default)]
        value: Option<f64>,
    },
    Date {
        #[serde(default)]
        value: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Page {
    pub fn new(
        id: impl Into<String>,
        created_time: DateTime<Utc>,
        last_edited_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            created_time,
            last_edited_time,
            created_by: None,
            cover: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// A page together with its top-level blocks; the unit handed to the converter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBundle {
    pub page: Page,
    #[serde(default)]
    pub blocks: Vec<ContentNode>,
}
