//! Pagepress engine: converts block-structured pages into Markdown documents
//! for a static-site generator.
mod assemble;
mod batch;
mod config;
mod fetch;
mod filename;
mod frontmatter;
mod media;
mod metadata;
mod model;
mod persist;
mod render;
mod rich_text;
mod template;
mod types;

pub use assemble::{Conversion, ConvertError, DocumentAssembler, UNCATEGORIZED};
pub use batch::{run_batch, BatchSummary};
pub use config::{
    Config, ConfigError, ContentConfig, FetchConfig, LocalStorageConfig, NotionConfig,
    S3StorageConfig, StatusConfig, StorageConfig, StorageKind, DEFAULT_CONFIG_FILE,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::{output_path, resolve_filename, title_slug};
pub use frontmatter::{FrontMatter, OutputDocument};
pub use media::{
    media_filename, LocalMediaStore, MediaContext, MediaError, MediaStore, S3MediaStore,
    S3Settings, SUPPORTED_MEDIA_TYPES,
};
pub use metadata::{
    MetadataOutcome, MetadataProcessor, MetadataSettings, PageMetadata, PropertyNames,
};
pub use model::{
    Annotations, Column, ContentNode, Icon, MediaSource, Page, PageBundle, PropertyValue,
    RunKind, TableRow, TextRun,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use render::{BlockRenderer, RenderError, RenderOptions};
pub use rich_text::{format_runs, format_runs_with, plain_text, TextEscaping};
pub use template::{DocumentTemplate, JinjaTemplate, TemplateError, DEFAULT_ARCHETYPE};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
