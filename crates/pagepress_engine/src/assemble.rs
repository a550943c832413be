use std::path::{Path, PathBuf};

use pagepress_logging::{press_debug, press_info};
use thiserror::Error;

use crate::filename::resolve_filename;
use crate::frontmatter::{FrontMatter, OutputDocument};
use crate::media::{MediaContext, MediaStore};
use crate::metadata::{MetadataOutcome, MetadataProcessor};
use crate::model::{ContentNode, Page};
use crate::persist::{AtomicFileWriter, PersistError};
use crate::render::{BlockRenderer, RenderError, RenderOptions};
use crate::template::{DocumentTemplate, TemplateError};

/// Directory for pages that carry no category.
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("failed to write document: {0}")]
    Persist(#[from] PersistError),
}

/// Result of a page conversion. A skip is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion<T> {
    Converted(T),
    Skipped { category: String },
}

/// Runs one page through metadata, rendering and templating, and writes the
/// result below the output root.
pub struct DocumentAssembler {
    metadata: MetadataProcessor,
    render_options: RenderOptions,
    media: Option<Box<dyn MediaStore>>,
    template: Box<dyn DocumentTemplate>,
    writer: AtomicFileWriter,
}

impl DocumentAssembler {
    pub fn new(
        metadata: MetadataProcessor,
        template: Box<dyn DocumentTemplate>,
        output_root: PathBuf,
    ) -> Self {
        Self {
            metadata,
            render_options: RenderOptions::default(),
            media: None,
            template,
            writer: AtomicFileWriter::new(output_root),
        }
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    pub fn with_media(mut self, media: Box<dyn MediaStore>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn output_root(&self) -> &Path {
        self.writer.root()
    }

    pub fn metadata(&self) -> &MetadataProcessor {
        &self.metadata
    }

    /// Builds the output document without writing it. Media is still
    /// externalized when a store is configured.
    pub fn assemble(
        &self,
        page: &Page,
        blocks: &[ContentNode],
    ) -> Result<Conversion<OutputDocument>, ConvertError> {
        let metadata = match self.metadata.derive(page) {
            MetadataOutcome::Proceed(metadata) => metadata,
            MetadataOutcome::Skip { category } => return Ok(Conversion::Skipped { category }),
        };

        let category_dir = metadata
            .category_dir
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let filename = resolve_filename(page, &metadata);
        let article = filename.trim_end_matches(".md");
        let context = MediaContext::new(category_dir.clone(), article);

        let mut renderer = BlockRenderer::new(self.render_options);
        if let Some(media) = self.media.as_deref() {
            renderer = renderer.with_media(media);
        }
        let body = renderer.render_blocks(blocks, &context)?;
        press_debug!("Rendered page {} ({} bytes)", page.id, body.len());

        Ok(Conversion::Converted(OutputDocument {
            category_dir,
            front_matter: FrontMatter::from_metadata(&metadata),
            filename,
            body,
        }))
    }

    /// Assembles the page and writes it to `{root}/{category_dir}/{filename}`.
    pub fn convert(
        &self,
        page: &Page,
        blocks: &[ContentNode],
    ) -> Result<Conversion<PathBuf>, ConvertError> {
        let document = match self.assemble(page, blocks)? {
            Conversion::Converted(document) => document,
            Conversion::Skipped { category } => return Ok(Conversion::Skipped { category }),
        };

        let rendered = self.template.render(&document)?;
        let path = self
            .writer
            .write(document.relative_path(), rendered.as_bytes())?;
        press_info!("Wrote {}", path.display());
        Ok(Conversion::Converted(path))
    }
}
