use std::path::PathBuf;

use pagepress_logging::{press_error, press_info};

use crate::assemble::{Conversion, DocumentAssembler};
use crate::model::PageBundle;

/// Outcome counts of a batch run, with the written paths and affected page ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len() + self.failed.len()
    }
}

/// Converts pages one at a time. A failing page is logged and counted; the
/// batch carries on with the next one.
pub fn run_batch<I>(assembler: &DocumentAssembler, bundles: I) -> BatchSummary
where
    I: IntoIterator<Item = PageBundle>,
{
    let mut summary = BatchSummary::default();

    for bundle in bundles {
        let page = &bundle.page;
        let title = assembler.metadata().title_of(page);

        match assembler.convert(page, &bundle.blocks) {
            Ok(Conversion::Converted(path)) => summary.written.push(path),
            Ok(Conversion::Skipped { category }) => {
                press_info!(
                    "Skipped page {} '{}': unmapped category '{}'",
                    page.id,
                    title,
                    category
                );
                summary.skipped.push(page.id.clone());
            }
            Err(err) => {
                press_error!("Failed to convert page {} '{}': {}", page.id, title, err);
                summary.failed.push(page.id.clone());
            }
        }
    }

    summary
}
