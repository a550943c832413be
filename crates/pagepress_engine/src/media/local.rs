use std::path::PathBuf;

use pagepress_logging::press_debug;
use tokio::runtime::Runtime;

use super::{block_on, join_url, media_filename, runtime, MediaContext, MediaError, MediaStore};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::persist::AtomicFileWriter;

/// Stores media below a local directory that the site serves under `url_prefix`.
///
/// With a [`MediaContext`] the file lands in `{save_path}/{category}/{article}/`,
/// otherwise directly in `{save_path}/`.
pub struct LocalMediaStore {
    writer: AtomicFileWriter,
    url_prefix: String,
    fetcher: Box<dyn Fetcher>,
    runtime: Runtime,
}

impl LocalMediaStore {
    pub fn new(
        save_path: PathBuf,
        url_prefix: impl Into<String>,
        settings: FetchSettings,
    ) -> Result<Self, MediaError> {
        Self::with_fetcher(save_path, url_prefix, Box::new(ReqwestFetcher::new(settings)))
    }

    pub fn with_fetcher(
        save_path: PathBuf,
        url_prefix: impl Into<String>,
        fetcher: Box<dyn Fetcher>,
    ) -> Result<Self, MediaError> {
        Ok(Self {
            writer: AtomicFileWriter::new(save_path),
            url_prefix: url_prefix.into(),
            fetcher,
            runtime: runtime()?,
        })
    }
}

impl MediaStore for LocalMediaStore {
    fn save(&self, url: &str, context: &MediaContext) -> Result<String, MediaError> {
        let output = block_on(&self.runtime, self.fetcher.fetch(url))?
            .map_err(|source| MediaError::Download {
                url: url.to_string(),
                source,
            })?;

        let filename = media_filename(url, output.metadata.mime_type(), &output.bytes);
        let relative = if context.is_set() {
            format!("{}/{}/{}", context.category, context.article, filename)
        } else {
            filename
        };

        let path = self
            .writer
            .write(relative.split('/').collect::<PathBuf>(), &output.bytes)
            .map_err(|source| MediaError::Persist {
                path: relative.clone(),
                source,
            })?;
        press_debug!("Stored {} as {:?}", url, path);

        Ok(join_url(&self.url_prefix, &relative))
    }
}
