//! Media externalization: download remote assets and re-home them in a
//! storage backend, returning the URL the rendered page should reference.
mod local;
mod s3;

use std::fmt::Write as _;
use std::future::Future;
use std::path::Path;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime};
use url::Url;

use crate::persist::PersistError;
use crate::FetchError;

pub use local::LocalMediaStore;
pub use s3::{S3MediaStore, S3Settings};

/// Unreserved URL characters stay literal; everything else in a path segment
/// is percent-encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// MIME types every backend advertises.
pub const SUPPORTED_MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/webm",
    "audio/mpeg",
    "audio/wav",
    "application/pdf",
];

/// Article scope for the assets of one page: where its files are grouped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaContext {
    pub category: String,
    pub article: String,
}

impl MediaContext {
    pub fn new(category: impl Into<String>, article: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            article: article.into(),
        }
    }

    /// Both parts are required for the context to affect storage paths.
    pub fn is_set(&self) -> bool {
        !self.category.is_empty() && !self.article.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("download of {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("failed to store {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: PersistError,
    },
    #[error("upload of {key} failed: {message}")]
    Upload { key: String, message: String },
    #[error("media runtime unavailable: {0}")]
    Runtime(String),
}

/// Storage backend for externalized media.
///
/// Implementations block the calling thread while they download and store.
/// Stores are synchronous: building one or calling `save` from inside an async
/// runtime returns [`MediaError::Runtime`].
pub trait MediaStore: Send + Sync {
    /// Fetches `url`, persists it, and returns the URL to reference instead.
    fn save(&self, url: &str, context: &MediaContext) -> Result<String, MediaError>;

    fn supported_types(&self) -> &'static [&'static str] {
        SUPPORTED_MEDIA_TYPES
    }
}

/// Filename for a downloaded asset, percent-decoded.
///
/// Uses the last path segment of `url` (query and fragment dropped) when it
/// carries an extension; otherwise synthesizes `media-<hash><ext>` from the
/// declared content type and a short hash of the body.
pub fn media_filename(url: &str, mime_type: Option<&str>, body: &[u8]) -> String {
    match last_path_segment(url) {
        Some(segment) if Path::new(&segment).extension().is_some() => segment,
        _ => format!(
            "media-{}{}",
            short_hash(body),
            extension_for(mime_type.unwrap_or_default())
        ),
    }
}

/// Decoded last path segment. Encoded separators are replaced so the result
/// is always a single file name.
pub(crate) fn last_path_segment(url: &str) -> Option<String> {
    let raw = match Url::parse(url) {
        Ok(parsed) => parsed.path_segments()?.last()?.to_string(),
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or(url);
            path.rsplit('/').next()?.to_string()
        }
    };
    let segment = percent_decode_str(&raw)
        .decode_utf8()
        .map(|decoded| decoded.replace(['/', '\\'], "_"))
        .unwrap_or_else(|_| raw.clone());
    (!segment.is_empty() && segment != "." && segment != "..").then_some(segment)
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "video/mp4" => ".mp4",
        _ => ".bin",
    }
}

fn short_hash(input: &[u8]) -> String {
    let digest = Sha256::digest(input);
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

/// Appends the `/`-separated `path` to `prefix`, percent-encoding each segment.
fn join_url(prefix: &str, path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect();
    format!("{}/{}", prefix.trim_end_matches('/'), encoded.join("/"))
}

/// Stores own a runtime, so they can neither be built nor driven from inside
/// another one; dropping or nesting runtimes there panics.
fn outside_runtime() -> Result<(), MediaError> {
    match Handle::try_current() {
        Ok(_) => Err(MediaError::Runtime(
            "media stores block the calling thread; use them outside an async runtime"
                .to_string(),
        )),
        Err(_) => Ok(()),
    }
}

fn runtime() -> Result<Runtime, MediaError> {
    outside_runtime()?;
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| MediaError::Runtime(err.to_string()))
}

fn block_on<F: Future>(runtime: &Runtime, future: F) -> Result<F::Output, MediaError> {
    outside_runtime()?;
    Ok(runtime.block_on(future))
}
