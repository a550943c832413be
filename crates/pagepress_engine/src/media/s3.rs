use std::error::Error;

use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::Client;
use pagepress_logging::press_debug;
use tokio::runtime::Runtime;

use super::{block_on, join_url, media_filename, runtime, MediaContext, MediaError, MediaStore};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};

/// Configuration for the S3-compatible media backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    /// Bucket name.
    pub bucket: String,
    /// AWS region.
    pub region: String,
    /// Key prefix inside the bucket; may be empty.
    pub path_prefix: String,
    /// Public base URL that serves the bucket's objects.
    pub url_prefix: String,
    /// S3-compatible endpoint URL (MinIO, LocalStack, ...).
    pub endpoint: Option<String>,
    /// Static credentials; the default AWS provider chain is used when unset.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// Uploads media to object storage. Objects are keyed `{path_prefix}/{filename}`;
/// the page context does not take part in the key.
pub struct S3MediaStore {
    settings: S3Settings,
    client: Client,
    fetcher: Box<dyn Fetcher>,
    runtime: Runtime,
}

impl S3MediaStore {
    pub fn new(settings: S3Settings, fetch: FetchSettings) -> Result<Self, MediaError> {
        let runtime = runtime()?;
        let client = block_on(&runtime, build_client(&settings))?;
        Ok(Self {
            settings,
            client,
            fetcher: Box::new(ReqwestFetcher::new(fetch)),
            runtime,
        })
    }

    pub fn settings(&self) -> &S3Settings {
        &self.settings
    }
}

impl MediaStore for S3MediaStore {
    fn save(&self, url: &str, _context: &MediaContext) -> Result<String, MediaError> {
        let output = block_on(&self.runtime, self.fetcher.fetch(url))?
            .map_err(|source| MediaError::Download {
                url: url.to_string(),
                source,
            })?;

        let filename = media_filename(url, output.metadata.mime_type(), &output.bytes);
        let key = object_key(&self.settings.path_prefix, &filename);

        let upload = self
            .client
            .put_object()
            .bucket(&self.settings.bucket)
            .key(&key)
            .body(output.bytes.into())
            .set_content_type(output.metadata.content_type)
            .send();
        block_on(&self.runtime, upload)?
            .map_err(|e| MediaError::Upload {
                key: key.clone(),
                message: error_chain(&e),
            })?;
        press_debug!("Uploaded {} to s3://{}/{}", url, self.settings.bucket, key);

        Ok(join_url(&self.settings.url_prefix, &filename))
    }
}

async fn build_client(settings: &S3Settings) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(settings.region.clone()));

    if let Some(endpoint) = &settings.endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    if let (Some(key_id), Some(secret)) = (&settings.access_key_id, &settings.secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            key_id,
            secret,
            None,
            None,
            "pagepress-config",
        ));
    }

    let sdk_config = loader.load().await;

    // Custom endpoints need path-style addressing (endpoint/bucket/key).
    if settings.endpoint.is_some() {
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();
        return Client::from_conf(s3_config);
    }

    Client::new(&sdk_config)
}

fn object_key(path_prefix: &str, filename: &str) -> String {
    let prefix = path_prefix.trim_matches('/');
    if prefix.is_empty() {
        filename.to_string()
    } else {
        format!("{prefix}/{filename}")
    }
}

/// Walk the error source chain and join all messages.
fn error_chain(err: &dyn Error) -> String {
    let mut msgs = vec![err.to_string()];
    let mut source = err.source();
    while let Some(s) = source {
        msgs.push(s.to_string());
        source = s.source();
    }
    msgs.join(": ")
}
