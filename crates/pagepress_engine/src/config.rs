//! JSON configuration: where documents go, how media is stored, and how page
//! properties are interpreted.
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pagepress_logging::press_info;
use serde::Deserialize;
use thiserror::Error;

use crate::assemble::DocumentAssembler;
use crate::fetch::FetchSettings;
use crate::media::{LocalMediaStore, MediaError, MediaStore, S3MediaStore, S3Settings};
use crate::metadata::{MetadataProcessor, MetadataSettings, PropertyNames};
use crate::render::RenderOptions;
use crate::template::{DocumentTemplate, JinjaTemplate, TemplateError};

pub const DEFAULT_CONFIG_FILE: &str = "pagepress.config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("media storage setup failed: {0}")]
    Media(#[from] MediaError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub content: ContentConfig,
    pub storage: StorageConfig,
    pub notion: NotionConfig,
    pub render: RenderOptions,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentConfig {
    /// Output root for Markdown documents.
    pub folder: PathBuf,
    /// Template file; the built-in archetype is used when absent.
    pub archetype: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Local,
    S3,
    /// Media URLs are left untouched.
    #[default]
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub kind: StorageKind,
    pub local: LocalStorageConfig,
    pub s3: S3StorageConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalStorageConfig {
    pub path: PathBuf,
    pub url_prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct S3StorageConfig {
    pub bucket: String,
    pub region: String,
    pub path_prefix: String,
    pub url_prefix: String,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotionConfig {
    pub status: StatusConfig,
    pub category_map: BTreeMap<String, String>,
    pub properties: PropertyNames,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusConfig {
    pub draft: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            draft: "Draft".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub redirect_limit: usize,
    pub max_bytes: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            connect_timeout_secs: None,
            request_timeout_secs: None,
            redirect_limit: settings.redirect_limit,
            max_bytes: settings.max_bytes,
        }
    }
}

impl From<&FetchConfig> for FetchSettings {
    fn from(config: &FetchConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: config.request_timeout_secs.map(Duration::from_secs),
            redirect_limit: config.redirect_limit,
            max_bytes: config.max_bytes,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        press_info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Checks the settings that would otherwise fail halfway through a batch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content.folder.as_os_str().is_empty() {
            return Err(invalid("content.folder must not be empty"));
        }
        if let Some(archetype) = &self.content.archetype {
            if !archetype.is_file() {
                return Err(invalid(format!(
                    "content.archetype {} does not exist",
                    archetype.display()
                )));
            }
        }

        match self.storage.kind {
            StorageKind::Local => {
                if self.storage.local.path.as_os_str().is_empty() {
                    return Err(invalid("storage.local.path must not be empty"));
                }
            }
            StorageKind::S3 => {
                let s3 = &self.storage.s3;
                for (field, value) in [
                    ("bucket", &s3.bucket),
                    ("region", &s3.region),
                    ("urlPrefix", &s3.url_prefix),
                ] {
                    if value.trim().is_empty() {
                        return Err(invalid(format!("storage.s3.{field} must not be empty")));
                    }
                }
            }
            StorageKind::None => {}
        }
        Ok(())
    }

    pub fn metadata_settings(&self) -> MetadataSettings {
        MetadataSettings {
            category_map: self.notion.category_map.clone(),
            draft_status: self.notion.status.draft.clone(),
            properties: self.notion.properties.clone(),
        }
    }

    pub fn template(&self) -> Result<Box<dyn DocumentTemplate>, ConfigError> {
        let template = match &self.content.archetype {
            Some(path) => JinjaTemplate::from_file(path)?,
            None => JinjaTemplate::builtin()?,
        };
        Ok(Box::new(template))
    }

    /// The configured media backend, or `None` for `storage.type = "none"`.
    pub fn media_store(&self) -> Result<Option<Box<dyn MediaStore>>, ConfigError> {
        let fetch = FetchSettings::from(&self.fetch);
        let store: Box<dyn MediaStore> = match self.storage.kind {
            StorageKind::None => return Ok(None),
            StorageKind::Local => {
                let local = &self.storage.local;
                Box::new(LocalMediaStore::new(
                    local.path.clone(),
                    local.url_prefix.clone(),
                    fetch,
                )?)
            }
            StorageKind::S3 => {
                let s3 = &self.storage.s3;
                Box::new(S3MediaStore::new(
                    S3Settings {
                        bucket: s3.bucket.clone(),
                        region: s3.region.clone(),
                        path_prefix: s3.path_prefix.clone(),
                        url_prefix: s3.url_prefix.clone(),
                        endpoint: s3.endpoint.clone(),
                        access_key_id: s3.access_key_id.clone(),
                        secret_access_key: s3.secret_access_key.clone(),
                    },
                    fetch,
                )?)
            }
        };
        Ok(Some(store))
    }

    /// Validates and wires up the full conversion pipeline.
    pub fn build_assembler(&self) -> Result<DocumentAssembler, ConfigError> {
        self.validate()?;

        let mut assembler = DocumentAssembler::new(
            MetadataProcessor::new(self.metadata_settings()),
            self.template()?,
            self.content.folder.clone(),
        )
        .with_render_options(self.render);
        if let Some(media) = self.media_store()? {
            assembler = assembler.with_media(media);
        }
        Ok(assembler)
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}
