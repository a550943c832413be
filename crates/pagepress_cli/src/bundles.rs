use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pagepress_engine::PageBundle;
use pagepress_logging::{press_debug, press_error};

/// Page bundles read from an input directory, in file name order.
#[derive(Debug, Default)]
pub struct LoadedBundles {
    pub bundles: Vec<PageBundle>,
    /// Files that could not be read or parsed.
    pub unreadable: Vec<PathBuf>,
}

/// Reads every `*.json` file directly inside `dir` as a [`PageBundle`].
///
/// A broken file is logged and listed in `unreadable`; only an unreadable
/// directory is an error.
pub fn load_bundles(dir: &Path) -> Result<LoadedBundles> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read input directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to list {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut loaded = LoadedBundles::default();
    for path in paths {
        match read_bundle(&path) {
            Ok(bundle) => {
                press_debug!("Loaded page {} from {}", bundle.page.id, path.display());
                loaded.bundles.push(bundle);
            }
            Err(err) => {
                press_error!("Skipping unreadable bundle {}: {:#}", path.display(), err);
                loaded.unreadable.push(path);
            }
        }
    }
    Ok(loaded)
}

fn read_bundle(path: &Path) -> Result<PageBundle> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
