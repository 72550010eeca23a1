use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::command::for_each_subpackage;
use crate::command::patch::meta_patcher::patch_document;
use crate::error::{BundleError, MetaFileError};
use crate::meta;
use crate::report::RunReport;

pub mod meta_patcher;

pub const DEFAULT_PLATFORM: &str = "honor-minigame";
pub const DEFAULT_DELAY_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOptions {
    pub platforms: Vec<String>,
    pub mark_bundle: bool,
    pub backup: bool,
    pub dry_run: bool,
    pub delay: Duration,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            platforms: vec![DEFAULT_PLATFORM.to_string()],
            mark_bundle: false,
            backup: false,
            dry_run: false,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

pub fn patch(root: &Path, options: &PatchOptions) -> Result<RunReport, BundleError> {
    info!("Patching bundle config for platforms: {}", options.platforms.join(", "));
    if options.dry_run {
        info!("Dry run, no files will be written");
    }

    for_each_subpackage("Patch", root, options.delay, |name| {
        patch_subpackage(root, name, options).map(|_| ())
    })
}

/// Patches the `.meta` file of a single sub-package and returns the keys that were added.
pub fn patch_subpackage(root: &Path, name: &str, options: &PatchOptions) -> Result<Vec<String>, BundleError> {
    let dir = root.join(name);
    if !dir.is_dir() {
        return Err(BundleError::MissingSubpackageDir(dir));
    }

    let meta_path = meta::meta_path(root, name);
    if !meta_path.is_file() {
        return Err(BundleError::MissingMetadataFile(meta_path));
    }

    let inserted = patch_meta_file(&meta_path, name, options)
        .map_err(|source| BundleError::MetadataProcessing { path: meta_path.clone(), source })?;

    if inserted.is_empty() {
        info!("{} already configured", name);
    }
    for key in &inserted {
        if options.dry_run {
            info!("Would add {}", key);
        } else {
            debug!("Added {}", key);
        }
    }

    Ok(inserted)
}

fn patch_meta_file(path: &Path, name: &str, options: &PatchOptions) -> Result<Vec<String>, MetaFileError> {
    let mut doc = meta::read_document(path)?;
    let inserted = patch_document(&mut doc, name, &options.platforms, options.mark_bundle)?;
    let content = meta::to_pretty_bytes(&doc)?;

    if options.dry_run {
        return Ok(inserted);
    }

    if options.backup {
        if let Some(backup) = meta::backup(path)? {
            debug!("Created backup {}", backup.display());
        }
    }
    meta::write_atomic(path, &content)?;

    Ok(inserted)
}
