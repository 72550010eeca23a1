use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::command::for_each_subpackage;
use crate::error::BundleError;
use crate::meta;
use crate::report::RunReport;

/// Restores every `.meta` file from the backup taken by `patch --backup`.
pub fn revert(root: &Path, delay: Duration) -> Result<RunReport, BundleError> {
    for_each_subpackage("Revert", root, delay, |name| revert_subpackage(root, name))
}

fn revert_subpackage(root: &Path, name: &str) -> Result<(), BundleError> {
    let meta_path = meta::meta_path(root, name);
    let backup = meta::backup_path(&meta_path);
    if !backup.is_file() {
        return Err(BundleError::MissingBackup(backup));
    }

    std::fs::copy(&backup, &meta_path)
        .map_err(|source| BundleError::Restore { path: meta_path.clone(), source })?;
    info!("Restored {} from backup", meta_path.display());

    Ok(())
}
