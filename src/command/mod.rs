use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{error, info};

use crate::error::BundleError;
use crate::report::RunReport;
use crate::scan;

pub const SUBPACKAGES_DIR: &str = "assets/subpackages";

pub mod patch;
pub mod revert;

/// Finds the sub-package root when none was given on the command line.
///
/// Looks in the current directory first, then next to the executable. If neither exists the
/// current directory candidate is returned so discovery reports it as missing.
pub fn resolve_root(root: &Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(root) = root {
        return Ok(root.clone());
    }

    let cwd_root = std::env::current_dir()?.join(SUBPACKAGES_DIR);
    if cwd_root.is_dir() {
        return Ok(cwd_root);
    }

    let exe_root = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SUBPACKAGES_DIR)));
    match exe_root {
        Some(exe_root) if exe_root.is_dir() => Ok(exe_root),
        _ => Ok(cwd_root),
    }
}

/// Runs `action` for every sub-package under `root` in name order.
///
/// Discovery errors abort before anything is processed. Errors returned by `action` are recorded
/// in the report and don't stop the remaining sub-packages.
pub fn for_each_subpackage<F>(
    label: &'static str,
    root: &Path,
    delay: Duration,
    mut action: F,
) -> Result<RunReport, BundleError>
where
    F: FnMut(&str) -> Result<(), BundleError>,
{
    info!("Sub-package directory: {}", root.display());
    let subpackages = scan::list_subpackages(root)?;
    info!("Found {} sub-packages", subpackages.len());

    let total = subpackages.len();
    let mut report = RunReport::new(label, total);
    for (i, name) in subpackages.iter().enumerate() {
        info!("[{}/{}] Processing sub-package: {}", i + 1, total, name);
        match action(name) {
            Ok(()) => {
                report.record_success();
                info!("{} done", name);
            }
            Err(e) => {
                error!("{} failed: {}", name, e);
                report.record_failure(name, e.to_string());
            }
        }

        if !delay.is_zero() && i + 1 < total {
            thread::sleep(delay);
        }
    }

    Ok(report)
}
