use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use crate::error::BundleError;

/// Lists the names of the immediate child directories of `root`, sorted by name.
///
/// Every directory found is treated as a sub-package. Plain files (including the `.meta`
/// sidecars living next to the directories) are ignored.
pub fn list_subpackages(root: &Path) -> Result<Vec<String>, BundleError> {
    if !root.is_dir() {
        return Err(BundleError::MissingRoot(root.to_path_buf()));
    }

    let mut names = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // the root itself couldn't be read
            Err(e) if e.depth() == 0 => {
                return Err(BundleError::ReadRoot { path: root.to_path_buf(), source: e });
            }
            // broken symlinks etc.
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        match entry.file_name().to_str() {
            Some(name) => names.push(name.to_string()),
            None => warn!("Skipping directory with non UTF-8 name: {}", entry.path().display()),
        }
    }

    Ok(names)
}
