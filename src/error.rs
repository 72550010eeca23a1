use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering or processing sub-packages.
///
/// `MissingRoot` and `ReadRoot` abort the whole run, everything else is
/// scoped to a single sub-package.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Sub-package directory does not exist: {}", .0.display())]
    MissingRoot(PathBuf),
    #[error("Failed to read sub-package directory {}: {source}", path.display())]
    ReadRoot {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Sub-package directory does not exist: {}", .0.display())]
    MissingSubpackageDir(PathBuf),
    #[error("Couldn't find .meta file: {}", .0.display())]
    MissingMetadataFile(PathBuf),
    #[error("Couldn't find backup file: {}", .0.display())]
    MissingBackup(PathBuf),
    #[error("Failed to process .meta file {}: {source}", path.display())]
    MetadataProcessing {
        path: PathBuf,
        #[source]
        source: MetaFileError,
    },
    #[error("Failed to restore {} from backup: {source}", path.display())]
    Restore {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum MetaFileError {
    #[error("Failed to read file: {0}")]
    Read(#[source] io::Error),
    #[error("{0}")]
    Parse(#[source] serde_json::Error),
    #[error("Top level of the document is not an object")]
    NotAnObject,
    #[error("Key {0:?} exists but is not an object")]
    GroupNotAnObject(String),
    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to create backup: {0}")]
    Backup(#[source] io::Error),
    #[error("Failed to write file: {0}")]
    Write(#[source] io::Error),
}
