use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};
use tempfile::NamedTempFile;

use crate::error::MetaFileError;

pub type MetaDocument = Map<String, Value>;

pub const META_EXTENSION: &str = "meta";
pub const BACKUP_SUFFIX: &str = "-bak";

const INDENT: &[u8] = b"  ";

/// Path of the `.meta` sidecar of a sub-package. It lives next to the sub-package directory,
/// not inside it.
pub fn meta_path(root: &Path, subpackage: &str) -> PathBuf {
    root.join(format!("{}.{}", subpackage, META_EXTENSION))
}

pub fn backup_path(meta: &Path) -> PathBuf {
    let mut name = meta.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

pub fn read_document(path: &Path) -> Result<MetaDocument, MetaFileError> {
    let content = fs::read_to_string(path).map_err(MetaFileError::Read)?;
    parse_document(&content)
}

pub fn parse_document(content: &str) -> Result<MetaDocument, MetaFileError> {
    match serde_json::from_str(content).map_err(MetaFileError::Parse)? {
        Value::Object(map) => Ok(map),
        _ => Err(MetaFileError::NotAnObject),
    }
}

/// Serializes with a two space indent. Non-ASCII characters are written as-is.
pub fn to_pretty_bytes(doc: &MetaDocument) -> Result<Vec<u8>, MetaFileError> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    doc.serialize(&mut serializer).map_err(MetaFileError::Serialize)?;
    Ok(out)
}

/// Replaces the content of `path` by writing to a temp file in the same directory first and
/// renaming it over the original. The original's permissions carry over to the new file.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), MetaFileError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(MetaFileError::Write)?;
    temp.write_all(content).map_err(MetaFileError::Write)?;
    temp.as_file().sync_all().map_err(MetaFileError::Write)?;
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions()).map_err(MetaFileError::Write)?;
    }
    temp.persist(path).map_err(|e| MetaFileError::Write(e.error))?;
    Ok(())
}

/// Copies `path` to its `-bak` sibling. An existing backup is kept, so it always holds the
/// oldest version of the file.
pub fn backup(path: &Path) -> Result<Option<PathBuf>, MetaFileError> {
    let backup = backup_path(path);
    if backup.exists() {
        return Ok(None);
    }
    fs::copy(path, &backup).map_err(MetaFileError::Backup)?;
    Ok(Some(backup))
}
