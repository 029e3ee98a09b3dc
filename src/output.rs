//! Reading and writing the hierarchy document.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::hierarchy::Node;

/// Serialize a tree to JSON.
pub fn to_json(root: &Node, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(root)?
    } else {
        serde_json::to_string(root)?
    };
    Ok(json)
}

/// Write a tree to `path`.
///
/// The document goes to a sibling temporary file first and is renamed into
/// place, so readers never see a partial file.
pub fn write_hierarchy<P: AsRef<Path>>(path: P, root: &Node, pretty: bool) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(root, pretty)?;
    let tmp = temp_path(path);

    fs::write(&tmp, json)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    Ok(())
}

/// Parse a previously written document.
pub fn read_hierarchy<P: AsRef<Path>>(path: P) -> Result<Node> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("hierarchy"));
    name.push(".tmp");
    path.with_file_name(name)
}
