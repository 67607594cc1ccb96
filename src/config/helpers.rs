use std::fs;
use std::path::{Path, PathBuf};

use crate::ast::{Document, Node, NodeKind, Resolved};
use crate::{parser, YamlError};

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_path(raw: &Path) -> Result<PathBuf, YamlError> {
    let Some(rest) = raw.to_str().and_then(|s| s.strip_prefix("~/")) else {
        return Ok(raw.to_path_buf());
    };

    let home = dirs::home_dir().ok_or_else(|| YamlError::FileError {
        message: "Could not determine home directory for ~ expansion".into(),
        path: raw.to_string_lossy().to_string(),
        hint: Some("Set HOME or use an absolute path".into()),
        code: Some(300),
    })?;
    Ok(home.join(rest))
}

/// Read and parse a file. `Ok(None)` means the file holds no document at all.
pub(super) fn read_document(path: &Path) -> Result<Option<Document>, YamlError> {
    let content = fs::read_to_string(path).map_err(|e| YamlError::FileError {
        message: format!("Failed to read file: {}", e),
        path: path.to_string_lossy().to_string(),
        hint: Some("Check that the file exists and is readable".into()),
        code: Some(301),
    })?;

    parser::parse_str(&content)
}

/// A document that parsed to a bare null (`~`, or only a comment) cannot take keys,
/// so it becomes an empty mapping before the first write.
pub(super) fn widen_null_root(root: &mut Node) {
    if let Node::Scalar(scalar) = root {
        if scalar.resolve() == Resolved::Null {
            log::debug!("replacing null document root with an empty mapping");
            *root = Node::empty(NodeKind::Mapping);
        }
    }
}
