// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::ast::{Document, Node, Resolved};
use crate::YamlError;

/// Plain scalars are written as the type they read as, so `port: 8080` stays an
/// integer and `name: '8080'` stays a string after a save.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Scalar(scalar) => match scalar.resolve() {
                Resolved::Null => serializer.serialize_unit(),
                Resolved::Bool(b) => serializer.serialize_bool(b),
                Resolved::Int(n) => serializer.serialize_i64(n),
                Resolved::UInt(n) => serializer.serialize_u64(n),
                Resolved::Float(x) => serializer.serialize_f64(x),
                Resolved::Str(s) => serializer.serialize_str(s),
            },
            Node::Sequence(seq) => {
                let mut out = serializer.serialize_seq(Some(seq.items.len()))?;
                for item in &seq.items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            Node::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.entries.len()))?;
                for (key, value) in &map.entries {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

/// Export a node to YAML text.
///
/// Anchors are not written; aliases were already expanded when the document was parsed.
///
/// # Examples
/// ```
/// use yamledit::{Node, export};
///
/// let node = Node::mapping(vec![(Node::scalar("port"), Node::scalar("8080"))]);
/// assert_eq!(export::export_node(&node).unwrap(), "port: 8080\n");
/// ```
pub fn export_node(node: &Node) -> Result<String, YamlError> {
    serde_yaml::to_string(node).map_err(|e| YamlError::encode(e.to_string()))
}

pub fn export_document(doc: &Document) -> Result<String, YamlError> {
    export_node(&doc.root)
}

/// Write a document to `path`, creating the file if it does not exist.
///
/// # Errors
/// Returns error if the document cannot be emitted or the file cannot be written.
pub fn export_file(doc: &Document, path: &Path) -> Result<(), YamlError> {
    let text = export_document(doc)?;
    fs::write(path, text).map_err(|e| {
        YamlError::file_error(
            format!("Failed to write file: {}", e),
            path.to_string_lossy().to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Scalar, ScalarStyle};
    use crate::parser::parse_str;

    #[test]
    fn test_export_keeps_scalar_types() {
        let input = "name: '8080'\nport: 8080\nratio: 0.5\nenabled: true\nmissing: ~\n";
        let doc = parse_str(input).unwrap().unwrap();

        let output = export_document(&doc).expect("Failed to export document");
        println!("--- Exported YAML ---\n{}", output);

        let reparsed = parse_str(&output).unwrap().unwrap();
        let root = reparsed.root.as_mapping().unwrap();
        match root.get("name") {
            Some(Node::Scalar(Scalar { value, style, .. })) => {
                assert_eq!(value, "8080");
                assert_ne!(*style, ScalarStyle::Plain);
            }
            other => panic!("Expected quoted scalar, got {:?}", other),
        }
        assert_eq!(root.get("port").and_then(Node::as_str), Some("8080"));
        assert_eq!(root.get("enabled").and_then(Node::as_str), Some("true"));
    }

    #[test]
    fn test_export_preserves_order_and_nesting() {
        let input = "zeta: 1\nalpha:\n  - x\n  - y: 2\nmid: text\n";
        let doc = parse_str(input).unwrap().unwrap();

        let reparsed = parse_str(&export_document(&doc).unwrap()).unwrap().unwrap();
        let keys: Vec<String> = reparsed.root.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(reparsed.root.to_string(), doc.root.to_string());
    }

    #[test]
    fn test_export_file_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.yaml");
        let doc = Document::new(Node::mapping(vec![(Node::scalar("a"), Node::scalar("b"))]));

        export_file(&doc, &path).expect("Failed to write file");
        assert_eq!(fs::read_to_string(&path).unwrap(), "a: b\n");
    }
}
