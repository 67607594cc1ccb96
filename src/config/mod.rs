// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::ast::{Document, Node};
use crate::export;
use crate::parser;
use crate::YamlError;

mod access;
mod helpers;
mod mutation;

/// A YAML file held in memory as a node tree, addressed with dotted paths.
///
/// Loading never fails loudly: a missing or malformed file leaves the config
/// without a document and `load` returns `false`.
#[derive(Debug, Clone)]
pub struct YamlConfig {
    path: PathBuf,
    loaded: bool,
    document: Option<Document>,
}

impl YamlConfig {
    /// A config bound to `path` holding an empty mapping. Nothing is read from disk.
    ///
    /// # Example
    /// ```
    /// # use yamledit::YamlConfig;
    /// let mut config = YamlConfig::new("settings.yaml");
    /// config.set("server.port", 8080).unwrap();
    /// assert_eq!(config.get::<u16>("server.port").unwrap(), 8080);
    /// assert!(!config.is_loaded());
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let raw = path.as_ref();
        let path = helpers::expand_path(raw).unwrap_or_else(|e| {
            warn!("{}; using '{}' as given", e, raw.display());
            raw.to_path_buf()
        });

        Self {
            path,
            loaded: false,
            document: Some(Document::empty()),
        }
    }

    /// Bind to `path` and load it right away. Check [`is_loaded`](Self::is_loaded) for the outcome.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let mut config = Self::new(path);
        config.load();
        config
    }

    /// Parse a config from a string (no file I/O). Empty input gives an empty mapping.
    ///
    /// # Errors
    /// Returns the parser's `SyntaxError` for malformed YAML.
    pub fn from_str(content: &str) -> Result<Self, YamlError> {
        let document = parser::parse_str(content)?.unwrap_or_else(Document::empty);
        Ok(Self {
            path: PathBuf::new(),
            loaded: true,
            document: Some(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the last load succeeded (always true for [`from_str`](Self::from_str)).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn root(&self) -> Option<&Node> {
        self.document.as_ref().map(|doc| &doc.root)
    }

    /// Reload from the bound path.
    pub fn load(&mut self) -> bool {
        let path = self.path.clone();
        self.load_from(path)
    }

    /// Read and parse `path`, which becomes the bound path for later saves.
    ///
    /// On any failure the document is dropped, a warning is logged and `false` is returned.
    pub fn load_from<P: AsRef<Path>>(&mut self, path: P) -> bool {
        self.loaded = false;
        self.document = None;

        let path = match helpers::expand_path(path.as_ref()) {
            Ok(path) => path,
            Err(e) => {
                warn!("{}", e);
                return false;
            }
        };
        self.path = path;

        match helpers::read_document(&self.path) {
            Ok(Some(document)) => {
                info!("loaded YAML document from '{}'", self.path.display());
                self.document = Some(document);
                self.loaded = true;
            }
            Ok(None) => warn!("'{}' contains no YAML document", self.path.display()),
            Err(e) => warn!("could not load '{}': {}", self.path.display(), e),
        }
        self.loaded
    }

    /// Write the document back to the bound path.
    pub fn save(&self) -> Result<(), YamlError> {
        self.save_to(&self.path)
    }

    /// Write the document to `path`, creating the file if needed.
    ///
    /// # Errors
    /// `RuntimeError` when there is no document, `FileError` when the write fails.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), YamlError> {
        let path = helpers::expand_path(path.as_ref())?;
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| YamlError::not_loaded(&path.to_string_lossy()))?;

        export::export_file(document, &path)?;
        info!("saved YAML document to '{}'", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests;
