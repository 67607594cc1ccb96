use serde::Deserialize;

use super::*;
use crate::resolver;
use crate::stream::from_node;

impl YamlConfig {
    /// The node at a dotted path, or `None` when nothing is there.
    ///
    /// An empty path addresses the document root.
    ///
    /// # Errors
    /// `AddressError` when the path tries to step into a scalar.
    pub fn get_node(&self, path: &str) -> Result<Option<&Node>, YamlError> {
        if path.is_empty() {
            return Ok(self.root());
        }
        resolver::resolve(self.root(), path)
    }

    /// Decode the value at a dotted path into any `Deserialize` type.
    ///
    /// # Examples
    /// ```
    /// # use yamledit::YamlConfig;
    /// # fn main() -> Result<(), yamledit::YamlError> {
    /// let config = YamlConfig::from_str("server:\n  host: localhost\n  ports: [80, 443]\n")?;
    /// let host: &str = config.get("server.host")?;
    /// let ports: Vec<u16> = config.get("server.ports")?;
    /// assert_eq!((host, ports), ("localhost", vec![80, 443]));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// `PathNotFound` if nothing is at the path, `DecodeError` if the shape does not fit `T`.
    pub fn get<'a, T: Deserialize<'a>>(&'a self, path: &str) -> Result<T, YamlError> {
        let node = self
            .get_node(path)?
            .ok_or_else(|| YamlError::path_not_found(path))?;
        from_node(node).map_err(|e| e.at_path(path))
    }

    /// Like [`get`](Self::get), but an absent path is `Ok(None)`.
    pub fn get_optional<'a, T: Deserialize<'a>>(&'a self, path: &str) -> Result<Option<T>, YamlError> {
        match self.get_node(path)? {
            Some(node) => from_node(node).map(Some).map_err(|e| e.at_path(path)),
            None => Ok(None),
        }
    }

    /// Get a value with a fallback default.
    ///
    /// ```
    /// # use yamledit::YamlConfig;
    /// let config = YamlConfig::from_str("debug: true\n").unwrap();
    /// assert_eq!(config.get_or("server.timeout", 30u64), 30);
    /// assert!(config.get_or("debug", false));
    /// ```
    pub fn get_or<'a, T: Deserialize<'a>>(&'a self, path: &str, default: T) -> T {
        self.get(path).unwrap_or(default)
    }

    pub fn has(&self, path: &str) -> bool {
        matches!(self.get_node(path), Ok(Some(_)))
    }

    /// Key texts of the mapping at `path`, in document order.
    pub fn get_keys(&self, path: &str) -> Result<Vec<String>, YamlError> {
        match self.get_node(path)? {
            Some(Node::Mapping(mapping)) => Ok(mapping.keys().collect()),
            Some(other) => Err(YamlError::AddressError {
                message: format!("Expected a mapping, found a {:?}", other.kind()),
                segment: path.to_string(),
                hint: Some("Only mappings have keys".into()),
                code: Some(306),
            }),
            None => Err(YamlError::path_not_found(path)),
        }
    }
}
