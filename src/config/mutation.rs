use log::debug;
use serde::Serialize;

use super::*;
use crate::ast::Value;
use crate::convert::to_node;
use crate::resolver;

impl YamlConfig {
    fn root_mut(&mut self, path: &str) -> Result<&mut Node, YamlError> {
        let document = self
            .document
            .as_mut()
            .ok_or_else(|| YamlError::not_loaded(path))?;
        Ok(&mut document.root)
    }

    /// Set the value at a dotted path, creating parents as needed.
    ///
    /// Existing scalars are rewritten in place, keeping their position, tag and anchor.
    ///
    /// # Errors
    /// `RuntimeError` when no document is loaded, `AddressError` when a path steps
    /// into a scalar root.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), YamlError> {
        let value = value.into();
        debug!("set '{}' = {}", path, value);

        let root = self.root_mut(path)?;
        helpers::widen_null_root(root);
        resolver::set(root, path, Some(&value))
    }

    /// Delete whatever is at `path`. Removing a missing path does nothing.
    pub fn remove(&mut self, path: &str) -> Result<(), YamlError> {
        debug!("remove '{}'", path);
        let root = self.root_mut(path)?;
        resolver::set(root, path, None)
    }

    /// Store any `Serialize` value (structs, maps, options) at `path`.
    ///
    /// ```
    /// # use std::collections::BTreeMap;
    /// # use yamledit::YamlConfig;
    /// let mut config = YamlConfig::from_str("").unwrap();
    /// let limits = BTreeMap::from([("cpu", 2), ("mem", 512)]);
    /// config.set_serialized("service.limits", &limits).unwrap();
    /// assert_eq!(config.get::<u32>("service.limits.mem").unwrap(), 512);
    /// ```
    pub fn set_serialized<T: Serialize + ?Sized>(&mut self, path: &str, value: &T) -> Result<(), YamlError> {
        let node = to_node(value)?;
        debug!("set '{}' = {}", path, node);

        let root = self.root_mut(path)?;
        helpers::widen_null_root(root);
        resolver::set_node(root, path, node)
    }
}
