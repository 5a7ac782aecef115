//! Name -> group registry.
//!
//! The registry is an ordinary value owned by the application and handed to
//! whatever needs to resolve groups by name (the peer server in particular).
//! Several registries can coexist in one process, which keeps tests
//! independent of each other.

use crate::error::{Error, Result};
use crate::group::{Group, GroupConfig};
use crate::loader::Loader;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Registry of groups, at most one per name. Groups are never removed.
#[derive(Debug, Default)]
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a group with the default configuration and the
    /// given cache size.
    pub fn new_group(
        &self,
        name: impl Into<String>,
        cache_bytes: usize,
        loader: impl Loader,
    ) -> Result<Arc<Group>> {
        self.register(Group::new(
            name,
            GroupConfig::with_cache_bytes(cache_bytes),
            loader,
        ))
    }

    /// Create and register a group with an explicit configuration.
    pub fn new_group_with_config(
        &self,
        name: impl Into<String>,
        config: GroupConfig,
        loader: impl Loader,
    ) -> Result<Arc<Group>> {
        self.register(Group::new(name, config, loader))
    }

    /// Register an existing group.
    ///
    /// # Errors
    /// [`Error::DuplicateGroup`] if the name is taken.
    pub fn register(&self, group: Group) -> Result<Arc<Group>> {
        let mut groups = self.groups.write();
        if groups.contains_key(group.name()) {
            return Err(Error::DuplicateGroup(group.name().to_string()));
        }

        let group = Arc::new(group);
        groups.insert(group.name().to_string(), Arc::clone(&group));
        info!(group = group.name(), cache_bytes = group.config().cache_bytes, "registered group");
        Ok(group)
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Registered group names, sorted.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    /// True if no group is registered.
    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoaderFn;

    fn loader() -> impl Loader {
        LoaderFn::new(|key: String| async move { Ok(key.into_bytes()) })
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = Registry::new();
        let group = registry.new_group("scores", 1024, loader()).unwrap();

        let found = registry.group("scores").unwrap();
        assert!(Arc::ptr_eq(&group, &found));
        assert!(registry.group("unknown").is_none());
        assert_eq!(registry.group_names(), vec!["scores"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let registry = Registry::new();
        registry.new_group("scores", 1024, loader()).unwrap();

        let err = registry.new_group("scores", 2048, loader()).unwrap_err();
        assert_eq!(err, Error::DuplicateGroup("scores".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registries_are_independent() {
        let first = Registry::new();
        let second = Registry::new();
        first.new_group("scores", 0, loader()).unwrap();

        assert!(second.group("scores").is_none());
        assert!(second.is_empty());
        second.new_group("scores", 0, loader()).unwrap();
    }
}
