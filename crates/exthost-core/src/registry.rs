//! Registry of constructed extension instances.
//!
//! Entries are keyed by the normalized load path and record the source
//! file's modification time at construction. A secondary index resolves a
//! logical extension name to the most recently registered instance.
//!
//! The registry is plain single-owner state. It is owned by the
//! [`ExtensionHost`](crate::ExtensionHost) and is only ever mutated through
//! `&mut`, so the host's control thread is the only writer.

use std::collections::HashMap;
use std::fmt;
use std::time::SystemTime;

use exthost_fs::{NormalizedPath, io};

use crate::error::Result;
use crate::instance::ExtensionInstance;

/// Identifier of a constructed extension instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtensionId(u64);

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Resolves a logical extension name to a live instance.
pub trait ExtensionLookup {
    fn lookup(&self, name: &str) -> Option<&ExtensionInstance>;
}

/// A registered instance and the source modification time it was loaded at.
#[derive(Debug)]
pub struct RegistryEntry {
    path: NormalizedPath,
    instance: ExtensionInstance,
    source_modified: SystemTime,
}

impl RegistryEntry {
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn instance(&self) -> &ExtensionInstance {
        &self.instance
    }

    pub fn source_modified(&self) -> SystemTime {
        self.source_modified
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<NormalizedPath, RegistryEntry>,
    ids: HashMap<ExtensionId, NormalizedPath>,
    names: HashMap<String, ExtensionId>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn allocate_id(&mut self) -> ExtensionId {
        self.next_id += 1;
        ExtensionId(self.next_id)
    }

    /// Register `instance` under its normalized load path.
    ///
    /// Reads the source file's modification time; fails if the file cannot
    /// be inspected. An existing entry for the same path is replaced.
    pub(crate) fn register(&mut self, instance: ExtensionInstance) -> Result<ExtensionId> {
        let modified = io::modified_time(instance.path())?;
        Ok(self.insert(instance, modified))
    }

    pub(crate) fn insert(&mut self, instance: ExtensionInstance, modified: SystemTime) -> ExtensionId {
        let id = instance.id();
        let path = instance.path().clone();
        let name = instance.descriptor().name().to_string();

        if let Some(previous) = self.entries.remove(&path) {
            let previous_id = previous.instance.id();
            self.ids.remove(&previous_id);
            let previous_name = previous.instance.descriptor().name();
            if self.names.get(previous_name) == Some(&previous_id) {
                self.reindex_name(previous_name);
            }
            tracing::debug!(%path, %previous_id, %id, "Replacing registry entry");
        }

        tracing::debug!(%path, %id, name = %name, "Registered extension");
        self.ids.insert(id, path.clone());
        self.names.insert(name, id);
        self.entries.insert(
            path.clone(),
            RegistryEntry {
                path,
                instance,
                source_modified: modified,
            },
        );
        id
    }

    /// Point `name` at the newest remaining instance carrying it, or drop it.
    fn reindex_name(&mut self, name: &str) {
        let newest = self
            .entries
            .values()
            .filter(|entry| entry.instance.descriptor().name() == name)
            .map(|entry| entry.instance.id())
            .max();
        match newest {
            Some(id) => {
                self.names.insert(name.to_string(), id);
            }
            None => {
                self.names.remove(name);
            }
        }
    }

    pub fn get(&self, id: ExtensionId) -> Option<&ExtensionInstance> {
        self.ids
            .get(&id)
            .and_then(|path| self.entries.get(path))
            .map(|entry| &entry.instance)
    }

    pub(crate) fn get_mut(&mut self, id: ExtensionId) -> Option<&mut ExtensionInstance> {
        let path = self.ids.get(&id)?;
        self.entries.get_mut(path).map(|entry| &mut entry.instance)
    }

    /// Look up an entry by load path; the path is normalized first.
    pub fn entry(&self, path: impl Into<NormalizedPath>) -> Option<&RegistryEntry> {
        self.entries.get(&path.into())
    }

    pub fn source_modified(&self, path: impl Into<NormalizedPath>) -> Option<SystemTime> {
        self.entry(path).map(RegistryEntry::source_modified)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// All registered load paths, sorted.
    pub fn paths(&self) -> Vec<&NormalizedPath> {
        let mut paths: Vec<&NormalizedPath> = self.entries.keys().collect();
        paths.sort();
        paths
    }

    pub fn instances(&self) -> impl Iterator<Item = &ExtensionInstance> {
        self.entries.values().map(|entry| &entry.instance)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ExtensionLookup for Registry {
    fn lookup(&self, name: &str) -> Option<&ExtensionInstance> {
        self.names.get(name).and_then(|id| self.get(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ExtensionDescriptor;
    use crate::kind::{ExtensionDefinition, KindTable};

    fn instance(registry: &mut Registry, path: &str, name: &str) -> ExtensionInstance {
        let mut kinds = KindTable::new();
        let kind = kinds.define(ExtensionDefinition::builder(name, "1").build());
        ExtensionInstance::new(
            registry.allocate_id(),
            kind,
            NormalizedPath::new(path),
            ExtensionDescriptor::new(name, "1", "none"),
        )
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.lookup("anything").is_none());
    }

    #[test]
    fn test_windows_path_hits_same_entry() {
        let mut registry = Registry::new();
        let ext = instance(&mut registry, "a\\b\\ext.ext", "Ext");
        let id = registry.insert(ext, SystemTime::UNIX_EPOCH);

        let entry = registry.entry("a/b/ext.ext").unwrap();
        assert_eq!(entry.instance().id(), id);
        assert_eq!(entry.path().as_str(), "a/b/ext.ext");
        assert_eq!(registry.source_modified("a\\b\\ext.ext"), Some(SystemTime::UNIX_EPOCH));
    }

    #[test]
    fn test_lookup_by_name() {
        let mut registry = Registry::new();
        let core = instance(&mut registry, "plugins/core.ext", "Core");
        let id = registry.insert(core, SystemTime::UNIX_EPOCH);

        assert_eq!(registry.lookup("Core").map(|i| i.id()), Some(id));
        assert!(registry.contains_name("Core"));
        assert!(registry.lookup("core").is_none());
    }

    #[test]
    fn test_same_path_replaces_entry() {
        let mut registry = Registry::new();
        let first = instance(&mut registry, "plugins/core.ext", "Core");
        let first_id = registry.insert(first, SystemTime::UNIX_EPOCH);
        let second = instance(&mut registry, "plugins\\core.ext", "Core");
        let second_id = registry.insert(second, SystemTime::UNIX_EPOCH);

        assert_ne!(first_id, second_id);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(first_id).is_none());
        assert_eq!(registry.lookup("Core").map(|i| i.id()), Some(second_id));
    }

    #[test]
    fn test_replacing_renamed_entry_drops_old_name() {
        let mut registry = Registry::new();
        let old = instance(&mut registry, "plugins/x.ext", "Old");
        registry.insert(old, SystemTime::UNIX_EPOCH);
        let new = instance(&mut registry, "plugins/x.ext", "New");
        registry.insert(new, SystemTime::UNIX_EPOCH);

        assert!(!registry.contains_name("Old"));
        assert!(registry.contains_name("New"));
    }

    #[test]
    fn test_replacing_renamed_entry_falls_back_to_other_instance() {
        let mut registry = Registry::new();
        let one = instance(&mut registry, "one/core.ext", "Core");
        let one_id = registry.insert(one, SystemTime::UNIX_EPOCH);
        let two = instance(&mut registry, "two/core.ext", "Core");
        registry.insert(two, SystemTime::UNIX_EPOCH);
        let other = instance(&mut registry, "two/core.ext", "Other");
        let other_id = registry.insert(other, SystemTime::UNIX_EPOCH);

        assert_eq!(registry.lookup("Core").map(|i| i.id()), Some(one_id));
        assert_eq!(registry.lookup("Other").map(|i| i.id()), Some(other_id));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_latest_registration_wins_name() {
        let mut registry = Registry::new();
        let a = instance(&mut registry, "one/core.ext", "Core");
        registry.insert(a, SystemTime::UNIX_EPOCH);
        let b = instance(&mut registry, "two/core.ext", "Core");
        let b_id = registry.insert(b, SystemTime::UNIX_EPOCH);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("Core").map(|i| i.id()), Some(b_id));
        assert_eq!(
            registry.paths().iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            vec!["one/core.ext", "two/core.ext"]
        );
    }
}
