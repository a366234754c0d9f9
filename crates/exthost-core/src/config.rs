//! Per-extension configuration handle.
//!
//! Each instance owns an [`ExtensionConfig`] pointing at
//! `<data directory>/config.yml`. The handle exists from construction but
//! the file is read lazily, the first time the host's `config` accessor is
//! used. Keys may be dotted paths into nested mappings (`chat.prefix`).

use exthost_fs::{ConfigStore, NormalizedPath, io};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// File name of the per-extension configuration file.
pub const CONFIG_FILENAME: &str = "config.yml";

#[derive(Debug, Clone)]
pub struct ExtensionConfig {
    path: NormalizedPath,
    values: Mapping,
    loaded: bool,
}

impl ExtensionConfig {
    pub fn new(path: NormalizedPath) -> Self {
        Self {
            path,
            values: Mapping::new(),
            loaded: false,
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Read the file, replacing any in-memory values.
    ///
    /// A missing or blank file loads as an empty mapping.
    pub fn load(&mut self) -> Result<()> {
        let content = if self.path.is_file() {
            io::read_text(&self.path)?
        } else {
            String::new()
        };
        self.values = if content.trim().is_empty() {
            Mapping::new()
        } else {
            match ConfigStore::new().parse::<Value>(&self.path, &content)? {
                Value::Mapping(mapping) => mapping,
                Value::Null => Mapping::new(),
                _ => {
                    return Err(Error::InvalidConfig {
                        path: self.path.to_native(),
                        reason: "top level must be a mapping".into(),
                    });
                }
            }
        };
        self.loaded = true;
        tracing::debug!(path = %self.path, keys = self.values.len(), "Loaded extension config");
        Ok(())
    }

    /// Load the file unless it has already been loaded.
    pub fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            self.load()?;
        }
        Ok(())
    }

    /// Write the current values back to the file.
    pub fn save(&self) -> Result<()> {
        ConfigStore::new().save(&self.path, &self.values)?;
        Ok(())
    }

    pub fn values(&self) -> &Mapping {
        &self.values
    }

    /// Top-level keys that are strings.
    pub fn keys(&self) -> Vec<&str> {
        self.values.keys().filter_map(Value::as_str).collect()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.values.get(first)?;
        for segment in segments {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Set `key`, creating intermediate mappings. A non-mapping value in the
    /// way is replaced by a mapping.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let segments: Vec<&str> = key.split('.').collect();
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return,
        };

        let mut current = &mut self.values;
        for segment in parents {
            let slot = current
                .entry(Value::from(*segment))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if !slot.is_mapping() {
                *slot = Value::Mapping(Mapping::new());
            }
            let Value::Mapping(mapping) = slot else {
                return;
            };
            current = mapping;
        }
        current.insert(Value::from(*last), value.into());
    }
}
