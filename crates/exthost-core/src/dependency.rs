//! Dependency declarations.
//!
//! An extension declares two ordered lists of sibling extensions: the ones
//! it requires and the ones it can use when present. Each entry may ask for
//! capability sets to be borrowed from the sibling once it is resolved.
//!
//! # Example
//!
//! ```
//! use exthost_core::dependency::{DependencyOptions, DependencySpec, Include};
//!
//! let spec = DependencySpec::new()
//!     .with("Core", DependencyOptions::include(Include::many(["Helpers", "Utils"])))
//!     .with("Stats", DependencyOptions::default());
//!
//! assert_eq!(spec.names().collect::<Vec<_>>(), vec!["Core", "Stats"]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a dependency list must be fully satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// Every entry must be registered or enabling fails.
    Required,
    /// Absent entries are tolerated.
    Optional,
}

impl DependencyKind {
    pub fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Optional => write!(f, "optional"),
        }
    }
}

/// Capability names requested from a dependency.
///
/// Authors may write either a single name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Include {
    One(String),
    Many(Vec<String>),
}

impl Include {
    pub fn one(name: impl Into<String>) -> Self {
        Self::One(name.into())
    }

    pub fn many<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(names.into_iter().map(Into::into).collect())
    }

    /// The requested capability names in declaration order.
    pub fn names(&self) -> &[String] {
        match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }
}

impl From<&str> for Include {
    fn from(name: &str) -> Self {
        Self::one(name)
    }
}

impl From<Vec<&str>> for Include {
    fn from(names: Vec<&str>) -> Self {
        Self::many(names)
    }
}

/// Options attached to a single dependency entry.
///
/// Without `include` the entry is a plain existence dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Include>,
}

impl DependencyOptions {
    pub fn include(include: impl Into<Include>) -> Self {
        Self {
            include: Some(include.into()),
        }
    }

    /// Capability names to compose, empty for a plain dependency.
    pub fn included(&self) -> &[String] {
        self.include.as_ref().map(Include::names).unwrap_or(&[])
    }
}

/// One entry of a [`DependencySpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub options: DependencyOptions,
}

/// Ordered list of dependency declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySpec {
    entries: Vec<Dependency>,
}

impl DependencySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, replacing the options of an existing entry with the
    /// same name in place.
    pub fn push(&mut self, name: impl Into<String>, options: DependencyOptions) {
        let name = name.into();
        match self.entries.iter_mut().find(|d| d.name == name) {
            Some(existing) => existing.options = options,
            None => self.entries.push(Dependency { name, options }),
        }
    }

    pub fn with(mut self, name: impl Into<String>, options: DependencyOptions) -> Self {
        self.push(name, options);
        self
    }

    /// Build a spec from a TOML table of `name = { include = ... }` entries,
    /// keeping the table's declaration order.
    pub fn from_table(table: &toml::Table) -> std::result::Result<Self, toml::de::Error> {
        let mut spec = Self::new();
        for (name, value) in table {
            let options: DependencyOptions = value.clone().try_into()?;
            spec.push(name.as_str(), options);
        }
        Ok(spec)
    }

    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.entries.iter().find(|d| d.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dependency> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a DependencySpec {
    type Item = &'a Dependency;
    type IntoIter = std::slice::Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_include_single_name() {
        let include = Include::one("Helpers");
        assert_eq!(include.names(), &["Helpers".to_string()]);
    }

    #[test]
    fn test_include_list_keeps_order() {
        let include = Include::many(["Utils", "Helpers"]);
        assert_eq!(include.names(), &["Utils".to_string(), "Helpers".to_string()]);
    }

    #[test]
    fn test_plain_dependency_includes_nothing() {
        assert!(DependencyOptions::default().included().is_empty());
    }

    #[test]
    fn test_push_replaces_existing_entry_in_place() {
        let mut spec = DependencySpec::new();
        spec.push("A", DependencyOptions::default());
        spec.push("B", DependencyOptions::default());
        spec.push("A", DependencyOptions::include("Helpers"));

        assert_eq!(spec.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(spec.get("A").unwrap().options.included(), &["Helpers".to_string()]);
    }

    #[test]
    fn test_from_table_preserves_declaration_order() {
        let table: toml::Table = toml::from_str(
            r#"
Zeta = {}
Alpha = { include = "Helpers" }
Mid = { include = ["Helpers", "Utils"] }
"#,
        )
        .unwrap();

        let spec = DependencySpec::from_table(&table).unwrap();
        assert_eq!(spec.names().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(
            spec.get("Alpha").unwrap().options.include,
            Some(Include::One("Helpers".into()))
        );
        assert_eq!(spec.get("Mid").unwrap().options.included().len(), 2);
    }

    #[test]
    fn test_from_table_rejects_unknown_option() {
        let table: toml::Table = toml::from_str(r#"Core = { inclde = "Helpers" }"#).unwrap();
        assert!(DependencySpec::from_table(&table).is_err());
    }
}
