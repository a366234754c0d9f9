//! Capability sets and their composition onto dependent extension types.
//!
//! A capability set is a named bundle of operations exported by an
//! extension type. When a dependency entry asks to `include` a set, the
//! composer looks it up on the resolved sibling's type and records it on the
//! dependent's type, where every instance of that type can invoke it.
//!
//! Composition is kind-wide and permanent. Each (providing kind, capability
//! name) pair is recorded at most once, so repeated enables are no-ops.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, MissingDependencyError, Result};
use crate::hooks::HookResult;
use crate::instance::ExtensionInstance;
use crate::kind::{KindId, KindTable};

/// A single operation of a capability set.
pub type Operation = Arc<dyn Fn(&Value) -> HookResult<Value> + Send + Sync>;

/// A named bundle of operations.
///
/// # Example
///
/// ```
/// use exthost_core::CapabilitySet;
/// use serde_json::json;
///
/// let helpers = CapabilitySet::new("Helpers")
///     .with_operation("greet", |args| Ok(json!(format!("hello {}", args["who"]))));
///
/// assert!(helpers.has_operation("greet"));
/// ```
#[derive(Clone)]
pub struct CapabilitySet {
    name: String,
    operations: BTreeMap<String, Operation>,
}

impl CapabilitySet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: BTreeMap::new(),
        }
    }

    pub fn with_operation<F>(mut self, name: impl Into<String>, operation: F) -> Self
    where
        F: Fn(&Value) -> HookResult<Value> + Send + Sync + 'static,
    {
        self.operations.insert(name.into(), Arc::new(operation));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Operation names, sorted.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilitySet")
            .field("name", &self.name)
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A capability set grafted onto a dependent kind.
#[derive(Debug, Clone)]
pub struct ComposedCapability {
    /// Kind that exported the set.
    pub source: KindId,
    /// Descriptor name of the instance it was resolved through.
    pub provider: String,
    pub set: Arc<CapabilitySet>,
}

impl ComposedCapability {
    pub fn name(&self) -> &str {
        self.set.name()
    }
}

/// Grafts capability sets from resolved siblings onto dependent kinds.
pub struct CapabilityComposer<'a> {
    kinds: &'a mut KindTable,
}

impl<'a> CapabilityComposer<'a> {
    pub fn new(kinds: &'a mut KindTable) -> Self {
        Self { kinds }
    }

    /// Compose `capability` from `provider`'s kind onto `dependent`.
    ///
    /// Returns `true` if the set was newly grafted and `false` if it was
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns [`MissingDependencyError::Capability`] when the provider's
    /// kind does not export a set named `capability`.
    pub fn compose(
        &mut self,
        dependent: KindId,
        provider: &ExtensionInstance,
        capability: &str,
    ) -> Result<bool> {
        let set = self
            .kinds
            .get(provider.kind())
            .and_then(|kind| kind.definition().capability(capability))
            .cloned()
            .ok_or_else(|| MissingDependencyError::Capability {
                capability: capability.to_string(),
                provider: provider.descriptor().name().to_string(),
            })?;

        let target = self
            .kinds
            .get_mut(dependent)
            .ok_or(Error::UnknownKind(dependent))?;

        let composed = target.graft(ComposedCapability {
            source: provider.kind(),
            provider: provider.descriptor().name().to_string(),
            set,
        });

        if composed {
            tracing::debug!(
                capability,
                provider = provider.descriptor().name(),
                dependent = target.definition().name(),
                "Composed capability set"
            );
        }
        Ok(composed)
    }
}
