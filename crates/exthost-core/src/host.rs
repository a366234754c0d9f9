//! The extension host: owner of the registry, the kinds and the console.
//!
//! `ExtensionHost` is the single owner of all process-wide extension state.
//! Every mutating operation takes `&mut self`, so the borrow checker
//! enforces the single-control-thread discipline that lifecycle calls rely
//! on. A host that needs to be shared across threads must wrap it in a
//! mutex or hand it to one owning task.

use std::path::Path;

use exthost_fs::{NormalizedPath, io};
use serde_json::Value;

use crate::capability::{CapabilityComposer, ComposedCapability};
use crate::config::ExtensionConfig;
use crate::console::{Console, StdoutConsole};
use crate::descriptor::ExtensionDescriptor;
use crate::error::{Error, Result};
use crate::instance::ExtensionInstance;
use crate::kind::{ExtensionDefinition, ExtensionKind, KindId, KindTable};
use crate::lifecycle::LifecycleState;
use crate::registry::{ExtensionId, ExtensionLookup, Registry};

pub struct ExtensionHost {
    pub(crate) registry: Registry,
    pub(crate) kinds: KindTable,
    console: Box<dyn Console>,
}

impl Default for ExtensionHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExtensionHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionHost")
            .field("registry", &self.registry)
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}

impl ExtensionHost {
    /// Create a host that writes lifecycle notices to stdout.
    pub fn new() -> Self {
        Self::with_console(StdoutConsole)
    }

    pub fn with_console(console: impl Console + 'static) -> Self {
        Self {
            registry: Registry::new(),
            kinds: KindTable::new(),
            console: Box::new(console),
        }
    }

    /// Define an extension type.
    pub fn define(&mut self, definition: ExtensionDefinition) -> KindId {
        self.kinds.define(definition)
    }

    pub fn kind(&self, id: KindId) -> Option<&ExtensionKind> {
        self.kinds.get(id)
    }

    pub fn kinds(&self) -> &KindTable {
        &self.kinds
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Construct an instance of `kind` loaded from `path` and register it.
    ///
    /// The path is normalized to forward slashes before it is used as a
    /// registry key or to derive the data directory.
    ///
    /// # Errors
    ///
    /// Fails if `kind` is unknown or the source file cannot be inspected.
    pub fn construct(&mut self, path: impl AsRef<Path>, kind: KindId) -> Result<ExtensionId> {
        let descriptor = self
            .kinds
            .get(kind)
            .ok_or(Error::UnknownKind(kind))?
            .definition()
            .descriptor();
        let path = NormalizedPath::new(path);
        let id = self.registry.allocate_id();
        let instance = ExtensionInstance::new(id, kind, path, descriptor);
        self.registry.register(instance)
    }

    pub fn instance(&self, id: ExtensionId) -> Result<&ExtensionInstance> {
        self.registry.get(id).ok_or(Error::UnknownExtension(id))
    }

    pub(crate) fn instance_mut(&mut self, id: ExtensionId) -> Result<&mut ExtensionInstance> {
        self.registry.get_mut(id).ok_or(Error::UnknownExtension(id))
    }

    /// Resolve a logical extension name to its live instance.
    pub fn lookup(&self, name: &str) -> Option<&ExtensionInstance> {
        self.registry.lookup(name)
    }

    pub(crate) fn kind_of(&self, id: ExtensionId) -> Result<&ExtensionKind> {
        let kind = self.instance(id)?.kind();
        self.kinds.get(kind).ok_or(Error::UnknownKind(kind))
    }

    pub fn is_enabled(&self, id: ExtensionId) -> Result<bool> {
        Ok(self.instance(id)?.is_enabled())
    }

    pub fn is_naggable(&self, id: ExtensionId) -> Result<bool> {
        Ok(self.instance(id)?.is_naggable())
    }

    pub fn set_naggable(&mut self, id: ExtensionId, naggable: bool) -> Result<()> {
        self.instance_mut(id)?.set_naggable(naggable);
        Ok(())
    }

    pub fn state(&self, id: ExtensionId) -> Result<LifecycleState> {
        Ok(self.instance(id)?.state())
    }

    pub fn description(&self, id: ExtensionId) -> Result<&ExtensionDescriptor> {
        Ok(self.instance(id)?.descriptor())
    }

    /// The data directory, created on first use.
    pub fn data_folder(&self, id: ExtensionId) -> Result<NormalizedPath> {
        let dir = self.instance(id)?.data_dir().clone();
        io::ensure_dir(&dir)?;
        Ok(dir)
    }

    /// The configuration handle, without loading it.
    pub fn configuration(&mut self, id: ExtensionId) -> Result<&mut ExtensionConfig> {
        Ok(self.instance_mut(id)?.config_mut())
    }

    /// The configuration handle, loaded from disk on first access only.
    pub fn config(&mut self, id: ExtensionId) -> Result<&mut ExtensionConfig> {
        let config = self.instance_mut(id)?.config_mut();
        config.ensure_loaded()?;
        Ok(config)
    }

    /// The sibling bound under `name` by dependency resolution.
    ///
    /// Bindings are kind-wide: once any instance of a kind has resolved
    /// `name`, every instance of that kind sees the same binding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnboundDependency`] if no resolution has bound `name`
    /// for this kind.
    pub fn dependency(&self, id: ExtensionId, name: &str) -> Result<Option<&ExtensionInstance>> {
        let kind = self.kind_of(id)?;
        match kind.binding(name) {
            Some(target) => Ok(target.and_then(|target| self.registry.get(target))),
            None => Err(Error::UnboundDependency {
                extension: self.instance(id)?.name().to_string(),
                dependency: name.to_string(),
            }),
        }
    }

    /// Invoke `operation` from the capability sets composed onto the kind.
    pub fn invoke(&self, id: ExtensionId, operation: &str, args: &Value) -> Result<Value> {
        let kind = self.kind_of(id)?;
        let (composed, op) = kind
            .find_operation(operation)
            .ok_or_else(|| Error::UnknownOperation {
                extension: kind.definition().name().to_string(),
                operation: operation.to_string(),
            })?;
        op(args).map_err(|source| Error::Operation {
            capability: composed.name().to_string(),
            operation: operation.to_string(),
            source,
        })
    }

    pub fn has_capability(&self, id: ExtensionId, capability: &str) -> Result<bool> {
        Ok(self.kind_of(id)?.has_capability(capability))
    }

    pub fn composed_capabilities(&self, id: ExtensionId) -> Result<&[ComposedCapability]> {
        Ok(self.kind_of(id)?.composed())
    }

    /// Compose `capability` from the sibling named `sibling` onto the kind of
    /// `id`.
    ///
    /// A sibling that is not registered is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns a missing-capability error when the sibling is registered but
    /// does not export `capability`.
    pub fn include_capability(
        &mut self,
        id: ExtensionId,
        sibling: &str,
        capability: &str,
    ) -> Result<()> {
        let dependent = self.registry.get(id).ok_or(Error::UnknownExtension(id))?;
        let Some(provider) = self.registry.lookup(sibling) else {
            tracing::warn!(
                extension = dependent.name(),
                sibling,
                capability,
                "Unable to find extension, ignoring capability include"
            );
            return Ok(());
        };
        CapabilityComposer::new(&mut self.kinds).compose(dependent.kind(), provider, capability)?;
        Ok(())
    }

    pub(crate) fn console_line(&mut self, line: &str) {
        self.console.write_line(line);
    }
}
