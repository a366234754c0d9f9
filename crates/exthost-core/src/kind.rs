//! Extension types ("kinds") and their shared, kind-level state.
//!
//! An [`ExtensionDefinition`] is declared once per extension type. The host
//! turns it into an [`ExtensionKind`], which additionally carries the state
//! that dependency resolution writes: accessor bindings and composed
//! capability sets. That state is shared by every instance of the kind.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::capability::{CapabilitySet, ComposedCapability, Operation};
use crate::dependency::{DependencyKind, DependencyOptions, DependencySpec};
use crate::descriptor::{DEFAULT_DESCRIPTION, ExtensionDescriptor};
use crate::hooks::{HookContext, HookPhase, HookResult, LifecycleHooks};
use crate::registry::ExtensionId;

/// Identifier of a kind defined on an [`ExtensionHost`](crate::ExtensionHost).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(usize);

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kind#{}", self.0)
    }
}

/// Static declaration of an extension type.
#[derive(Debug, Clone)]
pub struct ExtensionDefinition {
    name: String,
    version: String,
    description: String,
    requires: DependencySpec,
    optional: DependencySpec,
    capabilities: BTreeMap<String, Arc<CapabilitySet>>,
    hooks: LifecycleHooks,
}

impl ExtensionDefinition {
    pub fn builder(
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> ExtensionDefinitionBuilder {
        ExtensionDefinitionBuilder {
            definition: Self {
                name: name.into(),
                version: version.into(),
                description: DEFAULT_DESCRIPTION.to_string(),
                requires: DependencySpec::new(),
                optional: DependencySpec::new(),
                capabilities: BTreeMap::new(),
                hooks: LifecycleHooks::default(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn descriptor(&self) -> ExtensionDescriptor {
        ExtensionDescriptor::new(&self.name, &self.version, &self.description)
    }

    pub fn requires(&self) -> &DependencySpec {
        &self.requires
    }

    pub fn optional(&self) -> &DependencySpec {
        &self.optional
    }

    pub fn dependencies(&self, kind: DependencyKind) -> &DependencySpec {
        match kind {
            DependencyKind::Required => &self.requires,
            DependencyKind::Optional => &self.optional,
        }
    }

    /// An exported capability set by name.
    pub fn capability(&self, name: &str) -> Option<&Arc<CapabilitySet>> {
        self.capabilities.get(name)
    }

    pub fn capability_names(&self) -> impl Iterator<Item = &str> {
        self.capabilities.keys().map(String::as_str)
    }

    pub fn hooks(&self) -> &LifecycleHooks {
        &self.hooks
    }
}

/// Builder for [`ExtensionDefinition`].
///
/// # Example
///
/// ```
/// use exthost_core::{CapabilitySet, ExtensionDefinition};
/// use exthost_core::dependency::{DependencyOptions, Include};
///
/// let admin = ExtensionDefinition::builder("Admin", "0.1")
///     .description("Server administration commands")
///     .requires("Core", DependencyOptions::include(Include::many(["Helpers", "Utils"])))
///     .optional("Chat", DependencyOptions::default())
///     .capability(CapabilitySet::new("AdminTools"))
///     .on_enable(|ctx| {
///         ctx.console("admin ready");
///         Ok(())
///     })
///     .build();
///
/// assert_eq!(admin.requires().len(), 1);
/// ```
#[derive(Debug)]
pub struct ExtensionDefinitionBuilder {
    definition: ExtensionDefinition,
}

impl ExtensionDefinitionBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.definition.description = description.into();
        self
    }

    pub fn requires(mut self, name: impl Into<String>, options: DependencyOptions) -> Self {
        self.definition.requires.push(name, options);
        self
    }

    pub fn optional(mut self, name: impl Into<String>, options: DependencyOptions) -> Self {
        self.definition.optional.push(name, options);
        self
    }

    /// Replace the whole dependency list of the given kind.
    pub fn dependencies(mut self, kind: DependencyKind, spec: DependencySpec) -> Self {
        match kind {
            DependencyKind::Required => self.definition.requires = spec,
            DependencyKind::Optional => self.definition.optional = spec,
        }
        self
    }

    /// Export a capability set. A later set with the same name replaces it.
    pub fn capability(mut self, set: CapabilitySet) -> Self {
        self.definition
            .capabilities
            .insert(set.name().to_string(), Arc::new(set));
        self
    }

    pub fn on_load<F>(self, hook: F) -> Self
    where
        F: Fn(&mut HookContext<'_>) -> HookResult + Send + Sync + 'static,
    {
        self.hook(HookPhase::Load, hook)
    }

    pub fn on_enable<F>(self, hook: F) -> Self
    where
        F: Fn(&mut HookContext<'_>) -> HookResult + Send + Sync + 'static,
    {
        self.hook(HookPhase::Enable, hook)
    }

    pub fn on_disable<F>(self, hook: F) -> Self
    where
        F: Fn(&mut HookContext<'_>) -> HookResult + Send + Sync + 'static,
    {
        self.hook(HookPhase::Disable, hook)
    }

    fn hook<F>(mut self, phase: HookPhase, hook: F) -> Self
    where
        F: Fn(&mut HookContext<'_>) -> HookResult + Send + Sync + 'static,
    {
        self.definition.hooks.set(phase, Arc::new(hook));
        self
    }

    pub fn build(self) -> ExtensionDefinition {
        self.definition
    }
}

/// A defined extension type together with its kind-level state.
#[derive(Debug)]
pub struct ExtensionKind {
    id: KindId,
    definition: Arc<ExtensionDefinition>,
    /// Accessor bindings written by dependency resolution, by dependency name.
    bindings: BTreeMap<String, Option<ExtensionId>>,
    /// Composed capability sets in composition order.
    composed: Vec<ComposedCapability>,
}

impl ExtensionKind {
    pub fn id(&self) -> KindId {
        self.id
    }

    pub fn definition(&self) -> &Arc<ExtensionDefinition> {
        &self.definition
    }

    /// The binding for `name`: `None` if never bound, `Some(None)` if bound
    /// to an absent optional dependency.
    pub fn binding(&self, name: &str) -> Option<Option<ExtensionId>> {
        self.bindings.get(name).copied()
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, Option<ExtensionId>)> {
        self.bindings.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Define or redefine the accessor for `name`.
    pub(crate) fn bind(&mut self, name: &str, target: Option<ExtensionId>) {
        self.bindings.insert(name.to_string(), target);
    }

    pub fn composed(&self) -> &[ComposedCapability] {
        &self.composed
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.composed.iter().any(|c| c.name() == name)
    }

    /// Record a composed set unless the same (source, name) pair is present.
    pub(crate) fn graft(&mut self, capability: ComposedCapability) -> bool {
        let present = self
            .composed
            .iter()
            .any(|c| c.source == capability.source && c.name() == capability.name());
        if present {
            return false;
        }
        self.composed.push(capability);
        true
    }

    /// Find `operation` among the composed sets, most recently composed first.
    pub fn find_operation(&self, operation: &str) -> Option<(&ComposedCapability, &Operation)> {
        self.composed
            .iter()
            .rev()
            .find_map(|c| c.set.operation(operation).map(|op| (c, op)))
    }
}

/// All kinds defined on a host.
#[derive(Debug, Default)]
pub struct KindTable {
    kinds: Vec<ExtensionKind>,
}

impl KindTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, definition: ExtensionDefinition) -> KindId {
        let id = KindId(self.kinds.len());
        tracing::debug!(%id, name = definition.name(), "Defined extension kind");
        self.kinds.push(ExtensionKind {
            id,
            definition: Arc::new(definition),
            bindings: BTreeMap::new(),
            composed: Vec::new(),
        });
        id
    }

    pub fn get(&self, id: KindId) -> Option<&ExtensionKind> {
        self.kinds.get(id.0)
    }

    pub fn get_mut(&mut self, id: KindId) -> Option<&mut ExtensionKind> {
        self.kinds.get_mut(id.0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtensionKind> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
