//! Optional lifecycle hooks and the context they run in.
//!
//! A hook is an author-supplied callback attached to an
//! [`ExtensionDefinition`](crate::ExtensionDefinition). Each phase either has
//! a hook or it does not; the host only calls the ones that are present.

use std::fmt;
use std::sync::Arc;

use exthost_fs::NormalizedPath;
use serde_json::Value;

use crate::config::ExtensionConfig;
use crate::descriptor::ExtensionDescriptor;
use crate::error::Result;
use crate::host::ExtensionHost;
use crate::instance::ExtensionInstance;
use crate::registry::ExtensionId;

/// Error type returned by hooks and capability operations.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by hooks and capability operations.
pub type HookResult<T = ()> = std::result::Result<T, HookError>;

/// A lifecycle callback.
pub type Hook = Arc<dyn Fn(&mut HookContext<'_>) -> HookResult + Send + Sync>;

/// Lifecycle phase a hook is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    Load,
    Enable,
    Disable,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Enable => write!(f, "enable"),
            Self::Disable => write!(f, "disable"),
        }
    }
}

/// The optional hooks of an extension type.
#[derive(Clone, Default)]
pub struct LifecycleHooks {
    on_load: Option<Hook>,
    on_enable: Option<Hook>,
    on_disable: Option<Hook>,
}

impl LifecycleHooks {
    pub fn get(&self, phase: HookPhase) -> Option<&Hook> {
        match phase {
            HookPhase::Load => self.on_load.as_ref(),
            HookPhase::Enable => self.on_enable.as_ref(),
            HookPhase::Disable => self.on_disable.as_ref(),
        }
    }

    pub fn set(&mut self, phase: HookPhase, hook: Hook) {
        let slot = match phase {
            HookPhase::Load => &mut self.on_load,
            HookPhase::Enable => &mut self.on_enable,
            HookPhase::Disable => &mut self.on_disable,
        };
        *slot = Some(hook);
    }

    pub fn has(&self, phase: HookPhase) -> bool {
        self.get(phase).is_some()
    }
}

impl fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("on_load", &self.on_load.is_some())
            .field("on_enable", &self.on_enable.is_some())
            .field("on_disable", &self.on_disable.is_some())
            .finish()
    }
}

/// View of the host handed to a running hook.
///
/// Everything is scoped to the extension whose hook is running.
pub struct HookContext<'a> {
    host: &'a mut ExtensionHost,
    id: ExtensionId,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(host: &'a mut ExtensionHost, id: ExtensionId) -> Self {
        Self { host, id }
    }

    pub fn id(&self) -> ExtensionId {
        self.id
    }

    pub fn descriptor(&self) -> Result<&ExtensionDescriptor> {
        self.host.description(self.id)
    }

    /// The sibling bound under `name` by dependency resolution.
    pub fn dependency(&self, name: &str) -> Result<Option<&ExtensionInstance>> {
        self.host.dependency(self.id, name)
    }

    /// Call an operation from one of the composed capability sets.
    pub fn invoke(&self, operation: &str, args: &Value) -> Result<Value> {
        self.host.invoke(self.id, operation, args)
    }

    pub fn has_capability(&self, capability: &str) -> Result<bool> {
        self.host.has_capability(self.id, capability)
    }

    /// Compose `capability` from the sibling named `sibling`, if it is loaded.
    pub fn include_capability(&mut self, sibling: &str, capability: &str) -> Result<()> {
        self.host.include_capability(self.id, sibling, capability)
    }

    pub fn data_folder(&self) -> Result<NormalizedPath> {
        self.host.data_folder(self.id)
    }

    pub fn config(&mut self) -> Result<&mut ExtensionConfig> {
        self.host.config(self.id)
    }

    pub fn set_naggable(&mut self, naggable: bool) -> Result<()> {
        self.host.set_naggable(self.id, naggable)
    }

    /// Write a line to the host console.
    pub fn console(&mut self, line: &str) {
        self.host.console_line(line);
    }

    pub fn host(&self) -> &ExtensionHost {
        self.host
    }

    pub fn host_mut(&mut self) -> &mut ExtensionHost {
        self.host
    }
}
