//! Lifecycle transitions: load, enable, disable.
//!
//! ```text
//! Unloaded --load--> Loaded --enable--> Enabled <--disable/enable--> Disabled
//! ```
//!
//! `enable` sets the enabled flag, resolves the required list, then the
//! optional list, then runs the enable hook. A failure at any step stops the
//! sequence; the flag and any bindings made so far are left as they are and
//! the recorded state does not advance.

use std::fmt;
use std::sync::Arc;

use crate::dependency::DependencyKind;
use crate::error::{Error, Result};
use crate::hooks::{HookContext, HookPhase};
use crate::host::ExtensionHost;
use crate::registry::ExtensionId;
use crate::resolver::{DependencyResolver, Resolution};

/// Last completed lifecycle transition of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Unloaded,
    Loaded,
    Enabled,
    Disabled,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unloaded => write!(f, "UNLOADED"),
            Self::Loaded => write!(f, "LOADED"),
            Self::Enabled => write!(f, "ENABLED"),
            Self::Disabled => write!(f, "DISABLED"),
        }
    }
}

impl ExtensionHost {
    /// Run the load hook, if the extension defines one.
    pub fn load(&mut self, id: ExtensionId) -> Result<()> {
        self.run_hook(id, HookPhase::Load)?;
        let instance = self.instance_mut(id)?;
        if instance.state() == LifecycleState::Unloaded {
            instance.set_state(LifecycleState::Loaded);
        }
        tracing::debug!(extension = instance.name(), "Loaded extension");
        Ok(())
    }

    /// Enable the extension: resolve its dependencies and run its enable hook.
    ///
    /// Calling `enable` again re-runs the whole sequence.
    ///
    /// # Errors
    ///
    /// A missing required dependency or missing capability aborts with a
    /// missing-dependency error before the enable hook runs. Hook failures
    /// are returned as [`Error::Hook`].
    pub fn enable(&mut self, id: ExtensionId) -> Result<()> {
        self.instance_mut(id)?.set_enabled(true);
        self.resolve_dependencies(id, DependencyKind::Required)?;
        self.resolve_dependencies(id, DependencyKind::Optional)?;
        self.run_hook(id, HookPhase::Enable)?;
        self.instance_mut(id)?.set_state(LifecycleState::Enabled);
        self.announce(id, LifecycleState::Enabled)
    }

    /// Run the disable hook, then clear the enabled flag.
    pub fn disable(&mut self, id: ExtensionId) -> Result<()> {
        self.run_hook(id, HookPhase::Disable)?;
        let instance = self.instance_mut(id)?;
        instance.set_enabled(false);
        instance.set_state(LifecycleState::Disabled);
        self.announce(id, LifecycleState::Disabled)
    }

    /// Resolve one of the extension's dependency lists.
    pub fn resolve_dependencies(
        &mut self,
        id: ExtensionId,
        kind: DependencyKind,
    ) -> Result<Resolution> {
        let dependent = self.registry.get(id).ok_or(Error::UnknownExtension(id))?;
        let definition = Arc::clone(
            self.kinds
                .get(dependent.kind())
                .ok_or(Error::UnknownKind(dependent.kind()))?
                .definition(),
        );
        DependencyResolver::new(&self.registry, &mut self.kinds).resolve(
            dependent,
            definition.dependencies(kind),
            kind,
        )
    }

    fn run_hook(&mut self, id: ExtensionId, phase: HookPhase) -> Result<()> {
        let Some(hook) = self.kind_of(id)?.definition().hooks().get(phase).cloned() else {
            return Ok(());
        };
        let extension = self.instance(id)?.name().to_string();
        tracing::debug!(%extension, %phase, "Running lifecycle hook");

        let mut context = HookContext::new(self, id);
        hook(&mut context).map_err(|source| Error::Hook {
            extension,
            phase,
            source,
        })
    }

    fn announce(&mut self, id: ExtensionId, state: LifecycleState) -> Result<()> {
        let line = {
            let descriptor = self.description(id)?;
            tracing::info!(
                extension = descriptor.name(),
                version = descriptor.version(),
                %state,
                "Lifecycle transition"
            );
            format!(
                "[{}] version {} {}",
                descriptor.name(),
                descriptor.version(),
                state
            )
        };
        self.console_line(&line);
        Ok(())
    }
}
