//! Dependency resolution for a single dependency list.
//!
//! For every entry, in declaration order:
//!
//! 1. look the name up through an [`ExtensionLookup`];
//! 2. if it is absent from a required list, fail immediately;
//! 3. bind the accessor for that name on the dependent's kind, to the
//!    found instance or to nothing;
//! 4. if the entry has `include` and the sibling was found, compose each
//!    named capability set.
//!
//! There is no rollback. Bindings and compositions made before a failure
//! stay in place.

use crate::capability::CapabilityComposer;
use crate::dependency::{DependencyKind, DependencySpec};
use crate::error::{Error, MissingDependencyError, Result};
use crate::instance::ExtensionInstance;
use crate::kind::KindTable;
use crate::registry::{ExtensionId, ExtensionLookup};

/// What one resolution pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Each dependency name with the instance its accessor now points at.
    pub bound: Vec<(String, Option<ExtensionId>)>,
    /// Capability sets newly composed by this pass.
    pub composed: Vec<String>,
}

pub struct DependencyResolver<'a, L: ExtensionLookup + ?Sized> {
    lookup: &'a L,
    kinds: &'a mut KindTable,
}

impl<'a, L: ExtensionLookup + ?Sized> DependencyResolver<'a, L> {
    pub fn new(lookup: &'a L, kinds: &'a mut KindTable) -> Self {
        Self { lookup, kinds }
    }

    /// Resolve `spec` for `dependent`.
    ///
    /// # Errors
    ///
    /// Returns [`MissingDependencyError`] if a required entry is not
    /// registered, or if an included capability is not exported by the
    /// resolved sibling.
    pub fn resolve(
        &mut self,
        dependent: &ExtensionInstance,
        spec: &DependencySpec,
        kind: DependencyKind,
    ) -> Result<Resolution> {
        let mut resolution = Resolution::default();

        for dependency in spec {
            let found = self.lookup.lookup(&dependency.name);

            if found.is_none() {
                if kind.is_required() {
                    return Err(MissingDependencyError::Extension {
                        extension: dependent.name().to_string(),
                        dependency: dependency.name.clone(),
                    }
                    .into());
                }
                tracing::debug!(
                    extension = dependent.name(),
                    dependency = %dependency.name,
                    "Optional dependency not loaded"
                );
            }

            let target = found.map(ExtensionInstance::id);
            self.kinds
                .get_mut(dependent.kind())
                .ok_or(Error::UnknownKind(dependent.kind()))?
                .bind(&dependency.name, target);
            resolution.bound.push((dependency.name.clone(), target));

            if let Some(provider) = found {
                for capability in dependency.options.included() {
                    let newly = CapabilityComposer::new(self.kinds).compose(
                        dependent.kind(),
                        provider,
                        capability,
                    )?;
                    if newly {
                        resolution.composed.push(capability.clone());
                    }
                }
            }
        }

        tracing::debug!(
            extension = dependent.name(),
            %kind,
            bound = resolution.bound.len(),
            composed = resolution.composed.len(),
            "Resolved dependencies"
        );
        Ok(resolution)
    }
}
