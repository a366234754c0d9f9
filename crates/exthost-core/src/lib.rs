//! Lifecycle and dependency composition for host extensions.
//!
//! An extension type is declared once as an [`ExtensionDefinition`]: its
//! name and version, the sibling extensions it requires or can optionally
//! use, the capability sets it exports, and optional lifecycle hooks. The
//! [`ExtensionHost`] constructs instances of those types, registers them by
//! load path, and drives them through load, enable and disable. Enabling
//! resolves the declared dependencies against the registry and composes any
//! requested capability sets onto the dependent type.

pub mod capability;
pub mod config;
pub mod console;
pub mod dependency;
pub mod descriptor;
pub mod error;
pub mod hooks;
pub mod host;
pub mod instance;
pub mod kind;
pub mod lifecycle;
pub mod manifest;
pub mod registry;
pub mod resolver;

pub use capability::{CapabilityComposer, CapabilitySet, ComposedCapability, Operation};
pub use config::{CONFIG_FILENAME, ExtensionConfig};
pub use console::{BufferConsole, Console, StdoutConsole};
pub use dependency::{Dependency, DependencyKind, DependencyOptions, DependencySpec, Include};
pub use descriptor::ExtensionDescriptor;
pub use error::{Error, MissingDependencyError, Result};
pub use hooks::{Hook, HookContext, HookError, HookPhase, HookResult, LifecycleHooks};
pub use host::ExtensionHost;
pub use instance::ExtensionInstance;
pub use kind::{ExtensionDefinition, ExtensionDefinitionBuilder, ExtensionKind, KindId, KindTable};
pub use lifecycle::LifecycleState;
pub use manifest::{ExtensionManifest, MANIFEST_FILENAME};
pub use registry::{ExtensionId, ExtensionLookup, Registry, RegistryEntry};
pub use resolver::{DependencyResolver, Resolution};
