//! Live extension instances.

use exthost_fs::NormalizedPath;

use crate::config::{CONFIG_FILENAME, ExtensionConfig};
use crate::descriptor::ExtensionDescriptor;
use crate::kind::KindId;
use crate::lifecycle::LifecycleState;
use crate::registry::ExtensionId;

/// A constructed extension.
///
/// Identity (id, kind, path, descriptor) is fixed at construction. Only the
/// enabled/naggable flags, the lifecycle state and the configuration handle
/// change afterwards.
#[derive(Debug)]
pub struct ExtensionInstance {
    id: ExtensionId,
    kind: KindId,
    path: NormalizedPath,
    descriptor: ExtensionDescriptor,
    data_dir: NormalizedPath,
    config: ExtensionConfig,
    enabled: bool,
    naggable: bool,
    state: LifecycleState,
}

impl ExtensionInstance {
    /// The data directory is `<directory of path>/<name>`.
    pub(crate) fn new(
        id: ExtensionId,
        kind: KindId,
        path: NormalizedPath,
        descriptor: ExtensionDescriptor,
    ) -> Self {
        let data_dir = path
            .parent()
            .unwrap_or_else(|| NormalizedPath::new("."))
            .join(descriptor.name());
        let config = ExtensionConfig::new(data_dir.join(CONFIG_FILENAME));
        Self {
            id,
            kind,
            path,
            descriptor,
            data_dir,
            config,
            enabled: false,
            naggable: false,
            state: LifecycleState::Unloaded,
        }
    }

    pub fn id(&self) -> ExtensionId {
        self.id
    }

    pub fn kind(&self) -> KindId {
        self.kind
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn descriptor(&self) -> &ExtensionDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// The data directory path. Does not create it.
    pub fn data_dir(&self) -> &NormalizedPath {
        &self.data_dir
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut ExtensionConfig {
        &mut self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_naggable(&self) -> bool {
        self.naggable
    }

    pub(crate) fn set_naggable(&mut self, naggable: bool) {
        self.naggable = naggable;
    }

    /// The last lifecycle transition that completed.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: LifecycleState) {
        self.state = state;
    }
}
