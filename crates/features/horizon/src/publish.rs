//! Publish groups Horizon offers to operators.

use hzn_domain::PublishGroup;
use hzn_kernel::publish::PublishRegistry;
use std::path::{Path, PathBuf};

pub const ASSETS_TAG: &str = "horizon-assets";
pub const CONFIG_TAG: &str = "horizon-config";

/// Name the groups are declared under in the host registry.
pub const PROVIDER: &str = "horizon";

/// Declares groups only. Copying happens through the host publisher when an
/// operator asks for a tag.
#[derive(Debug, Clone)]
pub struct ResourcePublisher {
    registry: PublishRegistry,
}

impl ResourcePublisher {
    #[must_use]
    pub const fn new(registry: PublishRegistry) -> Self {
        Self { registry }
    }

    pub fn declare_publishable<I, S, D>(&self, tag: &str, paths: I)
    where
        I: IntoIterator<Item = (S, D)>,
        S: Into<PathBuf>,
        D: Into<PathBuf>,
    {
        self.registry.declare(PROVIDER, PublishGroup::new(tag, paths));
    }

    /// Compiled dashboard assets into `<base>/public/vendor/horizon`.
    pub fn declare_assets(&self, install: &Path, base: &Path) {
        self.declare_publishable(ASSETS_TAG, [(install.join("public"), base.join("public/vendor/horizon"))]);
    }

    /// The defaults document into `<base>/config/horizon.toml`.
    pub fn declare_config(&self, install: &Path, base: &Path) {
        self.declare_publishable(
            CONFIG_TAG,
            [(install.join("config/horizon.toml"), base.join("config/horizon.toml"))],
        );
    }
}
