//! Operator shell: boots a host with every enabled feature and inspects it.

pub mod args;
pub mod handlers;

use crate::args::Cli;
use anyhow::Context;
use hzn::kernel::RunContext;
use hzn::kernel::app::Application;
use hzn::kernel::config::ConfigStore;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_CONFIG: &str = "config/app.toml";

impl Cli {
    #[must_use]
    pub const fn context(&self) -> RunContext {
        if self.server { RunContext::Server } else { RunContext::Console }
    }

    /// Explicit `--config`, else `<base>/config/app.toml` when it exists.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            let candidate = self.base.join(DEFAULT_CONFIG);
            candidate.is_file().then_some(candidate)
        })
    }
}

/// Loads configuration, installs features and boots the host.
///
/// # Errors
/// Fails when the configuration is malformed or any provider fails.
pub fn bootstrap(cli: &Cli) -> anyhow::Result<Application> {
    let config = match cli.config_path() {
        Some(path) => load(&path)?,
        None => {
            debug!("No host configuration file, starting empty");
            ConfigStore::new()
        },
    };

    let app = Application::builder()
        .base_path(&cli.base)
        .context(cli.context())
        .config(config)
        .build()?;

    hzn::init(&app).context("Critical: Feature installation failed")?;
    app.boot().context("Critical: Boot failed")?;
    Ok(app)
}

fn load(path: &Path) -> anyhow::Result<ConfigStore> {
    ConfigStore::load(path)
        .with_context(|| format!("Critical: Configuration {} is malformed", path.display()))
}
