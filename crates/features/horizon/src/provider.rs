//! Attaches Horizon to a host in two phases.
//!
//! `register` binds and declares; `boot` wires everything that needs other
//! providers to be registered first. Each phase runs once per process: a
//! repeated call is logged and ignored.

use crate::bindings::ServiceBindingTable;
use crate::commands::CommandRegistrar;
use crate::config::{ConfigMerger, NAMESPACE};
use crate::connector::{DRIVER, RedisConnector};
use crate::console::{WORK_COMMAND, WorkCommand};
use crate::error::{BootstrapError, BootstrapErrorExt};
use crate::events::EventMap;
use crate::publish::ResourcePublisher;
use crate::routes::{DashboardRoutes, RouteGroupRegistrar, RouteSource};
use hzn_domain::BootState;
use hzn_kernel::app::{Application, BoxError, ServiceProvider};
use hzn_kernel::broker::BrokerManager;
use hzn_kernel::container::Container;
use hzn_kernel::keys;
use hzn_kernel::queue::{Connector, QueueManager, QueueWorker};
use parking_lot::Mutex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// View namespace the dashboard templates live under.
pub const VIEW_NAMESPACE: &str = "horizon";

/// Installs the Horizon module into a host: bindings and commands at
/// `register`, events, routes, views and assets at `boot`.
pub struct HorizonServiceProvider {
    install_dir: PathBuf,
    install_path: OnceLock<PathBuf>,
    events: EventMap,
    bindings: ServiceBindingTable,
    routes: Arc<dyn RouteSource>,
    state: Mutex<BootState>,
}

impl fmt::Debug for HorizonServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HorizonServiceProvider")
            .field("install_path", &self.install_path())
            .field("events", &self.events.bindings().len())
            .field("bindings", &self.bindings.entries().len())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl HorizonServiceProvider {
    /// A provider for the module installed at `install_dir` (the directory
    /// holding `config/`, `public/` and `resources/`).
    #[must_use]
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            install_path: OnceLock::new(),
            events: EventMap::horizon(),
            bindings: ServiceBindingTable::horizon(),
            routes: Arc::new(DashboardRoutes),
            state: Mutex::new(BootState::Unregistered),
        }
    }

    /// The module shipped with this crate.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(env!("CARGO_MANIFEST_DIR"))
    }

    #[must_use]
    pub fn with_events(mut self, events: EventMap) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn with_bindings(mut self, bindings: ServiceBindingTable) -> Self {
        self.bindings = bindings;
        self
    }

    #[must_use]
    pub fn with_routes(mut self, routes: impl RouteSource + 'static) -> Self {
        self.routes = Arc::new(routes);
        self
    }

    #[must_use]
    pub fn state(&self) -> BootState {
        *self.state.lock()
    }

    /// Install location, fixed on first `register`.
    #[must_use]
    pub fn install_path(&self) -> Option<&Path> {
        self.install_path.get().map(PathBuf::as_path)
    }

    #[must_use]
    pub const fn events(&self) -> &EventMap {
        &self.events
    }

    #[must_use]
    pub const fn bindings(&self) -> &ServiceBindingTable {
        &self.bindings
    }

    /// Binding phase.
    ///
    /// # Errors
    /// Any configuration or binding failure; the host should abort startup.
    pub fn register_module(&self, app: &Application) -> Result<(), BootstrapError> {
        let mut state = self.state.lock();
        if *state >= BootState::Registered {
            warn!(state = ?*state, "Horizon already registered, ignoring");
            return Ok(());
        }

        let install = self.install_path.get_or_init(|| {
            fs::canonicalize(&self.install_dir).unwrap_or_else(|_| self.install_dir.clone())
        });
        debug!(install = %install.display(), "Horizon install path fixed");

        let config = ConfigMerger::new(install.join("config/horizon.toml")).merge(app.config())?;
        ConfigMerger::use_connection(app.config(), &config)?;

        if app.running_in_console() {
            ResourcePublisher::new(app.publishes().clone()).declare_config(install, app.base_path());
        }

        let services = self.bindings.register_services(app.container());

        app.container().singleton(WORK_COMMAND, |c: &Container| {
            c.resolve::<QueueWorker>(keys::QUEUE_WORKER).map(WorkCommand::new)
        });

        let commands = CommandRegistrar::register_commands(app.commands(), app.context());

        register_queue_connectors(app.container());

        *state = BootState::Registered;
        info!(context = %app.context(), services, commands, "Horizon registered");
        Ok(())
    }

    /// Wiring phase.
    ///
    /// # Errors
    /// [`BootstrapError::Lifecycle`] before `register`; otherwise any
    /// resolution failure (the broker is resolved eagerly). A failed boot
    /// attaches nothing and may be retried.
    pub fn boot_module(&self, app: &Application) -> Result<(), BootstrapError> {
        let mut state = self.state.lock();
        match *state {
            BootState::Unregistered => {
                return Err(BootstrapError::Lifecycle {
                    message: "boot() called before register()".into(),
                    context: None,
                });
            },
            BootState::Booted => {
                warn!("Horizon already booted, ignoring");
                return Ok(());
            },
            BootState::Registered => {},
        }

        let install = self.install_path.get().ok_or("install path not initialized")?;

        // Nothing may be attached before this can fail.
        register_broker_alias(app.container())?;

        let listeners = self.events.register_events(app.events());

        let spec = RouteGroupRegistrar::group_spec(app.config());
        let routes = RouteGroupRegistrar::new(self.routes.as_ref()).register_routes(app.router(), &spec);

        app.views().add_namespace(VIEW_NAMESPACE, view_paths(install, app.base_path()));

        ResourcePublisher::new(app.publishes().clone()).declare_assets(install, app.base_path());

        *state = BootState::Booted;
        info!(listeners, routes, "Horizon booted");
        Ok(())
    }
}

impl ServiceProvider for HorizonServiceProvider {
    fn name(&self) -> &'static str {
        NAMESPACE
    }

    fn register(&self, app: &Application) -> Result<(), BoxError> {
        Ok(self.register_module(app)?)
    }

    fn boot(&self, app: &Application) -> Result<(), BoxError> {
        Ok(self.boot_module(app)?)
    }
}

/// Adds the `redis` connector whenever the host queue manager is built.
fn register_queue_connectors(container: &Container) {
    container.resolving::<QueueManager, _>(keys::QUEUE, |manager, container| {
        let container = container.clone();
        manager.add_connector(DRIVER, move || {
            let broker = container.resolve::<BrokerManager>(keys::BROKER)?;
            Ok(Box::new(RedisConnector::new(broker)) as Box<dyn Connector>)
        });
    });
}

/// Exposes the broker under its contract name and builds it now, so a
/// misconfigured broker fails the boot instead of the first job.
fn register_broker_alias(container: &Container) -> Result<(), BootstrapError> {
    container.alias(keys::BROKER, keys::BROKER_CONTRACT).context("Aliasing broker")?;
    container.resolve::<BrokerManager>(keys::BROKER).context("Resolving broker")?;
    Ok(())
}

/// Host overrides first, then the module's own templates.
fn view_paths(install: &Path, base: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);
    let overrides = base.join("resources/views/vendor/horizon");
    if overrides.is_dir() {
        paths.push(overrides);
    }
    paths.push(install.join("resources/views"));
    paths
}
