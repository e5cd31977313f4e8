//! The host application and the provider lifecycle.

use crate::commands::CommandBus;
use crate::config::ConfigStore;
use crate::container::Container;
use crate::keys;
use crate::publish::{PublishRegistry, Publisher};
use crate::router::Router;
use crate::views::ViewRegistry;
use hzn_domain::RunContext;
use hzn_events::Dispatcher;
use parking_lot::RwLock;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, trace};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[hzn_derive::hzn_error]
pub enum ApplicationError {
    #[error("Application validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Provider {provider} failed to {phase}{}: {source}", format_context(.context))]
    Provider {
        provider: &'static str,
        phase: &'static str,
        source: BoxError,
        context: Option<Cow<'static, str>>,
    },
}

/// A module plugged into the host.
///
/// `register` only binds things; it must not resolve services other
/// providers may not have bound yet. `boot` runs once every provider is
/// registered.
pub trait ServiceProvider: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// # Errors
    /// Any failure aborts the host's startup.
    fn register(&self, app: &Application) -> Result<(), BoxError>;

    /// # Errors
    /// Any failure aborts the host's startup.
    fn boot(&self, _app: &Application) -> Result<(), BoxError> {
        Ok(())
    }
}

struct Entry {
    provider: Arc<dyn ServiceProvider>,
    booted: bool,
}

pub struct Application {
    base_path: PathBuf,
    context: RunContext,
    container: Container,
    config: ConfigStore,
    events: Dispatcher,
    router: Option<Router>,
    commands: CommandBus,
    publishes: PublishRegistry,
    views: ViewRegistry,
    providers: RwLock<Vec<Entry>>,
    booted: AtomicBool,
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("base_path", &self.base_path)
            .field("context", &self.context)
            .field("http", &self.router.is_some())
            .field("providers", &self.providers())
            .field("booted", &self.is_booted())
            .finish_non_exhaustive()
    }
}

impl Application {
    #[must_use]
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// `relative` under the application's base path.
    #[must_use]
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.base_path.join(relative)
    }

    #[must_use]
    pub const fn context(&self) -> RunContext {
        self.context
    }

    #[must_use]
    pub const fn running_in_console(&self) -> bool {
        self.context.is_console()
    }

    #[must_use]
    pub const fn container(&self) -> &Container {
        &self.container
    }

    #[must_use]
    pub const fn config(&self) -> &ConfigStore {
        &self.config
    }

    #[must_use]
    pub const fn events(&self) -> &Dispatcher {
        &self.events
    }

    /// The route table, or `None` when the host runs without HTTP.
    #[must_use]
    pub const fn router(&self) -> Option<&Router> {
        self.router.as_ref()
    }

    #[must_use]
    pub const fn commands(&self) -> &CommandBus {
        &self.commands
    }

    #[must_use]
    pub const fn publishes(&self) -> &PublishRegistry {
        &self.publishes
    }

    #[must_use]
    pub const fn views(&self) -> &ViewRegistry {
        &self.views
    }

    #[must_use]
    pub fn publisher(&self, force: bool) -> Publisher {
        Publisher::new(self.publishes.clone()).force(force)
    }

    #[must_use]
    pub fn is_booted(&self) -> bool {
        self.booted.load(Ordering::Acquire)
    }

    /// Names of registered providers, in registration order.
    #[must_use]
    pub fn providers(&self) -> Vec<&'static str> {
        self.providers.read().iter().map(|e| e.provider.name()).collect()
    }

    /// Registers a provider. A provider whose name is already registered is
    /// skipped. Once the application is booted, new providers boot right away.
    ///
    /// # Errors
    /// Propagates the provider's own `register`/`boot` failure.
    pub fn register(&self, provider: impl ServiceProvider) -> Result<(), ApplicationError> {
        self.register_shared(Arc::new(provider))
    }

    /// [`Self::register`] for a provider the caller keeps a handle to.
    ///
    /// # Errors
    /// Propagates the provider's own `register`/`boot` failure.
    pub fn register_shared(&self, provider: Arc<dyn ServiceProvider>) -> Result<(), ApplicationError> {
        let name = provider.name();
        if self.providers.read().iter().any(|e| e.provider.name() == name) {
            debug!(provider = name, "Provider already registered");
            return Ok(());
        }

        provider.register(self).map_err(|source| ApplicationError::Provider {
            provider: name,
            phase: "register",
            source,
            context: None,
        })?;
        trace!(provider = name, "Provider registered");

        let index = {
            let mut providers = self.providers.write();
            providers.push(Entry { provider: Arc::clone(&provider), booted: false });
            providers.len() - 1
        };

        if self.is_booted() {
            self.boot_provider(provider.as_ref())?;
            self.mark_booted(index);
        }
        Ok(())
    }

    /// Boots every registered provider that has not booted yet, in
    /// registration order. Providers registered while booting are booted too.
    ///
    /// # Errors
    /// Stops at the first provider that fails. That provider stays unbooted,
    /// so a later `boot` retries it.
    pub fn boot(&self) -> Result<(), ApplicationError> {
        let mut index = 0;
        loop {
            let next = {
                let mut providers = self.providers.write();
                let Some(entry) = providers.get_mut(index) else {
                    break;
                };
                index += 1;
                if entry.booted {
                    continue;
                }
                Arc::clone(&entry.provider)
            };
            self.boot_provider(next.as_ref())?;
            self.mark_booted(index - 1);
        }

        if !self.booted.swap(true, Ordering::AcqRel) {
            info!(providers = index, context = %self.context, "Application booted");
        }
        Ok(())
    }

    fn mark_booted(&self, index: usize) {
        if let Some(entry) = self.providers.write().get_mut(index) {
            entry.booted = true;
        }
    }

    fn boot_provider(&self, provider: &dyn ServiceProvider) -> Result<(), ApplicationError> {
        provider.boot(self).map_err(|source| ApplicationError::Provider {
            provider: provider.name(),
            phase: "boot",
            source,
            context: None,
        })?;
        trace!(provider = provider.name(), "Provider booted");
        Ok(())
    }
}

#[derive(Debug)]
pub struct ApplicationBuilder {
    base_path: Option<PathBuf>,
    context: RunContext,
    config: Option<ConfigStore>,
    events: Option<Dispatcher>,
    http: bool,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self { base_path: None, context: RunContext::default(), config: None, events: None, http: true }
    }
}

impl ApplicationBuilder {
    #[must_use]
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn context(mut self, context: RunContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn config(mut self, config: ConfigStore) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn events(mut self, events: Dispatcher) -> Self {
        self.events = Some(events);
        self
    }

    /// Run without a route table (workers, schedulers).
    #[must_use]
    pub const fn without_http(mut self) -> Self {
        self.http = false;
        self
    }

    /// # Errors
    /// Returns [`ApplicationError::Validation`] when no base path was given.
    pub fn build(self) -> Result<Application, ApplicationError> {
        let base_path = self.base_path.ok_or_else(|| ApplicationError::Validation {
            message: "base path not provided".into(),
            context: None,
        })?;
        let config = self.config.unwrap_or_default();
        let events = self.events.unwrap_or_default();

        let container = Container::new();
        container.instance(keys::CONFIG, config.clone());
        container.instance(keys::EVENTS, events.clone());

        Ok(Application {
            base_path,
            context: self.context,
            container,
            config,
            events,
            router: self.http.then(Router::new),
            commands: CommandBus::new(),
            publishes: PublishRegistry::new(),
            views: ViewRegistry::new(),
            providers: RwLock::new(Vec::new()),
            booted: AtomicBool::new(false),
        })
    }
}
