//! String-keyed service container.
//!
//! Bindings are factories keyed by name. Shared bindings (`singleton`) build
//! once, on first resolution, and cache the instance. Aliases map a second
//! name onto an existing key. Resolution hooks (`resolving`) run whenever the
//! key's instance is constructed.

mod error;

pub use error::{ContainerError, ContainerErrorExt};

use fxhash::FxHashMap;
use parking_lot::{Mutex, RwLock};
use std::any::{Any, type_name};
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::thread::{self, ThreadId};
use tracing::{debug, trace, warn};

/// A resolved service.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Builds a service, possibly resolving its dependencies from the container.
pub type Factory = Arc<dyn Fn(&Container) -> Result<Instance, ContainerError> + Send + Sync>;

type Hook = Arc<dyn Fn(&Instance, &Container) + Send + Sync>;

struct Binding {
    factory: Factory,
    shared: bool,
    instance: OnceLock<Instance>,
    /// Held while a shared instance is being built.
    init: Mutex<()>,
}

#[derive(Default)]
struct Registry {
    bindings: FxHashMap<String, Arc<Binding>>,
    aliases: FxHashMap<String, String>,
    hooks: FxHashMap<String, Vec<Hook>>,
}

impl Registry {
    /// Follows the alias chain down to the key the binding lives under.
    fn canonical(&self, key: &str) -> String {
        let mut current = key;
        // An alias chain can never be longer than the alias table.
        for _ in 0..=self.aliases.len() {
            match self.aliases.get(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        current.to_owned()
    }
}

#[derive(Default)]
struct Inner {
    registry: RwLock<Registry>,
    /// Keys under construction, per resolving thread.
    building: Mutex<Vec<(ThreadId, String)>>,
}

/// Cheap-to-clone handle to a shared service registry.
#[derive(Clone, Default)]
pub struct Container {
    inner: Arc<Inner>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.registry.read();
        f.debug_struct("Container")
            .field("bindings", &registry.bindings.len())
            .field("aliases", &registry.aliases.len())
            .finish()
    }
}

impl Container {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a fresh-per-resolution factory.
    pub fn bind<T, F>(&self, key: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.bind_factory(key, erase(factory), false);
    }

    /// Binds a lazily built, cached factory.
    pub fn singleton<T, F>(&self, key: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.bind_factory(key, erase(factory), true);
    }

    /// Binds a type-erased factory. Rebinding a key replaces the previous
    /// binding and drops its cached instance.
    pub fn bind_factory(&self, key: impl Into<String>, factory: Factory, shared: bool) {
        let key = key.into();
        let binding = Arc::new(Binding { factory, shared, instance: OnceLock::new(), init: Mutex::new(()) });

        let mut registry = self.inner.registry.write();
        registry.aliases.remove(&key);
        if registry.bindings.insert(key.clone(), binding).is_some() {
            debug!(key = %key, "Binding replaced");
        } else {
            trace!(key = %key, shared, "Binding registered");
        }
    }

    /// Stores an already built value as a shared instance.
    pub fn instance<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        let key = key.into();
        let instance: Instance = Arc::new(value);
        let cached = OnceLock::new();
        let _ = cached.set(Arc::clone(&instance));

        let binding = Arc::new(Binding {
            factory: Arc::new(move |_: &Container| Ok(Arc::clone(&instance))),
            shared: true,
            instance: cached,
            init: Mutex::new(()),
        });

        let mut registry = self.inner.registry.write();
        registry.aliases.remove(&key);
        registry.bindings.insert(key, binding);
    }

    /// Makes `alias` resolve to whatever `key` resolves to.
    ///
    /// # Errors
    /// Returns [`ContainerError::Alias`] when the alias would point at itself.
    pub fn alias(&self, key: impl Into<String>, alias: impl Into<String>) -> Result<(), ContainerError> {
        let (key, alias) = (key.into(), alias.into());
        let mut registry = self.inner.registry.write();

        if registry.canonical(&key) == alias {
            return Err(ContainerError::Alias {
                message: format!("[{alias}] is aliased to itself").into(),
                context: None,
            });
        }

        trace!(alias = %alias, key = %key, "Alias registered");
        registry.aliases.insert(alias, key);
        Ok(())
    }

    /// Whether `key` (or the key it aliases) has a binding.
    #[must_use]
    pub fn bound(&self, key: &str) -> bool {
        let registry = self.inner.registry.read();
        let name = registry.canonical(key);
        registry.bindings.contains_key(&name)
    }

    /// Whether a shared instance has already been built for `key`.
    #[must_use]
    pub fn resolved(&self, key: &str) -> bool {
        let registry = self.inner.registry.read();
        let name = registry.canonical(key);
        registry.bindings.get(&name).is_some_and(|b| b.instance.get().is_some())
    }

    /// Whether `key` is shared (singleton or instance).
    #[must_use]
    pub fn is_shared(&self, key: &str) -> bool {
        let registry = self.inner.registry.read();
        let name = registry.canonical(key);
        registry.bindings.get(&name).is_some_and(|b| b.shared)
    }

    /// Key an alias points to, following chains.
    #[must_use]
    pub fn canonical(&self, key: &str) -> String {
        self.inner.registry.read().canonical(key)
    }

    /// Registered binding keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.registry.read().bindings.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Resolves and downcasts a service.
    ///
    /// # Errors
    /// Fails when nothing is bound, the factory fails, or the instance is not a `T`.
    pub fn resolve<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, ContainerError> {
        self.resolve_any(key)?.downcast::<T>().map_err(|_| ContainerError::TypeMismatch {
            message: format!("[{key}] is not a {}", type_name::<T>()).into(),
            context: None,
        })
    }

    /// Resolves a service without downcasting it.
    ///
    /// # Errors
    /// Fails when nothing is bound, the factory fails, or the key is already
    /// being built further up the stack.
    pub fn resolve_any(&self, key: &str) -> Result<Instance, ContainerError> {
        let (name, binding) = {
            let registry = self.inner.registry.read();
            let name = registry.canonical(key);
            let binding = registry.bindings.get(&name).cloned();
            (name, binding)
        };

        let Some(binding) = binding else {
            return Err(ContainerError::NotBound { message: key.to_owned().into(), context: None });
        };

        if let Some(instance) = binding.instance.get() {
            return Ok(Arc::clone(instance));
        }

        let (instance, built) = self.build(&name, &binding)?;
        if built {
            self.fire(&name, &instance);
        }
        Ok(instance)
    }

    /// Registers a hook that runs with the instance each time `key` is built.
    /// When a shared instance already exists the hook runs immediately.
    pub fn resolving<T, F>(&self, key: impl Into<String>, hook: F)
    where
        T: Any + Send + Sync,
        F: Fn(&T, &Container) + Send + Sync + 'static,
    {
        let key = key.into();
        let label = key.clone();
        let hook: Hook = Arc::new(move |instance: &Instance, container: &Container| {
            match instance.downcast_ref::<T>() {
                Some(value) => hook(value, container),
                None => warn!(key = %label, expected = type_name::<T>(), "Resolving hook skipped: type mismatch"),
            }
        });

        let existing = {
            let mut registry = self.inner.registry.write();
            let name = registry.canonical(&key);
            registry.hooks.entry(name.clone()).or_default().push(Arc::clone(&hook));
            registry.bindings.get(&name).and_then(|b| b.instance.get().cloned())
        };

        if let Some(instance) = existing {
            debug!(key = %key, "Service already resolved, running hook now");
            hook(&instance, self);
        }
    }

    /// Runs the factory. A shared binding is built by exactly one caller;
    /// the flag is `false` when another thread installed the instance first.
    fn build(&self, name: &str, binding: &Binding) -> Result<(Instance, bool), ContainerError> {
        let thread = thread::current().id();
        {
            let mut building = self.inner.building.lock();
            if building.iter().any(|(t, k)| *t == thread && k == name) {
                let chain: Vec<&str> =
                    building.iter().filter(|(t, _)| *t == thread).map(|(_, k)| k.as_str()).collect();
                return Err(ContainerError::Circular {
                    message: format!("{} -> {name}", chain.join(" -> ")).into(),
                    context: None,
                });
            }
            building.push((thread, name.to_owned()));
        }

        let result = if binding.shared {
            let _init = binding.init.lock();
            match binding.instance.get() {
                Some(instance) => Ok((Arc::clone(instance), false)),
                None => (binding.factory)(self).map(|instance| {
                    let _ = binding.instance.set(Arc::clone(&instance));
                    (instance, true)
                }),
            }
        } else {
            (binding.factory)(self).map(|instance| (instance, true))
        };

        let mut building = self.inner.building.lock();
        if let Some(pos) = building.iter().rposition(|(t, k)| *t == thread && k == name) {
            building.remove(pos);
        }
        drop(building);

        trace!(key = %name, ok = result.is_ok(), "Service resolved");
        result
    }

    fn fire(&self, name: &str, instance: &Instance) {
        let hooks = self.inner.registry.read().hooks.get(name).cloned().unwrap_or_default();
        for hook in hooks {
            hook(instance, self);
        }
    }
}

fn erase<T, F>(factory: F) -> Factory
where
    T: Any + Send + Sync,
    F: Fn(&Container) -> Result<T, ContainerError> + Send + Sync + 'static,
{
    Arc::new(move |container: &Container| factory(container).map(|value| Arc::new(value) as Instance))
}
