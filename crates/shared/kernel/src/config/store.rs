use super::{ConfigError, read_document};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// The host's live configuration tree, addressed with dotted keys
/// (`database.redis.default.host`).
#[derive(Clone, Default)]
pub struct ConfigStore {
    inner: Arc<RwLock<Map<String, Value>>>,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.inner.read().keys().cloned().collect();
        f.debug_struct("ConfigStore").field("namespaces", &keys).finish()
    }
}

impl ConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing tree.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self { inner: Arc::new(RwLock::new(map)) }),
            other => Err(ConfigError::Invalid {
                message: format!("configuration root must be a table, got {}", kind_of(&other)).into(),
                context: None,
            }),
        }
    }

    /// Loads a whole document (layered with `HZN__` environment overrides).
    ///
    /// # Errors
    /// Propagates loader failures.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let map: Map<String, Value> = super::load_config(Some(path))?;
        Ok(Self { inner: Arc::new(RwLock::new(map)) })
    }

    /// Raw value at a dotted key.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<Value> {
        let root = self.inner.read();
        lookup(&root, key).cloned()
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        lookup(&self.inner.read(), key).is_some()
    }

    /// Typed value at a dotted key. `Ok(None)` when the key is absent.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when the value does not deserialize as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let Some(value) = self.value(key) else {
            return Ok(None);
        };
        serde_json::from_value(value).map(Some).map_err(|e| ConfigError::Invalid {
            message: format!("{key}: {e}").into(),
            context: None,
        })
    }

    /// Typed value at a dotted key, or `default` when absent or malformed.
    #[must_use]
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!(key, error = %e, "Ignoring malformed configuration value");
                default
            }
        }
    }

    /// Sets a dotted key, creating intermediate tables. Scalars in the way are
    /// replaced by tables.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        let mut root = self.inner.write();
        let mut segments = key.split('.').peekable();
        let mut table = &mut *root;

        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                table.insert(segment.to_owned(), value.into());
                return;
            }
            let slot = table.entry(segment.to_owned()).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(next) = slot else {
                return;
            };
            table = next;
        }
    }

    /// Layers `defaults` under `namespace`: keys the host already set win, and
    /// only missing top-level keys are filled in. Returns the keys that were
    /// added.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when the namespace holds a non-table value.
    pub fn merge_defaults(
        &self,
        namespace: &str,
        defaults: Map<String, Value>,
    ) -> Result<Vec<String>, ConfigError> {
        let existing = self.value(namespace);
        let mut current = match existing {
            None => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    message: format!("[{namespace}] must be a table, got {}", kind_of(&other)).into(),
                    context: None,
                });
            },
        };

        let mut added = Vec::new();
        for (key, value) in defaults {
            if !current.contains_key(&key) {
                added.push(key.clone());
                current.insert(key, value);
            }
        }

        debug!(namespace, added = added.len(), "Configuration defaults merged");
        self.set(namespace, Value::Object(current));
        Ok(added)
    }

    /// Reads `path` and layers it under `namespace` via [`Self::merge_defaults`].
    ///
    /// # Errors
    /// Fails when the document cannot be read or the namespace is not a table.
    pub fn merge_namespace(&self, namespace: &str, path: &Path) -> Result<Vec<String>, ConfigError> {
        let defaults = read_document(path)?;
        self.merge_defaults(namespace, defaults)
    }

    /// Deep copy of the whole tree.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        Value::Object(self.inner.read().clone())
    }
}

fn lookup<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    let mut segments = key.split('.');
    let first = root.get(segments.next()?)?;
    segments.try_fold(first, |value, segment| value.as_object()?.get(segment))
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}
