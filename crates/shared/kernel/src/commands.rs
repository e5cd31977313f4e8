//! Console command registry.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

/// Ordered set of command names available to the host's console.
#[derive(Debug, Clone, Default)]
pub struct CommandBus {
    names: Arc<RwLock<Vec<String>>>,
}

impl CommandBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds commands in order, skipping names already present. Returns how
    /// many were new.
    pub fn register_many<I, S>(&self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registered = self.names.write();
        let mut added = 0;
        for name in names {
            let name = name.into();
            if registered.contains(&name) {
                trace!(command = %name, "Command already registered");
                continue;
            }
            registered.push(name);
            added += 1;
        }
        added
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.read().iter().any(|n| n == name)
    }

    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.names.read().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_skips_duplicates() {
        let bus = CommandBus::new();
        assert_eq!(bus.register_many(["horizon:list", "horizon:pause"]), 2);
        assert_eq!(bus.register_many(["horizon:pause", "horizon:snapshot"]), 1);
        assert_eq!(bus.commands(), vec!["horizon:list", "horizon:pause", "horizon:snapshot"]);
    }
}
