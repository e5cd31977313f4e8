//! Declarations a feature module hands to the host.

use crate::context::RunContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// An event name and the listeners attached to it, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBinding {
    pub event: String,
    pub listeners: Vec<String>,
}

impl EventBinding {
    pub fn new<E, I, L>(event: E, listeners: I) -> Self
    where
        E: Into<String>,
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self { event: event.into(), listeners: listeners.into_iter().map(Into::into).collect() }
    }
}

/// Options for a group of routes owned by one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGroupSpec {
    pub prefix: String,
    pub namespace: String,
    pub middleware: Vec<String>,
}

/// A tagged set of `source -> destination` copies, run only on operator request.
///
/// `BTreeMap` keeps publish order stable between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishGroup {
    pub tag: String,
    pub paths: BTreeMap<PathBuf, PathBuf>,
}

impl PublishGroup {
    pub fn new<T, I, S, D>(tag: T, paths: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = (S, D)>,
        S: Into<PathBuf>,
        D: Into<PathBuf>,
    {
        Self {
            tag: tag.into(),
            paths: paths.into_iter().map(|(s, d)| (s.into(), d.into())).collect(),
        }
    }
}

/// Where a command may be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandContext {
    ConsoleOnly,
    Always,
}

impl CommandContext {
    #[must_use]
    pub const fn allows(self, context: RunContext) -> bool {
        match self {
            Self::Always => true,
            Self::ConsoleOnly => context.is_console(),
        }
    }
}

/// A command implementation id plus the context it requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandDeclaration {
    pub name: &'static str,
    pub description: &'static str,
    pub context: CommandContext,
}

impl CommandDeclaration {
    #[must_use]
    pub const fn console(name: &'static str, description: &'static str) -> Self {
        Self { name, description, context: CommandContext::ConsoleOnly }
    }

    #[must_use]
    pub const fn always(name: &'static str, description: &'static str) -> Self {
        Self { name, description, context: CommandContext::Always }
    }
}

/// Lifecycle position of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BootState {
    #[default]
    Unregistered,
    Registered,
    Booted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_only_commands_are_gated() {
        assert!(CommandContext::ConsoleOnly.allows(RunContext::Console));
        assert!(!CommandContext::ConsoleOnly.allows(RunContext::Server));
        assert!(CommandContext::Always.allows(RunContext::Server));
    }

    #[test]
    fn boot_states_are_ordered() {
        assert!(BootState::Unregistered < BootState::Registered);
        assert!(BootState::Registered < BootState::Booted);
    }

    #[test]
    fn event_binding_keeps_listener_order() {
        let binding = EventBinding::new("job_pushed", ["store_job", "store_tags"]);
        assert_eq!(binding.listeners, vec!["store_job".to_owned(), "store_tags".to_owned()]);
    }
}
