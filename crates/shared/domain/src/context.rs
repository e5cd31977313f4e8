use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of process the host is running as.
///
/// Passed explicitly into the host and every feature provider; nothing
/// queries it from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunContext {
    /// Interactive operator shell (commands, publishing).
    #[default]
    Console,
    /// Long-running server process (requests, scheduler).
    Server,
}

impl RunContext {
    #[must_use]
    pub const fn is_console(self) -> bool {
        matches!(self, Self::Console)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
