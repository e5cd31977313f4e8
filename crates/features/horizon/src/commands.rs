//! Console commands Horizon attaches to the host.

use hzn_domain::{CommandDeclaration, RunContext};
use hzn_kernel::commands::CommandBus;
use tracing::debug;

pub const SNAPSHOT: &str = "horizon:snapshot";
pub const WORK: &str = "horizon:work";

/// Every command, in registration order. Only the snapshot command runs
/// outside the console, since the in-process scheduler invokes it.
pub const COMMANDS: [CommandDeclaration; 11] = [
    CommandDeclaration::console("horizon:assets", "Re-publish the Horizon assets"),
    CommandDeclaration::console("horizon:list", "List all of the deployed machines"),
    CommandDeclaration::console("horizon:purge", "Terminate any rogue Horizon processes"),
    CommandDeclaration::console("horizon:pause", "Pause the master supervisor"),
    CommandDeclaration::console("horizon:continue", "Instruct the master supervisor to continue processing jobs"),
    CommandDeclaration::console("horizon:supervisor", "Start a new supervisor"),
    CommandDeclaration::console("horizon:supervisors", "List all of the supervisors"),
    CommandDeclaration::console("horizon:terminate", "Terminate the master supervisor so it can be restarted"),
    CommandDeclaration::console("horizon:timeout", "Get the maximum timeout for the given environment"),
    CommandDeclaration::console(WORK, "Start processing jobs on the queue as a daemon"),
    CommandDeclaration::always(SNAPSHOT, "Store a snapshot of the queue metrics"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRegistrar;

impl CommandRegistrar {
    /// Registers the commands `context` allows. Returns how many were new.
    pub fn register_commands(bus: &CommandBus, context: RunContext) -> usize {
        let allowed: Vec<&str> =
            COMMANDS.iter().filter(|c| c.context.allows(context)).map(|c| c.name).collect();
        let added = bus.register_many(allowed.iter().copied());
        debug!(context = %context, allowed = allowed.len(), added, "Horizon commands registered");
        added
    }

    #[must_use]
    pub fn describe(name: &str) -> Option<&'static str> {
        COMMANDS.iter().find(|c| c.name == name).map(|c| c.description)
    }
}
