//! Facade crate for the host kernel and its feature modules.
//! Re-exports domain/kernel primitives and installs enabled feature providers.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `hzn` with the desired feature flags (`horizon` is on by default).
//! - Build an [`kernel::app::Application`], call [`init`], then `boot()` it.

pub use hzn_domain as domain;
pub use hzn_events as events;
pub use hzn_kernel as kernel;

use hzn_kernel::app::{Application, ApplicationError};
use hzn_kernel::broker::BrokerServiceProvider;
use hzn_kernel::queue::QueueServiceProvider;
use tracing::info;

/// Feature registry for runtime introspection.
pub mod features {
    #[cfg(feature = "horizon")]
    pub use hzn_horizon as horizon;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "horizon")]
        "horizon",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Registers the host's core providers followed by every enabled feature
/// provider. Booting is left to the caller.
///
/// # Errors
/// Returns the first provider registration failure.
pub fn init(app: &Application) -> Result<(), ApplicationError> {
    // Core services features resolve from
    app.register(QueueServiceProvider)?;
    app.register(BrokerServiceProvider)?;

    // Horizon queue dashboard
    #[cfg(feature = "horizon")]
    app.register(features::horizon::HorizonServiceProvider::bundled())?;

    info!(features = ?features::ENABLED, providers = ?app.providers(), "Features installed");
    Ok(())
}
