//! # Horizon
//!
//! Attaches the Horizon queue dashboard to a modular host. The module is a
//! [`ServiceProvider`](hzn_kernel::app::ServiceProvider): the host registers
//! it alongside its own providers and it wires itself in two phases.
//!
//! ## Register
//! 1. **Configuration**: defaults from `config/horizon.toml` are merged under
//!    `horizon` ([`config`]) and the selected broker connection is copied to a
//!    dedicated, prefixed `horizon` connection.
//! 2. **Publishing**: the config document is offered as `horizon-config`
//!    (console only).
//! 3. **Services**: lazy singletons from the [`bindings`] table.
//! 4. **Queue**: the `horizon.console.work` command and the `redis` queue
//!    connector, added whenever the host queue manager is built.
//! 5. **Commands**: the admin commands in a console, `horizon:snapshot` always.
//!
//! ## Boot
//! Event listeners ([`events`]), the dashboard route group ([`routes`]), the
//! broker alias (resolved eagerly), the `horizon` view namespace and the
//! `horizon-assets` publish group.
//!
//! ```rust,no_run
//! use hzn_horizon::HorizonServiceProvider;
//! use hzn_kernel::app::Application;
//!
//! let app = Application::builder().base_path("/srv/app").build().unwrap();
//! app.register(HorizonServiceProvider::bundled()).unwrap();
//! app.boot().unwrap();
//! ```

pub mod bindings;
pub mod commands;
pub mod config;
pub mod connector;
pub mod console;
mod error;
pub mod events;
pub mod provider;
pub mod publish;
pub mod routes;
pub mod services;

pub use crate::error::{BootstrapError, BootstrapErrorExt};
pub use crate::provider::HorizonServiceProvider;
