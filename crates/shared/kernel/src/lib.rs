//! Host kernel shared by the shell and feature providers.
//!
//! Keep this crate small: every type here is the host side of a contract a
//! feature provider consumes during `register`/`boot`. None of them tries to
//! be a general framework.
//!
//! ## Lifecycle
//! ```rust
//! use hzn_kernel::app::{Application, BoxError, ServiceProvider};
//! use hzn_kernel::RunContext;
//!
//! struct Hello;
//!
//! impl ServiceProvider for Hello {
//!     fn name(&self) -> &'static str {
//!         "hello"
//!     }
//!
//!     fn register(&self, app: &Application) -> Result<(), BoxError> {
//!         app.container().singleton("greeting", |_| Ok(String::from("hi")));
//!         Ok(())
//!     }
//! }
//!
//! let app = Application::builder().base_path(".").context(RunContext::Console).build().unwrap();
//! app.register(Hello).unwrap();
//! app.boot().unwrap();
//! assert_eq!(*app.container().resolve::<String>("greeting").unwrap(), "hi");
//! ```

pub mod app;
pub mod broker;
pub mod commands;
pub mod config;
pub mod container;
pub mod keys;
pub mod publish;
pub mod queue;
pub mod router;
pub mod views;

pub use hzn_domain as domain;
pub use hzn_domain::RunContext;
pub use hzn_events as events;
