//! # Event Dispatcher
//!
//! The host's event dispatcher: event names map to ordered lists of listener
//! ids, and listener ids map to handlers.
//!
//! Attaching is declarative and cheap (`listen`); handlers are looked up only
//! when an event is dispatched, so a module can declare listeners whose
//! implementations the host supplies later.
//!
//! * **Ordered**: listeners run in the order they were attached.
//! * **Not idempotent**: attaching the same listener twice runs it twice.
//! * **Shared**: `Dispatcher` is a cheap `Arc` clone over an
//!   `FxHashMap` + `parking_lot::RwLock`.
//!
//! # Example
//!
//! ```rust
//! use hzn_events::{Dispatcher, EventError};
//! use std::any::Any;
//!
//! # fn main() -> Result<(), EventError> {
//! let events = Dispatcher::new();
//! events.listen("horizon.job_pushed", "store_job");
//! events.subscribe("store_job", |_event: &str, _payload: &dyn Any| -> Result<(), EventError> { Ok(()) });
//!
//! assert_eq!(events.dispatch("horizon.job_pushed", &())?, 1);
//! # Ok(())
//! # }
//! ```

mod dispatcher;
mod error;

pub use dispatcher::{Dispatcher, Listener};
pub use error::{EventError, EventErrorExt};
