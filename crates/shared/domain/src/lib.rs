//! # Domain Models
//!
//! Pure declaration types with a single dependency (`serde`).
//! Keep it lean: no I/O and no host state, just the data a feature module
//! declares and the host consumes.

pub mod config;
pub mod context;
pub mod declarations;

pub use context::RunContext;
pub use declarations::{
    BootState, CommandContext, CommandDeclaration, EventBinding, PublishGroup, RouteGroupSpec,
};
