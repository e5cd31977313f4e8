use hzn_kernel::config::ConfigError;
use hzn_kernel::container::ContainerError;
use std::borrow::Cow;

/// Failures while attaching Horizon to a host. None are recovered locally:
/// each aborts the running phase and propagates to the host.
#[hzn_derive::hzn_error]
pub enum BootstrapError {
    /// Default configuration could not be read, merged or validated.
    #[error("Configuration load failed{}: {source}", format_context(.context))]
    ConfigLoad { source: ConfigError, context: Option<Cow<'static, str>> },

    /// Two service bindings claim the same container key.
    #[error("Binding conflict{}: {message}", format_context(.context))]
    BindingConflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A service the module needs could not be resolved.
    #[error("Resolution failed{}: {source}", format_context(.context))]
    Resolution { source: ContainerError, context: Option<Cow<'static, str>> },

    /// An event name is declared twice in the event map.
    #[error("Duplicate event declaration{}: {message}", format_context(.context))]
    DuplicateEventDeclaration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A phase was invoked out of order.
    #[error("Lifecycle violation{}: {message}", format_context(.context))]
    Lifecycle { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal bootstrap error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
