use std::borrow::Cow;

/// Errors raised while dispatching an event.
#[hzn_derive::hzn_error]
pub enum EventError {
    /// A listener id is attached but no handler was subscribed for it.
    #[error("Unresolved listener{}: {message}", format_context(.context))]
    UnresolvedListener { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A handler reported a failure; later listeners were not run.
    #[error("Listener failed{}: {message}", format_context(.context))]
    Listener { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
