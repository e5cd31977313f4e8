use std::borrow::Cow;

/// Errors raised by the service container.
#[hzn_derive::hzn_error]
pub enum ContainerError {
    /// Nothing is bound under the key (after alias resolution).
    #[error("Binding not found{}: {message}", format_context(.context))]
    NotBound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The bound instance is not of the requested type.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A factory failed to build its instance.
    #[error("Resolution failed{}: {message}", format_context(.context))]
    Resolution { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A factory (indirectly) asked for the key it is building.
    #[error("Circular dependency{}: {message}", format_context(.context))]
    Circular { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// An alias would point at itself.
    #[error("Invalid alias{}: {message}", format_context(.context))]
    Alias { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
