use std::borrow::Cow;

#[hzn_derive::hzn_error]
pub enum PublishError {
    #[error("Unknown publish tag{}: {message}", format_context(.context))]
    TagNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Publish source missing{}: {message}", format_context(.context))]
    MissingSource { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Publish I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Publish walk error{}: {source}", format_context(.context))]
    Walk { source: walkdir::Error, context: Option<Cow<'static, str>> },
}
