use hzn_derive::hzn_error;
use std::borrow::Cow;

#[hzn_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Missing key{}: {key}", format_context(.context))]
    Missing { key: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, DemoError> {
    let text = std::fs::read_to_string("missing.toml").context("Reading defaults")?;
    Ok(text)
}

fn main() {
    let _ = read();
    let err: DemoError = "boom".into();
    assert_eq!(err.kind(), "Internal");
}
