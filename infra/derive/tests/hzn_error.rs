use hzn_derive::hzn_error;
use std::borrow::Cow;

mod resolution {
    use super::{Cow, hzn_error};

    #[hzn_error]
    pub enum ResolveError {
        #[error("Not bound{}: {message}", format_context(.context))]
        NotBound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

        #[error("I/O failure{}: {source}", format_context(.context))]
        Io { source: std::io::Error, context: Option<Cow<'static, str>> },

        #[error("Internal{}: {message}", format_context(.context))]
        Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    }
}

use resolution::{ResolveError, ResolveErrorExt};

#[test]
fn hzn_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/hzn_error_pass.rs");
}

#[test]
fn context_is_rendered_in_display() {
    let result: Result<(), ResolveError> =
        Err(ResolveError::NotBound { message: "redis".into(), context: None });

    let err = result.context("Booting horizon").unwrap_err();
    assert_eq!(err.to_string(), "Not bound (Booting horizon): redis");
}

#[test]
fn source_errors_convert_with_context() {
    let io: Result<(), std::io::Error> =
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));

    let err = io.context("Loading defaults").unwrap_err();
    assert_eq!(err.kind(), "Io");
    assert!(err.to_string().starts_with("I/O failure (Loading defaults)"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn question_mark_uses_from_impl() {
    fn open() -> Result<(), ResolveError> {
        std::fs::File::open("/definitely/not/here/horizon.toml")?;
        Ok(())
    }

    let err = open().unwrap_err();
    assert!(matches!(err, ResolveError::Io { context: None, .. }));
}

#[test]
fn internal_fallback_from_strings() {
    let a: ResolveError = "static message".into();
    let b: ResolveError = String::from("owned message").into();

    assert_eq!(a.kind(), "Internal");
    assert_eq!(b.to_string(), "Internal: owned message");
}
