#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the host kernel and its feature modules.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! hzn-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining the error enums of a crate.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to results of every wrapped source error.
/// * **Standard Conversions**: Implements `From<T>` for variants with a `source` field
///   (or a field marked `#[source]`/`#[from]`), so `?` works on upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant is present.
/// * **Diagnostics**: `kind()` returns the variant name as a `&'static str`.
///
/// # Requirements
///
/// 1. Only enums are accepted.
/// 2. Variants use named fields; tuple and unit variants are rejected.
/// 3. Variants with a source must also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[hzn_derive::hzn_error]
/// pub enum PublishError {
///     #[error("Tag not found{}: {message}", format_context(.context))]
///     TagNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("I/O error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
/// }
///
/// fn copy() -> Result<(), PublishError> {
///     std::fs::copy("a", "b").context("Copying asset")?;
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn hzn_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
