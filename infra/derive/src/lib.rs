#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the cipher pool workspace.
//!
//! * [`macro@cpool_error`] turns a plain enum into a `thiserror` error type with
//!   context support and `From` conversions.
//! * [`macro@main`] bootstraps an `async fn main` on the workspace runtime.
//!
//! The examples are `ignore`d here because proc-macro crates cannot use their own
//! macros in doctests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, parse_macro_input};

/// Attribute macro to bootstrap the workspace Tokio runtime.
///
/// Transforms an `async fn main` returning a `Result` into a synchronous `main`
/// that builds a runtime from a `cpool_runtime::RuntimeConfig` preset and blocks on
/// the function body.
///
/// # Arguments
///
/// * `service` - Multi-threaded preset sized to the host (the default).
/// * `compact` - Small footprint preset for command-line tools and tests.
///
/// # Examples
///
/// ```rust,ignore
/// #[cpool_runtime::main(compact)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for workspace error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait adding `.context(...)` to `Result<T, ErrorName>` and to
///   `Result<T, Source>` for every variant that wraps a `source`.
/// * `From<Source>` for every variant with a `source` field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A module-private `format_context` helper for `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant with a `source` field must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[cpool_derive::cpool_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read() -> Result<Vec<u8>, StoreError> {
///     std::fs::read("store.bin").context("Reading store")
/// }
/// ```
#[proc_macro_attribute]
pub fn cpool_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
