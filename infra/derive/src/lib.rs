#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate in the workspace.
//!
//! * [`crwa_error`] turns an enum into a `thiserror` error with context support.
//! * [`api_model`] declares a response/request body with serde and `OpenAPI` schema derives.
//! * [`api_handler`] declares an axum handler documented through `utoipa::path`.
//!
//! The examples are `ignore`d because a proc-macro crate cannot use its own macros in doctests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Declares a documented API body.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug`, `Serialize`, `Deserialize` and `utoipa::ToSchema` when missing.
/// * **Serde Policy**: `rename_all = "camelCase"` and `deny_unknown_fields` unless overridden.
///
/// # Arguments
///
/// * `rename_all = "snake_case"` - Overrides the default rename policy.
/// * `deny_unknown_fields = false` - Disables strict field checking.
///
/// # Example
///
/// ```rust,ignore
/// use crwa_derive::api_model;
///
/// #[api_model(rename_all = "snake_case")]
/// pub struct ServiceInfo {
///     pub name: String,
///     pub version: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Declares an axum handler and registers its `OpenAPI` operation.
///
/// Accepts the standard `utoipa::path` arguments (`get`, `path = "..."`, `responses(...)`,
/// `tag = ...`). Handlers declared this way can be collected with `utoipa_axum::routes!`.
///
/// # Example
///
/// ```rust,ignore
/// use crwa_derive::api_handler;
///
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)))]
/// pub async fn health_handler() -> Json<HealthResponse> {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns an enum into the workspace's standard error type.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` when not already derived.
/// * `<ErrorName>Ext` trait with `.context(...)`, implemented for `Result<T, ErrorName>`
///   and for `Result<T, Source>` of every variant holding a source.
/// * `From<Source>` for variants with a `source` field (or a field marked `#[source]`/`#[from]`).
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper for the `#[error(...)]` strings.
///
/// # Requirements
///
/// * Only enums with named-field variants are accepted.
/// * A `context` field must be `Option<Cow<'static, str>>`.
/// * A variant with a source must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use crwa_derive::crwa_error;
/// use std::borrow::Cow;
///
/// #[crwa_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<Vec<u8>, StoreError> {
///     std::fs::read(path).context("Reading store file")
/// }
/// ```
#[proc_macro_attribute]
pub fn crwa_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
