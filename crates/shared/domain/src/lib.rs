//! # Domain Models
//!
//! Pure data types shared by every crate: the application configuration and its
//! per-environment profiles, the credential bundle read from the vault, and the
//! string constants used for `OpenAPI` tags.
//! Keep it lean: no I/O, networking, or heavy logic. Just data and simple helpers.

pub mod config;
pub mod constants;
pub mod environment;
pub mod keys;
mod profile;

pub use environment::Environment;
