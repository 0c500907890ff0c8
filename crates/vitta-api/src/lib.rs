//! vitta-api: Typed HTTP client for the vitta backend
//!
//! Wraps the chat query endpoint, the policy endpoints, and the two
//! external form-script endpoints (waitlist, feedback) behind explicit
//! configuration. Failures are normalized into the [`Error`] taxonomy
//! whose display strings are what end users see.

pub mod client;
pub mod error;
pub mod forms;
pub mod types;

pub use client::{ApiClient, ApiConfig};
pub use error::{Error, Result};
pub use forms::{FormClient, FormConfig};
pub use types::*;
