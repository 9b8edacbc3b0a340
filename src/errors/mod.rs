//! HTTP-facing error types.
//!
//! Provider-level errors live next to their clients (`core::erp`, `core::llm`, ...);
//! this module only holds errors that are rendered directly as HTTP responses.

pub mod app_error;
pub mod auth_error;
