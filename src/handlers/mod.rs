//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `webhook` - WhatsApp gateway verification and inbound messages
//! - `voice` - Voice question upload

pub mod api;
pub mod voice;
pub mod webhook;
