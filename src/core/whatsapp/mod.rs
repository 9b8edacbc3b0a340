//! WhatsApp channel plumbing.
//!
//! - [`inbound`]: extraction of sender and text from webhook payloads
//! - [`sender`]: outbound replies through the local WPPConnect server

pub mod inbound;
pub mod sender;

use thiserror::Error;

pub use inbound::{IgnoreReason, InboundEvent, InboundMessage, parse_inbound};
pub use sender::{GatewayResponse, SendMessageRequest, WppConnectClient};

/// Errors raised while delivering a reply to the gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Network(String),

    #[error("Gateway rejected message with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}
