pub mod auth;

pub use auth::voice_token_middleware;
