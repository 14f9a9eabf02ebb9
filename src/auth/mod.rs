//! Credential checks and signed authorization tokens.
//!
//! The login route verifies the submitted credentials against the configured
//! admin identity and mints a token; the authorization gate in
//! [`crate::middleware::auth`] verifies that token on every protected route.

pub mod credentials;
pub mod token;

pub use credentials::AdminCredentials;
pub use token::{Claims, TokenError, TokenKeys, TOKEN_VALIDITY_HOURS};
