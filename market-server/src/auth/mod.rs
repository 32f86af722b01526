//! Authentication module
//!
//! JWT validation and the current-user context:
//! - [`JwtService`] - token validation/minting
//! - [`CurrentUser`] - acting user, injected into every core operation

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
