// Internal types - not exposed on the wire
pub mod auth;

pub use auth::{RoleName, TokenClaims, AUTHORITY_PREFIX};
