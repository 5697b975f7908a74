use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix applied to role names when mapping to authorities
pub const AUTHORITY_PREFIX: &str = "ROLE_";

/// The fixed application role set, seeded as reference data by the migration
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoleName {
    Admin,
    Hr,
    User,
}

impl RoleName {
    /// Stable database name for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "ADMIN",
            RoleName::Hr => "HR",
            RoleName::User => "USER",
        }
    }

    /// Authority string consumed by the authorization layer, e.g. "ROLE_ADMIN"
    pub fn authority(&self) -> String {
        format!("{}{}", AUTHORITY_PREFIX, self.as_str())
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims extracted from a verified identity token
///
/// The token itself is validated (signature, expiry, issuer/audience) by the
/// TokenService before these claims reach the authority resolver.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// External subject id from the identity provider
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl TokenClaims {
    /// True when neither identity key carries a usable value
    ///
    /// Resolution for such a token yields an empty authority set rather than
    /// provisioning a user record.
    pub fn has_no_identity(&self) -> bool {
        self.email.as_deref().unwrap_or("").is_empty() && self.sub.is_empty()
    }
}
