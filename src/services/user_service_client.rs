use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

use crate::errors::InternalError;
use crate::services::authority_resolver::AuthorityResolver;
use crate::types::internal::TokenClaims;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize)]
struct AuthoritiesResponse {
    authorities: Vec<String>,
}

/// Authority resolution via the external user service
///
/// Tries lookup by email, falls back to the external subject id when the
/// first lookup yields nothing. Transport failures and non-2xx responses are
/// logged and treated as "no authorities" rather than propagated, so a user
/// service outage degrades to 403s instead of 500s.
pub struct UserServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl UserServiceClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { client, base_url }
    }

    async fn fetch_authorities(&self, path: &str) -> Option<HashSet<String>> {
        let url = format!("{}{}", self.base_url, path);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("User service request failed for {}: {}", path, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "User service returned {} for {}",
                response.status(),
                path
            );
            return None;
        }

        match response.json::<AuthoritiesResponse>().await {
            Ok(body) => Some(body.authorities.into_iter().collect()),
            Err(e) => {
                tracing::warn!("Failed to decode user service response for {}: {}", path, e);
                None
            }
        }
    }

    async fn authorities_by_email(&self, email: &str) -> HashSet<String> {
        self.fetch_authorities(&format!("/api/users/{}/authorities", email))
            .await
            .unwrap_or_default()
    }

    async fn authorities_by_external_id(&self, external_id: &str) -> HashSet<String> {
        self.fetch_authorities(&format!("/api/users/google/{}/authorities", external_id))
            .await
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuthorityResolver for UserServiceClient {
    async fn resolve_authorities(
        &self,
        claims: &TokenClaims,
    ) -> Result<HashSet<String>, InternalError> {
        if let Some(email) = claims.email.as_deref().filter(|e| !e.is_empty()) {
            let authorities = self.authorities_by_email(email).await;
            if !authorities.is_empty() {
                return Ok(authorities);
            }
        }

        if !claims.sub.is_empty() {
            let authorities = self.authorities_by_external_id(&claims.sub).await;
            if !authorities.is_empty() {
                return Ok(authorities);
            }
        }

        tracing::warn!(
            email = claims.email.as_deref().unwrap_or("<none>"),
            external_id = %claims.sub,
            "No authorities found for user"
        );
        Ok(HashSet::new())
    }
}
