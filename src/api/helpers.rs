use crate::errors::ApiError;
use crate::services::{AuthorityResolver, TokenService};
use crate::types::internal::RoleName;

/// Verify a bearer token and gate on roles
///
/// With an empty `required_any` the endpoint is authenticated-only: any
/// verified token passes, even one that resolved to no authorities. With
/// roles given, at least one must be present or the request is rejected with
/// 403. Token verification failures are 401.
pub async fn authorize(
    token_service: &TokenService,
    authority_resolver: &dyn AuthorityResolver,
    token: &str,
    required_any: &[RoleName],
) -> Result<(), ApiError> {
    let claims = token_service.verify(token)?;

    let authorities = authority_resolver
        .resolve_authorities(&claims)
        .await
        .map_err(ApiError::from)?;

    if !required_any.is_empty()
        && !required_any
            .iter()
            .any(|role| authorities.contains(&role.authority()))
    {
        tracing::debug!(
            external_id = %claims.sub,
            "Request rejected: none of the required roles present"
        );
        return Err(ApiError::forbidden());
    }

    Ok(())
}

/// Roles allowed to manage employees and run reports
pub const STAFF_ROLES: [RoleName; 2] = [RoleName::Admin, RoleName::Hr];

/// Authenticated-only access (no role requirement)
pub const ANY_AUTHENTICATED: [RoleName; 0] = [];
