use poem::http::{header, HeaderValue};
use poem::{Endpoint, Middleware, Request, Result};

/// Middleware that makes a token carried in a cookie visible as a bearer
/// header
///
/// Downstream authentication only reads the Authorization header; this bridge
/// lets browser clients that hold the token in a cookie pass through the same
/// path. A real `Authorization: Bearer ...` header always wins and suppresses
/// cookie inspection entirely. When several cookies share the configured
/// name, the first match in header order is authoritative.
pub struct CookieJwtBridge {
    cookie_name: String,
}

impl CookieJwtBridge {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }
}

impl<E: Endpoint> Middleware<E> for CookieJwtBridge {
    type Output = CookieJwtBridgeEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        CookieJwtBridgeEndpoint {
            ep,
            cookie_name: self.cookie_name.clone(),
        }
    }
}

pub struct CookieJwtBridgeEndpoint<E> {
    ep: E,
    cookie_name: String,
}

impl<E: Endpoint> Endpoint for CookieJwtBridgeEndpoint<E> {
    type Output = E::Output;

    async fn call(&self, mut req: Request) -> Result<Self::Output> {
        if !has_bearer_header(&req) {
            if let Some(token) = first_cookie_value(&req, &self.cookie_name) {
                if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                    tracing::debug!("Extracted JWT from cookie, adding Authorization header");
                    req.headers_mut().insert(header::AUTHORIZATION, value);
                }
            }
        }

        self.ep.call(req).await
    }
}

fn has_bearer_header(req: &Request) -> bool {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("Bearer "))
        .unwrap_or(false)
}

/// First non-empty cookie with the given name, scanning Cookie headers in
/// order
fn first_cookie_value(req: &Request, name: &str) -> Option<String> {
    for header_value in req.headers().get_all(header::COOKIE) {
        let Ok(raw) = header_value.to_str() else {
            continue;
        };
        for pair in raw.split(';') {
            let pair = pair.trim();
            if let Some((cookie_name, value)) = pair.split_once('=') {
                if cookie_name == name && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use poem::{handler, EndpointExt};

    #[handler]
    fn echo_authorization(req: &Request) -> String {
        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("<none>")
            .to_string()
    }

    async fn run(req: Request) -> String {
        let ep = echo_authorization.with(CookieJwtBridge::new("id_token"));
        let response = ep.call(req).await.expect("endpoint should succeed");
        response
            .into_body()
            .into_string()
            .await
            .expect("body should be a string")
    }

    #[tokio::test]
    async fn cookie_is_promoted_to_bearer_header() {
        let req = Request::builder()
            .header(header::COOKIE, "id_token=abc")
            .finish();

        assert_eq!(run(req).await, "Bearer abc");
    }

    #[tokio::test]
    async fn existing_header_wins_over_cookie() {
        let req = Request::builder()
            .header(header::AUTHORIZATION, "Bearer xyz")
            .header(header::COOKIE, "id_token=abc")
            .finish();

        assert_eq!(run(req).await, "Bearer xyz");
    }

    #[tokio::test]
    async fn non_bearer_header_is_replaced_by_the_cookie_token() {
        let req = Request::builder()
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .header(header::COOKIE, "id_token=abc")
            .finish();

        assert_eq!(run(req).await, "Bearer abc");
    }

    #[tokio::test]
    async fn no_header_and_no_cookie_passes_through_untouched() {
        let req = Request::builder().finish();

        assert_eq!(run(req).await, "<none>");
    }

    #[tokio::test]
    async fn first_matching_cookie_wins() {
        let req = Request::builder()
            .header(header::COOKIE, "other=1; id_token=first; id_token=second")
            .finish();

        assert_eq!(run(req).await, "Bearer first");
    }

    #[tokio::test]
    async fn empty_cookie_value_is_ignored() {
        let req = Request::builder()
            .header(header::COOKIE, "id_token=")
            .finish();

        assert_eq!(run(req).await, "<none>");
    }
}
