use axum::{
    extract::{Query, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use super::authorize::ensure_email_match;
use crate::auth::{AuthError, Identity};
use crate::error::ApiError;
use crate::state::AppState;

/// Bearer token authentication: verifies the token with the identity
/// provider and injects the decoded [`Identity`] into the request.
pub async fn require_bearer(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers)?;

    let identity = state.verifier.verify(token).await?;
    tracing::debug!("Authenticated request as {}", identity.email);

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Requires the `email` query parameter to name the authenticated caller.
/// Must run after [`require_bearer`].
pub async fn require_email_match(
    Query(query): Query<EmailQuery>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required before email check"))?;

    ensure_email_match(query.email.as_deref(), identity)?;
    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`; the scheme is case-insensitive
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let (scheme, token) = auth_str.trim().split_once(' ').ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn accepts_any_scheme_case() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(extract_bearer(&headers("bearer abc")).unwrap(), "abc");
        assert_eq!(extract_bearer(&headers("BEARER  abc ")).unwrap(), "abc");
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        assert!(matches!(extract_bearer(&HeaderMap::new()), Err(AuthError::MissingToken)));
        assert!(matches!(extract_bearer(&headers("Bearer")), Err(AuthError::MalformedHeader)));
        assert!(matches!(extract_bearer(&headers("Bearer   ")), Err(AuthError::MalformedHeader)));
        assert!(matches!(extract_bearer(&headers("Basic dXNlcg==")), Err(AuthError::MalformedHeader)));
    }
}
