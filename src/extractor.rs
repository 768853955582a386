use axum::{RequestPartsExt, extract::FromRequestParts, http::StatusCode};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use http::request::Parts;

use crate::config::APP_CONFIG;
use crate::utils::jwt::{JwtManager, TokenClaims};

/// Bearer-token extractor. Handlers take `AuthClaims(claims)` and get the
/// verified token claims; requests without a valid token are rejected 401.
pub struct AuthClaims(pub TokenClaims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                (
                    StatusCode::UNAUTHORIZED,
                    "Missing or malformed Authorization header".to_string(),
                )
            })?;

        let jwt_manager = JwtManager::new(APP_CONFIG.jwt_secret.clone());
        let claims = jwt_manager.verify_jwt(bearer.token()).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            )
        })?;

        Ok(AuthClaims(claims))
    }
}
