//! API handlers for Athenaeum REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod copies;
pub mod genres;
pub mod health;
pub mod languages;
pub mod loans;
pub mod openapi;
pub mod stats;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Requested page sizes are clamped to this
pub const MAX_PAGE_SIZE: i64 = 100;

/// Resolve page/per_page query values against a view's default page size.
pub fn page_params(page: Option<i64>, per_page: Option<i64>, default_per_page: i64) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(default_per_page).clamp(1, MAX_PAGE_SIZE);
    (page, per_page)
}

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication("Invalid authorization header format".to_string()));
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_defaults() {
        assert_eq!(page_params(None, None, 10), (1, 10));
        assert_eq!(page_params(None, None, 3), (1, 3));
    }

    #[test]
    fn page_params_clamping() {
        assert_eq!(page_params(Some(0), None, 10), (1, 10));
        assert_eq!(page_params(Some(-3), Some(0), 10), (1, 1));
        assert_eq!(page_params(Some(2), Some(500), 10), (2, MAX_PAGE_SIZE));
    }
}
