//! Loaned-copies listings

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppResult, models::copy::LoanedCopy};

use super::{books::PaginatedResponse, page_params, AuthenticatedUser};

/// Borrowed listings show ten entries per page
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Loan listing query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LoanQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// List the copies borrowed by the current user, soonest due first
#[utoipa::path(
    get,
    path = "/loans/mine",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Copies per page (default: 10)")
    ),
    responses(
        (status = 200, description = "Copies on loan to the current user", body = PaginatedResponse<LoanedCopy>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<PaginatedResponse<LoanedCopy>>> {
    let (page, per_page) = page_params(query.page, query.per_page, DEFAULT_PAGE_SIZE);
    let (copies, total) = state
        .services
        .circulation
        .borrowed_by_user(claims.user_id, page, per_page)
        .await?;

    Ok(Json(PaginatedResponse::new(copies, total, page, per_page)))
}

/// List all copies currently on loan, with their borrowers, soonest due first
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Copies per page (default: 10)")
    ),
    responses(
        (status = 200, description = "All copies on loan", body = PaginatedResponse<LoanedCopy>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Insufficient rights")
    )
)]
pub async fn all_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<PaginatedResponse<LoanedCopy>>> {
    claims.require_read_borrows()?;

    let (page, per_page) = page_params(query.page, query.per_page, DEFAULT_PAGE_SIZE);
    let (copies, total) = state.services.circulation.all_borrowed(page, per_page).await?;

    Ok(Json(PaginatedResponse::new(copies, total, page, per_page)))
}
