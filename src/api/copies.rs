//! Book copy endpoints, including loan renewal

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::copy::{BookCopy, CreateCopy, RenewalProposal, RenewalRequest, UpdateCopy},
};

use super::AuthenticatedUser;

/// Get copy details by ID
#[utoipa::path(
    get,
    path = "/copies/{id}",
    tag = "copies",
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy details", body = BookCopy),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookCopy>> {
    let copy = state.services.catalog.get_copy(id).await?;
    Ok(Json(copy))
}

/// Create a new copy of a book
#[utoipa::path(
    post,
    path = "/books/{id}/copies",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = CreateCopy,
    responses(
        (status = 201, description = "Copy created", body = BookCopy),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
    Json(copy): Json<CreateCopy>,
) -> AppResult<(StatusCode, Json<BookCopy>)> {
    claims.require_write_catalog()?;
    copy.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.catalog.create_copy(book_id, copy).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a copy. Checking a copy out or in is done here, by setting
/// its status, borrower and due date.
#[utoipa::path(
    put,
    path = "/copies/{id}",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = UpdateCopy,
    responses(
        (status = 200, description = "Copy updated", body = BookCopy),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn update_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(copy): Json<UpdateCopy>,
) -> AppResult<Json<BookCopy>> {
    claims.require_write_catalog()?;
    copy.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.services.catalog.update_copy(id, copy).await?;
    Ok(Json(updated))
}

/// Delete a copy
#[utoipa::path(
    delete,
    path = "/copies/{id}",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn delete_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write_catalog()?;

    state.services.catalog.delete_copy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a renewal proposal for a copy: its current due date and a
/// suggested new one, three weeks from today.
#[utoipa::path(
    get,
    path = "/copies/{id}/renewal",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Renewal proposal", body = RenewalProposal),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Insufficient rights"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn propose_renewal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalProposal>> {
    claims.require_write_borrows()?;

    let proposal = state.services.circulation.propose_renewal(id).await?;
    Ok(Json(proposal))
}

/// Renew a copy by setting a new due date. The date must not be in the
/// past nor more than four weeks ahead.
#[utoipa::path(
    post,
    path = "/copies/{id}/renewal",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = RenewalRequest,
    responses(
        (status = 200, description = "Copy renewed", body = BookCopy),
        (status = 400, description = "Invalid renewal date"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Insufficient rights"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenewalRequest>,
) -> AppResult<Json<BookCopy>> {
    claims.require_write_borrows()?;

    let renewed = state.services.circulation.renew(id, request.due_back).await?;
    Ok(Json(renewed))
}
