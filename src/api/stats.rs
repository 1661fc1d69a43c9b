//! Catalog statistics endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppResult;

/// Stats query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct StatsQuery {
    /// When set, also count books and genres matching this keyword
    pub keyword: Option<String>,
}

/// Catalog summary counts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogStats {
    /// Total number of books
    pub books: i64,
    /// Total number of copies
    pub copies: i64,
    /// Copies currently available for loan
    pub copies_available: i64,
    /// Total number of authors
    pub authors: i64,
    /// Total number of genres
    pub genres: i64,
    /// Total number of languages
    pub languages: i64,
    /// Keyword the matching counts refer to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Books whose title contains the keyword
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books_matching: Option<i64>,
    /// Genres whose name contains the keyword
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres_matching: Option<i64>,
}

/// Catalog summary counts (the home-page figures)
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    params(
        ("keyword" = Option<String>, Query, description = "Count books/genres matching this keyword")
    ),
    responses(
        (status = 200, description = "Catalog summary", body = CatalogStats)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<CatalogStats>> {
    let stats = state.services.catalog.stats(query.keyword).await?;
    Ok(Json(stats))
}
