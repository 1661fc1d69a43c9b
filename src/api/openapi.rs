//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, copies, genres, health, languages, loans, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Athenaeum API",
        version = "1.0.0",
        description = "Library Catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Athenaeum contributors")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Copies
        copies::get_copy,
        copies::create_copy,
        copies::update_copy,
        copies::delete_copy,
        copies::propose_renewal,
        copies::renew_copy,
        // Loans
        loans::my_borrowed,
        loans::all_borrowed,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        // Languages
        languages::list_languages,
        languages::get_language,
        languages::create_language,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorDetails,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            // Books
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Copies
            crate::models::copy::BookCopy,
            crate::models::copy::CopyStatus,
            crate::models::copy::CreateCopy,
            crate::models::copy::UpdateCopy,
            crate::models::copy::LoanedCopy,
            crate::models::copy::RenewalProposal,
            crate::models::copy::RenewalRequest,
            // Genres and languages
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            crate::models::language::Language,
            crate::models::language::CreateLanguage,
            // Users
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::CreateUser,
            crate::models::user::AccountTypeSlug,
            // Stats
            stats::CatalogStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "authors", description = "Author records"),
        (name = "books", description = "Book records"),
        (name = "copies", description = "Loanable copies and renewals"),
        (name = "loans", description = "Loaned-copies listings"),
        (name = "genres", description = "Genre lookup table"),
        (name = "languages", description = "Language lookup table"),
        (name = "users", description = "User management"),
        (name = "stats", description = "Catalog statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
