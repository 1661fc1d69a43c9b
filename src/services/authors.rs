//! Author management service

use crate::{
    error::AppResult,
    models::author::{Author, AuthorDetails, AuthorQuery, CreateAuthor, UpdateAuthor},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search authors with pagination
    pub async fn search(&self, query: &AuthorQuery, page: i64, per_page: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.search(query, page, per_page).await
    }

    /// Get an author with their books
    pub async fn get_details(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.authors.get_books(id).await?;

        Ok(AuthorDetails {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
            books,
        })
    }

    /// Create a new author
    pub async fn create(&self, author: CreateAuthor) -> AppResult<Author> {
        self.repository.authors.create(&author).await
    }

    /// Update an existing author
    pub async fn update(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        self.repository.authors.update(id, &author).await
    }

    /// Delete an author
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }
}
