//! Catalog management service: books, genres, languages and copies

use uuid::Uuid;

use crate::{
    api::stats::CatalogStats,
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookQuery, BookShort, CreateBook, UpdateBook},
        copy::{BookCopy, CopyStatus, CreateCopy, UpdateCopy},
        genre::{CreateGenre, Genre},
        language::{CreateLanguage, Language},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // --- Books ---

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery, page: i64, per_page: i64) -> AppResult<(Vec<BookShort>, i64)> {
        self.repository.books.search(query, page, per_page).await
    }

    /// Get a book with author, language, genres and copies
    pub async fn get_book_details(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;

        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        let language = match book.language_id {
            Some(language_id) => Some(self.repository.languages.get_by_id(language_id).await?),
            None => None,
        };
        let genres = self.repository.books.get_genres(id).await?;
        let copies = self.repository.copies.list_for_book(id).await?;

        Ok(BookDetails {
            id: book.id,
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            author,
            language,
            genres,
            copies,
        })
    }

    /// Create a new book
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        self.check_book_references(book.author_id, book.language_id, Some(book.genre_ids.as_slice()))
            .await?;
        self.repository.books.create(&book).await
    }

    /// Update an existing book
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await?;
        self.check_book_references(book.author_id, book.language_id, book.genre_ids.as_deref())
            .await?;
        self.repository.books.update(id, &book).await
    }

    /// Delete a book; refused while copies of it exist
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.get_by_id(id).await?;

        let copies = self.repository.copies.count_for_book(id).await?;
        if copies > 0 {
            return Err(AppError::Conflict(format!(
                "Book has {} copies; delete them first",
                copies
            )));
        }

        self.repository.books.delete(id).await
    }

    /// Referenced author, language and genres must exist
    async fn check_book_references(
        &self,
        author_id: Option<i32>,
        language_id: Option<i32>,
        genre_ids: Option<&[i32]>,
    ) -> AppResult<()> {
        if let Some(author_id) = author_id {
            self.repository
                .authors
                .get_by_id(author_id)
                .await
                .map_err(|_| AppError::Validation(format!("Author {} does not exist", author_id)))?;
        }
        if let Some(language_id) = language_id {
            self.repository
                .languages
                .get_by_id(language_id)
                .await
                .map_err(|_| AppError::Validation(format!("Language {} does not exist", language_id)))?;
        }
        if let Some(genre_ids) = genre_ids {
            if !genre_ids.is_empty() {
                let existing = self.repository.genres.count_existing(genre_ids).await?;
                if existing != genre_ids.len() as i64 {
                    return Err(AppError::Validation("One or more genres do not exist".to_string()));
                }
            }
        }
        Ok(())
    }

    // --- Genres ---

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.repository.genres.get_by_id(id).await
    }

    /// Create a genre; names are unique case-insensitively
    pub async fn create_genre(&self, genre: CreateGenre) -> AppResult<Genre> {
        if self.repository.genres.name_exists(&genre.name).await? {
            return Err(AppError::Conflict("A genre with this name already exists".to_string()));
        }
        self.repository.genres.create(&genre).await
    }

    // --- Languages ---

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.repository.languages.get_by_id(id).await
    }

    /// Create a language; names are unique case-insensitively
    pub async fn create_language(&self, language: CreateLanguage) -> AppResult<Language> {
        if self.repository.languages.name_exists(&language.name).await? {
            return Err(AppError::Conflict("A language with this name already exists".to_string()));
        }
        self.repository.languages.create(&language).await
    }

    // --- Copies ---

    pub async fn get_copy(&self, id: Uuid) -> AppResult<BookCopy> {
        self.repository.copies.get_by_id(id).await
    }

    /// Create a copy of a book
    pub async fn create_copy(&self, book_id: i32, copy: CreateCopy) -> AppResult<BookCopy> {
        self.repository.books.get_by_id(book_id).await?;

        let status = copy.status.unwrap_or_default();
        let (due_back, borrower_id) = self.check_loan_fields(status, copy.due_back, copy.borrower_id).await?;

        self.repository
            .copies
            .create(book_id, &CreateCopy { status: Some(status), due_back, borrower_id, ..copy })
            .await
    }

    /// Replace a copy's mutable fields; staff check copies out and in this way
    pub async fn update_copy(&self, id: Uuid, copy: UpdateCopy) -> AppResult<BookCopy> {
        self.repository.copies.get_by_id(id).await?;

        let (due_back, borrower_id) = self.check_loan_fields(copy.status, copy.due_back, copy.borrower_id).await?;

        self.repository
            .copies
            .update(id, &copy.imprint, copy.status, due_back, borrower_id)
            .await
    }

    /// Delete a copy
    pub async fn delete_copy(&self, id: Uuid) -> AppResult<()> {
        self.repository.copies.delete(id).await
    }

    /// Due date and borrower are meaningful only while on loan; a loan
    /// needs a borrower, and the borrower must exist.
    async fn check_loan_fields(
        &self,
        status: CopyStatus,
        due_back: Option<chrono::NaiveDate>,
        borrower_id: Option<i32>,
    ) -> AppResult<(Option<chrono::NaiveDate>, Option<i32>)> {
        if status != CopyStatus::OnLoan {
            return Ok((None, None));
        }

        let borrower_id = borrower_id
            .ok_or_else(|| AppError::Validation("An on-loan copy needs a borrower".to_string()))?;
        self.repository
            .users
            .get_by_id(borrower_id)
            .await
            .map_err(|_| AppError::Validation(format!("Borrower {} does not exist", borrower_id)))?;

        Ok((due_back, Some(borrower_id)))
    }

    // --- Stats ---

    /// Catalog summary counts; with a keyword, also how many books and
    /// genres match it.
    pub async fn stats(&self, keyword: Option<String>) -> AppResult<CatalogStats> {
        let books = self.repository.books.count().await?;
        let copies = self.repository.copies.count().await?;
        let copies_available = self.repository.copies.count_available().await?;
        let authors = self.repository.authors.count().await?;
        let genres = self.repository.genres.count().await?;
        let languages = self.repository.languages.count().await?;

        let (books_matching, genres_matching) = match keyword {
            Some(ref kw) => (
                Some(self.repository.books.count_title_contains(kw).await?),
                Some(self.repository.genres.count_name_contains(kw).await?),
            ),
            None => (None, None),
        };

        Ok(CatalogStats {
            books,
            copies,
            copies_available,
            authors,
            genres,
            languages,
            keyword,
            books_matching,
            genres_matching,
        })
    }
}
