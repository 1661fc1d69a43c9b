//! Copies repository for database operations

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        copy::{BookCopy, CopyStatus, CreateCopy, LoanedCopy},
        user::UserShort,
    },
};

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>("SELECT * FROM copies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    /// List copies of a book, loaned ones first by due date
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookCopy>> {
        let copies = sqlx::query_as::<_, BookCopy>(
            "SELECT * FROM copies WHERE book_id = $1 ORDER BY due_back NULLS LAST, imprint",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(copies)
    }

    /// Create a new copy of a book
    pub async fn create(&self, book_id: i32, copy: &CreateCopy) -> AppResult<BookCopy> {
        let status = copy.status.unwrap_or_default();
        let created = sqlx::query_as::<_, BookCopy>(
            r#"
            INSERT INTO copies (id, book_id, imprint, status, due_back, borrower_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(&copy.imprint)
        .bind(status)
        .bind(copy.due_back)
        .bind(copy.borrower_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Replace a copy's mutable fields
    pub async fn update(
        &self,
        id: Uuid,
        imprint: &str,
        status: CopyStatus,
        due_back: Option<NaiveDate>,
        borrower_id: Option<i32>,
    ) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(
            r#"
            UPDATE copies
            SET imprint = $2, status = $3, due_back = $4, borrower_id = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(imprint)
        .bind(status)
        .bind(due_back)
        .bind(borrower_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    /// Set a copy's due date (renewal)
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(
            "UPDATE copies SET due_back = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(due_back)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    /// Delete a copy
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM copies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Copy with id {} not found", id)));
        }
        Ok(())
    }

    /// On-loan copies of one borrower, soonest due first
    pub async fn list_borrowed_by_user(
        &self,
        user_id: i32,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanedCopy>, i64)> {
        let offset = (page - 1) * per_page;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM copies WHERE borrower_id = $1 AND status = 'o'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT c.id, c.book_id, c.imprint, c.due_back, b.title
            FROM copies c
            JOIN books b ON c.book_id = b.id
            WHERE c.borrower_id = $1 AND c.status = 'o'
            ORDER BY c.due_back
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let today = Utc::now().date_naive();
        let copies = rows
            .into_iter()
            .map(|row| {
                let due_back: Option<NaiveDate> = row.get("due_back");
                LoanedCopy {
                    id: row.get("id"),
                    book_id: row.get("book_id"),
                    title: row.get("title"),
                    imprint: row.get("imprint"),
                    due_back,
                    is_overdue: due_back.map(|d| d < today).unwrap_or(false),
                    borrower: None,
                }
            })
            .collect();

        Ok((copies, total))
    }

    /// All on-loan copies with their borrowers, soonest due first
    pub async fn list_all_borrowed(&self, page: i64, per_page: i64) -> AppResult<(Vec<LoanedCopy>, i64)> {
        let offset = (page - 1) * per_page;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM copies WHERE status = 'o'")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT c.id, c.book_id, c.imprint, c.due_back, b.title,
                   u.id AS user_id, u.login, u.first_name, u.last_name, at.slug AS account_type
            FROM copies c
            JOIN books b ON c.book_id = b.id
            LEFT JOIN users u ON c.borrower_id = u.id
            LEFT JOIN account_types at ON u.account_type_id = at.id
            WHERE c.status = 'o'
            ORDER BY c.due_back
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let today = Utc::now().date_naive();
        let mut copies = Vec::new();
        for row in rows {
            let due_back: Option<NaiveDate> = row.get("due_back");
            let borrower = match row.get::<Option<i32>, _>("user_id") {
                Some(user_id) => Some(UserShort {
                    id: user_id,
                    login: row.get("login"),
                    first_name: row.get("first_name"),
                    last_name: row.get("last_name"),
                    account_type: row
                        .get::<String, _>("account_type")
                        .parse()
                        .map_err(|e: String| AppError::Internal(e))?,
                }),
                None => None,
            };
            copies.push(LoanedCopy {
                id: row.get("id"),
                book_id: row.get("book_id"),
                title: row.get("title"),
                imprint: row.get("imprint"),
                due_back,
                is_overdue: due_back.map(|d| d < today).unwrap_or(false),
                borrower,
            });
        }

        Ok((copies, total))
    }

    /// Count copies of a book (guards book deletion)
    pub async fn count_for_book(&self, book_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM copies WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM copies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies currently available for loan
    pub async fn count_available(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM copies WHERE status = 'a'")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
