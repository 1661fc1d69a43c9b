//! Users repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, Rights, User, UserQuery, UserRights, UserShort},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.login, u.password, u.first_name, u.last_name, u.email,
                   at.slug AS account_type, u.created_at
            FROM users u
            JOIN account_types at ON u.account_type_id = at.id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by login (authentication)
    pub async fn get_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.login, u.password, u.first_name, u.last_name, u.email,
                   at.slug AS account_type, u.created_at
            FROM users u
            JOIN account_types at ON u.account_type_id = at.id
            WHERE LOWER(u.login) = LOWER($1)
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check if login already exists
    pub async fn login_exists(&self, login: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(login) = LOWER($1))")
                .bind(login)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Get the rights attached to an account type
    pub async fn get_rights(&self, account_type_slug: &str) -> AppResult<UserRights> {
        let row = sqlx::query(
            "SELECT catalog_rights, borrows_rights, users_rights FROM account_types WHERE slug = $1",
        )
        .bind(account_type_slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Account type not found".to_string()))?;

        Ok(UserRights {
            catalog_rights: Rights::from(row.get::<Option<String>, _>("catalog_rights")),
            borrows_rights: Rights::from(row.get::<Option<String>, _>("borrows_rights")),
            users_rights: Rights::from(row.get::<Option<String>, _>("users_rights")),
        })
    }

    /// Search users with pagination, ordered by name
    pub async fn search(&self, query: &UserQuery, page: i64, per_page: i64) -> AppResult<(Vec<UserShort>, i64)> {
        let offset = (page - 1) * per_page;

        let (where_clause, pattern) = match query.name {
            Some(ref name) => (
                "WHERE LOWER(u.first_name) LIKE $1 OR LOWER(u.last_name) LIKE $1 OR LOWER(u.login) LIKE $1",
                Some(format!("%{}%", name.to_lowercase())),
            ),
            None => ("", None),
        };

        let count_query = format!("SELECT COUNT(*) FROM users u {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref pattern) = pattern {
            count_builder = count_builder.bind(pattern);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            r#"
            SELECT u.id, u.login, u.first_name, u.last_name, at.slug AS account_type
            FROM users u
            JOIN account_types at ON u.account_type_id = at.id
            {}
            ORDER BY u.last_name, u.first_name, u.login
            LIMIT {} OFFSET {}
            "#,
            where_clause, per_page, offset
        );
        let mut select_builder = sqlx::query_as::<_, UserShort>(&select_query);
        if let Some(ref pattern) = pattern {
            select_builder = select_builder.bind(pattern);
        }
        let users = select_builder.fetch_all(&self.pool).await?;

        Ok((users, total))
    }

    /// Create a new user with an already-hashed password
    pub async fn create(&self, user: &CreateUser, password_hash: &str, account_type_slug: &str) -> AppResult<User> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (login, password, first_name, last_name, email, account_type_id)
            VALUES ($1, $2, $3, $4, $5, (SELECT id FROM account_types WHERE slug = $6))
            RETURNING id
            "#,
        )
        .bind(&user.login)
        .bind(password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(account_type_slug)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Count all users
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
