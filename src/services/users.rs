//! User management service

use crate::{
    error::{AppError, AppResult},
    models::user::{AccountTypeSlug, CreateUser, User, UserQuery, UserShort},
    repository::Repository,
    services::auth,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search users with pagination
    pub async fn search(&self, query: &UserQuery, page: i64, per_page: i64) -> AppResult<(Vec<UserShort>, i64)> {
        self.repository.users.search(query, page, per_page).await
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Create a new user account
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        if self.repository.users.login_exists(&user.login).await? {
            return Err(AppError::Conflict("A user with this login already exists".to_string()));
        }

        let password_hash = auth::hash_password(&user.password)?;
        let account_type = user.account_type.clone().unwrap_or(AccountTypeSlug::Member);

        self.repository
            .users
            .create(&user, &password_hash, account_type.as_str())
            .await
    }

    /// Seed the admin account on an empty installation
    pub async fn ensure_default_admin(&self, password: &str) -> AppResult<()> {
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        tracing::info!("No users found, seeding default admin account");

        let admin = CreateUser {
            login: "admin".to_string(),
            password: password.to_string(),
            first_name: None,
            last_name: None,
            email: None,
            account_type: Some(AccountTypeSlug::Admin),
        };
        let password_hash = auth::hash_password(&admin.password)?;
        self.repository
            .users
            .create(&admin, &password_hash, AccountTypeSlug::Admin.as_str())
            .await?;

        Ok(())
    }
}
