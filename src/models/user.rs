//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::AppError;

/// Per-domain access levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rights {
    None = 0,
    Read = 1,
    Write = 2,
}

impl From<char> for Rights {
    fn from(c: char) -> Self {
        match c {
            'r' | 'R' => Rights::Read,
            'w' | 'W' => Rights::Write,
            _ => Rights::None,
        }
    }
}

impl From<Option<String>> for Rights {
    fn from(s: Option<String>) -> Self {
        s.and_then(|s| s.chars().next())
            .map(Rights::from)
            .unwrap_or(Rights::None)
    }
}

/// Account type slug (string identifier)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountTypeSlug {
    Guest,
    Member,
    Librarian,
    Admin,
}

impl AccountTypeSlug {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountTypeSlug::Guest => "guest",
            AccountTypeSlug::Member => "member",
            AccountTypeSlug::Librarian => "librarian",
            AccountTypeSlug::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccountTypeSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccountTypeSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "guest" => Ok(AccountTypeSlug::Guest),
            "member" => Ok(AccountTypeSlug::Member),
            "librarian" => Ok(AccountTypeSlug::Librarian),
            "admin" => Ok(AccountTypeSlug::Admin),
            _ => Err(format!("Invalid account type slug: {}", s)),
        }
    }
}

impl From<AccountTypeSlug> for String {
    fn from(slug: AccountTypeSlug) -> Self {
        slug.as_str().to_string()
    }
}

// SQLx conversion for AccountTypeSlug
impl sqlx::Type<Postgres> for AccountTypeSlug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AccountTypeSlug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AccountTypeSlug {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub account_type: AccountTypeSlug,
    pub created_at: DateTime<Utc>,
}

/// Short user representation for lists and borrower display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub account_type: AccountTypeSlug,
}

/// User query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserQuery {
    pub name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    /// Login (username) - required and unique, used for authentication
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// Account type slug; defaults to "member"
    pub account_type: Option<AccountTypeSlug>,
}

/// User rights structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRights {
    pub catalog_rights: Rights,
    pub borrows_rights: Rights,
    pub users_rights: Rights,
}

impl Default for UserRights {
    fn default() -> Self {
        Self {
            catalog_rights: Rights::None,
            borrows_rights: Rights::None,
            users_rights: Rights::None,
        }
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub account_type: AccountTypeSlug,
    pub rights: UserRights,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks
    pub fn require_write_catalog(&self) -> Result<(), AppError> {
        if self.rights.catalog_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Insufficient rights to modify the catalog".to_string(),
            ))
        }
    }

    pub fn require_read_borrows(&self) -> Result<(), AppError> {
        if self.rights.borrows_rights as u8 >= Rights::Read as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Insufficient rights to view loaned copies".to_string(),
            ))
        }
    }

    pub fn require_write_borrows(&self) -> Result<(), AppError> {
        if self.rights.borrows_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Insufficient rights to manage loans".to_string(),
            ))
        }
    }

    pub fn require_read_users(&self) -> Result<(), AppError> {
        if self.rights.users_rights as u8 >= Rights::Read as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Insufficient rights to read users".to_string(),
            ))
        }
    }

    pub fn require_write_users(&self) -> Result<(), AppError> {
        if self.rights.users_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Insufficient rights to manage users".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims_with(rights: UserRights) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "testuser".to_string(),
            user_id: 1,
            account_type: AccountTypeSlug::Librarian,
            rights,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn write_rights_imply_read() {
        let claims = claims_with(UserRights {
            catalog_rights: Rights::Write,
            borrows_rights: Rights::Write,
            users_rights: Rights::Write,
        });
        assert!(claims.require_read_borrows().is_ok());
        assert!(claims.require_write_borrows().is_ok());
        assert!(claims.require_write_catalog().is_ok());
    }

    #[test]
    fn read_rights_do_not_imply_write() {
        let claims = claims_with(UserRights {
            catalog_rights: Rights::Read,
            borrows_rights: Rights::Read,
            users_rights: Rights::None,
        });
        assert!(claims.require_read_borrows().is_ok());
        assert!(claims.require_write_borrows().is_err());
        assert!(claims.require_write_catalog().is_err());
        assert!(claims.require_read_users().is_err());
    }

    #[test]
    fn rights_from_db_chars() {
        assert_eq!(Rights::from(Some("w".to_string())), Rights::Write);
        assert_eq!(Rights::from(Some("r".to_string())), Rights::Read);
        assert_eq!(Rights::from(None), Rights::None);
        assert_eq!(Rights::from(Some("x".to_string())), Rights::None);
    }

    #[test]
    fn token_round_trip() {
        let claims = claims_with(UserRights::default());
        let token = claims.create_token("test-secret").unwrap();
        let decoded = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.sub, "testuser");
        assert_eq!(decoded.user_id, 1);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn account_type_slug_parsing() {
        assert_eq!("librarian".parse::<AccountTypeSlug>().unwrap(), AccountTypeSlug::Librarian);
        assert_eq!("ADMIN".parse::<AccountTypeSlug>().unwrap(), AccountTypeSlug::Admin);
        assert!("superuser".parse::<AccountTypeSlug>().is_err());
    }
}
