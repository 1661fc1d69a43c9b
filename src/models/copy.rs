//! Book copy (loanable physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::user::UserShort;

/// Loan status of a copy. Stored and serialized as a one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CopyStatus {
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "r")]
    Reserved,
}

impl CopyStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            CopyStatus::Available => "a",
            CopyStatus::OnLoan => "o",
            CopyStatus::Maintenance => "m",
            CopyStatus::Reserved => "r",
        }
    }
}

impl Default for CopyStatus {
    fn default() -> Self {
        CopyStatus::Maintenance
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl std::str::FromStr for CopyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end() {
            "a" => Ok(CopyStatus::Available),
            "o" => Ok(CopyStatus::OnLoan),
            "m" => Ok(CopyStatus::Maintenance),
            "r" => Ok(CopyStatus::Reserved),
            _ => Err(format!("Invalid copy status: {}", s)),
        }
    }
}

// SQLx conversion for CopyStatus (stored as CHAR(1))
impl sqlx::Type<Postgres> for CopyStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for CopyStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for CopyStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_code().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Loanable copy of a book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    pub id: Uuid,
    pub book_id: i32,
    /// Publisher and year of this particular printing
    pub imprint: String,
    pub status: CopyStatus,
    /// Date the copy is due back; set only while on loan
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

impl BookCopy {
    /// A copy is overdue when it is on loan past its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == CopyStatus::OnLoan && self.due_back.map(|d| d < today).unwrap_or(false)
    }
}

/// Loaned copy with book context, for the borrowed listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanedCopy {
    pub id: Uuid,
    pub book_id: i32,
    pub title: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub is_overdue: bool,
    /// Borrower details; included in the all-loaned listing only
    pub borrower: Option<UserShort>,
}

/// Create copy request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCopy {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    /// Defaults to maintenance, as new copies are not shelved yet
    pub status: Option<CopyStatus>,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

/// Update copy request (full replace of the mutable fields)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCopy {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    pub status: CopyStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

/// Renewal proposal returned before confirming a renewal
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenewalProposal {
    pub copy_id: Uuid,
    /// Current due date of the copy
    pub due_back: Option<NaiveDate>,
    /// Suggested new due date (three weeks from today)
    pub proposed_due_back: NaiveDate,
}

/// Renewal request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenewalRequest {
    /// New due date (YYYY-MM-DD)
    pub due_back: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in [
            CopyStatus::Available,
            CopyStatus::OnLoan,
            CopyStatus::Maintenance,
            CopyStatus::Reserved,
        ] {
            assert_eq!(status.as_code().parse::<CopyStatus>().unwrap(), status);
        }
        assert!("x".parse::<CopyStatus>().is_err());
        assert!("".parse::<CopyStatus>().is_err());
    }

    #[test]
    fn overdue_only_while_on_loan() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let copy = BookCopy {
            id: Uuid::new_v4(),
            book_id: 1,
            imprint: "2042".to_string(),
            status: CopyStatus::OnLoan,
            due_back: Some(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()),
            borrower_id: Some(1),
        };
        assert!(copy.is_overdue(today));

        let due_today = BookCopy { due_back: Some(today), ..copy.clone() };
        assert!(!due_today.is_overdue(today));

        let maintenance = BookCopy { status: CopyStatus::Maintenance, ..copy };
        assert!(!maintenance.is_overdue(today));
    }
}
