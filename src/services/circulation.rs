//! Loan circulation service: borrowed listings and renewals

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::copy::{BookCopy, LoanedCopy, RenewalProposal},
    repository::Repository,
};

/// A renewal may not push the due date further out than this
const RENEWAL_MAX_WEEKS: i64 = 4;
/// Suggested renewal period
const RENEWAL_DEFAULT_WEEKS: i64 = 3;

/// A renewal date must lie within [today, today + 4 weeks].
pub fn validate_renewal_date(date: NaiveDate, today: NaiveDate) -> AppResult<()> {
    if date < today {
        return Err(AppError::Validation("Invalid date - renewal in past".to_string()));
    }
    if date > today + Duration::weeks(RENEWAL_MAX_WEEKS) {
        return Err(AppError::Validation(
            "Invalid date - renewal more than 4 weeks ahead".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// On-loan copies of one borrower, soonest due first
    pub async fn borrowed_by_user(
        &self,
        user_id: i32,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanedCopy>, i64)> {
        self.repository.copies.list_borrowed_by_user(user_id, page, per_page).await
    }

    /// All on-loan copies with their borrowers, soonest due first
    pub async fn all_borrowed(&self, page: i64, per_page: i64) -> AppResult<(Vec<LoanedCopy>, i64)> {
        self.repository.copies.list_all_borrowed(page, per_page).await
    }

    /// Renewal proposal for a copy: its current due date plus a suggested
    /// new one, three weeks from today.
    pub async fn propose_renewal(&self, copy_id: Uuid) -> AppResult<RenewalProposal> {
        let copy = self.repository.copies.get_by_id(copy_id).await?;
        let today = Utc::now().date_naive();

        Ok(RenewalProposal {
            copy_id: copy.id,
            due_back: copy.due_back,
            proposed_due_back: today + Duration::weeks(RENEWAL_DEFAULT_WEEKS),
        })
    }

    /// Renew a copy: validate the requested due date and apply it.
    pub async fn renew(&self, copy_id: Uuid, due_back: NaiveDate) -> AppResult<BookCopy> {
        // 404 before 400, so an unknown copy is reported as such
        self.repository.copies.get_by_id(copy_id).await?;

        let today = Utc::now().date_naive();
        validate_renewal_date(due_back, today)?;

        self.repository.copies.set_due_back(copy_id, due_back).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_date_in_past() {
        let today = day(2024, 6, 15);
        let err = validate_renewal_date(day(2024, 6, 14), today).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Invalid date - renewal in past"));

        let week_ago = today - Duration::weeks(1);
        assert!(validate_renewal_date(week_ago, today).is_err());
    }

    #[test]
    fn rejects_date_more_than_four_weeks_ahead() {
        let today = day(2024, 6, 15);
        let five_weeks = today + Duration::weeks(5);
        let err = validate_renewal_date(five_weeks, today).unwrap_err();
        assert!(
            matches!(err, AppError::Validation(msg) if msg == "Invalid date - renewal more than 4 weeks ahead")
        );

        let one_day_over = today + Duration::weeks(4) + Duration::days(1);
        assert!(validate_renewal_date(one_day_over, today).is_err());
    }

    #[test]
    fn accepts_boundary_dates() {
        let today = day(2024, 6, 15);
        assert!(validate_renewal_date(today, today).is_ok());
        assert!(validate_renewal_date(today + Duration::weeks(2), today).is_ok());
        assert!(validate_renewal_date(today + Duration::weeks(4), today).is_ok());
    }
}
