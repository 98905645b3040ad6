//! Premium code redemption service.
//!
//! All redemption failures that depend on code state (unknown, already used,
//! expired) collapse into one outward [`RedeemOutcome::InvalidCode`] signal.
//! The lookup itself only matches unused codes, so a spent code is
//! indistinguishable from one that never existed and the endpoint cannot be
//! used to probe which codes are real.

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use teamspace_common::{AppResult, code::{is_valid_code, normalize_code}};
use teamspace_db::repositories::PremiumCodeRepository;

/// Result of a redemption attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RedeemOutcome {
    /// The code was consumed and the user now holds the premium role.
    Activated,
    /// The code is unknown, spent, or expired. Deliberately unspecific.
    InvalidCode,
}

/// Service for premium code redemption.
#[derive(Clone)]
pub struct PremiumService {
    premium_repo: PremiumCodeRepository,
}

impl PremiumService {
    /// Create a new premium service.
    #[must_use]
    pub const fn new(premium_repo: PremiumCodeRepository) -> Self {
        Self { premium_repo }
    }

    /// Redeem a code for a user.
    ///
    /// Input is normalized (trimmed, uppercased) before lookup, so codes are
    /// case-insensitive on entry. The actual consume is a conditional write
    /// in the repository; losing that race also reports an invalid code.
    pub async fn redeem(&self, user_id: &str, raw_code: &str) -> AppResult<RedeemOutcome> {
        let code = normalize_code(raw_code);
        if !is_valid_code(&code) {
            return Ok(RedeemOutcome::InvalidCode);
        }

        let Some(record) = self.premium_repo.find_unused_by_code(&code).await? else {
            return Ok(RedeemOutcome::InvalidCode);
        };

        let now: DateTimeWithTimeZone = Utc::now().into();
        if record.expires_at.is_some_and(|at| at <= now) {
            return Ok(RedeemOutcome::InvalidCode);
        }

        if self.premium_repo.redeem(&record.id, user_id, now).await? {
            tracing::info!(code_id = %record.id, user_id = %user_id, "Premium code redeemed");
            Ok(RedeemOutcome::Activated)
        } else {
            Ok(RedeemOutcome::InvalidCode)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use teamspace_db::entities::premium_code;

    fn test_code(expires_at: Option<DateTimeWithTimeZone>) -> premium_code::Model {
        premium_code::Model {
            id: "pc1".to_string(),
            code: "ABCD-EFGH-1234".to_string(),
            is_used: false,
            used_by: None,
            used_at: None,
            expires_at,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_redeem_malformed_code_skips_lookup() {
        // No query results appended: a lookup would fail the mock.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = PremiumService::new(PremiumCodeRepository::new(db));
        let outcome = service.redeem("usr1", "not a code").await.unwrap();

        assert!(matches!(outcome, RedeemOutcome::InvalidCode));
    }

    #[tokio::test]
    async fn test_redeem_unknown_code() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<premium_code::Model>::new()])
                .into_connection(),
        );

        let service = PremiumService::new(PremiumCodeRepository::new(db));
        let outcome = service.redeem("usr1", "ABCD-EFGH-1234").await.unwrap();

        assert!(matches!(outcome, RedeemOutcome::InvalidCode));
    }

    #[tokio::test]
    async fn test_redeem_expired_code() {
        let expired = Some(DateTimeWithTimeZone::from(Utc::now()) - Duration::hours(1));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_code(expired)]])
                .into_connection(),
        );

        let service = PremiumService::new(PremiumCodeRepository::new(db));
        let outcome = service.redeem("usr1", "ABCD-EFGH-1234").await.unwrap();

        assert!(matches!(outcome, RedeemOutcome::InvalidCode));
    }

    #[tokio::test]
    async fn test_redeem_is_case_insensitive() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_code(None)]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let service = PremiumService::new(PremiumCodeRepository::new(db));
        let outcome = service.redeem("usr1", "  abcd-efgh-1234 ").await.unwrap();

        assert!(matches!(outcome, RedeemOutcome::Activated));
    }

    #[tokio::test]
    async fn test_redeem_lost_race_reports_invalid() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_code(None)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let service = PremiumService::new(PremiumCodeRepository::new(db));
        let outcome = service.redeem("usr1", "ABCD-EFGH-1234").await.unwrap();

        assert!(matches!(outcome, RedeemOutcome::InvalidCode));
    }
}
