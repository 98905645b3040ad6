//! Administrative service: code issuance and user management.

use chrono::{Duration, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use teamspace_common::{AppError, AppResult, IdGenerator, code::generate_code};
use teamspace_db::entities::user::UserRole;
use teamspace_db::entities::{premium_code, user};
use teamspace_db::repositories::{PremiumCodeRepository, UserRepository};
use validator::Validate;

/// How many times a single colliding code is regenerated before giving up.
const CODE_RETRY_LIMIT: usize = 3;

/// Parameters for batch code generation.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodesInput {
    #[validate(range(min = 1, max = 100, message = "count must be between 1 and 100"))]
    pub count: u32,

    #[validate(range(min = 1, max = 365, message = "expiry must be between 1 and 365 days"))]
    pub expiry_days: i64,
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AdminStats {
    pub total_users: u64,
    pub premium_users: u64,
    pub unused_codes: u64,
    pub used_codes: u64,
}

/// Service for administrative operations.
///
/// Authorization (global admin role) is enforced at the API boundary; these
/// methods assume the caller is already vetted.
#[derive(Clone)]
pub struct AdminService {
    premium_repo: PremiumCodeRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl AdminService {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(
        premium_repo: PremiumCodeRepository,
        user_repo: UserRepository,
        id_gen: IdGenerator,
    ) -> Self {
        Self {
            premium_repo,
            user_repo,
            id_gen,
        }
    }

    /// Generate a batch of premium codes sharing one expiry.
    ///
    /// Codes are random and collisions with existing rows are possible; the
    /// batch insert is tried first, and on a unique-key conflict each code is
    /// inserted individually with regeneration so one collision does not sink
    /// the batch.
    pub async fn generate_codes(
        &self,
        input: GenerateCodesInput,
    ) -> AppResult<Vec<premium_code::Model>> {
        input.validate()?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let expires_at = now + Duration::days(input.expiry_days);

        let models: Vec<premium_code::Model> = (0..input.count)
            .map(|_| premium_code::Model {
                id: self.id_gen.generate(),
                code: generate_code(),
                is_used: false,
                used_by: None,
                used_at: None,
                expires_at: Some(expires_at),
                created_at: now,
            })
            .collect();

        let batch = models
            .iter()
            .cloned()
            .map(premium_code::ActiveModel::from)
            .collect::<Vec<_>>();

        match self.premium_repo.create_many(batch).await {
            Ok(_) => {
                tracing::info!(count = models.len(), "Premium codes generated");
                Ok(models)
            }
            Err(AppError::Conflict(_)) => self.insert_individually(models).await,
            Err(e) => Err(e),
        }
    }

    /// Fallback path for colliding batches: insert one by one, regenerating
    /// any code that conflicts.
    async fn insert_individually(
        &self,
        models: Vec<premium_code::Model>,
    ) -> AppResult<Vec<premium_code::Model>> {
        let mut inserted = Vec::with_capacity(models.len());

        for mut model in models {
            let mut attempts = 0;
            loop {
                match self
                    .premium_repo
                    .create(premium_code::ActiveModel::from(model.clone()))
                    .await
                {
                    Ok(row) => {
                        inserted.push(row);
                        break;
                    }
                    Err(AppError::Conflict(_)) if attempts < CODE_RETRY_LIMIT => {
                        attempts += 1;
                        model.id = self.id_gen.generate();
                        model.code = generate_code();
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        tracing::info!(count = inserted.len(), "Premium codes generated (with retries)");
        Ok(inserted)
    }

    /// Delete a code outright.
    pub async fn delete_code(&self, code_id: &str) -> AppResult<()> {
        if !self.premium_repo.delete_by_id(code_id).await? {
            return Err(AppError::NotFound(format!(
                "Premium code not found: {code_id}"
            )));
        }

        tracing::info!(code_id = %code_id, "Premium code deleted");
        Ok(())
    }

    /// List codes, newest first.
    pub async fn list_codes(&self, limit: u64, offset: u64) -> AppResult<Vec<premium_code::Model>> {
        self.premium_repo.list(limit, offset).await
    }

    /// Set a user's global role.
    pub async fn set_user_role(&self, user_id: &str, role: UserRole) -> AppResult<()> {
        self.user_repo.set_role(user_id, role).await?;
        tracing::info!(user_id = %user_id, role = ?role, "User role changed");
        Ok(())
    }

    /// List users, newest first.
    pub async fn list_users(&self, limit: u64, offset: u64) -> AppResult<Vec<user::Model>> {
        self.user_repo.list(limit, offset).await
    }

    /// Dashboard counters.
    pub async fn stats(&self) -> AppResult<AdminStats> {
        Ok(AdminStats {
            total_users: self.user_repo.count().await?,
            premium_users: self.user_repo.count_by_role(UserRole::Premium).await?,
            unused_codes: self.premium_repo.count_by_used(false).await?,
            used_codes: self.premium_repo.count_by_used(true).await?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use teamspace_common::code::is_valid_code;

    fn service(db: Arc<DatabaseConnection>) -> AdminService {
        AdminService::new(
            PremiumCodeRepository::new(db.clone()),
            UserRepository::new(db),
            IdGenerator::new(),
        )
    }

    #[test]
    fn test_generate_input_bounds() {
        assert!(GenerateCodesInput {
            count: 0,
            expiry_days: 30
        }
        .validate()
        .is_err());
        assert!(GenerateCodesInput {
            count: 101,
            expiry_days: 30
        }
        .validate()
        .is_err());
        assert!(GenerateCodesInput {
            count: 5,
            expiry_days: 366
        }
        .validate()
        .is_err());
        assert!(GenerateCodesInput {
            count: 100,
            expiry_days: 365
        }
        .validate()
        .is_ok());
    }

    #[tokio::test]
    async fn test_generate_codes_shape_and_shared_expiry() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 5,
                }])
                .into_connection(),
        );

        let codes = service(db)
            .generate_codes(GenerateCodesInput {
                count: 5,
                expiry_days: 30,
            })
            .await
            .unwrap();

        assert_eq!(codes.len(), 5);
        let expiry = codes[0].expires_at.unwrap();
        for code in &codes {
            assert!(is_valid_code(&code.code), "bad code: {}", code.code);
            assert!(!code.is_used);
            // Every code in the batch carries the identical expiry instant.
            assert_eq!(code.expires_at.unwrap(), expiry);
        }

        let days = (expiry - DateTimeWithTimeZone::from(Utc::now())).num_days();
        assert!((29..=30).contains(&days));
    }

    #[tokio::test]
    async fn test_delete_missing_code_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let result = service(db).delete_code("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_aggregates_counters() {
        use std::collections::BTreeMap;

        fn count_row(n: i64) -> BTreeMap<&'static str, sea_orm::Value> {
            BTreeMap::from([("num_items", sea_orm::Value::BigInt(Some(n)))])
        }

        // Four count queries: users, premium users, unused codes, used codes.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(10)]])
                .append_query_results([[count_row(3)]])
                .append_query_results([[count_row(7)]])
                .append_query_results([[count_row(4)]])
                .into_connection(),
        );

        let stats = service(db).stats().await.unwrap();

        assert_eq!(stats.total_users, 10);
        assert_eq!(stats.premium_users, 3);
        assert_eq!(stats.unused_codes, 7);
        assert_eq!(stats.used_codes, 4);
    }
}
