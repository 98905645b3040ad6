//! Premium code repository.
//!
//! Redemption has the same read-then-write hazard as invite consumption: two
//! concurrent redemptions of one code could both pass an unused-check before
//! either writes. [`PremiumCodeRepository::redeem`] marks the code used with a
//! single conditional update guarded on `is_used = false` and treats zero
//! affected rows as "already used", so a code activates at most once.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
    prelude::DateTimeWithTimeZone,
    sea_query::Expr,
};
use teamspace_common::{AppError, AppResult};

use crate::entities::user::UserRole;
use crate::entities::{PremiumCode, User, premium_code, user};

/// Repository for premium code operations.
#[derive(Clone)]
pub struct PremiumCodeRepository {
    db: Arc<DatabaseConnection>,
}

impl PremiumCodeRepository {
    /// Create a new premium code repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find code by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<premium_code::Model>> {
        PremiumCode::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an unused code matching the (already normalized) code string.
    ///
    /// Used codes are deliberately not matched, so a caller cannot tell a
    /// spent code apart from one that never existed.
    pub async fn find_unused_by_code(&self, code: &str) -> AppResult<Option<premium_code::Model>> {
        PremiumCode::find()
            .filter(premium_code::Column::Code.eq(code))
            .filter(premium_code::Column::IsUsed.eq(false))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a single code.
    ///
    /// A unique-constraint violation on the code column maps to `Conflict` so
    /// callers can regenerate and retry that one code.
    pub async fn create(&self, model: premium_code::ActiveModel) -> AppResult<premium_code::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_insert_err)
    }

    /// Insert a batch of codes in one write.
    pub async fn create_many(&self, models: Vec<premium_code::ActiveModel>) -> AppResult<u64> {
        if models.is_empty() {
            return Ok(0);
        }

        PremiumCode::insert_many(models)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(map_insert_err)
    }

    /// Redeem a code for a user: mark it used and elevate the user's role to
    /// premium, as one transaction.
    ///
    /// The mark-used write is conditional on `is_used = false`; zero affected
    /// rows means another redemption won the race and `false` is returned
    /// without touching the user row.
    pub async fn redeem(
        &self,
        code_id: &str,
        user_id: &str,
        now: DateTimeWithTimeZone,
    ) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let marked = PremiumCode::update_many()
            .col_expr(premium_code::Column::IsUsed, Expr::value(true))
            .col_expr(premium_code::Column::UsedBy, Expr::value(user_id))
            .col_expr(premium_code::Column::UsedAt, Expr::value(now))
            .filter(premium_code::Column::Id.eq(code_id))
            .filter(premium_code::Column::IsUsed.eq(false))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if marked.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(false);
        }

        let elevated = User::update_many()
            .col_expr(user::Column::Role, Expr::value(UserRole::Premium))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if elevated.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::NotFound(format!("User not found: {user_id}")));
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(true)
    }

    /// Hard-delete a code by ID.
    ///
    /// Returns whether a row was deleted. Deleting a used code orphans its
    /// `used_by` audit trail; this is an administrative override.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<bool> {
        let result = PremiumCode::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// List codes, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<premium_code::Model>> {
        PremiumCode::find()
            .order_by(premium_code::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count codes by used state.
    pub async fn count_by_used(&self, is_used: bool) -> AppResult<u64> {
        PremiumCode::find()
            .filter(premium_code::Column::IsUsed.eq(is_used))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn map_insert_err(e: DbErr) -> AppError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        AppError::Conflict("Duplicate premium code".to_string())
    } else {
        AppError::Database(e.to_string())
    }
}
