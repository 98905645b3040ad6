//! Invite repository.
//!
//! The join path ("validate then increment") is racy if expressed as separate
//! read and write steps: two callers can both pass validation when
//! `uses_count == max_uses - 1` and over-admit. [`InviteRepository::consume_and_join`]
//! therefore performs the increment as a single conditional update and treats
//! zero affected rows as exhaustion, so `uses_count` can never pass `max_uses`
//! regardless of concurrency.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::DateTimeWithTimeZone,
    sea_query::Expr,
};
use teamspace_common::{AppError, AppResult};

use crate::entities::{Invite, invite, workspace_member};

/// Repository for invite operations.
#[derive(Clone)]
pub struct InviteRepository {
    db: Arc<DatabaseConnection>,
}

impl InviteRepository {
    /// Create a new invite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find invite by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<invite::Model>> {
        Invite::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get invite by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<invite::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Invite not found: {id}")))
    }

    /// Create a new invite.
    pub async fn create(&self, model: invite::ActiveModel) -> AppResult<invite::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Revoke an invite (soft-disable).
    ///
    /// Returns whether a row was updated.
    pub async fn deactivate(&self, id: &str, now: DateTimeWithTimeZone) -> AppResult<bool> {
        let result = Invite::update_many()
            .col_expr(invite::Column::Active, Expr::value(false))
            .col_expr(invite::Column::UpdatedAt, Expr::value(now))
            .filter(invite::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Consume one use of an invite and insert the membership row, as one
    /// transaction.
    ///
    /// The use-count increment is guarded on `active`, non-expiry, and
    /// `uses_count < max_uses` evaluated atomically by the store. Returns
    /// `None` without inserting the membership when the guard matched no row
    /// (the invite was revoked, expired, or exhausted since it was read).
    pub async fn consume_and_join(
        &self,
        invite_id: &str,
        member: workspace_member::ActiveModel,
        now: DateTimeWithTimeZone,
    ) -> AppResult<Option<workspace_member::Model>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let result = Invite::update_many()
            .col_expr(
                invite::Column::UsesCount,
                Expr::col(invite::Column::UsesCount).add(1),
            )
            .col_expr(invite::Column::UpdatedAt, Expr::value(now))
            .filter(invite::Column::Id.eq(invite_id))
            .filter(invite::Column::Active.eq(true))
            .filter(Expr::col(invite::Column::UsesCount).lt(Expr::col(invite::Column::MaxUses)))
            .filter(
                Condition::any()
                    .add(invite::Column::ExpiresAt.is_null())
                    .add(invite::Column::ExpiresAt.gt(now)),
            )
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(None);
        }

        let member = member
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Some(member))
    }

    /// List invites for a workspace, newest first.
    pub async fn list_for_workspace(
        &self,
        workspace_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<invite::Model>> {
        Invite::find()
            .filter(invite::Column::WorkspaceId.eq(workspace_id))
            .order_by(invite::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::invite::ChannelList;
    use crate::entities::workspace_member::{MemberRole, Permissions};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn test_invite(id: &str, uses_count: i32, max_uses: i32) -> invite::Model {
        invite::Model {
            id: id.to_string(),
            workspace_id: "ws1".to_string(),
            created_by: "usr1".to_string(),
            expires_at: None,
            max_uses,
            uses_count,
            active: true,
            allow_guests: true,
            require_approval: false,
            channels: ChannelList(vec!["general".to_string()]),
            message: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_member_model() -> workspace_member::ActiveModel {
        workspace_member::ActiveModel {
            id: Set("mbr1".to_string()),
            workspace_id: Set("ws1".to_string()),
            user_id: Set("usr2".to_string()),
            role: Set(MemberRole::Member),
            permissions: Set(Permissions::default()),
            joined_at: Set(Utc::now().into()),
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let invite = test_invite("inv1", 0, 10);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[invite.clone()]])
                .into_connection(),
        );

        let repo = InviteRepository::new(db);
        let found = repo.find_by_id("inv1").await.unwrap();

        assert_eq!(found.unwrap().max_uses, 10);
    }

    #[tokio::test]
    async fn test_consume_and_join_exhausted_guard() {
        // Guard matches no row: the membership insert must not happen.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = InviteRepository::new(db);
        let joined = repo
            .consume_and_join("inv1", test_member_model(), Utc::now().into())
            .await
            .unwrap();

        assert!(joined.is_none());
    }

    #[tokio::test]
    async fn test_consume_and_join_increments_then_inserts() {
        let member = workspace_member::Model {
            id: "mbr1".to_string(),
            workspace_id: "ws1".to_string(),
            user_id: "usr2".to_string(),
            role: MemberRole::Member,
            permissions: Permissions::default(),
            joined_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
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
                .append_query_results([[member.clone()]])
                .into_connection(),
        );

        let repo = InviteRepository::new(db);
        let joined = repo
            .consume_and_join("inv1", test_member_model(), Utc::now().into())
            .await
            .unwrap();

        assert_eq!(joined.unwrap().user_id, "usr2");
    }

    #[tokio::test]
    async fn test_deactivate() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = InviteRepository::new(db);
        assert!(repo.deactivate("inv1", Utc::now().into()).await.unwrap());
    }
}
