//! Workspace repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use teamspace_common::{AppError, AppResult};

use crate::entities::workspace_member::MemberRole;
use crate::entities::{Workspace, WorkspaceMember, workspace, workspace_member};

/// Repository for workspace and membership operations.
#[derive(Clone)]
pub struct WorkspaceRepository {
    db: Arc<DatabaseConnection>,
}

impl WorkspaceRepository {
    /// Create a new workspace repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find workspace by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<workspace::Model>> {
        Workspace::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get workspace by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<workspace::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Workspace not found: {id}")))
    }

    /// Create a new workspace.
    pub async fn create(&self, model: workspace::ActiveModel) -> AppResult<workspace::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Member Operations ====================

    /// Get membership record for a user in a workspace.
    pub async fn get_member(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> AppResult<Option<workspace_member::Model>> {
        WorkspaceMember::find()
            .filter(workspace_member::Column::WorkspaceId.eq(workspace_id))
            .filter(workspace_member::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if user is a member of a workspace.
    pub async fn is_member(&self, workspace_id: &str, user_id: &str) -> AppResult<bool> {
        let count = WorkspaceMember::find()
            .filter(workspace_member::Column::WorkspaceId.eq(workspace_id))
            .filter(workspace_member::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Get member role, if any.
    pub async fn member_role(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> AppResult<Option<MemberRole>> {
        let member = self.get_member(workspace_id, user_id).await?;
        Ok(member.map(|m| m.role))
    }

    /// List members of a workspace.
    pub async fn list_members(
        &self,
        workspace_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<workspace_member::Model>> {
        WorkspaceMember::find()
            .filter(workspace_member::Column::WorkspaceId.eq(workspace_id))
            .order_by(workspace_member::Column::JoinedAt, Order::Asc)
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
    use crate::entities::workspace_member::Permissions;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_member(workspace_id: &str, user_id: &str, role: MemberRole) -> workspace_member::Model {
        workspace_member::Model {
            id: format!("mbr-{user_id}"),
            workspace_id: workspace_id.to_string(),
            user_id: user_id.to_string(),
            role,
            permissions: Permissions::default(),
            joined_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_member() {
        let member = test_member("ws1", "usr1", MemberRole::Member);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[member.clone()]])
                .into_connection(),
        );

        let repo = WorkspaceRepository::new(db);
        let found = repo.get_member("ws1", "usr1").await.unwrap();

        assert_eq!(found.unwrap().role, MemberRole::Member);
    }

    #[tokio::test]
    async fn test_member_role_none_for_non_member() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<workspace_member::Model>::new()])
                .into_connection(),
        );

        let repo = WorkspaceRepository::new(db);
        let role = repo.member_role("ws1", "stranger").await.unwrap();

        assert!(role.is_none());
    }
}
