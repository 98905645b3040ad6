//! User repository.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
    prelude::DateTimeWithTimeZone,
    sea_query::Expr,
};
use teamspace_common::{AppError, AppResult};

use crate::entities::user::UserRole;
use crate::entities::{User, user};

/// Repository for user operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get user by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {id}")))
    }

    /// Find user by access token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set a user's role.
    ///
    /// Returns `NotFound` if no row matched.
    pub async fn set_role(&self, id: &str, role: UserRole) -> AppResult<()> {
        let result = User::update_many()
            .col_expr(user::Column::Role, Expr::value(role))
            .col_expr(
                user::Column::UpdatedAt,
                Expr::value(DateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("User not found: {id}")));
        }

        Ok(())
    }

    /// List users, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<user::Model>> {
        User::find()
            .order_by(user::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users with a given role.
    pub async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        User::find()
            .filter(user::Column::Role.eq(role))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<u64> {
        User::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::user::UserStatus;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_user(id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            display_name: id.to_string(),
            avatar_url: None,
            token: Some(format!("token-{id}")),
            role,
            status: UserStatus::Offline,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_token() {
        let user = test_user("usr1", UserRole::Member);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let found = repo.find_by_token("token-usr1").await.unwrap();

        assert_eq!(found.unwrap().id, "usr1");
    }

    #[tokio::test]
    async fn test_set_role_missing_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.set_role("missing", UserRole::Premium).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
