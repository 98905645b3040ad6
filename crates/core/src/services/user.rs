//! User service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use teamspace_common::{AppError, AppResult, IdGenerator};
use teamspace_db::entities::user;
use teamspace_db::entities::user::{UserRole, UserStatus};
use teamspace_db::repositories::UserRepository;
use validator::Validate;

/// Parameters for registering a user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserInput {
    #[validate(email(message = "invalid email"))]
    pub email: String,

    #[validate(length(min = 1, max = 128, message = "display name required"))]
    pub display_name: String,

    #[validate(url(message = "invalid avatar url"))]
    pub avatar_url: Option<String>,
}

/// Service for user operations.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, id_gen: IdGenerator) -> Self {
        Self { user_repo, id_gen }
    }

    /// Resolve a bearer token to a user, or `Unauthorized`.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Register a new user and mint an access token for them.
    pub async fn register(&self, input: RegisterUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let user = self
            .user_repo
            .create(user::ActiveModel {
                id: Set(self.id_gen.generate()),
                email: Set(input.email.to_lowercase()),
                display_name: Set(input.display_name),
                avatar_url: Set(input.avatar_url),
                token: Set(Some(self.id_gen.generate_token())),
                role: Set(UserRole::Member),
                status: Set(UserStatus::Offline),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_register_input_validation() {
        let input = RegisterUserInput {
            email: "not-an-email".to_string(),
            display_name: "Alice".to_string(),
            avatar_url: None,
        };
        assert!(input.validate().is_err());

        let input = RegisterUserInput {
            email: "alice@example.com".to_string(),
            ..input
        };
        assert!(input.validate().is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db), IdGenerator::new());
        let result = service.authenticate_by_token("bogus").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
