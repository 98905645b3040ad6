//! Invite lifecycle service.
//!
//! An invite passes through one persisted transition (revocation) and two
//! derived ones (expiry, exhaustion). [`validate_invite`] is the single
//! place that ordering lives: revoked wins over expired, expired wins over
//! exhausted, so the same row always reports the same state to every caller.
//!
//! Acceptance delegates the final admission decision to
//! [`InviteRepository::consume_and_join`], which re-checks the invite under
//! the database's atomicity. The service-level validity check exists only to
//! give early, precise feedback; it is never what actually admits a user.

use chrono::{Duration, Utc};
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use teamspace_common::{AppError, AppResult, IdGenerator};
use teamspace_db::entities::invite::ChannelList;
use teamspace_db::entities::workspace_member::{MemberRole, Permissions};
use teamspace_db::entities::{invite, workspace_member};
use teamspace_db::repositories::{InviteRepository, UserRepository, WorkspaceRepository};
use validator::Validate;

/// Why an invite can or cannot be used right now.
///
/// Evaluated at read time; only [`InviteValidity::Revoked`] corresponds to a
/// persisted flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteValidity {
    /// Usable right now.
    Valid,
    /// Explicitly deactivated; permanent.
    Revoked,
    /// Past its expiry timestamp.
    Expired,
    /// Every use has been consumed.
    Exhausted,
}

/// Classify an invite at `now`.
///
/// Precedence: revoked > expired > exhausted. A revoked invite that has also
/// expired reports revoked.
#[must_use]
pub fn validate_invite(invite: &invite::Model, now: DateTimeWithTimeZone) -> InviteValidity {
    if !invite.active {
        return InviteValidity::Revoked;
    }
    if invite.expires_at.is_some_and(|at| at <= now) {
        return InviteValidity::Expired;
    }
    if invite.uses_count >= invite.max_uses {
        return InviteValidity::Exhausted;
    }
    InviteValidity::Valid
}

/// Parameters for creating an invite.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInviteInput {
    pub workspace_id: String,

    /// Days until expiry; `None` means the invite never expires.
    #[validate(range(min = 1, max = 365, message = "expiry must be between 1 and 365 days"))]
    pub expires_in_days: Option<i64>,

    #[serde(default = "default_max_uses")]
    #[validate(range(min = 1, max = 100, message = "max uses must be between 1 and 100"))]
    pub max_uses: i32,

    #[serde(default = "default_true")]
    pub allow_guests: bool,

    #[serde(default)]
    pub require_approval: bool,

    /// Channels granted on join; defaults to the general channel.
    #[serde(default)]
    pub channels: Vec<String>,

    #[validate(length(max = 500, message = "message too long"))]
    pub message: Option<String>,
}

const fn default_max_uses() -> i32 {
    10
}

const fn default_true() -> bool {
    true
}

/// Creator info surfaced on the public invite page.
#[derive(Debug, Clone, Serialize)]
pub struct InviteCreator {
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// Workspace info surfaced on the public invite page.
#[derive(Debug, Clone, Serialize)]
pub struct InviteWorkspace {
    pub name: String,
    pub description: Option<String>,
}

/// Display context joined onto an invite.
///
/// Present only when both the creator and workspace rows still resolve; a
/// bare invite is served without it rather than half-filled.
#[derive(Debug, Clone, Serialize)]
pub struct InviteContext {
    pub creator: InviteCreator,
    pub workspace: InviteWorkspace,
}

/// An invite together with its read-time validity and display context.
#[derive(Debug, Clone, Serialize)]
pub struct InviteDetail {
    #[serde(flatten)]
    pub invite: invite::Model,
    pub validity: InviteValidity,
    pub context: Option<InviteContext>,
}

/// Result of an accept attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AcceptOutcome {
    /// The user was admitted and a membership row was created.
    Joined { member: workspace_member::Model },
    /// The user already belongs to the workspace; nothing was written.
    AlreadyMember,
    /// The invite cannot be used, with the reason.
    Invalid { validity: InviteValidity },
}

/// Service for invite operations.
#[derive(Clone)]
pub struct InviteService {
    invite_repo: InviteRepository,
    workspace_repo: WorkspaceRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl InviteService {
    /// Create a new invite service.
    #[must_use]
    pub const fn new(
        invite_repo: InviteRepository,
        workspace_repo: WorkspaceRepository,
        user_repo: UserRepository,
        id_gen: IdGenerator,
    ) -> Self {
        Self {
            invite_repo,
            workspace_repo,
            user_repo,
            id_gen,
        }
    }

    /// Create an invite for a workspace.
    ///
    /// The creator must be a member of the workspace.
    pub async fn create(
        &self,
        creator_id: &str,
        input: CreateInviteInput,
    ) -> AppResult<invite::Model> {
        input.validate()?;

        let workspace = self.workspace_repo.get_by_id(&input.workspace_id).await?;
        if self
            .workspace_repo
            .get_member(&workspace.id, creator_id)
            .await?
            .is_none()
        {
            return Err(AppError::Forbidden(
                "Only workspace members can create invites".to_string(),
            ));
        }

        let now: DateTimeWithTimeZone = Utc::now().into();
        let expires_at = input
            .expires_in_days
            .map(|days| now + Duration::days(days));
        let channels = if input.channels.is_empty() {
            vec!["general".to_string()]
        } else {
            input.channels
        };

        let invite = self
            .invite_repo
            .create(invite::ActiveModel {
                id: Set(self.id_gen.generate()),
                workspace_id: Set(workspace.id),
                created_by: Set(creator_id.to_string()),
                expires_at: Set(expires_at),
                max_uses: Set(input.max_uses),
                uses_count: Set(0),
                active: Set(true),
                allow_guests: Set(input.allow_guests),
                require_approval: Set(input.require_approval),
                channels: Set(ChannelList(channels)),
                message: Set(input.message),
                created_at: Set(now),
                updated_at: Set(None),
            })
            .await?;

        tracing::info!(
            invite_id = %invite.id,
            workspace_id = %invite.workspace_id,
            max_uses = invite.max_uses,
            "Invite created"
        );

        Ok(invite)
    }

    /// Load an invite with its validity and display context.
    ///
    /// This is the unauthenticated invite-page read; it never mutates the
    /// invite.
    pub async fn load(&self, invite_id: &str) -> AppResult<InviteDetail> {
        let invite = self.invite_repo.get_by_id(invite_id).await?;
        let validity = validate_invite(&invite, Utc::now().into());

        let creator = self.user_repo.find_by_id(&invite.created_by).await?;
        let workspace = self.workspace_repo.find_by_id(&invite.workspace_id).await?;

        let context = match (creator, workspace) {
            (Some(creator), Some(workspace)) => Some(InviteContext {
                creator: InviteCreator {
                    display_name: creator.display_name,
                    email: creator.email,
                    avatar_url: creator.avatar_url,
                },
                workspace: InviteWorkspace {
                    name: workspace.name,
                    description: workspace.description,
                },
            }),
            _ => None,
        };

        Ok(InviteDetail {
            invite,
            validity,
            context,
        })
    }

    /// Accept an invite on behalf of a user.
    ///
    /// Existing members short-circuit to [`AcceptOutcome::AlreadyMember`]
    /// without consuming a use. Admission itself is a conditional consume in
    /// the repository; if that loses a race, the invite is re-read to report
    /// the state the caller actually hit.
    pub async fn accept(&self, invite_id: &str, user_id: &str) -> AppResult<AcceptOutcome> {
        let invite = self.invite_repo.get_by_id(invite_id).await?;
        let now: DateTimeWithTimeZone = Utc::now().into();

        let validity = validate_invite(&invite, now);
        if validity != InviteValidity::Valid {
            return Ok(AcceptOutcome::Invalid { validity });
        }

        if self
            .workspace_repo
            .get_member(&invite.workspace_id, user_id)
            .await?
            .is_some()
        {
            return Ok(AcceptOutcome::AlreadyMember);
        }

        let member = workspace_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            workspace_id: Set(invite.workspace_id.clone()),
            user_id: Set(user_id.to_string()),
            role: Set(MemberRole::Member),
            permissions: Set(Permissions::default()),
            joined_at: Set(now),
        };

        match self
            .invite_repo
            .consume_and_join(invite_id, member, now)
            .await?
        {
            Some(member) => {
                tracing::info!(
                    invite_id = %invite_id,
                    workspace_id = %member.workspace_id,
                    user_id = %user_id,
                    "Invite accepted"
                );
                Ok(AcceptOutcome::Joined { member })
            }
            None => {
                // Lost the race between validation and the consume. Re-read
                // to report what actually stopped us.
                let fresh = self.invite_repo.get_by_id(invite_id).await?;
                let validity = match validate_invite(&fresh, now) {
                    InviteValidity::Valid => InviteValidity::Exhausted,
                    other => other,
                };
                Ok(AcceptOutcome::Invalid { validity })
            }
        }
    }

    /// Revoke an invite.
    ///
    /// Allowed for the invite's creator and for workspace owners/admins.
    /// Idempotent: revoking an already-revoked invite succeeds.
    pub async fn revoke(&self, invite_id: &str, requester_id: &str) -> AppResult<()> {
        let invite = self.invite_repo.get_by_id(invite_id).await?;

        let allowed = invite.created_by == requester_id
            || self
                .workspace_repo
                .member_role(&invite.workspace_id, requester_id)
                .await?
                .is_some_and(MemberRole::can_manage_invites);

        if !allowed {
            return Err(AppError::Forbidden(
                "Not allowed to revoke this invite".to_string(),
            ));
        }

        self.invite_repo
            .deactivate(invite_id, Utc::now().into())
            .await?;

        tracing::info!(invite_id = %invite_id, requester_id = %requester_id, "Invite revoked");
        Ok(())
    }

    /// List invites for a workspace.
    ///
    /// Restricted to members who can manage invites.
    pub async fn list_for_workspace(
        &self,
        workspace_id: &str,
        requester_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<invite::Model>> {
        let can_manage = self
            .workspace_repo
            .member_role(workspace_id, requester_id)
            .await?
            .is_some_and(MemberRole::can_manage_invites);

        if !can_manage {
            return Err(AppError::Forbidden(
                "Only workspace admins can list invites".to_string(),
            ));
        }

        self.invite_repo
            .list_for_workspace(workspace_id, limit, offset)
            .await
    }
}
