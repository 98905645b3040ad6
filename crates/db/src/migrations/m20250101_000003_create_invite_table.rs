//! Create invite table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invite::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invite::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Invite::WorkspaceId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invite::CreatedBy).string_len(32).not_null())
                    .col(ColumnDef::new(Invite::ExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Invite::MaxUses)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Invite::UsesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Invite::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Invite::AllowGuests)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Invite::RequireApproval)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Invite::Channels).json_binary().not_null())
                    .col(ColumnDef::new(Invite::Message).text())
                    .col(
                        ColumnDef::new(Invite::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Invite::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invite_workspace")
                            .from(Invite::Table, Invite::WorkspaceId)
                            .to(Workspace::Table, Workspace::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invite_creator")
                            .from(Invite::Table, Invite::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invite_workspace_id")
                    .table(Invite::Table)
                    .col(Invite::WorkspaceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invite_created_by")
                    .table(Invite::Table)
                    .col(Invite::CreatedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invite_active")
                    .table(Invite::Table)
                    .col(Invite::Active)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invite::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Invite {
    Table,
    Id,
    WorkspaceId,
    CreatedBy,
    ExpiresAt,
    MaxUses,
    UsesCount,
    Active,
    AllowGuests,
    RequireApproval,
    Channels,
    Message,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Workspace {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
