//! Create workspace and `workspace_member` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Workspace::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workspace::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workspace::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Workspace::Description).text())
                    .col(ColumnDef::new(Workspace::OwnerId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Workspace::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Workspace::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspace_owner")
                            .from(Workspace::Table, Workspace::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workspace_owner_id")
                    .table(Workspace::Table)
                    .col(Workspace::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkspaceMember::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkspaceMember::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkspaceMember::WorkspaceId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkspaceMember::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkspaceMember::Role)
                            .string_len(20)
                            .not_null()
                            .default("member"),
                    )
                    .col(
                        ColumnDef::new(WorkspaceMember::Permissions)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkspaceMember::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspace_member_workspace")
                            .from(WorkspaceMember::Table, WorkspaceMember::WorkspaceId)
                            .to(Workspace::Table, Workspace::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspace_member_user")
                            .from(WorkspaceMember::Table, WorkspaceMember::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workspace_member_workspace_id")
                    .table(WorkspaceMember::Table)
                    .col(WorkspaceMember::WorkspaceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workspace_member_user_id")
                    .table(WorkspaceMember::Table)
                    .col(WorkspaceMember::UserId)
                    .to_owned(),
            )
            .await?;

        // One membership per user per workspace
        manager
            .create_index(
                Index::create()
                    .name("idx_workspace_member_unique")
                    .table(WorkspaceMember::Table)
                    .col(WorkspaceMember::WorkspaceId)
                    .col(WorkspaceMember::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkspaceMember::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workspace::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Workspace {
    Table,
    Id,
    Name,
    Description,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum WorkspaceMember {
    Table,
    Id,
    WorkspaceId,
    UserId,
    Role,
    Permissions,
    JoinedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
