//! Create `premium_code` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PremiumCode::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PremiumCode::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PremiumCode::Code)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PremiumCode::IsUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PremiumCode::UsedBy).string_len(32))
                    .col(ColumnDef::new(PremiumCode::UsedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PremiumCode::ExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(PremiumCode::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_premium_code_used_by")
                            .from(PremiumCode::Table, PremiumCode::UsedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_premium_code_is_used")
                    .table(PremiumCode::Table)
                    .col(PremiumCode::IsUsed)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_premium_code_used_by")
                    .table(PremiumCode::Table)
                    .col(PremiumCode::UsedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PremiumCode::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PremiumCode {
    Table,
    Id,
    Code,
    IsUsed,
    UsedBy,
    UsedAt,
    ExpiresAt,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
