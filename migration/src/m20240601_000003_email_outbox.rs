use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmailOutbox::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmailOutbox::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmailOutbox::RecipientEmail).string().not_null())
                    .col(ColumnDef::new(EmailOutbox::RecipientName).string().not_null())
                    .col(ColumnDef::new(EmailOutbox::Template).string().not_null())
                    .col(ColumnDef::new(EmailOutbox::ActivationUrl).string().not_null())
                    .col(ColumnDef::new(EmailOutbox::ActivationCode).string().not_null())
                    .col(ColumnDef::new(EmailOutbox::Subject).string().not_null())
                    .col(
                        ColumnDef::new(EmailOutbox::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(EmailOutbox::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(EmailOutbox::LastError).text())
                    .col(
                        ColumnDef::new(EmailOutbox::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailOutbox::NextAttemptAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmailOutbox::SentAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_email_outbox_status_next_attempt_at")
                    .table(EmailOutbox::Table)
                    .col(EmailOutbox::Status)
                    .col(EmailOutbox::NextAttemptAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let _ = manager
            .drop_index(
                Index::drop()
                    .name("idx_email_outbox_status_next_attempt_at")
                    .table(EmailOutbox::Table)
                    .to_owned(),
            )
            .await;

        manager
            .drop_table(Table::drop().table(EmailOutbox::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EmailOutbox {
    Table,
    Id,
    RecipientEmail,
    RecipientName,
    Template,
    ActivationUrl,
    ActivationCode,
    Subject,
    Status,
    Attempts,
    LastError,
    CreatedAt,
    NextAttemptAt,
    SentAt,
}
