use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entity::email_outbox::{self, STATUS_FAILED, STATUS_PENDING, STATUS_SENT};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};

use crate::{
    domain::{
        error::RepositoryError,
        models::notification::{ActivationEmail, EmailTemplateName, OutboxMessage},
        repositories::outbox_repository::OutboxRepository,
    },
    infrastructure::map_db_err,
};

#[derive(Clone)]
pub struct PostgresOutboxRepository {
    db: DatabaseConnection,
}

impl PostgresOutboxRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Queue an email, due immediately
pub(crate) async fn insert_outbox_message<C: ConnectionTrait>(
    conn: &C,
    email: &ActivationEmail,
    now: DateTime<Utc>,
) -> Result<email_outbox::Model, DbErr> {
    email_outbox::ActiveModel {
        recipient_email: Set(email.recipient_email.clone()),
        recipient_name: Set(email.recipient_name.clone()),
        template: Set(email.template.as_str().to_string()),
        activation_url: Set(email.activation_url.clone()),
        activation_code: Set(email.activation_code.clone()),
        subject: Set(email.subject.clone()),
        status: Set(STATUS_PENDING.to_string()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        sent_at: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await
}

fn message_from_model(model: email_outbox::Model) -> Result<OutboxMessage, RepositoryError> {
    let template = EmailTemplateName::parse(&model.template).ok_or_else(|| {
        RepositoryError::DatabaseError(format!("unknown email template {}", model.template))
    })?;

    Ok(OutboxMessage {
        id: model.id,
        email: ActivationEmail {
            recipient_email: model.recipient_email,
            recipient_name: model.recipient_name,
            template,
            activation_url: model.activation_url,
            activation_code: model.activation_code,
            subject: model.subject,
        },
        attempts: model.attempts,
    })
}

#[async_trait]
impl OutboxRepository for PostgresOutboxRepository {
    async fn fetch_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<OutboxMessage>, RepositoryError> {
        email_outbox::Entity::find()
            .filter(email_outbox::Column::Status.eq(STATUS_PENDING))
            .filter(email_outbox::Column::NextAttemptAt.lte(now))
            .order_by_asc(email_outbox::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(message_from_model)
            .collect()
    }

    async fn mark_sent(&self, id: i32, sent_at: DateTime<Utc>) -> Result<(), RepositoryError> {
        email_outbox::Entity::update_many()
            .col_expr(email_outbox::Column::Status, Expr::value(STATUS_SENT))
            .col_expr(email_outbox::Column::SentAt, Expr::value(sent_at))
            .col_expr(
                email_outbox::Column::Attempts,
                Expr::col(email_outbox::Column::Attempts).add(1),
            )
            .col_expr(email_outbox::Column::LastError, Expr::value(Option::<String>::None))
            .filter(email_outbox::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn record_failure(
        &self,
        id: i32,
        attempts: i32,
        error: &str,
        next_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let update = email_outbox::Entity::update_many()
            .col_expr(email_outbox::Column::Attempts, Expr::value(attempts))
            .col_expr(email_outbox::Column::LastError, Expr::value(error.to_string()))
            .filter(email_outbox::Column::Id.eq(id));

        let update = match next_attempt_at {
            Some(at) => update
                .col_expr(email_outbox::Column::Status, Expr::value(STATUS_PENDING))
                .col_expr(email_outbox::Column::NextAttemptAt, Expr::value(at)),
            None => update.col_expr(email_outbox::Column::Status, Expr::value(STATUS_FAILED)),
        };

        update.exec(&self.db).await.map_err(map_db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::{
        domain::models::token::ActivationCode,
        test_support::{noon, setup_db},
    };

    async fn queue(db: &DatabaseConnection, recipient: &str) -> i32 {
        let email = ActivationEmail::new(
            recipient,
            "Ann Lee".to_string(),
            "http://localhost:4200/activate-account",
            &ActivationCode::parse("123456".to_string()).unwrap(),
        );
        insert_outbox_message(db, &email, noon()).await.unwrap().id
    }

    #[tokio::test]
    async fn due_messages_are_returned_oldest_first() {
        let db = setup_db().await;
        let first = queue(&db, "ann@x.com").await;
        let second = queue(&db, "bob@x.com").await;
        let repository = PostgresOutboxRepository::new(db);

        let due = repository.fetch_due(noon(), 10).await.unwrap();
        assert_eq!(due.iter().map(|m| m.id).collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(due[0].email.recipient_email, "ann@x.com");
        assert_eq!(due[0].email.template, EmailTemplateName::ActivateAccount);
        assert_eq!(due[0].email.subject, "Account activation");
        assert_eq!(due[0].attempts, 0);

        let limited = repository.fetch_due(noon(), 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn sent_messages_leave_the_queue() {
        let db = setup_db().await;
        let id = queue(&db, "ann@x.com").await;
        let repository = PostgresOutboxRepository::new(db.clone());

        repository.mark_sent(id, noon()).await.unwrap();

        assert!(repository.fetch_due(noon(), 10).await.unwrap().is_empty());
        let row = email_outbox::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();
        assert_eq!(row.status, STATUS_SENT);
        assert_eq!(row.attempts, 1);
        assert_eq!(row.sent_at, Some(noon()));
    }

    #[tokio::test]
    async fn failures_are_rescheduled_or_abandoned() {
        let db = setup_db().await;
        let id = queue(&db, "ann@x.com").await;
        let repository = PostgresOutboxRepository::new(db.clone());

        let retry_at = noon() + Duration::seconds(30);
        repository
            .record_failure(id, 1, "smtp down", Some(retry_at))
            .await
            .unwrap();
        assert!(repository.fetch_due(noon(), 10).await.unwrap().is_empty());
        let due = repository.fetch_due(retry_at, 10).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].attempts, 1);

        repository.record_failure(id, 2, "smtp down", None).await.unwrap();
        assert!(repository.fetch_due(retry_at, 10).await.unwrap().is_empty());
        let row = email_outbox::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();
        assert_eq!(row.status, STATUS_FAILED);
        assert_eq!(row.last_error.as_deref(), Some("smtp down"));
    }
}
