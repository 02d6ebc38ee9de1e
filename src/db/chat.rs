use super::{ConversationStore, StoreError};
use crate::models::{self, Conversation, ConversationSummary, Message, Role};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::Instrument;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    title: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    title: String,
    created_at: DateTime<Utc>,
    message_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    conversation_id: Uuid,
    role: String,
    text: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(StoreError::Corrupt)?;
        Ok(Message {
            conversation_id: row.conversation_id,
            role,
            text: row.text,
            created_at: row.created_at,
        })
    }
}

impl From<SummaryRow> for ConversationSummary {
    fn from(row: SummaryRow) -> Self {
        ConversationSummary {
            id: row.id,
            title: row.title,
            created_at: row.created_at,
            message_count: row.message_count.max(0) as usize,
        }
    }
}

fn into_messages(rows: Vec<MessageRow>) -> Result<Vec<Message>, StoreError> {
    rows.into_iter().map(Message::try_from).collect()
}

async fn insert_conversation<'e, E>(executor: E, conversation: &Conversation) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let query_span = tracing::info_span!("Saving new conversation into the database");
    sqlx::query(
        r#"
        INSERT INTO conversations (id, title, created_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(conversation.id)
    .bind(&conversation.title)
    .bind(conversation.created_at)
    .execute(executor)
    .instrument(query_span)
    .await
    .map(|_| ())
}

pub async fn insert(pool: &PgPool) -> Result<Conversation, StoreError> {
    let conversation = Conversation::new();
    insert_conversation(pool, &conversation).await.map_err(|err| {
        tracing::error!("Failed to insert conversation: {:?}", err);
        err
    })?;
    Ok(conversation)
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Conversation>, StoreError> {
    let query_span = tracing::info_span!("Fetch conversation by id.");
    let row = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT id, title, created_at
        FROM conversations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await?;

    match row {
        Some(row) => {
            let messages = fetch_messages(pool, row.id).await?;
            Ok(Some(Conversation {
                id: row.id,
                title: row.title,
                created_at: row.created_at,
                messages,
            }))
        }
        None => Ok(None),
    }
}

pub async fn fetch_messages(pool: &PgPool, conversation_id: Uuid) -> Result<Vec<Message>, StoreError> {
    let query_span = tracing::info_span!("Fetch messages by conversation id.");
    let rows = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT conversation_id, role, text, created_at
        FROM messages
        WHERE conversation_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await?;

    into_messages(rows)
}

pub async fn fetch_recent_messages(
    pool: &PgPool,
    conversation_id: Uuid,
    limit: usize,
) -> Result<Vec<Message>, StoreError> {
    let query_span = tracing::info_span!("Fetch recent messages by conversation id.");
    let rows = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT conversation_id, role, text, created_at
        FROM (
            SELECT id, conversation_id, role, text, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY id DESC
            LIMIT $2
        ) recent
        ORDER BY id ASC
        "#,
    )
    .bind(conversation_id)
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .fetch_all(pool)
    .instrument(query_span)
    .await?;

    into_messages(rows)
}

pub async fn list(pool: &PgPool) -> Result<Vec<ConversationSummary>, StoreError> {
    let query_span = tracing::info_span!("List conversations.");
    let rows = sqlx::query_as::<_, SummaryRow>(
        r#"
        SELECT c.id, c.title, c.created_at, COUNT(m.id) AS message_count
        FROM conversations c
        LEFT JOIN messages m ON m.conversation_id = c.id
        GROUP BY c.id, c.title, c.created_at
        ORDER BY c.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .instrument(query_span)
    .await?;

    Ok(rows.into_iter().map(ConversationSummary::from).collect())
}

pub async fn append(
    pool: &PgPool,
    conversation_id: Uuid,
    role: Role,
    text: &str,
) -> Result<Message, StoreError> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>(
        r#"SELECT EXISTS(SELECT 1 FROM conversations WHERE id = $1)"#,
    )
    .bind(conversation_id)
    .fetch_one(&mut *tx)
    .await?;

    let conversation_id = if exists {
        conversation_id
    } else {
        let conversation = Conversation::new();
        tracing::info!(
            requested = %conversation_id,
            created = %conversation.id,
            "Unknown conversation, starting a new one"
        );
        insert_conversation(&mut *tx, &conversation).await?;
        conversation.id
    };

    let message = Message::new(conversation_id, role, text);
    let query_span = tracing::info_span!("Saving new message into the database");
    sqlx::query(
        r#"
        INSERT INTO messages (conversation_id, role, text, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(message.conversation_id)
    .bind(message.role.as_str())
    .bind(&message.text)
    .bind(message.created_at)
    .execute(&mut *tx)
    .instrument(query_span)
    .await?;

    if role == Role::User {
        let user_messages = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM messages WHERE conversation_id = $1 AND role = 'user'"#,
        )
        .bind(conversation_id)
        .fetch_one(&mut *tx)
        .await?;

        if user_messages == 1 {
            sqlx::query(r#"UPDATE conversations SET title = $2 WHERE id = $1"#)
                .bind(conversation_id)
                .bind(models::title_from_question(text))
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    Ok(message)
}

/// Durable store backed by the `conversations` and `messages` tables.
#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations before handing out the store.
    pub async fn migrated(pool: PgPool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn create(&self) -> Result<Conversation, StoreError> {
        insert(&self.pool).await
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Conversation>, StoreError> {
        fetch(&self.pool, id).await
    }

    async fn append_message(
        &self,
        id: Uuid,
        role: Role,
        text: &str,
    ) -> Result<Message, StoreError> {
        append(&self.pool, id, role, text).await
    }

    async fn history(&self, id: Uuid) -> Result<Vec<Message>, StoreError> {
        fetch_messages(&self.pool, id).await
    }

    async fn recent_messages(&self, id: Uuid, limit: usize) -> Result<Vec<Message>, StoreError> {
        fetch_recent_messages(&self.pool, id, limit).await
    }

    async fn list(&self) -> Result<Vec<ConversationSummary>, StoreError> {
        list(&self.pool).await
    }
}
