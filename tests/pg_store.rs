mod common;

use poldo::db::ConversationStore;
use poldo::models::{Role, DEFAULT_TITLE};
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn messages_are_returned_in_insertion_order() {
    let Some(store) = common::pg_store().await else {
        return;
    };

    let conversation = store.create().await.unwrap();
    assert_eq!(conversation.title, DEFAULT_TITLE);

    for (role, text) in [
        (Role::User, "pergunta 1"),
        (Role::Bot, "resposta 1"),
        (Role::User, "pergunta 2"),
        (Role::Bot, "resposta 2"),
    ] {
        store
            .append_message(conversation.id, role, text)
            .await
            .unwrap();
    }

    let history = store.history(conversation.id).await.unwrap();
    let texts: Vec<&str> = history.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["pergunta 1", "resposta 1", "pergunta 2", "resposta 2"]);
    assert_eq!(history[1].role, Role::Bot);

    let recent = store.recent_messages(conversation.id, 3).await.unwrap();
    let texts: Vec<&str> = recent.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["resposta 1", "pergunta 2", "resposta 2"]);

    let stored = store.fetch(conversation.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "pergunta 1");
}

#[tokio::test]
async fn unknown_id_starts_a_new_conversation() {
    let Some(store) = common::pg_store().await else {
        return;
    };
    let unknown = Uuid::new_v4();

    let message = store
        .append_message(unknown, Role::User, "status do homelab-prod")
        .await
        .unwrap();

    assert_ne!(message.conversation_id, unknown);
    assert!(store.fetch(unknown).await.unwrap().is_none());
    let conversation = store.fetch(message.conversation_id).await.unwrap().unwrap();
    assert_eq!(conversation.messages.len(), 1);
    assert_eq!(conversation.title, "status do homelab-prod");
}

#[tokio::test]
async fn long_first_question_is_truncated_into_title() {
    let Some(store) = common::pg_store().await else {
        return;
    };
    let conversation = store.create().await.unwrap();
    let question = "qual é o uso de memória de todos os homelabs neste momento?";

    store
        .append_message(conversation.id, Role::User, question)
        .await
        .unwrap();
    store
        .append_message(conversation.id, Role::User, "outra pergunta")
        .await
        .unwrap();

    let stored = store.fetch(conversation.id).await.unwrap().unwrap();
    let expected: String = question.chars().take(40).collect::<String>() + "...";
    assert_eq!(stored.title, expected);
}

#[tokio::test]
async fn conversations_are_listed_newest_first() {
    let Some(store) = common::pg_store().await else {
        return;
    };

    let older = store.create().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    let newer = store.create().await.unwrap();
    store
        .append_message(older.id, Role::User, "oi")
        .await
        .unwrap();

    let summaries = store.list().await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, newer.id);
    assert_eq!(summaries[0].message_count, 0);
    assert_eq!(summaries[1].id, older.id);
    assert_eq!(summaries[1].message_count, 1);
    assert_eq!(summaries[1].title, "oi");
}
