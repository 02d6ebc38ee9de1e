use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Nova Conversa";
pub const TITLE_MAX_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }

    /// Speaker name used when the message is replayed to the model.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "Usuário",
            Role::Bot => "Poldo",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Role::User),
            "bot" => Ok(Role::Bot),
            other => Err(format!("unknown message role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub conversation_id: Uuid,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(conversation_id: Uuid, role: Role, text: impl Into<String>) -> Self {
        Self {
            conversation_id,
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: DEFAULT_TITLE.to_string(),
            created_at: Utc::now(),
            messages: vec![],
        }
    }

    /// Number of user messages, used to detect the first question.
    pub fn user_message_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|message| message.role == Role::User)
            .count()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
}

impl From<&Conversation> for ConversationSummary {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id,
            title: conversation.title.clone(),
            created_at: conversation.created_at,
            message_count: conversation.messages.len(),
        }
    }
}

/// Title derived from the first question: at most 40 characters, `...` when cut.
pub fn title_from_question(question: &str) -> String {
    if question.chars().count() > TITLE_MAX_CHARS {
        let head: String = question.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        question.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_its_column_value() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("bot".parse::<Role>().unwrap(), Role::Bot);
        assert!("assistant".parse::<Role>().is_err());
        assert_eq!(Role::Bot.to_string(), "bot");
    }

    #[test]
    fn short_question_is_kept_as_title() {
        assert_eq!(title_from_question("status do homelab-test"), "status do homelab-test");
    }

    #[test]
    fn long_question_is_truncated_on_char_boundary() {
        let question = "ç".repeat(45);
        let title = title_from_question(&question);
        assert_eq!(title, format!("{}...", "ç".repeat(40)));
    }

    #[test]
    fn new_conversation_has_default_title_and_no_messages() {
        let conversation = Conversation::new();
        assert_eq!(conversation.title, DEFAULT_TITLE);
        assert!(conversation.messages.is_empty());
        assert_eq!(ConversationSummary::from(&conversation).message_count, 0);
    }
}
