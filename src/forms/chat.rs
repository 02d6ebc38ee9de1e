use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use uuid::Uuid;

pub const QUESTION_MAX_CHARS: usize = 4000;

fn question_length(question: &str) -> Result<(), serde_valid::validation::Error> {
    let length = question.trim().chars().count();
    if length > QUESTION_MAX_CHARS {
        return Err(serde_valid::validation::Error::Custom(format!(
            "Pergunta muito longa: {} caracteres (máximo {})",
            length, QUESTION_MAX_CHARS
        )));
    }
    Ok(())
}

/// Body of `POST /chat/send/`
#[derive(Serialize, Deserialize, Debug, Default, Validate)]
pub struct SendMessageForm {
    #[serde(default)]
    #[validate(pattern = r"\S")]
    #[validate(custom(question_length))]
    pub question: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl SendMessageForm {
    pub fn question(&self) -> &str {
        self.question.trim()
    }

    /// Requested conversation, `None` when absent or blank.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SendMessageResponse {
    pub ok: bool,
    pub conversation_id: Uuid,
    pub user_html: String,
    pub bot_html: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(body: &str) -> SendMessageForm {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn question_with_text_is_valid() {
        let form = form(r#"{"question": "  qual a cpu do homelab-dev?  "}"#);
        assert!(form.validate().is_ok());
        assert_eq!(form.question(), "qual a cpu do homelab-dev?");
        assert_eq!(form.conversation_id(), None);
    }

    #[test]
    fn empty_or_blank_question_is_rejected() {
        assert!(form(r#"{"question": ""}"#).validate().is_err());
        assert!(form(r#"{"question": " \n\t "}"#).validate().is_err());
        assert!(form(r#"{}"#).validate().is_err());
    }

    #[test]
    fn oversized_question_is_rejected() {
        let body = serde_json::json!({ "question": "a".repeat(QUESTION_MAX_CHARS + 1) });
        let form: SendMessageForm = serde_json::from_value(body).unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn length_is_measured_on_trimmed_question() {
        let padded = format!("  {}  \n", "a".repeat(QUESTION_MAX_CHARS));
        let form = SendMessageForm {
            question: padded,
            conversation_id: None,
        };
        assert!(form.validate().is_ok());

        let multibyte = SendMessageForm {
            question: "é".repeat(QUESTION_MAX_CHARS),
            conversation_id: None,
        };
        assert!(multibyte.validate().is_ok());
    }

    #[test]
    fn blank_conversation_id_counts_as_missing() {
        let form = form(r#"{"question": "oi", "conversation_id": "  "}"#);
        assert_eq!(form.conversation_id(), None);

        let form = SendMessageForm {
            question: "oi".to_string(),
            conversation_id: Some("abc".to_string()),
        };
        assert_eq!(form.conversation_id(), Some("abc"));
    }
}
