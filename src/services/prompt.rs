//! Prompt assembly for the homelab assistant.
//!
//! The preamble is built once per process from the dataset. Each request adds
//! the trimmed conversation history and the new question.

use crate::models::{HomelabDataset, Message};

pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Messages at the tail of the history that belong to the exchange in flight.
const IN_FLIGHT_MESSAGES: usize = 2;

/// Smallest window that can still show an earlier message.
pub const MIN_HISTORY_LIMIT: usize = IN_FLIGHT_MESSAGES + 1;

const HISTORY_HEADER: &str = "HISTÓRICO DA CONVERSA:";
const QUESTION_PREFIX: &str = "PERGUNTA DO USUÁRIO:";

#[derive(Debug, Clone)]
pub struct PromptAssembler {
    preamble: String,
    history_limit: usize,
}

impl PromptAssembler {
    pub fn new(dataset: &HomelabDataset, history_limit: usize) -> Self {
        Self {
            preamble: build_preamble(dataset),
            history_limit,
        }
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// History block for the prompt, or an empty string when the conversation
    /// holds nothing but the exchange in flight.
    pub fn render_history(&self, messages: &[Message]) -> String {
        if messages.len() <= IN_FLIGHT_MESSAGES {
            return String::new();
        }

        let start = messages.len().saturating_sub(self.history_limit);
        let recent = &messages[start..];
        let earlier = &recent[..recent.len().saturating_sub(IN_FLIGHT_MESSAGES)];

        let mut history = format!("{}\n", HISTORY_HEADER);
        for message in earlier {
            history.push_str(message.role.label());
            history.push_str(": ");
            history.push_str(&message.text);
            history.push('\n');
        }
        history
    }

    pub fn build(&self, history: &[Message], question: &str) -> String {
        let history = self.render_history(history);
        let mut prompt = String::with_capacity(self.preamble.len() + history.len() + question.len() + 64);
        prompt.push_str(&self.preamble);
        prompt.push_str("\n\n");
        if !history.is_empty() {
            prompt.push_str(&history);
            prompt.push('\n');
        }
        prompt.push_str(QUESTION_PREFIX);
        prompt.push(' ');
        prompt.push_str(question);
        prompt
    }
}

fn build_preamble(dataset: &HomelabDataset) -> String {
    let available = if dataset.is_empty() {
        "nenhum".to_string()
    } else {
        dataset.names().join(", ")
    };

    format!(
        r#"Você é o Poldo, um assistente especializado em monitoramento de homelabs.

DADOS DOS HOMELABS DISPONÍVEIS:
{data}

INSTRUÇÕES:
1. Responda APENAS com base nos dados fornecidos acima
2. Se o usuário perguntar sobre um homelab que não existe, informe os homelabs disponíveis
3. Seja direto e objetivo nas respostas
4. Use emojis quando apropriado para tornar as respostas mais amigáveis
5. Se perguntarem sobre status completo, liste todas as métricas do homelab
6. Se perguntarem sobre uma métrica específica, foque apenas nela
7. Sempre responda em português brasileiro

EXEMPLOS DE RESPOSTAS:
- Para "qual a cpu do homelab-dev?": "🔍 homelab-dev - CPU: 45%"
- Para "status do homelab-test": Liste todas as métricas do homelab-test
- Para homelab inexistente: "❌ Homelab não encontrado. Homelabs disponíveis: {available}""#,
        data = dataset.to_pretty_json(),
        available = available,
    )
}
