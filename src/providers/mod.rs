//! Model capability: given a conversation context and a question, return an answer

pub mod ollama;

use async_trait::async_trait;

use crate::error::AppError;

pub use ollama::OllamaClient;

/// Input of one model invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInput {
    pub context: String,
    pub question: String,
}

/// Fill the prompt template with the context and question
pub fn render_prompt(input: &ModelInput) -> String {
    format!(
        "\nAnswer the question below.\n\nHere is the conversation history: {}\n\nQuestion: {}\n\nAnswer:\n",
        input.context, input.question
    )
}

/// Opaque answer-producing capability
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn invoke(&self, model: &str, input: &ModelInput) -> Result<String, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let prompt = render_prompt(&ModelInput {
            context: "\nUser: hi\nAI: hello".to_string(),
            question: "how are you?".to_string(),
        });

        assert!(prompt.starts_with("\nAnswer the question below."));
        assert!(prompt.contains("Here is the conversation history: \nUser: hi\nAI: hello\n"));
        assert!(prompt.contains("Question: how are you?\n\nAnswer:"));
    }

    #[test]
    fn test_render_prompt_does_not_expand_placeholders_in_context() {
        let prompt = render_prompt(&ModelInput {
            context: "literal {question}".to_string(),
            question: "q".to_string(),
        });
        assert!(prompt.contains("history: literal {question}"));
        assert!(prompt.contains("Question: q"));
    }
}
