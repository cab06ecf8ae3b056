//! services/assistant/src/adapters/llm_resolver.rs
//!
//! This module contains the adapter for an OpenAI-compatible LLM.
//! It implements the `ResponseResolver` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"Você é a Sena, uma assistente digital gentil e paciente que ensina tecnologia.

Seu público:
- Pessoas com 60 anos ou mais.
- Pessoas com dificuldades visuais ou motoras.
- Pessoas que estão começando com tecnologia.

Como responder:
- Sempre em português do Brasil, com frases curtas e palavras simples.
- Explique em passos numerados quando houver uma tarefa a fazer.
- No máximo 5 passos; ofereça continuar se o assunto for longo.
- Seja calorosa e encorajadora, com poucos emojis.
- Nunca peça senhas, códigos ou dados bancários. Alerte sobre golpes quando fizer sentido.
- Se não souber, diga com sinceridade e sugira procurar alguém de confiança."#;

const ACTION_INPUT_TEMPLATE: &str = r#"A pessoa escolheu o tópico de ajuda: "{label}".

Dê uma introdução curta e o passo a passo mais útil sobre esse tópico."#;

const QUESTION_INPUT_TEMPLATE: &str = r#"PERGUNTA DA PESSOA:
{question}"#;

use async_openai::{
    config::OpenAIConfig, error::OpenAIError, types::responses::CreateResponseArgs, Client,
};
use async_trait::async_trait;
use sena_core::{
    find_quick_action,
    ports::{PortError, PortResult, ResponseResolver},
};
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ResponseResolver` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiResolver {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiResolver {
    /// Creates a new `OpenAiResolver`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds the user input for one request.
    fn build_input(action_id: &str, utterance: Option<&str>) -> PortResult<String> {
        if !action_id.is_empty() {
            let label = find_quick_action(action_id)
                .map(|action| action.label)
                .unwrap_or(action_id);
            return Ok(ACTION_INPUT_TEMPLATE.replace("{label}", label));
        }
        match utterance.map(str::trim).filter(|u| !u.is_empty()) {
            Some(question) => Ok(QUESTION_INPUT_TEMPLATE.replace("{question}", question)),
            None => Err(PortError::Unexpected("nothing to resolve".to_string())),
        }
    }
}

//=========================================================================================
// `ResponseResolver` Trait Implementation
//=========================================================================================

#[async_trait]
impl ResponseResolver for OpenAiResolver {
    async fn resolve(&self, action_id: &str, utterance: Option<&str>) -> PortResult<String> {
        let user_input = Self::build_input(action_id, utterance)?;

        let request = CreateResponseArgs::default()
            .model(&self.model)
            .instructions(SYSTEM_INSTRUCTIONS)
            .input(user_input)
            .max_output_tokens(600u32)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .responses()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unavailable(e.to_string()))?;

        let answer = response.output_text().unwrap_or_default();
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(PortError::Unexpected("LLM returned an empty answer".to_string()));
        }

        info!(model = %self.model, chars = answer.len(), "LLM answer generated.");
        Ok(answer.to_string())
    }
}
