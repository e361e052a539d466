use async_openai::config::OpenAIConfig;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_openai::Client;
use tracing::info;

use super::{GenerationError, ScriptGenerator};

/// Script generator backed by an OpenAI-compatible chat-completion endpoint.
pub struct OpenAiScriptGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    configured: bool,
}

impl OpenAiScriptGenerator {
    /// An empty `api_key` builds an unconfigured generator whose calls fail
    /// with `MissingCredentials`; the key is never sent to any client code.
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Self {
        let configured = !api_key.trim().is_empty();
        let mut config = OpenAIConfig::new().with_api_key(api_key.to_string());
        if !api_base.trim().is_empty() {
            config = config.with_api_base(api_base.to_string());
        }

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            configured,
        }
    }

    fn build_prompt(topic: &str, key_points: &str) -> String {
        format!(
            "You are an expert scriptwriter for critical-analysis podcasts aimed at students.\n\
             Your task is to write an engaging, well-structured script for one podcast episode.\n\
             \n\
             Podcast topic: \"{topic}\"\n\
             \n\
             Key points to cover:\n\
             {key_points}\n\
             \n\
             Script instructions:\n\
             1. Introduction: open with a hook that grabs the listener, then present the topic \
             and what will be discussed.\n\
             2. Development: work through the key points in a logical order. Use clear, \
             accessible language that still invites critical reflection; rhetorical questions \
             are welcome.\n\
             3. Transitions: keep the transitions between points smooth.\n\
             4. Conclusion: summarize the main points and close with a question that leaves the \
             listener thinking.\n\
             5. Format: structure the script with clear markers such as [INTRO], [TRANSITION \
             MUSIC], [DEVELOPMENT], [CONCLUSION] and [OUTRO], and include tone or pause cues \
             (e.g. [SHORT PAUSE]). Do not use markdown.\n\
             \n\
             Write the script now."
        )
    }
}

#[async_trait::async_trait]
impl ScriptGenerator for OpenAiScriptGenerator {
    async fn generate(&self, topic: &str, key_points: &str) -> Result<String, GenerationError> {
        if topic.trim().is_empty() || key_points.trim().is_empty() {
            return Err(GenerationError::InvalidInput);
        }
        if !self.configured {
            return Err(GenerationError::MissingCredentials);
        }

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(Self::build_prompt(topic, key_points))
            .build()
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(0.7)
            .top_p(0.9)
            .messages([message.into()])
            .build()
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let script = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if script.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        info!("script generated: {} chars", script.len());
        Ok(script)
    }
}
