use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use lingopop_config::gateway::GatewayConfig;
use lingopop_types::{ChatMessage, Language, LookupData, MediaRef, Role, StoryResult};
use serde::de::DeserializeOwned;

use crate::media::playable_audio;
use crate::prompts::{
    SYSTEM_INSTRUCTION_DICTIONARY, SYSTEM_INSTRUCTION_STORY, chat_context, image_prompt,
    lookup_prompt, story_prompt,
};
use crate::wire::{
    Content, GenerateRequest, GenerateResponse, GenerationConfig, lookup_schema, story_schema,
    unfence,
};
use crate::{CHAT_FALLBACK, CHAT_NO_CREDENTIAL, Gateway, GatewayError, ProviderMetadata};

/// Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl GeminiGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;

        Ok(Self { client, config })
    }

    fn has_credential(&self) -> bool {
        self.config.has_credential()
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, GatewayError> {
        if !self.has_credential() {
            return Err(GatewayError::MissingCredential);
        }

        tracing::debug!("generateContent on {}", model);

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", self.config.api_key.trim())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == 429 {
            return Err(GatewayError::RateLimitExceeded);
        }
        if status == 401 || status == 403 {
            return Err(GatewayError::AuthenticationError);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api(format!("HTTP {}: {}", status, body.trim())));
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)?;

        if let Some(reason) = parsed.block_reason() {
            return Err(GatewayError::Blocked(reason.to_string()));
        }

        Ok(parsed)
    }

    /// Generate and decode a JSON reply
    async fn generate_json<T: DeserializeOwned>(
        &self,
        request: &GenerateRequest,
    ) -> Result<T, GatewayError> {
        let response = self.generate(&self.config.text_model, request).await?;
        let text = response.text().ok_or_else(|| {
            tracing::warn!(
                "No text in response (finish reason: {:?})",
                response.finish_reason()
            );
            GatewayError::EmptyResponse
        })?;

        Ok(serde_json::from_str(unfence(&text))?)
    }

    /// Generate and decode the first inline binary part
    async fn generate_media(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<Option<MediaRef>, GatewayError> {
        let response = self.generate(model, request).await?;
        let Some(inline) = response.inline_data() else {
            return Ok(None);
        };

        let data = general_purpose::STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| GatewayError::Api(format!("Invalid media payload: {e}")))?;

        Ok(Some(MediaRef::new(inline.mime_type.clone(), data)))
    }
}

#[async_trait]
impl Gateway for GeminiGateway {
    async fn lookup_term(
        &self,
        term: &str,
        source: &Language,
        target: &Language,
    ) -> Result<LookupData, GatewayError> {
        let request = GenerateRequest::prompt(lookup_prompt(term, source, target))
            .with_system(SYSTEM_INSTRUCTION_DICTIONARY)
            .with_config(GenerationConfig::json(lookup_schema()));

        self.generate_json(&request).await.inspect_err(|e| {
            tracing::error!("Lookup error: {}", e);
        })
    }

    async fn generate_visualization(
        &self,
        term: &str,
        target_lang_name: &str,
    ) -> Option<MediaRef> {
        if !self.has_credential() {
            return None;
        }

        let request = GenerateRequest::prompt(image_prompt(term, target_lang_name));
        match self.generate_media(&self.config.image_model, &request).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Image generation failed: {}", e);
                None
            }
        }
    }

    async fn generate_audio(&self, text: &str) -> Option<MediaRef> {
        if !self.has_credential() {
            return None;
        }

        let request = GenerateRequest::prompt(text)
            .with_config(GenerationConfig::speech(&self.config.voice));
        match self.generate_media(&self.config.tts_model, &request).await {
            Ok(audio) => audio.map(playable_audio),
            Err(e) => {
                tracing::warn!("TTS failed: {}", e);
                None
            }
        }
    }

    async fn generate_story(
        &self,
        words: &[String],
        source_lang_name: &str,
        target_lang_name: &str,
    ) -> Result<StoryResult, GatewayError> {
        if words.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "a story needs at least one word".to_string(),
            ));
        }

        let request = GenerateRequest::prompt(story_prompt(words, source_lang_name, target_lang_name))
            .with_system(SYSTEM_INSTRUCTION_STORY)
            .with_config(GenerationConfig::json(story_schema()));

        self.generate_json(&request).await.inspect_err(|e| {
            tracing::error!("Story generation error: {}", e);
        })
    }

    async fn chat_turn(
        &self,
        history: &[ChatMessage],
        message: &str,
        context_term: &str,
    ) -> String {
        if !self.has_credential() {
            return CHAT_NO_CREDENTIAL.to_string();
        }

        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Model => "model",
                };
                Content::with_role(role, m.text.clone())
            })
            .collect();
        contents.push(Content::user(format!(
            "{}\n\n{}",
            chat_context(context_term),
            message
        )));

        let request = GenerateRequest {
            contents,
            system_instruction: None,
            generation_config: None,
        };

        match self.generate(&self.config.text_model, &request).await {
            Ok(response) => response.text().unwrap_or_default(),
            Err(e) => {
                tracing::error!("Chat error: {}", e);
                CHAT_FALLBACK.to_string()
            }
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Gemini".to_string(),
            requires_api_key: true,
            has_credential: self.has_credential(),
        }
    }
}
