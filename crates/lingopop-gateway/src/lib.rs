mod gemini;
mod media;
mod prompts;
mod wire;

pub use gemini::GeminiGateway;
pub use media::{pcm_sample_rate, wrap_pcm_as_wav};

use lingopop_types::{ChatMessage, Language, LookupData, MediaRef, StoryResult};

/// Reply when a chat turn fails for any reason other than the credential
pub const CHAT_FALLBACK: &str = "Sorry, I got a bit confused. Try asking again!";

/// Reply when chatting without a credential
pub const CHAT_NO_CREDENTIAL: &str =
    "Sorry, I can't chat without a valid API Key. Please provide one first.";

/// Generative backend interface
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// Structured explanation of `term` for a learner of `target`
    async fn lookup_term(
        &self,
        term: &str,
        source: &Language,
        target: &Language,
    ) -> Result<LookupData, GatewayError>;

    /// Decorative illustration, `None` when unavailable
    async fn generate_visualization(&self, term: &str, target_lang_name: &str)
    -> Option<MediaRef>;

    /// Spoken rendition of `text`, `None` when unavailable
    async fn generate_audio(&self, text: &str) -> Option<MediaRef>;

    /// Short story using all `words`, with a translation
    async fn generate_story(
        &self,
        words: &[String],
        source_lang_name: &str,
        target_lang_name: &str,
    ) -> Result<StoryResult, GatewayError>;

    /// Next reply in a conversation about `context_term`. Never fails, a
    /// degraded reply is returned instead.
    async fn chat_turn(
        &self,
        history: &[ChatMessage],
        message: &str,
        context_term: &str,
    ) -> String;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub has_credential: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("API key is required. Set one with /key <value> and try again.")]
    MissingCredential,

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Request blocked: {0}")]
    Blocked(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("The API key was rejected. Set a valid one with /key <value>.")]
    AuthenticationError,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Fixable by the user through configuration, not by retrying
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingCredential | GatewayError::AuthenticationError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_are_configuration() {
        assert!(GatewayError::MissingCredential.is_configuration());
        assert!(GatewayError::AuthenticationError.is_configuration());
        assert!(!GatewayError::RateLimitExceeded.is_configuration());
        assert!(!GatewayError::EmptyResponse.is_configuration());
    }
}
