use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    /// Access credential for the generative backend
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_tts_model")]
    pub tts_model: String,
    /// Prebuilt TTS voice
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl GatewayConfig {
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            tts_model: default_tts_model(),
            voice: default_voice(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

// Keep the credential out of logs
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &if self.has_credential() { "<set>" } else { "<unset>" })
            .field("api_url", &self.api_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("tts_model", &self.tts_model)
            .field("voice", &self.voice)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}
