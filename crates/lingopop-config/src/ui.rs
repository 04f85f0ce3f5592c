use serde::{Deserialize, Serialize};

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "zh".to_string()
}

fn default_story_min_words() -> usize {
    3
}

fn default_story_max_words() -> usize {
    5
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// Mother tongue preselected on the setup screen
    #[serde(default = "default_source_lang")]
    pub default_source_lang: String,
    #[serde(default = "default_target_lang")]
    pub default_target_lang: String,
    /// Saved words required before a story can be generated, never below 3
    #[serde(default = "default_story_min_words")]
    pub story_min_words: usize,
    /// Most recent words sent to the storyteller
    #[serde(default = "default_story_max_words")]
    pub story_max_words: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_source_lang: default_source_lang(),
            default_target_lang: default_target_lang(),
            story_min_words: default_story_min_words(),
            story_max_words: default_story_max_words(),
        }
    }
}
