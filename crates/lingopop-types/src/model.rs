use serde::{Deserialize, Serialize};

/// Placeholder used when the lookup reply carries no definition
pub const DEFINITION_PLACEHOLDER: &str = "Definition unavailable";

/// Placeholder used when the lookup reply carries no explanation
pub const EXPLANATION_PLACEHOLDER: &str = "No explanation available.";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    /// ISO 639-1 code ("en", "es", ...)
    pub code: String,
    pub name: String,
    pub flag: String,
}

impl Language {
    pub fn label(&self) -> String {
        format!("{} {}", self.flag, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Example {
    pub original: String,
    pub translation: String,
}

/// Saved (or about to be saved) vocabulary lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub id: String,
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub source_lang: Language,
    pub target_lang: Language,
    pub timestamp: u64,
}

impl DictionaryEntry {
    /// Merge a lookup reply and an optional illustration into a new entry.
    ///
    /// `created_at_ms` doubles as the entry id.
    pub fn from_lookup(
        term: impl Into<String>,
        data: LookupData,
        image: Option<&crate::MediaRef>,
        source_lang: Language,
        target_lang: Language,
        created_at_ms: u64,
    ) -> Self {
        let definition = data
            .definition
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFINITION_PLACEHOLDER.to_string());
        let explanation = data
            .explanation
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| EXPLANATION_PLACEHOLDER.to_string());

        Self {
            id: created_at_ms.to_string(),
            term: term.into(),
            definition,
            examples: data.examples,
            explanation,
            image_url: image.map(|m| m.to_data_uri()),
            source_lang,
            target_lang,
            timestamp: created_at_ms,
        }
    }

    /// An entry needs a term and a definition to be shown
    pub fn is_displayable(&self) -> bool {
        !self.term.trim().is_empty() && !self.definition.trim().is_empty()
    }
}

/// Structured reply of a term lookup. Every field may be missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupData {
    pub definition: Option<String>,
    pub examples: Vec<Example>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Delivery state of a user turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    #[default]
    Pending,
    Answered,
    Unanswered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    #[serde(skip)]
    pub delivery: Delivery,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            delivery: Delivery::Pending,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            delivery: Delivery::Answered,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.role == Role::User && self.delivery == Delivery::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryResult {
    pub story: String,
    pub translation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> Language {
        Language {
            code: "en".into(),
            name: "English".into(),
            flag: "🇺🇸".into(),
        }
    }

    fn spanish() -> Language {
        Language {
            code: "es".into(),
            name: "Spanish".into(),
            flag: "🇪🇸".into(),
        }
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let entry = DictionaryEntry::from_lookup(
            "hola",
            LookupData::default(),
            None,
            english(),
            spanish(),
            1_700_000_000_000,
        );

        assert_eq!(entry.id, "1700000000000");
        assert_eq!(entry.definition, DEFINITION_PLACEHOLDER);
        assert_eq!(entry.explanation, EXPLANATION_PLACEHOLDER);
        assert!(entry.examples.is_empty());
        assert!(entry.image_url.is_none());
        assert!(entry.is_displayable());
    }

    #[test]
    fn entry_uses_camel_case_and_skips_missing_image() {
        let entry = DictionaryEntry::from_lookup(
            "hola",
            LookupData {
                definition: Some("hello".into()),
                ..Default::default()
            },
            None,
            english(),
            spanish(),
            42,
        );

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("sourceLang").is_some());
        assert!(json.get("targetLang").is_some());
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn lookup_data_tolerates_partial_reply() {
        let data: LookupData = serde_json::from_str(
            r#"{"definition":"lasting a very short time","examples":[{"original":"Es un momento efímero."}]}"#,
        )
        .unwrap();

        assert_eq!(data.examples.len(), 1);
        assert_eq!(data.examples[0].translation, "");
        assert!(data.explanation.is_none());
    }
}
