use lingopop_types::Language;

pub(crate) const SYSTEM_INSTRUCTION_DICTIONARY: &str = r#"
You are "LingoPop", a fun, energetic, and savvy language learning buddy.
Your goal is to explain words or phrases in a way that sticks, avoiding dry textbook definitions.
When a user provides a term:
1. Give a natural explanation in their mother tongue.
2. Provide 2 clear example sentences in the target language with mother tongue translations.
3. Write a "Fun Explanation" that feels like a friend chatting. Include cultural nuances, slang usage, specific vibe/tone (formal/casual), or synonyms/false friends. Keep this part punchy and interesting.
"#;

pub(crate) const SYSTEM_INSTRUCTION_STORY: &str = r#"
You are a creative storyteller.
Create a short, coherent, and amusing story using ALL the provided vocabulary words.
The story should be in the Target Language.
Also provide a full translation in the Source Language.
Keep it under 200 words.
"#;

pub(crate) fn lookup_prompt(term: &str, source: &Language, target: &Language) -> String {
    format!(
        "Analyze the term \"{term}\".\n\
         Target Language: {target}.\n\
         User's Mother Tongue: {source}.\n\
         \n\
         Return a JSON object with:\n\
         - definition: Natural explanation in {source}.\n\
         - examples: Array of 2 objects {{original, translation}}.\n\
         - explanation: A fun, casual usage guide in {source}.\n",
        target = target.name,
        source = source.name,
    )
}

pub(crate) fn image_prompt(term: &str, target_lang_name: &str) -> String {
    format!(
        "A simple, bright, clean vector-style illustration representing the concept of \"{term}\" \
         in the context of the language {target_lang_name}. No text in the image. Vibrant colors."
    )
}

pub(crate) fn story_prompt(words: &[String], source_lang_name: &str, target_lang_name: &str) -> String {
    format!(
        "Create a story using these words: {}.\n\
         Target Language: {target_lang_name}.\n\
         Translation Language: {source_lang_name}.\n",
        words.join(", ")
    )
}

/// Reminder prepended to every chat message
pub(crate) fn chat_context(term: &str) -> String {
    format!("Current context: discussing the word \"{term}\". Keep answers short and helpful.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(code: &str, name: &str) -> Language {
        Language {
            code: code.into(),
            name: name.into(),
            flag: String::new(),
        }
    }

    #[test]
    fn lookup_prompt_names_both_languages() {
        let prompt = lookup_prompt("ephemeral", &lang("en", "English"), &lang("es", "Spanish"));

        assert!(prompt.contains("\"ephemeral\""));
        assert!(prompt.contains("Target Language: Spanish."));
        assert!(prompt.contains("User's Mother Tongue: English."));
        assert!(prompt.contains("{original, translation}"));
    }

    #[test]
    fn story_prompt_lists_words() {
        let words = vec!["gato".to_string(), "luna".to_string()];
        let prompt = story_prompt(&words, "English", "Spanish");
        assert!(prompt.starts_with("Create a story using these words: gato, luna."));
        assert!(prompt.contains("Translation Language: English."));
    }

    #[test]
    fn chat_context_names_term() {
        assert_eq!(
            chat_context("hola"),
            "Current context: discussing the word \"hola\". Keep answers short and helpful."
        );
    }
}
