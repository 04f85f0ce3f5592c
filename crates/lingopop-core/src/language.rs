use lingopop_types::Language;

/// Supported languages: (code, name, flag)
const LANGUAGES: &[(&str, &str, &str)] = &[
    ("en", "English", "🇺🇸"),
    ("zh", "Chinese (Mandarin)", "🇨🇳"),
    ("es", "Spanish", "🇪🇸"),
    ("fr", "French", "🇫🇷"),
    ("ja", "Japanese", "🇯🇵"),
    ("ko", "Korean", "🇰🇷"),
    ("de", "German", "🇩🇪"),
    ("it", "Italian", "🇮🇹"),
    ("ru", "Russian", "🇷🇺"),
    ("pt", "Portuguese", "🇧🇷"),
];

fn to_language(&(code, name, flag): &(&str, &str, &str)) -> Language {
    Language {
        code: code.to_string(),
        name: name.to_string(),
        flag: flag.to_string(),
    }
}

/// All supported languages in display order
pub fn languages() -> Vec<Language> {
    LANGUAGES.iter().map(to_language).collect()
}

/// Look up a language by its code, case-insensitive
pub fn find_language(code: &str) -> Option<Language> {
    let code = code.trim();
    LANGUAGES
        .iter()
        .find(|(c, _, _)| c.eq_ignore_ascii_case(code))
        .map(to_language)
}

pub fn supported_codes() -> Vec<&'static str> {
    LANGUAGES.iter().map(|(code, _, _)| *code).collect()
}

/// Registry entry for `code`, or the entry at `fallback_index`
pub fn language_or(code: &str, fallback_index: usize) -> Language {
    find_language(code).unwrap_or_else(|| to_language(&LANGUAGES[fallback_index]))
}
