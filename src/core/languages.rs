//! Supported target languages for the translate action.

/// (ISO 639-1 code, English name)
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("it", "Italian"),
    ("ar", "Arabic"),
    ("de", "German"),
    ("pt", "Portuguese"),
    ("ja", "Japanese"),
    ("zh", "Chinese"),
    ("ru", "Russian"),
    ("ko", "Korean"),
    ("hi", "Hindi"),
    ("nl", "Dutch"),
    ("tr", "Turkish"),
    ("pl", "Polish"),
    ("sv", "Swedish"),
    ("da", "Danish"),
    ("no", "Norwegian"),
    ("fi", "Finnish"),
];

/// RTL (Right-to-Left) languages
const RTL_LANGUAGES: &[&str] = &["ar", "he", "fa", "ur"];

/// Resolve a language name or code to its code (case-insensitive)
pub fn code_for(name_or_code: &str) -> Option<&'static str> {
    let needle = name_or_code.trim();
    LANGUAGES
        .iter()
        .find(|(code, name)| code.eq_ignore_ascii_case(needle) || name.eq_ignore_ascii_case(needle))
        .map(|(code, _)| *code)
}

/// English name for a language code
pub fn name_for(code: &str) -> Option<&'static str> {
    let needle = code.trim();
    LANGUAGES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(needle))
        .map(|(_, name)| *name)
}

pub fn is_rtl(code: &str) -> bool {
    RTL_LANGUAGES.iter().any(|c| c.eq_ignore_ascii_case(code.trim()))
}
