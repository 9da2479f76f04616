use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Supported target languages (ISO 639-1). Unrecognized codes fall back to
/// English without raising; callers never need to validate codes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    It,
    Pt,
    Nl,
    Ru,
    Ja,
    Ko,
    Zh,
    Ar,
    Hi,
}

impl Language {
    /// Map an ISO 639-1 code to a supported language. Case-insensitive;
    /// anything outside the supported set maps to the default (English).
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Language::En,
            "es" => Language::Es,
            "fr" => Language::Fr,
            "de" => Language::De,
            "it" => Language::It,
            "pt" => Language::Pt,
            "nl" => Language::Nl,
            "ru" => Language::Ru,
            "ja" => Language::Ja,
            "ko" => Language::Ko,
            "zh" => Language::Zh,
            "ar" => Language::Ar,
            "hi" => Language::Hi,
            other => {
                if !other.is_empty() {
                    warn!("unrecognized language code '{}', falling back to en", other);
                }
                Language::En
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
            Language::Pt => "pt",
            Language::Nl => "nl",
            Language::Ru => "ru",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Zh => "zh",
            Language::Ar => "ar",
            Language::Hi => "hi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
