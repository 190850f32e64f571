//! Text translation through a remote service.
//!
//! [`Translator`] never fails: blank input yields an empty string without a
//! request, and any backend failure yields [`TRANSLATION_UNAVAILABLE`], so the
//! caller always has something to display.

mod google;
mod session;

pub use google::{parse_response, GoogleTranslate, DEFAULT_ENDPOINT};
pub use session::TranslationSession;

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Placeholder shown instead of a translation when the request failed.
pub const TRANSLATION_UNAVAILABLE: &str = "translation unavailable without network connection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Arabic,
    English,
    French,
    Spanish,
    German,
    /// Let the service detect the source language
    Auto,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::Arabic,
        Language::English,
        Language::French,
        Language::Spanish,
        Language::German,
        Language::Auto,
    ];

    /// Two-letter tag sent to the service
    pub fn code(self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::German => "de",
            Language::Auto => "auto",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Arabic => "Arabic",
            Language::English => "English",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::German => "German",
            Language::Auto => "auto",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.code() == wanted || l.name().to_lowercase() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

/// True when `text` contains any character of the Arabic script blocks.
pub fn is_arabic_script(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}')
    })
}

/// Pick a translation direction from the text itself: Arabic text goes to
/// English, anything else goes to Arabic.
pub fn detect_pair(text: &str) -> (Language, Language) {
    if is_arabic_script(text) {
        (Language::Arabic, Language::English)
    } else {
        (Language::English, Language::Arabic)
    }
}

/// A remote translation service.
pub trait TranslationBackend: Send + Sync {
    fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// A finished translation, as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub source: Language,
    pub target: Language,
    pub original: String,
    pub text: String,
}

pub struct Translator<B> {
    backend: B,
}

impl<B: TranslationBackend> Translator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Translate `text`, returning the placeholder on failure.
    pub async fn translate(&self, text: &str, from: Language, to: Language) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        match self.backend.translate(text, from, to).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(error = %e, from = from.code(), to = to.code(), "translation failed");
                TRANSLATION_UNAVAILABLE.to_string()
            }
        }
    }
}
