//! Kazakh → Russian translation behind a small async trait.
//!
//! # Architecture
//!
//! - [`TranslateAsync`]: the black-box capability, text in, translated text out
//! - [`LlmBackend`]: binds the capability to an OpenAI-compatible chat endpoint
//!   through `awful_aj`
//! - [`Translator`]: decorator that every caller goes through; it short-circuits
//!   empty input and keeps only the first candidate, capped at a maximum length
//!
//! There is no retry and no cache. A failed call is reported as
//! [`HarvestError::Translation`] and abandons the article being processed.

use crate::errors::HarvestError;
use awful_aj::api::ask;
use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Source and target language codes handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: &'static str,
    pub target: &'static str,
}

/// The language pair of the bilim-all.kz corpus.
pub const KAZAKH_TO_RUSSIAN: LanguagePair = LanguagePair {
    source: "kaz_Cyrl",
    target: "rus_Cyrl",
};

/// Trait for an async text-to-text translation backend.
///
/// Implementors receive non-empty text and return the raw backend output.
pub trait TranslateAsync {
    async fn translate_text(&self, text: &str) -> Result<String, HarvestError>;
}

/// Wrapper that normalizes input and output around any [`TranslateAsync`].
pub struct Translator<T> {
    inner: T,
    /// Maximum length of a translation, in characters.
    max_chars: usize,
}

impl<T> Translator<T>
where
    T: TranslateAsync,
{
    /// Create a translator around `inner`.
    ///
    /// # Arguments
    ///
    /// * `inner` - The backend that performs the actual translation
    /// * `max_chars` - Upper bound on the length of a returned translation
    pub fn new(inner: T, max_chars: usize) -> Self {
        Self { inner, max_chars }
    }

    /// Translate `text`.
    ///
    /// Empty and whitespace-only input returns an empty string without
    /// invoking the backend.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Translation`] if the backend fails.
    pub async fn translate(&self, text: &str) -> Result<String, HarvestError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        let t0 = Instant::now();
        let raw = self.inner.translate_text(text).await?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            input_chars = text.chars().count(),
            "Translated text"
        );
        Ok(first_candidate(&raw, self.max_chars))
    }
}

#[cfg(test)]
impl<T> Translator<T> {
    pub(crate) fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Translator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("max_chars", &self.max_chars)
            .finish()
    }
}

/// Keep the first non-empty block of a backend reply, at most `max_chars` long.
///
/// Chat backends sometimes append alternatives or notes after a blank line;
/// only the first block is the translation.
fn first_candidate(raw: &str, max_chars: usize) -> String {
    let candidate = raw
        .trim()
        .split("\n\n")
        .map(str::trim)
        .find(|block| !block.is_empty())
        .unwrap_or("");
    candidate.chars().take(max_chars).collect()
}

/// [`TranslateAsync`] backed by `awful_aj::api::ask`.
///
/// The chat template's system prompt is expected to ask for a bare
/// translation; the language pair is stated in every request.
pub struct LlmBackend<'a> {
    /// LLM configuration (endpoint, model, API key).
    pub config: &'a AwfulJadeConfig,
    /// Chat template holding the translation system prompt.
    pub template: &'a ChatTemplate,
    pub languages: LanguagePair,
}

impl<'a> fmt::Debug for LlmBackend<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmBackend")
            .field("languages", &self.languages)
            .finish()
    }
}

impl<'a> TranslateAsync for LlmBackend<'a> {
    #[instrument(level = "debug", skip_all)]
    async fn translate_text(&self, text: &str) -> Result<String, HarvestError> {
        let request = translation_request(self.languages, text);
        let t0 = Instant::now();
        match ask(self.config, request, self.template, None, None).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                warn!(
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    error = %e,
                    "Translation API call failed"
                );
                Err(HarvestError::Translation(e.to_string()))
            }
        }
    }
}

fn translation_request(languages: LanguagePair, text: &str) -> String {
    format!(
        "Translate from {} to {}. Reply with the translation only.\n\n{}",
        languages.source, languages.target, text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingBackend {
        calls: Cell<usize>,
        reply: &'static str,
    }

    impl TranslateAsync for CountingBackend {
        async fn translate_text(&self, _text: &str) -> Result<String, HarvestError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.reply.to_string())
        }
    }

    struct FailingBackend;

    impl TranslateAsync for FailingBackend {
        async fn translate_text(&self, _text: &str) -> Result<String, HarvestError> {
            Err(HarvestError::Translation("model unavailable".to_string()))
        }
    }

    fn counting(reply: &'static str) -> CountingBackend {
        CountingBackend {
            calls: Cell::new(0),
            reply,
        }
    }

    #[tokio::test]
    async fn test_empty_input_skips_backend() {
        let translator = Translator::new(counting("никогда"), 1000);
        assert_eq!(translator.translate("").await.unwrap(), "");
        assert_eq!(translator.translate("  \n\t ").await.unwrap(), "");
        assert_eq!(translator.inner.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_translation_is_trimmed() {
        let translator = Translator::new(counting("  Казахский язык \n"), 1000);
        assert_eq!(translator.translate("Қазақ тілі").await.unwrap(), "Казахский язык");
        assert_eq!(translator.inner.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_only_first_candidate_is_kept() {
        let translator = Translator::new(counting("Семья\n\nАльтернатива: Род"), 1000);
        assert_eq!(translator.translate("Отбасы").await.unwrap(), "Семья");
    }

    #[tokio::test]
    async fn test_translation_is_capped_in_chars() {
        let translator = Translator::new(counting("Воспитание"), 4);
        assert_eq!(translator.translate("Тәрбие").await.unwrap(), "Восп");
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let translator = Translator::new(FailingBackend, 1000);
        let err = translator.translate("Сәлем").await.unwrap_err();
        assert!(matches!(err, HarvestError::Translation(_)));
    }

    #[test]
    fn test_request_names_language_pair() {
        let request = translation_request(KAZAKH_TO_RUSSIAN, "Сәлем");
        assert!(request.contains("kaz_Cyrl"));
        assert!(request.contains("rus_Cyrl"));
        assert!(request.ends_with("Сәлем"));
    }
}
