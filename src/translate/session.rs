//! Debounced translation of text that keeps changing.
//!
//! Every submit takes the next sequence number. A submission only produces a
//! result while its number is still the latest, both after the debounce
//! window and after the response arrives, so a slow response to an older
//! text can never replace the translation of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::{Language, TranslationBackend, Translator};

pub const MIN_DEBOUNCE: Duration = Duration::from_millis(500);
pub const MAX_DEBOUNCE: Duration = Duration::from_millis(1000);

pub struct TranslationSession<B> {
    translator: Arc<Translator<B>>,
    latest: Arc<AtomicU64>,
    debounce: Duration,
}

impl<B> Clone for TranslationSession<B> {
    fn clone(&self) -> Self {
        Self {
            translator: Arc::clone(&self.translator),
            latest: Arc::clone(&self.latest),
            debounce: self.debounce,
        }
    }
}

impl<B: TranslationBackend> TranslationSession<B> {
    /// `debounce` is clamped to 500..=1000 ms.
    pub fn new(translator: Translator<B>, debounce: Duration) -> Self {
        Self {
            translator: Arc::new(translator),
            latest: Arc::new(AtomicU64::new(0)),
            debounce: debounce.clamp(MIN_DEBOUNCE, MAX_DEBOUNCE),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn translator(&self) -> &Translator<B> {
        &self.translator
    }

    /// Sequence number of the most recent submit.
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.latest() == ticket
    }

    /// Translate `text` once it has stayed unchanged for the debounce window.
    ///
    /// Returns `None` when a newer submit superseded this one, or when `text`
    /// is blank (a blank submit still supersedes older ones).
    pub async fn submit(&self, text: String, from: Language, to: Language) -> Option<String> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if text.trim().is_empty() {
            return None;
        }

        tokio::time::sleep(self.debounce).await;
        if !self.is_current(ticket) {
            debug!(ticket, "superseded before sending");
            return None;
        }

        let translated = self.translator.translate(&text, from, to).await;
        if !self.is_current(ticket) {
            debug!(ticket, latest = self.latest(), "discarding stale translation");
            return None;
        }
        Some(translated)
    }
}
