/*!
 * Mock backend implementation for testing.
 *
 * This module provides a mock backend that simulates different behaviors:
 * - `MockBackend::echo()` - Returns the input unchanged
 * - `MockBackend::uppercase()` - Uppercases every string
 * - `MockBackend::reversed()` - Reverses the characters of every string
 * - `MockBackend::tagged()` - Prefixes every string with the target language
 * - `MockBackend::failing()` - Always fails with an API error
 * - `MockBackend::dropping()` - Returns one string too few
 *
 * Every call is recorded so tests can assert on batching.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::errors::BackendError;
use crate::providers::TranslationBackend;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns the input unchanged
    Echo,
    /// Uppercases each string
    Uppercase,
    /// Reverses the characters of each string
    Reverse,
    /// Prefixes each string with the target language, e.g. `[hi] text`
    Tagged,
    /// Always fails with an API error
    Failing,
    /// Drops the last string of every batch
    DropLast,
}

/// A recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub texts: Vec<String>,
    pub source_lang: String,
    pub target_lang: String,
}

/// Mock backend for testing pipeline behavior
#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Calls made so far, shared between clones
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    pub fn reversed() -> Self {
        Self::new(MockBehavior::Reverse)
    }

    pub fn tagged() -> Self {
        Self::new(MockBehavior::Tagged)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn dropping() -> Self {
        Self::new(MockBehavior::DropLast)
    }

    /// All calls made so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, BackendError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        self.calls.lock().push(MockCall {
            texts: texts.to_vec(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        });

        match self.behavior {
            MockBehavior::Echo => Ok(texts.to_vec()),
            MockBehavior::Uppercase => Ok(texts.iter().map(|t| t.to_uppercase()).collect()),
            MockBehavior::Reverse => Ok(texts.iter().map(|t| t.chars().rev().collect()).collect()),
            MockBehavior::Tagged => Ok(texts.iter().map(|t| format!("[{}] {}", target_lang, t)).collect()),
            MockBehavior::Failing => Err(BackendError::ApiError {
                status_code: 500,
                message: "Simulated backend failure".to_string(),
            }),
            MockBehavior::DropLast => Ok(texts[..texts.len() - 1].to_vec()),
        }
    }
}
