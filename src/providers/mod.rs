/*!
 * Translation backends.
 *
 * This module contains client implementations for batch machine translation:
 * - Google: Cloud Translation (v2 REST) integration
 * - Bhashini: government inference pipeline integration
 * - Mock: in-process backend for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::BackendError;

/// Common trait for all translation backends
///
/// The pipeline depends only on this interface, so backends can be used
/// interchangeably.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Short backend identifier used in logs
    fn name(&self) -> &str;

    /// Translate a batch of strings
    ///
    /// # Arguments
    /// * `texts` - Strings to translate, in order
    /// * `source_lang` - Source language code
    /// * `target_lang` - Target language code
    ///
    /// # Returns
    /// * `Result<Vec<String>, BackendError>` - One translation per input, same order.
    ///   An empty input yields an empty output without a request.
    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, BackendError>;
}

/// Fail unless the backend returned exactly one string per input
pub(crate) fn ensure_same_length(expected: usize, actual: usize) -> Result<(), BackendError> {
    if expected == actual {
        Ok(())
    } else {
        Err(BackendError::LengthMismatch { expected, actual })
    }
}

pub mod bhashini;
pub mod google;
pub mod mock;
