/*!
 * Structure-preserving translation pipeline.
 *
 * Collects translatable strings from a `TreeValue`, optionally annotates
 * them with glossary terms, translates them in batches through a
 * `TranslationBackend` and writes the results back into a copy of the input.
 */

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info};

use crate::app_config::PipelineConfig;
use crate::errors::{StructureError, TranslationError, ValidationError};
use crate::language_utils::backend_language_code;
use crate::providers::{TranslationBackend, ensure_same_length};

use super::annotator::{TermAnnotator, has_alphanumeric};
use super::fuzzy::FuzzyMatcher;
use super::glossary::Glossary;
use super::markdown::{self, Chunk};
use super::structure::{self, Path, TreeValue};

/// Orchestrates annotation, batching and reconstruction
#[derive(Debug, Clone)]
pub struct TranslationPipeline {
    /// Backend used for every batch
    backend: Arc<dyn TranslationBackend>,

    /// Shared, read-only glossary
    glossary: Arc<Glossary>,

    /// Validated tuning options
    options: PipelineConfig,

    /// Fuzzy matcher built from `options.fuzzy_threshold`
    matcher: FuzzyMatcher,
}

/// A collected string split into markdown chunks
struct ChunkedText {
    chunks: Vec<Chunk>,
    /// Indices of chunks whose bodies are translated
    translatable: Vec<usize>,
}

impl TranslationPipeline {
    /// Create a new pipeline.
    ///
    /// Fails if the batch size is zero or the fuzzy threshold lies outside `[0, 1]`.
    pub fn new(
        backend: Arc<dyn TranslationBackend>,
        glossary: Arc<Glossary>,
        options: PipelineConfig,
    ) -> Result<Self, ValidationError> {
        if options.batch_size == 0 {
            return Err(ValidationError::ZeroBatchSize);
        }
        let matcher = FuzzyMatcher::new(options.fuzzy_threshold)?;

        Ok(Self {
            backend,
            glossary,
            options,
            matcher,
        })
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self, ValidationError> {
        if batch_size == 0 {
            return Err(ValidationError::ZeroBatchSize);
        }
        self.options.batch_size = batch_size;
        Ok(self)
    }

    /// Enable or disable markdown-safe chunking
    pub fn with_preserve_markdown(mut self, preserve_markdown: bool) -> Self {
        self.options.preserve_markdown = preserve_markdown;
        self
    }

    pub fn options(&self) -> &PipelineConfig {
        &self.options
    }

    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    /// Annotate free text with the pipeline's glossary
    pub fn annotate_with_glossary(&self, text: &str) -> String {
        self.annotator().annotate(text)
    }

    fn annotator(&self) -> TermAnnotator<'_> {
        TermAnnotator::with_matcher(&self.glossary, self.matcher.clone())
    }

    /// Translate every string leaf of `data`, keeping its shape.
    ///
    /// Leaves under any key in `exclude_keys` are left alone. The input is
    /// never modified; the result is a new value.
    pub async fn translate(
        &self,
        data: &TreeValue,
        source_lang: &str,
        target_lang: &str,
        exclude_keys: &HashSet<String>,
        use_glossary: bool,
    ) -> Result<TreeValue, TranslationError> {
        let source_lang = backend_language_code(source_lang)?;
        let target_lang = backend_language_code(target_lang)?;

        if let TreeValue::String(text) = data {
            if !has_alphanumeric(text) {
                return Ok(data.clone());
            }
            let translated = self
                .translate_strings(vec![text.clone()], &source_lang, &target_lang, use_glossary)
                .await?
                .pop()
                .ok_or(StructureError::CountMismatch {
                    paths: 1,
                    translations: 0,
                })?;
            return Ok(TreeValue::String(translated));
        }

        let collected = structure::collect(data, exclude_keys);
        if collected.is_empty() {
            debug!("Nothing to translate");
            return Ok(data.clone());
        }

        let (paths, texts): (Vec<Path>, Vec<String>) = collected.into_iter().unzip();
        let translated = self
            .translate_strings(texts, &source_lang, &target_lang, use_glossary)
            .await?;

        Ok(structure::reconstruct(data, &paths, &translated)?)
    }

    /// Translate using the configured languages, exclude keys and glossary setting
    pub async fn translate_with_defaults(&self, data: &TreeValue) -> Result<TreeValue, TranslationError> {
        self.translate(
            data,
            &self.options.source_language,
            &self.options.target_language,
            &self.options.exclude_keys,
            self.options.use_glossary,
        )
        .await
    }

    /// Translate a `serde_json::Value`
    pub async fn translate_json(
        &self,
        data: serde_json::Value,
        source_lang: &str,
        target_lang: &str,
        exclude_keys: &HashSet<String>,
        use_glossary: bool,
    ) -> Result<serde_json::Value, TranslationError> {
        let tree = TreeValue::from(data);
        let translated = self
            .translate(&tree, source_lang, target_lang, exclude_keys, use_glossary)
            .await?;
        Ok(translated.into())
    }

    /// Annotate, chunk and translate a list of strings, preserving order
    async fn translate_strings(
        &self,
        texts: Vec<String>,
        source_lang: &str,
        target_lang: &str,
        use_glossary: bool,
    ) -> Result<Vec<String>, TranslationError> {
        let texts: Vec<String> = if use_glossary {
            let annotator = self.annotator();
            texts.iter().map(|text| annotator.annotate(text)).collect()
        } else {
            texts
        };

        if !self.options.preserve_markdown {
            return self.translate_in_batches(&texts, source_lang, target_lang).await;
        }

        let mut chunked: Vec<ChunkedText> = texts.iter().map(|text| chunk_text(text)).collect();
        let bodies: Vec<String> = chunked
            .iter()
            .flat_map(|c| c.translatable.iter().map(|&i| c.chunks[i].body.clone()))
            .collect();

        let mut translated = self
            .translate_in_batches(&bodies, source_lang, target_lang)
            .await?
            .into_iter();

        let mut results = Vec::with_capacity(chunked.len());
        for text in chunked.iter_mut() {
            for &index in &text.translatable {
                // lengths checked per batch
                if let Some(body) = translated.next() {
                    text.chunks[index].body = body;
                }
            }
            results.push(markdown::repair_underscores(&markdown::join(&text.chunks)));
        }
        Ok(results)
    }

    /// Send strings to the backend `batch_size` at a time, one request after another
    async fn translate_in_batches(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, TranslationError> {
        let batch_count = texts.len().div_ceil(self.options.batch_size);
        info!(
            "Translating {} strings {} -> {} via {} in {} batches",
            texts.len(),
            source_lang,
            target_lang,
            self.backend.name(),
            batch_count
        );

        let mut translated = Vec::with_capacity(texts.len());
        for (index, batch) in texts.chunks(self.options.batch_size).enumerate() {
            debug!("Batch {}/{}: {} strings", index + 1, batch_count, batch.len());
            let results = self
                .backend
                .translate_batch(batch, source_lang, target_lang)
                .await?;
            ensure_same_length(batch.len(), results.len())?;
            translated.extend(results);
        }

        Ok(translated)
    }
}

fn chunk_text(text: &str) -> ChunkedText {
    let chunks = markdown::split(text);
    let translatable = chunks
        .iter()
        .enumerate()
        .filter(|(_, chunk)| !chunk.is_marker() && has_alphanumeric(&chunk.body))
        .map(|(index, _)| index)
        .collect();

    ChunkedText { chunks, translatable }
}
