/*!
 * # kisan-translate
 *
 * Glossary-aware, structure-preserving translation for a multilingual
 * farmer-support assistant.
 *
 * ## Features
 *
 * - Translate any JSON-like value while keeping its shape and non-string values
 * - Exclude subtrees by key (ids, URLs, sensitive fields)
 * - Annotate agricultural terms with their target-language equivalent,
 *   longest phrase first, with fuzzy fallback
 * - Never hand markdown heading or list markers to the translator
 * - Batch requests to pluggable backends:
 *   - Google Cloud Translation
 *   - Bhashini inference pipeline
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The translation pipeline:
 *   - `translation::glossary`: Glossary index and term search
 *   - `translation::annotator`: Glossary annotation
 *   - `translation::structure`: Tree traversal and reconstruction
 *   - `translation::markdown`: Markdown-safe chunking
 *   - `translation::pipeline`: Orchestration
 * - `language_utils`: ISO language code utilities
 * - `providers`: Translation backend implementations:
 *   - `providers::google`: Google Cloud Translation client
 *   - `providers::bhashini`: Bhashini pipeline client
 *   - `providers::mock`: In-process backend for tests
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{BackendConfig, BackendKind, Config, PipelineConfig};
pub use errors::{BackendError, ConfigError, StructureError, TranslationError, ValidationError};
pub use language_utils::{backend_language_code, get_language_name, normalize_to_part1, validate_language_code};
pub use providers::TranslationBackend;
pub use translation::{Glossary, TermPair, TranslationPipeline, TreeValue};
