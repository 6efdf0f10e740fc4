/*!
 * Glossary-aware, structure-preserving translation.
 *
 * This module contains the core functionality for translating arbitrary
 * JSON-like values through a batch translation backend. It is split into
 * several submodules:
 *
 * - `glossary`: Term pairs, the compiled glossary index and term search
 * - `fuzzy`: Similarity scoring for fuzzy term lookup
 * - `annotator`: Bracketed glossary annotation of free text
 * - `structure`: Tree values, paths, collection and reconstruction
 * - `markdown`: Marker/prose chunking so markers are never translated
 * - `pipeline`: Orchestration of the steps above
 */

// Re-export main types for easier usage
pub use self::annotator::{TermAnnotator, annotate};
pub use self::glossary::{Glossary, TermField, TermFields, TermMatch, TermPair, format_search_results};
pub use self::markdown::Chunk;
pub use self::pipeline::TranslationPipeline;
pub use self::structure::{Path, PathToken, TreeValue};

// Submodules
pub mod annotator;
pub mod fuzzy;
pub mod glossary;
pub mod markdown;
pub mod pipeline;
pub mod structure;
