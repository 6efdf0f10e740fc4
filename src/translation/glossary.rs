/*!
 * Glossary index for term annotation.
 *
 * This module turns a static list of term pairs into the lookup structures
 * used by annotation:
 * - an exact map from lowercased source term to term pair
 * - one case-insensitive alternation over every source term, longest first
 * - the candidate list used for fuzzy fallback and term search
 *
 * The glossary is built once at startup and is read-only afterwards.
 */

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ConfigError, ValidationError};

use super::fuzzy::{self, FuzzyMatcher};

/// Size limit for the fallback pattern, which may hold thousands of terms
const FALLBACK_SIZE_LIMIT: usize = 1 << 28;

/// A source term with its target-language equivalent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermPair {
    /// Term in the source language
    pub source: String,

    /// Equivalent in the target language
    pub target: String,

    /// Target term written in the source script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
}

impl TermPair {
    /// Create a new term pair without transliteration
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            transliteration: None,
        }
    }

    /// Set the transliteration
    pub fn with_transliteration(mut self, transliteration: impl Into<String>) -> Self {
        self.transliteration = Some(transliteration.into());
        self
    }

    /// Collapse internal whitespace and reject empty terms
    fn normalized(self) -> Option<Self> {
        let source = normalize_whitespace(&self.source);
        let target = normalize_whitespace(&self.target);
        if source.is_empty() || target.is_empty() {
            return None;
        }

        let transliteration = self
            .transliteration
            .map(|t| normalize_whitespace(&t))
            .filter(|t| !t.is_empty());

        Some(Self {
            source,
            target,
            transliteration,
        })
    }
}

impl fmt::Display for TermPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.transliteration {
            Some(transliteration) => write!(f, "{} -> {} ({})", self.source, self.target, transliteration),
            None => write!(f, "{} -> {}", self.source, self.target),
        }
    }
}

/// Field of a term pair, used to restrict term search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermField {
    Source,
    Target,
    Transliteration,
}

/// Record field names used when reading a glossary file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermFields {
    /// Field holding the source-language term
    pub source: String,

    /// Field holding the target-language term
    pub target: String,

    /// Older field name adopted as the target when `target` is absent
    #[serde(default)]
    pub legacy_target: Option<String>,

    /// Field holding the transliteration
    #[serde(default = "default_transliteration_field")]
    pub transliteration: String,
}

impl Default for TermFields {
    fn default() -> Self {
        Self {
            source: "en".to_string(),
            target: "gu".to_string(),
            legacy_target: Some("mr".to_string()),
            transliteration: default_transliteration_field(),
        }
    }
}

fn default_transliteration_field() -> String {
    "transliteration".to_string()
}

/// A term search hit
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatch {
    /// The matching pair
    pub pair: TermPair,

    /// Best similarity across the searched fields
    pub score: f64,
}

/// Immutable, compiled glossary
#[derive(Debug, Clone)]
pub struct Glossary {
    /// Normalized pairs in load order
    terms: Vec<TermPair>,

    /// Lowercased source term -> index into `terms` (last loaded wins)
    exact: HashMap<String, usize>,

    /// Distinct lowercased source terms in first-registered order
    candidates: Vec<String>,

    /// Alternation over all source terms, longest first
    pattern: Option<Regex>,
}

impl Glossary {
    /// Build a glossary from term pairs.
    ///
    /// Pairs whose source or target is empty after whitespace normalization
    /// are dropped. Fails only if the term pattern cannot be compiled.
    pub fn build<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = TermPair>,
    {
        let mut terms = Vec::new();
        for (index, pair) in pairs.into_iter().enumerate() {
            match pair.normalized() {
                Some(pair) => terms.push(pair),
                None => {
                    let error = ValidationError::MalformedTermPair {
                        index,
                        reason: "empty source or target term".to_string(),
                    };
                    warn!("Skipping glossary entry: {}", error);
                }
            }
        }

        let mut exact = HashMap::with_capacity(terms.len());
        let mut candidates = Vec::with_capacity(terms.len());
        for (index, pair) in terms.iter().enumerate() {
            let key = pair.source.to_lowercase();
            if exact.insert(key.clone(), index).is_none() {
                candidates.push(key);
            }
        }

        let pattern = compile_pattern(&candidates)?;

        info!(
            "Built glossary with {} term pairs ({} distinct source terms)",
            terms.len(),
            candidates.len()
        );

        Ok(Self {
            terms,
            exact,
            candidates,
            pattern,
        })
    }

    /// An empty glossary that never annotates anything
    pub fn empty() -> Self {
        Self {
            terms: Vec::new(),
            exact: HashMap::new(),
            candidates: Vec::new(),
            pattern: None,
        }
    }

    /// Parse a glossary from JSON text: an array of term records.
    ///
    /// Records that are not objects or lack a source or target term are
    /// skipped with a warning; the rest of the glossary stays usable.
    pub fn from_json_str(json: &str, fields: &TermFields) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ConfigError::MalformedGlossary(e.to_string()))?;

        let records = value.as_array().ok_or_else(|| {
            ConfigError::MalformedGlossary("expected a JSON array of term records".to_string())
        })?;

        let mut pairs = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match parse_record(index, record, fields) {
                Ok(pair) => pairs.push(pair),
                Err(error) => warn!("Skipping glossary entry: {}", error),
            }
        }

        debug!("Parsed {} of {} glossary records", pairs.len(), records.len());
        Self::build(pairs)
    }

    /// Load a glossary file from disk
    pub fn from_file(path: impl AsRef<Path>, fields: &TermFields) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::GlossaryUnreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content, fields)
    }

    /// Look up a lowercased source term
    pub fn lookup_exact(&self, term_lowercase: &str) -> Option<&TermPair> {
        self.exact.get(term_lowercase).map(|&index| &self.terms[index])
    }

    /// Best fuzzy candidate for a lowercased span, if it clears the matcher's threshold
    pub fn lookup_fuzzy(&self, term_lowercase: &str, matcher: &FuzzyMatcher) -> Option<&TermPair> {
        let (index, score) = matcher.find_best_match(term_lowercase, &self.candidates)?;
        let key = &self.candidates[index];
        debug!("Fuzzy glossary match '{}' -> '{}' ({:.3})", term_lowercase, key, score);
        self.lookup_exact(key)
    }

    /// Compiled term matcher; `None` when the glossary is empty
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// All term pairs in load order
    pub fn terms(&self) -> &[TermPair] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Search term pairs by similarity.
    ///
    /// Each pair is scored against the lowercased query on the requested
    /// field, or on every field when `field` is `None`. Results are sorted
    /// by score, ties keeping glossary order.
    pub fn search(
        &self,
        query: &str,
        max_results: usize,
        threshold: f64,
        field: Option<TermField>,
    ) -> Result<Vec<TermMatch>, ValidationError> {
        fuzzy::validate_threshold(threshold)?;
        let query = query.to_lowercase();

        let mut matches: Vec<TermMatch> = self
            .terms
            .iter()
            .filter_map(|pair| {
                let score = score_pair(&query, pair, field);
                (score >= threshold).then(|| TermMatch {
                    pair: pair.clone(),
                    score,
                })
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(max_results);
        Ok(matches)
    }
}

/// Render search hits the way the assistant shows them to users
pub fn format_search_results(query: &str, matches: &[TermMatch]) -> String {
    if matches.is_empty() {
        return format!("No matching terms found for `{}`", query);
    }

    let lines: Vec<String> = matches
        .iter()
        .map(|m| format!("{} [{:.0}%]", m.pair, m.score * 100.0))
        .collect();

    format!("Matching Terms for `{}`\n\n{}", query, lines.join("\n"))
}

fn score_pair(query: &str, pair: &TermPair, field: Option<TermField>) -> f64 {
    let wants = |f: TermField| field.is_none_or(|requested| requested == f);
    let mut best: f64 = 0.0;

    if wants(TermField::Source) {
        best = best.max(fuzzy::similarity(query, &pair.source));
    }
    if wants(TermField::Target) {
        best = best.max(fuzzy::similarity(query, &pair.target));
    }
    if wants(TermField::Transliteration) {
        if let Some(transliteration) = &pair.transliteration {
            best = best.max(fuzzy::similarity(query, transliteration));
        }
    }

    best
}

fn parse_record(index: usize, record: &Value, fields: &TermFields) -> Result<TermPair, ValidationError> {
    let malformed = |reason: &str| ValidationError::MalformedTermPair {
        index,
        reason: reason.to_string(),
    };

    let object = record.as_object().ok_or_else(|| malformed("record is not an object"))?;

    let source = object
        .get(&fields.source)
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(&format!("missing '{}' field", fields.source)))?;

    let target = object
        .get(&fields.target)
        .or_else(|| {
            fields
                .legacy_target
                .as_ref()
                .and_then(|legacy| object.get(legacy))
        })
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(&format!("missing '{}' field", fields.target)))?;

    let mut pair = TermPair::new(source, target);
    if let Some(transliteration) = object.get(&fields.transliteration).and_then(Value::as_str) {
        pair = pair.with_transliteration(transliteration);
    }
    Ok(pair)
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Escape a term, letting its spaces match any whitespace run
fn term_pattern(term: &str) -> String {
    term.split(' ').map(regex::escape).collect::<Vec<_>>().join(r"\s+")
}

/// Wrap a term body in `\b` on each edge of `term` that is a word character.
///
/// The regex crate has no lookbehind, so terms like "N.P.K." only get a
/// boundary where one can hold.
fn bounded(term: &str, body: String) -> String {
    let start = if term.starts_with(is_word_char) { r"\b" } else { "" };
    let end = if term.ends_with(is_word_char) { r"\b" } else { "" };
    format!("{}{}{}", start, body, end)
}

/// Alternation of whitespace-flexible terms with the default size limits
fn primary_pattern(ordered: &[&str]) -> Result<Regex, regex::Error> {
    let alternation = ordered
        .iter()
        .map(|term| bounded(term, term_pattern(term)))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!("(?:{})", alternation))
        .case_insensitive(true)
        .build()
}

/// Alternation of literally escaped terms with raised size limits.
///
/// Same Unicode word edges as the primary pattern, but each term matches
/// only its exact spacing.
fn fallback_pattern(ordered: &[&str]) -> Result<Regex, regex::Error> {
    let alternation = ordered
        .iter()
        .map(|term| bounded(term, regex::escape(term)))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!("(?:{})", alternation))
        .case_insensitive(true)
        .size_limit(FALLBACK_SIZE_LIMIT)
        .dfa_size_limit(FALLBACK_SIZE_LIMIT)
        .build()
}

/// Compile the term alternation, longest term first.
///
/// Falls back to a simpler pattern with a larger size limit when the
/// primary one cannot be compiled.
fn compile_pattern(candidates: &[String]) -> Result<Option<Regex>, ConfigError> {
    if candidates.is_empty() {
        return Ok(None);
    }

    let mut ordered: Vec<&str> = candidates.iter().map(String::as_str).collect();
    // stable: equal lengths keep registration order
    ordered.sort_by_key(|term| std::cmp::Reverse(term.chars().count()));

    match primary_pattern(&ordered) {
        Ok(regex) => return Ok(Some(regex)),
        Err(e) => warn!("Glossary pattern failed to compile, using fallback: {}", e),
    }

    fallback_pattern(&ordered)
        .map(Some)
        .map_err(|e| ConfigError::PatternCompile(e.to_string()))
}
