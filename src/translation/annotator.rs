/*!
 * Glossary annotation of free text.
 *
 * Inserts the bracketed target-language equivalent after every recognized
 * source term: "apply fertilizer now" becomes "apply fertilizer [ખાતર] now".
 */

use crate::errors::ValidationError;

use super::fuzzy::FuzzyMatcher;
use super::glossary::Glossary;

/// Annotates text with glossary terms
#[derive(Debug, Clone)]
pub struct TermAnnotator<'a> {
    glossary: &'a Glossary,
    matcher: FuzzyMatcher,
}

impl<'a> TermAnnotator<'a> {
    /// Create an annotator; `fuzzy_threshold` must lie in `[0, 1]`
    pub fn new(glossary: &'a Glossary, fuzzy_threshold: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            glossary,
            matcher: FuzzyMatcher::new(fuzzy_threshold)?,
        })
    }

    /// Create an annotator from an already validated matcher
    pub fn with_matcher(glossary: &'a Glossary, matcher: FuzzyMatcher) -> Self {
        Self { glossary, matcher }
    }

    /// Annotate every glossary term found in `text`.
    ///
    /// Matches never overlap. The matched text keeps its casing, the target
    /// term follows it in brackets after one space, and a trailing space is
    /// added only when the next character is alphanumeric.
    pub fn annotate(&self, text: &str) -> String {
        let Some(pattern) = self.glossary.pattern() else {
            return text.to_string();
        };
        if !has_alphanumeric(text) {
            return text.to_string();
        }

        let mut result = String::with_capacity(text.len() + text.len() / 4);
        let mut last_end = 0;

        for found in pattern.find_iter(text) {
            let key = found.as_str().trim().to_lowercase();
            let pair = self
                .glossary
                .lookup_exact(&key)
                .or_else(|| self.glossary.lookup_fuzzy(&key, &self.matcher));

            let Some(pair) = pair else {
                continue;
            };

            result.push_str(&text[last_end..found.end()]);
            result.push_str(" [");
            result.push_str(&pair.target);
            result.push(']');
            if text[found.end()..].chars().next().is_some_and(char::is_alphanumeric) {
                result.push(' ');
            }
            last_end = found.end();
        }

        result.push_str(&text[last_end..]);
        result
    }
}

/// Annotate `text` in one call
pub fn annotate(text: &str, glossary: &Glossary, fuzzy_threshold: f64) -> Result<String, ValidationError> {
    Ok(TermAnnotator::new(glossary, fuzzy_threshold)?.annotate(text))
}

/// True when the text holds at least one alphanumeric character
pub fn has_alphanumeric(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}
