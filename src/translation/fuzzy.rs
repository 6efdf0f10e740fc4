/*!
 * Fuzzy matching for glossary terms.
 *
 * Provides an indel-based similarity ratio to find glossary terms even when
 * the matched text differs slightly from the registered spelling (extra
 * whitespace, a dropped letter, a plural).
 */

use crate::errors::ValidationError;

/// Fuzzy matcher using a normalized indel similarity
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    /// Minimum similarity (0.0-1.0, inclusive) for a candidate to count as a match
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self { threshold: 0.97 }
    }
}

impl FuzzyMatcher {
    /// Create a new fuzzy matcher with a custom threshold
    ///
    /// Thresholds outside `[0, 1]` are rejected rather than clamped.
    pub fn new(threshold: f64) -> Result<Self, ValidationError> {
        validate_threshold(threshold)?;
        Ok(Self { threshold })
    }

    /// The configured threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores at or above the threshold are accepted
    fn accepts(&self, score: f64) -> bool {
        score >= self.threshold
    }

    /// Find the best matching candidate.
    ///
    /// Returns the index into `candidates` and its score. Equal scores keep
    /// the earlier candidate.
    pub fn find_best_match<S: AsRef<str>>(&self, text: &str, candidates: &[S]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;

        for (index, candidate) in candidates.iter().enumerate() {
            let score = similarity(text, candidate.as_ref());
            if !self.accepts(score) {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }

        best
    }
}

/// Reject thresholds outside the closed unit interval
pub fn validate_threshold(threshold: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ValidationError::ThresholdOutOfRange(threshold))
    }
}

/// Calculate similarity between two strings (0.0-1.0), case-insensitive.
///
/// The score is `2 * lcs / (len_a + len_b)` over characters, i.e.
/// `1 - indel_distance / (len_a + len_b)`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.to_lowercase().chars().collect();
    let b_chars: Vec<char> = b.to_lowercase().chars().collect();
    let total = a_chars.len() + b_chars.len();

    if total == 0 {
        return 1.0;
    }

    let lcs = lcs_length(&a_chars, &b_chars);
    (2 * lcs) as f64 / total as f64
}

/// Length of the longest common subsequence
fn lcs_length(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Two-row table
    let mut prev_row: Vec<usize> = vec![0; b.len() + 1];
    let mut curr_row: Vec<usize> = vec![0; b.len() + 1];

    for a_char in a {
        for (j, b_char) in b.iter().enumerate() {
            curr_row[j + 1] = if a_char == b_char {
                prev_row[j] + 1
            } else {
                prev_row[j + 1].max(curr_row[j])
            };
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}
