use isolang::Language;
use log::debug;

use crate::errors::ValidationError;

/// Language utilities for ISO language code handling
///
/// Translation backends expect ISO 639-1 codes ("hi", "gu", "mr") where one
/// exists. These helpers validate and normalize whatever the host passes in.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// Map an ISO 639-2/B code to its 639-2/T form
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    let part2t = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(part2t)
}

/// Resolve any accepted code to a language
fn resolve(code: &str) -> Option<(Language, LanguageCodeType)> {
    let normalized = code.trim().to_lowercase();

    match normalized.len() {
        2 => Language::from_639_1(&normalized).map(|lang| (lang, LanguageCodeType::Part1)),
        3 => {
            if let Some(lang) = Language::from_639_3(&normalized) {
                return Some((lang, LanguageCodeType::Part2T));
            }
            bibliographic_to_terminology(&normalized)
                .and_then(Language::from_639_3)
                .map(|lang| (lang, LanguageCodeType::Part2B))
        }
        _ => None,
    }
}

fn shortest_code(lang: Language) -> String {
    lang.to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| lang.to_639_3().to_string())
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType, ValidationError> {
    resolve(code)
        .map(|(_, kind)| kind)
        .ok_or_else(|| ValidationError::InvalidLanguage(code.to_string()))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1(code: &str) -> Result<String, ValidationError> {
    let (lang, _) = resolve(code).ok_or_else(|| ValidationError::InvalidLanguage(code.to_string()))?;

    Ok(shortest_code(lang))
}

/// Resolve the code sent to a translation backend.
///
/// ISO 639 codes are normalized with `normalize_to_part1`. Anything else,
/// such as a regional tag like `zh-CN` or a script variant like `mni-Mtei`,
/// is passed through trimmed since backends define their own codes. Only a
/// blank code is rejected.
pub fn backend_language_code(code: &str) -> Result<String, ValidationError> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidLanguage(code.to_string()));
    }

    match resolve(trimmed) {
        Some((lang, _)) => Ok(shortest_code(lang)),
        None => {
            debug!("Passing unrecognized language code '{}' to the backend as is", trimmed);
            Ok(trimmed.to_string())
        }
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String, ValidationError> {
    resolve(code)
        .map(|(lang, _)| lang.to_name().to_string())
        .ok_or_else(|| ValidationError::InvalidLanguage(code.to_string()))
}
