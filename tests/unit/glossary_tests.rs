/*!
 * Tests for glossary loading, annotation and term search
 */

use kisan_translate::translation::{
    Glossary, TermField, TermFields, TermPair, annotate, format_search_results,
};

use crate::common::{create_temp_dir, create_test_file, init_logging, sample_glossary};

#[test]
fn test_sampleGlossary_shouldSkipMalformedRecords() {
    init_logging();
    let glossary = sample_glossary();

    assert_eq!(glossary.len(), 5);
    assert!(glossary.lookup_exact("pest").is_none());
}

#[test]
fn test_sampleGlossary_legacyField_shouldBecomeTarget() {
    let glossary = sample_glossary();
    assert_eq!(glossary.lookup_exact("soybean").unwrap().target, "सोयाबीन");
}

#[test]
fn test_annotate_longestMatch_shouldWinOverContainedTerm() {
    let glossary = Glossary::build(vec![
        TermPair::new("Virus", "वायरस"),
        TermPair::new("Yellow Mosaic Virus", "पीला मोज़ेक वायरस"),
    ])
    .unwrap();

    let result = annotate("treat Yellow Mosaic Virus early", &glossary, 0.97).unwrap();

    assert_eq!(result, "treat Yellow Mosaic Virus [पीला मोज़ेक वायरस] early");
    assert!(!result.contains("Virus [वायरस]"));
}

#[test]
fn test_annotate_multipleTerms_shouldAnnotateEach() {
    let glossary = sample_glossary();

    let result = annotate(
        "Use drip irrigation and fertilizer; watch for Virus.",
        &glossary,
        0.97,
    )
    .unwrap();

    assert_eq!(
        result,
        "Use drip irrigation [ટપક સિંચાઈ] and fertilizer [ખાતર]; watch for Virus [વાયરસ]."
    );
}

#[test]
fn test_annotate_fuzzyThreshold_shouldBeInclusive() {
    let glossary = sample_glossary();
    // "drip  irrigation" vs "drip irrigation": 2 * 15 / 31
    let score = 30.0 / 31.0;
    let text = "drip  irrigation";

    let at_threshold = annotate(text, &glossary, score).unwrap();
    assert_eq!(at_threshold, "drip  irrigation [ટપક સિંચાઈ]");

    let above_score = annotate(text, &glossary, score + 0.01).unwrap();
    assert_eq!(above_score, text);
}

#[test]
fn test_fromFile_customFields_shouldReadOtherLanguages() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "hindi.json",
        r#"[{"english": "sowing", "hindi": "बुवाई"}]"#,
    )
    .unwrap();
    let fields = TermFields {
        source: "english".to_string(),
        target: "hindi".to_string(),
        legacy_target: None,
        transliteration: "transliteration".to_string(),
    };

    let glossary = Glossary::from_file(&path, &fields).unwrap();

    assert_eq!(annotate("early sowing", &glossary, 0.97).unwrap(), "early sowing [बुवाई]");
}

#[test]
fn test_search_byTransliteration_shouldFindPair() {
    let glossary = sample_glossary();

    let matches = glossary
        .search("Khatar", 5, 0.7, Some(TermField::Transliteration))
        .unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].pair.source, "fertilizer");
    assert_eq!(
        format_search_results("khatar", &matches),
        "Matching Terms for `khatar`\n\nfertilizer -> ખાતર (khatar) [100%]"
    );
}

#[test]
fn test_search_shouldRankByScore() {
    let glossary = sample_glossary();

    let matches = glossary.search("virus", 5, 0.3, Some(TermField::Source)).unwrap();

    assert_eq!(matches[0].pair.source, "Virus");
    assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
}
