/*!
 * End-to-end tests for the translation pipeline
 */

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;

use kisan_translate::errors::{BackendError, TranslationError, ValidationError};
use kisan_translate::providers::TranslationBackend;
use kisan_translate::providers::mock::MockBackend;
use kisan_translate::translation::structure::collect;
use kisan_translate::{Glossary, PipelineConfig, TranslationPipeline, TreeValue};

use crate::common::init_logging;
use crate::common::mock_backends::{ScriptedBackend, reverse_upper};
use crate::common::sample_glossary;

fn pipeline(backend: Arc<dyn TranslationBackend>, glossary: Glossary, batch_size: usize) -> TranslationPipeline {
    let options = PipelineConfig {
        batch_size,
        ..PipelineConfig::default()
    };
    TranslationPipeline::new(backend, Arc::new(glossary), options).unwrap()
}

fn no_keys() -> HashSet<String> {
    HashSet::new()
}

fn advisory() -> TreeValue {
    TreeValue::from(json!({
        "title": "Crop advisory",
        "confidence": 0.82,
        "steps": ["Sow seeds", "Water daily", "Check for pests"],
        "contact": {"id": "KVK-17", "office": "Krishi Vigyan Kendra"},
        "urgent": false
    }))
}

#[tokio::test]
async fn test_translate_everyLeaf_shouldLandAtItsOwnPath() {
    init_logging();
    let backend = ScriptedBackend::reverse_upper();
    let pipeline = pipeline(Arc::new(backend), Glossary::empty(), 4);
    let data = advisory();

    let result = pipeline.translate(&data, "en", "hi", &no_keys(), false).await.unwrap();

    for (path, original) in collect(&data, &no_keys()) {
        assert_eq!(
            result.get_path(&path).and_then(TreeValue::as_str),
            Some(reverse_upper(&original).as_str()),
            "leaf at {}",
            path
        );
    }
    assert_eq!(serde_json::Value::from(result)["confidence"], json!(0.82));
}

#[tokio::test]
async fn test_translate_batchSizeTwo_shouldSplitRequestsInOrder() {
    let backend = ScriptedBackend::reverse_upper();
    let tracker = backend.tracker();
    let pipeline = pipeline(Arc::new(backend), Glossary::empty(), 2);

    pipeline.translate(&advisory(), "en", "hi", &no_keys(), false).await.unwrap();

    let tracker = tracker.lock().unwrap();
    // six string leaves
    assert_eq!(tracker.call_count, 3);
    assert_eq!(tracker.batch_sizes, vec![2, 2, 2]);
}

#[tokio::test]
async fn test_translate_excludeKeys_shouldKeepSubtreeVerbatim() {
    let backend = ScriptedBackend::reverse_upper();
    let pipeline = pipeline(Arc::new(backend), Glossary::empty(), 4);
    let exclude: HashSet<String> = ["contact".to_string()].into_iter().collect();

    let result = pipeline.translate(&advisory(), "en", "hi", &exclude, false).await.unwrap();
    let result = serde_json::Value::from(result);

    assert_eq!(result["contact"], json!({"id": "KVK-17", "office": "Krishi Vigyan Kendra"}));
    assert_eq!(result["title"], "YROSIVDA PORC");
}

#[tokio::test]
async fn test_translate_nothingTranslatable_shouldNotCallBackend() {
    let backend = ScriptedBackend::reverse_upper();
    let tracker = backend.tracker();
    let pipeline = pipeline(Arc::new(backend), Glossary::empty(), 4);
    let data = TreeValue::from(json!({"count": 3, "marks": ["---", "  "], "empty": {}}));

    let result = pipeline.translate(&data, "en", "hi", &no_keys(), false).await.unwrap();

    assert_eq!(result, data);
    assert_eq!(tracker.lock().unwrap().call_count, 0);
}

#[tokio::test]
async fn test_translate_withGlossary_shouldSendAnnotatedText() {
    let backend = MockBackend::echo();
    let pipeline = pipeline(Arc::new(backend.clone()), sample_glossary(), 4);
    let data = TreeValue::from(json!({"tip": "Apply fertilizer before drip irrigation starts"}));

    let annotated = pipeline.translate(&data, "en", "gu", &no_keys(), true).await.unwrap();
    let plain = pipeline.translate(&data, "en", "gu", &no_keys(), false).await.unwrap();

    assert_eq!(
        serde_json::Value::from(annotated)["tip"],
        "Apply fertilizer [ખાતર] before drip irrigation [ટપક સિંચાઈ] starts"
    );
    assert_eq!(plain, data);
    assert_eq!(backend.call_count(), 2);
}

#[tokio::test]
async fn test_translateJson_markdown_shouldKeepMarkersOutOfBackend() {
    let backend = ScriptedBackend::reverse_upper();
    let pipeline = pipeline(Arc::new(backend), Glossary::empty(), 4);

    let result = pipeline
        .translate_json(json!({"body": "# Heading\n- item one\n"}), "en", "hi", &no_keys(), false)
        .await
        .unwrap();

    assert_eq!(result, json!({"body": "# GNIDAEH\n- ENO METI\n"}));
}

#[tokio::test]
async fn test_translate_languageCodes_shouldBeNormalizedBeforeBackend() {
    let backend = MockBackend::tagged();
    let pipeline = pipeline(Arc::new(backend.clone()), Glossary::empty(), 4);

    let result = pipeline
        .translate(&TreeValue::from("Sow seeds"), "eng", "HIN", &no_keys(), false)
        .await
        .unwrap();

    assert_eq!(result, TreeValue::from("[hi] Sow seeds"));
    assert_eq!(backend.calls()[0].source_lang, "en");
}

#[tokio::test]
async fn test_translate_blankLanguage_shouldFailWithoutCalls() {
    let backend = MockBackend::echo();
    let pipeline = pipeline(Arc::new(backend.clone()), Glossary::empty(), 4);

    let result = pipeline.translate(&advisory(), "", "hi", &no_keys(), false).await;

    assert!(matches!(
        result,
        Err(TranslationError::Validation(ValidationError::InvalidLanguage(_)))
    ));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_translate_regionalLanguageCodes_shouldPassThrough() {
    let backend = MockBackend::tagged();
    let pipeline = pipeline(Arc::new(backend.clone()), Glossary::empty(), 4);

    for code in ["zh-CN", "pt-BR", "mni-Mtei"] {
        let result = pipeline
            .translate(&TreeValue::from("hello"), "en", code, &no_keys(), false)
            .await
            .unwrap();
        assert_eq!(result, TreeValue::from(format!("[{}] hello", code)));
    }

    let targets: Vec<String> = backend.calls().into_iter().map(|call| call.target_lang).collect();
    assert_eq!(targets, vec!["zh-CN", "pt-BR", "mni-Mtei"]);
}

#[tokio::test]
async fn test_translate_backendFailure_shouldPropagate() {
    let pipeline = pipeline(Arc::new(MockBackend::failing()), Glossary::empty(), 4);

    let result = pipeline.translate(&advisory(), "en", "hi", &no_keys(), false).await;

    assert!(matches!(
        result,
        Err(TranslationError::Backend(BackendError::ApiError { status_code: 500, .. }))
    ));
}

#[tokio::test]
async fn test_translate_shortBackendResponse_shouldFailWithLengthMismatch() {
    let pipeline = pipeline(Arc::new(MockBackend::dropping()), Glossary::empty(), 4);

    let result = pipeline.translate(&advisory(), "en", "hi", &no_keys(), false).await;

    assert!(matches!(
        result,
        Err(TranslationError::Backend(BackendError::LengthMismatch { expected: 4, actual: 3 }))
    ));
}

#[test]
fn test_translateWithDefaults_shouldUseConfiguredExcludes() {
    let options = PipelineConfig {
        target_language: "hi".to_string(),
        exclude_keys: ["steps".to_string()].into_iter().collect(),
        ..PipelineConfig::default()
    };
    let pipeline =
        TranslationPipeline::new(Arc::new(MockBackend::uppercase()), Arc::new(Glossary::empty()), options)
            .unwrap();

    let result = tokio_test::block_on(pipeline.translate_with_defaults(&advisory())).unwrap();
    let result = serde_json::Value::from(result);

    assert_eq!(result["steps"], json!(["Sow seeds", "Water daily", "Check for pests"]));
    assert_eq!(result["title"], "CROP ADVISORY");
}

#[test]
fn test_new_zeroBatchSize_shouldFail() {
    let options = PipelineConfig {
        batch_size: 0,
        ..PipelineConfig::default()
    };

    let result = TranslationPipeline::new(Arc::new(MockBackend::echo()), Arc::new(Glossary::empty()), options);

    assert!(matches!(result, Err(ValidationError::ZeroBatchSize)));
}
