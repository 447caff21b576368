//! Edge case tests for the anonymization engine

mod common;

use common::{salted_config, StubDetector};
use std::sync::Arc;
use std::time::Duration;
use veil::anonymization::detector::DetectorSet;
use veil::anonymization::{
    AnonymizationEngine, Annotation, DetectorSource, PiiType, Span, Strategy, StrategyEngine,
};
use veil::config::secret_string;

fn stub_engine(stub: StubDetector) -> AnonymizationEngine {
    let detectors = DetectorSet::new(Duration::from_secs(1)).with_detector(Arc::new(stub));
    AnonymizationEngine::with_detectors(salted_config("s"), detectors).unwrap()
}

#[tokio::test]
async fn test_empty_text() {
    let engine = AnonymizationEngine::new(salted_config("s")).unwrap();
    let result = engine.anonymize_text("", Strategy::Mask).await.unwrap();

    assert_eq!(result.anonymized_text, "");
    assert!(result.entities.is_empty());
    assert_eq!(result.stats.total_entities, 0);
}

#[tokio::test]
async fn test_very_long_text() {
    let filler = "lorem ipsum dolor sit amet ".repeat(2000);
    let text = format!("{filler}ann@example.com {filler}");

    let engine = AnonymizationEngine::new(salted_config("s")).unwrap();
    let result = engine.anonymize_text(&text, Strategy::Placeholder).await.unwrap();

    assert_eq!(result.entities.len(), 1);
    assert_eq!(
        result.anonymized_text,
        format!("{filler}[EMAIL_ADDRESS] {filler}")
    );
}

#[tokio::test]
async fn test_multibyte_text_around_pii() {
    let text = "Zoë 📧 zoe@example.com — merci!";
    let engine = AnonymizationEngine::new(salted_config("s")).unwrap();
    let result = engine.anonymize_text(text, Strategy::Placeholder).await.unwrap();

    assert_eq!(result.anonymized_text, "Zoë 📧 [EMAIL_ADDRESS] — merci!");
}

#[tokio::test]
async fn test_invalid_detections_are_counted_not_fatal() {
    let text = "née Dupont";
    let stub = StubDetector::new("ner", DetectorSource::Ner)
        // inside the two-byte 'é'
        .with(2, 4, PiiType::PersonName, 0.9)
        .with(5, 5, PiiType::PersonName, 0.9)
        .with(5, 50, PiiType::PersonName, 0.9)
        .with(5, 11, PiiType::PersonName, f32::NAN)
        .with(5, 11, PiiType::PersonName, 0.8);
    let engine = stub_engine(stub);

    let outcome = engine.detect(text).await;
    assert_eq!(outcome.invalid, 4);
    assert_eq!(outcome.annotations.len(), 1);
    assert_eq!(outcome.annotations[0].span, Span::new(5, 11));

    let result = engine.anonymize_text(text, Strategy::Placeholder).await.unwrap();
    assert_eq!(result.anonymized_text, "née [PERSON_NAME]");
}

#[tokio::test]
async fn test_out_of_range_confidence_is_clamped() {
    let stub = StubDetector::new("ner", DetectorSource::Ner).with(0, 3, PiiType::PersonName, 7.5);
    let engine = stub_engine(stub);

    let outcome = engine.detect("Ann").await;
    assert_eq!(outcome.annotations[0].confidence, 1.0);
}

#[tokio::test]
async fn test_adjacent_pii_without_separator() {
    let stub = StubDetector::new("ner", DetectorSource::Ner)
        .with(0, 3, PiiType::PersonName, 0.9)
        .with(3, 8, PiiType::Location, 0.9);
    let engine = stub_engine(stub);

    let result = engine.anonymize_text("AnnParis", Strategy::Placeholder).await.unwrap();
    assert_eq!(result.anonymized_text, "[PERSON_NAME][LOCATION]");
}

#[tokio::test]
async fn test_split_name_is_coalesced() {
    let stub = StubDetector::new("ner", DetectorSource::Ner)
        .with(4, 8, PiiType::PersonName, 0.7)
        .with(9, 14, PiiType::PersonName, 0.9);
    let engine = stub_engine(stub);

    let result = engine.anonymize_text("Dr. John Smith", Strategy::Placeholder).await.unwrap();
    assert_eq!(result.anonymized_text, "Dr. [PERSON_NAME]");
    assert_eq!(result.entities[0].annotation.confidence, 0.9);
}

#[test]
fn test_strategy_engine_skips_bad_annotations() {
    let engine = StrategyEngine::new(secret_string("s".to_string()), false);
    let text = "Ann and Bob";
    let annotations = vec![
        Annotation {
            span: Span::new(0, 3),
            label: PiiType::PersonName,
            confidence: 0.9,
            source: DetectorSource::Ner,
            detector: "ner".to_string(),
        },
        // overlaps the first
        Annotation {
            span: Span::new(1, 5),
            label: PiiType::PersonName,
            confidence: 0.9,
            source: DetectorSource::Ner,
            detector: "ner".to_string(),
        },
        // beyond the text
        Annotation {
            span: Span::new(8, 40),
            label: PiiType::PersonName,
            confidence: 0.9,
            source: DetectorSource::Ner,
            detector: "ner".to_string(),
        },
    ];

    let result = engine.anonymize(text, &annotations, Strategy::Placeholder);
    assert_eq!(result.anonymized_text, "[PERSON_NAME] and Bob");
    assert_eq!(result.entities.len(), 1);
}

#[test]
fn test_unknown_strategy_name() {
    let err = "blur".parse::<Strategy>().unwrap_err();
    assert!(err.to_string().contains("blur"));
}
