//! Property checks over randomized detector output
//!
//! Inputs come from a seeded `StdRng` so failures are reproducible.

mod common;

use common::StubDetector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use veil::anonymization::config::{ReconcilerConfig, TieBreak};
use veil::anonymization::detector::DetectorSet;
use veil::anonymization::{
    AnonymizationConfig, AnonymizationEngine, Detection, DetectorSource, PiiType, Span,
    SpanReconciler, Strategy,
};

const WORDS: [&str; 8] = ["Ann", "Paris", "née", "Zürich", "ACME", "日本", "call", "—"];
const LABELS: [PiiType; 4] = [
    PiiType::PersonName,
    PiiType::Location,
    PiiType::Organization,
    PiiType::DateTime,
];
const STUBS: [(&str, DetectorSource); 3] = [
    ("regexish", DetectorSource::Regex),
    ("ner", DetectorSource::Ner),
    ("framework", DetectorSource::Framework),
];

fn random_text(rng: &mut StdRng) -> String {
    (0..rng.gen_range(1..20))
        .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn random_detectors(rng: &mut StdRng, text_len: usize) -> DetectorSet {
    let mut set = DetectorSet::new(Duration::from_secs(1));
    for (name, source) in STUBS {
        let mut stub = StubDetector::new(name, source);
        for _ in 0..rng.gen_range(0..8) {
            let start = rng.gen_range(0..text_len + 2);
            let end = rng.gen_range(0..text_len + 2);
            let label = LABELS[rng.gen_range(0..LABELS.len())];
            let confidence = rng.gen_range(0..=10) as f32 / 10.0;
            stub = stub.with(start, end, label, confidence);
        }
        set.push(Arc::new(stub));
    }
    set
}

#[tokio::test]
async fn test_random_pipeline_invariants() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for round in 0..150 {
        let text = random_text(&mut rng);
        let detectors = random_detectors(&mut rng, text.len());
        let tie_break = if round % 2 == 0 {
            TieBreak::ConfidenceFirst
        } else {
            TieBreak::PriorityFirst
        };
        let config = AnonymizationConfig {
            reconciler: ReconcilerConfig {
                tie_break,
                coalesce_gap: round % 3,
            },
            ..common::salted_config("s")
        };
        let engine = AnonymizationEngine::with_detectors(config, detectors).unwrap();

        let result = engine.anonymize_text(&text, Strategy::Placeholder).await.unwrap();

        // Non-overlap, ordering, char boundaries
        for pair in result.entities.windows(2) {
            assert!(pair[0].annotation.span.end <= pair[1].annotation.span.start);
        }
        for entity in &result.entities {
            let span = entity.annotation.span;
            assert!(span.is_valid_for(&text), "round {round}: {span:?}");
            assert_eq!(span.slice(&text), Some(entity.text.as_str()));
        }

        // Unflagged regions are copied verbatim
        let mut rebuilt = String::new();
        let mut cursor = 0;
        for entity in &result.entities {
            rebuilt.push_str(&text[cursor..entity.annotation.span.start]);
            rebuilt.push_str(&entity.replacement);
            cursor = entity.annotation.span.end;
        }
        rebuilt.push_str(&text[cursor..]);
        assert_eq!(rebuilt, result.anonymized_text, "round {round}");
    }
}

#[test]
fn test_equal_confidence_overlap_keeps_higher_priority_source() {
    let text = "Jordan Hills Ltd";
    let mut rng = StdRng::seed_from_u64(42);

    for tie_break in [TieBreak::ConfidenceFirst, TieBreak::PriorityFirst] {
        let reconciler = SpanReconciler::new(ReconcilerConfig {
            tie_break,
            coalesce_gap: 0,
        });

        for _ in 0..20 {
            let confidence = rng.gen_range(1..=10) as f32 / 10.0;
            let mut detections = vec![
                Detection::new(Span::new(0, 6), PiiType::PersonName, DetectorSource::Ner, "ner")
                    .with_confidence(confidence),
                Detection::new(
                    Span::new(0, 16),
                    PiiType::Organization,
                    DetectorSource::Framework,
                    "framework",
                )
                .with_confidence(confidence),
            ];
            if rng.gen_bool(0.5) {
                detections.reverse();
            }

            let result = reconciler.reconcile(text, detections);
            assert_eq!(result.annotations.len(), 1);
            assert_eq!(result.annotations[0].source, DetectorSource::Ner);
            assert_eq!(result.overlapped, 1);
        }
    }
}

#[test]
fn test_identical_spans_from_all_tiers_collapse() {
    let reconciler = SpanReconciler::new(ReconcilerConfig::default());
    let detections = vec![
        Detection::new(Span::new(0, 5), PiiType::Location, DetectorSource::Framework, "framework")
            .with_confidence(0.99),
        Detection::new(Span::new(0, 5), PiiType::Location, DetectorSource::Regex, "regexish")
            .with_confidence(0.5),
        Detection::new(Span::new(0, 5), PiiType::Location, DetectorSource::Ner, "ner")
            .with_confidence(0.7),
    ];

    let result = reconciler.reconcile("Paris", detections);
    assert_eq!(result.annotations.len(), 1);
    assert_eq!(result.annotations[0].source, DetectorSource::Regex);
    assert_eq!(result.annotations[0].confidence, 0.99);
    assert_eq!(result.overlapped, 2);
}
