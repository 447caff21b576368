//! Span reconciliation
//!
//! Merges detections from every detector into an ordered, non-overlapping
//! annotation set. Malformed detections are excluded and counted, never
//! raised: a broken detector can lower recall but cannot fail a request.
//!
//! The pass runs in five steps:
//! 1. ingestion rejects empty, inverted, out-of-range or non-char-boundary
//!    spans and NaN confidences;
//! 2. detections claiming exactly the same span collapse into one, chosen by
//!    detector priority and carrying the group's highest confidence;
//! 3. candidates are sorted by start, then by the configured [`TieBreak`],
//!    then longest first, then by label;
//! 4. a left-to-right sweep commits every candidate that starts at or after
//!    the end of the last committed annotation;
//! 5. neighbouring annotations of a multi-token type (names, organizations,
//!    locations) with the same label and detector separated by a short
//!    whitespace gap are coalesced.

use crate::anonymization::config::{ReconcilerConfig, TieBreak};
use crate::anonymization::models::{Annotation, Detection};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Output of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Winning annotations ordered by start, pairwise non-overlapping
    pub annotations: Vec<Annotation>,
    /// Detections rejected at ingestion
    pub invalid: usize,
    /// Detections that lost their region to a better candidate
    pub overlapped: usize,
}

/// Span reconciler
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanReconciler {
    config: ReconcilerConfig,
}

impl SpanReconciler {
    /// Create a reconciler with the given settings
    pub fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    /// Settings in use
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Reconcile raw detections over `text` into an annotation set
    pub fn reconcile(&self, text: &str, detections: Vec<Detection>) -> Reconciliation {
        let mut result = Reconciliation::default();

        let mut groups: BTreeMap<(usize, usize), Vec<Detection>> = BTreeMap::new();
        for mut detection in detections {
            if detection.confidence.is_nan() || !detection.span.is_valid_for(text) {
                result.invalid += 1;
                continue;
            }
            detection.confidence = detection.confidence.clamp(0.0, 1.0);
            groups
                .entry((detection.span.start, detection.span.end))
                .or_default()
                .push(detection);
        }

        if result.invalid > 0 {
            tracing::warn!(invalid = result.invalid, "Dropped invalid detections");
        }

        let mut candidates = Vec::with_capacity(groups.len());
        for (_, group) in groups {
            result.overlapped += group.len() - 1;
            if let Some(winner) = collapse_identical(group) {
                candidates.push(winner);
            }
        }

        candidates.sort_by(|a, b| self.candidate_order(a, b));

        let mut frontier = 0;
        for candidate in candidates {
            if candidate.span.start >= frontier {
                frontier = candidate.span.end;
                result.annotations.push(Annotation::from(candidate));
            } else {
                result.overlapped += 1;
            }
        }

        if self.config.coalesce_gap > 0 {
            result.annotations = coalesce(text, result.annotations, self.config.coalesce_gap);
        }

        crate::log_reconciliation!(result.annotations.len(), result.invalid, result.overlapped);

        result
    }

    fn candidate_order(&self, a: &Detection, b: &Detection) -> Ordering {
        let by_confidence = || b.confidence.total_cmp(&a.confidence);
        let by_priority = || a.source.rank().cmp(&b.source.rank());

        a.span
            .start
            .cmp(&b.span.start)
            .then_with(|| match self.config.tie_break {
                TieBreak::ConfidenceFirst => by_confidence().then_with(by_priority),
                TieBreak::PriorityFirst => by_priority().then_with(by_confidence),
            })
            .then_with(|| b.span.len().cmp(&a.span.len()))
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.detector.cmp(&b.detector))
    }
}

/// Pick the winner among detections sharing one span
fn collapse_identical(group: Vec<Detection>) -> Option<Detection> {
    let max_confidence = group
        .iter()
        .map(|d| d.confidence)
        .fold(f32::MIN, f32::max);

    let mut winner = group.into_iter().min_by(|a, b| {
        a.source
            .rank()
            .cmp(&b.source.rank())
            .then_with(|| b.confidence.total_cmp(&a.confidence))
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.detector.cmp(&b.detector))
    })?;
    winner.confidence = max_confidence;
    Some(winner)
}

/// Merge same-label, same-detector neighbours of a multi-token type separated
/// by at most `gap` bytes of whitespace
fn coalesce(text: &str, annotations: Vec<Annotation>, gap: usize) -> Vec<Annotation> {
    let mut merged: Vec<Annotation> = Vec::with_capacity(annotations.len());

    for annotation in annotations {
        if let Some(last) = merged.last_mut() {
            let between = text.get(last.span.end..annotation.span.start);
            let mergeable = last.label == annotation.label
                && last.label.is_multi_token()
                && last.detector == annotation.detector
                && annotation.span.start - last.span.end <= gap
                && between.is_some_and(|s| s.chars().all(char::is_whitespace));
            if mergeable {
                last.span.end = annotation.span.end;
                last.confidence = last.confidence.max(annotation.confidence);
                continue;
            }
        }
        merged.push(annotation);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::{DetectorSource, PiiType, Span};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn detection(
        start: usize,
        end: usize,
        label: PiiType,
        confidence: f32,
        source: DetectorSource,
    ) -> Detection {
        let detector = match source {
            DetectorSource::Regex => "regex",
            DetectorSource::Ner => "spacy",
            DetectorSource::Framework => "presidio",
        };
        Detection::new(Span::new(start, end), label, source, detector).with_confidence(confidence)
    }

    fn reconciler(tie_break: TieBreak) -> SpanReconciler {
        SpanReconciler::new(ReconcilerConfig {
            tie_break,
            coalesce_gap: 1,
        })
    }

    #[test]
    fn test_zero_detections() {
        let result = SpanReconciler::default().reconcile("Hello world", Vec::new());
        assert!(result.annotations.is_empty());
        assert_eq!(result.invalid, 0);
        assert_eq!(result.overlapped, 0);
    }

    #[test]
    fn test_invalid_spans_rejected() {
        let text = "Jürgen called";
        let detections = vec![
            detection(5, 5, PiiType::PersonName, 0.9, DetectorSource::Ner),
            detection(6, 2, PiiType::PersonName, 0.9, DetectorSource::Ner),
            detection(0, 200, PiiType::PersonName, 0.9, DetectorSource::Ner),
            // byte 2 is inside 'ü'
            detection(0, 2, PiiType::PersonName, 0.9, DetectorSource::Ner),
            detection(0, 7, PiiType::PersonName, f32::NAN, DetectorSource::Ner),
            detection(0, 7, PiiType::PersonName, 0.8, DetectorSource::Ner),
        ];

        let result = SpanReconciler::default().reconcile(text, detections);
        assert_eq!(result.invalid, 5);
        assert_eq!(result.annotations.len(), 1);
        assert_eq!(result.annotations[0].span, Span::new(0, 7));
    }

    #[test]
    fn test_identical_spans_priority_wins_with_max_confidence() {
        let detections = vec![
            detection(0, 8, PiiType::Location, 0.95, DetectorSource::Framework),
            detection(0, 8, PiiType::PersonName, 0.7, DetectorSource::Ner),
        ];

        let result = SpanReconciler::default().reconcile("Santiago went home", detections);
        assert_eq!(result.annotations.len(), 1);
        let winner = &result.annotations[0];
        assert_eq!(winner.label, PiiType::PersonName);
        assert_eq!(winner.source, DetectorSource::Ner);
        assert_eq!(winner.confidence, 0.95);
        assert_eq!(result.overlapped, 1);
    }

    #[test]
    fn test_confidence_first_keeps_higher_confidence() {
        let detections = vec![
            detection(0, 4, PiiType::PersonName, 0.9, DetectorSource::Ner),
            detection(0, 9, PiiType::Organization, 0.95, DetectorSource::Framework),
        ];

        let result = reconciler(TieBreak::ConfidenceFirst).reconcile("Acme Corp rocks", detections);
        assert_eq!(result.annotations.len(), 1);
        assert_eq!(result.annotations[0].span, Span::new(0, 9));
        assert_eq!(result.annotations[0].label, PiiType::Organization);
        assert_eq!(result.overlapped, 1);
    }

    #[test]
    fn test_priority_first_keeps_higher_priority() {
        let detections = vec![
            detection(0, 9, PiiType::Organization, 0.95, DetectorSource::Framework),
            detection(0, 4, PiiType::PersonName, 0.9, DetectorSource::Ner),
        ];

        let result = reconciler(TieBreak::PriorityFirst).reconcile("Acme Corp rocks", detections);
        assert_eq!(result.annotations.len(), 1);
        assert_eq!(result.annotations[0].span, Span::new(0, 4));
        assert_eq!(result.annotations[0].label, PiiType::PersonName);
    }

    #[test]
    fn test_equal_confidence_higher_priority_source_kept() {
        for tie_break in [TieBreak::ConfidenceFirst, TieBreak::PriorityFirst] {
            let detections = vec![
                detection(6, 20, PiiType::Url, 0.8, DetectorSource::Framework),
                detection(6, 18, PiiType::Email, 0.8, DetectorSource::Regex),
                detection(6, 16, PiiType::Organization, 0.8, DetectorSource::Ner),
            ];
            let result =
                reconciler(tie_break).reconcile("Write a@example.com today", detections);
            assert_eq!(result.annotations.len(), 1);
            assert_eq!(result.annotations[0].source, DetectorSource::Regex);
            assert_eq!(result.annotations[0].label, PiiType::Email);
        }
    }

    #[test]
    fn test_earlier_start_commits_first() {
        let detections = vec![
            detection(4, 10, PiiType::Location, 0.99, DetectorSource::Ner),
            detection(0, 6, PiiType::PersonName, 0.5, DetectorSource::Ner),
            detection(12, 16, PiiType::DateTime, 0.6, DetectorSource::Regex),
        ];

        let result = SpanReconciler::default().reconcile("Ana Paris on 2024", detections);
        let spans: Vec<Span> = result.annotations.iter().map(|a| a.span).collect();
        assert_eq!(spans, vec![Span::new(0, 6), Span::new(12, 16)]);
        assert_eq!(result.overlapped, 1);
    }

    #[test]
    fn test_adjacent_spans_both_kept() {
        let detections = vec![
            detection(0, 4, PiiType::PersonName, 0.8, DetectorSource::Ner),
            detection(4, 9, PiiType::Location, 0.8, DetectorSource::Ner),
        ];
        let result = SpanReconciler::default().reconcile("JohnParis", detections);
        assert_eq!(result.annotations.len(), 2);
    }

    #[test]
    fn test_coalesce_split_name() {
        let text = "Dear John Smith,";
        let detections = vec![
            detection(5, 9, PiiType::PersonName, 0.7, DetectorSource::Ner),
            detection(10, 15, PiiType::PersonName, 0.85, DetectorSource::Ner),
        ];

        let result = SpanReconciler::default().reconcile(text, detections);
        assert_eq!(result.annotations.len(), 1);
        assert_eq!(result.annotations[0].span, Span::new(5, 15));
        assert_eq!(result.annotations[0].confidence, 0.85);
        assert_eq!(result.annotations[0].span.slice(text), Some("John Smith"));
    }

    #[test]
    fn test_coalesce_respects_gap_label_and_detector() {
        let text = "John  Smith and Jane Doe";
        let spaced = vec![
            detection(0, 4, PiiType::PersonName, 0.7, DetectorSource::Ner),
            detection(6, 11, PiiType::PersonName, 0.7, DetectorSource::Ner),
        ];
        assert_eq!(SpanReconciler::default().reconcile(text, spaced).annotations.len(), 2);

        let mixed_labels = vec![
            detection(16, 20, PiiType::PersonName, 0.7, DetectorSource::Ner),
            detection(21, 24, PiiType::Location, 0.7, DetectorSource::Ner),
        ];
        assert_eq!(SpanReconciler::default().reconcile(text, mixed_labels).annotations.len(), 2);

        let mixed_detectors = vec![
            detection(16, 20, PiiType::PersonName, 0.7, DetectorSource::Ner),
            detection(21, 24, PiiType::PersonName, 0.7, DetectorSource::Framework),
        ];
        assert_eq!(
            SpanReconciler::default().reconcile(text, mixed_detectors).annotations.len(),
            2
        );

        let disabled = SpanReconciler::new(ReconcilerConfig {
            tie_break: TieBreak::ConfidenceFirst,
            coalesce_gap: 0,
        });
        let split = vec![
            detection(16, 20, PiiType::PersonName, 0.7, DetectorSource::Ner),
            detection(21, 24, PiiType::PersonName, 0.7, DetectorSource::Ner),
        ];
        assert_eq!(disabled.reconcile(text, split).annotations.len(), 2);
    }

    #[test]
    fn test_structured_neighbours_not_coalesced() {
        let text = "a@x.io b@x.io";
        let emails = vec![
            detection(0, 6, PiiType::Email, 0.95, DetectorSource::Regex),
            detection(7, 13, PiiType::Email, 0.95, DetectorSource::Regex),
        ];
        let result = SpanReconciler::default().reconcile(text, emails);
        let spans: Vec<Span> = result.annotations.iter().map(|a| a.span).collect();
        assert_eq!(spans, vec![Span::new(0, 6), Span::new(7, 13)]);

        let text = "555-123-4567 555-987-6543";
        let phones = vec![
            detection(0, 12, PiiType::Phone, 0.8, DetectorSource::Regex),
            detection(13, 25, PiiType::Phone, 0.8, DetectorSource::Regex),
        ];
        assert_eq!(SpanReconciler::default().reconcile(text, phones).annotations.len(), 2);
    }

    #[test]
    fn test_coalesce_split_organization_and_location() {
        let text = "Acme Corp in New York";
        let detections = vec![
            detection(0, 4, PiiType::Organization, 0.7, DetectorSource::Framework),
            detection(5, 9, PiiType::Organization, 0.7, DetectorSource::Framework),
            detection(13, 16, PiiType::Location, 0.8, DetectorSource::Framework),
            detection(17, 21, PiiType::Location, 0.8, DetectorSource::Framework),
        ];
        let result = SpanReconciler::default().reconcile(text, detections);
        let spans: Vec<Span> = result.annotations.iter().map(|a| a.span).collect();
        assert_eq!(spans, vec![Span::new(0, 9), Span::new(13, 21)]);
    }

    #[test]
    fn test_no_confidence_floor() {
        let detections = vec![detection(0, 4, PiiType::PersonName, 0.01, DetectorSource::Ner)];
        let result = SpanReconciler::default().reconcile("John", detections);
        assert_eq!(result.annotations.len(), 1);
    }

    #[test]
    fn test_random_inputs_never_overlap_and_are_order_independent() {
        const LABELS: [PiiType; 4] = [
            PiiType::PersonName,
            PiiType::Location,
            PiiType::Email,
            PiiType::Organization,
        ];
        const SOURCES: [DetectorSource; 3] = [
            DetectorSource::Regex,
            DetectorSource::Ner,
            DetectorSource::Framework,
        ];

        let text = "a".repeat(120);
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let count = rng.gen_range(0..25);
            let mut detections: Vec<Detection> = (0..count)
                .map(|_| {
                    let start = rng.gen_range(0..130);
                    let end = rng.gen_range(0..130);
                    let label = LABELS[rng.gen_range(0..LABELS.len())];
                    let source = SOURCES[rng.gen_range(0..SOURCES.len())];
                    let confidence = (rng.gen_range(0..=10) as f32) / 10.0;
                    detection(start, end, label, confidence, source)
                })
                .collect();

            for tie_break in [TieBreak::ConfidenceFirst, TieBreak::PriorityFirst] {
                let forward = reconciler(tie_break).reconcile(&text, detections.clone());
                for pair in forward.annotations.windows(2) {
                    assert!(pair[0].span.end <= pair[1].span.start);
                }
                assert!(forward.annotations.iter().all(|a| a.span.is_valid_for(&text)));

                detections.reverse();
                let backward = reconciler(tie_break).reconcile(&text, detections.clone());
                assert_eq!(forward.annotations, backward.annotations);
                assert_eq!(forward.invalid, backward.invalid);
            }
        }
    }
}
