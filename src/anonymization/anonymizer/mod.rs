//! Anonymization strategy module
//!
//! Rewrites reconciled annotations in one left-to-right pass. Text outside
//! annotations is copied verbatim; each annotated region is replaced through
//! a per-call [`ConsistencyCache`] so repeated values share a replacement.

pub mod adaptive;
pub mod hash;
pub mod mask;
pub mod partial;
pub mod placeholder;

use crate::anonymization::cache::{normalize, ConsistencyCache};
use crate::anonymization::config::Strategy;
use crate::anonymization::models::{AnonymizedEntity, AnonymizedText, Annotation, PiiType};
use crate::config::SecretString;
use hash::HashStrategy;
use mask::MaskStrategy;
use partial::PartialStrategy;
use placeholder::PlaceholderStrategy;

/// Trait for concrete replacement strategies
pub trait Anonymizer: Send + Sync {
    /// Produce the replacement for one distinct value
    ///
    /// `ordinal` is the 1-based first-appearance index of the value among the
    /// distinct values of `label` in the current call.
    fn replace(&self, label: PiiType, value: &str, ordinal: usize) -> String;
}

/// Applies a [`Strategy`] to a text and its annotations
pub struct StrategyEngine {
    mask: MaskStrategy,
    partial: PartialStrategy,
    placeholder: PlaceholderStrategy,
    hash: HashStrategy,
}

impl StrategyEngine {
    /// Create an engine with an explicit hash salt
    pub fn new(hash_salt: SecretString, placeholder_numbering: bool) -> Self {
        Self::with_hash(HashStrategy::new(hash_salt), placeholder_numbering)
    }

    /// Create an engine whose hash salt is random for its lifetime
    pub fn with_random_salt(placeholder_numbering: bool) -> Self {
        Self::with_hash(HashStrategy::with_random_salt(), placeholder_numbering)
    }

    fn with_hash(hash: HashStrategy, placeholder_numbering: bool) -> Self {
        Self {
            mask: MaskStrategy::new(),
            partial: PartialStrategy::new(),
            placeholder: PlaceholderStrategy::new(placeholder_numbering),
            hash,
        }
    }

    /// Resolve `strategy` for `label` to a concrete strategy and its implementation
    fn resolve(&self, strategy: Strategy, label: PiiType) -> (Strategy, &dyn Anonymizer) {
        match strategy {
            Strategy::Adaptive => self.resolve(adaptive::strategy_for(label), label),
            Strategy::Mask => (strategy, &self.mask),
            Strategy::Partial => (strategy, &self.partial),
            Strategy::Placeholder => (strategy, &self.placeholder),
            Strategy::Hash => (strategy, &self.hash),
        }
    }

    /// Rewrite `text`, replacing every annotated region
    ///
    /// `annotations` must be ordered by start. Annotations that start before
    /// the end of the previous one, or do not fit the text, are skipped.
    pub fn anonymize(
        &self,
        text: &str,
        annotations: &[Annotation],
        strategy: Strategy,
    ) -> AnonymizedText {
        let mut cache = ConsistencyCache::new();
        let mut output = String::with_capacity(text.len());
        let mut entities = Vec::with_capacity(annotations.len());
        let mut cursor = 0;

        for annotation in annotations {
            let span = annotation.span;
            let value = match span.slice(text) {
                Some(value) if span.start >= cursor && span.start < span.end => value,
                _ => {
                    tracing::warn!(
                        start = span.start,
                        end = span.end,
                        cursor,
                        label = %annotation.label,
                        "Skipping out-of-order or out-of-bounds annotation"
                    );
                    continue;
                }
            };

            output.push_str(&text[cursor..span.start]);

            let (concrete, anonymizer) = self.resolve(strategy, annotation.label);
            let replacement = cache.get_or_create(
                &normalize(value),
                annotation.label,
                concrete,
                value,
                |ordinal| anonymizer.replace(annotation.label, value, ordinal),
            );

            output.push_str(&replacement);
            entities.push(AnonymizedEntity {
                annotation: annotation.clone(),
                text: value.to_string(),
                replacement,
            });
            cursor = span.end;
        }

        output.push_str(&text[cursor..]);

        AnonymizedText {
            anonymized_text: output,
            entities,
            replacements: cache.into_records(),
        }
    }
}
