use crate::language::Classifier;
use crate::models::Post;
use std::sync::Arc;

/// Outcome of running one post batch through the gate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageVerdict {
    /// Posts classified as the target language
    pub matching: usize,

    /// Posts in the batch
    pub total: usize,

    /// `matching / total`, or 0 for an empty batch
    pub ratio: f64,

    /// Whether `ratio` strictly exceeds the threshold
    pub accepted: bool,
}

/// Accept/reject filter based on the share of posts in the target language
#[derive(Clone)]
pub struct LanguageGate {
    classifier: Arc<dyn Classifier>,
    target: String,
    threshold: f64,
}

impl LanguageGate {
    /// Creates a gate for `target` that accepts ratios strictly above `threshold`
    pub fn new(classifier: Arc<dyn Classifier>, target: &str, threshold: f64) -> Self {
        Self {
            classifier,
            target: target.to_lowercase(),
            threshold,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classifies every post and computes the verdict for the batch
    ///
    /// A post the classifier cannot place counts as not matching. An empty
    /// batch is rejected without dividing.
    pub fn evaluate(&self, posts: &[Post]) -> LanguageVerdict {
        let total = posts.len();
        if total == 0 {
            return LanguageVerdict {
                matching: 0,
                total: 0,
                ratio: 0.0,
                accepted: false,
            };
        }

        let matching = posts
            .iter()
            .filter(|post| {
                self.classifier
                    .detect(&post.text)
                    .is_some_and(|tag| tag.eq_ignore_ascii_case(&self.target))
            })
            .count();

        let ratio = matching as f64 / total as f64;

        LanguageVerdict {
            matching,
            total,
            ratio,
            accepted: ratio > self.threshold,
        }
    }
}
