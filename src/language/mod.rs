//! Language module: deciding whether an account writes in the target language
//!
//! - `Classifier`: per-post language detection
//! - `ScriptClassifier`: detection by dominant Unicode script
//! - `LanguageGate`: per-batch ratio and accept/reject decision

mod gate;
mod script;

pub use gate::{LanguageGate, LanguageVerdict};
pub use script::ScriptClassifier;

/// Detects the language of a single post
pub trait Classifier: Send + Sync {
    /// Returns a best-guess language tag, or `None` if the text cannot be placed
    fn detect(&self, text: &str) -> Option<String>;
}
