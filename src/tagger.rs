//! Optional named-entity tagger consulted when the heuristics come up empty.
//!
//! Inject an [`Arc<dyn EntityTagger>`](std::sync::Arc) via
//! [`crate::config::ExtractionConfigBuilder::tagger`]. The pipeline asks it
//! for person and place candidates only after the regex heuristics failed to
//! find a name or location, and it validates every candidate it gets back, so
//! a noisy tagger cannot inject a malformed value. With no tagger configured
//! those fields simply stay `None`.
//!
//! # Example
//!
//! ```rust
//! use resume2json::{EntityTagger, ExtractionConfig, parse_text};
//! use std::sync::Arc;
//!
//! struct Fixed;
//!
//! impl EntityTagger for Fixed {
//!     fn person_names(&self, _text: &str) -> Vec<String> {
//!         vec!["Ada Lovelace".to_string()]
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .tagger(Arc::new(Fixed) as Arc<dyn EntityTagger>)
//!     .build()
//!     .unwrap();
//! let doc = parse_text("ada@example.org\nEXPERIENCE\nEngineer 2020 - 2021", &config);
//! assert_eq!(doc.record().unwrap().contact.name.as_deref(), Some("Ada Lovelace"));
//! ```

use std::sync::Arc;

/// A capability that labels spans of text as people or places.
///
/// Implementations must be `Send + Sync`: one tagger is shared by every
/// worker of a batch. Both methods default to "nothing found".
pub trait EntityTagger: Send + Sync {
    /// Person-name candidates in document order.
    fn person_names(&self, text: &str) -> Vec<String> {
        let _ = text;
        Vec::new()
    }

    /// Geographic place candidates (cities, regions) in document order.
    fn places(&self, text: &str) -> Vec<String> {
        let _ = text;
        Vec::new()
    }
}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type SharedTagger = Arc<dyn EntityTagger>;
