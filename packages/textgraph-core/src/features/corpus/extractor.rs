//! Per-document feature extraction boundary

use crate::errors::ExtractionError;
use crate::features::text::TextFeatures;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFeatures {
    pub document_id: String,
    pub tokens: Vec<String>,
    pub sentence_count: usize,
    pub char_count: usize,
}

/// Turns one document into features. Called from worker threads, so
/// implementations must be `Sync`.
pub trait FeatureExtractor<D>: Sync {
    fn extract(&self, document: &D) -> Result<DocumentFeatures, ExtractionError>;
}

impl<D, F> FeatureExtractor<D> for F
where
    F: Fn(&D) -> Result<DocumentFeatures, ExtractionError> + Sync,
{
    fn extract(&self, document: &D) -> Result<DocumentFeatures, ExtractionError> {
        self(document)
    }
}

/// Extractor backed by a text-feature collaborator
#[derive(Debug, Clone, Default)]
pub struct TextFeatureExtractor<T> {
    features: T,
}

impl<T: TextFeatures> TextFeatureExtractor<T> {
    pub fn new(features: T) -> Self {
        Self { features }
    }
}

impl<T: TextFeatures> FeatureExtractor<Document> for TextFeatureExtractor<T> {
    fn extract(&self, document: &Document) -> Result<DocumentFeatures, ExtractionError> {
        let sentences = self
            .features
            .sentencize(&document.text)
            .map_err(|e| e.for_document(&document.id))?;
        let tokens = self
            .features
            .tokenize(&document.text)
            .map_err(|e| e.for_document(&document.id))?;

        Ok(DocumentFeatures {
            document_id: document.id.clone(),
            tokens,
            sentence_count: sentences.len(),
            char_count: document.text.chars().count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::text::WhitespaceTextFeatures;

    struct Offline;

    impl TextFeatures for Offline {
        fn tokenize(&self, _text: &str) -> Result<Vec<String>, ExtractionError> {
            Err(ExtractionError::new("tokenizer offline"))
        }

        fn sentencize(&self, text: &str) -> Result<Vec<String>, ExtractionError> {
            Ok(vec![text.to_string()])
        }
    }

    #[test]
    fn test_text_extractor() {
        let extractor = TextFeatureExtractor::new(WhitespaceTextFeatures);
        let features = extractor
            .extract(&Document::new("d1", "The cat sat. It ran!"))
            .unwrap();

        assert_eq!(features.document_id, "d1");
        assert_eq!(features.tokens, vec!["The", "cat", "sat", "It", "ran"]);
        assert_eq!(features.sentence_count, 2);
        assert_eq!(features.char_count, 20);
    }

    #[test]
    fn test_failure_names_document() {
        let extractor = TextFeatureExtractor::new(Offline);
        let err = extractor.extract(&Document::new("d9", "x")).unwrap_err();
        assert_eq!(err.document.as_deref(), Some("d9"));
    }

    #[test]
    fn test_closure_extractor() {
        let extractor = |doc: &String| -> Result<DocumentFeatures, ExtractionError> {
            Ok(DocumentFeatures {
                document_id: doc.clone(),
                tokens: doc.split('-').map(str::to_string).collect(),
                sentence_count: 1,
                char_count: doc.len(),
            })
        };
        let features = extractor.extract(&"a-b".to_string()).unwrap();
        assert_eq!(features.tokens, vec!["a", "b"]);
    }
}
