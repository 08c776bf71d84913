//! Text processing on top of the provenance DAG
//!
//! The NLP work itself lives behind [`TextFeatures`]; this module only
//! records what each step produced and where it came from.

mod pipeline;

pub use pipeline::{count_chars, count_words, text_attribute_keys, TextPipeline, SENTENCIZE, TOKENIZE};

use crate::errors::ExtractionError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Text-feature collaborator (tokenizer / sentencizer).
///
/// Treated as opaque and possibly failing; implementations may call out
/// to an external service.
pub trait TextFeatures: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, ExtractionError>;

    fn sentencize(&self, text: &str) -> Result<Vec<String>, ExtractionError>;
}

/// Run of non-terminators followed by any terminators
static SENTENCE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*").ok());

/// Whitespace tokens with surrounding punctuation trimmed; sentences split
/// after `.`, `!` or `?`. No stemming, no stopwords, case preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTextFeatures;

impl TextFeatures for WhitespaceTextFeatures {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, ExtractionError> {
        Ok(text
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn sentencize(&self, text: &str) -> Result<Vec<String>, ExtractionError> {
        let sentence = SENTENCE
            .as_ref()
            .ok_or_else(|| ExtractionError::new("sentence pattern failed to compile"))?;
        Ok(sentence
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .filter(|sentence| !sentence.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Payload of a text DAG node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TextNode {
    Document { text: String },
    Sentence { text: String },
    Token { text: String },
}

impl TextNode {
    pub fn kind(&self) -> &'static str {
        match self {
            TextNode::Document { .. } => "document",
            TextNode::Sentence { .. } => "sentence",
            TextNode::Token { .. } => "token",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            TextNode::Document { text } | TextNode::Sentence { text } | TextNode::Token { text } => text,
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self, TextNode::Token { .. })
    }
}
