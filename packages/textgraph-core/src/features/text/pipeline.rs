//! Sentencize / tokenize steps that grow a text DAG
//!
//! Each step returns a new DAG and leaves its input untouched. A step only
//! expands leaves, so running the same step twice does not duplicate work.

use super::{TextFeatures, TextNode};
use crate::errors::Result;
use crate::features::dag::Dag;
use crate::features::fold::cata;
use crate::features::search::AttributeKey;
use crate::shared::models::{GraphNode, NodeId};

pub const SENTENCIZE: &str = "sentencize";
pub const TOKENIZE: &str = "tokenize";

#[derive(Debug, Clone, Default)]
pub struct TextPipeline<T> {
    features: T,
}

impl<T: TextFeatures> TextPipeline<T> {
    pub fn new(features: T) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &T {
        &self.features
    }

    /// Singleton DAG holding the raw document
    pub fn document(&self, text: impl Into<String>) -> Dag<TextNode> {
        Dag::singleton(TextNode::Document { text: text.into() })
    }

    /// Split every unexpanded document into sentences
    pub fn sentencize(&self, dag: &Dag<TextNode>) -> Result<Dag<TextNode>> {
        self.expand(dag, SENTENCIZE, |node| matches!(node, TextNode::Document { .. }), |text| {
            Ok(self
                .features
                .sentencize(text)?
                .into_iter()
                .map(|text| TextNode::Sentence { text })
                .collect())
        })
    }

    /// Split every unexpanded sentence (or unsplit document) into tokens
    pub fn tokenize(&self, dag: &Dag<TextNode>) -> Result<Dag<TextNode>> {
        self.expand(dag, TOKENIZE, |node| !node.is_token(), |text| {
            Ok(self
                .features
                .tokenize(text)?
                .into_iter()
                .map(|text| TextNode::Token { text })
                .collect())
        })
    }

    /// document → sentencize → tokenize
    pub fn run(&self, text: impl Into<String>) -> Result<Dag<TextNode>> {
        let dag = self.document(text);
        let dag = self.sentencize(&dag)?;
        self.tokenize(&dag)
    }

    fn expand<P, S>(&self, dag: &Dag<TextNode>, operation: &str, targets: P, split: S) -> Result<Dag<TextNode>>
    where
        P: Fn(&TextNode) -> bool,
        S: Fn(&str) -> Result<Vec<TextNode>>,
    {
        let leaves: Vec<(NodeId, String)> = dag
            .get_leaves()
            .into_iter()
            .filter(|node| targets(&node.data))
            .map(|node| (node.id, node.data.text().to_string()))
            .collect();

        let mut next = dag.clone();
        for (parent, text) in leaves {
            for child in split(&text)? {
                next.insert(child, Some(&parent), Some(operation))?;
            }
        }

        tracing::debug!(
            "{}: {} -> {} nodes",
            operation,
            dag.len(),
            next.len()
        );
        Ok(next)
    }
}

/// Number of token nodes, via a bottom-up fold
pub fn count_words(dag: &Dag<TextNode>) -> Result<usize> {
    let per_root = cata(dag, |node, children: Vec<usize>| {
        usize::from(node.data.is_token()) + children.iter().sum::<usize>()
    })?;
    Ok(per_root.into_iter().sum())
}

/// Characters across all token nodes, via a bottom-up fold
pub fn count_chars(dag: &Dag<TextNode>) -> Result<usize> {
    let per_root = cata(dag, |node, children: Vec<usize>| {
        let own = if node.data.is_token() {
            node.data.text().chars().count()
        } else {
            0
        };
        own + children.iter().sum::<usize>()
    })?;
    Ok(per_root.into_iter().sum())
}

/// Search keys for a text node: `type`, `op` (when produced by an
/// operation) and lowercase `text` for tokens
pub fn text_attribute_keys(node: &GraphNode<TextNode>) -> Vec<AttributeKey> {
    let mut keys = vec![AttributeKey::new("type", node.data.kind())];
    if let Some(op) = node.operation() {
        keys.push(AttributeKey::new("op", op));
    }
    if node.data.is_token() {
        keys.push(AttributeKey::new("text", node.data.text().to_lowercase()));
    }
    keys
}
