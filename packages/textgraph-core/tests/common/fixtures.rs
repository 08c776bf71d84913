use textgraph_core::{AggregationConfig, CorpusAggregator, Document, TextFeatureExtractor, WhitespaceTextFeatures};

/// Three short documents sharing "the"; docs 1 and 3 also share "cat"
pub fn cat_dog_corpus() -> Vec<Document> {
    vec![
        Document::new("doc1", "the cat sat"),
        Document::new("doc2", "the dog ran"),
        Document::new("doc3", "the cat ran"),
    ]
}

pub fn whitespace_extractor() -> TextFeatureExtractor<WhitespaceTextFeatures> {
    TextFeatureExtractor::new(WhitespaceTextFeatures)
}

pub fn aggregator(batch_size: usize, concurrency: usize) -> CorpusAggregator {
    CorpusAggregator::new(AggregationConfig::new(batch_size, concurrency)).expect("valid aggregation config")
}

/// Documents built from word indices into a small fixed vocabulary
pub fn documents_from_indices(docs: &[Vec<usize>]) -> Vec<Document> {
    const WORDS: [&str; 8] = ["alpha", "beta", "gamma", "delta", "the", "cat", "dog", "ran"];
    docs.iter()
        .enumerate()
        .map(|(i, words)| {
            let text = words
                .iter()
                .map(|w| WORDS[w % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" ");
            Document::new(format!("doc{}", i), text)
        })
        .collect()
}
