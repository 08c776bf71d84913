//! Text pipeline, search index and record transport

use pretty_assertions::assert_eq;
use textgraph_core::features::text::{count_chars, count_words, text_attribute_keys, TOKENIZE};
use textgraph_core::{
    AttributeKey, CancellationToken, Dag, GraphError, SearchIndex, TextNode, TextPipeline, WhitespaceTextFeatures,
};

#[test]
fn test_search_by_type_and_operation() {
    // t1, t3: tokens; t2: punctuation, also produced by tokenize
    let mut dag = Dag::singleton("document");
    let root = dag.get_roots()[0].id;
    let t1 = dag.insert("token", Some(&root), Some(TOKENIZE)).unwrap();
    let t2 = dag.insert("punct", Some(&root), Some(TOKENIZE)).unwrap();
    let t3 = dag.insert("token", Some(&root), Some(TOKENIZE)).unwrap();

    let index = SearchIndex::from_dag(&dag, |node| {
        let mut keys = vec![AttributeKey::new("type", node.data)];
        if let Some(op) = node.operation() {
            keys.push(AttributeKey::new("op", op));
        }
        keys
    });

    let keys = [AttributeKey::new("type", "token"), AttributeKey::new("op", "tokenize")];
    assert_eq!(index.query(&keys[0]), vec![t1, t3]);
    assert_eq!(index.query(&keys[1]), vec![t1, t2, t3]);
    assert_eq!(index.query_intersection(&keys), vec![t1, t3]);
    assert_eq!(index.query_union(&keys), vec![t1, t2, t3]);
    assert!(index.query(&AttributeKey::new("type", "sentence")).is_empty());
}

#[test]
fn test_pipeline_index_and_counts() {
    let pipeline = TextPipeline::new(WhitespaceTextFeatures);
    let dag = pipeline.run("The cat sat. The dog ran!").unwrap();

    assert_eq!(count_words(&dag).unwrap(), 6);
    assert_eq!(count_chars(&dag).unwrap(), 3 + 3 + 3 + 3 + 3 + 3);

    let index = SearchIndex::from_dag(&dag, text_attribute_keys);
    assert_eq!(index.query(&AttributeKey::new("type", "sentence")).len(), 2);
    assert_eq!(index.query(&AttributeKey::new("text", "the")).len(), 2);

    let cat_tokens = index.query_intersection(&[
        AttributeKey::new("type", "token"),
        AttributeKey::new("text", "cat"),
    ]);
    assert_eq!(cat_tokens.len(), 1);

    let sentence = dag.parent(&cat_tokens[0]).unwrap().unwrap();
    assert_eq!(sentence.data, TextNode::Sentence { text: "The cat sat.".into() });
}

#[test]
fn test_text_dag_json_transport() {
    let pipeline = TextPipeline::new(WhitespaceTextFeatures);
    let dag = pipeline.run("Hello there.").unwrap();

    let json = dag.to_json().unwrap();
    assert!(json.contains(r#""type":"token""#));
    assert!(json.contains(r#""operation":"sentencize""#));

    let back: Dag<TextNode> = Dag::from_json(&json).unwrap();
    assert_eq!(back, dag);
    assert_eq!(count_words(&back).unwrap(), 2);
}

#[test]
fn test_json_with_dangling_parent_is_rejected() {
    let pipeline = TextPipeline::new(WhitespaceTextFeatures);
    let dag = pipeline.run("One two").unwrap();

    let mut records = dag.to_records();
    records.remove(0);
    assert!(matches!(
        Dag::from_records(records),
        Err(GraphError::NodeNotFound(_))
    ));
}

#[test]
fn test_cancelled_unfold_of_text() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = textgraph_core::ana_with_cancel("seed".to_string(), |s| (s, Vec::new()), &cancel);
    assert!(matches!(result, Err(GraphError::Cancelled)));
}
