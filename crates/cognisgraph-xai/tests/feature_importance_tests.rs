//! Integration tests for the feature importance analyzer.

use cognisgraph_core::{Entity, EntityId, Relationship, Value};
use cognisgraph_graph::{Graph, KnowledgeStore};
use cognisgraph_xai::{FeatureImportanceAnalyzer, FeatureImportanceResult};

const EPS: f64 = 1e-9;

/// alice, bob (Person) -works_at-> acme (Company)
fn people_store() -> KnowledgeStore {
    let graph = Graph::from_parts(
        [
            Entity::new("alice", "Person")
                .with_property("name", "Alice")
                .with_property("age", 30i64),
            Entity::new("bob", "Person")
                .with_property("name", "Bob")
                .with_property("age", 30i64)
                .with_property("city", "Oslo"),
            Entity::new("acme", "Company").with_property("name", "Acme"),
        ],
        [
            Relationship::new("alice", "acme", "works_at"),
            Relationship::new("bob", "acme", "works_at"),
        ],
    )
    .expect("valid test graph");
    KnowledgeStore::from_graph(graph)
}

#[test]
fn empty_graph_gives_zero_scores() {
    let analyzer = FeatureImportanceAnalyzer::new(&KnowledgeStore::new());
    let result = analyzer.analyze(None);
    assert_eq!(result, FeatureImportanceResult::default());

    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({
            "importance_scores": {"type": 0.0, "properties": 0.0, "relationships": 0.0},
            "ranked_features": [],
            "confidence_scores": {"type": 0.0, "properties": 0.0, "relationships": 0.0}
        })
    );
}

#[test]
fn unknown_entities_give_zero_scores() {
    let analyzer = FeatureImportanceAnalyzer::new(&people_store());
    assert_eq!(
        analyzer.analyze(Some(&[EntityId::from("ghost")])),
        FeatureImportanceResult::default()
    );
}

#[test]
fn whole_graph_category_scores() {
    let analyzer = FeatureImportanceAnalyzer::new(&people_store());
    let result = analyzer.analyze(None);

    assert!((result.importance_scores.entity_type - 0.2).abs() < EPS);
    assert!((result.importance_scores.properties - 0.4).abs() < EPS);
    assert!((result.importance_scores.relationships - 4.0 / 30.0).abs() < EPS);

    assert!((result.confidence_scores.entity_type - 0.027).abs() < EPS);
    assert!((result.confidence_scores.properties - 0.024).abs() < EPS);
    assert!((result.confidence_scores.relationships - 0.0255).abs() < EPS);
    assert!(result.error.is_none());
}

#[test]
fn ranked_features_normalized_by_most_common_key() {
    let analyzer = FeatureImportanceAnalyzer::new(&people_store());
    let ranked = analyzer.analyze(None).ranked_features;

    let keys: Vec<_> = ranked.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["name", "age", "city"]);
    assert!((ranked[0].1 - 1.0).abs() < EPS);
    assert!((ranked[1].1 - 2.0 / 3.0).abs() < EPS);
    assert!((ranked[2].1 - 1.0 / 3.0).abs() < EPS);
}

#[test]
fn entity_scope_is_one_hop_neighborhood() {
    let analyzer = FeatureImportanceAnalyzer::new(&people_store());
    let result = analyzer.analyze(Some(&[EntityId::from("alice")]));

    // alice and acme; bob is two hops away
    assert!((result.importance_scores.entity_type - 0.2).abs() < EPS);
    assert!((result.importance_scores.properties - 0.3).abs() < EPS);
    assert!((result.importance_scores.relationships - 0.1).abs() < EPS);
    assert!((result.confidence_scores.entity_type - 0.018).abs() < EPS);
}

#[test]
fn confidence_saturates_with_size() {
    let mut graph = Graph::new();
    for i in 0..150 {
        graph.insert_entity(Entity::new(format!("n{i}"), "Node")).expect("unique id");
    }
    let analyzer = FeatureImportanceAnalyzer::new(&KnowledgeStore::from_graph(graph));
    let result = analyzer.analyze(None);
    assert!((result.confidence_scores.entity_type - 0.9).abs() < EPS);
    assert!((result.confidence_scores.properties - 0.8).abs() < EPS);
    assert!((result.confidence_scores.relationships - 0.85).abs() < EPS);
}

#[test]
fn entity_importance_blends_centrality_and_features() {
    let mut analyzer = FeatureImportanceAnalyzer::new(&people_store());
    let scores = analyzer.calculate_importance("alice");

    let keys: Vec<_> = scores.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "betweenness_centrality",
            "closeness_centrality",
            "combination_age_name",
            "degree_centrality",
            "eigenvector_centrality",
            "feature_age",
            "feature_name",
        ]
    );
    // bob shares alice's age but not her name
    assert!((scores["feature_age"] - 1.0).abs() < EPS);
    assert!(scores["feature_name"].abs() < EPS);
    assert!(scores["combination_age_name"].abs() < EPS);
    assert!((scores["degree_centrality"] - 0.5).abs() < EPS);
}

#[test]
fn non_scalar_properties_only_enter_combinations() {
    let store = people_store();
    let carol =
        Entity::new("carol", "Person").with_property("tags", Value::Array(vec!["x".into()]));
    store.add_entity(carol).expect("insert");
    let mut analyzer = FeatureImportanceAnalyzer::new(&store);
    let scores = analyzer.calculate_importance("carol");
    assert!(!scores.contains_key("feature_tags"));
    assert!(!scores.keys().any(|k| k.starts_with("combination_")));
}

#[test]
fn property_without_peers_scores_zero() {
    let mut analyzer = FeatureImportanceAnalyzer::new(&people_store());
    let scores = analyzer.calculate_importance("bob");
    assert!(scores["feature_city"].abs() < EPS);
}

#[test]
fn unknown_entity_importance_is_empty() {
    let mut analyzer = FeatureImportanceAnalyzer::new(&people_store());
    assert!(analyzer.calculate_importance("ghost").is_empty());
    assert_eq!(analyzer.cache_len(), 0);
}

#[test]
fn importance_is_memoized_until_cleared() {
    let store = people_store();
    let mut analyzer = FeatureImportanceAnalyzer::new(&store);
    let first = analyzer.calculate_importance("alice");
    // one centrality record, two values, one combination
    assert_eq!(analyzer.cache_len(), 4);

    store.add_entity(Entity::new("dave", "Person").with_property("age", 41i64)).expect("insert");
    assert!(analyzer.sync_graph());
    assert_eq!(analyzer.calculate_importance("alice"), first);

    analyzer.clear_cache();
    assert_eq!(analyzer.cache_len(), 0);
    let refreshed = analyzer.calculate_importance("alice");
    assert!((refreshed["feature_age"] - 0.5).abs() < EPS);
}
