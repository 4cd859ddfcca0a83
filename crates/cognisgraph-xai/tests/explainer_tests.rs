//! Integration tests for the explanation orchestrator.

use cognisgraph_core::{Entity, EntityId, Relationship};
use cognisgraph_graph::{Graph, KnowledgeStore};
use cognisgraph_xai::explainer::ExplainerConfig;
use cognisgraph_xai::{AnalysisSection, GraphExplainer, QueryResult, SaliencyConfig, XaiError};

fn store() -> KnowledgeStore {
    let graph = Graph::from_parts(
        [
            Entity::new("rust", "Language").with_property("year", 2015i64),
            Entity::new("cargo", "Tool"),
            Entity::new("llvm", "Tool"),
        ],
        [
            Relationship::new("cargo", "rust", "built_with").with_property("weight", 3i64),
            Relationship::new("rust", "llvm", "depends_on"),
            Relationship::new("llvm", "rust", "supports"),
        ],
    )
    .expect("valid test graph");
    KnowledgeStore::from_graph(graph)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// ============================================================================
// explain_entity
// ============================================================================

#[test]
fn scenario_c_missing_entity() {
    init_tracing();
    let mut explainer = GraphExplainer::new(&store());
    let explanation = explainer.explain_entity("missing");

    let json = explanation.to_json().expect("serialize");
    assert_eq!(json, serde_json::json!({"error": "Entity ID 'missing' not found."}));
    assert!(explanation.is_error());
    assert_eq!(explainer.saliency().cache_len(), 0);
    assert_eq!(explainer.feature_importance().cache_len(), 0);
}

#[test]
fn explain_entity_merges_saliency_and_features() {
    let mut explainer = GraphExplainer::new(&store());
    let explanation = explainer.explain_entity("rust");

    assert!(explanation.error.is_none());
    assert!(explanation.counterfactuals.is_none());
    let saliency = explanation.saliency.as_ref().and_then(AnalysisSection::ok).expect("saliency");
    assert_eq!(saliency.centrality_scores.len(), 1);
    assert!(saliency.centrality_scores.contains_key(&EntityId::from("rust")));

    let features =
        explanation.feature_importance.as_ref().and_then(AnalysisSection::ok).expect("features");
    // rust plus its neighbors cargo and llvm
    assert!((features.importance_scores.entity_type - 0.2).abs() < 1e-9);
}

#[test]
fn explain_entity_resyncs_after_store_write() {
    let store = store();
    let mut explainer = GraphExplainer::new(&store);
    store.add_entity(Entity::new("clippy", "Tool")).expect("insert");
    store.add_relationship(Relationship::new("clippy", "rust", "lints")).expect("insert");

    let explanation = explainer.explain_entity("clippy");
    let saliency = explanation.saliency.as_ref().and_then(AnalysisSection::ok).expect("saliency");
    assert!(saliency.centrality_scores.contains_key(&EntityId::from("clippy")));
    assert_eq!(explainer.saliency().graph().node_count(), 4);
    assert_eq!(explainer.feature_importance().graph().node_count(), 4);
}

// ============================================================================
// explain_query_result
// ============================================================================

#[test]
fn empty_query_result_is_an_error() {
    let mut explainer = GraphExplainer::new(&store());
    let explanation = explainer.explain_query_result(&QueryResult::default());
    let json = explanation.to_json().expect("serialize");
    assert_eq!(json, serde_json::json!({"error": "Empty query result"}));
}

#[test]
fn failed_query_result_carries_its_message() {
    let mut explainer = GraphExplainer::new(&store());
    let explanation = explainer.explain_query_result(&QueryResult::failure("q", "parser exploded"));
    assert_eq!(explanation.error.as_deref(), Some("parser exploded"));
    assert!(explanation.saliency.is_none());

    let mut silent = QueryResult::failure("q", "");
    silent.error = None;
    assert_eq!(explainer.explain_query_result(&silent).error.as_deref(), Some("Unknown error"));
}

#[test]
fn query_result_explained_over_involved_entities() {
    let mut explainer = GraphExplainer::new(&store());
    let result = QueryResult::success("what builds rust?")
        .with_answer("cargo")
        .with_relationship_evidence("cargo", "rust", "built_with");
    let explanation = explainer.explain_query_result(&result);

    assert!(explanation.feature_importance.is_none());
    let saliency = explanation.saliency.as_ref().and_then(AnalysisSection::ok).expect("saliency");
    let analyzed: Vec<_> = saliency.centrality_scores.keys().map(EntityId::as_str).collect();
    assert_eq!(analyzed, vec!["cargo", "rust"]);
    assert!(saliency.path_importance.contains_key("cargo-rust"));

    let counterfactuals = explanation
        .counterfactuals
        .as_ref()
        .and_then(AnalysisSection::ok)
        .expect("counterfactuals");
    assert!(counterfactuals.max_list_len() <= 3);
    assert!(counterfactuals.path_alternatives.contains_key("cargo-rust"));
}

#[test]
fn failing_section_does_not_block_others() {
    let saliency = SaliencyConfig::new().with_max_graph_nodes(Some(1));
    let config = ExplainerConfig::new().with_saliency(saliency);
    let mut explainer = GraphExplainer::with_config(&store(), config);
    let result = QueryResult::success("q").with_entity("rust").with_entity("llvm");
    let explanation = explainer.explain_query_result(&result);

    let saliency = explanation.saliency.as_ref().expect("saliency section");
    assert_eq!(saliency.error(), Some("graph too large: 3 nodes exceeds limit of 1"));
    assert!(explanation.counterfactuals.as_ref().and_then(AnalysisSection::ok).is_some());

    let json = explanation.to_json().expect("serialize");
    assert_eq!(
        json["saliency"],
        serde_json::json!({"error": "graph too large: 3 nodes exceeds limit of 1"})
    );
}

// ============================================================================
// Supplementary operations
// ============================================================================

#[test]
fn relationship_analysis() {
    let explainer = GraphExplainer::new(&store());
    let analysis = explainer.analyze_relationships("rust").expect("known entity");

    assert_eq!(analysis.outgoing.len(), 1);
    assert_eq!(analysis.incoming.len(), 2);
    assert_eq!(analysis.types.get("built_with"), Some(&1));
    assert!((analysis.strength["built_with"] - 1.3).abs() < 1e-9);
    assert!((analysis.strength["depends_on"] - 1.0).abs() < 1e-9);

    assert!(matches!(explainer.analyze_relationships("missing"), Err(XaiError::EntityNotFound(_))));
}

#[test]
fn suggestions_are_capped_and_unverified() {
    let mut explainer = GraphExplainer::new(&store());
    let result =
        QueryResult::success("q").with_entity("rust").with_entity("llvm").with_entity("cargo");
    let suggestions = explainer.suggest_counterfactuals(&result);
    assert_eq!(suggestions.len(), 3);
    assert!(suggestions.iter().all(|s| !s.verified));
}

#[test]
fn rule_pass_throughs_see_latest_store() {
    let store = store();
    let mut explainer = GraphExplainer::new(&store);
    store.add_entity(Entity::new("rustc", "Tool")).expect("insert");
    store.add_relationship(Relationship::new("rustc", "llvm", "built_with")).expect("insert");

    let patterns = explainer.extract_patterns("Tool");
    let total: usize = patterns.iter().map(|p| p.count).sum();
    assert_eq!(total, 3);
    assert_eq!(explainer.extract_rules("rustc", Some(1)).len(), 1);
    assert_eq!(explainer.extract_common_paths("Tool", "Language", None).len(), 3);
}

#[test]
fn sync_reports_changes_once() {
    let store = store();
    let mut explainer = GraphExplainer::new(&store);
    assert!(!explainer.sync_graphs());
    store.add_entity(Entity::new("miri", "Tool")).expect("insert");
    assert!(explainer.sync_graphs());
    assert!(!explainer.sync_graphs());
}

#[test]
fn rejected_store_write_is_not_a_change() {
    let store = store();
    let mut explainer = GraphExplainer::new(&store);
    assert!(store.add_entity(Entity::new("rust", "Language")).is_err());
    assert!(store.add_relationship(Relationship::new("rust", "nowhere", "links")).is_err());
    assert!(!explainer.sync_graphs());
}

#[test]
fn clearing_caches_empties_both_analyzers() {
    let mut explainer = GraphExplainer::new(&store());
    explainer.explain_entity("rust");
    assert_eq!(explainer.saliency().cache_len(), 1);
    explainer.clear_caches();
    assert_eq!(explainer.saliency().cache_len(), 0);
    assert_eq!(explainer.feature_importance().cache_len(), 0);
}
