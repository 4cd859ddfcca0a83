//! Integration tests for rule, pattern, and common-path extraction.

use cognisgraph_core::{Entity, Relationship};
use cognisgraph_graph::{Graph, KnowledgeStore};
use cognisgraph_xai::rules::RuleExtractorConfig;
use cognisgraph_xai::{Pattern, RuleExtractor};

/// alice, bob (Person) -works_at-> acme (Company) -located_in-> oslo (City)
fn company_store() -> KnowledgeStore {
    let graph = Graph::from_parts(
        [
            Entity::new("alice", "Person"),
            Entity::new("bob", "Person"),
            Entity::new("acme", "Company"),
            Entity::new("oslo", "City"),
        ],
        [
            Relationship::new("alice", "acme", "works_at").with_property("since", 2019i64),
            Relationship::new("bob", "acme", "works_at"),
            Relationship::new("acme", "oslo", "located_in"),
        ],
    )
    .expect("valid test graph");
    KnowledgeStore::from_graph(graph)
}

#[test]
fn scenario_d_shared_pattern_is_counted_once() {
    let extractor = RuleExtractor::new(&company_store());
    let patterns = extractor.extract_patterns("Person");
    assert_eq!(
        patterns,
        vec![Pattern {
            source_type: "Person".into(),
            target_type: "Company".into(),
            relationship_type: "works_at".into(),
            count: 2,
        }]
    );
}

#[test]
fn unknown_type_has_no_patterns() {
    assert!(RuleExtractor::new(&company_store()).extract_patterns("Robot").is_empty());
}

#[test]
fn rules_stop_at_depth() {
    let extractor = RuleExtractor::new(&company_store());

    let rules = extractor.extract_rules("alice", Some(1));
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].target.as_str(), "acme");
    assert_eq!(rules[0].rel_type, "works_at");
    assert_eq!(rules[0].properties.len(), 1);

    let rules = extractor.extract_rules("alice", None);
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[1].source.as_str(), "acme");
    assert_eq!(rules[1].target.as_str(), "oslo");
    assert_eq!(rules[1].path_length, 2);
}

#[test]
fn sink_entity_has_no_rules() {
    assert!(RuleExtractor::new(&company_store()).extract_rules("oslo", Some(3)).is_empty());
}

#[test]
fn configured_default_depth() {
    let config = RuleExtractorConfig::new().with_default_depth(1);
    let extractor = RuleExtractor::with_config(&company_store(), config);
    assert_eq!(extractor.extract_rules("alice", None).len(), 1);
}

#[test]
fn common_paths_between_types() {
    let extractor = RuleExtractor::new(&company_store());
    let paths = extractor.extract_common_paths("Person", "City", None);

    assert_eq!(paths.len(), 2);
    for info in &paths {
        assert_eq!(info.length, 2);
        let types: Vec<_> = info.relationships.iter().map(|hop| hop.rel_type.as_str()).collect();
        assert_eq!(types, vec!["works_at", "located_in"]);
    }
    assert!(extractor.extract_common_paths("Person", "City", Some(1)).is_empty());
    assert!(extractor.extract_common_paths("City", "Person", None).is_empty());
}

#[test]
fn extractor_sees_new_data_after_sync() {
    let store = company_store();
    let mut extractor = RuleExtractor::new(&store);
    store.add_entity(Entity::new("carol", "Person")).expect("insert");
    store.add_relationship(Relationship::new("carol", "oslo", "lives_in")).expect("insert");

    assert_eq!(extractor.extract_patterns("Person").len(), 1);
    assert!(extractor.sync_graph());
    assert_eq!(extractor.extract_patterns("Person").len(), 2);
}
