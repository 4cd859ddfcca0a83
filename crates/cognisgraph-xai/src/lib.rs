//! CognisGraph XAI
//!
//! Explains why nodes, query answers, and neighborhoods of a knowledge graph
//! matter.
//!
//! # Components
//!
//! - [`saliency`] - Centrality, path importance, and community roles
//! - [`feature_importance`] - Category scores and per-entity feature importance
//! - [`counterfactual`] - Alternative entities, relationship types, and paths
//! - [`rules`] - Rules, patterns, and typed paths around entities
//! - [`explainer`] - Composes the above into one explanation
//!
//! Every analyzer holds a [`KnowledgeStore`](cognisgraph_graph::KnowledgeStore)
//! handle and the snapshot it last synchronized with. Analyses run against
//! that snapshot until `sync_graph` is called. Caches are never invalidated
//! by a sync; call `clear_cache` after writing to the store.
//!
//! # Example
//!
//! ```ignore
//! let store = KnowledgeStore::new();
//! store.add_entity(Entity::new("rust", "Language"))?;
//!
//! let mut explainer = GraphExplainer::new(&store);
//! let explanation = explainer.explain_entity("rust");
//! println!("{}", explanation.to_json()?);
//! ```

#![deny(clippy::unwrap_used)]

pub mod counterfactual;
pub mod error;
pub mod explainer;
pub mod feature_importance;
pub mod query;
pub mod rules;
pub mod saliency;

pub use counterfactual::{
    CounterfactualConfig, CounterfactualExplainer, CounterfactualResult, CounterfactualSuggestion,
    ProposedChange,
};
pub use error::{XaiError, XaiResult};
pub use explainer::{
    AnalysisSection, Explanation, ExplainerConfig, GraphExplainer, RelationshipAnalysis,
};
pub use feature_importance::{
    FeatureImportanceAnalyzer, FeatureImportanceConfig, FeatureImportanceResult,
};
pub use query::{Evidence, QueryResult, QueryStatus};
pub use rules::{PathInfo, Pattern, Rule, RuleExtractor, RuleExtractorConfig};
pub use saliency::{
    CentralityRecord, CommunityRole, SaliencyAnalyzer, SaliencyConfig, SaliencyResult,
};
