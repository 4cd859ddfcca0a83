//! The explanation orchestrator.
//!
//! [`GraphExplainer`] owns one of each analyzer and composes their output
//! into an [`Explanation`]. Sections are independent: a failing analyzer
//! turns its own section into `{"error": ...}` and leaves the others intact.

use std::collections::BTreeMap;

use cognisgraph_core::{EntityId, Relationship, Value};
use cognisgraph_graph::KnowledgeStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::counterfactual::{
    CounterfactualConfig, CounterfactualExplainer, CounterfactualResult, CounterfactualSuggestion,
};
use crate::error::{XaiError, XaiResult};
use crate::feature_importance::{
    FeatureImportanceAnalyzer, FeatureImportanceConfig, FeatureImportanceResult,
};
use crate::query::{QueryResult, QueryStatus};
use crate::rules::{PathInfo, Pattern, Rule, RuleExtractor, RuleExtractorConfig};
use crate::saliency::{SaliencyAnalyzer, SaliencyConfig, SaliencyResult};

/// Configuration for [`GraphExplainer`].
#[derive(Debug, Clone)]
pub struct ExplainerConfig {
    /// Saliency settings.
    pub saliency: SaliencyConfig,
    /// Feature importance settings.
    pub feature_importance: FeatureImportanceConfig,
    /// Counterfactual settings.
    pub counterfactual: CounterfactualConfig,
    /// Rule extraction defaults.
    pub rules: RuleExtractorConfig,
    /// Alternatives per counterfactual list.
    /// Default: 3
    pub num_alternatives: usize,
    /// Suggestions returned by `suggest_counterfactuals`.
    /// Default: 3
    pub max_suggestions: usize,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            saliency: SaliencyConfig::default(),
            feature_importance: FeatureImportanceConfig::default(),
            counterfactual: CounterfactualConfig::default(),
            rules: RuleExtractorConfig::default(),
            num_alternatives: 3,
            max_suggestions: 3,
        }
    }
}

impl ExplainerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the saliency settings.
    #[must_use]
    pub fn with_saliency(mut self, config: SaliencyConfig) -> Self {
        self.saliency = config;
        self
    }

    /// Set the feature importance settings.
    #[must_use]
    pub fn with_feature_importance(mut self, config: FeatureImportanceConfig) -> Self {
        self.feature_importance = config;
        self
    }

    /// Set the counterfactual settings.
    #[must_use]
    pub fn with_counterfactual(mut self, config: CounterfactualConfig) -> Self {
        self.counterfactual = config;
        self
    }

    /// Set the rule extraction defaults.
    #[must_use]
    pub fn with_rules(mut self, config: RuleExtractorConfig) -> Self {
        self.rules = config;
        self
    }

    /// Set the number of alternatives per list.
    #[must_use]
    pub const fn with_num_alternatives(mut self, n: usize) -> Self {
        self.num_alternatives = n;
        self
    }
}

/// One analyzer's contribution: its result, or why it failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisSection<T> {
    /// The analyzer succeeded.
    Ok(T),
    /// The analyzer failed.
    Failed {
        /// The failure message.
        error: String,
    },
}

impl<T> AnalysisSection<T> {
    fn capture(section: &'static str, result: XaiResult<T>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(e) => {
                error!(section, error = %e, "explanation section failed");
                Self::Failed { error: e.to_string() }
            }
        }
    }

    /// The result, if the analyzer succeeded.
    pub fn ok(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }

    /// The failure message, if the analyzer failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Failed { error } => Some(error),
        }
    }
}

/// A merged explanation.
///
/// Absent sections are omitted when serialized, so an explanation that
/// failed up front serializes as `{"error": "..."}` alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Structural saliency of the involved entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saliency: Option<AnalysisSection<SaliencyResult>>,
    /// Feature importance around the entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<AnalysisSection<FeatureImportanceResult>>,
    /// Counterfactual alternatives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterfactuals: Option<AnalysisSection<CounterfactualResult>>,
    /// Set when nothing could be analyzed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Explanation {
    fn failed(error: impl Into<String>) -> Self {
        Self { error: Some(error.into()), ..Self::default() }
    }

    /// Returns `true` if the explanation failed as a whole.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The explanation as a JSON payload.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// The relationships of one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipAnalysis {
    /// Relationships pointing at the entity.
    pub incoming: Vec<Relationship>,
    /// Relationships leaving the entity, self-loops included.
    pub outgoing: Vec<Relationship>,
    /// Per type: `1 + 0.1 * sum of numeric properties` of the last
    /// relationship seen with that type. Only `Int` and `Float` values are
    /// numeric; booleans add nothing.
    pub strength: BTreeMap<String, f64>,
    /// Relationships per type.
    pub types: BTreeMap<String, usize>,
}

fn relationship_strength(relationship: &Relationship) -> f64 {
    let numeric: f64 = relationship.properties.values().filter_map(Value::as_number).sum();
    1.0 + 0.1 * numeric
}

/// Composes the analyzers into explanations.
#[derive(Debug, Clone)]
pub struct GraphExplainer {
    store: KnowledgeStore,
    config: ExplainerConfig,
    saliency: SaliencyAnalyzer,
    features: FeatureImportanceAnalyzer,
    counterfactual: CounterfactualExplainer,
    rules: RuleExtractor,
}

impl GraphExplainer {
    /// Create an explainer over a store.
    pub fn new(store: &KnowledgeStore) -> Self {
        Self::with_config(store, ExplainerConfig::default())
    }

    /// Create an explainer with a custom configuration.
    pub fn with_config(store: &KnowledgeStore, config: ExplainerConfig) -> Self {
        debug!("initializing graph explainer");
        Self {
            store: store.clone(),
            saliency: SaliencyAnalyzer::with_config(store, config.saliency.clone()),
            features: FeatureImportanceAnalyzer::with_config(
                store,
                config.feature_importance.clone(),
            ),
            counterfactual: CounterfactualExplainer::with_config(
                store,
                config.counterfactual.clone(),
            ),
            rules: RuleExtractor::with_config(store, config.rules.clone()),
            config,
        }
    }

    /// The saliency analyzer.
    pub fn saliency(&self) -> &SaliencyAnalyzer {
        &self.saliency
    }

    /// The feature importance analyzer.
    pub fn feature_importance(&self) -> &FeatureImportanceAnalyzer {
        &self.features
    }

    /// The counterfactual explainer.
    pub fn counterfactual(&self) -> &CounterfactualExplainer {
        &self.counterfactual
    }

    /// The rule extractor.
    pub fn rule_extractor(&self) -> &RuleExtractor {
        &self.rules
    }

    /// Point every analyzer at the store's current snapshot. Returns `true`
    /// if any of them changed.
    pub fn sync_graphs(&mut self) -> bool {
        let saliency = self.saliency.sync_graph();
        let features = self.features.sync_graph();
        let counterfactual = self.counterfactual.sync_graph();
        let rules = self.rules.sync_graph();
        saliency || features || counterfactual || rules
    }

    /// Clear every analyzer cache.
    pub fn clear_caches(&mut self) {
        self.saliency.clear_cache();
        self.features.clear_cache();
    }

    /// Explain a query result: saliency and counterfactuals over the entities
    /// it involves.
    ///
    /// An empty or failed result yields an explanation with only `error`.
    pub fn explain_query_result(&mut self, result: &QueryResult) -> Explanation {
        if result.is_empty() {
            warn!("cannot explain an empty query result");
            return Explanation::failed(XaiError::EmptyQueryResult.to_string());
        }
        if result.status == QueryStatus::Error {
            let message = result.error.clone().unwrap_or_else(|| "Unknown error".to_owned());
            warn!(query = %result.query, error = %message, "cannot explain a failed query");
            return Explanation::failed(XaiError::QueryFailed(message).to_string());
        }

        let entities = result.involved_entities();
        info!(query = %result.query, entities = entities.len(), "explaining query result");
        self.saliency.sync_graph();
        self.counterfactual.sync_graph();

        let saliency = self.saliency.try_analyze(Some(entities.as_slice()));
        let counterfactuals = self.counterfactual.generate_counterfactuals(
            &result.query,
            result,
            self.config.num_alternatives,
        );
        Explanation {
            saliency: Some(AnalysisSection::capture("saliency", saliency)),
            counterfactuals: Some(AnalysisSection::capture("counterfactuals", counterfactuals)),
            ..Explanation::default()
        }
    }

    /// Explain one entity: its saliency and the feature importance of its
    /// neighborhood.
    ///
    /// An unknown entity yields an explanation with only `error`, and no
    /// analyzer runs.
    pub fn explain_entity(&mut self, entity_id: &str) -> Explanation {
        if !self.store.contains(entity_id) {
            let err = XaiError::EntityNotFound(EntityId::new(entity_id));
            error!(error = %err, "cannot explain entity");
            return Explanation::failed(err.to_string());
        }

        info!(entity = entity_id, "explaining entity");
        self.saliency.sync_graph();
        self.features.sync_graph();

        let target = [EntityId::new(entity_id)];
        let saliency = self.saliency.try_analyze(Some(&target[..]));
        let features = self.features.try_analyze(Some(&target[..]));
        Explanation {
            saliency: Some(AnalysisSection::capture("saliency", saliency)),
            feature_importance: Some(AnalysisSection::capture("feature_importance", features)),
            ..Explanation::default()
        }
    }

    /// Unverified edits that might change `query_result`.
    pub fn suggest_counterfactuals(
        &mut self,
        query_result: &QueryResult,
    ) -> Vec<CounterfactualSuggestion> {
        self.counterfactual.sync_graph();
        self.counterfactual.suggest(
            &query_result.query,
            query_result,
            &QueryResult::default(),
            self.config.max_suggestions,
        )
    }

    /// Incoming and outgoing relationships of an entity with per-type
    /// strength and counts.
    pub fn analyze_relationships(&self, entity_id: &str) -> XaiResult<RelationshipAnalysis> {
        if !self.store.contains(entity_id) {
            return Err(XaiError::EntityNotFound(EntityId::new(entity_id)));
        }
        let mut analysis = RelationshipAnalysis::default();
        for relationship in self.store.get_relationships(entity_id) {
            let strength = relationship_strength(&relationship);
            analysis.strength.insert(relationship.rel_type.clone(), strength);
            *analysis.types.entry(relationship.rel_type.clone()).or_insert(0) += 1;
            if relationship.source.as_str() == entity_id {
                analysis.outgoing.push(relationship);
            } else {
                analysis.incoming.push(relationship);
            }
        }
        Ok(analysis)
    }

    /// Rules around an entity; see [`RuleExtractor::extract_rules`].
    pub fn extract_rules(&mut self, entity_id: &str, depth: Option<usize>) -> Vec<Rule> {
        self.rules.sync_graph();
        self.rules.extract_rules(entity_id, depth)
    }

    /// Patterns of a type; see [`RuleExtractor::extract_patterns`].
    pub fn extract_patterns(&mut self, entity_type: &str) -> Vec<Pattern> {
        self.rules.sync_graph();
        self.rules.extract_patterns(entity_type)
    }

    /// Paths between two types; see [`RuleExtractor::extract_common_paths`].
    pub fn extract_common_paths(
        &mut self,
        source_type: &str,
        target_type: &str,
        max_length: Option<usize>,
    ) -> Vec<PathInfo> {
        self.rules.sync_graph();
        self.rules.extract_common_paths(source_type, target_type, max_length)
    }
}
