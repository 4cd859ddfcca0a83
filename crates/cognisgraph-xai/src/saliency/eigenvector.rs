//! Eigenvector centrality with an explicit fallback sequence.
//!
//! Power iteration can fail to converge. Instead of nested retries the
//! resolver walks a fixed sequence of stages and stops at the first one that
//! yields scores:
//!
//! 1. `Default` - the standard iteration budget
//! 2. `Relaxed` - more iterations, looser tolerance
//! 3. `VeryRelaxed` - more iterations again, looser still
//! 4. `WeightedFallback` - 0.6 * PageRank + 0.4 * degree centrality
//! 5. `DegreeFallback` - degree centrality as is

use cognisgraph_graph::analytics::{
    EigenvectorCentrality, EigenvectorCentralityConfig, PageRank, PageRankConfig, ScoreMap,
};
use cognisgraph_graph::Graph;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{XaiError, XaiResult};

/// A step in the eigenvector fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EigenvectorStage {
    /// Power iteration with the default budget.
    Default,
    /// Power iteration with a larger budget and looser tolerance.
    Relaxed,
    /// Power iteration with the largest budget and loosest tolerance.
    VeryRelaxed,
    /// Blend of PageRank and degree centrality.
    WeightedFallback,
    /// Degree centrality.
    DegreeFallback,
}

impl EigenvectorStage {
    /// The stage tried after this one fails, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Default => Some(Self::Relaxed),
            Self::Relaxed => Some(Self::VeryRelaxed),
            Self::VeryRelaxed => Some(Self::WeightedFallback),
            Self::WeightedFallback => Some(Self::DegreeFallback),
            Self::DegreeFallback => None,
        }
    }

    /// Returns `true` for stages that are not a true eigenvector computation.
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::WeightedFallback | Self::DegreeFallback)
    }
}

/// Parameters for every stage of the fallback sequence.
#[derive(Debug, Clone)]
pub struct EigenvectorPolicy {
    /// `Default` stage: 500 iterations, tolerance 1e-5.
    pub default: EigenvectorCentralityConfig,
    /// `Relaxed` stage: 1000 iterations, tolerance 1e-4.
    pub relaxed: EigenvectorCentralityConfig,
    /// `VeryRelaxed` stage: 5000 iterations, tolerance 1e-3.
    pub very_relaxed: EigenvectorCentralityConfig,
    /// PageRank used by the weighted fallback.
    pub pagerank: PageRankConfig,
    /// Weight of PageRank in the blend.
    /// Default: 0.6
    pub pagerank_weight: f64,
    /// Weight of degree centrality in the blend.
    /// Default: 0.4
    pub degree_weight: f64,
}

impl Default for EigenvectorPolicy {
    fn default() -> Self {
        let base = EigenvectorCentralityConfig::default();
        Self {
            default: base.clone().with_max_iterations(500).with_tolerance(1e-5),
            relaxed: base.clone().with_max_iterations(1000).with_tolerance(1e-4),
            very_relaxed: base.with_max_iterations(5000).with_tolerance(1e-3),
            pagerank: PageRankConfig::default(),
            pagerank_weight: 0.6,
            degree_weight: 0.4,
        }
    }
}

impl EigenvectorPolicy {
    /// Create a policy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the same power-iteration config for all three eigenvector stages.
    #[must_use]
    pub fn with_all_attempts(mut self, config: EigenvectorCentralityConfig) -> Self {
        self.default = config.clone();
        self.relaxed = config.clone();
        self.very_relaxed = config;
        self
    }

    /// Set the PageRank config used by the weighted fallback.
    #[must_use]
    pub fn with_pagerank(mut self, config: PageRankConfig) -> Self {
        self.pagerank = config;
        self
    }

    /// Set the blend weights.
    #[must_use]
    pub const fn with_blend_weights(mut self, pagerank: f64, degree: f64) -> Self {
        self.pagerank_weight = pagerank;
        self.degree_weight = degree;
        self
    }

    fn attempt_config(&self, stage: EigenvectorStage) -> Option<&EigenvectorCentralityConfig> {
        match stage {
            EigenvectorStage::Default => Some(&self.default),
            EigenvectorStage::Relaxed => Some(&self.relaxed),
            EigenvectorStage::VeryRelaxed => Some(&self.very_relaxed),
            EigenvectorStage::WeightedFallback | EigenvectorStage::DegreeFallback => None,
        }
    }
}

/// Scores together with the stage that produced them.
#[derive(Debug, Clone)]
pub struct EigenvectorOutcome {
    /// Per-node scores in [0, 1].
    pub scores: ScoreMap,
    /// The first stage that succeeded.
    pub stage: EigenvectorStage,
}

/// Runs the fallback sequence.
pub struct EigenvectorResolver;

impl EigenvectorResolver {
    /// Resolve eigenvector scores for every node.
    ///
    /// `degree` is the already-computed degree centrality; without it the two
    /// fallback stages cannot run. Fails only when every stage fails.
    pub fn resolve(
        graph: &Graph,
        policy: &EigenvectorPolicy,
        degree: Option<&ScoreMap>,
    ) -> XaiResult<EigenvectorOutcome> {
        let mut stage = EigenvectorStage::Default;
        loop {
            match Self::attempt(graph, policy, degree, stage) {
                Ok(scores) => {
                    debug!(?stage, "eigenvector centrality resolved");
                    return Ok(EigenvectorOutcome { scores, stage });
                }
                Err(reason) => match stage.next() {
                    Some(next) => {
                        warn!(?stage, ?next, %reason, "eigenvector stage failed, escalating");
                        stage = next;
                    }
                    None => {
                        return Err(XaiError::MeasureFailed {
                            measure: "eigenvector_centrality",
                            reason,
                        });
                    }
                },
            }
        }
    }

    fn attempt(
        graph: &Graph,
        policy: &EigenvectorPolicy,
        degree: Option<&ScoreMap>,
        stage: EigenvectorStage,
    ) -> Result<ScoreMap, String> {
        if let Some(config) = policy.attempt_config(stage) {
            let result = EigenvectorCentrality::compute(graph, config).map_err(|e| e.to_string())?;
            if !result.converged {
                return Err(format!(
                    "did not converge after {} iterations (delta {:.3e})",
                    result.iterations, result.final_delta
                ));
            }
            return Ok(result.scores);
        }

        let degree = degree.ok_or_else(|| "degree centrality unavailable".to_owned())?;
        if stage == EigenvectorStage::DegreeFallback {
            return Ok(degree.clone());
        }

        let pagerank = PageRank::compute(graph, &policy.pagerank).map_err(|e| e.to_string())?;
        if !pagerank.converged {
            return Err(format!(
                "pagerank did not converge after {} iterations",
                pagerank.iterations
            ));
        }
        Ok(degree
            .iter()
            .map(|(id, d)| {
                let pr = pagerank.scores.get(id.as_str()).unwrap_or(0.0);
                let blended = policy.pagerank_weight * pr + policy.degree_weight * d;
                (id.clone(), blended.clamp(0.0, 1.0))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use cognisgraph_core::{Entity, Relationship};
    use cognisgraph_graph::analytics::{DegreeCentrality, DegreeCentralityConfig};

    use super::*;

    fn chain() -> Graph {
        Graph::from_parts(
            ["a", "b", "c"].map(|id| Entity::new(id, "Node")),
            [Relationship::new("a", "b", "x"), Relationship::new("b", "c", "x")],
        )
        .expect("valid graph")
    }

    fn degree(graph: &Graph) -> ScoreMap {
        DegreeCentrality::compute(graph, &DegreeCentralityConfig::default()).expect("ok").scores
    }

    fn starved() -> EigenvectorCentralityConfig {
        EigenvectorCentralityConfig::new().with_max_iterations(1).with_tolerance(0.0)
    }

    #[test]
    fn stage_sequence_is_finite() {
        let mut stage = EigenvectorStage::Default;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            seen.push(next);
            stage = next;
        }
        assert_eq!(
            seen,
            vec![
                EigenvectorStage::Default,
                EigenvectorStage::Relaxed,
                EigenvectorStage::VeryRelaxed,
                EigenvectorStage::WeightedFallback,
                EigenvectorStage::DegreeFallback,
            ]
        );
        assert!(EigenvectorStage::WeightedFallback.is_fallback());
        assert!(!EigenvectorStage::Relaxed.is_fallback());
    }

    #[test]
    fn default_policy_parameters() {
        let policy = EigenvectorPolicy::default();
        assert_eq!(policy.default.max_iterations, 500);
        assert_eq!(policy.relaxed.max_iterations, 1000);
        assert_eq!(policy.very_relaxed.max_iterations, 5000);
        assert!((policy.very_relaxed.tolerance - 1e-3).abs() < f64::EPSILON);
        assert!((policy.pagerank_weight - 0.6).abs() < f64::EPSILON);
        assert!((policy.degree_weight - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn converging_graph_stops_at_default() {
        let graph = chain();
        let degree = degree(&graph);
        let policy = EigenvectorPolicy::default();
        let outcome =
            EigenvectorResolver::resolve(&graph, &policy, Some(&degree)).expect("resolved");
        assert_eq!(outcome.stage, EigenvectorStage::Default);
    }

    #[test]
    fn non_convergence_escalates_to_weighted_blend() {
        let graph = chain();
        let degree = degree(&graph);
        let policy = EigenvectorPolicy::default().with_all_attempts(starved());
        let outcome =
            EigenvectorResolver::resolve(&graph, &policy, Some(&degree)).expect("resolved");

        assert_eq!(outcome.stage, EigenvectorStage::WeightedFallback);
        let pr = PageRank::compute(&graph, &policy.pagerank).expect("ok");
        let expected = 0.6 * pr.scores.get("b").expect("b") + 0.4 * degree.get("b").expect("b");
        assert!((outcome.scores.get("b").expect("b") - expected).abs() < 1e-12);
    }

    #[test]
    fn failed_blend_falls_back_to_degree() {
        let graph = chain();
        let degree = degree(&graph);
        let policy = EigenvectorPolicy::default()
            .with_all_attempts(starved())
            .with_pagerank(PageRankConfig::new().with_max_iterations(1).with_tolerance(0.0));
        let outcome =
            EigenvectorResolver::resolve(&graph, &policy, Some(&degree)).expect("resolved");

        assert_eq!(outcome.stage, EigenvectorStage::DegreeFallback);
        assert_eq!(outcome.scores, degree);
    }

    #[test]
    fn exhausted_sequence_is_an_error() {
        let graph = chain();
        let policy = EigenvectorPolicy::default().with_all_attempts(starved());
        let err = EigenvectorResolver::resolve(&graph, &policy, None);
        assert!(matches!(
            err,
            Err(XaiError::MeasureFailed { measure: "eigenvector_centrality", .. })
        ));
    }
}
