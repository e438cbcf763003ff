use ndarray::{ArrayBase, Data, Ix1};
use serde::Serialize;

use crate::error::KMeansError;

pub const DEFAULT_CLUSTERS: usize = 10;
pub const DEFAULT_ITERATIONS: usize = 15;
pub const DEFAULT_EXECUTIONS: usize = 30;

/// Enum representing the distance metric used in the assignment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DistanceMetric {
    /// Sum of squared coordinate differences. Avoids the square root in the hot loop.
    #[default]
    SquaredEuclidean,
    Euclidean,
}

impl DistanceMetric {
    /// Computes the distance between two points based on the selected metric.
    pub fn compute<S1, S2>(&self, x: &ArrayBase<S1, Ix1>, y: &ArrayBase<S2, Ix1>) -> f64
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        let squared = x
            .iter()
            .zip(y.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>();
        match self {
            DistanceMetric::SquaredEuclidean => squared,
            DistanceMetric::Euclidean => squared.sqrt(),
        }
    }
}

/// What the update step does with a centroid that received no points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EmptyClusterPolicy {
    /// Divide by zero anyway. The centroid becomes NaN and stays that way.
    #[default]
    Propagate,
    /// Leave the centroid where it was in the previous iteration.
    KeepPrevious,
    /// Abort the run with [`KMeansError::DegenerateCluster`].
    Fail,
}

/// Parameters for the Lloyd engine. Defaults: k = 10, 15 iterations, 30 executions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LloydConfig {
    /// Number of centroids, seeded from the first `n_clusters` points.
    pub n_clusters: usize,

    /// Assign/update rounds per execution.
    pub iterations: usize,

    /// Independent restarts. Only the last one's centroids are returned.
    pub executions: usize,

    pub metric: DistanceMetric,

    pub empty_cluster: EmptyClusterPolicy,

    /// Run executions on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl Default for LloydConfig {
    fn default() -> Self {
        Self {
            n_clusters: DEFAULT_CLUSTERS,
            iterations: DEFAULT_ITERATIONS,
            executions: DEFAULT_EXECUTIONS,
            metric: DistanceMetric::default(),
            empty_cluster: EmptyClusterPolicy::default(),
            parallel: false,
        }
    }
}

impl LloydConfig {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Default::default()
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_executions(mut self, executions: usize) -> Self {
        self.executions = executions;
        self
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_empty_cluster(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), KMeansError> {
        if self.n_clusters == 0 {
            return Err(KMeansError::InvalidConfig(
                "n_clusters must be at least 1".to_string(),
            ));
        }
        if self.executions == 0 {
            return Err(KMeansError::InvalidConfig(
                "executions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
