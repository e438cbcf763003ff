use log::{debug, trace, warn};
use ndarray::{s, Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use rayon::prelude::*;

use crate::config::{EmptyClusterPolicy, LloydConfig};
use crate::error::KMeansError;

/// Result of the assignment step: the index of the closest centroid for every
/// point, plus how many points each centroid received.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    pub labels: Array1<usize>,
    pub counts: Vec<usize>,
}

impl ClusterAssignment {
    /// Indices of the points assigned to `centroid`, in input order.
    pub fn members(&self, centroid: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == centroid)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Centroids that received no points.
    pub fn empty_clusters(&self) -> Vec<usize> {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count == 0)
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Final state of a single restart.
#[derive(Debug, Clone)]
pub struct Execution {
    pub centroids: Array2<f64>,
    /// Assignment from the last refinement round. `None` when no rounds ran.
    pub assignment: Option<ClusterAssignment>,
}

/// Lloyd's algorithm with deterministic seeding, repeated over a fixed number
/// of independent executions.
pub struct Lloyd {
    pub config: LloydConfig,
}

impl Lloyd {
    pub fn new(config: LloydConfig) -> Self {
        Lloyd { config }
    }

    /// Runs every execution and returns the centroids of the last one.
    ///
    /// Rows of `data` are points. Fails if the configuration is invalid or if
    /// there are fewer points than clusters.
    pub fn run<S>(&self, data: &ArrayBase<S, Ix2>) -> Result<Array2<f64>, KMeansError>
    where
        S: Data<Elem = f64> + Sync,
    {
        self.check_input(data)?;

        let last = if self.config.parallel {
            // Results come back in execution order, so both the reported error
            // and the returned centroids are picked by index, not completion.
            let executions: Vec<Result<Execution, KMeansError>> = (0..self.config.executions)
                .into_par_iter()
                .map(|execution| self.run_execution(data, execution))
                .collect();
            let mut last = None;
            for execution in executions {
                last = Some(execution?);
            }
            last
        } else {
            let mut last = None;
            for execution in 0..self.config.executions {
                last = Some(self.run_execution(data, execution)?);
            }
            last
        };

        last.map(|e| e.centroids).ok_or_else(|| {
            KMeansError::InvalidConfig("executions must be at least 1".to_string())
        })
    }

    /// One restart: seed from the first points, then refine `iterations` times.
    pub fn run_execution<S>(
        &self,
        data: &ArrayBase<S, Ix2>,
        execution: usize,
    ) -> Result<Execution, KMeansError>
    where
        S: Data<Elem = f64>,
    {
        self.check_input(data)?;

        let mut centroids = self.seed(data);
        let mut assignment = None;

        for iteration in 0..self.config.iterations {
            let current = self.assign(data, &centroids);

            let empty = current.empty_clusters();
            if let Some(&centroid) = empty.first() {
                if self.config.empty_cluster == EmptyClusterPolicy::Fail {
                    return Err(KMeansError::DegenerateCluster {
                        execution,
                        iteration,
                        centroid,
                    });
                }
                warn!(
                    "Execution {} iteration {}: empty clusters {:?} ({:?})",
                    execution, iteration, empty, self.config.empty_cluster
                );
            }

            centroids = self.update(data, &current, &centroids);
            trace!(
                "Execution {} iteration {} done, cluster sizes {:?}",
                execution,
                iteration,
                current.counts
            );
            assignment = Some(current);
        }

        debug!(
            "Execution {} finished after {} iterations",
            execution, self.config.iterations
        );
        Ok(Execution {
            centroids,
            assignment,
        })
    }

    /// Initial centroids: the first `n_clusters` points, in order.
    pub fn seed<S>(&self, data: &ArrayBase<S, Ix2>) -> Array2<f64>
    where
        S: Data<Elem = f64>,
    {
        data.slice(s![..self.config.n_clusters, ..]).to_owned()
    }

    /// Assigns every point to its closest centroid.
    pub fn assign<S1, S2>(
        &self,
        data: &ArrayBase<S1, Ix2>,
        centroids: &ArrayBase<S2, Ix2>,
    ) -> ClusterAssignment
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        let mut counts = vec![0; centroids.len_of(Axis(0))];
        let labels: Array1<usize> = data
            .axis_iter(Axis(0))
            .map(|x| {
                let label = self.closest(&x, centroids);
                counts[label] += 1;
                label
            })
            .collect();

        ClusterAssignment { labels, counts }
    }

    /// Index of the centroid closest to `x`. The first centroid wins ties, and
    /// a candidate only replaces the current best if strictly closer.
    pub fn closest<S1, S2>(&self, x: &ArrayBase<S1, Ix1>, centroids: &ArrayBase<S2, Ix2>) -> usize
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        let mut min_j = 0;
        let mut min_dist = self.config.metric.compute(x, &centroids.row(0));
        for (j, c) in centroids.axis_iter(Axis(0)).enumerate().skip(1) {
            let dist = self.config.metric.compute(x, &c);
            if dist < min_dist {
                min_dist = dist;
                min_j = j;
            }
        }
        min_j
    }

    /// Computes new centroids as the mean of each cluster's points.
    ///
    /// `previous` is only read for empty clusters under
    /// [`EmptyClusterPolicy::KeepPrevious`]; every other empty cluster is
    /// divided by zero and comes out as NaN.
    ///
    /// Panics if `previous` does not hold one row per cluster.
    pub fn update<S1, S2>(
        &self,
        data: &ArrayBase<S1, Ix2>,
        assignment: &ClusterAssignment,
        previous: &ArrayBase<S2, Ix2>,
    ) -> Array2<f64>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
    {
        assert_eq!(
            previous.len_of(Axis(0)),
            assignment.counts.len(),
            "previous centroids must have one row per cluster"
        );
        let n_features = data.len_of(Axis(1));
        let mut centroids = Array2::<f64>::zeros((assignment.counts.len(), n_features));
        data.axis_iter(Axis(0))
            .zip(assignment.labels.iter())
            .for_each(|(x, &label)| {
                centroids
                    .row_mut(label)
                    .zip_mut_with(&x, |a, &b| *a += b);
            });

        let keep_previous = self.config.empty_cluster == EmptyClusterPolicy::KeepPrevious;
        centroids
            .axis_iter_mut(Axis(0))
            .zip(previous.axis_iter(Axis(0)))
            .zip(assignment.counts.iter())
            .for_each(|((mut c, prev), &count)| {
                if count == 0 && keep_previous {
                    c.assign(&prev);
                } else {
                    c.mapv_inplace(|v| v / count as f64);
                }
            });

        centroids
    }

    fn check_input<S>(&self, data: &ArrayBase<S, Ix2>) -> Result<(), KMeansError>
    where
        S: Data<Elem = f64>,
    {
        self.config.validate()?;
        let n_samples = data.len_of(Axis(0));
        if n_samples < self.config.n_clusters {
            return Err(KMeansError::InsufficientPoints {
                required: self.config.n_clusters,
                found: n_samples,
            });
        }
        Ok(())
    }
}
