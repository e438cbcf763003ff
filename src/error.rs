use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansError {
    #[error("Not enough points to seed centroids: {found} points (need at least {required})")]
    InsufficientPoints { required: usize, found: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Centroid {centroid} has no assigned points (execution {execution}, iteration {iteration})")]
    DegenerateCluster {
        execution: usize,
        iteration: usize,
        centroid: usize,
    },

    #[error("Points must have 2 coordinates, got {0}")]
    InvalidDimension(usize),
}
