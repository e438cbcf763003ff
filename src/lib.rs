//! Lloyd's k-means over 2-D points, repeated over many independent executions
//! to measure an average runtime.
//!
//! Centroids are seeded from the first `k` points, so every run over the same
//! input produces the same centroids.
//!
//! ```
//! use lloydbench::{Lloyd, LloydConfig};
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0], [0.0, 1.0], [10.0, 10.0], [10.0, 11.0]];
//! let lloyd = Lloyd::new(LloydConfig::new(2).with_iterations(3).with_executions(1));
//! let centroids = lloyd.run(&data).unwrap();
//! assert_eq!(centroids, array![[0.0, 0.5], [10.0, 10.5]]);
//! ```

pub mod bench;
pub mod config;
pub mod dataset;
pub mod error;
pub mod kmeans;
pub mod point;
pub mod profile;
pub mod synthetic;

pub use bench::{run_benchmark, BenchReport};
pub use config::{DistanceMetric, EmptyClusterPolicy, LloydConfig};
pub use error::KMeansError;
pub use kmeans::{ClusterAssignment, Execution, Lloyd};
pub use point::Point;
