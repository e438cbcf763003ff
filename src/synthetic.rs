use anyhow::{anyhow, Result};
use ndarray::{Array2, Axis};
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::prelude::*;
use rand_distr::Normal;

/// Parameters for a Gaussian-blob dataset.
#[derive(Debug, Clone)]
pub struct BlobSpec {
    pub samples: usize,
    pub centers: usize,
    /// Standard deviation of each blob.
    pub spread: f64,
    /// Blob centers are drawn uniformly from `[-extent, extent)` on both axes.
    pub extent: f64,
    pub seed: u64,
}

impl Default for BlobSpec {
    fn default() -> Self {
        Self {
            samples: 100_000,
            centers: 10,
            spread: 5.0,
            extent: 100.0,
            seed: 0,
        }
    }
}

/// Generates `samples x 2` points scattered around randomly placed centers.
/// The same parameters always produce the same points.
pub fn generate_blobs(spec: &BlobSpec) -> Result<Array2<f64>> {
    if spec.centers == 0 {
        return Err(anyhow!("centers must be at least 1"));
    }
    if spec.extent <= 0.0 || !(2.0 * spec.extent).is_finite() {
        return Err(anyhow!("extent must be positive and finite, got {}", spec.extent));
    }
    let point_distribution = Normal::new(0.0, spec.spread)
        .map_err(|e| anyhow!("Invalid spread {}: {}", spec.spread, e))?;

    let mut rng = StdRng::seed_from_u64(spec.seed);

    // Step 1: Generate cluster centers
    let centers = Array2::random_using(
        (spec.centers, 2),
        Uniform::new(-spec.extent, spec.extent),
        &mut rng,
    );

    // Step 2: Scatter each sample around a randomly chosen center
    let mut data = Array2::random_using((spec.samples, 2), point_distribution, &mut rng);
    let cluster_assignment_distribution = Uniform::new(0, spec.centers);
    for mut row in data.axis_iter_mut(Axis(0)) {
        let cluster_idx = cluster_assignment_distribution.sample(&mut rng);
        row += &centers.row(cluster_idx);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_and_determinism() {
        let spec = BlobSpec {
            samples: 500,
            centers: 4,
            seed: 7,
            ..Default::default()
        };
        let a = generate_blobs(&spec).unwrap();
        let b = generate_blobs(&spec).unwrap();
        assert_eq!(a.dim(), (500, 2));
        assert_eq!(a, b);
        assert!(a.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_blobs(&BlobSpec {
            samples: 50,
            seed: 1,
            ..Default::default()
        })
        .unwrap();
        let b = generate_blobs(&BlobSpec {
            samples: 50,
            seed: 2,
            ..Default::default()
        })
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_spread_puts_points_on_centers() {
        let spec = BlobSpec {
            samples: 200,
            centers: 1,
            spread: 0.0,
            ..Default::default()
        };
        let data = generate_blobs(&spec).unwrap();
        let first = data.row(0).to_owned();
        assert!(data.axis_iter(Axis(0)).all(|row| row == first));
    }

    #[test]
    fn rejects_bad_parameters() {
        let no_centers = BlobSpec {
            centers: 0,
            ..Default::default()
        };
        assert!(generate_blobs(&no_centers).is_err());

        let negative_spread = BlobSpec {
            spread: -1.0,
            ..Default::default()
        };
        assert!(generate_blobs(&negative_spread).is_err());

        let flat = BlobSpec {
            extent: 0.0,
            ..Default::default()
        };
        assert!(generate_blobs(&flat).is_err());
    }
}
