use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::{array, Array2, Axis};
use rand::prelude::*;

use lloydbench::dataset::{load_points, write_points};
use lloydbench::point::{from_matrix, to_matrix};
use lloydbench::synthetic::{generate_blobs, BlobSpec};
use lloydbench::{
    run_benchmark, DistanceMetric, EmptyClusterPolicy, KMeansError, Lloyd, LloydConfig,
};

fn blobs(samples: usize, seed: u64) -> Array2<f64> {
    generate_blobs(&BlobSpec {
        samples,
        centers: 10,
        spread: 4.0,
        extent: 100.0,
        seed,
    })
    .unwrap()
}

#[test]
fn default_run_is_deterministic() {
    let data = blobs(2_000, 11);
    let lloyd = Lloyd::new(LloydConfig::default());
    let first = lloyd.run(&data).unwrap();
    let second = lloyd.run(&data).unwrap();
    assert_eq!(first.dim(), (10, 2));
    assert_eq!(
        first.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        second.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
fn output_has_k_centroids() {
    let data = blobs(300, 3);
    for k in [1, 2, 5, 10, 300] {
        let lloyd = Lloyd::new(LloydConfig::new(k).with_iterations(3).with_executions(2));
        assert_eq!(lloyd.run(&data).unwrap().len_of(Axis(0)), k);
    }
}

#[test]
fn centroids_are_means_of_their_clusters() {
    let data = blobs(1_000, 5);
    let lloyd = Lloyd::new(LloydConfig::new(4).with_iterations(6).with_executions(1));
    let execution = lloyd.run_execution(&data, 0).unwrap();
    let assignment = execution.assignment.unwrap();

    for c in 0..4 {
        let members = assignment.members(c);
        if members.is_empty() {
            continue;
        }
        let mean = data.select(Axis(0), &members).mean_axis(Axis(0)).unwrap();
        for (got, want) in execution.centroids.row(c).iter().zip(mean.iter()) {
            assert_relative_eq!(*got, *want, max_relative = 1e-9, epsilon = 1e-9);
        }
    }
}

#[test]
fn every_point_in_exactly_one_cluster() {
    let data = blobs(500, 8);
    let lloyd = Lloyd::new(LloydConfig::new(7).with_iterations(1).with_executions(1));
    let assignment = lloyd.assign(&data, &lloyd.seed(&data));

    assert_eq!(assignment.labels.len(), 500);
    assert!(assignment.labels.iter().all(|&label| label < 7));
    let mut seen = vec![0usize; 500];
    for c in 0..7 {
        let members = assignment.members(c);
        assert_eq!(members.len(), assignment.counts[c]);
        for idx in members {
            seen[idx] += 1;
        }
    }
    assert!(seen.iter().all(|&n| n == 1));
}

#[test]
fn squared_and_true_distance_pick_the_same_centroid() {
    let mut rng = StdRng::seed_from_u64(42);
    let centroids = Array2::from_shape_fn((12, 2), |_| rng.gen_range(-1e3..1e3));
    let squared = Lloyd::new(LloydConfig::new(12));
    let euclidean = Lloyd::new(LloydConfig::new(12).with_metric(DistanceMetric::Euclidean));

    for _ in 0..2_000 {
        let x = array![rng.gen_range(-1e3..1e3), rng.gen_range(-1e3..1e3)];
        assert_eq!(
            squared.closest(&x, &centroids),
            euclidean.closest(&x, &centroids)
        );
    }
}

#[test]
fn metric_choice_does_not_change_centroids() {
    let data = blobs(800, 21);
    let config = LloydConfig::new(6).with_iterations(8).with_executions(1);
    let squared = Lloyd::new(config.clone()).run(&data).unwrap();
    let euclidean = Lloyd::new(config.with_metric(DistanceMetric::Euclidean))
        .run(&data)
        .unwrap();
    assert_eq!(
        squared.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        euclidean.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
fn single_cluster_is_the_global_mean() {
    let data = blobs(400, 2);
    let mean = data.mean_axis(Axis(0)).unwrap();
    for iterations in [1, 2, 15] {
        let lloyd = Lloyd::new(LloydConfig::new(1).with_iterations(iterations).with_executions(1));
        let centroids = lloyd.run(&data).unwrap();
        assert_relative_eq!(centroids[[0, 0]], mean[0], max_relative = 1e-9, epsilon = 1e-9);
        assert_relative_eq!(centroids[[0, 1]], mean[1], max_relative = 1e-9, epsilon = 1e-9);
    }
}

#[test]
fn converged_centroids_stay_put() {
    let data = array![
        [0.0, 0.0],
        [0.0, 1.0],
        [10.0, 10.0],
        [10.0, 11.0],
        [-5.0, 20.0],
        [-4.0, 21.0]
    ];
    let lloyd = Lloyd::new(LloydConfig::new(3).with_iterations(10).with_executions(1));
    let execution = lloyd.run_execution(&data, 0).unwrap();
    let assignment = execution.assignment.unwrap();

    let again = lloyd.assign(&data, &execution.centroids);
    assert_eq!(again.labels, assignment.labels);
    let next = lloyd.update(&data, &again, &execution.centroids);
    assert_eq!(next, execution.centroids);
}

#[test]
fn four_point_scenario() {
    let data = array![[0.0, 0.0], [0.0, 1.0], [10.0, 10.0], [10.0, 11.0]];
    let lloyd = Lloyd::new(LloydConfig::new(2).with_iterations(15).with_executions(30));
    let centroids = lloyd.run(&data).unwrap();
    assert_abs_diff_eq!(centroids[[0, 0]], 0.0);
    assert_abs_diff_eq!(centroids[[0, 1]], 0.5);
    assert_abs_diff_eq!(centroids[[1, 0]], 10.0);
    assert_abs_diff_eq!(centroids[[1, 1]], 10.5);
}

#[test]
fn parallel_output_matches_sequential() {
    let data = blobs(1_500, 13);
    let config = LloydConfig::default();
    let sequential = Lloyd::new(config.clone()).run(&data).unwrap();
    let parallel = Lloyd::new(config.with_parallel(true)).run(&data).unwrap();
    assert_eq!(
        sequential.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        parallel.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
fn too_few_points_fails_before_running() {
    let data = blobs(9, 1);
    assert_eq!(
        Lloyd::new(LloydConfig::default()).run(&data),
        Err(KMeansError::InsufficientPoints {
            required: 10,
            found: 9
        })
    );
}

#[test]
fn degenerate_cluster_policies() {
    // Seeds 0 and 1 coincide; centroid 1 never receives a point.
    let data = array![[1.0, 1.0], [1.0, 1.0], [3.0, 3.0], [5.0, 5.0]];
    let config = LloydConfig::new(2).with_iterations(3).with_executions(1);

    let faithful = Lloyd::new(config.clone()).run(&data).unwrap();
    assert!(faithful.row(1).iter().all(|v| v.is_nan()));
    assert!(faithful.row(0).iter().all(|v| v.is_finite()));

    let kept = Lloyd::new(config.clone().with_empty_cluster(EmptyClusterPolicy::KeepPrevious))
        .run(&data)
        .unwrap();
    assert!(kept.iter().all(|v| v.is_finite()));

    let failed = Lloyd::new(config.with_empty_cluster(EmptyClusterPolicy::Fail)).run(&data);
    assert_eq!(
        failed,
        Err(KMeansError::DegenerateCluster {
            execution: 0,
            iteration: 0,
            centroid: 1
        })
    );
}

#[test]
fn benchmark_over_a_written_dataset() {
    let dir = tempdir::TempDir::new("lloyd_benchmark_dataset").unwrap();
    let path = dir.path().join("points.json");
    let points = from_matrix(&blobs(1_000, 17).view()).unwrap();
    write_points(&path, &points).unwrap();

    let loaded = load_points(&path).unwrap();
    assert_eq!(loaded.len(), points.len());
    for (a, b) in loaded.iter().zip(points.iter()) {
        assert_relative_eq!(a.x, b.x, max_relative = 1e-15);
        assert_relative_eq!(a.y, b.y, max_relative = 1e-15);
    }

    let config = LloydConfig::default().with_executions(3);
    let report = run_benchmark(&loaded, config.clone()).unwrap();
    let direct = Lloyd::new(config).run(&to_matrix(&loaded)).unwrap();
    assert_eq!(report.centroids, from_matrix(&direct.view()).unwrap());
    assert_eq!(report.centroids.len(), 10);
}
