use std::io::{self, Write};
use std::time::Instant;

use log::info;
use serde::Serialize;

use crate::config::LloydConfig;
use crate::error::KMeansError;
use crate::kmeans::Lloyd;
use crate::point::{from_matrix, to_matrix, Point};

/// Timing and final centroids of a benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub points: usize,
    pub config: LloydConfig,
    pub total_ms: f64,
    /// Wall-clock milliseconds per execution.
    pub average_ms: f64,
    /// NaN coordinates serialize as `null`.
    pub centroids: Vec<Point>,
}

/// Times all executions of the engine over `points`.
pub fn run_benchmark(points: &[Point], config: LloydConfig) -> Result<BenchReport, KMeansError> {
    let data = to_matrix(points);
    let executions = config.executions;
    let lloyd = Lloyd::new(config);

    info!(
        "Running {} executions of {} iterations, k = {}, over {} points",
        executions,
        lloyd.config.iterations,
        lloyd.config.n_clusters,
        points.len()
    );
    let start = Instant::now();
    let centroids = lloyd.run(&data)?;
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(BenchReport {
        points: points.len(),
        total_ms,
        average_ms: total_ms / executions as f64,
        centroids: from_matrix(&centroids.view())?,
        config: lloyd.config,
    })
}

impl BenchReport {
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "The average time is {:.3} ms", self.average_ms)?;
        for centroid in &self.centroids {
            writeln!(out, "{}", centroid)?;
        }
        Ok(())
    }

    pub fn write_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}
