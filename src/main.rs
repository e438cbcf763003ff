use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use lloydbench::config::{DEFAULT_CLUSTERS, DEFAULT_EXECUTIONS, DEFAULT_ITERATIONS};
use lloydbench::dataset::{load_points, write_points};
use lloydbench::point::from_matrix;
use lloydbench::profile::CpuProfile;
use lloydbench::synthetic::{generate_blobs, BlobSpec};
use lloydbench::{run_benchmark, DistanceMetric, EmptyClusterPolicy, LloydConfig};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum MetricArgs {
    Squared,
    Euclidean,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum EmptyClusterArgs {
    Propagate,
    KeepPrevious,
    Fail,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Point file: JSON array of [x, y] pairs, or `x y` lines for .txt
    #[arg(long, default_value = "points.json")]
    points: PathBuf,

    #[arg(short = 'k', long, default_value_t = DEFAULT_CLUSTERS)]
    clusters: usize,

    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    #[arg(long, default_value_t = DEFAULT_EXECUTIONS)]
    executions: usize,

    #[arg(long, default_value_t = MetricArgs::Squared, value_enum)]
    metric: MetricArgs,

    #[arg(long = "empty-cluster", default_value_t = EmptyClusterArgs::Propagate, value_enum)]
    empty_cluster: EmptyClusterArgs,

    /// Run executions on a thread pool
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Write a pprof CPU profile of the clustering run to this file
    #[arg(long)]
    cpuprofile: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long, default_value_t = 100_000)]
    samples: usize,

    #[arg(long, default_value_t = 10)]
    centers: usize,

    #[arg(long, default_value_t = 5.0)]
    spread: f64,

    #[arg(long, default_value_t = 100.0)]
    extent: f64,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time Lloyd's algorithm over a point file
    Run(RunArgs),

    /// Write a synthetic point file
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

impl RunArgs {
    fn config(&self) -> LloydConfig {
        let metric = match self.metric {
            MetricArgs::Squared => DistanceMetric::SquaredEuclidean,
            MetricArgs::Euclidean => DistanceMetric::Euclidean,
        };
        let empty_cluster = match self.empty_cluster {
            EmptyClusterArgs::Propagate => EmptyClusterPolicy::Propagate,
            EmptyClusterArgs::KeepPrevious => EmptyClusterPolicy::KeepPrevious,
            EmptyClusterArgs::Fail => EmptyClusterPolicy::Fail,
        };
        LloydConfig::new(self.clusters)
            .with_iterations(self.iterations)
            .with_executions(self.executions)
            .with_metric(metric)
            .with_empty_cluster(empty_cluster)
            .with_parallel(self.parallel)
    }
}

fn run(args: RunArgs) -> Result<()> {
    let points = load_points(&args.points)?;
    let profile = args.cpuprofile.as_deref().map(CpuProfile::start).transpose()?;
    let report = run_benchmark(&points, args.config())
        .with_context(|| format!("Clustering {} failed", args.points.display()))?;
    if let Some(profile) = profile {
        profile.finish()?;
    }

    let mut stdout = io::stdout().lock();
    if args.json {
        report.write_json(&mut stdout)?;
    } else {
        report.write_text(&mut stdout)?;
    }
    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    let spec = BlobSpec {
        samples: args.samples,
        centers: args.centers,
        spread: args.spread,
        extent: args.extent,
        seed: args.seed,
    };
    info!("Generating {:?}", spec);
    let data = generate_blobs(&spec)?;
    write_points(&args.output, &from_matrix(&data.view())?)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Generate(args) => generate(args),
    }
}
