//! LIDSOR filtering demo
//!
//! Generates a uniform cloud in [-1, 4)^3 with a handful of outliers in
//! [5, 10)^3, filters it and reports what was kept and removed.
//!
//! Run with `RUST_LOG=debug` to see the per-stage filter logging.

use std::time::Instant;

use clap::Parser;
use lidsor_algorithms::{lidsor_filter, LidsorParams, ThresholdMode};
use lidsor_core::IntensityPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Parser, Debug)]
#[command(about = "Filter a synthetic point cloud with LIDSOR")]
struct Args {
    /// Number of points in the point cloud
    #[arg(long, default_value_t = 10_000)]
    num_points: usize,

    /// Number of outliers in the point cloud
    #[arg(long, default_value_t = 50)]
    outliers: usize,

    /// Neighbors per density query, the point itself included
    #[arg(short, long, default_value_t = 30)]
    k: usize,

    /// Standard deviation multiplier for the global threshold
    #[arg(short, long, default_value_t = 2.0)]
    std_multiplier: f32,

    /// Range multiplier for the dynamic threshold
    #[arg(long, default_value_t = 1.0)]
    range_multiplier: f32,

    /// Scaled intensity at or above which points are always kept
    #[arg(long, default_value_t = 25.0)]
    intensity_threshold: f32,

    /// Points at or beyond this range are kept without density analysis
    #[arg(long, default_value_t = 25.0)]
    distance_threshold: f32,

    /// Factor applied to |intensity|
    #[arg(long, default_value_t = 110.0)]
    scaling_factor: f32,

    /// Use one flat threshold instead of the range-scaled one
    #[arg(long)]
    flat: bool,

    /// Absolute cap on local density
    #[arg(long)]
    max_density: Option<f32>,

    /// Random seed for the synthetic cloud
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

impl Args {
    fn params(&self) -> LidsorParams {
        let mode = if self.flat { ThresholdMode::Flat } else { ThresholdMode::RangeScaled };
        LidsorParams::default()
            .with_k_neighbors(self.k)
            .with_std_multiplier(self.std_multiplier)
            .with_range_multiplier(self.range_multiplier)
            .with_intensity_threshold(self.intensity_threshold)
            .with_distance_threshold(self.distance_threshold)
            .with_scaling_factor(self.scaling_factor)
            .with_threshold_mode(mode)
            .with_max_density(self.max_density)
    }
}

fn generate_cloud(args: &Args) -> Vec<IntensityPoint> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut sample = |min: f32, max: f32| {
        IntensityPoint::new(
            rng.gen_range(min..max),
            rng.gen_range(min..max),
            rng.gen_range(min..max),
            rng.gen_range(0.0..0.3),
        )
    };

    let mut points: Vec<IntensityPoint> = (0..args.num_points).map(|_| sample(-1.0, 4.0)).collect();
    points.extend((0..args.outliers).map(|_| sample(5.0, 10.0)));
    points
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("=== LIDSOR Filter Demo ===\n");

    let points = generate_cloud(&args);
    let params = args.params();
    println!("Parameters: {:?}\n", params);

    let start = Instant::now();
    let result = lidsor_filter(&points, &params)?;
    let elapsed = start.elapsed();

    println!("Original points: {}", points.len());
    println!("Filtered points: {}", result.kept_count());
    println!("Removed points:  {}", result.removed_count());

    let outliers_removed = result
        .removed_indices
        .iter()
        .filter(|&&idx| idx >= args.num_points)
        .count();
    println!("Injected outliers removed: {} of {}", outliers_removed, args.outliers);

    if let Some(stats) = result.statistics {
        println!(
            "Local density: mean {:.4}, std dev {:.4}, global threshold {:.4}",
            stats.mean,
            stats.std_dev,
            stats.global_threshold(params.std_multiplier)
        );
    }
    println!("Time taken: {:?}", elapsed);

    Ok(())
}
