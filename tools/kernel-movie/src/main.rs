//! Sensitivity-kernel movie maker.
//!
//! Loads a scattered (lat, lon, radius, value-per-timestep) kernel file,
//! resamples it onto a dense grid (memoized to a binary cache file), renders
//! one page of depth-slice panels per timestep under a single normalization
//! held fixed for the whole series, and assembles the frames with ffmpeg.

mod movie;

use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tomo_grid::{load_matrix, load_or_compute, DenseGrid, ScatterTable};
use tomo_render::{png, render_page, Coastlines, DivergingPalette, PageLayout, Panel, SymmetricNorm};

#[derive(Parser, Debug)]
#[command(name = "kernel-movie")]
#[command(about = "Render a time-evolving sensitivity kernel as a movie of map pages")]
struct Args {
    /// Kernel file: rows of lat, lon, radius and one value per timestep
    #[arg(long, default_value = "kernel.dat")]
    input: PathBuf,

    /// Seconds of wave time per timestep column
    #[arg(long, default_value_t = 1.0)]
    dt: f64,

    /// Movie frame rate
    #[arg(long, default_value_t = 4)]
    fps: u32,

    /// Output video file, relative to --out-dir
    #[arg(long, default_value = "kernel.mp4")]
    output: PathBuf,

    /// Keep the per-timestep PNG frames after a successful encode
    #[arg(long)]
    keep_frames: bool,

    /// Directory for the frames and the movie
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Dense-grid cache file; delete it to force a resample after the
    /// input changes
    #[arg(long, default_value = "kernel_grid.bin")]
    cache: PathBuf,

    /// Coastline file (GMT multi-segment text) replacing the built-in one
    #[arg(long)]
    coastlines: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    info!(input = %args.input.display(), "loading kernel");
    let matrix = load_matrix(&args.input)?;
    // Kernel NaNs are left alone; they draw as the ramp midpoint.
    let table = ScatterTable::from_matrix(&matrix)?;
    let axes = table.axes();

    let grid = load_or_compute(&args.cache, || Ok(DenseGrid::resample(&table, &axes)))?;
    ensure!(
        grid.matches_axes(&axes),
        "cached grid {} has shape {:?}, which does not match the input's axes; \
         delete the cache file to resample",
        args.cache.display(),
        grid.shape(),
    );

    // One norm from the global extremum, fixed for every frame, so color is
    // comparable across the whole movie.
    let norm = SymmetricNorm::new(grid.abs_max());
    let layout = PageLayout::default();
    let coast = match &args.coastlines {
        Some(path) => Coastlines::from_file(path)?,
        None => Coastlines::builtin(),
    };
    let palette = DivergingPalette::default();

    fs::create_dir_all(&args.out_dir)?;
    let steps = grid.components();
    for step in 0..steps {
        let elapsed = step as f64 * args.dt;
        let panels: Vec<Panel> = (0..grid.radius_levels())
            .map(|ir| Panel {
                values: grid.slice(ir, step),
                title: format!(
                    "r={} km  t={} s",
                    format_num(axes.radius[ir]),
                    format_num(elapsed)
                ),
            })
            .collect();

        let page = render_page(&layout, &panels, &axes.lat, &axes.lon, &norm, &palette, &coast)?;
        png::write_page(&page, args.out_dir.join(movie::frame_name(step)))?;
    }
    info!(frames = steps, vmax = norm.vmax(), "wrote frames");

    let job = movie::MovieJob {
        frame_dir: args.out_dir.clone(),
        fps: args.fps,
        output: args.out_dir.join(&args.output),
    };
    job.encode()?;

    if args.keep_frames {
        info!(frames = steps, "keeping frames");
    } else {
        movie::remove_frames(&args.out_dir, steps)?;
        info!(frames = steps, "removed frames after successful encode");
    }
    info!(output = %job.output.display(), "movie written");

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Whole numbers without a decimal point, everything else with one digit.
fn format_num(v: f64) -> String {
    if v.fract().abs() < 1e-9 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["kernel-movie"]).unwrap();
        assert_eq!(args.input, PathBuf::from("kernel.dat"));
        assert_eq!(args.dt, 1.0);
        assert_eq!(args.fps, 4);
        assert_eq!(args.output, PathBuf::from("kernel.mp4"));
        assert_eq!(args.cache, PathBuf::from("kernel_grid.bin"));
        assert!(!args.keep_frames);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "kernel-movie",
            "--dt",
            "0.5",
            "--fps",
            "12",
            "--keep-frames",
        ])
        .unwrap();
        assert_eq!(args.dt, 0.5);
        assert_eq!(args.fps, 12);
        assert!(args.keep_frames);
    }

    #[test]
    fn test_frame_titles() {
        assert_eq!(format_num(2.0 * 1.5), "3");
        assert_eq!(format_num(2.5), "2.5");
    }
}
