//! Velocity-perturbation model plotter.
//!
//! Loads a scattered (lat, lon, radius, dV...) model file, resamples it onto
//! a dense grid (memoized to a binary cache file), and writes one page of
//! depth-slice map panels per payload component.

use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tomo_grid::{load_matrix, load_or_compute, DenseGrid, ScatterTable};
use tomo_render::{png, render_page, Coastlines, DivergingPalette, PageLayout, Panel, SymmetricNorm};

#[derive(Parser, Debug)]
#[command(name = "velocity-map")]
#[command(about = "Render a velocity-perturbation model as pages of depth-slice maps")]
struct Args {
    /// Model file index: the input is <prefix><index>.dat in --dir
    index: u32,

    /// Input file name prefix
    #[arg(long, default_value = "model")]
    prefix: String,

    /// Directory holding the input file
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Dense-grid cache file; delete it to force a resample after the
    /// input changes
    #[arg(long, default_value = "model_grid.bin")]
    cache: PathBuf,

    /// Output directory for the PNG pages
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Coastline file (GMT multi-segment text) replacing the built-in one
    #[arg(long)]
    coastlines: Option<PathBuf>,

    /// Palette JSON file replacing the built-in blue-white-red ramp
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let input = args.dir.join(format!("{}{}.dat", args.prefix, args.index));
    info!(input = %input.display(), "loading velocity model");

    let matrix = load_matrix(&input)?;
    let mut table = ScatterTable::from_matrix(&matrix)?;
    table.zero_nan_payload();
    let axes = table.axes();

    let grid = load_or_compute(&args.cache, || Ok(DenseGrid::resample(&table, &axes)))?;
    ensure!(
        grid.matches_axes(&axes),
        "cached grid {} has shape {:?}, which does not match the input's axes; \
         delete the cache file to resample",
        args.cache.display(),
        grid.shape(),
    );

    let layout = PageLayout::default();
    let coast = match &args.coastlines {
        Some(path) => Coastlines::from_file(path)?,
        None => Coastlines::builtin(),
    };
    let palette = match &args.palette {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading palette {}", path.display()))?;
            DivergingPalette::from_json(&json)?
        }
        None => DivergingPalette::default(),
    };

    fs::create_dir_all(&args.out_dir)?;
    for comp in 0..grid.components() {
        // Each component gets its own symmetric range from its own extremum.
        let norm = SymmetricNorm::new(grid.component_abs_max(comp));
        let panels: Vec<Panel> = (0..grid.radius_levels())
            .map(|ir| Panel {
                values: grid.slice(ir, comp),
                title: format!("r={} km", format_num(axes.radius[ir])),
            })
            .collect();

        let page = render_page(&layout, &panels, &axes.lat, &axes.lon, &norm, &palette, &coast)?;
        let out = args
            .out_dir
            .join(format!("perturbation{}_c{}.png", args.index, comp));
        png::write_page(&page, &out)?;
        info!(component = comp, vmax = norm.vmax(), path = %out.display(), "wrote page");
    }

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
