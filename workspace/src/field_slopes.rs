#![allow(dead_code, non_snake_case, non_upper_case_globals)]
#![allow(unused_imports, unused_variables, unused_mut)]

use std::path::{ Path, PathBuf };
use anyhow::bail;
use log::info;
use optical_pumping::{
    batch::{ self, BatchConfig, CacheMode },
    config::RunCard,
    field::linfit,
    plot::{ self, PlotSpec, SeriesSpec, SERIES_COLORS },
    spike::ScanConfig,
};
use lib::runs::low_field::*;

const RUN_CARD: &str = "run.toml";
const N_GROUPS: usize = 2;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let card = RunCard::load(
        Path::new(RUN_CARD),
        RunCard {
            data_dir: PathBuf::from(DATA_DIR),
            cache_file: PathBuf::from(CACHE_FILE),
            mode: CacheMode::default(),
            scan: ScanConfig::default(),
        },
    )?;
    // always a fresh scan; the slopes window keeps only the two spikes
    // before the center
    let cfg = BatchConfig {
        scan: card.scan,
        window_before: SLOPES_WINDOW.0,
        window_after: SLOPES_WINDOW.1,
        ..BatchConfig::default()
    };
    let results = batch::scan_dir(&card.data_dir, &cfg)?;
    if results.is_empty() {
        bail!("no spike data under {}", card.data_dir.display());
    }

    let mut series: Vec<SeriesSpec> = Vec::new();
    for k in 0..N_GROUPS {
        // field strength on x, drive frequency on y; offsets below the
        // central spike flip to positive field values
        let group: Vec<(f64, f64)> = results.iter()
            .filter_map(|(freq, offsets)| {
                offsets.get(k).map(|&b| (-b, f64::from(*freq)))
            })
            .collect();
        let xs: Vec<f64> = group.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = group.iter().map(|p| p.1).collect();
        let Some((slope, intercept)) = linfit(&xs, &ys) else {
            bail!("spike group {}: not enough points to fit", k + 1);
        };
        info!(
            "fit for spike {}: y = {:.3e} x + {:.3e}",
            k + 1, slope, intercept,
        );
        println!("{:.6e}", slope);
        let x_lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let x_hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        series.push(SeriesSpec::scatter("", SERIES_COLORS[k], group));
        series.push(SeriesSpec::dashed(
            "",
            SERIES_COLORS[k],
            vec![
                (x_lo, slope * x_lo + intercept),
                (x_hi, slope * x_hi + intercept),
            ],
        ));
    }

    let x_max = series.iter()
        .flat_map(|s| s.points.iter().map(|p| p.0))
        .fold(f64::NEG_INFINITY, f64::max);
    let y_max = series.iter()
        .flat_map(|s| s.points.iter().map(|p| p.1))
        .fold(f64::NEG_INFINITY, f64::max);
    let spec
        = PlotSpec::new(
            "",
            "Magnetic Field Strength (gauss)",
            "Frequency (KHz)",
            FIG_SIZE_SLOPES,
        )
        .with_x_range(0.0, 1.05 * x_max)
        .with_y_range(0.0, 1.05 * y_max);
    let target
        = plot::figures_dir(&card.data_dir)?
        .join("Slopes_freq_vs_B.png");
    plot::plot(&target, &spec, &series)?;
    info!("wrote {}", target.display());

    println!("done");
    Ok(())
}
