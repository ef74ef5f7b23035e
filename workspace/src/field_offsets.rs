#![allow(dead_code, non_snake_case, non_upper_case_globals)]
#![allow(unused_imports, unused_variables, unused_mut)]

use std::path::{ Path, PathBuf };
use anyhow::bail;
use log::info;
use optical_pumping::{
    batch::{ self, BatchConfig, CacheMode },
    config::RunCard,
    plot::{ self, PlotSpec, SeriesSpec, SERIES_COLORS },
    spike::ScanConfig,
};
use lib::runs::low_field::*;

const RUN_CARD: &str = "run.toml";

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
    let cfg = BatchConfig {
        scan: card.scan,
        window_before: OFFSETS_WINDOW.0,
        window_after: OFFSETS_WINDOW.1,
        ..BatchConfig::default()
    };
    let results
        = batch::run(&card.data_dir, &card.cache_file, card.mode, &cfg)?;
    info!("{} runs", results.len());

    let mut points: Vec<(f64, f64)> = Vec::new();
    for (freq, offsets) in &results {
        for &b in offsets {
            points.push((f64::from(*freq), b));
        }
    }
    if points.is_empty() {
        bail!("no spike data under {}", card.data_dir.display());
    }
    if points.len() < SPIKE_GROUPS {
        bail!(
            "{} spike offsets cannot fill {} groups",
            points.len(), SPIKE_GROUPS,
        );
    }
    points.sort_by(|l, r| l.0.total_cmp(&r.0).then(l.1.total_cmp(&r.1)));

    // per frequency, offsets ascend; group k collects the k-th lowest of each
    let series: Vec<SeriesSpec> = (0..SPIKE_GROUPS)
        .map(|k| {
            let group: Vec<(f64, f64)> = points.iter().copied()
                .skip(k)
                .step_by(SPIKE_GROUPS)
                .collect();
            info!("spike {}: {} points", k + 1, group.len());
            SeriesSpec::scatter(
                format!("Spike {}", k + 1),
                SERIES_COLORS[k % SERIES_COLORS.len()],
                group,
            )
        })
        .collect();

    let spec = PlotSpec::new(
        "Value of B for Spikes 1-5 vs Frequency (kHz)",
        "Frequency (kHz)",
        "B value",
        FIG_SIZE_OFFSETS,
    );
    let target
        = plot::figures_dir(&card.data_dir)?
        .join("offsets_vs_frequency.png");
    plot::plot(&target, &spec, &series)?;
    info!("wrote {}", target.display());

    println!("done");
    Ok(())
}
