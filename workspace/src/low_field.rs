#![allow(dead_code, non_snake_case, non_upper_case_globals)]
#![allow(unused_imports, unused_variables, unused_mut)]

use std::path::{ Path, PathBuf };
use log::info;
use optical_pumping::{
    batch::CacheMode,
    config::RunCard,
    plot::{ self, PlotSpec, SeriesSpec, ORANGE, SERIES_COLORS },
    spike::{ self, ScanConfig },
    trace::Trace,
};
use lib::runs::low_field::*;

const RUN_CARD: &str = "run.toml";
const FREQ: u32 = DEFAULT_FREQ_KHZ; // kHz

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
    let path = card.data_dir.join(csv_name(FREQ));
    let trace = Trace::from_csv(&path)?;
    info!("{}: {} samples", path.display(), trace.len());
    let figures = plot::figures_dir(&card.data_dir)?;

    let field: Vec<(f64, f64)>
        = trace.iter().map(|s| (s.time, s.field_voltage)).collect();
    let absorption: Vec<(f64, f64)>
        = trace.iter().map(|s| (s.time, s.absorption_voltage)).collect();
    let spec = PlotSpec::new(
        "Low Field Data from Optical Pumping Experiment",
        "Time (s)",
        "Voltage (V)",
        FIG_SIZE_TRACE,
    );
    let target = figures.join(format!("{}kHz_low_field_data_plot.png", FREQ));
    plot::plot(
        &target,
        &spec,
        &[
            SeriesSpec::line("Field Voltage", SERIES_COLORS[2], field),
            SeriesSpec::line("Absorption Voltage", ORANGE, absorption),
        ],
    )?;
    info!("wrote {}", target.display());

    // scan preview: the raw absorption channel with every detected spike
    let spikes = spike::find_spikes(&trace, card.scan);
    info!("{} spikes", spikes.len());
    let channel: Vec<(f64, f64)>
        = trace.absorption_voltages().iter().enumerate()
        .map(|(k, &v)| (k as f64, v))
        .collect();
    let marks: Vec<(f64, f64)>
        = spikes.iter()
        .map(|s| (s.index as f64, s.absorption_voltage))
        .collect();
    let spec = PlotSpec::new(
        &format!("Spike scan preview, {} kHz", FREQ),
        "Sample",
        "Absorption Voltage (V)",
        FIG_SIZE_PREVIEW,
    );
    let target = figures.join(format!("{}kHz_scan_preview.png", FREQ));
    plot::plot(
        &target,
        &spec,
        &[
            SeriesSpec::line("", SERIES_COLORS[2], channel),
            SeriesSpec::scatter("Spikes", SERIES_COLORS[0], marks),
        ],
    )?;
    info!("wrote {}", target.display());

    println!("done");
    Ok(())
}
