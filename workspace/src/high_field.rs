#![allow(dead_code, non_snake_case, non_upper_case_globals)]
#![allow(unused_imports, unused_variables, unused_mut)]

use std::path::{ Path, PathBuf };
use log::info;
use optical_pumping::{
    print_flush,
    field::{ interp, volts_to_tesla },
    plot::{ self, PlotSpec, SeriesSpec, ORANGE, SERIES_COLORS },
    trace::Trace,
};
use lib::runs::high_field::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = Path::new(DATA_DIR).join(CSV_FILE);
    let trace = Trace::from_csv(&path)?;
    info!("{}: {} samples", path.display(), trace.len());

    let tesla: Vec<(f64, f64)> = trace.iter()
        .filter(|s| (TIME_WINDOW.0..=TIME_WINDOW.1).contains(&s.time))
        .map(|s| (s.time, volts_to_tesla(s.field_voltage)))
        .collect();
    let absorption: Vec<(f64, f64)> = trace.iter()
        .filter(|s| (TIME_WINDOW.0..=TIME_WINDOW.1).contains(&s.time))
        .map(|s| (s.time, s.absorption_voltage))
        .collect();
    let spec
        = PlotSpec::new(
            "",
            "Time (s)",
            "Magnetic Field (T) / Voltage (V)",
            FIG_SIZE,
        )
        .with_x_range(TIME_WINDOW.0, TIME_WINDOW.1);
    let target = plot::figures_dir(DATA_DIR)?.join(FIG_FILE);
    plot::plot(
        &target,
        &spec,
        &[
            SeriesSpec::line("", SERIES_COLORS[2], tesla),
            SeriesSpec::line("", ORANGE, absorption),
        ],
    )?;
    info!("wrote {}", target.display());

    // probe the field calibration at typed times until EOF or a blank line
    let times: Vec<f64> = trace.times().to_vec();
    let volts: Vec<f64> = trace.field_voltages().to_vec();
    let mut line = String::new();
    loop {
        print_flush!("t [s] > ");
        line.clear();
        if std::io::stdin().read_line(&mut line)? == 0 { break; }
        let entry = line.trim();
        if entry.is_empty() { break; }
        let Ok(t) = entry.parse::<f64>() else {
            eprintln!("couldn't parse {:?} as a time", entry);
            continue;
        };
        let v = interp(t, &times, &volts);
        println!(
            "Time: {:.2} s -> Field Voltage: {:.2} V -> Magnetic Field: {:.3} T",
            t, v, volts_to_tesla(v),
        );
    }

    println!("done");
    Ok(())
}
