#![allow(dead_code, non_snake_case, non_upper_case_globals)]
#![allow(unused_imports, unused_variables, unused_mut)]

use std::path::PathBuf;
use log::info;
use rand::{ SeedableRng, rngs::StdRng };
use optical_pumping::{
    mkdir,
    synth::{ Dip, SynthConfig, synth_trace },
};
use lib::runs::low_field::*;

const FREQS: [u32; 5] = [20, 30, 40, 50, 60]; // kHz
const SEED_BASE: u64 = 10_987;

const N_SAMPLES: usize = 2000;
const TIME_STEP: f64 = 1e-3; // s
const SWEEP: (f64, f64) = (-10.0, 10.0); // V
const V85_PER_KHZ: f64 = 0.08; // V / kHz
const V87_PER_KHZ: f64 = 0.05; // V / kHz
const DIP_WIDTH: f64 = 12.0; // samples
const NOISE: f64 = 0.15; // V

fn volts_to_sample(v: f64) -> f64 {
    (v - SWEEP.0) / (SWEEP.1 - SWEEP.0) * (N_SAMPLES as f64 - 1.0)
}

/// Two resonance pairs moving apart with the drive frequency, plus the
/// deepest dip pinned at the zero crossing of the sweep.
fn campaign_config(freq: u32) -> SynthConfig {
    let v85 = V85_PER_KHZ * f64::from(freq);
    let v87 = V87_PER_KHZ * f64::from(freq);
    let centers = [-v85, -v87, 0.0, v87, v85];
    let depths = [5.5, 6.5, 8.0, 6.0, 5.0];
    let dips: Vec<Dip>
        = centers.iter().zip(depths)
        .map(|(&c, depth)| {
            Dip { center: volts_to_sample(c), width: DIP_WIDTH, depth }
        })
        .collect();
    SynthConfig {
        n_samples: N_SAMPLES,
        time_step: TIME_STEP,
        sweep_volts: SWEEP,
        dips,
        noise: NOISE,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let outdir = PathBuf::from(DATA_DIR);
    mkdir!(outdir);

    for freq in FREQS {
        let mut rng = StdRng::seed_from_u64(SEED_BASE + u64::from(freq));
        let trace = synth_trace(&mut rng, &campaign_config(freq));
        let path = outdir.join(csv_name(freq));
        trace.to_csv(&path)?;
        info!("wrote {}", path.display());
    }

    println!("done");
    Ok(())
}
