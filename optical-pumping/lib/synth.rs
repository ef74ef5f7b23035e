//! Synthesis of absorption traces with Gaussian dips for testing and for
//! generating example data sets.

use std::f64::consts::TAU;
use rand::Rng;
use crate::trace::{ Sample, Trace };

/// A single absorption dip, parameterized in sample coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dip {
    /// Center of the dip. [samples]
    pub center: f64,
    /// Gaussian width of the dip. [samples]
    pub width: f64,
    /// Depth of the dip; positive values dig downward. [V]
    pub depth: f64,
}

/// Parameters for a synthesized trace.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthConfig {
    /// Number of samples in the trace.
    pub n_samples: usize,
    /// Time between consecutive samples. [s]
    pub time_step: f64,
    /// Start and end values of the linear field-voltage sweep. [V]
    pub sweep_volts: (f64, f64),
    /// Absorption dips overlaid on the sweep.
    pub dips: Vec<Dip>,
    /// Standard deviation of the Gaussian noise on the absorption channel.
    /// [V]
    pub noise: f64,
}

/// Draw a standard normal deviate via the Box-Muller transform.
fn gauss<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Synthesize a trace: a linear field-voltage sweep with Gaussian absorption
/// dips and additive noise on the absorption channel.
pub fn synth_trace<R>(rng: &mut R, cfg: &SynthConfig) -> Trace
where R: Rng + ?Sized
{
    let (v0, v1) = cfg.sweep_volts;
    (0..cfg.n_samples)
        .map(|x| {
            let frac
                = if cfg.n_samples > 1 {
                    x as f64 / (cfg.n_samples - 1) as f64
                } else {
                    0.0
                };
            let dips: f64
                = cfg.dips.iter()
                .map(|dip| {
                    let d = x as f64 - dip.center;
                    -dip.depth * (-d * d / (2.0 * dip.width * dip.width)).exp()
                })
                .sum();
            Sample {
                time: x as f64 * cfg.time_step,
                field_voltage: v0 + frac * (v1 - v0),
                absorption_voltage: dips + cfg.noise * gauss(rng),
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use rand::{ SeedableRng, rngs::StdRng };
    use crate::spike::{ ScanConfig, find_spikes };
    use super::*;

    fn test_config() -> SynthConfig {
        SynthConfig {
            n_samples: 400,
            time_step: 1e-3,
            sweep_volts: (-10.0, 10.0),
            dips: vec![
                Dip { center: 120.0, width: 6.0, depth: 6.0 },
                Dip { center: 280.0, width: 6.0, depth: 8.0 },
            ],
            noise: 0.1,
        }
    }

    #[test]
    fn same_seed_same_trace() {
        let cfg = test_config();
        let mut rng0 = StdRng::seed_from_u64(7);
        let mut rng1 = StdRng::seed_from_u64(7);
        let trace0 = synth_trace(&mut rng0, &cfg);
        let trace1 = synth_trace(&mut rng1, &cfg);
        assert_eq!(trace0.len(), 400);
        assert_eq!(trace0, trace1);
    }

    #[test]
    fn scanner_sees_the_configured_dips() {
        let cfg = test_config();
        let mut rng = StdRng::seed_from_u64(7);
        let trace = synth_trace(&mut rng, &cfg);
        let spikes = find_spikes(&trace, ScanConfig::default());
        assert_eq!(spikes.len(), 2);
        assert!((spikes[0].index as f64 - 120.0).abs() <= 6.0);
        assert!((spikes[1].index as f64 - 280.0).abs() <= 6.0);
    }
}
