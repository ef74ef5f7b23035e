//! Resonance spike detection over absorption traces.
//!
//! A "spike" is a sharp downward excursion of the absorption voltage marking
//! a resonance crossing. The scan records the low point of the falling edge,
//! i.e. the last sample before the signal turns back up.

use crate::trace::Sample;

/// Scan parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScanConfig {
    /// Absorption voltage below which a low point counts as a spike [V].
    pub threshold: f64,
    /// De-bounce horizon [samples]: after recording, the scanner re-arms
    /// only once the signal sits lower this far ahead than it does now,
    /// i.e. a fresh excursion has begun.
    pub lookahead: usize,
}

impl Default for ScanConfig {
    fn default() -> Self { Self { threshold: -4.0, lookahead: 50 } }
}

/// A detected resonance spike.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spike {
    /// Index of the recorded sample within the scanned trace.
    pub index: usize,
    /// Absorption voltage of the recorded sample [V].
    pub absorption_voltage: f64,
    /// Sweep-coil voltage of the recorded sample [V].
    pub field_voltage: f64,
}

/// Scan a trace for downward absorption spikes, in index order.
///
/// Single forward pass over first differences of the absorption voltage: a
/// rising step off a sub-threshold sample records that sample as a spike and
/// disarms the scanner. The re-arm check runs at every step regardless;
/// where the trace ends within `lookahead` samples there is nothing to check
/// against and the scanner stays disarmed.
pub fn find_spikes(samples: &[Sample], cfg: ScanConfig) -> Vec<Spike> {
    let mut spikes: Vec<Spike> = Vec::new();
    let mut armed = true;
    for j in 1..samples.len() {
        let prev = samples[j - 1].absorption_voltage;
        let cur = samples[j].absorption_voltage;
        if armed && prev < cfg.threshold && cur - prev > 0.0 {
            spikes.push(Spike {
                index: j - 1,
                absorption_voltage: prev,
                field_voltage: samples[j - 1].field_voltage,
            });
            armed = false;
        }
        if let Some(ahead) = samples.get(j + cfg.lookahead) {
            if cur - ahead.absorption_voltage > 0.0 { armed = true; }
        }
    }
    spikes
}

/// Index (into the slice) of the deepest spike, i.e. the one of minimum
/// absorption voltage, first winning ties; `None` for an empty slice.
pub fn central_spike(spikes: &[Spike]) -> Option<usize> {
    let mut acc: Option<(usize, f64)> = None;
    for (k, spike) in spikes.iter().enumerate() {
        match acc {
            Some((_, low)) if spike.absorption_voltage >= low => { },
            _ => { acc = Some((k, spike.absorption_voltage)); },
        }
    }
    acc.map(|(k, _)| k)
}

/// Slice out up to `before` spikes before `center` and `after` spikes from
/// `center` onward, clamped to the ends of the list.
///
/// `after` counts from the center itself: `after = 3` keeps the center plus
/// the two spikes following it, while `after = 0` excludes the center
/// entirely.
pub fn window(spikes: &[Spike], center: usize, before: usize, after: usize)
    -> &[Spike]
{
    let start = center.saturating_sub(before).min(spikes.len());
    let end = center.saturating_add(after).clamp(start, spikes.len());
    &spikes[start..end]
}

/// Field offsets of the windowed spikes relative to the central spike, in
/// gauss when `gauss_per_volt` is [`GAUSS_PER_VOLT`][crate::field::GAUSS_PER_VOLT].
///
/// Each offset is the spike's sweep-voltage difference from the central
/// spike scaled by the calibration factor, so the central spike itself maps
/// to exactly zero.
pub fn field_offsets(window: &[Spike], central: &Spike, gauss_per_volt: f64)
    -> Vec<f64>
{
    window.iter()
        .map(|s| (s.field_voltage - central.field_voltage) * gauss_per_volt)
        .collect()
}
