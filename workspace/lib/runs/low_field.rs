//! Low-field sweep campaign recorded 2024-04-18.

pub const DATA_DIR: &str = "4_18_24-OP";
pub const CACHE_FILE: &str = "all_results.npz";

pub const DEFAULT_FREQ_KHZ: u32 = 60;

/// Scope dump for one drive frequency [kHz].
pub fn csv_name(freq: u32) -> String {
    format!("{}kHz_R1000_PT10_D15.csv", freq)
}

// spikes kept (before center, from center) per analysis
pub const OFFSETS_WINDOW: (usize, usize) = (2, 3);
pub const SLOPES_WINDOW: (usize, usize) = (2, 0);

// every run resolves this many spikes
pub const SPIKE_GROUPS: usize = 5;

// figure sizes [in]
pub const FIG_SIZE_TRACE: (f64, f64) = (10.0, 6.0);
pub const FIG_SIZE_PREVIEW: (f64, f64) = (12.0, 6.0);
pub const FIG_SIZE_OFFSETS: (f64, f64) = (12.0, 12.0);
pub const FIG_SIZE_SLOPES: (f64, f64) = (3.5, 3.5 / 1.618);
