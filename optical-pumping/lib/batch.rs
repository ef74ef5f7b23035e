//! Directory batch driver and the on-disk results cache.
//!
//! Runs are keyed by the drive frequency encoded in their file names (the
//! digits before the first `k`, so `40kHz_R1000_PT10_D15.csv` -> 40); each
//! processed run contributes the gauss offsets of its windowed spikes.

use std::{ fs, io, path::{ Path, PathBuf } };
use indexmap::IndexMap;
use log::{ info, warn };
use ndarray as nd;
use ndarray_npy::{ NpzReader, NpzWriter, ReadNpzError, WriteNpzError };
use regex::Regex;
use thiserror::Error;
use crate::{
    field::GAUSS_PER_VOLT,
    spike::{ self, ScanConfig },
    trace::{ Trace, TraceError },
};

/// Batch results: drive frequency [kHz] mapped to the gauss offsets of the
/// run's windowed spikes, in spike order.
pub type Results = IndexMap<u32, Vec<f64>>;

/// Errors produced by the batch driver and cache.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("couldn't read {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    /// File name carries no parsable drive frequency.
    #[error("invalid file name format: {0:?} (expected digits before the first `k`)")]
    BadFileName(String),

    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Cache reuse was demanded but no cache file exists.
    #[error("no cached results at {0}")]
    MissingCache(PathBuf),

    #[error("couldn't read cache {0}: {1}")]
    CacheRead(PathBuf, #[source] ReadNpzError),

    #[error("couldn't write cache {0}: {1}")]
    CacheWrite(PathBuf, #[source] WriteNpzError),

    /// Cache holds an array whose name is not a decimal frequency key.
    #[error("cache {0}: unexpected array name {1:?}")]
    BadCacheKey(PathBuf, String),
}

/// How [`run`] reconciles a fresh scan with the cache file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CacheMode {
    /// Always rescan and overwrite the cache.
    Recompute,
    /// Load the cache verbatim when the file exists, else scan and write it.
    ReuseIfPresent,
    /// Load the cache, failing when the file is missing.
    ReuseOrFail,
}

impl Default for CacheMode {
    fn default() -> Self { Self::ReuseIfPresent }
}

impl CacheMode {
    /// Parse a mode name as written in a run card.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recompute" => Some(Self::Recompute),
            "reuse-if-present" => Some(Self::ReuseIfPresent),
            "reuse-or-fail" => Some(Self::ReuseOrFail),
            _ => None,
        }
    }
}

/// Scan and windowing parameters for a batch run.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    pub scan: ScanConfig,
    /// Spikes kept before the central spike.
    pub window_before: usize,
    /// Spikes kept from the central spike onward (0 excludes the center).
    pub window_after: usize,
    /// Sweep calibration [G / V].
    pub gauss_per_volt: f64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            window_before: 2,
            window_after: 3,
            gauss_per_volt: GAUSS_PER_VOLT,
        }
    }
}

/// Extract the drive frequency [kHz] from a run's file name: all decimal
/// digits preceding the first `k`, concatenated.
pub fn freq_key(filename: &str) -> Result<u32, BatchError> {
    let bad = || BatchError::BadFileName(filename.to_string());
    let (prefix, _) = filename.split_once('k').ok_or_else(bad)?;
    let digits: String
        = Regex::new(r"[0-9]+").unwrap()
        .find_iter(prefix)
        .map(|m| m.as_str())
        .collect();
    if digits.is_empty() { return Err(bad()); }
    digits.parse().map_err(|_| bad())
}

/// Scan every run in `dir`, returning spike offsets keyed by drive
/// frequency.
///
/// Entries are processed in file-name order; subdirectories (`figures/` and
/// the like) are skipped. Runs in which no spike is found contribute no
/// entry.
pub fn scan_dir(dir: &Path, cfg: &BatchConfig) -> Result<Results, BatchError> {
    let mut paths: Vec<PathBuf>
        = fs::read_dir(dir)
        .map_err(|err| BatchError::Io(dir.to_path_buf(), err))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, io::Error>>()
        .map_err(|err| BatchError::Io(dir.to_path_buf(), err))?;
    paths.sort();
    let mut results = Results::new();
    for path in paths {
        if !path.is_file() { continue; }
        let name = path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let key = freq_key(&name)?;
        let trace = Trace::from_csv(&path)?;
        if trace.is_empty() { warn!("{}: empty trace", name); }
        let spikes = spike::find_spikes(&trace, cfg.scan);
        info!("{}: {} spikes", name, spikes.len());
        let Some(center) = spike::central_spike(&spikes) else { continue; };
        let relevant
            = spike::window(&spikes, center, cfg.window_before, cfg.window_after);
        let offsets
            = spike::field_offsets(relevant, &spikes[center], cfg.gauss_per_volt);
        results.insert(key, offsets);
    }
    Ok(results)
}

/// Write the whole results mapping to `path` as an npz archive, one `f64`
/// array per frequency key, replacing any previous file.
pub fn save_results(path: &Path, results: &Results) -> Result<(), BatchError> {
    let file = fs::File::create(path)
        .map_err(|err| BatchError::Io(path.to_path_buf(), err))?;
    let mut npz = NpzWriter::new(file);
    for (key, offsets) in results {
        let arr: nd::Array1<f64> = nd::Array1::from(offsets.clone());
        npz.add_array(key.to_string(), &arr)
            .map_err(|err| BatchError::CacheWrite(path.to_path_buf(), err))?;
    }
    npz.finish()
        .map_err(|err| BatchError::CacheWrite(path.to_path_buf(), err))?;
    Ok(())
}

/// Read a results mapping back from `path`, ordered by ascending key.
pub fn load_results(path: &Path) -> Result<Results, BatchError> {
    let file = fs::File::open(path)
        .map_err(|err| BatchError::Io(path.to_path_buf(), err))?;
    let mut npz = NpzReader::new(file)
        .map_err(|err| BatchError::CacheRead(path.to_path_buf(), err))?;
    let names = npz.names()
        .map_err(|err| BatchError::CacheRead(path.to_path_buf(), err))?;
    let mut keyed: Vec<(u32, String)> = Vec::with_capacity(names.len());
    for name in names {
        // archive entries may carry a `.npy` suffix
        let stem = name.strip_suffix(".npy").unwrap_or(&name);
        let key = stem.parse::<u32>()
            .map_err(|_| BatchError::BadCacheKey(path.to_path_buf(), name.clone()))?;
        keyed.push((key, name));
    }
    keyed.sort_by_key(|(key, _)| *key);
    let mut results = Results::new();
    for (key, name) in keyed {
        let arr: nd::Array1<f64> = npz.by_name(&name)
            .map_err(|err| BatchError::CacheRead(path.to_path_buf(), err))?;
        results.insert(key, arr.to_vec());
    }
    Ok(results)
}

/// Run a batch over `dir` according to `mode`.
///
/// A reused cache is loaded verbatim, with no check against the current
/// directory contents.
pub fn run(dir: &Path, cache: &Path, mode: CacheMode, cfg: &BatchConfig)
    -> Result<Results, BatchError>
{
    match mode {
        CacheMode::Recompute => {
            let results = scan_dir(dir, cfg)?;
            save_results(cache, &results)?;
            Ok(results)
        },
        CacheMode::ReuseIfPresent if cache.exists() => {
            info!("reusing cached results at {}", cache.display());
            load_results(cache)
        },
        CacheMode::ReuseIfPresent => {
            let results = scan_dir(dir, cfg)?;
            save_results(cache, &results)?;
            Ok(results)
        },
        CacheMode::ReuseOrFail if cache.exists() => load_results(cache),
        CacheMode::ReuseOrFail => Err(BatchError::MissingCache(cache.to_path_buf())),
    }
}

#[cfg(test)]
mod test {
    use crate::trace::{ Sample, Trace };
    use super::*;

    fn tmpdir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("optical-pumping-batch-{}", std::process::id()))
            .join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    // noiseless gaussian dips over a linear field ramp, 0.25 V per sample
    fn dip_trace(n: usize, dips: &[(f64, f64)]) -> Trace {
        (0..n)
            .map(|k| {
                let x = k as f64;
                let a: f64 = dips.iter()
                    .map(|&(center, depth)| {
                        -depth * (-(x - center).powi(2) / 32.0).exp()
                    })
                    .sum();
                Sample {
                    time: x * 1e-3,
                    field_voltage: x * 0.25,
                    absorption_voltage: a,
                }
            })
            .collect()
    }

    #[test]
    fn freq_keys_from_file_names() {
        assert_eq!(freq_key("40kHz_R1000_PT10_D15.csv").unwrap(), 40);
        assert_eq!(freq_key("60kHz_foo.csv").unwrap(), 60);
        assert_eq!(freq_key("4_18_24kHz.csv").unwrap(), 41824);
        assert!(matches!(
            freq_key("kHz_foo.csv"),
            Err(BatchError::BadFileName(_)),
        ));
        assert!(matches!(
            freq_key("nofreq.csv"),
            Err(BatchError::BadFileName(_)),
        ));
    }

    #[test]
    fn cache_round_trip_sorted_by_key() {
        let path = tmpdir("cache").join("results.npz");
        let mut results = Results::new();
        results.insert(60, vec![1.5]);
        results.insert(40, vec![0.0, 0.25, -0.5]);
        results.insert(80, vec![]);
        save_results(&path, &results).unwrap();
        let back = load_results(&path).unwrap();
        assert_eq!(back, results);
        let keys: Vec<u32> = back.keys().copied().collect();
        assert_eq!(keys, vec![40, 60, 80]);
    }

    #[test]
    fn reuse_or_fail_demands_a_cache() {
        let dir = tmpdir("nocache");
        let missing = dir.join("missing.npz");
        let err = run(&dir, &missing, CacheMode::ReuseOrFail, &BatchConfig::default())
            .unwrap_err();
        assert!(matches!(err, BatchError::MissingCache(_)));
    }

    #[test]
    fn scan_dir_keys_windows_and_skips() {
        let dir = tmpdir("scan");
        std::fs::create_dir_all(dir.join("figures")).unwrap();
        dip_trace(200, &[(60.0, 6.0), (140.0, 8.0)])
            .to_csv(dir.join("20kHz_a.csv")).unwrap();
        dip_trace(200, &[(100.0, 5.0)])
            .to_csv(dir.join("40kHz_b.csv")).unwrap();
        dip_trace(200, &[])
            .to_csv(dir.join("60kHz_quiet.csv")).unwrap();

        let cfg = BatchConfig { gauss_per_volt: 1.0, ..BatchConfig::default() };
        let results = scan_dir(&dir, &cfg).unwrap();
        let keys: Vec<u32> = results.keys().copied().collect();
        assert_eq!(keys, vec![20, 40]);
        // deepest dip at index 140 is central; offsets are voltage
        // differences at 0.25 V per sample
        assert_eq!(results[&20], vec![(60.0 - 140.0) * 0.25, 0.0]);
        assert_eq!(results[&40], vec![0.0]);
    }

    #[test]
    fn scan_dir_rejects_unkeyed_files() {
        let dir = tmpdir("badname");
        dip_trace(10, &[]).to_csv(dir.join("zzz.csv")).unwrap();
        let err = scan_dir(&dir, &BatchConfig::default()).unwrap_err();
        assert!(matches!(err, BatchError::BadFileName(_)));
    }

    #[test]
    fn recompute_writes_the_cache() {
        let dir = tmpdir("recompute");
        dip_trace(200, &[(100.0, 5.0)])
            .to_csv(dir.join("40kHz_b.csv")).unwrap();
        let cache = dir.join("all_results.npz");
        let cfg = BatchConfig::default();
        let fresh = run(&dir, &cache, CacheMode::Recompute, &cfg).unwrap();
        assert!(cache.exists());
        let reused = run(&dir, &cache, CacheMode::ReuseOrFail, &cfg).unwrap();
        assert_eq!(fresh, reused);
    }

    #[test]
    fn cache_mode_names() {
        assert_eq!(CacheMode::from_name("recompute"), Some(CacheMode::Recompute));
        assert_eq!(
            CacheMode::from_name("reuse-if-present"),
            Some(CacheMode::ReuseIfPresent),
        );
        assert_eq!(CacheMode::from_name("reuse-or-fail"), Some(CacheMode::ReuseOrFail));
        assert_eq!(CacheMode::from_name("ask"), None);
    }
}
