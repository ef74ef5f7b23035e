//! Oscilloscope trace loading.
//!
//! Runs are stored as bare 3-column CSV dumps (time, sweep-coil voltage,
//! absorption photodiode voltage), sometimes with a descriptive header row
//! prepended by the scope software.

use std::{ io, path::{ Path, PathBuf } };
use ndarray as nd;
use thiserror::Error;

/// Errors produced when reading or writing a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Couldn't open or flush the backing file.
    #[error("couldn't read {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    /// The CSV layer itself choked (bad UTF-8, mid-file I/O failure, ...).
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    /// A data row with a column count other than 3.
    #[error("line {line}: expected 3 columns, found {found}")]
    Columns { line: usize, found: usize },

    /// A data row holding a non-numeric field.
    #[error("line {line}: non-numeric value {value:?}")]
    NonNumeric { line: usize, value: String },
}

/// One oscilloscope sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    /// Timestamp [s].
    pub time: f64,
    /// Sweep-coil monitor voltage [V].
    pub field_voltage: f64,
    /// Absorption photodiode voltage [V].
    pub absorption_voltage: f64,
}

/// An ordered run of [`Sample`]s, in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trace(Vec<Sample>);

impl std::ops::Deref for Trace {
    type Target = [Sample];

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl FromIterator<Sample> for Trace {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = Sample>
    {
        Self(iter.into_iter().collect())
    }
}

impl Trace {
    /// Load a trace from a 3-column CSV file.
    ///
    /// No header is required; if the first row fails numeric parsing it is
    /// taken to be one and skipped. Any later malformed row is an error
    /// naming the line.
    pub fn from_csv<P>(path: P) -> Result<Self, TraceError>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|err| TraceError::Io(path.to_path_buf(), err))?;
        Self::from_reader(file)
    }

    /// Like [`from_csv`][Self::from_csv], but reading CSV text from an
    /// arbitrary source.
    pub fn from_reader<R>(reader: R) -> Result<Self, TraceError>
    where R: io::Read
    {
        let mut rdr
            = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut samples: Vec<Sample> = Vec::new();
        for (k, record) in rdr.records().enumerate() {
            let record = record?;
            match parse_row(&record, k + 1) {
                Ok(sample) => { samples.push(sample); },
                Err(_) if k == 0 => { }, // header row
                Err(err) => { return Err(err); },
            }
        }
        Ok(Self(samples))
    }

    /// Write the trace back out as a headerless 3-column CSV readable by
    /// [`from_csv`][Self::from_csv].
    pub fn to_csv<P>(&self, path: P) -> Result<(), TraceError>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let mut wtr = csv::Writer::from_path(path)?;
        for s in self.iter() {
            wtr.write_record([
                s.time.to_string(),
                s.field_voltage.to_string(),
                s.absorption_voltage.to_string(),
            ])?;
        }
        wtr.flush().map_err(|err| TraceError::Io(path.to_path_buf(), err))?;
        Ok(())
    }

    /// Sample times as an array [s].
    pub fn times(&self) -> nd::Array1<f64> {
        self.0.iter().map(|s| s.time).collect()
    }

    /// Sweep-coil voltages as an array [V].
    pub fn field_voltages(&self) -> nd::Array1<f64> {
        self.0.iter().map(|s| s.field_voltage).collect()
    }

    /// Absorption voltages as an array [V].
    pub fn absorption_voltages(&self) -> nd::Array1<f64> {
        self.0.iter().map(|s| s.absorption_voltage).collect()
    }
}

fn parse_row(record: &csv::StringRecord, line: usize) -> Result<Sample, TraceError> {
    if record.len() != 3 {
        return Err(TraceError::Columns { line, found: record.len() });
    }
    let mut vals = [0.0_f64; 3];
    for (val, field) in vals.iter_mut().zip(record.iter()) {
        *val = field.trim().parse()
            .map_err(|_| TraceError::NonNumeric {
                line,
                value: field.trim().to_string(),
            })?;
    }
    Ok(Sample {
        time: vals[0],
        field_voltage: vals[1],
        absorption_voltage: vals[2],
    })
}

#[cfg(test)]
mod test {
    use super::*;

    const PLAIN: &str = "\
0.0,1.0,-0.5
0.001,1.1,-0.25
0.002,1.2,-0.125
";
    const HEADED: &str = "\
Time,Field Voltage,Absorption Voltage
0.0,1.0,-0.5
0.001,1.1,-0.25
0.002,1.2,-0.125
";

    fn tmpfile(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("optical-pumping-trace-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn loads_headerless() {
        let trace = Trace::from_reader(PLAIN.as_bytes()).unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(
            trace[0],
            Sample { time: 0.0, field_voltage: 1.0, absorption_voltage: -0.5 },
        );
    }

    #[test]
    fn skips_header_row() {
        let plain = Trace::from_reader(PLAIN.as_bytes()).unwrap();
        let headed = Trace::from_reader(HEADED.as_bytes()).unwrap();
        assert_eq!(plain, headed);
    }

    #[test]
    fn empty_input_is_empty_trace() {
        let trace = Trace::from_reader("".as_bytes()).unwrap();
        assert!(trace.is_empty());
        let trace = Trace::from_reader("a,b,c\n".as_bytes()).unwrap();
        assert!(trace.is_empty());
    }

    #[test]
    fn later_bad_rows_are_errors() {
        let err = Trace::from_reader("0,1,2\nx,y,z\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TraceError::NonNumeric { line: 2, .. }));
        let err = Trace::from_reader("0,1,2\n3,4\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TraceError::Columns { line: 2, found: 2 }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Trace::from_csv("definitely/not/here.csv").unwrap_err();
        match err {
            TraceError::Io(path, _) =>
                assert_eq!(path, PathBuf::from("definitely/not/here.csv")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn csv_round_trip() {
        let path = tmpfile("round_trip.csv");
        let trace = Trace::from_reader(PLAIN.as_bytes()).unwrap();
        trace.to_csv(&path).unwrap();
        let back = Trace::from_csv(&path).unwrap();
        assert_eq!(trace, back);
    }

    #[test]
    fn column_extractors() {
        let trace = Trace::from_reader(PLAIN.as_bytes()).unwrap();
        assert_eq!(trace.times().to_vec(), vec![0.0, 0.001, 0.002]);
        assert_eq!(trace.field_voltages().to_vec(), vec![1.0, 1.1, 1.2]);
        assert_eq!(trace.absorption_voltages().to_vec(), vec![-0.5, -0.25, -0.125]);
    }
}
