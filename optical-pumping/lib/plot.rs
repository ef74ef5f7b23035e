//! PNG figure rendering via `plotters`.
//!
//! Every analysis draws through [`plot`]: named series (lines, dashed fit
//! lines, or scatter groups) over shared axes, rastered at 300 dpi. Figures
//! belonging to a data directory land under its `figures/` subdirectory.

use std::path::{ Path, PathBuf };
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::{ Palette, Palette99 };
use thiserror::Error;

/// Raster resolution [px / in].
pub const DPI: f64 = 300.0;

/// Per-spike color cycle of the batch scatter figures.
pub const SERIES_COLORS: [RGBColor; 5] = [
    RGBColor(255, 0, 0),   // red
    RGBColor(0, 128, 0),   // green
    RGBColor(0, 0, 255),   // blue
    RGBColor(255, 165, 0), // orange
    RGBColor(128, 0, 128), // purple
];

pub const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// A qualitative palette for many-series figures.
pub fn qualitative(k: usize) -> RGBColor {
    let (r, g, b) = Palette99::COLORS[k % Palette99::COLORS.len()];
    RGBColor(r, g, b)
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("couldn't create directory {0}: {1}")]
    Dir(PathBuf, #[source] std::io::Error),

    #[error("nothing to plot for {0}")]
    Empty(PathBuf),

    #[error("couldn't render {0}: {1}")]
    Backend(PathBuf, String),
}

/// How a series is drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeriesKind {
    Line,
    DashedLine,
    Scatter,
}

/// One series of a figure. An empty name keeps the series out of the
/// legend.
#[derive(Clone, Debug)]
pub struct SeriesSpec {
    pub name: String,
    pub color: RGBColor,
    pub kind: SeriesKind,
    pub points: Vec<(f64, f64)>,
}

impl SeriesSpec {
    pub fn line<S>(name: S, color: RGBColor, points: Vec<(f64, f64)>) -> Self
    where S: Into<String>
    {
        Self { name: name.into(), color, kind: SeriesKind::Line, points }
    }

    pub fn dashed<S>(name: S, color: RGBColor, points: Vec<(f64, f64)>) -> Self
    where S: Into<String>
    {
        Self { name: name.into(), color, kind: SeriesKind::DashedLine, points }
    }

    pub fn scatter<S>(name: S, color: RGBColor, points: Vec<(f64, f64)>) -> Self
    where S: Into<String>
    {
        Self { name: name.into(), color, kind: SeriesKind::Scatter, points }
    }
}

/// Figure-level options. The caption may be empty; absent ranges are
/// computed from the data with a 5% margin.
#[derive(Clone, Debug)]
pub struct PlotSpec {
    pub caption: String,
    pub x_desc: String,
    pub y_desc: String,
    /// Figure size [in] at [`DPI`].
    pub size_in: (f64, f64),
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
}

impl PlotSpec {
    pub fn new(caption: &str, x_desc: &str, y_desc: &str, size_in: (f64, f64))
        -> Self
    {
        Self {
            caption: caption.to_string(),
            x_desc: x_desc.to_string(),
            y_desc: y_desc.to_string(),
            size_in,
            x_range: None,
            y_range: None,
        }
    }

    /// Override the x-axis limits.
    pub fn with_x_range(mut self, lo: f64, hi: f64) -> Self {
        self.x_range = Some((lo, hi));
        self
    }

    /// Override the y-axis limits.
    pub fn with_y_range(mut self, lo: f64, hi: f64) -> Self {
        self.y_range = Some((lo, hi));
        self
    }
}

/// `data_dir/figures`, created (with parents) if absent.
pub fn figures_dir<P>(data_dir: P) -> Result<PathBuf, PlotError>
where P: AsRef<Path>
{
    let dir = data_dir.as_ref().join("figures");
    std::fs::create_dir_all(&dir)
        .map_err(|err| PlotError::Dir(dir.clone(), err))?;
    Ok(dir)
}

/// Pixel dimensions of a figure [in] at [`DPI`].
pub fn size_px(size_in: (f64, f64)) -> (u32, u32) {
    ((size_in.0 * DPI).round() as u32, (size_in.1 * DPI).round() as u32)
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    let range = (hi - lo).abs().max(1e-9);
    (lo - 0.05 * range, hi + 0.05 * range)
}

/// Render `series` to a PNG at `path`.
pub fn plot(path: &Path, spec: &PlotSpec, series: &[SeriesSpec])
    -> Result<(), PlotError>
{
    let backend_err
        = |err: String| PlotError::Backend(path.to_path_buf(), err);

    let points = || series.iter().flat_map(|s| s.points.iter());
    if points().next().is_none() {
        return Err(PlotError::Empty(path.to_path_buf()));
    }
    let (x_lo, x_hi) = spec.x_range.unwrap_or_else(|| {
        let lo = points().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let hi = points().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        padded(lo, hi)
    });
    let (y_lo, y_hi) = spec.y_range.unwrap_or_else(|| {
        let lo = points().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let hi = points().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        padded(lo, hi)
    });

    let root = BitMapBackend::new(path, size_px(spec.size_in)).into_drawing_area();
    root.fill(&WHITE).map_err(|err| backend_err(err.to_string()))?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80);
    if !spec.caption.is_empty() {
        builder.caption(&spec.caption, ("sans-serif", 40));
    }
    let mut chart = builder
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|err| backend_err(err.to_string()))?;

    chart.configure_mesh()
        .x_desc(&spec.x_desc)
        .y_desc(&spec.y_desc)
        .label_style(("sans-serif", 24))
        .axis_desc_style(("sans-serif", 28))
        .draw()
        .map_err(|err| backend_err(err.to_string()))?;

    let mut labeled = false;
    for s in series {
        let color = s.color;
        let anno = match s.kind {
            SeriesKind::Line => {
                chart.draw_series(LineSeries::new(
                        s.points.iter().copied(),
                        color.stroke_width(3),
                    ))
                    .map_err(|err| backend_err(err.to_string()))?
            },
            SeriesKind::DashedLine => {
                chart.draw_series(DashedLineSeries::new(
                        s.points.iter().copied(),
                        10,
                        6,
                        color.stroke_width(3),
                    ))
                    .map_err(|err| backend_err(err.to_string()))?
            },
            SeriesKind::Scatter => {
                chart.draw_series(
                        s.points.iter()
                            .map(|&(x, y)| Circle::new((x, y), 6, color.filled()))
                    )
                    .map_err(|err| backend_err(err.to_string()))?
            },
        };
        if !s.name.is_empty() {
            labeled = true;
            match s.kind {
                SeriesKind::Scatter => {
                    anno.label(&s.name)
                        .legend(move |(x, y)| Circle::new((x, y), 6, color.filled()));
                },
                _ => {
                    anno.label(&s.name)
                        .legend(move |(x, y)| PathElement::new(
                            vec![(x - 15, y), (x + 15, y)],
                            color.stroke_width(3),
                        ));
                },
            }
        }
    }

    if labeled {
        chart.configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .label_font(("sans-serif", 24))
            .draw()
            .map_err(|err| backend_err(err.to_string()))?;
    }

    root.present().map_err(|err| backend_err(err.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn tmpdir() -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("optical-pumping-plot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn size_px_at_300_dpi() {
        assert_eq!(size_px((10.0, 6.0)), (3000, 1800));
        assert_eq!(size_px((12.0, 12.0)), (3600, 3600));
        assert_eq!(size_px((3.5, 3.5 / 1.618)), (1050, 649));
    }

    #[test]
    fn figures_dir_is_idempotent() {
        let data_dir = tmpdir().join("campaign");
        let fig1 = figures_dir(&data_dir).unwrap();
        let fig2 = figures_dir(&data_dir).unwrap();
        assert_eq!(fig1, fig2);
        assert!(fig1.is_dir());
        assert_eq!(fig1, data_dir.join("figures"));
    }

    #[test]
    fn renders_a_png() {
        let path = tmpdir().join("smoke.png");
        let spec = PlotSpec::new("smoke", "x", "y", (2.0, 1.5));
        let series = [
            SeriesSpec::line("a", SERIES_COLORS[2], vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.5)]),
            SeriesSpec::scatter("b", SERIES_COLORS[0], vec![(0.5, 0.5)]),
            SeriesSpec::dashed("", SERIES_COLORS[3], vec![(0.0, 0.25), (2.0, 0.25)]),
        ];
        plot(&path, &spec, &series).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn refuses_empty_figures() {
        let path = tmpdir().join("empty.png");
        let spec = PlotSpec::new("", "x", "y", (2.0, 1.5));
        let err = plot(&path, &spec, &[]).unwrap_err();
        assert!(matches!(err, PlotError::Empty(_)));
        let err = plot(&path, &spec, &[SeriesSpec::line("a", ORANGE, vec![])])
            .unwrap_err();
        assert!(matches!(err, PlotError::Empty(_)));
    }
}
