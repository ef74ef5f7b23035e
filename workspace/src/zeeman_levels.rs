#![allow(dead_code, non_snake_case, non_upper_case_globals)]
#![allow(unused_imports, unused_variables, unused_mut)]

use std::path::{ Path, PathBuf };
use itertools::Itertools;
use ndarray as nd;
use optical_pumping::{
    mkdir,
    write_npz,
    atoms,
    plot::{ self, qualitative, PlotSpec, SeriesSpec },
    spin::SpinTotal,
    zeeman::{ HBuilderZeeman, HyperfineParams },
};

const DEMO_PARAMS: HyperfineParams
    = HyperfineParams { a_hfs: 1.0, g_j: 1.0, g_i: 0.01 };
const DEMO_BMAX: f64 = 10.0;
const RB85_BMAX: f64 = 1000.0; // G
const NB: usize = 400;
const FIG_SIZE: (f64, f64) = (10.0, 6.0); // in

/// One line series per row of `curves`, colored qualitatively.
fn curves_series(
    bfield: &nd::Array1<f64>,
    curves: &nd::Array2<f64>,
    labels: &[String],
) -> Vec<SeriesSpec>
{
    curves.outer_iter().zip(labels).enumerate()
        .map(|(k, (row, label))| {
            let points: Vec<(f64, f64)>
                = bfield.iter().zip(&row).map(|(&b, &e)| (b, e)).collect();
            SeriesSpec::line(label.clone(), qualitative(k), points)
        })
        .collect()
}

/// Unit-constant manifold (I = 5/2, J = 1/2): level curves, gaps between
/// consecutive levels of each F manifold, and the raw arrays.
fn demo_levels(outdir: &Path) -> anyhow::Result<()> {
    let builder
        = HBuilderZeeman::new(
            SpinTotal::new(5), SpinTotal::new(1), DEMO_PARAMS, 1.0);
    let basis = builder.basis().to_vec();
    let bfield: nd::Array1<f64> = nd::Array1::linspace(0.0, DEMO_BMAX, NB);
    let curves = builder.level_curves(&bfield);

    let labels: Vec<String> = basis.iter().map(|s| s.to_string()).collect();
    let spec
        = PlotSpec::new(
            "Zeeman level curves", "Magnetic Field B", "Energy", FIG_SIZE);
    plot::plot(
        &outdir.join("demo_levels.png"),
        &spec,
        &curves_series(&bfield, &curves, &labels),
    )?;

    let pairs: Vec<(usize, usize)> = basis.iter().enumerate()
        .tuple_windows()
        .filter(|((_, s1), (_, s2))| s1.f == s2.f)
        .map(|((i, _), (j, _))| (i, j))
        .collect();
    let mut gaps: nd::Array2<f64>
        = nd::Array2::zeros((pairs.len(), bfield.len()));
    let mut labels: Vec<String> = Vec::with_capacity(pairs.len());
    for (r, &(i, j)) in pairs.iter().enumerate() {
        let diff = &curves.row(j) - &curves.row(i);
        gaps.row_mut(r).assign(&diff);
        labels.push(format!("Diff between {} and {}", basis[j], basis[i]));
    }
    let spec = PlotSpec::new(
        "Differences between Consecutive Energy Levels",
        "Magnetic Field B",
        "Energy Difference",
        FIG_SIZE,
    );
    plot::plot(
        &outdir.join("demo_gaps.png"),
        &spec,
        &curves_series(&bfield, &gaps, &labels),
    )?;

    write_npz!(
        outdir.join("demo_levels.npz"),
        arrays: {
            "bfield" => &bfield,
            "levels" => &curves,
            "gaps" => &gaps,
        }
    );
    Ok(())
}

/// Physical 85Rb ground-state structure in MHz over gauss.
fn rb85_levels(outdir: &Path) -> anyhow::Result<()> {
    let params = HyperfineParams {
        a_hfs: atoms::A_HFS_85RB,
        g_j: atoms::G_J_5S12,
        // the Zeeman operator subtracts the nuclear term
        g_i: -atoms::G_I_85RB,
    };
    let builder
        = HBuilderZeeman::new(
            SpinTotal::new(atoms::I_85RB),
            SpinTotal::new(1),
            params,
            atoms::MU_B,
        );
    let basis = builder.basis().to_vec();
    let bfield: nd::Array1<f64> = nd::Array1::linspace(0.0, RB85_BMAX, NB);
    let curves = builder.level_curves(&bfield);

    let labels: Vec<String> = basis.iter().map(|s| s.to_string()).collect();
    let spec = PlotSpec::new(
        "85Rb 5S1/2 ground-state Zeeman structure",
        "B (G)",
        "E (MHz)",
        FIG_SIZE,
    );
    plot::plot(
        &outdir.join("rb85_levels.png"),
        &spec,
        &curves_series(&bfield, &curves, &labels),
    )?;

    write_npz!(
        outdir.join("rb85_levels.npz"),
        arrays: {
            "bfield" => &bfield,
            "levels" => &curves,
        }
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let outdir = PathBuf::from("output/zeeman_levels");
    mkdir!(outdir);

    demo_levels(&outdir)?;
    rb85_levels(&outdir)?;

    println!("done");
    Ok(())
}
