#![allow(dead_code, non_snake_case, non_upper_case_globals)]
#![allow(unused_imports, unused_variables, unused_mut)]

use std::path::PathBuf;
use ndarray as nd;
use optical_pumping::{
    mkdir,
    write_npz,
    plot::{ self, qualitative, PlotSpec, SeriesSpec },
    zeeman::closed_form_levels,
};

// model constants matching the solved I = 3/2, J = 1/2 system
const A: f64 = 1.0;
const H: f64 = 1.0;
const G: f64 = 9.81;
const M: f64 = 1.0;

const BMAX: f64 = 1.0;
const NB: usize = 400;
const FIG_SIZE: (f64, f64) = (10.0, 6.0); // in

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let outdir = PathBuf::from("output/breit_rabi");
    mkdir!(outdir);

    let bfield: nd::Array1<f64> = nd::Array1::linspace(0.0, BMAX, NB);
    let mut levels: nd::Array2<f64> = nd::Array2::zeros((8, NB));
    for (k, &b) in bfield.iter().enumerate() {
        let e = closed_form_levels(A, H, G, M, b);
        levels.column_mut(k).assign(&nd::arr1(&e));
    }

    let series: Vec<SeriesSpec>
        = levels.outer_iter().enumerate()
        .map(|(k, row)| {
            let points: Vec<(f64, f64)>
                = bfield.iter().zip(&row).map(|(&b, &e)| (b, e)).collect();
            SeriesSpec::line("", qualitative(k), points)
        })
        .collect();
    let spec
        = PlotSpec::new("Closed-form Zeeman level curves", "B", "Value", FIG_SIZE);
    plot::plot(&outdir.join("levels.png"), &spec, &series)?;

    write_npz!(
        outdir.join("levels.npz"),
        arrays: {
            "bfield" => &bfield,
            "levels" => &levels,
        }
    );

    println!("done");
    Ok(())
}
