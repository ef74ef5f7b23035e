//! Hyperfine and Zeeman level structure of a single fine-structure manifold
//! in the coupled `|F mF>` basis.
//!
//! The hyperfine interaction is diagonal in this basis; a static magnetic
//! field couples states of equal mF across F manifolds, so the full
//! Hamiltonian is mF-block-diagonal and each block can be diagonalized
//! independently to trace energy levels as functions of the field.

use std::fmt;
use itertools::Itertools;
use ndarray as nd;
use ndarray_linalg::{ EighInto, UPLO };
use num_complex::Complex64 as C64;
use rustc_hash::FxHashMap as HashMap;
use crate::spin::{ SpinProj, SpinTotal, cg, couplings };

/// A single hyperfine state `|F mF>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FState {
    pub f: SpinTotal,
    pub mf: SpinProj,
}

impl fmt::Display for FState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{} {}>", self.f, self.mf)
    }
}

/// Enumerate the coupled basis for nuclear spin `i` and electronic angular
/// momentum `j`, ordered by ascending F and ascending mF within each F.
pub fn coupled_basis(i: SpinTotal, j: SpinTotal) -> Vec<FState> {
    couplings(i, j)
        .flat_map(|f| f.projections().map(move |mf| FState { f, mf }))
        .collect()
}

/// Coupling constants entering the hyperfine + Zeeman Hamiltonian.
///
/// Units are free as long as they are consistent: energies come out in the
/// units of `a_hfs` provided the g-factors, together with the builder's field
/// scale, convert field values to those same units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HyperfineParams {
    /// Magnetic dipole hyperfine constant.
    pub a_hfs: f64,
    /// Electronic (Landé) g-factor.
    pub g_j: f64,
    /// Nuclear g-factor.
    pub g_i: f64,
}

/// Hamiltonian builder for the hyperfine structure of a single
/// fine-structure manifold in a static magnetic field.
///
/// The Hamiltonian is
/// ```text
/// H(B) = H_hf + s B H_Z
/// ```
/// where `H_hf` is diagonal with entries `(A/2) [F(F+1) - I(I+1) - J(J+1)]`,
/// `s` is a fixed field scale, and
/// ```text
/// <F' mF| H_Z |F mF>
///     = Σ_{mI + mJ = mF} <I mI, J mJ|F' mF> <I mI, J mJ|F mF>
///         (g_J mJ - g_I mI)
/// ```
#[derive(Clone, Debug)]
pub struct HBuilderZeeman {
    basis: Vec<FState>,
    nuclear: SpinTotal,
    electronic: SpinTotal,
    pub params: HyperfineParams,
    pub field_scale: f64,
}

impl HBuilderZeeman {
    /// Create a new `HBuilderZeeman` for nuclear spin `nuclear` coupled to
    /// electronic angular momentum `electronic`.
    ///
    /// `field_scale` multiplies every field value passed to the generating
    /// methods before it enters the Hamiltonian; pass e.g. the Bohr magneton
    /// in MHz/G to work with fields in gauss, dimensionless g-factors, and
    /// energies in MHz.
    pub fn new(
        nuclear: SpinTotal,
        electronic: SpinTotal,
        params: HyperfineParams,
        field_scale: f64,
    ) -> Self
    {
        let basis = coupled_basis(nuclear, electronic);
        Self { basis, nuclear, electronic, params, field_scale }
    }

    /// Get a reference to the basis.
    pub fn basis(&self) -> &[FState] { &self.basis }

    /// Diagonal hyperfine shift of a whole F manifold,
    /// `(A/2) [F(F+1) - I(I+1) - J(J+1)]`.
    pub fn hyperfine_shift(&self, f: SpinTotal) -> f64 {
        let ff = f.f();
        let ii = self.nuclear.f();
        let jj = self.electronic.f();
        0.5 * self.params.a_hfs
            * (ff * (ff + 1.0) - ii * (ii + 1.0) - jj * (jj + 1.0))
    }

    /// Matrix element of the field-independent Zeeman operator between two
    /// coupled-basis states; zero unless the mF values match.
    fn zeeman_element(&self, s1: &FState, s2: &FState) -> f64 {
        if s1.mf != s2.mf { return 0.0; }
        let iter
            = self.nuclear.projections()
            .cartesian_product(self.electronic.projections());
        iter.filter(|(mi, mj)| mi.halves() + mj.halves() == s1.mf.halves())
            .map(|(mi, mj)| {
                let c1 = cg(self.nuclear, mi, self.electronic, mj, s1.f, s1.mf);
                let c2 = cg(self.nuclear, mi, self.electronic, mj, s2.f, s2.mf);
                c1 * c2 * (self.params.g_j * mj.f() - self.params.g_i * mi.f())
            })
            .sum()
    }

    /// Compute the field-independent parts of the Hamiltonian: the hyperfine
    /// diagonal and the Zeeman operator.
    fn parts(&self) -> (nd::Array2<C64>, nd::Array2<C64>) {
        let n = self.basis.len();
        let H0: nd::Array2<C64>
            = nd::Array2::from_diag(
                &self.basis.iter()
                    .map(|s| C64::from(self.hyperfine_shift(s.f)))
                    .collect::<nd::Array1<C64>>()
            );
        let mut HZ: nd::Array2<C64> = nd::Array2::zeros((n, n));
        let iter
            = self.basis.iter().enumerate()
            .cartesian_product(self.basis.iter().enumerate());
        for ((j, s1), (i, s2)) in iter {
            if i > j { continue; }
            let elem = C64::from(self.zeeman_element(s1, s2));
            HZ[[i, j]] = elem;
            HZ[[j, i]] = elem;
        }
        (H0, HZ)
    }

    /// Compute the Hamiltonian at a single field value as a 2D array.
    pub fn gen_at(&self, b: f64) -> nd::Array2<C64> {
        let (H0, HZ) = self.parts();
        H0 + HZ * C64::from(self.field_scale * b)
    }

    /// Diagonalize the Hamiltonian at a single field value.
    ///
    /// Eigenvalues are returned in ascending order with eigenvectors in
    /// matching columns.
    pub fn diagonalize_at(&self, b: f64) -> (nd::Array1<f64>, nd::Array2<C64>)
    {
        match self.gen_at(b).eigh_into(UPLO::Lower) {
            Ok((E, V)) => (E, V),
            Err(err) => panic!("unexpected diagonalization error: {}", err),
        }
    }

    /// Compute the energy of every basis state over an array of field values
    /// as a 2D array, with rows corresponding to basis states and columns to
    /// field values.
    ///
    /// The Hamiltonian is mF-block-diagonal, so each block is diagonalized
    /// separately and its eigenvalues are matched to the block's basis states
    /// in order of increasing F. For `a_hfs > 0` this pairs row `k` with the
    /// adiabatic level connecting to `self.basis()[k]` at zero field.
    pub fn level_curves(&self, bfield: &nd::Array1<f64>) -> nd::Array2<f64> {
        let n = self.basis.len();
        let (H0, HZ) = self.parts();
        let mut blocks: HashMap<i32, Vec<usize>> = HashMap::default();
        for (k, s) in self.basis.iter().enumerate() {
            blocks.entry(s.mf.halves()).or_default().push(k);
        }
        let mut curves: nd::Array2<f64> = nd::Array2::zeros((n, bfield.len()));
        for (kb, &b) in bfield.iter().enumerate() {
            let H = &H0 + &HZ * C64::from(self.field_scale * b);
            for block in blocks.values() {
                let m = block.len();
                let mut sub: nd::Array2<C64> = nd::Array2::zeros((m, m));
                for (r, &kr) in block.iter().enumerate() {
                    for (c, &kc) in block.iter().enumerate() {
                        sub[[r, c]] = H[[kr, kc]];
                    }
                }
                let evals: nd::Array1<f64>
                    = match sub.eigh_into(UPLO::Lower) {
                        Ok((E, _)) => E,
                        Err(err) => panic!(
                            "unexpected diagonalization error: {}", err),
                    };
                for (rank, &k) in block.iter().enumerate() {
                    curves[[k, kb]] = evals[rank];
                }
            }
        }
        curves
    }
}

/// Closed-form level energies for the eight coupled states of an I = 3/2,
/// J = 1/2 manifold with no nuclear g-factor, as functions of the field `b`.
///
/// `a` is the hyperfine constant, `h` a dimensionless scale on it, `g` the
/// electronic g-factor (times whatever converts `g * b` to energy), and `m`
/// a projection scale; the stretched states are linear in the field while
/// the paired states follow square-root branches.
pub fn closed_form_levels(a: f64, h: f64, g: f64, m: f64, b: f64) -> [f64; 8] {
    let h2 = h * h;
    let ah2 = a * h2;
    let gmb = g * m * b;
    [
        0.75 * ah2 + 0.5 * gmb,
        0.75 * ah2 - 0.5 * gmb,
        -0.25 * ah2 - (ah2 * ah2 + 0.5 * ah2 * gmb + 0.25 * gmb * gmb).sqrt(),
        -0.25 * ah2 + (ah2 * ah2 + 0.5 * ah2 * gmb + 0.25 * gmb * gmb).sqrt(),
        -0.25 * ah2 - (ah2 * ah2 + 0.25 * gmb * gmb).sqrt(),
        -0.25 * ah2 + (ah2 * ah2 + 0.25 * gmb * gmb).sqrt(),
        -0.25 * ah2 - (ah2 * ah2 - 0.5 * ah2 * gmb + 0.25 * gmb * gmb).sqrt(),
        -0.25 * ah2 + (ah2 * ah2 - 0.5 * ah2 * gmb + 0.25 * gmb * gmb).sqrt(),
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    const DEMO: HyperfineParams
        = HyperfineParams { a_hfs: 1.0, g_j: 1.0, g_i: 0.01 };

    fn demo_builder() -> HBuilderZeeman {
        HBuilderZeeman::new(SpinTotal::new(5), SpinTotal::new(1), DEMO, 1.0)
    }

    #[test]
    fn coupled_basis_structure() {
        let basis = coupled_basis(SpinTotal::new(5), SpinTotal::new(1));
        assert_eq!(basis.len(), 12);
        assert_eq!(
            basis[0],
            FState { f: SpinTotal::new(4), mf: SpinProj::new(-4) },
        );
        assert_eq!(
            basis[5],
            FState { f: SpinTotal::new(6), mf: SpinProj::new(-6) },
        );
        assert_eq!(basis[0].to_string(), "|2 -2>");
        assert_eq!(basis[11].to_string(), "|3 3>");
        let mut sorted = basis.clone();
        sorted.sort();
        assert_eq!(basis, sorted);
    }

    #[test]
    fn hamiltonian_is_hermitian_and_mf_block_diagonal() {
        let builder = demo_builder();
        let basis = builder.basis().to_vec();
        let H = builder.gen_at(3.7);
        let n = basis.len();
        for i in 0..n {
            for j in 0..n {
                assert!((H[[i, j]] - H[[j, i]].conj()).norm() < 1e-12);
                if basis[i].mf != basis[j].mf {
                    assert_eq!(H[[i, j]], C64::from(0.0));
                }
            }
        }
    }

    #[test]
    fn zero_field_reproduces_hyperfine_splitting() {
        let builder = demo_builder();
        let (E, _) = builder.diagonalize_at(0.0);
        assert_eq!(E.len(), 12);
        E.iter().take(5)
            .for_each(|e| assert!((e + 1.75).abs() < 1e-12));
        E.iter().skip(5)
            .for_each(|e| assert!((e - 1.25).abs() < 1e-12));
    }

    #[test]
    fn numeric_levels_match_closed_forms() {
        // I = 3/2, J = 1/2, g_i = 0 is the case the closed forms describe
        let params = HyperfineParams { a_hfs: 1.0, g_j: 9.81, g_i: 0.0 };
        let builder
            = HBuilderZeeman::new(
                SpinTotal::new(3), SpinTotal::new(1), params, 1.0);
        for b in [0.0, 0.1, 0.35, 0.8] {
            let (E, _) = builder.diagonalize_at(b);
            let mut closed = closed_form_levels(1.0, 1.0, 9.81, 1.0, b);
            closed.sort_by(|l, r| l.total_cmp(r));
            E.iter().zip(&closed)
                .for_each(|(e, c)| assert!((e - c).abs() < 1e-9));
        }
    }

    #[test]
    fn level_curves_follow_states() {
        let builder = demo_builder();
        let bfield: nd::Array1<f64> = nd::Array1::linspace(0.0, 10.0, 21);
        let curves = builder.level_curves(&bfield);
        assert_eq!(curves.shape(), &[12, 21]);
        for (k, s) in builder.basis().iter().enumerate() {
            assert!((curves[[k, 0]] - builder.hyperfine_shift(s.f)).abs()
                < 1e-12);
        }
        // stretched states are exactly linear in the field
        let slope = DEMO.g_j * 0.5 - DEMO.g_i * 2.5;
        assert!((curves[[11, 20]] - (1.25 + slope * 10.0)).abs() < 1e-12);
        assert!((curves[[5, 20]] - (1.25 - slope * 10.0)).abs() < 1e-12);
    }
}
