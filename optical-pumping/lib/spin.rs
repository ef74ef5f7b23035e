//! Half-integer angular momentum quantum numbers.
//!
//! Totals and projections are stored as doubled values ("halves") so that
//! half-integer spins stay exact.

use std::fmt;
use wigner_symbols::ClebschGordan;

/// A total angular momentum quantum number F, I, or J (non-negative
/// half-integer), backed by a `u32` counting halves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpinTotal(u32);

impl SpinTotal {
    /// Create a new total spin from a number of halves.
    pub fn new(halves: u32) -> Self { Self(halves) }

    /// Create from an ordinary value, e.g. `2.5` for F = 5/2.
    ///
    /// *Panics* if the input is not a non-negative half-integer.
    pub fn from_f64(f: f64) -> Self {
        let halves = 2.0 * f;
        assert!(
            f >= 0.0 && (halves - halves.round()).abs() < 1e-6,
            "SpinTotal::from_f64: {} is not a non-negative half-integer", f,
        );
        Self(halves.round() as u32)
    }

    /// Return `self` as a bare number of halves.
    pub fn halves(self) -> u32 { self.0 }

    /// Return `self` as an `f64`.
    ///
    /// This reflects the "true" value of the quantum number; i.e. there is a
    /// relative factor of 2 between this and [`Self::halves`].
    pub fn f(self) -> f64 { f64::from(self.0) / 2.0 }

    /// Number of projection states, 2F + 1.
    pub fn multiplicity(self) -> usize { self.0 as usize + 1 }

    /// Return an iterator over the projections of `self`, ascending from -F
    /// to +F.
    pub fn projections(self) -> Projections {
        Projections { cur: -(self.0 as i32), max: self.0 as i32 }
    }
}

impl fmt::Display for SpinTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}/2", self.0)
        }
    }
}

/// A single spin-projection quantum number mF, mI, or mJ, backed by an
/// `i32` counting halves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpinProj(i32);

impl SpinProj {
    /// Create a new projection from a number of halves.
    pub fn new(halves: i32) -> Self { Self(halves) }

    /// Create from an ordinary value, e.g. `-1.5` for mF = -3/2.
    ///
    /// *Panics* if the input is not a half-integer.
    pub fn from_f64(m: f64) -> Self {
        let halves = 2.0 * m;
        assert!(
            (halves - halves.round()).abs() < 1e-6,
            "SpinProj::from_f64: {} is not a half-integer", m,
        );
        Self(halves.round() as i32)
    }

    /// Return `self` as a bare number of halves.
    pub fn halves(self) -> i32 { self.0 }

    /// Return `self` as an `f64`.
    ///
    /// This reflects the "true" value of the quantum number; i.e. there is a
    /// relative factor of 2 between this and [`Self::halves`].
    pub fn f(self) -> f64 { f64::from(self.0) / 2.0 }
}

impl fmt::Display for SpinProj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}/2", self.0)
        }
    }
}

/// Iterator over the projection numbers of a fixed total spin, ascending.
#[derive(Copy, Clone, Debug)]
pub struct Projections {
    cur: i32,
    max: i32,
}

impl Iterator for Projections {
    type Item = SpinProj;

    fn next(&mut self) -> Option<Self::Item> {
        (self.cur <= self.max)
            .then(|| {
                let m = SpinProj(self.cur);
                self.cur += 2;
                m
            })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n
            = if self.cur > self.max { 0 }
            else { ((self.max - self.cur) / 2 + 1) as usize };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Projections { }

/// Iterator over the total spins available to two coupled angular momenta,
/// ascending. See [`couplings`].
#[derive(Copy, Clone, Debug)]
pub struct Couplings {
    cur: u32,
    max: u32,
}

impl Iterator for Couplings {
    type Item = SpinTotal;

    fn next(&mut self) -> Option<Self::Item> {
        (self.cur <= self.max)
            .then(|| {
                let f = SpinTotal(self.cur);
                self.cur += 2;
                f
            })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n
            = if self.cur > self.max { 0 }
            else { ((self.max - self.cur) / 2 + 1) as usize };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Couplings { }

/// Return an iterator over all total spins reachable by coupling `i` and
/// `j`, ascending from |i - j| to i + j.
pub fn couplings(i: SpinTotal, j: SpinTotal) -> Couplings {
    Couplings { cur: i.0.abs_diff(j.0), max: i.0 + j.0 }
}

/// Compute the Clebsch-Gordan coefficient ⟨i mi, j mj | f mf⟩ for the
/// coupling i + j = f; zero for non-conserving combinations.
pub fn cg(
    i: SpinTotal, mi: SpinProj,
    j: SpinTotal, mj: SpinProj,
    f: SpinTotal, mf: SpinProj,
) -> f64
{
    ClebschGordan {
        tj1: i.halves() as i32,
        tm1: mi.halves(),
        tj2: j.halves() as i32,
        tm2: mj.halves(),
        tj12: f.halves() as i32,
        tm12: mf.halves(),
    }
    .value()
    .into()
}

#[cfg(test)]
mod test {
    use std::f64::consts::FRAC_1_SQRT_2;
    use super::*;

    #[test]
    fn display_uses_half_integer_notation() {
        assert_eq!(SpinTotal::new(5).to_string(), "5/2");
        assert_eq!(SpinTotal::new(4).to_string(), "2");
        assert_eq!(SpinProj::new(-3).to_string(), "-3/2");
        assert_eq!(SpinProj::new(2).to_string(), "1");
        assert_eq!(SpinProj::new(0).to_string(), "0");
    }

    #[test]
    fn projections_ascend() {
        let ms: Vec<i32>
            = SpinTotal::new(3).projections().map(|m| m.halves()).collect();
        assert_eq!(ms, vec![-3, -1, 1, 3]);
        assert_eq!(SpinTotal::new(3).projections().len(), 4);
        assert_eq!(SpinTotal::new(3).multiplicity(), 4);
    }

    #[test]
    fn couplings_span_the_triangle() {
        let fs: Vec<u32>
            = couplings(SpinTotal::new(5), SpinTotal::new(1))
            .map(|f| f.halves())
            .collect();
        assert_eq!(fs, vec![4, 6]);
        let fs: Vec<u32>
            = couplings(SpinTotal::new(3), SpinTotal::new(3))
            .map(|f| f.halves())
            .collect();
        assert_eq!(fs, vec![0, 2, 4, 6]);
    }

    #[test]
    fn from_f64_rounds_halves() {
        assert_eq!(SpinTotal::from_f64(2.5).halves(), 5);
        assert_eq!(SpinProj::from_f64(-1.5).halves(), -3);
    }

    #[test]
    #[should_panic]
    fn from_f64_rejects_non_half_integers() {
        SpinTotal::from_f64(0.3);
    }

    #[test]
    fn singlet_triplet_cg() {
        let h = SpinTotal::new(1);
        let up = SpinProj::new(1);
        let dn = SpinProj::new(-1);
        let m0 = SpinProj::new(0);
        let triplet = cg(h, up, h, dn, SpinTotal::new(2), m0);
        assert!((triplet - FRAC_1_SQRT_2).abs() < 1e-12);
        let singlet = cg(h, up, h, dn, SpinTotal::new(0), m0);
        assert!((singlet - FRAC_1_SQRT_2).abs() < 1e-12);
        let singlet_swapped = cg(h, dn, h, up, SpinTotal::new(0), m0);
        assert!((singlet_swapped + FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn cg_respects_conservation() {
        let h = SpinTotal::new(1);
        let up = SpinProj::new(1);
        // mf != mi + mj
        assert_eq!(cg(h, up, h, up, SpinTotal::new(2), SpinProj::new(0)), 0.0);
        // f outside the triangle
        assert_eq!(cg(h, up, h, up, SpinTotal::new(6), SpinProj::new(2)), 0.0);
    }
}
