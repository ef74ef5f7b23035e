//! Ground-state structure constants for the rubidium isotopes.

// nuclear spins [halves]
pub const I_85RB: u32 = 5;
pub const I_87RB: u32 = 3;

// magnetic dipole hyperfine constants, 5S1/2 [MHz]
pub const A_HFS_85RB: f64 = 1011.9108130;
pub const A_HFS_87RB: f64 = 3417.341305452145;

// g-factors [dimensionless]
pub const G_J_5S12: f64 = 2.00233113;
pub const G_I_85RB: f64 = -0.00029364000;
pub const G_I_87RB: f64 = -0.0009951414;

// Bohr magneton [MHz / G]
pub const MU_B: f64 = 1.3996245168425658;
