#![allow(dead_code, non_snake_case, non_upper_case_globals)]

pub mod utils;
pub mod atoms;
pub mod trace;
pub mod spike;
pub mod field;
pub mod batch;
pub mod config;
pub mod plot;
pub mod spin;
pub mod zeeman;
pub mod synth;
