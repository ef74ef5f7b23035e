//! Constants for the recorded data campaigns.

pub mod low_field;
pub mod high_field;
