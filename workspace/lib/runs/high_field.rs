//! High-field 87Rb campaign recorded 2024-04-25.

pub const DATA_DIR: &str = "High_Field_4_25_24";
pub const CSV_FILE: &str = "87Rb_HighField_T8.csv";
pub const FIG_FILE: &str = "87Rb_kHz_high_field_data_plot.png";

// displayed stretch of the recording [s]
pub const TIME_WINDOW: (f64, f64) = (3660.0, 3740.0);

pub const FIG_SIZE: (f64, f64) = (3.5, 3.5 / 1.618);
