//! SQL query modules.

pub mod calibration_records;
