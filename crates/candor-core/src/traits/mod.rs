//! Seams of the engine: the calibration store and the text factor strategy.

pub mod calibration_store;
pub mod factor_extractor;

pub use calibration_store::ICalibrationStore;
pub use factor_extractor::IFactorExtractor;
