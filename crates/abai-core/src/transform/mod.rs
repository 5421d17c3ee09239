//! Color transform: parameters, per-pixel evaluation, and LUT import/sampling.

pub mod cube;
pub mod evaluate;
pub mod hald;
pub mod lut;
pub mod params;
