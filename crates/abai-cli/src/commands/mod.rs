//! CLI command implementations

pub mod grade;
pub mod lut_info;
