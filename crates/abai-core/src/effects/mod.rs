//! Post-LUT effects: soft glow and grain.

pub mod blur;
pub mod glow;
pub mod grain;

pub use glow::apply_soft_glow;
pub use grain::apply_grain;
