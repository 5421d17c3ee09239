//! Slider math and white balance.

pub mod sliders;
pub mod white_balance;
