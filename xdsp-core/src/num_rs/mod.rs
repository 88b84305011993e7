//! numpy/scipy-flavoured numeric helpers.

mod fft;

pub use fft::*;
