//! Signal processing over labeled arrays.
//!
//! Spectral estimates live in [`spectral`], the analytic signal in
//! [`hilbert`]. [`windows`] and [`detrend`] hold the per-segment kernels both
//! are built from.

pub mod axis;
pub mod detrend;
pub mod hilbert;
pub mod spectral;
pub mod traits;
pub mod windows;

pub use axis::{resolve_dim, sampling_frequency, sampling_step};
pub use detrend::Detrend;
pub use hilbert::{hilbert, HilbertOutput};
pub use spectral::{
    coherence, coherogram, crossspectrogram, csd, psd, spectrogram, Scaling, SpectralConfig,
    SpectralMode,
};
pub use windows::Window;
