//! Welch-style spectral estimates over labeled arrays, analogous to
//! `scipy.signal.spectrogram` / `csd` / `coherence`.
//!
//! Every estimate splits the sample dimension into overlapping segments,
//! detrends and tapers each one, and transforms it with `rustfft`. The result
//! gains a leading `frequency` dimension; the sample dimension moves last and
//! is re-indexed by segment centre times.

mod config;
mod derived;
mod helper;
mod reconstruct;

pub use config::{Scaling, SegmentGrid, SegmentGridConfig, SpectralConfig, SpectralMode};
pub use derived::{coherence, coherogram, crossspectrogram, csd, psd, spectrogram};
pub use helper::{SegmentEstimator, SegmentEstimatorConfig, SegmentedSpectra};
pub use reconstruct::{reconstruct, FREQUENCY_DIM};
