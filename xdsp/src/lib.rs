//! Welch spectra, coherence and analytic signals over labeled arrays.
//!
//! A [`DataArray`] carries named dimensions and coordinates next to its
//! values. The estimators in [`signal`] work along one named sample dimension,
//! infer the sampling frequency from its index and hand back labeled results:
//!
//! ```
//! use xdsp::{psd, DataArray, SpectralConfig};
//!
//! let fs = 64.0;
//! let values: Vec<f64> = (0..1024)
//!     .map(|i| (2.0 * core::f64::consts::PI * 8.0 * i as f64 / fs).sin())
//!     .collect();
//! let index = (0..1024).map(|i| i as f64 / fs).collect();
//! let x = DataArray::from_series(values, "time", index)?.with_name("x");
//!
//! let p = psd(&x, &SpectralConfig::default().with_nperseg(256))?;
//! assert_eq!(p.dims(), ["frequency"]);
//! assert_eq!(p.name(), Some("psd_x"));
//! # Ok::<(), xdsp::Error>(())
//! ```

pub mod kernel;
pub mod labeled;
pub mod signal;

pub use labeled::{align, CoordValues, Coordinate, DataArray};
pub use signal::*;
pub use xdsp_core::{Error, Result};
