//! Labeled spectral estimates built on the segment estimator.

use super::config::{SegmentGrid, SpectralConfig, SpectralMode};
use super::helper::{SegmentEstimator, SegmentEstimatorConfig, SegmentedSpectra};
use super::reconstruct::{check_frequency_free, label, reconstruct};
use crate::kernel::KernelLifecycle;
use crate::labeled::{align, DataArray};
use crate::signal::axis::{resolve_dim, sampling_frequency};
use ndarray::ArrayD;
use rustfft::num_complex::Complex64;
use xdsp_core::{Error, Result};

/// Estimator bound to one input's sample dimension.
struct Prepared {
    dim: String,
    axis: usize,
    fs: f64,
    estimator: SegmentEstimator,
}

impl Prepared {
    fn new(x: &DataArray<f64>, config: &SpectralConfig) -> Result<Self> {
        check_frequency_free(x)?;
        let (dim, axis) = resolve_dim(x, config.dim.as_deref())?;
        let (fs, _) = sampling_frequency(x, &dim, config.fs)?;
        let grid = SegmentGrid::resolve(config, fs, x.shape()[axis])?;
        let estimator = SegmentEstimator::try_new(SegmentEstimatorConfig {
            fs,
            grid,
            window: config.window.clone(),
            detrend: config.detrend,
            return_onesided: config.return_onesided,
            scaling: config.scaling,
        })?;
        Ok(Self {
            dim,
            axis,
            fs,
            estimator,
        })
    }

    fn run(
        &self,
        x: &DataArray<f64>,
        y: Option<&DataArray<f64>>,
        mode: SpectralMode,
    ) -> Result<SegmentedSpectra> {
        let y = y.map(|y| y.values().view());
        Ok(self
            .estimator
            .run(x.values().view(), y, self.axis, mode)?)
    }

    fn labeled<T>(
        &self,
        x: &DataArray<f64>,
        frequencies: Vec<f64>,
        times: &[f64],
        values: ArrayD<T>,
        name: String,
    ) -> Result<DataArray<T>> {
        reconstruct(x, &self.dim, self.fs, frequencies, times, values, name)
    }

    fn auto_power(&self, x: &DataArray<f64>, name: String) -> Result<DataArray<f64>> {
        let spectra = self.run(x, None, SpectralMode::Psd)?;
        let values = spectra.values.mapv(|c| c.re);
        self.labeled(x, spectra.frequencies, &spectra.times, values, name)
    }

    fn cross(
        &self,
        x: &DataArray<f64>,
        y: &DataArray<f64>,
        mode: SpectralMode,
        name: String,
    ) -> Result<DataArray<Complex64>> {
        let spectra = self.run(x, Some(y), mode)?;
        self.labeled(x, spectra.frequencies, &spectra.times, spectra.values, name)
    }
}

/// Outer-join `x` and `y`, then lay `y` out in `x`'s dimension order.
fn align_pair(x: &DataArray<f64>, y: &DataArray<f64>) -> Result<(DataArray<f64>, DataArray<f64>)> {
    let (x, y) = align(x, y)?;
    if x.ndim() != y.ndim() || x.dims().iter().any(|d| y.axis_of(d).is_none()) {
        return Err(Error::alignment(format!(
            "cross-spectral inputs must share every dimension: {:?} and {:?}",
            x.dims(),
            y.dims()
        )));
    }
    let y = if y.dims() == x.dims() {
        y
    } else {
        y.transpose_to(x.dims())?
    };
    Ok((x, y))
}

/// Auto-power spectrogram of `x` along its sample dimension.
///
/// Output dims are `["frequency", ..other dims.., dim]`, named `spectrogram_<x>`.
///
/// # Errors
/// - [`Error::InvalidParameter`] for [`SpectralMode::Stft`] (the result is
///   real; take segment transforms from [`crossspectrogram`]) or an invalid
///   segment grid.
/// - [`Error::InvalidAxis`] when the sample dimension cannot be resolved.
pub fn spectrogram(x: &DataArray<f64>, config: &SpectralConfig) -> Result<DataArray<f64>> {
    if config.mode == SpectralMode::Stft {
        return Err(Error::invalid_parameter(
            "mode",
            "spectrogram is real-valued; use crossspectrogram for segment transforms",
        ));
    }
    Prepared::new(x, config)?.auto_power(x, format!("spectrogram_{}", label(x.name())))
}

/// Time-averaged power spectral density of `x`, named `psd_<x>`.
///
/// # Errors
/// Same as [`spectrogram`].
pub fn psd(x: &DataArray<f64>, config: &SpectralConfig) -> Result<DataArray<f64>> {
    let (dim, _) = resolve_dim(x, config.dim.as_deref())?;
    Ok(spectrogram(x, config)?
        .mean_over(&dim)?
        .renamed(format!("psd_{}", label(x.name()))))
}

/// Cross-spectrogram `X · conj(Y)` per segment, after outer-join alignment.
///
/// With [`SpectralMode::Stft`] the result is the scaled segment transform of
/// `x` instead. Named `crossspectrogram_<x>_<y>`.
///
/// # Errors
/// - [`Error::Alignment`] when the inputs cannot be aligned or do not share
///   every dimension.
/// - Any error of [`spectrogram`] other than the mode check.
pub fn crossspectrogram(
    x: &DataArray<f64>,
    y: &DataArray<f64>,
    config: &SpectralConfig,
) -> Result<DataArray<Complex64>> {
    let (xa, ya) = align_pair(x, y)?;
    let name = format!("crossspectrogram_{}_{}", label(x.name()), label(y.name()));
    Prepared::new(&xa, config)?.cross(&xa, &ya, config.mode, name)
}

/// Time-averaged cross spectral density, named `csd_<x>_<y>`.
///
/// # Errors
/// Same as [`crossspectrogram`].
pub fn csd(
    x: &DataArray<f64>,
    y: &DataArray<f64>,
    config: &SpectralConfig,
) -> Result<DataArray<Complex64>> {
    let (dim, _) = resolve_dim(x, config.dim.as_deref())?;
    Ok(crossspectrogram(x, y, config)?
        .mean_over(&dim)?
        .renamed(format!("csd_{}_{}", label(x.name()), label(y.name()))))
}

/// `Pxx`, `Pyy` and `Pxy` (power mode) of one aligned pair.
struct CrossSpectra {
    dim: String,
    nseg: usize,
    pxx: DataArray<f64>,
    pyy: DataArray<f64>,
    pxy: DataArray<Complex64>,
}

impl CrossSpectra {
    fn new(x: &DataArray<f64>, y: &DataArray<f64>, config: &SpectralConfig) -> Result<Self> {
        let (xa, ya) = align_pair(x, y)?;
        let prepared = Prepared::new(&xa, config)?;
        Ok(Self {
            nseg: prepared.estimator.grid().n_segments(),
            pxx: prepared.auto_power(&xa, String::from("pxx"))?,
            pyy: prepared.auto_power(&ya, String::from("pyy"))?,
            pxy: prepared.cross(&xa, &ya, SpectralMode::Psd, String::from("pxy"))?,
            dim: prepared.dim,
        })
    }

    fn normalised(
        pxy: &DataArray<Complex64>,
        pxx: &DataArray<f64>,
        pyy: &DataArray<f64>,
    ) -> Result<DataArray<Complex64>> {
        let denom = pxx.zip_with(pyy, |a, b| (a * b).sqrt())?;
        pxy.zip_with(&denom, |p, d| *p / *d)
    }
}

/// Time-resolved coherency: centred rolling means of `nrolling` segments of
/// `Pxy`, `Pxx` and `Pyy`, combined as `Pxy / sqrt(Pxx · Pyy)`.
///
/// Segments at either edge without a full rolling window are dropped. The
/// mode in `config` is ignored. Named `coherogram_<x>_<y>`.
///
/// # Errors
/// - [`Error::InvalidParameter`] when `nrolling` is zero or exceeds the
///   segment count.
/// - Any error of [`crossspectrogram`].
pub fn coherogram(
    x: &DataArray<f64>,
    y: &DataArray<f64>,
    config: &SpectralConfig,
) -> Result<DataArray<Complex64>> {
    let spectra = CrossSpectra::new(x, y, config)?;
    let w = config.nrolling;
    if w == 0 || w > spectra.nseg {
        return Err(Error::invalid_parameter(
            "nrolling",
            format!(
                "rolling window must be between 1 and the {} available segments, got {w}",
                spectra.nseg
            ),
        ));
    }
    let dim = spectra.dim.as_str();
    let coh = CrossSpectra::normalised(
        &spectra.pxy.rolling_mean_centered(dim, w)?,
        &spectra.pxx.rolling_mean_centered(dim, w)?,
        &spectra.pyy.rolling_mean_centered(dim, w)?,
    )?;
    let valid: Vec<usize> = (w / 2..spectra.nseg - (w - w / 2 - 1)).collect();
    Ok(coh
        .isel(dim, &valid)?
        .renamed(format!("coherogram_{}_{}", label(x.name()), label(y.name()))))
}

/// Coherency `csd / sqrt(psd(x) · psd(y))`, complex per frequency.
///
/// Its magnitude is the coherence, its angle the cross-spectral phase.
/// The mode in `config` is ignored. Named `coherence_<x>_<y>`.
///
/// # Errors
/// Same as [`crossspectrogram`].
pub fn coherence(
    x: &DataArray<f64>,
    y: &DataArray<f64>,
    config: &SpectralConfig,
) -> Result<DataArray<Complex64>> {
    let spectra = CrossSpectra::new(x, y, config)?;
    let dim = spectra.dim.as_str();
    Ok(CrossSpectra::normalised(
        &spectra.pxy.mean_over(dim)?,
        &spectra.pxx.mean_over(dim)?,
        &spectra.pyy.mean_over(dim)?,
    )?
    .renamed(format!("coherence_{}_{}", label(x.name()), label(y.name()))))
}
