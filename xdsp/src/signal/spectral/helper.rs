use super::config::{Scaling, SegmentGrid, SegmentProduct, SpectralMode};
use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle};
use crate::signal::detrend::{Detrend, DetrendConfig, DetrendKernel};
use crate::signal::traits::{Detrend1D, WindowGenerate};
use crate::signal::windows::{Window, WindowConfig, WindowKernel};
use log::{trace, warn};
use ndarray::{Array3, ArrayD, ArrayView1, ArrayViewD, ArrayViewMut2, Axis, IxDyn};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use xdsp_core::num_rs::{fftfreq, rfftfreq};

/// Constructor config for [`SegmentEstimator`].
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentEstimatorConfig {
    /// Sampling frequency in Hz.
    pub fs: f64,
    /// Resolved segmentation of the analysis axis.
    pub grid: SegmentGrid,
    /// Taper applied to each segment, generated periodic.
    pub window: Window,
    /// Trend removed from each segment before tapering.
    pub detrend: Detrend,
    /// Keep only non-negative frequencies.
    pub return_onesided: bool,
    /// Power normalisation.
    pub scaling: Scaling,
}

/// Per-segment spectra of an N-d input.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedSpectra {
    /// Frequency bins in Hz, one-sided or in FFT order.
    pub frequencies: Vec<f64>,
    /// Segment centre times in seconds, relative to the first sample.
    pub times: Vec<f64>,
    /// Values shaped `[frequency, ..other axes.., segment]`.
    pub values: ArrayD<Complex<f64>>,
}

/// Welch-style segment estimator.
///
/// Every segment is detrended, tapered, zero-padded to `nfft` and transformed;
/// the product chosen by [`SpectralMode`] is then scaled per [`Scaling`].
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentEstimator {
    fs: f64,
    grid: SegmentGrid,
    window: Vec<f64>,
    detrend: DetrendKernel,
    onesided: bool,
    scaling: Scaling,
}

impl KernelLifecycle for SegmentEstimator {
    type Config = SegmentEstimatorConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if !config.fs.is_finite() || config.fs <= 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "fs",
                reason: "fs must be finite and > 0",
            });
        }
        let window = WindowKernel::try_new(WindowConfig {
            window: config.window,
            nx: config.grid.nperseg(),
            fftbins: true,
        })?
        .run_alloc()
        .map_err(|_| ConfigError::InvalidArgument {
            arg: "window",
            reason: "window generation failed",
        })?;
        let norm = match config.scaling {
            Scaling::Density => window.iter().map(|w| w * w).sum::<f64>(),
            Scaling::Spectrum => window.iter().sum::<f64>(),
        };
        if norm == 0.0 || !norm.is_finite() {
            return Err(ConfigError::InvalidArgument {
                arg: "window",
                reason: "window normalisation is zero or not finite",
            });
        }
        let detrend = DetrendKernel::try_new(DetrendConfig {
            kind: config.detrend,
        })?;

        Ok(Self {
            fs: config.fs,
            grid: config.grid,
            window,
            detrend,
            onesided: config.return_onesided,
            scaling: config.scaling,
        })
    }
}

impl SegmentEstimator {
    /// Resolved segmentation.
    pub fn grid(&self) -> &SegmentGrid {
        &self.grid
    }

    /// Number of frequency bins produced.
    pub fn nfreq(&self) -> usize {
        let nfft = self.grid.nfft();
        if self.onesided {
            nfft / 2 + 1
        } else {
            nfft
        }
    }

    /// Frequency bins in Hz.
    pub fn frequencies(&self) -> Vec<f64> {
        let d = 1.0 / self.fs;
        if self.onesided {
            rfftfreq(self.grid.nfft(), d).to_vec()
        } else {
            fftfreq(self.grid.nfft(), d).to_vec()
        }
    }

    fn scale(&self, product: SegmentProduct) -> f64 {
        let scale = match self.scaling {
            Scaling::Density => 1.0 / (self.fs * self.window.iter().map(|w| w * w).sum::<f64>()),
            Scaling::Spectrum => 1.0 / self.window.iter().sum::<f64>().powi(2),
        };
        if product.is_power() {
            scale
        } else {
            scale.sqrt()
        }
    }

    /// Segment spectra of `x` (and `y` for cross power) along `axis`.
    ///
    /// With [`SpectralMode::Psd`] each segment yields `|X|²`, or `X · conj(Y)`
    /// when `y` is given. [`SpectralMode::Stft`] yields `X` and ignores `y`.
    ///
    /// # Errors
    /// - [`ExecInvariantViolation::InvalidState`] when `axis` is out of range.
    /// - [`ExecInvariantViolation::LengthMismatch`] when the axis length differs
    ///   from the grid.
    /// - [`ExecInvariantViolation::ShapeMismatch`] when `x` and `y` differ in shape.
    pub fn run(
        &self,
        x: ArrayViewD<'_, f64>,
        y: Option<ArrayViewD<'_, f64>>,
        axis: usize,
        mode: SpectralMode,
    ) -> Result<SegmentedSpectra, ExecInvariantViolation> {
        let product = SegmentProduct::resolve(mode, y.is_some());
        if axis >= x.ndim() {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "analysis axis out of range",
            });
        }
        if x.shape()[axis] != self.grid.len() {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "x",
                expected: self.grid.len(),
                got: x.shape()[axis],
            });
        }
        let y = match (product, y) {
            (SegmentProduct::CrossPower, Some(y)) => {
                if y.shape() != x.shape() {
                    return Err(ExecInvariantViolation::ShapeMismatch {
                        x: x.shape().to_vec(),
                        y: y.shape().to_vec(),
                    });
                }
                Some(y)
            }
            _ => None,
        };

        let mut others: Vec<usize> = x.shape().to_vec();
        others.remove(axis);
        let n_lanes: usize = others.iter().product();
        let nfreq = self.nfreq();
        let nseg = self.grid.n_segments();
        trace!(
            "segment estimator: {product:?} over {n_lanes} lanes, {nseg} segments of {}, nfft={}",
            self.grid.nperseg(),
            self.grid.nfft()
        );

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(self.grid.nfft());
        let mut out = Array3::<Complex<f64>>::zeros((n_lanes, nfreq, nseg));

        let y_lanes: Vec<ArrayView1<'_, f64>> = match &y {
            Some(y) => y.lanes(Axis(axis)).into_iter().collect(),
            None => Vec::new(),
        };
        let mut nan_lanes = 0usize;
        for (i, (x_lane, out_lane)) in x
            .lanes(Axis(axis))
            .into_iter()
            .zip(out.outer_iter_mut())
            .enumerate()
        {
            let x_lane: Vec<f64> = x_lane.iter().copied().collect();
            let y_lane: Option<Vec<f64>> = y_lanes.get(i).map(|l| l.iter().copied().collect());
            if x_lane.iter().chain(y_lane.iter().flatten()).any(|v| v.is_nan()) {
                nan_lanes += 1;
            }
            self.lane_spectra(product, fft.as_ref(), &x_lane, y_lane.as_deref(), out_lane)?;
        }
        if nan_lanes > 0 {
            warn!("{nan_lanes} of {n_lanes} lanes contain NaN; their spectra are NaN");
        }

        let mut shape = others;
        shape.push(nfreq);
        shape.push(nseg);
        let k = shape.len() - 2;
        let mut perm = Vec::with_capacity(shape.len());
        perm.push(k);
        perm.extend(0..k);
        perm.push(k + 1);
        let values = out
            .into_shape_with_order(IxDyn(&shape))
            .map_err(|_| ExecInvariantViolation::InvalidState {
                reason: "segment spectra do not fit the lane shape",
            })?
            .permuted_axes(IxDyn(&perm))
            .as_standard_layout()
            .into_owned();

        Ok(SegmentedSpectra {
            frequencies: self.frequencies(),
            times: self.grid.centre_times(self.fs),
            values,
        })
    }

    fn lane_spectra(
        &self,
        product: SegmentProduct,
        fft: &dyn Fft<f64>,
        x: &[f64],
        y: Option<&[f64]>,
        mut out: ArrayViewMut2<'_, Complex<f64>>,
    ) -> Result<(), ExecInvariantViolation> {
        let nperseg = self.grid.nperseg();
        let nfft = self.grid.nfft();
        let nfreq = self.nfreq();
        let scale = self.scale(product);

        let mut segment = vec![0.0; nperseg];
        let mut x_buf = vec![Complex::new(0.0, 0.0); nfft];
        let mut y_buf = vec![Complex::new(0.0, 0.0); nfft];
        let mut scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        for (k, start) in self.grid.starts().enumerate() {
            let span = start..start + nperseg;
            self.transform_segment(fft, &x[span.clone()], &mut segment, &mut x_buf, &mut scratch)?;
            let mut column = out.column_mut(k);
            match (product, y) {
                (SegmentProduct::AutoPower, _) => {
                    for (o, v) in column.iter_mut().zip(&x_buf) {
                        *o = Complex::new(v.norm_sqr() * scale, 0.0);
                    }
                }
                (SegmentProduct::CrossPower, Some(y)) => {
                    self.transform_segment(fft, &y[span], &mut segment, &mut y_buf, &mut scratch)?;
                    for (o, (a, b)) in column.iter_mut().zip(x_buf.iter().zip(&y_buf)) {
                        *o = *a * b.conj() * scale;
                    }
                }
                (SegmentProduct::CrossPower, None) => {
                    return Err(ExecInvariantViolation::InvalidState {
                        reason: "cross power requires a second input",
                    });
                }
                (SegmentProduct::Transform, _) => {
                    for (o, v) in column.iter_mut().zip(&x_buf) {
                        *o = *v * scale;
                    }
                }
            }
            if product.is_power() && self.onesided {
                // DC and the Nyquist bin of an even transform have no mirror image.
                let last = if nfft.is_multiple_of(2) { nfreq - 1 } else { nfreq };
                column
                    .iter_mut()
                    .take(last)
                    .skip(1)
                    .for_each(|v| *v *= 2.0);
            }
        }
        Ok(())
    }

    fn transform_segment(
        &self,
        fft: &dyn Fft<f64>,
        samples: &[f64],
        segment: &mut [f64],
        buf: &mut [Complex<f64>],
        scratch: &mut [Complex<f64>],
    ) -> Result<(), ExecInvariantViolation> {
        self.detrend.run_into(samples, segment)?;
        for (i, b) in buf.iter_mut().enumerate() {
            *b = match (segment.get(i), self.window.get(i)) {
                (Some(s), Some(w)) => Complex::new(s * w, 0.0),
                _ => Complex::new(0.0, 0.0),
            };
        }
        fft.process_with_scratch(buf, scratch);
        Ok(())
    }
}
