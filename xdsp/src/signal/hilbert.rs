//! Analytic signal via the FFT, analogous to `scipy.signal.hilbert`.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::labeled::DataArray;
use crate::signal::axis::resolve_dim;
use crate::signal::traits::AnalyticSignal1D;
use log::debug;
use ndarray::{ArrayD, Axis, IxDyn};
use rustfft::num_complex::{Complex, Complex64};
use rustfft::FftPlanner;
use xdsp_core::num_rs::next_fast_len;
use xdsp_core::{Error, Result};

/// Constructor config for [`HilbertKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HilbertConfig {
    /// Transform length; inputs are zero-padded or truncated to it.
    pub n: usize,
}

/// Trait-first analytic-signal kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct HilbertKernel {
    n: usize,
    multiplier: Vec<f64>,
}

impl KernelLifecycle for HilbertKernel {
    type Config = HilbertConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        let n = config.n;
        if n == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "n",
                reason: "transform length must be > 0",
            });
        }
        // Keep DC (and Nyquist for even n), double positive frequencies, drop negative ones.
        let mut multiplier = vec![0.0; n];
        multiplier[0] = 1.0;
        if n.is_multiple_of(2) {
            multiplier[1..n / 2].fill(2.0);
            multiplier[n / 2] = 1.0;
        } else {
            multiplier[1..=(n - 1) / 2].fill(2.0);
        }
        Ok(Self { n, multiplier })
    }
}

impl HilbertKernel {
    /// Transform length.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false: a kernel never has a zero transform length.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

impl AnalyticSignal1D<f64> for HilbertKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> core::result::Result<(), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
        O: Write1D<Complex<f64>> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = out.write_slice_mut().map_err(ExecInvariantViolation::from)?;
        if out.len() != self.n {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: self.n,
                got: out.len(),
            });
        }
        for (i, o) in out.iter_mut().enumerate() {
            *o = Complex::new(input.get(i).copied().unwrap_or(0.0), 0.0);
        }

        let mut planner = FftPlanner::<f64>::new();
        planner.plan_fft_forward(self.n).process(out);
        for (o, h) in out.iter_mut().zip(&self.multiplier) {
            *o *= *h;
        }
        planner.plan_fft_inverse(self.n).process(out);
        let scale = 1.0 / self.n as f64;
        out.iter_mut().for_each(|o| *o *= scale);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> core::result::Result<Vec<Complex<f64>>, ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
    {
        let mut out = vec![Complex::new(0.0, 0.0); self.n];
        self.run_into(input, &mut out)?;
        Ok(out)
    }
}

/// Result of [`hilbert`].
#[derive(Debug, Clone, PartialEq)]
pub enum HilbertOutput {
    /// Same length as the input, with every label kept.
    Labeled(DataArray<Complex64>),
    /// An explicit transform length differing from the input length: the bare
    /// transform, with that length along the sample axis and no labels.
    Raw(ArrayD<Complex64>),
}

impl HilbertOutput {
    /// Underlying values.
    pub fn values(&self) -> &ArrayD<Complex64> {
        match self {
            HilbertOutput::Labeled(a) => a.values(),
            HilbertOutput::Raw(v) => v,
        }
    }

    /// The labeled result, if labels were kept.
    pub fn labeled(self) -> Option<DataArray<Complex64>> {
        match self {
            HilbertOutput::Labeled(a) => Some(a),
            HilbertOutput::Raw(_) => None,
        }
    }
}

/// Analytic signal of `x` along `dim` (default: the last dimension).
///
/// Without `n` the transform runs at `next_fast_len(len)` and is truncated
/// back to `len`, returning [`HilbertOutput::Labeled`]. An explicit `n` equal
/// to `len` is labeled too; any other `n` returns [`HilbertOutput::Raw`].
///
/// # Errors
/// - [`Error::InvalidAxis`] when `dim` cannot be resolved.
/// - [`Error::InvalidParameter`] for `n == 0` or an empty sample axis.
pub fn hilbert(x: &DataArray<f64>, n: Option<usize>, dim: Option<&str>) -> Result<HilbertOutput> {
    let (dim, axis) = resolve_dim(x, dim)?;
    let len = x.shape()[axis];
    if len == 0 {
        return Err(Error::invalid_parameter(
            "x",
            format!("sample dimension `{dim}` is empty"),
        ));
    }
    let transform_len = n.unwrap_or_else(|| next_fast_len(len));
    let kernel = HilbertKernel::try_new(HilbertConfig { n: transform_len })?;
    let out_len = if n.is_some() { transform_len } else { len };
    debug!("hilbert: {len} samples along `{dim}` at transform length {transform_len}");

    let mut shape = x.shape().to_vec();
    shape[axis] = out_len;
    let mut out = ArrayD::<Complex64>::zeros(IxDyn(&shape));
    let mut buf = vec![Complex::new(0.0, 0.0); transform_len];
    for (lane, mut out_lane) in x
        .values()
        .lanes(Axis(axis))
        .into_iter()
        .zip(out.lanes_mut(Axis(axis)))
    {
        let samples: Vec<f64> = lane.iter().copied().collect();
        kernel.run_into(&samples, &mut buf)?;
        out_lane.iter_mut().zip(&buf).for_each(|(o, v)| *o = *v);
    }

    if out_len != len {
        return Ok(HilbertOutput::Raw(out));
    }
    Ok(HilbertOutput::Labeled(x.with_values(out)?))
}
