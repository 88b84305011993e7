//! Per-segment trend removal.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::signal::traits::Detrend1D;
use core::str::FromStr;
use xdsp_core::Error;

/// Trend removed from each segment before windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Detrend {
    /// Subtract the mean.
    #[default]
    Constant,
    /// Subtract the least-squares line.
    Linear,
    /// Leave segments untouched.
    None,
}

impl FromStr for Detrend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "constant" | "c" => Ok(Detrend::Constant),
            "linear" | "l" => Ok(Detrend::Linear),
            "none" | "false" => Ok(Detrend::None),
            _ => Err(Error::invalid_parameter(
                "detrend",
                format!("unknown detrend `{s}`, expected `constant`, `linear` or `none`"),
            )),
        }
    }
}

/// Constructor config for [`DetrendKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetrendConfig {
    /// Trend model.
    pub kind: Detrend,
}

/// Trait-first detrend kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetrendKernel {
    kind: Detrend,
}

impl KernelLifecycle for DetrendKernel {
    type Config = DetrendConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        Ok(Self { kind: config.kind })
    }
}

impl DetrendKernel {
    /// Detrend `buf` in place.
    pub(crate) fn apply(&self, buf: &mut [f64]) {
        let n = buf.len();
        if n == 0 {
            return;
        }
        match self.kind {
            Detrend::None => {}
            Detrend::Constant => {
                let mean = buf.iter().sum::<f64>() / n as f64;
                buf.iter_mut().for_each(|v| *v -= mean);
            }
            Detrend::Linear => {
                let n_f = n as f64;
                let sum_x = n_f * (n_f - 1.0) / 2.0;
                let sum_x2 = n_f * (n_f - 1.0) * (2.0 * n_f - 1.0) / 6.0;
                let sum_y: f64 = buf.iter().sum();
                let sum_xy: f64 = buf.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
                let denom = n_f * sum_x2 - sum_x * sum_x;
                // A single sample has no slope; fall back to its mean.
                let slope = if denom > 0.0 {
                    (n_f * sum_xy - sum_x * sum_y) / denom
                } else {
                    0.0
                };
                let intercept = (sum_y - slope * sum_x) / n_f;
                buf.iter_mut()
                    .enumerate()
                    .for_each(|(i, v)| *v -= intercept + slope * i as f64);
            }
        }
    }
}

impl Detrend1D<f64> for DetrendKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
        O: Write1D<f64> + ?Sized,
    {
        let input = input.read_slice().map_err(ExecInvariantViolation::from)?;
        let out = out.write_slice_mut().map_err(ExecInvariantViolation::from)?;
        if out.len() != input.len() {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: input.len(),
                got: out.len(),
            });
        }
        out.copy_from_slice(input);
        self.apply(out);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<f64>, ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
    {
        let mut out = input
            .read_slice()
            .map_err(ExecInvariantViolation::from)?
            .to_vec();
        self.apply(&mut out);
        Ok(out)
    }
}
