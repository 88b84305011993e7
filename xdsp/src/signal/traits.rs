//! Trait interfaces for signal-processing capabilities.
//!
//! Kernels are built through [`KernelLifecycle::try_new`](crate::kernel::KernelLifecycle)
//! and then run over the [`Read1D`]/[`Write1D`] adapters.

use crate::kernel::{ExecInvariantViolation, Read1D, Write1D};
use rustfft::num_complex::Complex;

/// Window coefficient generation capability.
pub trait WindowGenerate<T> {
    /// Run window generation into a caller-provided output buffer.
    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<T> + ?Sized;

    /// Run window generation and allocate output samples.
    fn run_alloc(&self) -> Result<Vec<T>, ExecInvariantViolation>;
}

/// 1D detrending capability.
pub trait Detrend1D<T> {
    /// Remove the trend from `input` into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Remove the trend from `input` and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// 1D analytic-signal capability.
pub trait AnalyticSignal1D<T> {
    /// Compute the analytic signal of `input` into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<Complex<T>> + ?Sized;

    /// Compute the analytic signal of `input` and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<Complex<T>>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}
