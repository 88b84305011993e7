//! Trait-first window generation kernels.

use super::Window;
use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Write1D};
use crate::signal::traits::WindowGenerate;

/// Constructor config for [`WindowKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// Window family and parameters.
    pub window: Window,
    /// Output length.
    pub nx: usize,
    /// FFT-bin mode: `true` periodic (spectral analysis), `false` symmetric (filter design).
    pub fftbins: bool,
}

/// Trait-first window generation kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowKernel {
    window: Window,
    nx: usize,
    fftbins: bool,
}

impl KernelLifecycle for WindowKernel {
    type Config = WindowConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.nx == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "nx",
                reason: "window length must be > 0",
            });
        }
        match &config.window {
            Window::Custom(w) if w.len() != config.nx => {
                return Err(ConfigError::WindowLengthMismatch {
                    expected: config.nx,
                    got: w.len(),
                });
            }
            Window::Custom(w) if w.iter().any(|v| !v.is_finite()) => {
                return Err(ConfigError::InvalidArgument {
                    arg: "window",
                    reason: "window coefficients must be finite",
                });
            }
            Window::Kaiser { beta } if !beta.is_finite() => {
                return Err(ConfigError::InvalidArgument {
                    arg: "beta",
                    reason: "kaiser beta must be finite",
                });
            }
            Window::Gaussian { std } if !std.is_finite() || *std <= 0.0 => {
                return Err(ConfigError::InvalidArgument {
                    arg: "std",
                    reason: "gaussian std must be finite and > 0",
                });
            }
            Window::Tukey { alpha } if !alpha.is_finite() => {
                return Err(ConfigError::InvalidArgument {
                    arg: "alpha",
                    reason: "tukey alpha must be finite",
                });
            }
            _ => {}
        }

        Ok(Self {
            window: config.window,
            nx: config.nx,
            fftbins: config.fftbins,
        })
    }
}

impl WindowGenerate<f64> for WindowKernel {
    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<f64> + ?Sized,
    {
        let generated = self.run_alloc()?;
        let out_slice = out
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        if out_slice.len() != generated.len() {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: generated.len(),
                got: out_slice.len(),
            });
        }
        out_slice.copy_from_slice(&generated);
        Ok(())
    }

    fn run_alloc(&self) -> Result<Vec<f64>, ExecInvariantViolation> {
        if let Window::Custom(w) = &self.window {
            return Ok(w.clone());
        }
        if !self.fftbins {
            return Ok(self.window.symmetric(self.nx));
        }
        // Periodic: one extra symmetric sample, then drop it.
        let mut w = self.window.symmetric(self.nx + 1);
        w.truncate(self.nx);
        Ok(w)
    }
}

#[cfg(test)]
mod tests {
    use super::{WindowConfig, WindowKernel};
    use crate::kernel::{ConfigError, KernelLifecycle};
    use crate::signal::traits::WindowGenerate;
    use crate::signal::windows::Window;
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;

    #[test]
    fn periodic_hann_matches_reference() {
        let kernel = WindowKernel::try_new(WindowConfig {
            window: Window::Hann,
            nx: 4,
            fftbins: true,
        })
        .expect("window kernel should initialize");

        let actual = kernel.run_alloc().expect("window run_alloc should succeed");
        [0.0, 0.5, 1.0, 0.5]
            .iter()
            .zip(actual.iter())
            .for_each(|(e, a)| assert_abs_diff_eq!(a, e, epsilon = 1e-12));
    }

    #[test]
    fn window_kernel_run_into_ndarray() {
        let kernel = WindowKernel::try_new(WindowConfig {
            window: Window::Boxcar,
            nx: 8,
            fftbins: false,
        })
        .expect("window kernel should initialize");

        let mut out = Array1::from(vec![0.0f64; 8]);
        kernel
            .run_into(&mut out)
            .expect("window run_into should succeed");
        out.iter()
            .for_each(|v| assert_abs_diff_eq!(*v, 1.0f64, epsilon = 1e-12));

        let mut short = vec![0.0f64; 3];
        assert!(kernel.run_into(&mut short).is_err());
    }

    #[test]
    fn custom_windows_pass_through_unchanged() {
        let kernel = WindowKernel::try_new(WindowConfig {
            window: Window::Custom(vec![0.1, 0.2, 0.3]),
            nx: 3,
            fftbins: true,
        })
        .expect("window kernel should initialize");
        assert_eq!(kernel.run_alloc().expect("custom"), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn window_kernel_constructor_rejects_invalid_config() {
        let err = WindowKernel::try_new(WindowConfig {
            window: Window::Custom(vec![1.0; 4]),
            nx: 32,
            fftbins: true,
        })
        .expect_err("custom window length must match");
        assert_eq!(
            err,
            ConfigError::WindowLengthMismatch {
                expected: 32,
                got: 4
            }
        );

        let err = WindowKernel::try_new(WindowConfig {
            window: Window::Hamming,
            nx: 0,
            fftbins: true,
        })
        .expect_err("empty windows must fail");
        assert_eq!(
            err,
            ConfigError::InvalidArgument {
                arg: "nx",
                reason: "window length must be > 0",
            }
        );

        assert!(WindowKernel::try_new(WindowConfig {
            window: Window::Gaussian { std: 0.0 },
            nx: 16,
            fftbins: true,
        })
        .is_err());
    }
}
