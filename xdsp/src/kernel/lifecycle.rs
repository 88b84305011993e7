use super::ConfigError;

/// Constructor validation lifecycle shared by kernel structs.
///
/// Every spectral building block (window generation, detrending, the segment
/// grid, the segment estimator, the analytic-signal transform) is built from a
/// plain config through [`KernelLifecycle::try_new`], so a constructed kernel is
/// always runnable.
pub trait KernelLifecycle: Sized {
    /// Kernel config type.
    type Config;

    /// Construct a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, KernelLifecycle};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct HopConfig {
        nperseg: usize,
        noverlap: usize,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct HopKernel {
        hop: usize,
    }

    impl KernelLifecycle for HopKernel {
        type Config = HopConfig;

        fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
            if config.noverlap >= config.nperseg {
                return Err(ConfigError::InvalidArgument {
                    arg: "noverlap",
                    reason: "noverlap must be less than nperseg",
                });
            }
            Ok(Self {
                hop: config.nperseg - config.noverlap,
            })
        }
    }

    #[test]
    fn lifecycle_constructor_accepts_valid_config() {
        let kernel = HopKernel::try_new(HopConfig {
            nperseg: 64,
            noverlap: 32,
        })
        .expect("valid config");
        assert_eq!(kernel.hop, 32);
    }

    #[test]
    fn lifecycle_constructor_rejects_invalid_config() {
        let err = HopKernel::try_new(HopConfig {
            nperseg: 64,
            noverlap: 64,
        })
        .expect_err("invalid config");
        assert_eq!(
            err,
            ConfigError::InvalidArgument {
                arg: "noverlap",
                reason: "noverlap must be less than nperseg",
            }
        );
    }
}
