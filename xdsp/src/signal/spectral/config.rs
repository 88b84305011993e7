use crate::kernel::{ConfigError, KernelLifecycle};
use crate::signal::detrend::Detrend;
use crate::signal::windows::Window;
use core::str::FromStr;
use log::debug;
use xdsp_core::num_rs::next_fast_len;
use xdsp_core::Error;

/// Normalisation of power estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Scaling {
    /// Power spectral density, units²/Hz.
    #[default]
    Density,
    /// Power spectrum, units².
    Spectrum,
}

impl FromStr for Scaling {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "density" => Ok(Scaling::Density),
            "spectrum" => Ok(Scaling::Spectrum),
            _ => Err(Error::invalid_parameter(
                "scaling",
                format!("unknown scaling `{s}`, expected `density` or `spectrum`"),
            )),
        }
    }
}

/// What each segment contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SpectralMode {
    /// Scaled (cross) power per segment.
    #[default]
    Psd,
    /// Scaled complex transform of each segment.
    Stft,
}

impl FromStr for SpectralMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "psd" => Ok(SpectralMode::Psd),
            "stft" => Ok(SpectralMode::Stft),
            _ => Err(Error::invalid_parameter(
                "mode",
                format!("unknown mode `{s}`, expected `psd` or `stft`"),
            )),
        }
    }
}

/// Per-segment product, fixed once per estimator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SegmentProduct {
    /// `|X|²`
    AutoPower,
    /// `X · conj(Y)`
    CrossPower,
    /// `X`
    Transform,
}

impl SegmentProduct {
    pub(crate) fn resolve(mode: SpectralMode, cross: bool) -> Self {
        match (mode, cross) {
            (SpectralMode::Stft, _) => SegmentProduct::Transform,
            (SpectralMode::Psd, false) => SegmentProduct::AutoPower,
            (SpectralMode::Psd, true) => SegmentProduct::CrossPower,
        }
    }

    pub(crate) fn is_power(self) -> bool {
        !matches!(self, SegmentProduct::Transform)
    }
}

/// Options shared by every spectral estimate.
///
/// Defaults mirror `scipy.signal.spectrogram` with 50 % overlap:
///
/// | field             | default       |
/// |-------------------|---------------|
/// | `fs`              | from the sample coordinate |
/// | `seglen`          | `None`        |
/// | `overlap_ratio`   | `2`           |
/// | `window`          | [`Window::Hann`] |
/// | `nperseg`         | `256`         |
/// | `noverlap`        | `nperseg / overlap_ratio` |
/// | `nfft`            | `nperseg`, or `next_fast_len(nperseg)` with `seglen` |
/// | `detrend`         | [`Detrend::Constant`] |
/// | `return_onesided` | `true`        |
/// | `scaling`         | [`Scaling::Density`] |
/// | `dim`             | last dimension |
/// | `mode`            | [`SpectralMode::Psd`] |
/// | `nrolling`        | `8`           |
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpectralConfig {
    /// Sampling frequency in Hz.
    pub fs: Option<f64>,
    /// Segment duration in seconds; overrides `nperseg`.
    pub seglen: Option<f64>,
    /// Segment length divided by the default overlap.
    pub overlap_ratio: usize,
    /// Taper applied to each segment.
    pub window: Window,
    /// Samples per segment.
    pub nperseg: usize,
    /// Samples shared by consecutive segments.
    pub noverlap: Option<usize>,
    /// FFT length; segments are zero-padded up to it.
    pub nfft: Option<usize>,
    /// Trend removed from each segment.
    pub detrend: Detrend,
    /// Keep only non-negative frequencies.
    pub return_onesided: bool,
    /// Power normalisation.
    pub scaling: Scaling,
    /// Sample dimension.
    pub dim: Option<String>,
    /// Per-segment product.
    pub mode: SpectralMode,
    /// Segments averaged by the coherogram's rolling mean.
    pub nrolling: usize,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            fs: None,
            seglen: None,
            overlap_ratio: 2,
            window: Window::Hann,
            nperseg: 256,
            noverlap: None,
            nfft: None,
            detrend: Detrend::Constant,
            return_onesided: true,
            scaling: Scaling::Density,
            dim: None,
            mode: SpectralMode::Psd,
            nrolling: 8,
        }
    }
}

impl SpectralConfig {
    /// Set the sampling frequency.
    pub fn with_fs(mut self, fs: f64) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Set the segment duration in seconds.
    pub fn with_seglen(mut self, seglen: f64) -> Self {
        self.seglen = Some(seglen);
        self
    }

    /// Set the overlap ratio.
    pub fn with_overlap_ratio(mut self, overlap_ratio: usize) -> Self {
        self.overlap_ratio = overlap_ratio;
        self
    }

    /// Set the window.
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Set the samples per segment.
    pub fn with_nperseg(mut self, nperseg: usize) -> Self {
        self.nperseg = nperseg;
        self
    }

    /// Set the segment overlap in samples.
    pub fn with_noverlap(mut self, noverlap: usize) -> Self {
        self.noverlap = Some(noverlap);
        self
    }

    /// Set the FFT length.
    pub fn with_nfft(mut self, nfft: usize) -> Self {
        self.nfft = Some(nfft);
        self
    }

    /// Set the detrend model.
    pub fn with_detrend(mut self, detrend: Detrend) -> Self {
        self.detrend = detrend;
        self
    }

    /// Choose one-sided or two-sided spectra.
    pub fn with_onesided(mut self, return_onesided: bool) -> Self {
        self.return_onesided = return_onesided;
        self
    }

    /// Set the power normalisation.
    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Set the sample dimension.
    pub fn with_dim(mut self, dim: impl Into<String>) -> Self {
        self.dim = Some(dim.into());
        self
    }

    /// Set the per-segment product.
    pub fn with_mode(mut self, mode: SpectralMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the coherogram rolling window in segments.
    pub fn with_nrolling(mut self, nrolling: usize) -> Self {
        self.nrolling = nrolling;
        self
    }
}

/// Constructor config for [`SegmentGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentGridConfig {
    /// Sampling frequency in Hz.
    pub fs: f64,
    /// Samples on the analysis axis.
    pub len: usize,
    /// Segment duration in seconds; overrides `nperseg`.
    pub seglen: Option<f64>,
    /// Samples per segment when `seglen` is not given.
    pub nperseg: usize,
    /// Explicit overlap.
    pub noverlap: Option<usize>,
    /// Explicit FFT length.
    pub nfft: Option<usize>,
    /// Default overlap divisor.
    pub overlap_ratio: usize,
}

impl SegmentGridConfig {
    /// Grid options of `config` for an axis of `len` samples at `fs`.
    pub fn from_spectral(config: &SpectralConfig, fs: f64, len: usize) -> Self {
        Self {
            fs,
            len,
            seglen: config.seglen,
            nperseg: config.nperseg,
            noverlap: config.noverlap,
            nfft: config.nfft,
            overlap_ratio: config.overlap_ratio,
        }
    }
}

/// Resolved segmentation of one analysis axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentGrid {
    nperseg: usize,
    noverlap: usize,
    nfft: usize,
    len: usize,
}

impl KernelLifecycle for SegmentGrid {
    type Config = SegmentGridConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if !config.fs.is_finite() || config.fs <= 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "fs",
                reason: "fs must be finite and > 0",
            });
        }
        let (nperseg, default_nfft) = match config.seglen {
            Some(seglen) if !seglen.is_finite() || seglen <= 0.0 => {
                return Err(ConfigError::InvalidArgument {
                    arg: "seglen",
                    reason: "seglen must be finite and > 0",
                });
            }
            Some(seglen) => {
                let nperseg = (seglen * config.fs).round_ties_even() as usize;
                (nperseg, next_fast_len(nperseg))
            }
            None => (config.nperseg, config.nperseg),
        };
        if nperseg == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "nperseg",
                reason: "nperseg must be > 0",
            });
        }
        if nperseg > config.len {
            return Err(ConfigError::SegmentTooLong {
                nperseg,
                available: config.len,
            });
        }
        let noverlap = match config.noverlap {
            Some(noverlap) => noverlap,
            None if config.overlap_ratio == 0 => {
                return Err(ConfigError::InvalidArgument {
                    arg: "overlap_ratio",
                    reason: "overlap_ratio must be > 0",
                });
            }
            None => nperseg / config.overlap_ratio,
        };
        if noverlap >= nperseg {
            return Err(ConfigError::InvalidArgument {
                arg: "noverlap",
                reason: "noverlap must be less than nperseg",
            });
        }
        let nfft = config.nfft.unwrap_or(default_nfft);
        if nfft < nperseg {
            return Err(ConfigError::InvalidArgument {
                arg: "nfft",
                reason: "nfft must be greater than or equal to nperseg",
            });
        }

        debug!(
            "segment grid: nperseg={nperseg} noverlap={noverlap} nfft={nfft} over {} samples",
            config.len
        );
        Ok(Self {
            nperseg,
            noverlap,
            nfft,
            len: config.len,
        })
    }
}

impl SegmentGrid {
    /// Resolve the grid of `config` for an axis of `len` samples at `fs`.
    pub fn resolve(config: &SpectralConfig, fs: f64, len: usize) -> Result<Self, ConfigError> {
        Self::try_new(SegmentGridConfig::from_spectral(config, fs, len))
    }

    /// Samples per segment.
    pub fn nperseg(&self) -> usize {
        self.nperseg
    }

    /// Samples shared by consecutive segments.
    pub fn noverlap(&self) -> usize {
        self.noverlap
    }

    /// FFT length.
    pub fn nfft(&self) -> usize {
        self.nfft
    }

    /// Samples on the analysis axis.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the axis is empty; never true for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Hop between segment starts.
    pub fn step(&self) -> usize {
        self.nperseg - self.noverlap
    }

    /// Number of whole segments on the axis.
    pub fn n_segments(&self) -> usize {
        (self.len - self.nperseg) / self.step() + 1
    }

    /// First sample of every segment.
    pub fn starts(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.n_segments()).map(move |k| k * self.step())
    }

    /// Segment centre times in seconds, relative to the first sample.
    pub fn centre_times(&self, fs: f64) -> Vec<f64> {
        let half = self.nperseg as f64 / 2.0;
        self.starts()
            .map(|start| (start as f64 + half) / fs)
            .collect()
    }
}
