//! Named tapering windows, following `scipy.signal.get_window`.

mod kernels;

pub use kernels::*;

use core::f64::consts::PI;
use core::str::FromStr;
use xdsp_core::Error;

/// Window family and parameters.
///
/// Parse the scipy spellings with [`str::parse`]: `"hann"`, `"hamming"`,
/// `"blackman"`, `"tukey"` and so on. Parametrised families without a default
/// (`kaiser`, `gaussian`) must be built directly.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Window {
    /// Rectangular window.
    Boxcar,
    /// Triangular window without zero end points.
    Triang,
    /// Triangular window with zero end points.
    Bartlett,
    /// Raised cosine.
    #[default]
    Hann,
    /// Raised cosine with non-zero end points.
    Hamming,
    /// Three-term Blackman window.
    Blackman,
    /// Four-term minimum sidelobe Blackman-Harris window.
    BlackmanHarris,
    /// Four-term Nuttall window.
    Nuttall,
    /// Five-term flat top window.
    FlatTop,
    /// Simple sine window.
    Cosine,
    /// Kaiser window.
    Kaiser {
        /// Shape parameter.
        beta: f64,
    },
    /// Gaussian window.
    Gaussian {
        /// Standard deviation in samples.
        std: f64,
    },
    /// Tapered cosine window.
    Tukey {
        /// Fraction of the window inside the cosine tapered region.
        alpha: f64,
    },
    /// Caller supplied coefficients, one per segment sample.
    Custom(Vec<f64>),
}

impl FromStr for Window {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boxcar" | "box" | "ones" | "rect" | "rectangular" => Ok(Window::Boxcar),
            "triang" | "triangle" | "tri" => Ok(Window::Triang),
            "bartlett" | "bart" | "brt" => Ok(Window::Bartlett),
            "hann" | "hanning" | "han" => Ok(Window::Hann),
            "hamming" | "hamm" | "ham" => Ok(Window::Hamming),
            "blackman" | "black" | "blk" => Ok(Window::Blackman),
            "blackmanharris" | "blackharr" | "bkh" => Ok(Window::BlackmanHarris),
            "nuttall" | "nutl" | "nut" => Ok(Window::Nuttall),
            "flattop" | "flat" | "flt" => Ok(Window::FlatTop),
            "cosine" | "halfcosine" => Ok(Window::Cosine),
            "tukey" | "tuk" => Ok(Window::Tukey { alpha: 0.5 }),
            "kaiser" | "ksr" | "gaussian" | "gauss" | "gss" => Err(Error::invalid_parameter(
                "window",
                format!("window `{s}` needs a shape parameter"),
            )),
            _ => Err(Error::invalid_parameter(
                "window",
                format!("unknown window `{s}`"),
            )),
        }
    }
}

impl Window {
    /// Symmetric coefficients of length `m`.
    ///
    /// [`Window::Custom`] is returned as given.
    pub(crate) fn symmetric(&self, m: usize) -> Vec<f64> {
        if m <= 1 {
            return vec![1.0; m];
        }
        match self {
            Window::Boxcar => vec![1.0; m],
            Window::Triang => triang(m),
            Window::Bartlett => bartlett(m),
            Window::Hann => general_cosine(m, &[0.5, 0.5]),
            Window::Hamming => general_cosine(m, &[0.54, 0.46]),
            Window::Blackman => general_cosine(m, &[0.42, 0.50, 0.08]),
            Window::BlackmanHarris => {
                general_cosine(m, &[0.35875, 0.48829, 0.14128, 0.01168])
            }
            Window::Nuttall => general_cosine(m, &[0.3635819, 0.4891775, 0.1365995, 0.0106411]),
            Window::FlatTop => general_cosine(
                m,
                &[
                    0.21557895,
                    0.41663158,
                    0.277263158,
                    0.083578947,
                    0.006947368,
                ],
            ),
            Window::Cosine => (0..m)
                .map(|i| (PI / m as f64 * (i as f64 + 0.5)).sin())
                .collect(),
            Window::Kaiser { beta } => kaiser(m, *beta),
            Window::Gaussian { std } => {
                let centre = (m as f64 - 1.0) / 2.0;
                let sig2 = 2.0 * std * std;
                (0..m)
                    .map(|i| {
                        let n = i as f64 - centre;
                        (-n * n / sig2).exp()
                    })
                    .collect()
            }
            Window::Tukey { alpha } => tukey(m, *alpha),
            Window::Custom(w) => w.clone(),
        }
    }
}

fn general_cosine(m: usize, a: &[f64]) -> Vec<f64> {
    let step = 2.0 * PI / (m as f64 - 1.0);
    (0..m)
        .map(|i| {
            let fac = -PI + step * i as f64;
            a.iter()
                .enumerate()
                .map(|(k, ak)| ak * (k as f64 * fac).cos())
                .sum()
        })
        .collect()
}

fn triang(m: usize) -> Vec<f64> {
    let half: Vec<f64> = if m.is_multiple_of(2) {
        (1..=m / 2)
            .map(|n| (2.0 * n as f64 - 1.0) / m as f64)
            .collect()
    } else {
        (1..=m.div_ceil(2))
            .map(|n| 2.0 * n as f64 / (m as f64 + 1.0))
            .collect()
    };
    let mirrored = half.iter().rev().skip(m % 2);
    half.iter().chain(mirrored).copied().collect()
}

fn bartlett(m: usize) -> Vec<f64> {
    let span = m as f64 - 1.0;
    (0..m)
        .map(|i| {
            let n = i as f64;
            if n <= span / 2.0 {
                2.0 * n / span
            } else {
                2.0 - 2.0 * n / span
            }
        })
        .collect()
}

/// Modified Bessel function of the first kind, order zero.
fn bessel_i0(x: f64) -> f64 {
    let q = x * x / 4.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    while term > sum * 1e-17 {
        term *= q / (k * k);
        sum += term;
        k += 1.0;
    }
    sum
}

fn kaiser(m: usize, beta: f64) -> Vec<f64> {
    let alpha = (m as f64 - 1.0) / 2.0;
    let denom = bessel_i0(beta);
    (0..m)
        .map(|i| {
            let r = (i as f64 - alpha) / alpha;
            bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / denom
        })
        .collect()
}

fn tukey(m: usize, alpha: f64) -> Vec<f64> {
    if alpha <= 0.0 {
        return vec![1.0; m];
    }
    if alpha >= 1.0 {
        return general_cosine(m, &[0.5, 0.5]);
    }
    let span = m as f64 - 1.0;
    let width = (alpha * span / 2.0).floor() as usize;
    (0..m)
        .map(|i| {
            let n = i as f64;
            if i <= width {
                0.5 * (1.0 + (PI * (-1.0 + 2.0 * n / alpha / span)).cos())
            } else if i < m - width - 1 {
                1.0
            } else {
                0.5 * (1.0 + (PI * (-2.0 / alpha + 1.0 + 2.0 * n / alpha / span)).cos())
            }
        })
        .collect()
}
