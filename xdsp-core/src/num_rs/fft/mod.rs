use ndarray::Array1;

/// Best effort parallel behaviour with scipy's `next_fast_len`.
///
/// Returns the smallest 5-smooth number (a number of the form
/// `2^a * 3^b * 5^c`) that is greater than or equal to `target`. Transforms of
/// such lengths decompose into small radix butterflies and are cheap for
/// [rustfft](https://docs.rs/rustfft).
///
/// # Parameters
/// * `target`: Minimum acceptable length. `0` is returned unchanged.
///
/// # Examples
/// ```
/// use xdsp_core::num_rs::next_fast_len;
///
/// assert_eq!(next_fast_len(97), 100);
/// assert_eq!(next_fast_len(1021), 1024);
/// assert_eq!(next_fast_len(6), 6);
/// ```
pub fn next_fast_len(target: usize) -> usize {
    if target <= 6 || target.is_power_of_two() {
        return target;
    }

    let mut best = target.checked_next_power_of_two().unwrap_or(usize::MAX);
    let mut p5 = 1usize;
    while p5 < target {
        let mut p35 = p5;
        while p35 < target {
            // Smallest power of two lifting p35 to at least `target`.
            let quotient = target.div_ceil(p35);
            let Some(candidate) = quotient
                .checked_next_power_of_two()
                .and_then(|p2| p2.checked_mul(p35))
            else {
                break;
            };
            if candidate == target {
                return candidate;
            }
            best = best.min(candidate);

            p35 = match p35.checked_mul(3) {
                Some(v) => v,
                None => break,
            };
            if p35 == target {
                return p35;
            }
        }
        best = best.min(p35);

        p5 = match p5.checked_mul(5) {
            Some(v) => v,
            None => break,
        };
        if p5 == target {
            return p5;
        }
    }
    best.min(p5)
}

/// Best effort parallel behaviour with numpy's `fft.fftfreq`.
///
/// Sample frequencies of a length-`n` transform in FFT order: non-negative
/// frequencies first, then the negative ones.
///
/// # Parameters
/// * `n`: Transform length.
/// * `d`: Sample spacing (inverse of the sampling rate).
pub fn fftfreq(n: usize, d: f64) -> Array1<f64> {
    if n == 0 {
        return Array1::zeros(0);
    }
    let scale = 1.0 / (n as f64 * d);
    let positive = n.div_ceil(2);
    Array1::from_iter((0..n).map(|k| {
        if k < positive {
            k as f64 * scale
        } else {
            (k as f64 - n as f64) * scale
        }
    }))
}

/// Best effort parallel behaviour with numpy's `fft.rfftfreq`.
///
/// Sample frequencies of the `n / 2 + 1` bins kept by a real-input transform.
///
/// # Parameters
/// * `n`: Transform length.
/// * `d`: Sample spacing (inverse of the sampling rate).
pub fn rfftfreq(n: usize, d: f64) -> Array1<f64> {
    if n == 0 {
        return Array1::zeros(0);
    }
    let scale = 1.0 / (n as f64 * d);
    Array1::from_iter((0..=n / 2).map(|k| k as f64 * scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn next_fast_len_matches_scipy_fftpack() {
        let cases = [
            (0usize, 0usize),
            (1, 1),
            (5, 5),
            (7, 8),
            (11, 12),
            (13, 15),
            (17, 18),
            (50, 50),
            (63, 64),
            (97, 100),
            (101, 108),
            (1000, 1000),
            (1021, 1024),
            (1025, 1080),
        ];
        for (target, expected) in cases {
            assert_eq!(next_fast_len(target), expected, "target {target}");
        }
    }

    #[test]
    fn next_fast_len_is_never_shorter_than_target() {
        for target in 1..2048 {
            let n = next_fast_len(target);
            assert!(n >= target);
            let mut rest = n;
            for p in [2, 3, 5] {
                while rest % p == 0 {
                    rest /= p;
                }
            }
            assert_eq!(rest, 1, "{n} is not 5-smooth");
        }
    }

    #[test]
    fn fftfreq_orders_negative_bins_last() {
        let f = fftfreq(5, 0.1);
        let expected = [0.0, 2.0, 4.0, -4.0, -2.0];
        f.iter()
            .zip(expected.iter())
            .for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-12));

        let f = fftfreq(4, 1.0);
        let expected = [0.0, 0.25, -0.5, -0.25];
        f.iter()
            .zip(expected.iter())
            .for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-12));
    }

    #[test]
    fn rfftfreq_keeps_half_plus_one_bins() {
        let f = rfftfreq(64, 0.01);
        assert_eq!(f.len(), 33);
        assert_abs_diff_eq!(f[1], 100.0 / 64.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[32], 50.0, epsilon = 1e-12);

        assert_eq!(rfftfreq(7, 1.0).len(), 4);
    }
}
