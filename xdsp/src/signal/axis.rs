//! Sample-dimension resolution.

use crate::labeled::DataArray;
use xdsp_core::{Error, Result};

/// Resolve the sample dimension of `x`: `dim` if given, else the last dimension.
///
/// Returns the dimension name and its axis number.
///
/// # Errors
/// - [`Error::InvalidAxis`] for an unknown name or a zero-dimensional array.
pub fn resolve_dim<T>(x: &DataArray<T>, dim: Option<&str>) -> Result<(String, usize)> {
    match dim {
        Some(name) => x
            .axis_of(name)
            .map(|axis| (name.to_string(), axis))
            .ok_or_else(|| {
                Error::invalid_axis(name, format!("dimension not found in {:?}", x.dims()))
            }),
        None => x
            .dims()
            .last()
            .map(|name| (name.clone(), x.ndim() - 1))
            .ok_or_else(|| {
                Error::invalid_axis("", "a zero-dimensional array has no sample dimension")
            }),
    }
}

/// Sampling step of `dim`: the difference of its first two index values.
///
/// # Errors
/// - [`Error::InvalidAxis`] when `dim` has no index coordinate, fewer than two
///   samples, or a step that is zero or not finite.
pub fn sampling_step<T>(x: &DataArray<T>, dim: &str) -> Result<f64> {
    let index = x.index(dim).ok_or_else(|| {
        Error::invalid_axis(dim, "no index coordinate; pass `fs` explicitly")
    })?;
    if index.len() < 2 {
        return Err(Error::invalid_axis(
            dim,
            "at least two samples are needed to infer the sampling step",
        ));
    }
    let dt = index[1] - index[0];
    if !dt.is_finite() || dt == 0.0 {
        return Err(Error::invalid_axis(
            dim,
            format!("sampling step {dt} is not usable"),
        ));
    }
    Ok(dt)
}

/// Sampling frequency and step for `dim`.
///
/// An explicit `fs` wins; otherwise `fs = 1 / sampling_step`.
///
/// # Errors
/// - [`Error::InvalidParameter`] for an explicit `fs` that is not finite and > 0.
/// - Any error of [`sampling_step`] when `fs` is inferred.
pub fn sampling_frequency<T>(x: &DataArray<T>, dim: &str, fs: Option<f64>) -> Result<(f64, f64)> {
    match fs {
        Some(fs) if fs.is_finite() && fs > 0.0 => Ok((fs, 1.0 / fs)),
        Some(fs) => Err(Error::invalid_parameter(
            "fs",
            format!("sampling frequency must be finite and > 0, got {fs}"),
        )),
        None => sampling_step(x, dim).map(|dt| (1.0 / dt, dt)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeled::Coordinate;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, ArrayD, IxDyn};

    fn array() -> DataArray<f64> {
        DataArray::new(Array2::<f64>::zeros((2, 5)).into_dyn(), ["channel", "time"])
            .expect("array")
            .with_coord(
                "time",
                Coordinate::index("time", vec![0.0, 0.01, 0.02, 0.03, 0.04]),
            )
            .expect("index")
    }

    #[test]
    fn defaults_to_last_dimension() {
        let x = array();
        assert_eq!(resolve_dim(&x, None).expect("last"), ("time".to_string(), 1));
        assert_eq!(
            resolve_dim(&x, Some("channel")).expect("named"),
            ("channel".to_string(), 0)
        );
        assert!(matches!(
            resolve_dim(&x, Some("depth")),
            Err(Error::InvalidAxis { .. })
        ));

        let scalar = DataArray::new(ArrayD::<f64>::zeros(IxDyn(&[])), Vec::<String>::new())
            .expect("scalar");
        assert!(resolve_dim(&scalar, None).is_err());
    }

    #[test]
    fn infers_sampling_frequency_from_index() {
        let x = array();
        assert_abs_diff_eq!(sampling_step(&x, "time").expect("step"), 0.01, epsilon = 1e-15);
        let (fs, dt) = sampling_frequency(&x, "time", None).expect("fs");
        assert_abs_diff_eq!(fs, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dt, 0.01, epsilon = 1e-15);

        let (fs, _) = sampling_frequency(&x, "time", Some(250.0)).expect("explicit");
        assert_abs_diff_eq!(fs, 250.0);
        assert!(sampling_frequency(&x, "time", Some(0.0)).is_err());
        assert!(sampling_step(&x, "channel").is_err());
    }
}
