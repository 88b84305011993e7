use crate::labeled::{nearest_indices, Coordinate, DataArray};
use ndarray::{Array1, ArrayD};
use std::collections::BTreeMap;
use xdsp_core::{Error, Result};

/// Name of the dimension added by every spectral estimate.
pub const FREQUENCY_DIM: &str = "frequency";

/// Fail when `x` already uses the frequency name for a dimension or coordinate.
pub(crate) fn check_frequency_free<T>(x: &DataArray<T>) -> Result<()> {
    if x.axis_of(FREQUENCY_DIM).is_some() || x.coord(FREQUENCY_DIM).is_some() {
        return Err(Error::invalid_axis(
            FREQUENCY_DIM,
            "input already has a dimension or coordinate with this name",
        ));
    }
    Ok(())
}

/// Renders a missing array name the way the source tool did.
pub(crate) fn label(name: Option<&str>) -> &str {
    name.unwrap_or("None")
}

/// Label segment spectra computed from `original` along `dim`.
///
/// `values` must be shaped `[frequency, ..other dims.., segment]`. The result
/// carries a `frequency` index, `dim` re-indexed by `times` offset by the first
/// sample coordinate, and every coordinate spanning `dim` resampled at the
/// sample nearest each segment centre. Other coordinates are kept as they are.
///
/// When `dim` has no index, samples are taken to sit at `i / fs`.
///
/// # Errors
/// - [`Error::InvalidAxis`] when `dim` is unknown or `frequency` is already taken.
/// - [`Error::ExecInvariantViolation`] when `values` does not fit the labels.
pub fn reconstruct<S, T>(
    original: &DataArray<S>,
    dim: &str,
    fs: f64,
    frequencies: Vec<f64>,
    times: &[f64],
    values: ArrayD<T>,
    name: String,
) -> Result<DataArray<T>> {
    check_frequency_free(original)?;
    let axis = original.axis_of(dim).ok_or_else(|| {
        Error::invalid_axis(dim, format!("dimension not found in {:?}", original.dims()))
    })?;

    let mut dims = Vec::with_capacity(original.ndim() + 1);
    dims.push(FREQUENCY_DIM.to_string());
    dims.extend(original.dims().iter().filter(|d| *d != dim).cloned());
    dims.push(dim.to_string());

    let mut expected = Vec::with_capacity(dims.len());
    expected.push(frequencies.len());
    expected.extend(
        original
            .shape()
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != axis)
            .map(|(_, &n)| n),
    );
    expected.push(times.len());
    if values.shape() != expected.as_slice() {
        return Err(Error::ExecInvariantViolation {
            reason: format!(
                "spectra shaped {:?} cannot be labeled as {:?} {:?}",
                values.shape(),
                dims,
                expected
            ),
        });
    }

    let sample_positions = match original.index(dim) {
        Some(index) => index.to_owned(),
        None => Array1::from_iter((0..original.shape()[axis]).map(|i| i as f64 / fs)),
    };
    let t0 = sample_positions.first().copied().unwrap_or(0.0);
    let new_times: Vec<f64> = times.iter().map(|t| t + t0).collect();
    let nearest = nearest_indices(sample_positions.view(), &new_times);

    let mut coords: BTreeMap<String, Coordinate> = original
        .coords()
        .filter(|(key, _)| *key != dim)
        .map(|(key, coord)| {
            let coord = if coord.depends_on(dim) {
                coord.select_along(dim, &nearest)
            } else {
                coord.clone()
            };
            (key.to_string(), coord)
        })
        .collect();
    coords.insert(dim.to_string(), Coordinate::index(dim, new_times));
    coords.insert(
        FREQUENCY_DIM.to_string(),
        Coordinate::index(FREQUENCY_DIM, frequencies),
    );

    DataArray::from_parts(values, dims, coords, Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeled::CoordValues;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, Array3, IxDyn};

    fn source() -> DataArray<f64> {
        DataArray::new(Array2::<f64>::zeros((10, 2)).into_dyn(), ["time", "channel"])
            .expect("array")
            .with_coord(
                "time",
                Coordinate::index("time", (0..10).map(|i| 5.0 + i as f64 * 0.5).collect()),
            )
            .expect("time")
            .with_coord(
                "marker",
                Coordinate::labels("time", (0..10).map(|i| format!("m{i}")).collect()),
            )
            .expect("marker")
            .with_coord("channel", Coordinate::labels("channel", vec!["left", "right"]))
            .expect("channel")
    }

    #[test]
    fn moves_sample_dim_last_and_resamples_coordinates() {
        let x = source();
        let values = Array3::<f64>::ones((3, 2, 2)).into_dyn();
        let out = reconstruct(
            &x,
            "time",
            2.0,
            vec![0.0, 0.5, 1.0],
            &[1.0, 2.25],
            values,
            "spectrogram_x".to_string(),
        )
        .expect("labeled");

        assert_eq!(out.dims(), ["frequency", "channel", "time"]);
        assert_eq!(out.name(), Some("spectrogram_x"));
        let times = out.index("time").expect("time index");
        assert_abs_diff_eq!(times[0], 6.0);
        assert_abs_diff_eq!(times[1], 7.25);
        assert_eq!(out.index("frequency").expect("freq").len(), 3);

        let marker = out.coord("marker").expect("marker");
        let CoordValues::Label(labels) = marker.values() else {
            panic!("marker should stay a label coordinate");
        };
        // 7.25 ties between 7.0 and 7.5; the later sample wins.
        assert_eq!(labels.iter().cloned().collect::<Vec<_>>(), vec!["m2", "m5"]);
        assert_eq!(out.coord("channel"), x.coord("channel"));
    }

    #[test]
    fn implicit_grid_without_index() {
        let x = DataArray::new(Array2::<f64>::zeros((1, 8)).into_dyn(), ["trial", "sample"])
            .expect("array");
        let out = reconstruct(
            &x,
            "sample",
            4.0,
            vec![0.0],
            &[0.5],
            ArrayD::<f64>::zeros(IxDyn(&[1, 1, 1])),
            "psd_None".to_string(),
        )
        .expect("labeled");
        assert_abs_diff_eq!(out.index("sample").expect("sample")[0], 0.5);
    }

    #[test]
    fn rejects_frequency_clash_and_bad_shapes() {
        let x = source();
        let err = reconstruct(
            &x,
            "time",
            2.0,
            vec![0.0],
            &[1.0],
            ArrayD::<f64>::zeros(IxDyn(&[1, 3, 1])),
            "bad".to_string(),
        )
        .expect_err("shape mismatch");
        assert!(matches!(err, Error::ExecInvariantViolation { .. }));

        let clash = x
            .with_coord("frequency", Coordinate::labels("channel", vec!["a", "b"]))
            .expect("aux coordinate");
        assert!(matches!(
            check_frequency_free(&clash),
            Err(Error::InvalidAxis { .. })
        ));
        assert_eq!(label(None), "None");
    }
}
