use super::{DataArray, MissingValue};
use itertools::Itertools;
use log::debug;
use xdsp_core::{Error, Result};

/// Outer-join two arrays on every dimension they share.
///
/// For each shared dimension carrying an index on both sides, the new index
/// is the sorted union of both and each array is reindexed onto it, with
/// [`MissingValue::missing`] where it had no data. Identical indexes are left
/// untouched. Dimensions present on one side only pass through.
///
/// # Errors
/// - [`Error::Alignment`] when the arrays share no dimension, or a shared
///   dimension has no index to join on and its sizes differ.
pub fn align<T>(x: &DataArray<T>, y: &DataArray<T>) -> Result<(DataArray<T>, DataArray<T>)>
where
    T: Clone + MissingValue,
{
    let shared: Vec<String> = x
        .dims()
        .iter()
        .filter(|d| y.axis_of(d).is_some())
        .cloned()
        .collect();
    if shared.is_empty() {
        return Err(Error::alignment(format!(
            "arrays share no dimension: {:?} and {:?}",
            x.dims(),
            y.dims()
        )));
    }

    let mut x = x.clone();
    let mut y = y.clone();
    for dim in &shared {
        let joined = match (x.index(dim), y.index(dim)) {
            (Some(ix), Some(iy)) if ix == iy => None,
            (Some(ix), Some(iy)) => Some(
                ix.iter()
                    .chain(iy.iter())
                    .copied()
                    .sorted_by(f64::total_cmp)
                    .dedup()
                    .collect::<Vec<f64>>(),
            ),
            _ => {
                if x.len_of(dim) != y.len_of(dim) {
                    return Err(Error::alignment(format!(
                        "dimension `{dim}` has sizes {:?} and {:?} and no index on both sides",
                        x.len_of(dim),
                        y.len_of(dim)
                    )));
                }
                None
            }
        };
        if let Some(index) = joined {
            debug!(
                "aligning `{dim}`: {} and {} labels joined into {}",
                x.len_of(dim).unwrap_or_default(),
                y.len_of(dim).unwrap_or_default(),
                index.len()
            );
            x = x.reindex(dim, &index)?;
            y = y.reindex(dim, &index)?;
        }
    }
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeled::Coordinate;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn series(values: Vec<f64>, index: Vec<f64>) -> DataArray<f64> {
        DataArray::from_series(values, "time", index).expect("series")
    }

    #[test]
    fn identical_indexes_are_untouched() {
        let a = series(vec![1.0, 2.0, 3.0], vec![0.0, 0.1, 0.2]).with_name("a");
        let b = series(vec![4.0, 5.0, 6.0], vec![0.0, 0.1, 0.2]).with_name("b");
        let (ax, bx) = align(&a, &b).expect("aligned");
        assert_eq!(ax, a);
        assert_eq!(bx, b);
    }

    #[test]
    fn outer_join_fills_missing_positions() {
        let a = series(vec![1.0, 2.0, 3.0], vec![0.0, 1.0, 2.0]);
        let b = series(vec![10.0, 20.0], vec![3.0, 1.0]);
        let (ax, bx) = align(&a, &b).expect("aligned");

        let expected = vec![0.0, 1.0, 2.0, 3.0];
        assert_eq!(ax.index("time").expect("index").to_vec(), expected);
        assert_eq!(bx.index("time").expect("index").to_vec(), expected);

        assert_abs_diff_eq!(ax.values()[[1]], 2.0);
        assert!(ax.values()[[3]].is_nan());
        assert!(bx.values()[[0]].is_nan());
        assert_abs_diff_eq!(bx.values()[[1]], 20.0);
        assert!(bx.values()[[2]].is_nan());
        assert_abs_diff_eq!(bx.values()[[3]], 10.0);
    }

    #[test]
    fn unshared_dimensions_pass_through() {
        let a = DataArray::new(array![[1.0, 2.0], [3.0, 4.0]].into_dyn(), ["channel", "time"])
            .expect("2d")
            .with_coord("time", Coordinate::index("time", vec![0.0, 1.0]))
            .expect("index");
        let b = series(vec![5.0, 6.0], vec![1.0, 2.0]);
        let (ax, bx) = align(&a, &b).expect("aligned");
        assert_eq!(ax.shape(), &[2, 3]);
        assert_eq!(bx.shape(), &[3]);
        assert!(ax.values()[[1, 2]].is_nan());
    }

    #[test]
    fn alignment_failures() {
        let a = series(vec![1.0, 2.0], vec![0.0, 1.0]);
        let other = DataArray::from_series(vec![1.0], "depth", vec![0.0]).expect("series");
        assert!(matches!(align(&a, &other), Err(Error::Alignment { .. })));

        let bare = DataArray::new(array![1.0, 2.0, 3.0].into_dyn(), ["time"]).expect("bare");
        assert!(matches!(align(&a, &bare), Err(Error::Alignment { .. })));

        let bare_same = DataArray::new(array![1.0, 2.0].into_dyn(), ["time"]).expect("bare");
        assert!(align(&a, &bare_same).is_ok());
    }
}
