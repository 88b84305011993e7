use ndarray::{Array1, ArrayD, ArrayView1, Axis, Ix1, IxDyn};
use xdsp_core::{Error, Result};

/// Values carried by a [`Coordinate`].
#[derive(Debug, Clone, PartialEq)]
pub enum CoordValues {
    /// Numeric positions or measurements.
    Float(ArrayD<f64>),
    /// Free-form labels, e.g. event markers along the time axis.
    Label(ArrayD<String>),
}

impl CoordValues {
    /// Shape of the underlying values.
    pub fn shape(&self) -> &[usize] {
        match self {
            CoordValues::Float(v) => v.shape(),
            CoordValues::Label(v) => v.shape(),
        }
    }

    /// Number of dimensions of the underlying values.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Borrow float values, if these are numeric.
    pub fn as_float(&self) -> Option<&ArrayD<f64>> {
        match self {
            CoordValues::Float(v) => Some(v),
            CoordValues::Label(_) => None,
        }
    }

    /// Borrow label values, if these are labels.
    pub fn as_label(&self) -> Option<&ArrayD<String>> {
        match self {
            CoordValues::Label(v) => Some(v),
            CoordValues::Float(_) => None,
        }
    }

    /// Gather `positions` along `axis`.
    pub(crate) fn select(&self, axis: Axis, positions: &[usize]) -> Self {
        match self {
            CoordValues::Float(v) => CoordValues::Float(v.select(axis, positions)),
            CoordValues::Label(v) => CoordValues::Label(v.select(axis, positions)),
        }
    }

    /// Gather `positions` along `axis`, filling `None` slots with NaN or `""`.
    pub(crate) fn reindex(&self, axis: Axis, positions: &[Option<usize>]) -> Self {
        match self {
            CoordValues::Float(v) => CoordValues::Float(reindex_axis(v, axis, positions, f64::NAN)),
            CoordValues::Label(v) => {
                CoordValues::Label(reindex_axis(v, axis, positions, String::new()))
            }
        }
    }
}

/// A labeled coordinate: values keyed by one or more dimensions of a
/// [`DataArray`](super::DataArray).
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    dims: Vec<String>,
    values: CoordValues,
}

impl Coordinate {
    /// Build a coordinate spanning `dims`.
    ///
    /// # Errors
    /// - [`Error::InvalidAxis`] when `dims` does not have one entry per value
    ///   dimension, or repeats a dimension.
    pub fn new<I, S>(dims: I, values: CoordValues) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != values.ndim() {
            return Err(Error::invalid_axis(
                dims.join(","),
                format!(
                    "coordinate has {} dimension names for {}-dimensional values",
                    dims.len(),
                    values.ndim()
                ),
            ));
        }
        for (i, d) in dims.iter().enumerate() {
            if dims[..i].contains(d) {
                return Err(Error::invalid_axis(
                    d.clone(),
                    "dimension repeated in coordinate",
                ));
            }
        }
        Ok(Self { dims, values })
    }

    /// 1-D numeric coordinate along `dim`. Named after `dim`, this is an index.
    pub fn index(dim: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            dims: vec![dim.into()],
            values: CoordValues::Float(Array1::from(values).into_dyn()),
        }
    }

    /// 1-D label coordinate along `dim`.
    pub fn labels<S: Into<String>>(dim: impl Into<String>, labels: Vec<S>) -> Self {
        let labels: Array1<String> = labels.into_iter().map(Into::into).collect();
        Self {
            dims: vec![dim.into()],
            values: CoordValues::Label(labels.into_dyn()),
        }
    }

    /// Dimensions spanned, in value-axis order.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// The coordinate values.
    pub fn values(&self) -> &CoordValues {
        &self.values
    }

    /// Value axis of `dim`, if spanned.
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Whether the coordinate varies along `dim`.
    pub fn depends_on(&self, dim: &str) -> bool {
        self.axis_of(dim).is_some()
    }

    /// View as a 1-D float axis, if this coordinate is one.
    pub fn as_axis(&self) -> Option<ArrayView1<'_, f64>> {
        self.values
            .as_float()
            .filter(|_| self.dims.len() == 1)
            .and_then(|v| v.view().into_dimensionality::<Ix1>().ok())
    }

    pub(crate) fn select_along(&self, dim: &str, positions: &[usize]) -> Self {
        match self.axis_of(dim) {
            Some(axis) => Self {
                dims: self.dims.clone(),
                values: self.values.select(Axis(axis), positions),
            },
            None => self.clone(),
        }
    }

    pub(crate) fn reindex_along(&self, dim: &str, positions: &[Option<usize>]) -> Self {
        match self.axis_of(dim) {
            Some(axis) => Self {
                dims: self.dims.clone(),
                values: self.values.reindex(Axis(axis), positions),
            },
            None => self.clone(),
        }
    }
}

/// Gather `positions` along `axis` of `a`, writing `fill` where a position is `None`.
pub(crate) fn reindex_axis<T: Clone>(
    a: &ArrayD<T>,
    axis: Axis,
    positions: &[Option<usize>],
    fill: T,
) -> ArrayD<T> {
    let mut shape = a.shape().to_vec();
    shape[axis.index()] = positions.len();
    let mut out = ArrayD::from_elem(IxDyn(&shape), fill);
    for (j, pos) in positions.iter().enumerate() {
        if let Some(i) = pos {
            out.index_axis_mut(axis, j).assign(&a.index_axis(axis, *i));
        }
    }
    out
}

/// For each target, the position in `axis` whose value is nearest.
///
/// Ascending axes are searched by bisection; on an exact tie the later
/// position wins, matching pandas' nearest indexer. Any other axis falls
/// back to a linear scan.
pub(crate) fn nearest_indices(axis: ArrayView1<'_, f64>, targets: &[f64]) -> Vec<usize> {
    let n = axis.len();
    if n == 0 {
        return Vec::new();
    }
    let ascending = axis.windows(2).into_iter().all(|w| w[0] <= w[1]);
    if let (true, Some(values)) = (ascending, axis.as_slice()) {
        return targets
            .iter()
            .map(|&t| {
                let right = values.partition_point(|&v| v < t);
                if right == 0 {
                    0
                } else if right == n {
                    n - 1
                } else if (t - values[right - 1]) < (values[right] - t) {
                    right - 1
                } else {
                    right
                }
            })
            .collect();
    }
    targets
        .iter()
        .map(|&t| {
            axis.iter()
                .enumerate()
                .fold((0usize, f64::INFINITY), |(best, dist), (i, &v)| {
                    let d = (v - t).abs();
                    if d <= dist {
                        (i, d)
                    } else {
                        (best, dist)
                    }
                })
                .0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn coordinate_rejects_mismatched_dims() {
        let values = CoordValues::Float(array![[1.0, 2.0], [3.0, 4.0]].into_dyn());
        assert!(Coordinate::new(["time"], values.clone()).is_err());
        assert!(Coordinate::new(["time", "time"], values.clone()).is_err());
        let c = Coordinate::new(["channel", "time"], values).expect("valid coordinate");
        assert_eq!(c.axis_of("time"), Some(1));
        assert!(c.as_axis().is_none());
    }

    #[test]
    fn nearest_indices_prefers_later_position_on_ties() {
        let axis = Array1::from(vec![0.0, 1.0, 2.0, 3.0]);
        let idx = nearest_indices(axis.view(), &[-5.0, 0.4, 0.5, 1.6, 2.5, 9.0]);
        assert_eq!(idx, vec![0, 0, 1, 2, 3, 3]);
    }

    #[test]
    fn nearest_indices_handles_descending_axes() {
        let axis = Array1::from(vec![3.0, 2.0, 1.0, 0.0]);
        let idx = nearest_indices(axis.view(), &[2.9, 0.1]);
        assert_eq!(idx, vec![0, 3]);
    }

    #[test]
    fn reindex_fills_missing_labels() {
        let c = Coordinate::labels("time", vec!["a", "b", "c"]);
        let r = c.reindex_along("time", &[Some(2), None, Some(0)]);
        let labels = r.values().as_label().expect("labels");
        assert_eq!(
            labels.iter().cloned().collect::<Vec<_>>(),
            vec!["c".to_string(), String::new(), "a".to_string()]
        );
    }
}
