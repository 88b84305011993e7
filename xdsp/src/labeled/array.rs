use super::coords::{reindex_axis, Coordinate};
use super::MissingValue;
use core::ops::{Add, Div};
use ndarray::{Array1, ArrayD, ArrayView1, Axis, IxDyn, Slice, Zip};
use num_traits::Zero;
use std::collections::BTreeMap;
use xdsp_core::{Error, Result};

/// An N-dimensional array with named dimensions, coordinates and an optional name.
///
/// Invariants upheld by every constructor:
/// * one unique dimension name per axis;
/// * every coordinate spans only existing dimensions, with matching sizes;
/// * a coordinate named after a dimension is 1-D along that dimension (an index).
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray<T> {
    data: ArrayD<T>,
    dims: Vec<String>,
    coords: BTreeMap<String, Coordinate>,
    name: Option<String>,
}

impl<T> DataArray<T> {
    /// Wrap `data` with one dimension name per axis.
    ///
    /// # Errors
    /// - [`Error::InvalidAxis`] on a dimension count mismatch or repeated names.
    pub fn new<I, S>(data: ArrayD<T>, dims: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(Error::invalid_axis(
                dims.join(","),
                format!(
                    "{} dimension names given for a {}-dimensional array",
                    dims.len(),
                    data.ndim()
                ),
            ));
        }
        for (i, d) in dims.iter().enumerate() {
            if dims[..i].contains(d) {
                return Err(Error::invalid_axis(d.clone(), "dimension names must be unique"));
            }
        }
        Ok(Self {
            data,
            dims,
            coords: BTreeMap::new(),
            name: None,
        })
    }

    /// A 1-D series along `dim`, indexed by `index`.
    pub fn from_series(values: Vec<T>, dim: impl Into<String>, index: Vec<f64>) -> Result<Self> {
        let dim = dim.into();
        Self::new(Array1::from(values).into_dyn(), [dim.clone()])?
            .with_coord(dim.clone(), Coordinate::index(dim, index))
    }

    pub(crate) fn from_parts(
        data: ArrayD<T>,
        dims: Vec<String>,
        coords: BTreeMap<String, Coordinate>,
        name: Option<String>,
    ) -> Result<Self> {
        let mut out = Self::new(data, dims)?;
        for (key, coord) in coords {
            out = out.with_coord(key, coord)?;
        }
        out.name = name;
        Ok(out)
    }

    /// Attach (or replace) a coordinate.
    ///
    /// # Errors
    /// - [`Error::InvalidAxis`] when the coordinate spans unknown dimensions,
    ///   disagrees on a dimension size, or is named after a dimension without
    ///   being 1-D along it.
    pub fn with_coord(mut self, name: impl Into<String>, coord: Coordinate) -> Result<Self> {
        let name = name.into();
        for (d, &len) in coord.dims().iter().zip(coord.values().shape()) {
            match self.len_of(d) {
                None => {
                    return Err(Error::invalid_axis(
                        d.clone(),
                        format!("coordinate `{name}` spans a dimension the array does not have"),
                    ))
                }
                Some(n) if n != len => {
                    return Err(Error::invalid_axis(
                        d.clone(),
                        format!("coordinate `{name}` has {len} values for a dimension of size {n}"),
                    ))
                }
                Some(_) => {}
            }
        }
        if self.axis_of(&name).is_some() && coord.dims() != [name.as_str()] {
            return Err(Error::invalid_axis(
                name,
                "a coordinate named after a dimension must be 1-D along it",
            ));
        }
        self.coords.insert(name, coord);
        Ok(self)
    }

    /// Set the array name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn renamed(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Dimension names, one per axis.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Axis lengths.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Array name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Underlying values.
    pub fn values(&self) -> &ArrayD<T> {
        &self.data
    }

    /// Unwrap into the underlying values, discarding labels.
    pub fn into_values(self) -> ArrayD<T> {
        self.data
    }

    /// Axis number of `dim`.
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Length of `dim`.
    pub fn len_of(&self, dim: &str) -> Option<usize> {
        self.axis_of(dim).map(|axis| self.data.shape()[axis])
    }

    /// Coordinate called `name`.
    pub fn coord(&self, name: &str) -> Option<&Coordinate> {
        self.coords.get(name)
    }

    /// All coordinates, ordered by name.
    pub fn coords(&self) -> impl Iterator<Item = (&str, &Coordinate)> {
        self.coords.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Index coordinate of `dim`, if one is attached.
    pub fn index(&self, dim: &str) -> Option<ArrayView1<'_, f64>> {
        self.coords
            .get(dim)
            .filter(|c| c.dims() == [dim])
            .and_then(Coordinate::as_axis)
    }

    /// Same labels around new values of identical shape.
    ///
    /// # Errors
    /// - [`Error::InvalidParameter`] when the shapes differ.
    pub fn with_values<U>(&self, data: ArrayD<U>) -> Result<DataArray<U>> {
        if data.shape() != self.shape() {
            return Err(Error::invalid_parameter(
                "values",
                format!(
                    "shape {:?} does not match labeled shape {:?}",
                    data.shape(),
                    self.shape()
                ),
            ));
        }
        Ok(DataArray {
            data,
            dims: self.dims.clone(),
            coords: self.coords.clone(),
            name: self.name.clone(),
        })
    }

    /// Element-wise map, keeping every label.
    pub fn map<U, F>(&self, f: F) -> DataArray<U>
    where
        F: FnMut(&T) -> U,
    {
        DataArray {
            data: self.data.map(f),
            dims: self.dims.clone(),
            coords: self.coords.clone(),
            name: self.name.clone(),
        }
    }

    /// Element-wise combination with an array carrying the same dims and shape.
    ///
    /// Coordinates are taken from `self`; the result is unnamed.
    ///
    /// # Errors
    /// - [`Error::Alignment`] when dims or shapes differ.
    pub fn zip_with<U, V, F>(&self, other: &DataArray<U>, mut f: F) -> Result<DataArray<V>>
    where
        F: FnMut(&T, &U) -> V,
    {
        if self.dims != other.dims || self.shape() != other.shape() {
            return Err(Error::alignment(format!(
                "element-wise operands differ: {:?}{:?} vs {:?}{:?}",
                self.dims,
                self.shape(),
                other.dims,
                other.shape()
            )));
        }
        let data = Zip::from(&self.data)
            .and(&other.data)
            .map_collect(|a, b| f(a, b));
        Ok(DataArray {
            data,
            dims: self.dims.clone(),
            coords: self.coords.clone(),
            name: None,
        })
    }

    fn require_axis(&self, dim: &str) -> Result<usize> {
        self.axis_of(dim).ok_or_else(|| {
            Error::invalid_axis(dim, format!("dimension not found in {:?}", self.dims))
        })
    }
}

impl<T: Clone> DataArray<T> {
    /// Select `positions` along `dim`, carrying every coordinate that spans it.
    ///
    /// # Errors
    /// - [`Error::InvalidAxis`] for an unknown `dim`.
    /// - [`Error::InvalidParameter`] for an out of bounds position.
    pub fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self> {
        let axis = self.require_axis(dim)?;
        let len = self.data.shape()[axis];
        if let Some(p) = positions.iter().find(|&&p| p >= len) {
            return Err(Error::invalid_parameter(
                "positions",
                format!("position {p} out of bounds for `{dim}` of size {len}"),
            ));
        }
        Ok(Self {
            data: self.data.select(Axis(axis), positions),
            dims: self.dims.clone(),
            coords: self
                .coords
                .iter()
                .map(|(k, c)| (k.clone(), c.select_along(dim, positions)))
                .collect(),
            name: self.name.clone(),
        })
    }

    /// Reorder axes to `order`, which must name every dimension once.
    ///
    /// # Errors
    /// - [`Error::InvalidAxis`] when `order` is not a permutation of the dims.
    pub fn transpose_to<S: AsRef<str>>(&self, order: &[S]) -> Result<Self> {
        if order.len() != self.ndim() {
            return Err(Error::invalid_axis(
                order.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(","),
                format!("transpose order must name all of {:?}", self.dims),
            ));
        }
        let mut perm = Vec::with_capacity(order.len());
        for d in order {
            let axis = self.require_axis(d.as_ref())?;
            if perm.contains(&axis) {
                return Err(Error::invalid_axis(d.as_ref(), "dimension repeated in transpose order"));
            }
            perm.push(axis);
        }
        let data = self
            .data
            .view()
            .permuted_axes(IxDyn(&perm))
            .as_standard_layout()
            .into_owned();
        Ok(Self {
            data,
            dims: order.iter().map(|d| d.as_ref().to_string()).collect(),
            coords: self.coords.clone(),
            name: self.name.clone(),
        })
    }
}

impl<T: Clone + MissingValue> DataArray<T> {
    /// Conform `dim` onto `new_index`, matching positions by exact coordinate value.
    ///
    /// Positions absent from the current index are filled with
    /// [`MissingValue::missing`] (data), NaN (float coordinates) or `""` (labels).
    ///
    /// # Errors
    /// - [`Error::InvalidAxis`] when `dim` is unknown or has no index coordinate.
    pub fn reindex(&self, dim: &str, new_index: &[f64]) -> Result<Self> {
        let axis = self.require_axis(dim)?;
        let old = self
            .index(dim)
            .ok_or_else(|| Error::invalid_axis(dim, "no index coordinate to reindex against"))?;

        let mut lookup: Vec<(f64, usize)> = old.iter().copied().zip(0..).collect();
        lookup.sort_by(|a, b| a.0.total_cmp(&b.0));
        let positions: Vec<Option<usize>> = new_index
            .iter()
            .map(|v| {
                let k = lookup.partition_point(|(o, _)| o.total_cmp(v).is_lt());
                lookup.get(k).filter(|(o, _)| o == v).map(|&(_, i)| i)
            })
            .collect();

        let coords = self
            .coords
            .iter()
            .map(|(k, c)| {
                let c = if k == dim {
                    Coordinate::index(dim, new_index.to_vec())
                } else {
                    c.reindex_along(dim, &positions)
                };
                (k.clone(), c)
            })
            .collect();

        Ok(Self {
            data: reindex_axis(&self.data, Axis(axis), &positions, T::missing()),
            dims: self.dims.clone(),
            coords,
            name: self.name.clone(),
        })
    }
}

impl<T> DataArray<T>
where
    T: Clone + Zero + Add<Output = T> + Div<f64, Output = T>,
{
    /// Average over `dim`, dropping it and every coordinate that spans it.
    ///
    /// # Errors
    /// - [`Error::InvalidAxis`] for an unknown or empty `dim`.
    pub fn mean_over(&self, dim: &str) -> Result<Self> {
        let axis = self.require_axis(dim)?;
        let n = self.data.shape()[axis];
        if n == 0 {
            return Err(Error::invalid_axis(dim, "cannot average over an empty dimension"));
        }
        let data = self
            .data
            .sum_axis(Axis(axis))
            .mapv(|v| v / n as f64);
        let mut dims = self.dims.clone();
        dims.remove(axis);
        Ok(Self {
            data,
            dims,
            coords: self
                .coords
                .iter()
                .filter(|(_, c)| !c.depends_on(dim))
                .map(|(k, c)| (k.clone(), c.clone()))
                .collect(),
            name: self.name.clone(),
        })
    }
}

impl<T> DataArray<T>
where
    T: Clone + Zero + Add<Output = T> + Div<f64, Output = T> + MissingValue,
{
    /// Centred moving average of `window` samples along `dim`.
    ///
    /// Position `i` averages `[i - window / 2, i - window / 2 + window)`;
    /// positions whose window leaves the axis are [`MissingValue::missing`].
    ///
    /// # Errors
    /// - [`Error::InvalidAxis`] for an unknown `dim`.
    /// - [`Error::InvalidParameter`] for a zero `window`.
    pub fn rolling_mean_centered(&self, dim: &str, window: usize) -> Result<Self> {
        let axis = self.require_axis(dim)?;
        if window == 0 {
            return Err(Error::invalid_parameter("window", "rolling window must be > 0"));
        }
        let n = self.data.shape()[axis];
        let half = window / 2;
        let mut out = ArrayD::from_elem(self.data.raw_dim(), T::missing());
        for i in half..n {
            let start = i - half;
            if start + window > n {
                break;
            }
            let mean = self
                .data
                .slice_axis(Axis(axis), Slice::from(start..start + window))
                .sum_axis(Axis(axis))
                .mapv(|v| v / window as f64);
            out.index_axis_mut(Axis(axis), i).assign(&mean);
        }
        Ok(Self {
            data: out,
            dims: self.dims.clone(),
            coords: self.coords.clone(),
            name: self.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeled::CoordValues;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn grid() -> DataArray<f64> {
        DataArray::new(
            array![[1.0, 2.0, 3.0, 4.0], [10.0, 20.0, 30.0, 40.0]].into_dyn(),
            ["channel", "time"],
        )
        .expect("valid array")
        .with_coord("time", Coordinate::index("time", vec![0.0, 0.5, 1.0, 1.5]))
        .expect("time index")
        .with_coord("channel", Coordinate::labels("channel", vec!["a", "b"]))
        .expect("channel labels")
        .with_name("grid")
    }

    #[test]
    fn construction_validates_labels() {
        assert!(DataArray::new(array![1.0, 2.0].into_dyn(), ["a", "b"]).is_err());
        assert!(DataArray::new(array![[1.0], [2.0]].into_dyn(), ["a", "a"]).is_err());

        let err = grid()
            .with_coord("time", Coordinate::index("time", vec![0.0, 1.0]))
            .expect_err("index too short");
        assert!(matches!(err, Error::InvalidAxis { .. }));

        let err = grid()
            .with_coord("depth", Coordinate::index("depth", vec![0.0]))
            .expect_err("unknown dimension");
        assert!(matches!(err, Error::InvalidAxis { .. }));
    }

    #[test]
    fn mean_over_drops_dimension_and_dependent_coords() {
        let m = grid().mean_over("time").expect("mean");
        assert_eq!(m.dims(), ["channel"]);
        assert!(m.coord("time").is_none());
        assert!(m.coord("channel").is_some());
        assert_eq!(m.name(), Some("grid"));
        assert_abs_diff_eq!(m.values()[[0]], 2.5);
        assert_abs_diff_eq!(m.values()[[1]], 25.0);
    }

    #[test]
    fn rolling_mean_leaves_missing_edges() {
        let r = grid().rolling_mean_centered("time", 2).expect("rolling");
        let row = r.values().index_axis(Axis(0), 0).to_owned();
        assert!(row[[0]].is_nan());
        assert_abs_diff_eq!(row[[1]], 1.5);
        assert_abs_diff_eq!(row[[2]], 2.5);
        assert_abs_diff_eq!(row[[3]], 3.5);

        let r = grid().rolling_mean_centered("time", 3).expect("rolling");
        let row = r.values().index_axis(Axis(0), 1).to_owned();
        assert!(row[[0]].is_nan());
        assert_abs_diff_eq!(row[[1]], 20.0);
        assert_abs_diff_eq!(row[[2]], 30.0);
        assert!(row[[3]].is_nan());
    }

    #[test]
    fn reindex_fills_new_positions() {
        let r = grid().reindex("time", &[0.5, 1.0, 2.0]).expect("reindex");
        assert_eq!(r.shape(), &[2, 3]);
        assert_abs_diff_eq!(r.values()[[0, 0]], 2.0);
        assert_abs_diff_eq!(r.values()[[1, 1]], 30.0);
        assert!(r.values()[[0, 2]].is_nan());
        let index = r.index("time").expect("index");
        assert_eq!(index.to_vec(), vec![0.5, 1.0, 2.0]);
    }

    #[test]
    fn transpose_and_isel_carry_coordinates() {
        let t = grid().transpose_to(&["time", "channel"]).expect("transpose");
        assert_eq!(t.shape(), &[4, 2]);
        assert_abs_diff_eq!(t.values()[[3, 1]], 40.0);

        let s = t.isel("time", &[1, 3]).expect("isel");
        assert_eq!(s.index("time").expect("index").to_vec(), vec![0.5, 1.5]);
        assert!(t.isel("time", &[4]).is_err());
        assert!(t.transpose_to(&["time", "time"]).is_err());
    }

    #[test]
    fn zip_with_requires_identical_layout() {
        let g = grid();
        let sum = g.zip_with(&g, |a, b| a + b).expect("same layout");
        assert_abs_diff_eq!(sum.values()[[1, 3]], 80.0);

        let t = g.transpose_to(&["time", "channel"]).expect("transpose");
        assert!(matches!(
            g.zip_with(&t, |a, b| a + b),
            Err(Error::Alignment { .. })
        ));
    }

    #[test]
    fn with_values_rejects_other_shapes() {
        let g = grid();
        let labels = g.coord("channel").expect("labels").values().clone();
        assert!(matches!(labels, CoordValues::Label(_)));
        assert!(g.with_values(ArrayD::<f64>::zeros(IxDyn(&[2, 3]))).is_err());
        let doubled = g.with_values(g.values().mapv(|v| v * 2.0)).expect("same shape");
        assert_eq!(doubled.name(), Some("grid"));
    }
}
