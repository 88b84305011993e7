//! Labeled N-dimensional arrays: named dimensions, coordinates and outer-join alignment.

mod align;
mod array;
mod coords;

pub use align::align;
pub use array::DataArray;
pub use coords::{CoordValues, Coordinate};

pub(crate) use coords::nearest_indices;

use rustfft::num_complex::Complex;

/// Fill value written where alignment or a rolling reduction has no data.
pub trait MissingValue {
    /// The missing-data marker.
    fn missing() -> Self;
}

impl MissingValue for f64 {
    fn missing() -> Self {
        f64::NAN
    }
}

impl MissingValue for f32 {
    fn missing() -> Self {
        f32::NAN
    }
}

impl MissingValue for Complex<f64> {
    fn missing() -> Self {
        Complex::new(f64::NAN, f64::NAN)
    }
}
