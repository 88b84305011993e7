use super::ConfigError;

use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// Adapter trait for reading contiguous 1D input.
pub trait Read1D<T> {
    /// Borrow the underlying input as a contiguous slice.
    fn read_slice(&self) -> Result<&[T], ConfigError>;
}

/// Adapter trait for writing contiguous 1D output.
pub trait Write1D<T> {
    /// Borrow the underlying output as a mutable contiguous slice.
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError>;
}

impl<T> Read1D<T> for [T] {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self)
    }
}

impl<T> Write1D<T> for [T] {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self)
    }
}

impl<T> Read1D<T> for Vec<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self.as_slice())
    }
}

impl<T> Write1D<T> for Vec<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self.as_mut_slice())
    }
}

impl<T> Read1D<T> for Array1<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice().ok_or(ConfigError::InvalidArgument {
            arg: "array",
            reason: "array is not contiguous in memory",
        })
    }
}

impl<T> Write1D<T> for Array1<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut().ok_or(ConfigError::InvalidArgument {
            arg: "array",
            reason: "array is not contiguous in memory",
        })
    }
}

// Lanes taken along a non-last axis are strided; callers copy those first.
impl<T> Read1D<T> for ArrayView1<'_, T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice().ok_or(ConfigError::InvalidArgument {
            arg: "lane",
            reason: "lane is not contiguous in memory",
        })
    }
}

impl<T> Write1D<T> for ArrayViewMut1<'_, T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut().ok_or(ConfigError::InvalidArgument {
            arg: "lane",
            reason: "lane is not contiguous in memory",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Read1D, Write1D};
    use crate::kernel::ConfigError;
    use ndarray::{array, Array1, Axis};

    #[test]
    fn vec_and_slice_adapters() {
        let v = vec![1.0f64, 2.0, 3.0];
        assert_eq!(v.read_slice().expect("vec adapter").len(), 3);

        let mut out = vec![0.0f64; 2];
        out.write_slice_mut()
            .expect("vec write adapter")
            .copy_from_slice(&[4.0, 5.0]);
        assert_eq!(out, vec![4.0, 5.0]);
    }

    #[test]
    fn strided_lanes_are_rejected() {
        let a = array![[1.0f64, 2.0], [3.0, 4.0]];
        let row = a.index_axis(Axis(0), 0);
        assert_eq!(row.read_slice().expect("row is contiguous"), &[1.0, 2.0]);

        let column = a.index_axis(Axis(1), 0);
        assert_eq!(
            column.read_slice().expect_err("column is strided"),
            ConfigError::InvalidArgument {
                arg: "lane",
                reason: "lane is not contiguous in memory",
            }
        );

        let owned = Array1::from(vec![7.0f64, 8.0]);
        assert_eq!(owned.read_slice().expect("array1 read")[1], 8.0);
    }
}
