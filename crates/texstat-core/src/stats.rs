//! StatsBuffers - per-pixel output arrays
//!
//! Holds the three arrays filled by the windowed statistics engine, each
//! sized to the full image pixel count and indexed by the flattened
//! row-major texel index (see [`Dimensions::index`]):
//!
//! - `averages`: windowed mean of all four channels
//! - `variances`: windowed (sample) variance of all four channels
//! - `alpha_averages`: windowed mean of alpha over its own radius
//!
//! The buffers are allocated by the caller and handed to the engine by
//! mutable reference; their contents are only meaningful once the engine
//! has returned successfully.

use crate::error::{Error, Result};
use crate::float4::Float4;
use crate::image::Dimensions;

/// Output arrays for one image
#[derive(Debug, Clone)]
pub struct StatsBuffers {
    dims: Dimensions,
    averages: Vec<Float4>,
    variances: Vec<Float4>,
    alpha_averages: Vec<f32>,
}

impl StatsBuffers {
    /// Allocate zero-filled output arrays for an image of extent `dims`.
    pub fn new(dims: Dimensions) -> Self {
        let n = dims.pixel_count();
        Self {
            dims,
            averages: vec![Float4::ZERO; n],
            variances: vec![Float4::ZERO; n],
            alpha_averages: vec![0.0; n],
        }
    }

    /// Image extent the buffers were sized for
    #[inline]
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Number of pixels in each array
    #[inline]
    pub fn len(&self) -> usize {
        self.averages.len()
    }

    /// True if the arrays are empty (never for a valid extent)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }

    /// Check that these buffers were sized for `dims`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] otherwise.
    pub fn check_dims(&self, dims: Dimensions) -> Result<()> {
        if self.dims != dims {
            return Err(Error::DimensionMismatch {
                expected: dims.as_tuple(),
                actual: self.dims.as_tuple(),
            });
        }
        Ok(())
    }

    /// Flattened index of `(x, y, z)`, or an error if out of bounds.
    pub fn index(&self, x: u32, y: u32, z: u32) -> Result<usize> {
        let (w, h, d) = self.dims.as_tuple();
        if x >= w || y >= h || z >= d {
            let linear = (z as u128 * h as u128 + y as u128) * w as u128 + x as u128;
            return Err(Error::IndexOutOfBounds {
                index: usize::try_from(linear).unwrap_or(usize::MAX),
                len: self.len(),
            });
        }
        Ok(self.dims.index(x, y, z))
    }

    /// Windowed RGBA mean at `(x, y, z)`.
    pub fn average(&self, x: u32, y: u32, z: u32) -> Option<Float4> {
        self.index(x, y, z).ok().map(|i| self.averages[i])
    }

    /// Windowed RGBA variance at `(x, y, z)`.
    pub fn variance(&self, x: u32, y: u32, z: u32) -> Option<Float4> {
        self.index(x, y, z).ok().map(|i| self.variances[i])
    }

    /// Windowed alpha mean at `(x, y, z)`.
    pub fn alpha_average(&self, x: u32, y: u32, z: u32) -> Option<f32> {
        self.index(x, y, z).ok().map(|i| self.alpha_averages[i])
    }

    /// Windowed RGBA standard deviation at `(x, y, z)`.
    ///
    /// Negative variances from float cancellation are clamped to zero.
    pub fn std_deviation(&self, x: u32, y: u32, z: u32) -> Option<Float4> {
        self.variance(x, y, z).map(|v| v.map(|c| c.max(0.0).sqrt()))
    }

    /// All averages in index order
    pub fn averages(&self) -> &[Float4] {
        &self.averages
    }

    /// All variances in index order
    pub fn variances(&self) -> &[Float4] {
        &self.variances
    }

    /// All alpha averages in index order
    pub fn alpha_averages(&self) -> &[f32] {
        &self.alpha_averages
    }

    /// Mutable access to the three arrays at once.
    ///
    /// Returned as disjoint borrows so the engine can split each of them
    /// into per-task regions.
    pub fn parts_mut(&mut self) -> (&mut [Float4], &mut [Float4], &mut [f32]) {
        (
            &mut self.averages,
            &mut self.variances,
            &mut self.alpha_averages,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sizes() {
        let dims = Dimensions::new(3, 2, 4).unwrap();
        let s = StatsBuffers::new(dims);
        assert_eq!(s.len(), 24);
        assert_eq!(s.averages().len(), 24);
        assert_eq!(s.variances().len(), 24);
        assert_eq!(s.alpha_averages().len(), 24);
        assert!(s.check_dims(dims).is_ok());
        assert!(s.check_dims(Dimensions::new_2d(3, 2).unwrap()).is_err());
    }

    #[test]
    fn test_out_of_bounds_reports_linear_index() {
        let s = StatsBuffers::new(Dimensions::new(3, 2, 2).unwrap());
        // coordinates are not clamped before linearizing
        assert!(matches!(
            s.index(10, 0, 0),
            Err(Error::IndexOutOfBounds { index: 10, len: 12 })
        ));
        assert!(matches!(
            s.index(1, 5, 0),
            Err(Error::IndexOutOfBounds { index: 16, len: 12 })
        ));
        assert!(matches!(
            s.index(0, 0, 2),
            Err(Error::IndexOutOfBounds { index: 12, len: 12 })
        ));
        assert!(matches!(
            s.index(u32::MAX, u32::MAX, u32::MAX),
            Err(Error::IndexOutOfBounds { len: 12, .. })
        ));
        assert_eq!(s.index(2, 1, 1).unwrap(), 11);
    }

    #[test]
    fn test_accessors() {
        let dims = Dimensions::new_2d(2, 2).unwrap();
        let mut s = StatsBuffers::new(dims);
        {
            let (avg, var, alpha) = s.parts_mut();
            avg[3] = Float4::splat(0.5);
            var[3] = Float4::new(4.0, -1e-9, 0.0, 1.0);
            alpha[3] = 0.25;
        }
        assert_eq!(s.average(1, 1, 0), Some(Float4::splat(0.5)));
        assert_eq!(s.alpha_average(1, 1, 0), Some(0.25));
        assert_eq!(
            s.std_deviation(1, 1, 0),
            Some(Float4::new(2.0, 0.0, 0.0, 1.0))
        );
        assert_eq!(s.average(2, 0, 0), None);
        assert!(s.index(0, 0, 1).is_err());
    }
}
