//! Float4 - four-channel floating-point vector
//!
//! `Float4` is the canonical decoded texel: red, green, blue and alpha as
//! `f32`. The summed-area tables, averages and variances are all arrays of
//! `Float4`, so the arithmetic operators are element-wise.

use std::ops::{Add, AddAssign, Index, Mul, Sub};

/// Four-channel `f32` vector (R, G, B, A)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Float4 {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl Float4 {
    /// The zero vector.
    pub const ZERO: Float4 = Float4::splat(0.0);

    /// Create a vector from four channel values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a vector with every channel set to `v`.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Create a vector from a `[r, g, b, a]` array.
    #[inline]
    pub const fn from_array(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    /// Channels as a `[r, g, b, a]` array.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Apply `f` to every channel.
    #[inline]
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), f(self.a))
    }
}

impl From<[f32; 4]> for Float4 {
    fn from(v: [f32; 4]) -> Self {
        Self::from_array(v)
    }
}

impl From<Float4> for [f32; 4] {
    fn from(v: Float4) -> Self {
        v.to_array()
    }
}

impl Index<usize> for Float4 {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.r,
            1 => &self.g,
            2 => &self.b,
            3 => &self.a,
            _ => panic!("Float4 channel index out of range: {i}"),
        }
    }
}

impl Add for Float4 {
    type Output = Float4;

    #[inline]
    fn add(self, o: Float4) -> Float4 {
        Float4::new(self.r + o.r, self.g + o.g, self.b + o.b, self.a + o.a)
    }
}

impl AddAssign for Float4 {
    #[inline]
    fn add_assign(&mut self, o: Float4) {
        *self = *self + o;
    }
}

impl Sub for Float4 {
    type Output = Float4;

    #[inline]
    fn sub(self, o: Float4) -> Float4 {
        Float4::new(self.r - o.r, self.g - o.g, self.b - o.b, self.a - o.a)
    }
}

impl Mul for Float4 {
    type Output = Float4;

    #[inline]
    fn mul(self, o: Float4) -> Float4 {
        Float4::new(self.r * o.r, self.g * o.g, self.b * o.b, self.a * o.a)
    }
}

impl Mul<f32> for Float4 {
    type Output = Float4;

    #[inline]
    fn mul(self, s: f32) -> Float4 {
        self.map(|c| c * s)
    }
}

impl Mul<Float4> for f32 {
    type Output = Float4;

    #[inline]
    fn mul(self, v: Float4) -> Float4 {
        v * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elementwise_ops() {
        let a = Float4::new(1.0, 2.0, 3.0, 4.0);
        let b = Float4::new(0.5, 0.5, 1.0, 2.0);
        assert_eq!(a + b, Float4::new(1.5, 2.5, 4.0, 6.0));
        assert_eq!(a - b, Float4::new(0.5, 1.5, 2.0, 2.0));
        assert_eq!(a * b, Float4::new(0.5, 1.0, 3.0, 8.0));
        assert_eq!(2.0 * a, Float4::new(2.0, 4.0, 6.0, 8.0));
    }

    #[test]
    fn test_add_assign_and_index() {
        let mut a = Float4::splat(1.0);
        a += Float4::new(0.0, 1.0, 2.0, 3.0);
        assert_eq!(a[0], 1.0);
        assert_eq!(a[3], 4.0);
        assert_eq!(a.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range() {
        let _ = Float4::ZERO[4];
    }
}
