//! Synthetic test images
//!
//! Every generator is deterministic, so expected values can be recomputed
//! from the same image instead of read from golden files.

use crate::error::TestResult;
use half::f16;
use texstat_core::{CHANNELS, Dimensions, ImageView};

/// Owned texel storage in one of the supported formats
#[derive(Debug, Clone, PartialEq)]
pub enum TexelStore {
    U8(Vec<u8>),
    F16(Vec<f16>),
    F32(Vec<f32>),
}

/// A generated RGBA image
#[derive(Debug, Clone, PartialEq)]
pub struct TestImage {
    dims: Dimensions,
    store: TexelStore,
}

impl TestImage {
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn store(&self) -> &TexelStore {
        &self.store
    }

    /// Borrow the image as an [`ImageView`].
    pub fn view(&self) -> TestResult<ImageView<'_>> {
        let view = match &self.store {
            TexelStore::U8(d) => ImageView::from_u8(self.dims, d)?,
            TexelStore::F16(d) => ImageView::from_f16(self.dims, d)?,
            TexelStore::F32(d) => ImageView::from_f32(self.dims, d)?,
        };
        Ok(view)
    }

    /// Texels as normalized `f64` RGBA, in storage order and without any
    /// swizzle applied.
    pub fn decoded(&self) -> Vec<[f64; 4]> {
        fn group<T: Copy>(data: &[T], f: impl Fn(T) -> f64) -> Vec<[f64; 4]> {
            data.chunks_exact(CHANNELS)
                .map(|c| [f(c[0]), f(c[1]), f(c[2]), f(c[3])])
                .collect()
        }

        match &self.store {
            TexelStore::U8(d) => group(d, |v: u8| v as f64 / 255.0),
            TexelStore::F16(d) => group(d, |v: f16| v.to_f64()),
            TexelStore::F32(d) => group(d, |v: f32| v as f64),
        }
    }
}

fn build_u8(dims: Dimensions, texel: impl Fn(u32, u32, u32) -> [u8; 4]) -> TestImage {
    let mut data = Vec::with_capacity(dims.pixel_count() * CHANNELS);
    for z in 0..dims.depth() {
        for y in 0..dims.height() {
            for x in 0..dims.width() {
                data.extend_from_slice(&texel(x, y, z));
            }
        }
    }
    TestImage {
        dims,
        store: TexelStore::U8(data),
    }
}

/// Every texel set to `rgba`.
pub fn constant_u8(dims: Dimensions, rgba: [u8; 4]) -> TestImage {
    build_u8(dims, |_, _, _| rgba)
}

/// 8-bit image whose channels vary independently along x, y and z.
///
/// The channels wrap modulo 256, so large images contain sharp edges as
/// well as smooth ramps.
pub fn gradient_u8(dims: Dimensions) -> TestImage {
    build_u8(dims, |x, y, z| {
        let c = |a: u32, b: u32, k: u32, o: u32| ((x * a + y * b + z * k + o) % 256) as u8;
        [c(37, 11, 7, 0), c(13, 53, 3, 9), c(5, 3, 19, 40), c(7, 17, 41, 100)]
    })
}

/// Float image with uniform pseudo-random channels in `[0, 1)`.
pub fn noise_f32(dims: Dimensions, seed: u64) -> TestImage {
    // xorshift64; the state must never be zero
    let mut state = seed | 1;
    let data = (0..dims.pixel_count() * CHANNELS)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 40) as f32 / (1u64 << 24) as f32
        })
        .collect();
    TestImage {
        dims,
        store: TexelStore::F32(data),
    }
}

/// Convert any image to half-float storage.
pub fn to_f16(image: &TestImage) -> TestImage {
    let data = image
        .decoded()
        .into_iter()
        .flat_map(|t| t.map(f16::from_f64))
        .collect();
    TestImage {
        dims: image.dims,
        store: TexelStore::F16(data),
    }
}
