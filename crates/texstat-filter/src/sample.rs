//! Channel sampler
//!
//! Decodes one source texel into a [`Float4`]: raw channels are read in the
//! image's storage format, swizzled in that format's units, converted to
//! float and optionally reweighted with a power law:
//!
//! - 8-bit: constants are 0 / 255, result scaled by `1/255`
//! - half-float: constants are 0.0 / 1.0 as half, converted to `f32`
//! - float: constants are 0.0 / 1.0, used directly
//!
//! Reweighting replaces each channel `c` with `max(c, 1e-6)^p`, using the
//! RGB power for R/G/B and the alpha power for A. It is skipped when both
//! powers are exactly 1.

use texstat_core::{Float4, ImageView, PixelData, Swizzle, f16};

/// Floor applied before the power law so zero never reaches `powf`.
pub const POWER_EPSILON: f32 = 1e-6;

/// Texel decoder bound to one image and one set of channel parameters
#[derive(Debug, Clone, Copy)]
pub struct ChannelSampler<'a> {
    view: ImageView<'a>,
    swizzle: Swizzle,
    needs_swizzle: bool,
    rgb_power: f32,
    alpha_power: f32,
    apply_power: bool,
}

impl<'a> ChannelSampler<'a> {
    pub fn new(view: ImageView<'a>, swizzle: Swizzle, rgb_power: f32, alpha_power: f32) -> Self {
        Self {
            view,
            swizzle,
            needs_swizzle: !swizzle.is_identity(),
            rgb_power,
            alpha_power,
            apply_power: rgb_power != 1.0 || alpha_power != 1.0,
        }
    }

    /// Decode texel `(x, y, z)`.
    ///
    /// Coordinates must already be clamped to the image extent; an
    /// out-of-range coordinate panics on the slice index.
    #[inline]
    pub fn sample(&self, x: u32, y: u32, z: u32) -> Float4 {
        let i = self.view.texel_offset(x, y, z);
        let d = match self.view.data() {
            PixelData::U8(data) => {
                let mut t = [data[i], data[i + 1], data[i + 2], data[i + 3]];
                if self.needs_swizzle {
                    t = self.swizzle.apply(t, 0, 255);
                }
                Float4::new(t[0] as f32, t[1] as f32, t[2] as f32, t[3] as f32) * (1.0 / 255.0)
            }
            PixelData::F16(data) => {
                let mut t = [data[i], data[i + 1], data[i + 2], data[i + 3]];
                if self.needs_swizzle {
                    t = self.swizzle.apply(t, f16::ZERO, f16::ONE);
                }
                Float4::new(t[0].to_f32(), t[1].to_f32(), t[2].to_f32(), t[3].to_f32())
            }
            PixelData::F32(data) => {
                let mut t = [data[i], data[i + 1], data[i + 2], data[i + 3]];
                if self.needs_swizzle {
                    t = self.swizzle.apply(t, 0.0, 1.0);
                }
                Float4::from_array(t)
            }
        };

        if self.apply_power {
            self.reweight(d)
        } else {
            d
        }
    }

    #[inline]
    fn reweight(&self, d: Float4) -> Float4 {
        let rgb = |c: f32| c.max(POWER_EPSILON).powf(self.rgb_power);
        Float4::new(
            rgb(d.r),
            rgb(d.g),
            rgb(d.b),
            d.a.max(POWER_EPSILON).powf(self.alpha_power),
        )
    }
}
