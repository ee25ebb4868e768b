//! ImageView - read-only view of a 2D or volumetric RGBA image
//!
//! The view borrows packed, channel-interleaved RGBA texels owned by the
//! caller. Texels are stored in a single flat buffer: the texel at
//! `(x, y, z)` starts at value offset `4 * ((z * height + y) * width + x)`.
//!
//! A depth of 1 marks a strictly 2D image; a depth greater than 1 enables
//! the volumetric code paths downstream.
//!
//! # Examples
//!
//! ```
//! use texstat_core::{Dimensions, ImageView, PixelFormat};
//!
//! let texels = vec![0u8; 4 * 4 * 4];
//! let view = ImageView::from_u8(Dimensions::new_2d(4, 4).unwrap(), &texels).unwrap();
//! assert_eq!(view.format(), PixelFormat::U8);
//! assert!(!view.dims().is_volumetric());
//! ```

use crate::error::{Error, Result};
use half::f16;

/// Number of interleaved channels per texel.
pub const CHANNELS: usize = 4;

/// Image extent in texels
///
/// Every axis is at least 1; the constructors reject zero extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: u32,
    height: u32,
    depth: u32,
}

impl Dimensions {
    /// Create a 3D extent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if any axis is 0.
    pub fn new(width: u32, height: u32, depth: u32) -> Result<Self> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(Error::InvalidDimension {
                width,
                height,
                depth,
            });
        }
        Ok(Self {
            width,
            height,
            depth,
        })
    }

    /// Create a 2D extent (depth 1).
    pub fn new_2d(width: u32, height: u32) -> Result<Self> {
        Self::new(width, height, 1)
    }

    /// Width in texels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Depth in texels (1 for 2D images)
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// `(width, height, depth)`
    #[inline]
    pub fn as_tuple(&self) -> (u32, u32, u32) {
        (self.width, self.height, self.depth)
    }

    /// True when the image has more than one slice.
    #[inline]
    pub fn is_volumetric(&self) -> bool {
        self.depth > 1
    }

    /// Texels in one z slice.
    #[inline]
    pub fn slice_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Total number of texels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.slice_len() * self.depth as usize
    }

    /// Flattened row-major texel index of `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32, z: u32) -> usize {
        (z as usize * self.height as usize + y as usize) * self.width as usize + x as usize
    }
}

/// Storage kind of the texel channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit unsigned normalized
    U8,
    /// IEEE 754 half-precision float
    F16,
    /// IEEE 754 single-precision float
    F32,
}

impl PixelFormat {
    /// Bytes per channel value
    pub fn bytes_per_channel(self) -> usize {
        match self {
            PixelFormat::U8 => 1,
            PixelFormat::F16 => 2,
            PixelFormat::F32 => 4,
        }
    }
}

/// Borrowed channel storage, one variant per [`PixelFormat`]
#[derive(Debug, Clone, Copy)]
pub enum PixelData<'a> {
    U8(&'a [u8]),
    F16(&'a [f16]),
    F32(&'a [f32]),
}

impl PixelData<'_> {
    /// Storage kind
    pub fn format(&self) -> PixelFormat {
        match self {
            PixelData::U8(_) => PixelFormat::U8,
            PixelData::F16(_) => PixelFormat::F16,
            PixelData::F32(_) => PixelFormat::F32,
        }
    }

    /// Number of channel values (not texels)
    pub fn len(&self) -> usize {
        match self {
            PixelData::U8(d) => d.len(),
            PixelData::F16(d) => d.len(),
            PixelData::F32(d) => d.len(),
        }
    }

    /// True if there are no channel values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read-only view of an RGBA image
///
/// Cheap to copy; it holds only the extent and a borrowed slice.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    dims: Dimensions,
    data: PixelData<'a>,
}

impl<'a> ImageView<'a> {
    /// Create a view over packed RGBA channel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if `data` does not hold exactly
    /// `4 * width * height * depth` channel values.
    pub fn new(dims: Dimensions, data: PixelData<'a>) -> Result<Self> {
        let expected = dims.pixel_count() * CHANNELS;
        if data.len() != expected {
            return Err(Error::DataLengthMismatch {
                width: dims.width,
                height: dims.height,
                depth: dims.depth,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { dims, data })
    }

    /// View over 8-bit normalized RGBA data.
    pub fn from_u8(dims: Dimensions, data: &'a [u8]) -> Result<Self> {
        Self::new(dims, PixelData::U8(data))
    }

    /// View over half-float RGBA data.
    pub fn from_f16(dims: Dimensions, data: &'a [f16]) -> Result<Self> {
        Self::new(dims, PixelData::F16(data))
    }

    /// View over single-precision RGBA data.
    pub fn from_f32(dims: Dimensions, data: &'a [f32]) -> Result<Self> {
        Self::new(dims, PixelData::F32(data))
    }

    /// Image extent
    #[inline]
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Storage kind
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.data.format()
    }

    /// Borrowed channel storage
    #[inline]
    pub fn data(&self) -> PixelData<'a> {
        self.data
    }

    /// Offset of the first channel value of texel `(x, y, z)`.
    #[inline]
    pub fn texel_offset(&self, x: u32, y: u32, z: u32) -> usize {
        self.dims.index(x, y, z) * CHANNELS
    }
}
