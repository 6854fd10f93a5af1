//! Core luminance types for sharpness evaluation
//!
//! A `LumaPlane` is a borrowed, bounds-checked view over caller-owned bytes;
//! a `LumaBuffer` owns a packed copy; a `LumaFrame` is the unit that moves
//! through the gating pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::InvalidInputError;

/// Borrowed single-channel 8-bit luminance view.
///
/// Dimensions are validated once at construction; everything downstream can
/// index rows without re-checking. `stride` is the byte distance between
/// consecutive rows and may exceed `width` due to alignment padding.
#[derive(Debug, Clone, Copy)]
pub struct LumaPlane<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> LumaPlane<'a> {
    /// Create a validated view over `data`.
    ///
    /// Fails if either dimension is zero, `stride < width`, or the buffer
    /// does not cover `stride * height` bytes.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Self, InvalidInputError> {
        if width == 0 || height == 0 {
            return Err(InvalidInputError::EmptyPlane { width, height });
        }
        if stride < width {
            return Err(InvalidInputError::StrideTooSmall { stride, width });
        }
        let required = match stride.checked_mul(height) {
            Some(n) => n,
            None => {
                return Err(InvalidInputError::BufferTooShort {
                    len: data.len(),
                    required: usize::MAX,
                })
            }
        };
        if data.len() < required {
            return Err(InvalidInputError::BufferTooShort {
                len: data.len(),
                required,
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// View over a packed buffer (`stride == width`).
    pub fn packed(data: &'a [u8], width: usize, height: usize) -> Result<Self, InvalidInputError> {
        Self::new(data, width, height, width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel row `y`, padding bytes excluded.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    /// Sample at (x, y).
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Contiguous pixel slice when no row padding is present.
    pub fn as_packed_slice(&self) -> Option<&[u8]> {
        (self.stride == self.width).then(|| &self.data[..self.width * self.height])
    }
}

/// Owned, packed luminance image (`stride == width`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LumaBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl LumaBuffer {
    /// Take ownership of packed luminance bytes.
    pub fn from_raw(data: Vec<u8>, width: usize, height: usize) -> Result<Self, InvalidInputError> {
        // Reuse the plane validation so both paths agree on what "valid" means.
        LumaPlane::new(&data, width, height, width)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Copy a strided plane into a packed buffer, dropping row padding.
    pub fn from_strided(
        data: &[u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Self, InvalidInputError> {
        let plane = LumaPlane::new(data, width, height, stride)?;
        let mut packed = Vec::with_capacity(width * height);
        for y in 0..height {
            packed.extend_from_slice(plane.row(y));
        }
        Ok(Self {
            width,
            height,
            data: packed,
        })
    }

    /// Extract luminance from interleaved RGB8 using BT.601 weights.
    pub fn from_rgb(rgb: &[u8], width: usize, height: usize) -> Result<Self, InvalidInputError> {
        if width == 0 || height == 0 {
            return Err(InvalidInputError::EmptyPlane { width, height });
        }
        let required = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or(InvalidInputError::BufferTooShort {
                len: rgb.len(),
                required: usize::MAX,
            })?;
        if rgb.len() < required {
            return Err(InvalidInputError::BufferTooShort {
                len: rgb.len(),
                required,
            });
        }
        let data = rgb[..required]
            .chunks_exact(3)
            .map(|px| luminance(px).round().clamp(0.0, 255.0) as u8)
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Decode any `image` crate image down to its luminance channel.
    pub fn from_image(img: &image::DynamicImage) -> Result<Self, InvalidInputError> {
        let gray = img.to_luma8();
        let (width, height) = (gray.width() as usize, gray.height() as usize);
        Self::from_raw(gray.into_raw(), width, height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Borrow as a validated plane. Infallible: the buffer was validated on
    /// construction and is immutable.
    pub fn as_plane(&self) -> LumaPlane<'_> {
        LumaPlane {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

/// Convert one RGB pixel to luminance
fn luminance(rgb: &[u8]) -> f32 {
    0.299 * rgb[0] as f32 + 0.587 * rgb[1] as f32 + 0.114 * rgb[2] as f32
}

/// A luminance frame moving through the gate, with identity and capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumaFrame {
    /// Unique frame ID
    pub id: String,
    /// Identifier of the producing capture source
    pub source_id: String,
    /// Capture timestamp
    pub captured_at: DateTime<Utc>,
    /// Packed luminance pixels
    pub buffer: LumaBuffer,
}

impl LumaFrame {
    pub fn new(buffer: LumaBuffer, source_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_id,
            captured_at: Utc::now(),
            buffer,
        }
    }

    /// Override the capture timestamp (e.g. hardware-provided time)
    pub fn with_captured_at(mut self, at: DateTime<Utc>) -> Self {
        self.captured_at = at;
        self
    }

    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.buffer.width() as f32 / self.buffer.height() as f32
    }
}
