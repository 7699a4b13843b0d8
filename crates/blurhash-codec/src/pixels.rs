//! Row-major RGB pixel grids passed into the encoder and returned by the decoder.

use crate::error::BlurhashError;

/// An 8-bit sRGB image, three bytes per pixel, rows top to bottom.
///
/// ```
/// use blurhash_codec::PixelGrid;
/// let grid = PixelGrid::from_fn(3, 2, |x, y| [x as u8, y as u8, 7]);
/// assert_eq!(grid.pixel(2, 1), Some([2, 1, 7]));
/// assert_eq!(grid.as_bytes().len(), 3 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Bytes needed for `width * height` pixels of `channels` bytes, if addressable.
pub(crate) fn buffer_len(width: u32, height: u32, channels: usize) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(channels)
}

impl PixelGrid {
    /// Wrap an RGB buffer.
    ///
    /// A grid with a zero dimension and an empty buffer is allowed here; the
    /// encoder is the one that refuses it.
    ///
    /// # Errors
    ///
    /// Returns [`BlurhashError::InvalidImage`] if `data.len()` is not
    /// `width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<PixelGrid, BlurhashError> {
        let expected = buffer_len(width, height, 3)
            .ok_or_else(|| BlurhashError::image(width, height, "dimensions overflow"))?;
        if data.len() != expected {
            return Err(BlurhashError::image(
                width,
                height,
                format!(
                    "pixel buffer holds {} bytes, expected {expected}",
                    data.len()
                ),
            ));
        }
        Ok(PixelGrid {
            width,
            height,
            data,
        })
    }

    /// Copy an RGBA buffer, dropping the alpha channel.
    ///
    /// # Errors
    ///
    /// Returns [`BlurhashError::InvalidImage`] if `rgba.len()` is not
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<PixelGrid, BlurhashError> {
        let expected = buffer_len(width, height, 4)
            .ok_or_else(|| BlurhashError::image(width, height, "dimensions overflow"))?;
        if rgba.len() != expected {
            return Err(BlurhashError::image(
                width,
                height,
                format!("RGBA buffer holds {} bytes, expected {expected}", rgba.len()),
            ));
        }
        let data = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Ok(PixelGrid {
            width,
            height,
            data,
        })
    }

    /// Build a grid by calling `f(x, y)` for every pixel in row-major order.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 3]) -> PixelGrid {
        let mut data = Vec::with_capacity(buffer_len(width, height, 3).unwrap_or(0));
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        PixelGrid {
            width,
            height,
            data,
        }
    }

    /// A grid where every pixel is `rgb`.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> PixelGrid {
        PixelGrid::from_fn(width, height, |_, _| rgb)
    }

    /// Width in pixels.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// True when either dimension is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * 3;
        let px = self.data.get(start..start + 3)?;
        Some([px[0], px[1], px[2]])
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> impl ExactSizeIterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(3).map(|px| [px[0], px[1], px[2]])
    }

    /// The packed RGB bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the grid and return its packed RGB bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// The pixels as RGBA with every alpha byte set to 255.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels().flat_map(|[r, g, b]| [r, g, b, u8::MAX]).collect()
    }
}
