//! BlurHash encoding: project an image onto a small set of cosine basis
//! functions and serialize the quantized coefficients.

use log::{debug, trace};

use crate::base83;
use crate::basis::CosineTable;
use crate::color::{self, sign_pow};
use crate::components::Components;
use crate::error::BlurhashError;
use crate::pixels::PixelGrid;

/// Encode an image into a BlurHash string.
///
/// The hash holds `components_x * components_y` coefficients and is
/// `6 + 2 * (components_x * components_y - 1)` characters long. The same
/// input always produces the same string.
///
/// # Errors
///
/// - [`BlurhashError::InvalidComponents`] if either count is outside `1..=9`.
/// - [`BlurhashError::InvalidImage`] if the grid has a zero dimension.
///
/// # Examples
///
/// ```
/// use blurhash_codec::{encode, PixelGrid};
/// let red = PixelGrid::filled(2, 2, [255, 0, 0]);
/// let hash = encode(&red, 4, 3).unwrap();
/// assert_eq!(hash.len(), 28);
/// assert!(hash.starts_with('L'));
/// ```
pub fn encode(
    pixels: &PixelGrid,
    components_x: u32,
    components_y: u32,
) -> Result<String, BlurhashError> {
    let components = Components::new(components_x, components_y)?;
    if pixels.is_empty() {
        return Err(BlurhashError::image(
            pixels.width(),
            pixels.height(),
            "width and height must be > 0",
        ));
    }

    let factors = Projection::new(pixels, components).factors();
    let dc = factors[0];
    let ac = &factors[1..];

    let mut hash = String::with_capacity(components.hash_len());
    base83::encode_into(u64::from(components.size_flag()), 1, &mut hash);

    let quantised_maximum = quantise_maximum(ac);
    let maximum = (f64::from(quantised_maximum) + 1.0) / 166.0;
    base83::encode_into(u64::from(quantised_maximum), 1, &mut hash);

    base83::encode_into(u64::from(encode_dc(dc)), 4, &mut hash);
    for &factor in ac {
        base83::encode_into(u64::from(encode_ac(factor, maximum)), 2, &mut hash);
    }

    trace!(
        "encoded {}x{} image with {components} components, quantised maximum {quantised_maximum}",
        pixels.width(),
        pixels.height()
    );
    debug!("blurhash {hash}");
    Ok(hash)
}

/// An image in linear light together with the basis it is projected onto.
struct Projection {
    width: usize,
    linear: Vec<[f64; 3]>,
    components: Components,
    cos_x: CosineTable,
    cos_y: CosineTable,
}

impl Projection {
    fn new(pixels: &PixelGrid, components: Components) -> Projection {
        Projection {
            width: pixels.width() as usize,
            linear: pixels.pixels().map(color::rgb_to_linear).collect(),
            components,
            cos_x: CosineTable::new(components.x(), pixels.width()),
            cos_y: CosineTable::new(components.y(), pixels.height()),
        }
    }

    /// Coefficient number `index` in row-major `(i, j)` order.
    ///
    /// Pixels are always summed top to bottom, left to right, so the serial
    /// and parallel paths agree bit for bit.
    fn factor(&self, index: usize) -> [f64; 3] {
        let i = index % self.components.x() as usize;
        let j = index / self.components.x() as usize;
        let cos_x = self.cos_x.row(i);

        let mut sum = [0.0f64; 3];
        for (row, &cy) in self.linear.chunks_exact(self.width).zip(self.cos_y.row(j)) {
            for (px, &cx) in row.iter().zip(cos_x) {
                let basis = cx * cy;
                sum[0] += basis * px[0];
                sum[1] += basis * px[1];
                sum[2] += basis * px[2];
            }
        }

        let normalisation = if index == 0 { 1.0 } else { 2.0 };
        let scale = normalisation / self.linear.len() as f64;
        sum.map(|channel| channel * scale)
    }

    #[cfg(not(feature = "parallel"))]
    fn factors(&self) -> Vec<[f64; 3]> {
        (0..self.components.count())
            .map(|index| self.factor(index))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn factors(&self) -> Vec<[f64; 3]> {
        use rayon::prelude::*;

        (0..self.components.count())
            .into_par_iter()
            .map(|index| self.factor(index))
            .collect()
    }
}

/// 24-bit sRGB average colour.
fn encode_dc(dc: [f64; 3]) -> u32 {
    color::pack_rgb(color::linear_to_rgb(dc))
}

/// Largest AC magnitude over every channel, quantized to `0..=82`.
fn quantise_maximum(ac: &[[f64; 3]]) -> u32 {
    let maximum = ac
        .iter()
        .flatten()
        .fold(0.0f64, |acc, &channel| acc.max(channel.abs()));
    if maximum == 0.0 {
        return 0;
    }
    (maximum * 166.0 - 0.5).floor().clamp(0.0, 82.0) as u32
}

/// One AC term as three base-19 digits, each channel scaled by `maximum`.
fn encode_ac(factor: [f64; 3], maximum: f64) -> u32 {
    let [r, g, b] = factor.map(|channel| {
        (sign_pow(channel / maximum, 0.5) * 9.0 + 9.5)
            .floor()
            .clamp(0.0, 18.0) as u32
    });
    r * 19 * 19 + g * 19 + b
}
