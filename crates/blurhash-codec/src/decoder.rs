//! BlurHash decoding: parse the serialized coefficients and render them back
//! into a pixel grid of any size.

use std::str::FromStr;

use log::{debug, trace};

use crate::base83;
use crate::basis::CosineTable;
use crate::color::{self, sign_pow};
use crate::components::Components;
use crate::error::BlurhashError;
use crate::pixels::{buffer_len, PixelGrid};

/// Length of the size flag, maximum value and DC fields.
const HEADER_LEN: usize = 6;

/// A structurally valid BlurHash with its coefficients unpacked.
///
/// Parsing does all validation up front, so rendering can only fail on the
/// requested output size.
///
/// ```
/// use blurhash_codec::BlurHash;
/// let hash: BlurHash = "LEHV6nWB2yk8pyo0adR*.7kCMdnj".parse().unwrap();
/// assert_eq!((hash.components().x(), hash.components().y()), (4, 3));
/// let thumbnail = hash.render(32, 24, 1.0).unwrap();
/// assert_eq!(thumbnail.as_bytes().len(), 32 * 24 * 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BlurHash {
    components: Components,
    average: [u8; 3],
    maximum_value: f64,
    /// Linear coefficients in row-major `(i, j)` order, AC terms not yet punched.
    factors: Vec<[f64; 3]>,
}

impl BlurHash {
    /// Validate and unpack a hash string.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`BlurhashError::InvalidLength`] if the hash is shorter than 6
    ///   characters or its payload has an odd length.
    /// - [`BlurhashError::InvalidCharacter`] for any character outside the
    ///   base83 alphabet.
    /// - [`BlurhashError::InvalidComponents`] if the size flag does not
    ///   describe a valid grid or implies a different length.
    ///
    /// Four base83 digits reach past 24 bits. Only the low 24 bits of the
    /// average colour field are kept, so `"~~~~"` reads as `[0xD4, 0x28, 0x10]`.
    pub fn parse(hash: &str) -> Result<BlurHash, BlurhashError> {
        let length = hash.len();
        if length < HEADER_LEN {
            return Err(BlurhashError::InvalidLength {
                length,
                reason: "a hash has at least 6 characters",
            });
        }
        if (length - HEADER_LEN) % 2 != 0 {
            return Err(BlurhashError::InvalidLength {
                length,
                reason: "AC terms take two characters each",
            });
        }
        // Everything below slices on byte offsets, which is sound once the
        // whole string is known to be ASCII.
        base83::validate(hash)?;

        let flag = base83::decode(&hash[0..1])? as u32;
        let components = Components::from_size_flag(flag)?;
        if components.hash_len() != length {
            return Err(BlurhashError::InvalidComponents {
                components_x: components.x(),
                components_y: components.y(),
                reason: format!(
                    "size flag implies {} characters, hash has {length}",
                    components.hash_len()
                ),
            });
        }

        let quantised_maximum = base83::decode(&hash[1..2])?;
        let maximum_value = (quantised_maximum as f64 + 1.0) / 166.0;

        let average = color::unpack_rgb(base83::decode(&hash[2..6])? as u32);
        let mut factors = Vec::with_capacity(components.count());
        factors.push(color::rgb_to_linear(average));
        for start in (HEADER_LEN..length).step_by(2) {
            let value = base83::decode(&hash[start..start + 2])? as u32;
            factors.push(decode_ac(value, maximum_value));
        }

        trace!(
            "parsed blurhash with {components} components, quantised maximum {quantised_maximum}"
        );
        Ok(BlurHash {
            components,
            average,
            maximum_value,
            factors,
        })
    }

    /// The basis grid this hash was encoded with.
    pub fn components(&self) -> Components {
        self.components
    }

    /// The average colour of the source image as stored in the hash.
    ///
    /// Useful as a flat placeholder when rendering is not worth it.
    pub fn average_color(&self) -> [u8; 3] {
        self.average
    }

    /// The magnitude every AC channel was scaled against.
    pub fn maximum_value(&self) -> f64 {
        self.maximum_value
    }

    /// Render the hash as a `width` x `height` image.
    ///
    /// `punch` multiplies every AC term: values above 1 increase contrast,
    /// values below 1 flatten the image towards its average colour.
    ///
    /// # Errors
    ///
    /// Returns [`BlurhashError::InvalidImage`] if either dimension is zero or
    /// the output would not fit in memory.
    pub fn render(&self, width: u32, height: u32, punch: f64) -> Result<PixelGrid, BlurhashError> {
        if width == 0 || height == 0 {
            return Err(BlurhashError::image(
                width,
                height,
                "width and height must be > 0",
            ));
        }
        let len = buffer_len(width, height, 3)
            .ok_or_else(|| BlurhashError::image(width, height, "output too large"))?;

        let factors: Vec<[f64; 3]> = self
            .factors
            .iter()
            .enumerate()
            .map(|(index, &factor)| {
                if index == 0 {
                    factor
                } else {
                    factor.map(|channel| channel * punch)
                }
            })
            .collect();
        let canvas = Canvas {
            components: self.components,
            factors,
            cos_x: CosineTable::new(self.components.x(), width),
            cos_y: CosineTable::new(self.components.y(), height),
        };

        let mut data = vec![0u8; len];
        canvas.paint(&mut data, width as usize * 3);
        debug!("rendered {} blurhash to {width}x{height}", self.components);
        PixelGrid::new(width, height, data)
    }
}

impl FromStr for BlurHash {
    type Err = BlurhashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlurHash::parse(s)
    }
}

/// Coefficients and basis tables for one output size.
struct Canvas {
    components: Components,
    factors: Vec<[f64; 3]>,
    cos_x: CosineTable,
    cos_y: CosineTable,
}

impl Canvas {
    fn paint_row(&self, y: usize, row: &mut [u8]) {
        let nx = self.components.x() as usize;
        for (x, out) in row.chunks_exact_mut(3).enumerate() {
            let mut sum = [0.0f64; 3];
            for (j, coefficients) in self.factors.chunks_exact(nx).enumerate() {
                let cy = self.cos_y.at(j, y);
                for (i, factor) in coefficients.iter().enumerate() {
                    let basis = self.cos_x.at(i, x) * cy;
                    sum[0] += factor[0] * basis;
                    sum[1] += factor[1] * basis;
                    sum[2] += factor[2] * basis;
                }
            }
            out.copy_from_slice(&color::linear_to_rgb(sum));
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn paint(&self, data: &mut [u8], stride: usize) {
        for (y, row) in data.chunks_exact_mut(stride).enumerate() {
            self.paint_row(y, row);
        }
    }

    #[cfg(feature = "parallel")]
    fn paint(&self, data: &mut [u8], stride: usize) {
        use rayon::prelude::*;

        data.par_chunks_exact_mut(stride)
            .enumerate()
            .for_each(|(y, row)| self.paint_row(y, row));
    }
}

/// Undo the base-19 packing and the square-root companding of one AC term.
fn decode_ac(value: u32, maximum_value: f64) -> [f64; 3] {
    [value / (19 * 19), (value / 19) % 19, value % 19]
        .map(|q| sign_pow((f64::from(q) - 9.0) / 9.0, 2.0) * maximum_value)
}

/// Read the component grid of a hash without unpacking its terms.
///
/// The hash is fully validated, exactly as [`BlurHash::parse`] does.
///
/// # Errors
///
/// See [`BlurHash::parse`].
///
/// ```
/// use blurhash_codec::components;
/// assert_eq!(components("LEHV6nWB2yk8pyo0adR*.7kCMdnj").unwrap(), (4, 3));
/// ```
pub fn components(hash: &str) -> Result<(u32, u32), BlurhashError> {
    let grid = BlurHash::parse(hash)?.components();
    Ok((grid.x(), grid.y()))
}

/// Decode a BlurHash into a `width` x `height` image.
///
/// `punch` scales the AC terms; pass `1.0` to render the hash as encoded.
///
/// # Errors
///
/// Everything [`BlurHash::parse`] rejects, plus
/// [`BlurhashError::InvalidImage`] for a zero-sized output.
///
/// ```
/// use blurhash_codec::decode;
/// let pixels = decode("LEHV6nWB2yk8pyo0adR*.7kCMdnj", 32, 32, 1.0).unwrap();
/// assert_eq!((pixels.width(), pixels.height()), (32, 32));
/// ```
pub fn decode(hash: &str, width: u32, height: u32, punch: f64) -> Result<PixelGrid, BlurhashError> {
    BlurHash::parse(hash)?.render(width, height, punch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    const KNOWN_HASH: &str = "LEHV6nWB2yk8pyo0adR*.7kCMdnj";

    #[test]
    fn parses_known_hash() {
        let hash = BlurHash::parse(KNOWN_HASH).unwrap();
        assert_eq!(hash.components(), Components::new(4, 3).unwrap());
        assert_eq!(hash.factors.len(), 12);
        // 'E' is 14, so the maximum is 15 / 166.
        assert!((hash.maximum_value() - 15.0 / 166.0).abs() < 1e-12);
    }

    #[test]
    fn short_hash_is_invalid_length() {
        assert!(matches!(
            BlurHash::parse("LEHV6"),
            Err(BlurhashError::InvalidLength { length: 5, .. })
        ));
        assert!(matches!(
            BlurHash::parse(""),
            Err(BlurhashError::InvalidLength { length: 0, .. })
        ));
    }

    #[test]
    fn odd_payload_is_invalid_length() {
        assert!(matches!(
            BlurHash::parse("LEHV6nW"),
            Err(BlurhashError::InvalidLength { length: 7, .. })
        ));
    }

    #[test]
    fn bad_character_is_reported_with_position() {
        assert_eq!(
            BlurHash::parse("LEHV6nWB2yk8pyo0adR*.7kC\ndnj"),
            Err(BlurhashError::InvalidCharacter {
                character: '\n',
                position: 24
            })
        );
    }

    #[test]
    fn length_check_precedes_character_check() {
        assert!(matches!(
            BlurHash::parse("!!!"),
            Err(BlurhashError::InvalidLength { .. })
        ));
    }

    #[test]
    fn multibyte_characters_do_not_panic() {
        // Six bytes, but not six ASCII characters.
        assert!(matches!(
            BlurHash::parse("LEH\u{e9}6"),
            Err(BlurhashError::InvalidCharacter { character: '\u{e9}', position: 3 })
        ));
    }

    #[test]
    fn size_flag_must_match_length() {
        assert!(matches!(
            BlurHash::parse("L00000"),
            Err(BlurhashError::InvalidComponents {
                components_x: 4,
                components_y: 3,
                ..
            })
        ));
        // '~' is 82, which would need ten rows.
        assert!(matches!(
            BlurHash::parse("~00000"),
            Err(BlurhashError::InvalidComponents { .. })
        ));
    }

    #[test]
    fn zero_sized_render_is_rejected() {
        let hash = BlurHash::parse(KNOWN_HASH).unwrap();
        assert!(matches!(
            hash.render(0, 10, 1.0),
            Err(BlurhashError::InvalidImage { width: 0, .. })
        ));
        assert!(matches!(
            decode(KNOWN_HASH, 10, 0, 1.0),
            Err(BlurhashError::InvalidImage { height: 0, .. })
        ));
    }

    #[test]
    fn decode_ac_midpoint_is_zero() {
        let mid = 9 * 19 * 19 + 9 * 19 + 9;
        assert_eq!(decode_ac(mid, 0.5), [0.0, 0.0, 0.0]);
        let low = decode_ac(0, 0.5);
        assert!(low.iter().all(|&c| (c + 0.5).abs() < 1e-12));
        let high = decode_ac(18 * 361 + 18 * 19 + 18, 0.5);
        assert!(high.iter().all(|&c| (c - 0.5).abs() < 1e-12));
    }

    #[test]
    fn decode_ac_squares_the_quantised_value() {
        // Digits 14, 3 and 15 sit at 5/9, -6/9 and 6/9 of the range.
        let [r, g, b] = decode_ac(14 * 361 + 3 * 19 + 15, 0.5);
        assert!((r - 25.0 / 81.0 * 0.5).abs() < 1e-12, "{r}");
        assert!((g + 36.0 / 81.0 * 0.5).abs() < 1e-12, "{g}");
        assert!((b - 36.0 / 81.0 * 0.5).abs() < 1e-12, "{b}");
    }

    #[test]
    fn dc_only_hash_renders_flat() {
        let grid = PixelGrid::filled(2, 2, [200, 100, 50]);
        let hash = encode(&grid, 1, 1).unwrap();
        let out = decode(&hash, 5, 3, 1.0).unwrap();
        assert!(out.pixels().all(|px| px == [200, 100, 50]));
    }

    #[test]
    fn zero_punch_flattens_to_average() {
        let hash = BlurHash::parse(KNOWN_HASH).unwrap();
        let out = hash.render(6, 4, 0.0).unwrap();
        let average = hash.average_color();
        assert!(out.pixels().all(|px| px == average));
    }

    #[test]
    fn punch_changes_contrast() {
        let normal = decode(KNOWN_HASH, 8, 8, 1.0).unwrap();
        let punched = decode(KNOWN_HASH, 8, 8, 2.0).unwrap();
        assert_ne!(normal, punched);
    }

    #[test]
    fn average_color_matches_dc_field() {
        let hash = BlurHash::parse(KNOWN_HASH).unwrap();
        let dc = base83::decode(&KNOWN_HASH[2..6]).unwrap() as u32;
        assert_eq!(hash.average_color(), color::unpack_rgb(dc));
    }

    #[test]
    fn oversized_dc_keeps_low_24_bits() {
        // "~~~~" is 83^4 - 1 = 0x2D4_2810; the 0x2 above bit 24 is dropped.
        let hash = BlurHash::parse("00~~~~").unwrap();
        assert_eq!(hash.average_color(), [0xD4, 0x28, 0x10]);
        let out = hash.render(2, 2, 1.0).unwrap();
        assert!(out.pixels().all(|px| px == [0xD4, 0x28, 0x10]));
    }
}
