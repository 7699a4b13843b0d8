//! Conversions between 8-bit sRGB samples and linear-light floats.
//!
//! BlurHash averages colours in linear light and stores the result as sRGB,
//! so both directions are needed by the encoder and the decoder.

use std::sync::OnceLock;

/// Upper bound of the linear segment of the sRGB curve, in encoded units.
const SRGB_KNEE: f64 = 0.04045;
/// The same knee expressed in linear light.
const LINEAR_KNEE: f64 = 0.003_130_8;

fn srgb_to_linear_exact(value: u8) -> f64 {
    let c = f64::from(value) / 255.0;
    if c <= SRGB_KNEE {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Every byte is converted once, then served from the table.
fn linear_table() -> &'static [f64; 256] {
    static TABLE: OnceLock<[f64; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0.0; 256];
        for (byte, slot) in (0..=u8::MAX).zip(table.iter_mut()) {
            *slot = srgb_to_linear_exact(byte);
        }
        table
    })
}

/// Convert an sRGB byte to a linear value in `[0, 1]`.
///
/// ```
/// use blurhash_codec::color::srgb_to_linear;
/// assert_eq!(srgb_to_linear(0), 0.0);
/// assert!((srgb_to_linear(255) - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn srgb_to_linear(value: u8) -> f64 {
    linear_table()[usize::from(value)]
}

/// Convert a linear value to the nearest sRGB byte.
///
/// The input is clamped to `[0, 1]` first, so out of gamut values saturate.
///
/// ```
/// use blurhash_codec::color::linear_to_srgb;
/// assert_eq!(linear_to_srgb(-0.25), 0);
/// assert_eq!(linear_to_srgb(0.5), 188);
/// assert_eq!(linear_to_srgb(3.0), 255);
/// ```
#[inline]
pub fn linear_to_srgb(value: f64) -> u8 {
    let v = value.clamp(0.0, 1.0);
    let encoded = if v <= LINEAR_KNEE {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0 + 0.5) as u8
}

/// `sign(value) * |value|^exponent`.
///
/// ```
/// use blurhash_codec::color::sign_pow;
/// assert!((sign_pow(-4.0, 0.5) + 2.0).abs() < 1e-12);
/// assert!((sign_pow(3.0, 2.0) - 9.0).abs() < 1e-12);
/// ```
#[inline]
pub fn sign_pow(value: f64, exponent: f64) -> f64 {
    value.abs().powf(exponent).copysign(value)
}

/// [`srgb_to_linear`] applied to each channel of an RGB triple.
#[inline]
pub fn rgb_to_linear([r, g, b]: [u8; 3]) -> [f64; 3] {
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)]
}

/// [`linear_to_srgb`] applied to each channel of a linear triple.
#[inline]
pub fn linear_to_rgb([r, g, b]: [f64; 3]) -> [u8; 3] {
    [linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b)]
}

/// Pack an RGB triple into a 24-bit integer, red in the high byte.
#[inline]
pub fn pack_rgb([r, g, b]: [u8; 3]) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Inverse of [`pack_rgb`]. Bits above the 24th are ignored.
#[inline]
pub fn unpack_rgb(value: u32) -> [u8; 3] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}
