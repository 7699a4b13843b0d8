//! # blurhash-codec
//!
//! BlurHash encoding and decoding in pure Rust.
//!
//! [BlurHash](https://blurha.sh/) squeezes the colours and gradients of an
//! image into a short ASCII string that can be shipped alongside markup and
//! rendered as a blurred placeholder while the real image loads. Hashes
//! produced here are interchangeable with every other BlurHash
//! implementation.
//!
//! Loading, resizing and re-encoding images is left to the caller: the codec
//! takes and returns plain [`PixelGrid`]s of 8-bit sRGB pixels.
//!
//! ## Quick Start
//!
//! ```
//! use blurhash_codec::{decode, encode, PixelGrid};
//!
//! // Encode: image pixels -> BlurHash string
//! let image = PixelGrid::from_fn(8, 6, |x, y| [(x * 30) as u8, (y * 40) as u8, 128]);
//! let hash = encode(&image, 4, 3).unwrap();
//! assert_eq!(hash.len(), 28);
//!
//! // Decode: BlurHash string -> placeholder pixels, at any size
//! let placeholder = decode(&hash, 32, 24, 1.0).unwrap();
//! assert_eq!(placeholder.as_bytes().len(), 32 * 24 * 3);
//! ```
//!
//! ## Features
//!
//! - `parallel`: compute coefficients and output rows on the rayon thread
//!   pool. Results are identical to the serial build.

pub mod base83;
pub mod color;
pub mod error;

mod basis;
mod components;
mod decoder;
mod encoder;
mod pixels;

pub use color::{linear_to_srgb, sign_pow, srgb_to_linear};
pub use components::Components;
pub use decoder::{components, decode, BlurHash};
pub use encoder::encode;
pub use error::BlurhashError;
pub use pixels::PixelGrid;
