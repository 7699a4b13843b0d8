//! Error types for BlurHash encoding and decoding.

use thiserror::Error;

/// Everything that can go wrong while encoding or decoding a BlurHash.
///
/// Every error is raised before any output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlurhashError {
    /// The component grid is out of range, or the size flag of a hash
    /// disagrees with the hash length.
    #[error("invalid components {components_x}x{components_y}: {reason}")]
    InvalidComponents {
        /// Horizontal component count (as requested or as decoded).
        components_x: u32,
        /// Vertical component count (as requested or as decoded).
        components_y: u32,
        /// What is wrong with them.
        reason: String,
    },

    /// The pixel grid or the requested output size is unusable.
    #[error("invalid image {width}x{height}: {reason}")]
    InvalidImage {
        /// The width value.
        width: u32,
        /// The height value.
        height: u32,
        /// Why the image was rejected.
        reason: String,
    },

    /// The hash is too short or has an odd number of payload characters.
    #[error("invalid BlurHash length {length}: {reason}")]
    InvalidLength {
        /// Length of the rejected hash in bytes.
        length: usize,
        /// Why the length is wrong.
        reason: &'static str,
    },

    /// A character outside the base83 alphabet.
    #[error("invalid base83 character {character:?} at position {position}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Byte offset of the character in the input.
        position: usize,
    },
}

impl BlurhashError {
    pub(crate) fn image(width: u32, height: u32, reason: impl Into<String>) -> Self {
        BlurhashError::InvalidImage {
            width,
            height,
            reason: reason.into(),
        }
    }
}
