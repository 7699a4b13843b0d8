//! The grid of cosine basis functions a hash is made of.

use std::fmt;

use crate::error::BlurhashError;

/// Number of horizontal and vertical basis functions, each in `1..=9`.
///
/// ```
/// use blurhash_codec::Components;
/// let grid = Components::new(4, 3).unwrap();
/// assert_eq!(grid.size_flag(), 21);
/// assert_eq!(grid.hash_len(), 28);
/// assert_eq!(Components::from_size_flag(21).unwrap(), grid);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Components {
    x: u32,
    y: u32,
}

impl Components {
    /// Smallest allowed count on either axis.
    pub const MIN: u32 = 1;
    /// Largest allowed count on either axis.
    pub const MAX: u32 = 9;

    /// # Errors
    ///
    /// Returns [`BlurhashError::InvalidComponents`] if either count is outside `1..=9`.
    pub fn new(x: u32, y: u32) -> Result<Components, BlurhashError> {
        let range = Self::MIN..=Self::MAX;
        if !range.contains(&x) || !range.contains(&y) {
            return Err(BlurhashError::InvalidComponents {
                components_x: x,
                components_y: y,
                reason: format!("both counts must be within {}..={}", Self::MIN, Self::MAX),
            });
        }
        Ok(Components { x, y })
    }

    /// Recover the grid from the first character of a hash.
    ///
    /// # Errors
    ///
    /// Flags above 80 would need a tenth row and are rejected with
    /// [`BlurhashError::InvalidComponents`].
    pub fn from_size_flag(flag: u32) -> Result<Components, BlurhashError> {
        Components::new(flag % 9 + 1, flag / 9 + 1)
    }

    /// Horizontal count.
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Vertical count.
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Total number of coefficients, DC included.
    pub const fn count(&self) -> usize {
        (self.x * self.y) as usize
    }

    /// The value stored in the first character of a hash.
    pub const fn size_flag(&self) -> u32 {
        (self.x - 1) + (self.y - 1) * 9
    }

    /// Length of a hash with this grid: the 6-character header plus two
    /// characters for every AC term.
    pub const fn hash_len(&self) -> usize {
        6 + 2 * (self.count() - 1)
    }
}

impl Default for Components {
    /// The usual 4x3 grid.
    fn default() -> Self {
        Components { x: 4, y: 3 }
    }
}

impl fmt::Display for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}
