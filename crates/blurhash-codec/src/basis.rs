//! Cosine basis samples shared by the encoder and the decoder.

use std::f64::consts::PI;

/// `cos(PI * k * n / extent)` for every frequency `k < frequencies` and
/// sample `n < extent`, stored one frequency per row.
///
/// The 2-D basis is separable, so one table per axis is enough.
pub(crate) struct CosineTable {
    extent: usize,
    values: Vec<f64>,
}

impl CosineTable {
    pub(crate) fn new(frequencies: u32, extent: u32) -> CosineTable {
        let extent = extent as usize;
        let scale = PI / extent as f64;
        let values = (0..frequencies as usize)
            .flat_map(|k| (0..extent).map(move |n| (scale * k as f64 * n as f64).cos()))
            .collect();
        CosineTable { extent, values }
    }

    /// All samples for frequency `k`.
    #[inline]
    pub(crate) fn row(&self, k: usize) -> &[f64] {
        &self.values[k * self.extent..(k + 1) * self.extent]
    }

    #[inline]
    pub(crate) fn at(&self, k: usize, n: usize) -> f64 {
        self.values[k * self.extent + n]
    }
}
