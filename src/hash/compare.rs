//! Hamming distance between bit-vector hashes.

use serde::{Deserialize, Serialize};

use crate::error::{HashError, Result};
use crate::hash::{HashValue, HashVariant};

/// A distance between two hashes, tagged with the variant it was
/// computed under. Not meaningful without that context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    variant: HashVariant,
    hamming: u32,
    bit_len: usize,
}

impl Distance {
    pub fn variant(&self) -> HashVariant {
        self.variant
    }

    /// Count of differing bit positions.
    pub fn hamming(&self) -> u32 {
        self.hamming
    }

    /// Hamming distance divided by total bit length, in [0, 1].
    pub fn normalized(&self) -> f64 {
        self.hamming as f64 / self.bit_len as f64
    }

    /// Whether the distance falls at or below the variant's default
    /// "likely duplicate" threshold.
    pub fn is_likely_duplicate(&self) -> bool {
        self.is_within(self.variant.default_threshold())
    }

    /// Whether the normalized distance falls at or below a
    /// caller-chosen threshold.
    pub fn is_within(&self, threshold: f64) -> bool {
        self.normalized() <= threshold
    }
}

/// Count the differing bit positions between two hashes.
///
/// Fails with [`HashError::VariantMismatch`] when the hashes were
/// produced by different variants or have different lengths.
pub fn hamming_distance(a: &HashValue, b: &HashValue) -> Result<Distance> {
    if a.variant() != b.variant() {
        return Err(HashError::VariantMismatch(format!(
            "cannot compare a {} hash against a {} hash",
            a.variant(),
            b.variant()
        )));
    }
    if a.bit_len() != b.bit_len() {
        return Err(HashError::VariantMismatch(format!(
            "hash lengths differ: {} vs {} bits",
            a.bit_len(),
            b.bit_len()
        )));
    }
    let hamming = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum();
    Ok(Distance {
        variant: a.variant(),
        hamming,
        bit_len: a.bit_len(),
    })
}
