//! In-memory similarity lookup over a BK-tree.
//!
//! The index holds hashes of a single variant and answers radius
//! queries in Hamming space. This is the engine's only aggregate
//! structure; persistent indexing lives outside the crate.

use bk_tree::{BKTree, Metric};

use crate::error::{HashError, Result};
use crate::hash::{HashValue, HashVariant};

/// Hamming metric over [`HashValue`]s of one variant.
///
/// The index enforces variant/length agreement at insert time, so the
/// metric itself can assume comparable operands.
#[derive(Default, Clone, Copy, Debug)]
pub struct HammingMetric;

impl Metric<HashValue> for HammingMetric {
    fn distance(&self, a: &HashValue, b: &HashValue) -> u32 {
        a.as_bytes()
            .iter()
            .zip(b.as_bytes())
            .map(|(x, y)| (x ^ y).count_ones())
            .sum()
    }

    fn threshold_distance(&self, a: &HashValue, b: &HashValue, threshold: u32) -> Option<u32> {
        let d = self.distance(a, b);
        (d <= threshold).then_some(d)
    }
}

/// A similarity index over same-variant hashes.
pub struct SimilarityIndex {
    tree: BKTree<HashValue, HammingMetric>,
    variant: HashVariant,
    bit_len: Option<usize>,
    count: usize,
}

impl SimilarityIndex {
    /// Create an empty index accepting hashes of `variant`.
    pub fn new(variant: HashVariant) -> Self {
        Self {
            tree: BKTree::new(HammingMetric),
            variant,
            bit_len: None,
            count: 0,
        }
    }

    /// Add a hash to the index.
    ///
    /// Fails with [`HashError::VariantMismatch`] when the hash's
    /// variant or bit length disagrees with the index.
    pub fn insert(&mut self, hash: HashValue) -> Result<()> {
        if hash.variant() != self.variant {
            return Err(HashError::VariantMismatch(format!(
                "index holds {} hashes, got {}",
                self.variant,
                hash.variant()
            )));
        }
        match self.bit_len {
            None => self.bit_len = Some(hash.bit_len()),
            Some(len) if len != hash.bit_len() => {
                return Err(HashError::VariantMismatch(format!(
                    "index holds {len}-bit hashes, got {} bits",
                    hash.bit_len()
                )));
            }
            Some(_) => {}
        }
        self.tree.add(hash);
        self.count += 1;
        Ok(())
    }

    /// All indexed hashes within `max_distance` of `hash`, as
    /// (distance, hash) pairs.
    pub fn find(&self, hash: &HashValue, max_distance: u32) -> Result<Vec<(u32, &HashValue)>> {
        if hash.variant() != self.variant {
            return Err(HashError::VariantMismatch(format!(
                "index holds {} hashes, got {}",
                self.variant,
                hash.variant()
            )));
        }
        if let Some(len) = self.bit_len {
            if len != hash.bit_len() {
                return Err(HashError::VariantMismatch(format!(
                    "index holds {len}-bit hashes, got {} bits",
                    hash.bit_len()
                )));
            }
        }
        Ok(self.tree.find(hash, max_distance).collect())
    }

    pub fn variant(&self) -> HashVariant {
        self.variant
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
