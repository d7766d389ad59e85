//! Hash values and their comparison.
//!
//! A [`HashValue`] is an immutable packed bit vector tagged with the
//! [`HashVariant`] that produced it. The tag travels with the value
//! through serialization so that comparisons across variants can be
//! rejected rather than silently returning a meaningless number.
//!
//! Bit ordering is part of the contract: bit `i` lives in byte `i / 8`
//! under mask `0x80 >> (i % 8)` (most significant bit first). Grid
//! pipelines emit bits row-major; the radial pipeline emits them in
//! ascending angle order. Two implementations agreeing on this layout
//! produce comparable hashes.

pub mod compare;
pub mod index;

pub use compare::{hamming_distance, Distance};
pub use index::SimilarityIndex;

use serde::{Deserialize, Serialize};

use crate::error::{HashError, Result};

/// Identifies the transform/quantization pipeline a hash came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashVariant {
    /// Frequency-domain image hash over low DCT coefficients.
    Dct,
    /// Horizontal-gradient image hash.
    Difference,
    /// Radial-projection variance image hash.
    RadialVariance,
    /// STFT dominant-band audio fingerprint.
    Audio,
    /// Pooled whole-video hash.
    Video,
}

impl std::fmt::Display for HashVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dct => write!(f, "dct"),
            Self::Difference => write!(f, "difference"),
            Self::RadialVariance => write!(f, "radial-variance"),
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

impl HashVariant {
    /// Default normalized-distance threshold below which two hashes of
    /// this variant are considered likely duplicates. A policy
    /// constant; callers may substitute their own cutoff.
    pub fn default_threshold(&self) -> f64 {
        match self {
            Self::Dct => 0.10,
            Self::Difference => 0.10,
            Self::RadialVariance => 0.16,
            Self::Audio => 0.25,
            Self::Video => 0.10,
        }
    }
}

/// A fixed-length perceptual hash: packed bits plus the variant tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashValue {
    variant: HashVariant,
    bit_len: usize,
    #[serde(with = "hex")]
    bits: Vec<u8>,
}

impl HashValue {
    /// Pack a bit sequence. Intended for the quantizers; `bits[i]`
    /// becomes bit `i` of the hash.
    pub(crate) fn from_bits(variant: HashVariant, bits: &[bool]) -> Self {
        let mut bytes = vec![0u8; bits.len().div_ceil(8)];
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        Self {
            variant,
            bit_len: bits.len(),
            bits: bytes,
        }
    }

    /// Reconstruct a hash from its packed bytes, e.g. after loading
    /// from storage.
    ///
    /// Fails with [`HashError::InvalidInput`] when the byte length does
    /// not hold exactly `bit_len` bits or trailing pad bits are set.
    pub fn from_bytes(variant: HashVariant, bit_len: usize, bytes: Vec<u8>) -> Result<Self> {
        if bit_len == 0 {
            return Err(HashError::InvalidInput(
                "hash bit length must be positive".to_string(),
            ));
        }
        if bytes.len() != bit_len.div_ceil(8) {
            return Err(HashError::InvalidInput(format!(
                "{} bytes cannot hold a {bit_len}-bit hash",
                bytes.len()
            )));
        }
        let pad = bytes.len() * 8 - bit_len;
        if pad > 0 {
            let mask = (1u8 << pad) - 1;
            if bytes[bytes.len() - 1] & mask != 0 {
                return Err(HashError::InvalidInput(
                    "padding bits beyond the hash length are set".to_string(),
                ));
            }
        }
        Ok(Self {
            variant,
            bit_len,
            bits: bytes,
        })
    }

    pub fn variant(&self) -> HashVariant {
        self.variant
    }

    /// Number of significant bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Packed big-endian-bit bytes; pad bits in the last byte are zero.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Value of bit `i`.
    pub fn bit(&self, i: usize) -> bool {
        self.bits[i / 8] & (0x80 >> (i % 8)) != 0
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// Hex digest of the packed bytes, suitable for opaque storage.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bits)
    }

    /// Reload a hash previously stored via [`HashValue::to_hex`]. The
    /// variant and bit length are not part of the digest and must be
    /// supplied by the caller's storage layer.
    pub fn from_hex(variant: HashVariant, bit_len: usize, digest: &str) -> Result<Self> {
        let bytes = hex::decode(digest)
            .map_err(|e| HashError::InvalidInput(format!("malformed hex digest: {e}")))?;
        Self::from_bytes(variant, bit_len, bytes)
    }

    /// Hamming distance to another hash of the same variant and length.
    pub fn distance(&self, other: &HashValue) -> Result<Distance> {
        compare::hamming_distance(self, other)
    }
}

impl std::fmt::Display for HashValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.variant, self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_packing_is_msb_first() {
        let hash = HashValue::from_bits(HashVariant::Dct, &[true, false, false, false]);
        assert_eq!(hash.as_bytes(), &[0x80]);
        assert_eq!(hash.bit_len(), 4);
        assert!(hash.bit(0));
        assert!(!hash.bit(3));
    }

    #[test]
    fn test_hex_round_trip() {
        let bits: Vec<bool> = (0..64).map(|i| i % 3 == 0).collect();
        let hash = HashValue::from_bits(HashVariant::Difference, &bits);
        let reloaded =
            HashValue::from_hex(HashVariant::Difference, hash.bit_len(), &hash.to_hex()).unwrap();
        assert_eq!(hash, reloaded);
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        let result = HashValue::from_hex(HashVariant::Dct, 64, "abcd");
        assert!(matches!(result, Err(HashError::InvalidInput(_))));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        let result = HashValue::from_hex(HashVariant::Dct, 64, "zz".repeat(8).as_str());
        assert!(matches!(result, Err(HashError::InvalidInput(_))));
    }

    #[test]
    fn test_from_bytes_rejects_set_padding() {
        // 12-bit hash in 2 bytes: low 4 bits of the second byte are pad.
        let result = HashValue::from_bytes(HashVariant::Dct, 12, vec![0xff, 0x0f]);
        assert!(matches!(result, Err(HashError::InvalidInput(_))));
        HashValue::from_bytes(HashVariant::Dct, 12, vec![0xff, 0xf0]).unwrap();
    }

    #[test]
    fn test_serde_round_trip() {
        let bits: Vec<bool> = (0..64).map(|i| i % 5 == 0).collect();
        let hash = HashValue::from_bits(HashVariant::RadialVariance, &bits);
        let json = serde_json::to_string(&hash).unwrap();
        let reloaded: HashValue = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, reloaded);
    }

    #[test]
    fn test_display_includes_variant() {
        let hash = HashValue::from_bits(HashVariant::Audio, &[true; 8]);
        assert_eq!(hash.to_string(), "audio:ff");
    }
}
