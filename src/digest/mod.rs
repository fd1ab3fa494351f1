//! Streaming locality-sensitive digest (C6-C8)
//!
//! Reduces a byte stream to a fixed 35-byte digest: a checksum byte, a
//! length-code byte, a ratio byte packing two quartile ratios, and a
//! 32-byte quartile-labeled code. Two digests of similar streams differ in
//! few bytes; [`Digest::hamming`] turns that similarity into a distance
//! usable with [`crate::hamming_index::HammingIndex`].

pub mod pearson;
pub mod quantile;

use std::io::Read;

use crate::error::{IndexError, Result};

/// A finalized 35-byte stream digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digest {
    checksum: u8,
    length_code: u8,
    q1_ratio: u8,
    q2_ratio: u8,
    code: [u8; 32],
}

/// Nibble-swaps a byte: `0xAB` becomes `0xBA`. Applied to the checksum and
/// length-code bytes so two digests that differ only in those low-entropy
/// fields still spread their difference across both nibbles of the byte.
fn swap_nibbles(b: u8) -> u8 {
    (b << 4) | (b >> 4)
}

/// Encodes a byte count as one of 255 length buckets via a piecewise
/// logarithm, breakpoints at 656 and 3199 bytes. The three divisors are
/// `ln(1.5)`, `ln(1.3)`, `ln(1.1)`; the additive offsets in the latter two
/// branches make the function continuous at the breakpoints. These
/// constants are a fixed contract: any reimplementation must reproduce them
/// exactly, or digests of identical inputs will not match byte-for-byte.
fn length_code(n: u64) -> u8 {
    let n = n as f64;
    let code: i64 = if n <= 656.0 {
        (n.ln() / 0.4054651).floor() as i64
    } else if n <= 3199.0 {
        (n.ln() / 0.26236426 - 8.72777).floor() as i64
    } else {
        (n.ln() / 0.095310180 - 62.5472).floor() as i64
    };
    code.rem_euclid(255) as u8
}

impl Digest {
    /// Computes a digest by reading `reader` to completion.
    pub fn from_stream<R: Read>(reader: &mut R) -> Result<Digest> {
        let acc = pearson::accumulate(reader)?;
        let (q1, q2, q3) = quantile::quartiles(&acc.buckets);
        let q1_ratio = quantile::ratio(q1, q3);
        let q2_ratio = quantile::ratio(q2, q3);
        let code = quantile::code(&acc.buckets, q1, q2, q3);
        Ok(Digest {
            checksum: acc.checksum,
            length_code: length_code(acc.total_len),
            q1_ratio,
            q2_ratio,
            code,
        })
    }

    /// Computes a digest over an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Digest> {
        Self::from_stream(&mut std::io::Cursor::new(data))
    }

    /// Serializes the digest to its canonical 35-byte layout:
    /// `[swap_nibbles(checksum), swap_nibbles(length_code), ratio_byte,
    /// code[0..32]]`, where `ratio_byte = (q1_ratio << 4) | q2_ratio`.
    pub fn to_bytes(&self) -> [u8; 35] {
        let mut out = [0u8; 35];
        out[0] = swap_nibbles(self.checksum);
        out[1] = swap_nibbles(self.length_code);
        out[2] = (self.q1_ratio << 4) | self.q2_ratio;
        out[3..].copy_from_slice(&self.code);
        out
    }

    /// Parses a digest from its canonical 35-byte layout. Fails with
    /// [`IndexError::BadInput`] if `bytes.len() != 35`.
    pub fn parse(bytes: &[u8]) -> Result<Digest> {
        if bytes.len() != 35 {
            return Err(IndexError::BadInput {
                expected: 35,
                actual: bytes.len(),
            });
        }
        let mut code = [0u8; 32];
        code.copy_from_slice(&bytes[3..]);
        Ok(Digest {
            checksum: swap_nibbles(bytes[0]),
            length_code: swap_nibbles(bytes[1]),
            q1_ratio: bytes[2] >> 4,
            q2_ratio: bytes[2] & 0xF,
            code,
        })
    }

    /// Renders the digest as a 70-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        let bytes = self.to_bytes();
        let mut s = String::with_capacity(70);
        for b in bytes {
            s.push_str(&format!("{:02x}", b));
        }
        s
    }

    /// Parses a digest from a 70-character hex string produced by
    /// [`Self::to_hex`].
    pub fn from_hex(s: &str) -> Result<Digest> {
        Self::parse(&crate::bitvec::decode_hex(s)?)
    }

    /// Hamming distance between two digests: differing bits across the
    /// checksum, length-code, ratio, and code bytes of the canonical
    /// 35-byte form.
    pub fn hamming(&self, other: &Digest) -> u32 {
        let a = self.to_bytes();
        let b = other.to_bytes();
        a.iter().zip(b.iter()).map(|(x, y)| (x ^ y).count_ones()).sum()
    }
}
