//! Fixed-width bit-vector primitives (C1) and hex codec (C2)
//!
//! A fingerprint of width `W` bits, `W` a positive multiple of 64, is stored
//! as `L = W / 64` unsigned 64-bit limbs. Limb 0 is the most significant;
//! limb `L - 1` is the least significant. This mirrors the big-endian,
//! most-significant-limb-first convention used throughout the index.

use crate::error::{IndexError, Result};

/// 256-entry lookup table mapping an ASCII byte to its hex nibble value,
/// or `-1` if the byte is not a hex digit. Built once as a `const` so hex
/// decoding never falls back to a `match`-per-character parse.
const HEX_LUT: [i8; 256] = build_hex_lut();

const fn build_hex_lut() -> [i8; 256] {
    let mut table = [-1i8; 256];
    let mut i = 0u8;
    loop {
        table[i as usize] = match i {
            b'0'..=b'9' => (i - b'0') as i8,
            b'a'..=b'f' => (i - b'a' + 10) as i8,
            b'A'..=b'F' => (i - b'A' + 10) as i8,
            _ => -1,
        };
        if i == 255 {
            break;
        }
        i += 1;
    }
    table
}

/// Decodes an even-length hex string into raw bytes using [`HEX_LUT`].
///
/// Fails with [`IndexError::BadHex`] if the string has odd length or
/// contains a non-hex character.
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.as_bytes();
    if s.len() % 2 != 0 {
        return Err(IndexError::BadHex {
            reason: format!("odd length {}", s.len()),
        });
    }
    let mut out = Vec::with_capacity(s.len() / 2);
    for pair in s.chunks_exact(2) {
        let hi = HEX_LUT[pair[0] as usize];
        let lo = HEX_LUT[pair[1] as usize];
        if hi < 0 || lo < 0 {
            return Err(IndexError::BadHex {
                reason: format!(
                    "non-hex character in {:?}",
                    std::str::from_utf8(pair).unwrap_or("?")
                ),
            });
        }
        out.push(((hi as u8) << 4) | (lo as u8));
    }
    Ok(out)
}

/// Parses a fingerprint hex string into big-endian 64-bit limbs.
///
/// The string must be even length, hex-only, and its byte length must be a
/// positive multiple of 8 (16 hex characters per limb) — a partial trailing
/// limb is rejected rather than silently dropped, so that
/// `hex(limbs_from_hex(s)?) == s.to_lowercase()` always holds for any `s`
/// this function accepts.
pub fn limbs_from_hex(s: &str) -> Result<Vec<u64>> {
    let bytes = decode_hex(s)?;
    if bytes.is_empty() || bytes.len() % 8 != 0 {
        return Err(IndexError::BadHex {
            reason: format!(
                "byte length {} is not a positive multiple of 8 (16 hex chars per limb)",
                bytes.len()
            ),
        });
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| u64::from_be_bytes(chunk.try_into().unwrap()))
        .collect())
}

/// Renders limbs as lowercase hex, 16 characters per limb, most-significant
/// limb first.
pub fn hex_from_limbs(limbs: &[u64]) -> String {
    let mut s = String::with_capacity(limbs.len() * 16);
    for limb in limbs {
        s.push_str(&format!("{:016x}", limb));
    }
    s
}

/// Packs limbs into little-endian bytes within each limb, limb 0 first —
/// the byte form the streaming digest's reader interface expects.
pub fn limbs_to_bytes_le(limbs: &[u64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(limbs.len() * 8);
    for limb in limbs {
        out.extend_from_slice(&limb.to_le_bytes());
    }
    out
}

/// Inverse of [`limbs_to_bytes_le`]. Fails with [`IndexError::BadInput`] if
/// `bytes.len()` is not a multiple of 8.
pub fn limbs_from_bytes_le(bytes: &[u8]) -> Result<Vec<u64>> {
    if bytes.len() % 8 != 0 {
        return Err(IndexError::BadInput {
            expected: (bytes.len() / 8 + 1) * 8,
            actual: bytes.len(),
        });
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| u64::from_le_bytes(chunk.try_into().unwrap()))
        .collect())
}

/// Returns `v[L - 1] & mask`.
pub fn and_last(v: &[u64], mask: u64) -> u64 {
    v[v.len() - 1] & mask
}

/// Shifts the whole vector right by `s` bits in place, propagating bits
/// from lower-index limbs into higher-index limbs. `s` must be in `[0,
/// 64)`; larger shifts are not supported (callers only ever pass a
/// `block_size < 64`).
pub fn rsh(v: &mut [u64], s: u32) {
    debug_assert!(s < 64, "rsh only supports shifts in [0, 64)");
    if s == 0 {
        return;
    }
    for i in (1..v.len()).rev() {
        v[i] = (v[i] >> s) | (v[i - 1] << (64 - s));
    }
    v[0] >>= s;
}

/// Extracts block `b` of a fingerprint: a copy of `limbs`, right-shifted by
/// `block_size` a total of `b` times and masked to the low `block_size`
/// bits. Each individual shift stays under the 64-bit limit `rsh` requires,
/// which is why block extraction walks block-by-block rather than shifting
/// by `b * block_size` in one step. When the fingerprint width is not a
/// multiple of `blocks`, the last block is wider than `block_size`; only
/// its low `block_size` bits are used here (see `last_block_size` on the
/// index configuration for the retained-but-unused width).
///
/// Prefer [`extract_all_blocks`] when every block of a fingerprint is
/// needed — it performs the same shifts once instead of redoing the prefix
/// for each block.
pub fn extract_block(limbs: &[u64], b: usize, block_size: u32) -> u16 {
    let mut scratch = limbs.to_vec();
    for _ in 0..b {
        rsh(&mut scratch, block_size);
    }
    mask_last(&scratch, block_size)
}

/// Extracts all `blocks` block values of a fingerprint in a single
/// left-to-right pass: block 0 is read before any shift, then the scratch
/// copy is shifted right by `block_size` once per subsequent block.
pub fn extract_all_blocks(limbs: &[u64], blocks: usize, block_size: u32) -> Vec<u16> {
    let mut scratch = limbs.to_vec();
    let mut out = Vec::with_capacity(blocks);
    for b in 0..blocks {
        if b > 0 {
            rsh(&mut scratch, block_size);
        }
        out.push(mask_last(&scratch, block_size));
    }
    out
}

fn mask_last(v: &[u64], block_size: u32) -> u16 {
    debug_assert!(block_size <= 16, "block values must fit in 16 bits");
    let mask = if block_size == 0 {
        0
    } else {
        (1u64 << block_size) - 1
    };
    and_last(v, mask) as u16
}

/// Hamming distance: the number of bit positions where `a` and `b` differ.
/// Requires `a.len() == b.len()`.
pub fn hamming(a: &[u64], b: &[u64]) -> u32 {
    assert_eq!(a.len(), b.len(), "hamming requires equal-length vectors");
    a.iter().zip(b.iter()).map(|(x, y)| (x ^ y).count_ones()).sum()
}
