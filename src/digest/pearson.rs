//! Pearson bucket accumulator (C6)
//!
//! Slides a 5-byte window over a byte stream, hashing the window into six
//! bucket increments per step plus a running checksum. The fixed
//! permutation table below is a design constant: any reimplementation must
//! reproduce it bit-for-bit, since the digest is not portable otherwise.

use std::io::{ErrorKind, Read};

use crate::error::{IndexError, Result};

/// Fixed 256-entry Pearson permutation table.
#[rustfmt::skip]
const V: [u8; 256] = [
      1, 87, 49, 12,176,178,102,166,121,193,  6, 84,249,230, 44,163,
     14,197,213,181,161, 85,218, 80, 64,239, 24,226,236,142, 38,200,
    110,177,104,103,141,253,255, 50, 77,101, 81, 18, 45, 96, 31,222,
     25,107,190, 70, 86,237,240, 34, 72,242, 20,214,244,227,149,235,
     97,234, 57, 22, 60,250, 82,175,208,  5,127,199,111, 62,135,248,
    174,169,211, 58, 66,154,106,195,245,171, 17,187,182,179,  0,243,
    132, 56,148, 75,128,133,158,100,130,126, 91, 13,153,246,216,219,
    119, 68,223, 78, 83, 88,201, 99,122, 11, 92, 32,136,114, 52, 10,
    138, 30, 48,183,156, 35, 61, 26,143, 74,251, 94,129,162, 63,152,
    170,  7,115,167,241,206,  3,150, 55, 59,151,220, 90, 53, 23,131,
    125,173, 15,238, 79, 95, 89, 16,105,137,225,224,217,160, 37,123,
    118, 73,  2,157, 46,116,  9,145,134,228,207,212,202,215, 69,229,
     27,188, 67,124,168,252, 42,  4, 29,108, 21,247, 19,205, 39,203,
    233, 40,186,147,198,192,155, 33,164,191, 98,204,165,180,117, 76,
    140, 36,210,172, 41, 54,159,  8,185,232,113,196,231, 47,146,120,
     51, 65, 28,144,254,221, 93,189,194,139,112, 43, 71,109,184,209,
];

/// The six salts applied per window position, in the order the six
/// unordered 3-subsets of `{c0, c1, c2, c3, c4}` that include `c0` are
/// enumerated.
const SALTS: [u8; 6] = [2, 3, 5, 7, 11, 13];

/// `P(salt, k0, k1, k2) = V[V[V[V[salt] XOR k0] XOR k1] XOR k2]`.
#[inline]
fn pearson(salt: u8, k0: u8, k1: u8, k2: u8) -> u8 {
    let h = V[salt as usize];
    let h = V[(h ^ k0) as usize];
    let h = V[(h ^ k1) as usize];
    V[(h ^ k2) as usize]
}

/// Output of the sliding-window pass over a byte stream.
pub struct Accumulation {
    /// 256-wide bucket counters.
    pub buckets: [u32; 256],
    /// Running Pearson-hash checksum over the whole stream.
    pub checksum: u8,
    /// Total number of bytes read from the stream.
    pub total_len: u64,
}

/// Runs the sliding 5-byte window over `reader`, producing bucket counts,
/// a checksum, and a byte count.
///
/// Fails with [`IndexError::StreamTooShort`] if fewer than 5 bytes can be
/// read. Any other I/O error after the 5-byte bootstrap is wrapped in
/// [`IndexError::StreamRead`].
pub fn accumulate<R: Read>(reader: &mut R) -> Result<Accumulation> {
    let mut initial = [0u8; 5];
    reader.read_exact(&mut initial).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            IndexError::StreamTooShort
        } else {
            IndexError::StreamRead(e.to_string())
        }
    })?;

    // chunk[0] is the most recently read byte, so the initial window is
    // the bootstrap bytes in reverse.
    let mut chunk = [initial[4], initial[3], initial[2], initial[1], initial[0]];
    let mut total_len: u64 = 5;
    let mut checksum: u8 = 0;
    let mut buckets = [0u32; 256];

    loop {
        checksum = pearson(0, chunk[0], chunk[1], checksum);

        let triples: [(u8, u8, u8); 6] = [
            (chunk[0], chunk[1], chunk[2]),
            (chunk[0], chunk[1], chunk[3]),
            (chunk[0], chunk[2], chunk[3]),
            (chunk[0], chunk[1], chunk[4]),
            (chunk[0], chunk[2], chunk[4]),
            (chunk[0], chunk[3], chunk[4]),
        ];
        for (salt, (a, b, c)) in SALTS.iter().zip(triples.iter()) {
            let bucket = pearson(*salt, *a, *b, *c);
            buckets[bucket as usize] += 1;
        }

        let mut next = [0u8; 1];
        match reader.read_exact(&mut next) {
            Ok(()) => {
                total_len += 1;
                chunk = [next[0], chunk[0], chunk[1], chunk[2], chunk[3]];
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(IndexError::StreamRead(e.to_string())),
        }
    }

    Ok(Accumulation {
        buckets,
        checksum,
        total_len,
    })
}
