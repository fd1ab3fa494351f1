//! Quartile quantizer (C7)
//!
//! Computes q1/q2/q3 of the first 128 bucket counters via quickselect, then
//! quantizes every one of the 128 buckets into a 2-bit label relative to
//! those quartiles.

/// Order-statistic positions (0-indexed) within the first 128 buckets.
const P1: usize = 31;
const P2: usize = 63;
const P3: usize = 95;

/// Lomuto-style partition around a midpoint pivot. On a two-element range
/// it orders the pair directly and returns the left index, matching the
/// base case called out in the design notes.
fn partition(buf: &mut [u32], lo: usize, hi: usize) -> usize {
    if hi - lo == 1 {
        if buf[lo] > buf[hi] {
            buf.swap(lo, hi);
        }
        return lo;
    }
    let mid = lo + (hi - lo) / 2;
    buf.swap(mid, hi);
    let pivot = buf[hi];
    let mut store = lo;
    for i in lo..hi {
        if buf[i] < pivot {
            buf.swap(i, store);
            store += 1;
        }
    }
    buf.swap(store, hi);
    store
}

/// Selects the value that would occupy index `n` of `buf[lo..=hi]` if
/// sorted, partitioning in place. After this call, every element left of
/// the returned position is `<=` it and every element to the right is
/// `>=` it — the invariant later selections bracket their search with.
fn quickselect(buf: &mut [u32], mut lo: usize, mut hi: usize, n: usize) -> u32 {
    loop {
        if lo == hi {
            return buf[lo];
        }
        let p = partition(buf, lo, hi);
        if n == p {
            return buf[p];
        } else if n < p {
            hi = p - 1;
        } else {
            lo = p + 1;
        }
    }
}

/// Computes (q1, q2, q3) over the first 128 entries of `buckets`.
///
/// q2 is selected first over the full 128-element range; the resulting
/// partition boundary lets q1 and q3 each be selected over half the range
/// instead of redoing a full search.
pub fn quartiles(buckets: &[u32; 256]) -> (u32, u32, u32) {
    let mut buf: Vec<u32> = buckets[..128].to_vec();
    let q2 = quickselect(&mut buf, 0, 127, P2);
    let q1 = quickselect(&mut buf, 0, P2 - 1, P1);
    let q3 = quickselect(&mut buf, P2 + 1, 127, P3);
    (q1, q2, q3)
}

/// `(q1 * 100 / q3) mod 16`, or 0 if `q3` is 0 (a degenerate, near-empty
/// stream where every bucket in the lower half is zero).
pub fn ratio(numerator: u32, q3: u32) -> u8 {
    if q3 == 0 {
        0
    } else {
        ((numerator as u64 * 100 / q3 as u64) % 16) as u8
    }
}

/// Labels the first 128 buckets against the quartiles and packs them into
/// the 32-byte code, 4 labels per byte, written in reverse byte order.
pub fn code(buckets: &[u32; 256], q1: u32, q2: u32, q3: u32) -> [u8; 32] {
    let mut out = [0u8; 32];
    for i in 0..32 {
        let mut byte = 0u8;
        for j in 0..4 {
            let value = buckets[4 * i + j];
            let label: u8 = if q3 < value {
                3
            } else if q2 < value {
                2
            } else if q1 < value {
                1
            } else {
                0
            };
            byte |= label << (2 * j);
        }
        out[31 - i] = byte;
    }
    out
}
