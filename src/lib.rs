//! hamming-index: a multi-index Hamming-distance nearest-neighbor search
//! structure, plus a TLSH-style streaming locality-sensitive digest for
//! turning byte streams into fixed-width fingerprints it can index.
//!
//! [`HammingIndex`] holds a dynamic set of fixed-width bit-vectors and
//! answers nearest-neighbor queries under Hamming distance, either by
//! brute-force scan or by a pigeonhole-pruned multi-index (Gog &
//! Venturini) selected once at construction. [`shared::SharedIndex`]
//! publishes an index for lock-free concurrent reads under a
//! read-copy-update discipline. [`digest::Digest`] computes the fingerprints
//! themselves from arbitrary byte streams.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitvec;
pub mod block_index;
pub mod digest;
pub mod error;
pub mod hamming_index;
pub mod shared;

pub use bitvec::{hamming, hex_from_limbs, limbs_from_hex};
pub use digest::Digest;
pub use error::{IndexError, Result};
pub use hamming_index::{HammingIndex, HammingIndexConfig, Sibling};
pub use shared::SharedIndex;
