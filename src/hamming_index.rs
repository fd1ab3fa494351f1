//! The Hamming-distance nearest-neighbor index (C4), built on the
//! bit-vector primitives (C1) and pigeonhole block tables (C3).

use std::collections::HashMap;

use crate::bitvec::{extract_all_blocks, hamming};
use crate::block_index::BlockTable;
use crate::error::{IndexError, Result};

/// User-supplied configuration for a [`HammingIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HammingIndexConfig {
    /// Fingerprint width in bits. Must be a multiple of 64.
    pub hash_size: usize,
    /// Intended Hamming search radius. `blocks = max_distance + 1` must be
    /// at most 255.
    pub max_distance: u32,
    /// Selects the pigeonhole-pruned multi-index strategy when `true`, or
    /// brute-force scanning when `false`.
    pub use_multiindex: bool,
}

/// A fingerprint reported as a query's nearest neighbor, paired with its
/// Hamming distance to the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sibling {
    /// The stored fingerprint's limbs.
    pub value: Vec<u64>,
    /// Hamming distance from the query to `value`.
    pub distance: u32,
}

/// A dynamic set of fixed-width bit-vectors supporting add/remove/contains
/// and nearest-neighbor queries under Hamming distance.
///
/// All operations are single-threaded within one instance; see
/// [`crate::shared::SharedIndex`] for the read-copy-update pattern this
/// index is designed to be published through.
#[derive(Debug, Clone)]
pub struct HammingIndex {
    config: HammingIndexConfig,
    blocks: usize,
    block_size: u32,
    last_block_size: u32,
    /// Every inserted fingerprint, positionally addressed by its insertion
    /// index. Never compacted: a removed fingerprint's slot is simply
    /// unreferenced by `identity` and `block_indices` from then on.
    fingerprints: Vec<Vec<u64>>,
    /// Value → currently-holding insertion index. Keyed by the
    /// fingerprint's own limbs, which already hash and compare by value,
    /// so this satisfies the "value-keyed map" requirement without a
    /// separate byte-key newtype.
    identity: HashMap<Vec<u64>, u32>,
    block_indices: Vec<BlockTable>,
    /// Advisory, non-atomic counter of `Remove` calls whose block-index
    /// deletion found no matching entry at some block position. Internal
    /// bookkeeping only; never affects returned results.
    remove_block_misses: u64,
}

impl HammingIndex {
    /// Constructs an index from `config`.
    ///
    /// Fails with [`IndexError::BadHashSize`] if `hash_size` is not a
    /// multiple of 64, or if the derived block size would exceed 16 bits.
    /// Fails with [`IndexError::TooManyBlocks`] if `max_distance + 1`
    /// exceeds 255.
    pub fn new(config: HammingIndexConfig) -> Result<Self> {
        if config.hash_size == 0 || config.hash_size % 64 != 0 {
            return Err(IndexError::BadHashSize {
                hash_size: config.hash_size,
            });
        }
        let blocks = config.max_distance as usize + 1;
        if blocks > 255 {
            return Err(IndexError::TooManyBlocks { blocks });
        }
        let block_size = (config.hash_size / blocks) as u32;
        if block_size > 16 {
            return Err(IndexError::BadHashSize {
                hash_size: config.hash_size,
            });
        }
        let last_block_size = config.hash_size as u32 - (blocks as u32 - 1) * block_size;

        Ok(Self {
            config,
            blocks,
            block_size,
            last_block_size,
            fingerprints: Vec::new(),
            identity: HashMap::new(),
            block_indices: vec![BlockTable::new(); blocks],
            remove_block_misses: 0,
        })
    }

    /// The configuration this index was constructed with.
    pub fn config(&self) -> &HammingIndexConfig {
        &self.config
    }

    /// `block_size` bits per block position, derived at construction.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// The width of the final block, which may exceed `block_size` when
    /// `hash_size` is not an integer multiple of `blocks`. Retained per the
    /// spec as a defined (but currently unused) extension point.
    pub fn last_block_size(&self) -> u32 {
        self.last_block_size
    }

    /// Number of fingerprints ever appended to the backing array,
    /// including slots orphaned by a prior `Remove`.
    pub fn count(&self) -> usize {
        self.fingerprints.len()
    }

    /// `true` if `v` is currently present.
    pub fn contains(&self, v: &[u64]) -> bool {
        self.identity.contains_key(v)
    }

    /// Inserts `v`. Returns `false` without modifying the index if `v` is
    /// already present.
    pub fn add(&mut self, v: &[u64]) -> bool {
        if self.identity.contains_key(v) {
            return false;
        }
        let i = self.fingerprints.len() as u32;
        self.fingerprints.push(v.to_vec());
        self.identity.insert(v.to_vec(), i);
        if self.config.use_multiindex {
            for (b, &value) in extract_all_blocks(v, self.blocks, self.block_size)
                .iter()
                .enumerate()
            {
                self.block_indices[b].insert(value, i);
            }
        }
        true
    }

    /// Removes `v`. Returns `false` without modifying the index if `v` is
    /// absent. The fingerprint array itself is not compacted; the vacated
    /// slot is simply never referenced again.
    pub fn remove(&mut self, v: &[u64]) -> bool {
        let Some(i) = self.identity.remove(v) else {
            return false;
        };
        if self.config.use_multiindex {
            for (b, &value) in extract_all_blocks(v, self.blocks, self.block_size)
                .iter()
                .enumerate()
            {
                if !self.block_indices[b].remove(value, i) {
                    self.remove_block_misses += 1;
                }
            }
        }
        true
    }

    /// `Add`s every element of `vs`, returning the logical AND of each
    /// individual result (every element must have been newly inserted for
    /// this to return `true`).
    pub fn add_bulk(&mut self, vs: &[Vec<u64>]) -> bool {
        let mut all = true;
        for v in vs {
            all &= self.add(v);
        }
        all
    }

    /// `Remove`s every element of `vs`, returning the logical AND of each
    /// individual result.
    pub fn remove_bulk(&mut self, vs: &[Vec<u64>]) -> bool {
        let mut all = true;
        for v in vs {
            all &= self.remove(v);
        }
        all
    }

    /// Resets the block indices and identity map. Leaves the fingerprint
    /// array as-is.
    pub fn remove_all(&mut self) {
        self.identity.clear();
        for table in &mut self.block_indices {
            table.clear();
        }
    }

    /// Returns the nearest stored fingerprint to `v` under Hamming
    /// distance. If `v` is present, returns `{distance: 0, value: v}`
    /// directly. Otherwise delegates to brute-force or multi-index search
    /// depending on `config.use_multiindex`.
    ///
    /// With the multi-index strategy, any stored fingerprint within
    /// `max_distance` of `v` is guaranteed to be visited (the pigeonhole
    /// argument in the module-level docs), but the returned sibling is not
    /// guaranteed to be the global minimum once all true matches fall
    /// outside that radius.
    pub fn shortest_distance(&self, v: &[u64]) -> Sibling {
        if self.identity.contains_key(v) {
            return Sibling {
                value: v.to_vec(),
                distance: 0,
            };
        }
        if self.config.use_multiindex {
            self.shortest_distance_multi_index(v)
        } else {
            self.shortest_distance_brute_force(v)
        }
    }

    fn shortest_distance_brute_force(&self, v: &[u64]) -> Sibling {
        let mut best_distance = self.config.hash_size as u32;
        let mut best_value: Option<&Vec<u64>> = None;
        for candidate in self.identity.keys() {
            let d = hamming(v, candidate);
            if d < best_distance {
                best_distance = d;
                best_value = Some(candidate);
            }
        }
        Sibling {
            value: best_value.cloned().unwrap_or_else(|| v.to_vec()),
            distance: best_distance,
        }
    }

    fn shortest_distance_multi_index(&self, v: &[u64]) -> Sibling {
        let mut best_distance = self.config.hash_size as u32;
        let mut best_value: Option<&Vec<u64>> = None;
        let mut checked = vec![false; self.fingerprints.len()];
        let query_blocks = extract_all_blocks(v, self.blocks, self.block_size);

        for (b, &value) in query_blocks.iter().enumerate() {
            for &i in self.block_indices[b].candidates(value) {
                let idx = i as usize;
                if checked[idx] {
                    continue;
                }
                checked[idx] = true;
                let candidate = &self.fingerprints[idx];
                let d = hamming(v, candidate);
                if d < best_distance {
                    best_distance = d;
                    best_value = Some(candidate);
                }
            }
        }

        Sibling {
            value: best_value.cloned().unwrap_or_else(|| v.to_vec()),
            distance: best_distance,
        }
    }

    /// Deep-copies this index: the fingerprint array, every block-index
    /// table and candidate list, and the identity map. The result is
    /// independent and may be mutated concurrently with reads on `self`.
    pub fn dup(&self) -> HammingIndex {
        self.clone()
    }

    /// Advisory count of block-index removals that found no matching
    /// entry. Not atomic; for debugging only.
    pub fn remove_block_misses(&self) -> u64 {
        self.remove_block_misses
    }
}
