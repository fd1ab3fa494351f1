//! Builds a small multi-index HammingIndex, inserts some 256-bit
//! fingerprints, and reports the nearest stored neighbor to a query that
//! differs from one of them by a handful of bits.

use hamming_index::{hex_from_limbs, limbs_from_hex, HammingIndex, HammingIndexConfig};

fn flip_bits(hex: &str, positions: &[u32]) -> Vec<u64> {
    let mut limbs = limbs_from_hex(hex).unwrap();
    for &pos in positions {
        let limb = limbs.len() - 1 - (pos as usize / 64);
        limbs[limb] ^= 1u64 << (pos % 64);
    }
    limbs
}

fn main() {
    let config = HammingIndexConfig {
        hash_size: 256,
        max_distance: 16,
        use_multiindex: true,
    };
    let mut index = HammingIndex::new(config).expect("valid configuration");

    let samples = [
        "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff",
        "1111111111111111111111111111111111111111111111111111111111111111",
        "fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210",
    ];
    for hex in samples {
        let limbs = limbs_from_hex(hex).expect("valid hex fingerprint");
        index.add(&limbs);
    }

    let query = flip_bits(samples[0], &[0, 17, 63]);
    let sibling = index.shortest_distance(&query);

    println!("indexed {} fingerprints", index.count());
    println!("query:            {}", hex_from_limbs(&query));
    println!(
        "nearest neighbor: {} (distance {})",
        hex_from_limbs(&sibling.value),
        sibling.distance
    );
}
