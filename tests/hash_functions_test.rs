//! Hash adapter contract: determinism, avalanche, distribution
//!
//! The sketch only assumes a deterministic, uniformly distributed 64-bit
//! hash over byte strings. These tests pin that contract for the default
//! backend.

use hyperminhash::hash::{hash_64, xxhash};
use std::collections::HashSet;

#[test]
fn test_deterministic() {
    for payload in [&b"a"[..], b"hyperminhash", b"", b"\x00\x01\x02"] {
        assert_eq!(hash_64(payload, 0), hash_64(payload, 0));
        assert_eq!(hash_64(payload, 1337), hash_64(payload, 1337));
    }
}

#[test]
fn test_hash_64_is_xxhash() {
    assert_eq!(hash_64(b"payload", 7), xxhash(b"payload", 7));
}

#[test]
fn test_seeds_are_independent() {
    let payload = b"same payload";
    assert_ne!(hash_64(payload, 0), hash_64(payload, 1));
    assert_ne!(hash_64(payload, 1), hash_64(payload, 2));
}

#[test]
fn test_avalanche() {
    // flipping any single input bit should flip about half the output bits
    let base = b"hyperminhash-avalanche-probe";
    let h0 = hash_64(base, 0);

    let mut flipped_bits = 0u32;
    let mut trials = 0u32;
    for byte in 0..base.len() {
        for bit in 0..8 {
            let mut input = base.to_vec();
            input[byte] ^= 1 << bit;
            flipped_bits += (h0 ^ hash_64(&input, 0)).count_ones();
            trials += 1;
        }
    }

    let avg = f64::from(flipped_bits) / f64::from(trials);
    assert!(
        avg > 24.0 && avg < 40.0,
        "average of {} output bits flipped per input bit flip",
        avg
    );
}

#[test]
fn test_bucket_distribution() {
    // the sketch takes its bucket index from the top 14 bits; hashing m
    // distinct items should occupy close to m * (1 - 1/e) ~ 10357 buckets
    let occupied: HashSet<u64> = (0..16384)
        .map(|i| hash_64(format!("item-{i}").as_bytes(), 0) >> 50)
        .collect();
    assert!(
        occupied.len() > 10_000 && occupied.len() < 10_700,
        "{} buckets occupied",
        occupied.len()
    );
}

#[test]
fn test_no_collisions_on_distinct_inputs() {
    let hashes: HashSet<u64> = (0..100_000u64)
        .map(|i| hash_64(i.to_string().as_bytes(), 0))
        .collect();
    assert_eq!(hashes.len(), 100_000);
}
