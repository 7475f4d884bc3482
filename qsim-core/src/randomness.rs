//! Seed derivation for deterministic simulation.
//!
//! A run is configured with one seed. Every random stream inside the run gets
//! its own seed derived from it, so streams never share generator state and
//! adding draws to one stream leaves the others untouched.

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Stream tag for inter-arrival samples.
pub const STREAM_ARRIVALS: u64 = 0x4152_5249_5641_4C53; // "ARRIVALS"
/// Stream tag for service-time samples.
pub const STREAM_SERVICE: u64 = 0x5345_5256_4943_4553; // "SERVICES"
/// Stream tag for Monte Carlo replications.
pub const STREAM_REPLICATION: u64 = 0x5245_504C_4943_4154; // "REPLICAT"

/// Deterministically derive a seed from a base seed, a stream tag and a counter.
pub fn derive_seed(seed: u64, stream: u64, counter: u64) -> u64 {
    let x0 = splitmix64(seed ^ stream);
    splitmix64(x0.wrapping_add(counter))
}
