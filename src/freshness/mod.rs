//! Freshness detection: content-hash (blake3) for source files.

mod hash;

pub use hash::ContentHash;
