//! Seed & PRNG service.
//!
//! # Invariants
//! - One seed per session; it never changes once established.
//! - Every generator draws from the one `PrngStream` built from that seed,
//!   in a fixed call order. Same seed, same order, same world.
//! - The seed travels in the page URL as `?seed=<decimal>`.

mod manager;
mod prng;
mod seed;

pub use manager::{SeedManager, SeedOrigin, SeedSession, query_param, set_query_param};
pub use prng::PrngStream;
pub use seed::{Seed, SeedError};

pub fn crate_info() -> &'static str {
    "gardencity-seed v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("seed"));
    }
}
