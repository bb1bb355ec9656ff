//! Cryptographic primitives for the fair value exchange.
//!
//! This module provides:
//! - UnbiasedSampler for bounded sampling without modulo bias
//! - SecretKey, Digest and Commitment for the HMAC commit-reveal scheme
//! - Reveal, the payload a verifier checks against a published digest

mod commitment;
pub(crate) mod sampler;

pub use commitment::{Commitment, Digest, Reveal, SecretKey, KEY_LEN};
pub use sampler::{rejection_limit, UnbiasedSampler, DRAW_SPACE};
