//! Uniform bounded sampling without modulo bias.

use crate::error::{FairError, Result};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// Number of distinct values a single raw draw can take (16-bit draws).
pub const DRAW_SPACE: u32 = 1 << 16;

/// Draws uniformly distributed integers in `[0, range)` from a
/// cryptographically secure source.
///
/// Each raw draw is a big-endian `u16`. Draws at or above
/// [`rejection_limit`] are discarded and redrawn, never reduced, so every
/// residue class is hit by exactly the same number of raw values.
pub struct UnbiasedSampler<R = OsRng> {
    rng: R,
}

impl UnbiasedSampler<OsRng> {
    /// Sampler backed by the operating system's random source
    pub fn os() -> Self {
        Self { rng: OsRng }
    }
}

impl Default for UnbiasedSampler<OsRng> {
    fn default() -> Self {
        Self::os()
    }
}

impl<R: RngCore + CryptoRng> UnbiasedSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw a value in `[0, range)`.
    ///
    /// `range` must be in `1..=65536`.
    pub fn sample(&mut self, range: u32) -> Result<u32> {
        let limit = rejection_limit(range)?;
        loop {
            let raw = self.draw()?;
            if raw < limit {
                return Ok(raw % range);
            }
        }
    }

    /// Fill `buf` from the underlying source, failing rather than degrading.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        self.rng.try_fill_bytes(buf)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    fn draw(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 2];
        self.fill(&mut bytes)?;
        Ok(u32::from(u16::from_be_bytes(bytes)))
    }
}

/// Largest multiple of `range` not exceeding [`DRAW_SPACE`]; raw draws at or
/// above it are rejected.
pub fn rejection_limit(range: u32) -> Result<u32> {
    if range == 0 {
        return Err(FairError::invalid("range must be a positive integer"));
    }
    if range > DRAW_SPACE {
        return Err(FairError::invalid(format!(
            "range {range} exceeds the sampler width of {DRAW_SPACE}"
        )));
    }
    Ok((DRAW_SPACE / range) * range)
}
