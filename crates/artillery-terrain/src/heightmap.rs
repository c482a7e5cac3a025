//! Midpoint-displacement heightmap generation and sampling

use artillery_core::{ArtilleryError, Result};
use rand::Rng;

/// A 1D terrain silhouette: one height per horizontal sample
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    samples: Vec<f32>,
}

impl Heightmap {
    /// Generate `length + 1` samples between two pinned endpoint heights.
    ///
    /// Interior samples are filled by recursive midpoint displacement: each
    /// midpoint is the mean of its enclosing endpoints plus a uniform offset in
    /// `[-roughness, roughness]`, and the roughness halves at every level.
    /// With `roughness == 0` no random numbers are drawn and the result is a
    /// straight line.
    pub fn generate<R: Rng + ?Sized>(
        start_height: f32,
        end_height: f32,
        length: usize,
        roughness: f32,
        rng: &mut R,
    ) -> Result<Self> {
        if length == 0 {
            return Err(ArtilleryError::InvalidConfig(
                "heightmap length must be at least 1".to_string(),
            ));
        }
        check_parameters(start_height, end_height, roughness)?;

        let mut samples = vec![0.0; length + 1];
        samples[0] = start_height;
        samples[length] = end_height;

        displace_midpoints(&mut samples, roughness, rng);

        Ok(Self { samples })
    }

    /// Wrap existing samples (for testing and for callers with their own source)
    pub fn from_samples(samples: Vec<f32>) -> Result<Self> {
        if samples.len() < 2 {
            return Err(ArtilleryError::InvalidConfig(format!(
                "a heightmap needs at least 2 samples, got {}",
                samples.len()
            )));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of samples (always at least 2)
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.samples.get(index).copied()
    }

    pub fn first(&self) -> f32 {
        self.samples[0]
    }

    pub fn last(&self) -> f32 {
        self.samples[self.samples.len() - 1]
    }

    /// Lowest and highest sample
    pub fn range(&self) -> (f32, f32) {
        self.samples
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }

    /// Linear interpolation at a fractional sample position.
    /// Positions outside `[0, len - 1]` clamp to the end samples.
    pub fn sample_at(&self, position: f32) -> f32 {
        let last = (self.samples.len() - 1) as f32;
        let p = position.clamp(0.0, last);

        let i0 = (p.floor() as usize).min(self.samples.len() - 2);
        let t = p - i0 as f32;

        self.samples[i0] * (1.0 - t) + self.samples[i0 + 1] * t
    }
}

/// Reject endpoint heights and roughness that could leave the finite range.
///
/// Every displaced sample stays within the endpoints widened by
/// `2 * roughness`, and each midpoint sums two such samples, so twice that
/// envelope must be finite.
pub fn check_parameters(start_height: f32, end_height: f32, roughness: f32) -> Result<()> {
    if !start_height.is_finite() || !end_height.is_finite() {
        return Err(ArtilleryError::InvalidConfig(format!(
            "heightmap endpoints must be finite, got {} and {}",
            start_height, end_height
        )));
    }
    if !roughness.is_finite() || roughness < 0.0 {
        return Err(ArtilleryError::InvalidConfig(format!(
            "roughness must be a finite non-negative number, got {}",
            roughness
        )));
    }
    let envelope = start_height.abs().max(end_height.abs()) + 2.0 * roughness;
    if !(2.0 * envelope).is_finite() {
        return Err(ArtilleryError::InvalidConfig(format!(
            "roughness {} with endpoints {} and {} overflows the height range",
            roughness, start_height, end_height
        )));
    }
    Ok(())
}

/// Fill the interior of `span`, whose first and last entries are already set.
///
/// Left and right halves share only the midpoint, which is written before
/// either half is visited, so each recursive call owns its interior.
fn displace_midpoints<R: Rng + ?Sized>(span: &mut [f32], roughness: f32, rng: &mut R) {
    let end = span.len() - 1;
    let mid = end / 2;
    if mid == 0 {
        return;
    }

    let offset = if roughness > 0.0 {
        rng.random_range(-roughness..=roughness)
    } else {
        0.0
    };
    span[mid] = (span[0] + span[end]) / 2.0 + offset;

    displace_midpoints(&mut span[..=mid], roughness / 2.0, rng);
    displace_midpoints(&mut span[mid..], roughness / 2.0, rng);
}
