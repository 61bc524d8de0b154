//! Rejection sampling of cluster origins under a minimum-spacing constraint.

use cosmic_config::ClusterConfig;
use glam::Vec3;
use rand::Rng;

use crate::sampling::spread;

/// Vertical extent of the placement volume relative to its width.
const VERTICAL_RATIO: f32 = 0.35;

/// Outcome of one placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    /// Candidates drawn before acceptance, or the full budget when relaxed.
    pub attempts: u32,
    /// The budget ran out and `position` ignores the spacing constraint.
    pub relaxed: bool,
}

/// Draws origins in a flattened box centred on the world origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementSampler {
    /// Full width/depth of the box. Height is `bounds * 0.35`.
    pub bounds: f32,
    pub min_spacing: f32,
    pub max_attempts: u32,
}

impl PlacementSampler {
    pub fn new(bounds: f32, min_spacing: f32, max_attempts: u32) -> Self {
        Self {
            bounds,
            min_spacing,
            max_attempts,
        }
    }

    pub fn from_config(config: &ClusterConfig) -> Self {
        Self::new(config.bounds, config.min_spacing, config.max_attempts)
    }

    /// Half-extents of the sampling box.
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(
            self.bounds * 0.5,
            self.bounds * VERTICAL_RATIO * 0.5,
            self.bounds * 0.5,
        )
    }

    /// One unconstrained uniform candidate inside the box.
    pub fn candidate(&self, rng: &mut impl Rng) -> Vec3 {
        Vec3::new(
            spread(rng, self.bounds),
            spread(rng, self.bounds * VERTICAL_RATIO),
            spread(rng, self.bounds),
        )
    }

    /// Whether `candidate` keeps at least `min_spacing` from every origin.
    pub fn is_clear(&self, candidate: Vec3, existing: &[Vec3]) -> bool {
        existing
            .iter()
            .all(|origin| origin.distance(candidate) >= self.min_spacing)
    }

    /// Accept the first candidate clear of `existing`, or fall back to an
    /// unconstrained one once `max_attempts` candidates were rejected.
    pub fn place(&self, rng: &mut impl Rng, existing: &[Vec3]) -> Placement {
        let mut attempts = 0;
        while attempts < self.max_attempts {
            attempts += 1;
            let candidate = self.candidate(rng);
            if self.is_clear(candidate, existing) {
                return Placement {
                    position: candidate,
                    attempts,
                    relaxed: false,
                };
            }
        }

        log::debug!(
            "No origin {} apart found in {} attempts; placing unconstrained",
            self.min_spacing,
            self.max_attempts
        );
        Placement {
            position: self.candidate(rng),
            attempts,
            relaxed: true,
        }
    }
}
