//! Random sampling helpers shared by the effect families.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Free-running generator seeded from the thread-local entropy source.
pub fn entropy_rng() -> ChaCha8Rng {
    ChaCha8Rng::from_rng(&mut rand::rng())
}

/// Uniform value in `[min, max)`. Tolerates `min == max`.
pub fn between(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    min + (max - min) * rng.random::<f32>()
}

/// Uniform value in `[-range / 2, range / 2)`.
pub fn spread(rng: &mut impl Rng, range: f32) -> f32 {
    range * (rng.random::<f32>() - 0.5)
}

/// Uniform direction on the unit sphere (inverse-cosine latitude, so the
/// poles are not oversampled).
pub fn unit_sphere(rng: &mut impl Rng) -> Vec3 {
    let theta = rng.random::<f32>() * std::f32::consts::TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = between(&mut rng, 2.4, 5.2);
            assert!((2.4..=5.2).contains(&v), "{v}");
        }
        assert_eq!(between(&mut rng, 3.0, 3.0), 3.0);
    }

    #[test]
    fn test_spread_is_centered() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let samples: Vec<f32> = (0..4000).map(|_| spread(&mut rng, 10.0)).collect();
        assert!(samples.iter().all(|v| (-5.0..=5.0).contains(v)));
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        assert!(mean.abs() < 0.3, "mean {mean}");
    }

    #[test]
    fn test_unit_sphere_covers_both_hemispheres() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let dirs: Vec<Vec3> = (0..2000).map(|_| unit_sphere(&mut rng)).collect();
        assert!(dirs.iter().all(|d| (d.length() - 1.0).abs() < 1e-4));
        let north = dirs.iter().filter(|d| d.z > 0.0).count();
        assert!((800..1200).contains(&north), "north {north}");
    }
}
