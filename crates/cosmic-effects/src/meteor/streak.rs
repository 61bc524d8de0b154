//! Direction-aligned streak quad for a meteor's head and fading tail.

use glam::Vec3;

/// Triangle list for the quad corners returned by [`build_streak_quad`].
pub const STREAK_INDICES: [u16; 6] = [0, 2, 1, 2, 3, 1];

/// Direction used when the velocity is the zero vector.
const FALLBACK_DIRECTION: Vec3 = Vec3::NEG_Y;
/// Above this `|dir · up|` the cross product with `up` degenerates.
const PARALLEL_THRESHOLD: f32 = 0.95;
const PRIMARY_UP: Vec3 = Vec3::Y;
const SECONDARY_UP: Vec3 = Vec3::X;

/// Unit travel direction, substituting straight down for a zero velocity.
pub fn travel_direction(velocity: Vec3) -> Vec3 {
    velocity.try_normalize().unwrap_or(FALLBACK_DIRECTION)
}

/// Unit vector perpendicular to `dir`, spanning the quad's width.
pub fn side_vector(dir: Vec3) -> Vec3 {
    let up = if dir.dot(PRIMARY_UP).abs() > PARALLEL_THRESHOLD {
        SECONDARY_UP
    } else {
        PRIMARY_UP
    };
    dir.cross(up).normalize_or_zero()
}

/// Corners `[head_left, head_right, tail_left, tail_right]` of the streak.
///
/// The head sits at `position` with half-width `tail_width`; the tail trails
/// behind along the travel direction and narrows as `fade` drops toward 0.
/// Depends on per-frame position and fade, so callers rebuild it every frame.
pub fn build_streak_quad(
    position: Vec3,
    velocity: Vec3,
    tail_width: f32,
    tail_length: f32,
    fade: f32,
) -> [Vec3; 4] {
    let dir = travel_direction(velocity);
    let side = side_vector(dir);

    let tail_width_now = (tail_width * 0.15 * fade).max(0.05);
    let tail_reach = fade.max(0.15) * tail_length * 0.02;
    let tail_end = position - dir * tail_reach;

    [
        position + side * tail_width,
        position - side * tail_width,
        tail_end + side * tail_width_now,
        tail_end - side * tail_width_now,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_finite(corners: &[Vec3; 4]) -> bool {
        corners.iter().all(|c| c.is_finite())
    }

    #[test]
    fn test_zero_velocity_yields_finite_corners() {
        let corners = build_streak_quad(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, 2.0, 100.0, 1.0);
        assert!(all_finite(&corners), "{corners:?}");
        // Falls back to straight down, so the tail sits above the head.
        assert!(corners[2].y > corners[0].y);
    }

    #[test]
    fn test_near_vertical_direction_uses_secondary_up() {
        for velocity in [Vec3::NEG_Y, Vec3::Y, Vec3::new(0.05, -1.0, 0.0)] {
            let dir = travel_direction(velocity);
            assert!(dir.dot(Vec3::Y).abs() > PARALLEL_THRESHOLD);
            let side = side_vector(dir);
            assert!((side.length() - 1.0).abs() < 1e-5, "side {side} for {velocity}");
        }
    }

    #[test]
    fn test_side_is_perpendicular_to_direction() {
        let dir = travel_direction(Vec3::new(0.4, -0.7, 0.2));
        let side = side_vector(dir);
        assert!(side.dot(dir).abs() < 1e-5);
    }

    #[test]
    fn test_head_width_and_tail_reach() {
        let position = Vec3::new(0.0, 100.0, 0.0);
        let velocity = Vec3::new(10.0, 0.0, 0.0);
        let corners = build_streak_quad(position, velocity, 3.0, 200.0, 1.0);

        assert!((corners[0].distance(corners[1]) - 6.0).abs() < 1e-4);
        let tail_mid = (corners[2] + corners[3]) * 0.5;
        assert!((tail_mid - Vec3::new(-4.0, 100.0, 0.0)).length() < 1e-4);
        assert!((corners[2].distance(corners[3]) - 2.0 * 3.0 * 0.15).abs() < 1e-4);
    }

    #[test]
    fn test_tail_narrows_and_shortens_with_fade() {
        let position = Vec3::ZERO;
        let velocity = Vec3::new(0.0, -1.0, 1.0);
        let fresh = build_streak_quad(position, velocity, 4.0, 300.0, 1.0);
        let faded = build_streak_quad(position, velocity, 4.0, 300.0, 0.2);

        let width = |c: &[Vec3; 4]| c[2].distance(c[3]);
        let reach = |c: &[Vec3; 4]| ((c[2] + c[3]) * 0.5).length();
        assert!(width(&faded) < width(&fresh));
        assert!(reach(&faded) < reach(&fresh));
        // Head width does not fade.
        assert!((fresh[0].distance(fresh[1]) - faded[0].distance(faded[1])).abs() < 1e-4);
    }

    #[test]
    fn test_fully_faded_keeps_minimum_extent() {
        let corners = build_streak_quad(Vec3::ZERO, Vec3::new(1.0, -1.0, 0.0), 2.0, 100.0, 0.0);
        assert!((corners[2].distance(corners[3]) - 0.1).abs() < 1e-4);
        let reach = ((corners[2] + corners[3]) * 0.5).length();
        assert!((reach - 0.15 * 100.0 * 0.02).abs() < 1e-4);
    }
}
