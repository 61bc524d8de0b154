//! Orbiting bodies: circular orbits in a tilted, slowly wobbling plane.

use std::sync::Arc;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::color::hex_to_rgb;
use crate::sampling::between;
use crate::stage::{FrameTime, Material, NodeId, Scene, Transform, Visual};
use crate::texture::SoftTexture;

/// Base parameters for one orbit slot. Each cluster jitters its own copy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitTemplate {
    pub distance: f32,
    pub size: f32,
    /// Angular speed in radians per second.
    pub speed: f32,
    /// Packed `0xRRGGBB`.
    pub color: u32,
}

/// Orbit slots shared by every cluster, innermost first.
pub const ORBIT_TEMPLATE: [OrbitTemplate; 6] = [
    OrbitTemplate { distance: 96.0, size: 4.2, speed: 0.65, color: 0xaecbfa },
    OrbitTemplate { distance: 138.0, size: 4.8, speed: 0.45, color: 0xd7aaff },
    OrbitTemplate { distance: 189.0, size: 5.4, speed: 0.32, color: 0x9ef7d2 },
    OrbitTemplate { distance: 246.0, size: 6.6, speed: 0.25, color: 0xffd284 },
    OrbitTemplate { distance: 324.0, size: 4.5, speed: 0.18, color: 0x8ed1ff },
    OrbitTemplate { distance: 408.0, size: 3.6, speed: 0.14, color: 0x9c82ff },
];

impl OrbitTemplate {
    /// Per-cluster variant: speed ×[0.9, 1.1), size ×[0.8, 1.2),
    /// distance ×[0.95, 1.15).
    pub fn vary(&self, rng: &mut impl Rng) -> Self {
        Self {
            speed: self.speed * between(rng, 0.9, 1.1),
            size: self.size * between(rng, 0.8, 1.2),
            distance: self.distance * between(rng, 0.95, 1.15),
            color: self.color,
        }
    }
}

/// `segments` points evenly spaced by angle on a circle of radius `distance`
/// in the XZ plane.
pub fn orbit_ring(distance: f32, segments: usize) -> Vec<Vec3> {
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
        })
        .collect()
}

/// Position on a circular orbit at `elapsed` seconds, in the pivot's frame.
pub fn orbit_position(distance: f32, speed: f32, elapsed: f32) -> Vec3 {
    let angle = elapsed * speed;
    Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// A body orbiting its cluster's central body.
#[derive(Clone, Debug)]
pub struct OrbitingBody {
    pub distance: f32,
    pub size: f32,
    pub speed: f32,
    pub color: [f32; 3],
    /// Roll oscillation amplitude in radians.
    pub wobble: f32,
    pub tilt_axis: Vec3,
    /// Tilt angle in radians.
    pub tilt_angle: f32,
    /// Roll accumulated from the wobble so far.
    pub roll: f32,
    /// Last position pushed to the scene, in the pivot's frame.
    pub local_position: Vec3,
    pub sprite_opacity: f32,
    pivot: NodeId,
    ring: NodeId,
    body: NodeId,
    sprite: NodeId,
}

impl OrbitingBody {
    /// Jitter `template`, pick a tilt and build the pivot with its ring, body
    /// point and glow sprite under `parent`.
    pub fn spawn(
        template: &OrbitTemplate,
        rng: &mut impl Rng,
        parent: NodeId,
        segments: usize,
        texture: &Arc<SoftTexture>,
        scene: &mut dyn Scene,
    ) -> Self {
        let variant = template.vary(rng);
        let color = hex_to_rgb(variant.color);

        let tilt_axis = Vec3::new(
            between(rng, -1.0, 1.0),
            between(rng, -1.0, 1.0),
            between(rng, -1.0, 1.0),
        )
        .try_normalize()
        .unwrap_or(Vec3::Y);
        let tilt_angle = between(rng, 5.0, 60.0).to_radians();
        let wobble = between(rng, 2.0, 8.0).to_radians();

        let pivot = scene.add(
            Some(parent),
            Visual::Group {
                transform: Transform::from_rotation(Quat::from_axis_angle(tilt_axis, tilt_angle)),
            },
        );
        let ring = scene.add(
            Some(pivot),
            Visual::Points {
                positions: orbit_ring(variant.distance, segments),
                colors: None,
                size: 3.0,
                material: Material::glow(color, 0.7, Some(Arc::clone(texture))),
            },
        );
        let start = Vec3::new(variant.distance, 0.0, 0.0);
        let body = scene.add(
            Some(pivot),
            Visual::Points {
                positions: vec![start],
                colors: None,
                size: (variant.size * 4.2).max(7.0),
                material: Material::glow(color, 1.0, Some(Arc::clone(texture))),
            },
        );
        let sprite = scene.add(
            Some(pivot),
            Visual::Sprite {
                position: start,
                scale: (variant.size * 18.0).max(28.0),
                material: Material::glow(color, 0.95, Some(Arc::clone(texture))),
            },
        );

        Self {
            distance: variant.distance,
            size: variant.size,
            speed: variant.speed,
            color,
            wobble,
            tilt_axis,
            tilt_angle,
            roll: 0.0,
            local_position: start,
            sprite_opacity: 0.95,
            pivot,
            ring,
            body,
            sprite,
        }
    }

    /// Fixed orientation of the orbit plane.
    pub fn tilt(&self) -> Quat {
        Quat::from_axis_angle(self.tilt_axis, self.tilt_angle)
    }

    /// Current pivot orientation: the tilt with the accumulated roll applied
    /// about the pivot's own Z axis.
    pub fn pivot_rotation(&self) -> Quat {
        self.tilt() * Quat::from_rotation_z(self.roll)
    }

    pub fn update(&mut self, time: FrameTime, scene: &mut dyn Scene) {
        self.roll += (time.elapsed * 0.15 + self.speed).sin() * self.wobble * 0.001;
        scene.set_rotation(self.pivot, self.pivot_rotation());

        self.local_position = orbit_position(self.distance, self.speed, time.elapsed);
        scene.set_point(self.body, 0, self.local_position);
        scene.set_position(self.sprite, self.local_position);

        self.sprite_opacity = 0.7 + (time.elapsed * 0.6 + self.speed).sin() * 0.25;
        scene.set_opacity(self.sprite, self.sprite_opacity);
    }

    pub fn pivot_node(&self) -> NodeId {
        self.pivot
    }

    pub fn ring_node(&self) -> NodeId {
        self.ring
    }

    pub fn body_node(&self) -> NodeId {
        self.body
    }

    pub fn sprite_node(&self) -> NodeId {
        self.sprite
    }
}
