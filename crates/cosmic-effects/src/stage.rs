//! Host stage contract: the scene graph, the per-frame tick driver and the
//! capability bundle handed to effect initializers.

use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::error::EffectError;
use crate::texture::SoftTexture;

/// Opaque handle to a node created in a host [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Timing information passed to every effect once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the driver started.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
}

impl FrameTime {
    pub fn new(elapsed: f32, delta: f32) -> Self {
        Self { elapsed, delta }
    }
}

/// Local transform of a scene node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Map a point from this node's local frame into its parent's frame.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * point
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// How a translucent visual combines with what is behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blending {
    Normal,
    Additive,
}

/// Material shared by sprites, quads and point clouds.
#[derive(Clone, Debug)]
pub struct Material {
    /// Linear RGB tint.
    pub color: [f32; 3],
    pub opacity: f32,
    pub texture: Option<Arc<SoftTexture>>,
    pub blending: Blending,
    /// Render both faces (streak quads are visible from behind).
    pub double_sided: bool,
}

impl Material {
    /// Additive glow material used by every celestial effect.
    pub fn glow(color: [f32; 3], opacity: f32, texture: Option<Arc<SoftTexture>>) -> Self {
        Self {
            color,
            opacity,
            texture,
            blending: Blending::Additive,
            double_sided: false,
        }
    }
}

/// Description of a visual to add to the scene.
#[derive(Clone, Debug)]
pub enum Visual {
    /// Transform-only node used to parent other visuals.
    Group { transform: Transform },
    /// Camera-facing billboard.
    Sprite {
        position: Vec3,
        scale: f32,
        material: Material,
    },
    /// Four-corner mesh drawn as two triangles using `indices`.
    Quad {
        corners: [Vec3; 4],
        indices: [u16; 6],
        material: Material,
    },
    /// Point cloud with optional per-point colors.
    Points {
        positions: Vec<Vec3>,
        colors: Option<Vec<[f32; 3]>>,
        size: f32,
        material: Material,
    },
}

/// Scene graph container supplied by the host.
///
/// Mutators addressed at an unknown node are ignored.
pub trait Scene {
    /// Add a visual under `parent` (or the scene root) and return its handle.
    fn add(&mut self, parent: Option<NodeId>, visual: Visual) -> NodeId;

    fn set_transform(&mut self, node: NodeId, transform: Transform);

    fn set_position(&mut self, node: NodeId, position: Vec3);

    fn set_rotation(&mut self, node: NodeId, rotation: Quat);

    fn set_opacity(&mut self, node: NodeId, opacity: f32);

    fn set_color(&mut self, node: NodeId, color: [f32; 3]);

    /// Uniform billboard scale.
    fn set_scale(&mut self, node: NodeId, scale: f32);

    /// Replace the four corners of a quad visual.
    fn set_quad(&mut self, node: NodeId, corners: [Vec3; 4]);

    /// Move a single point of a point cloud.
    fn set_point(&mut self, node: NodeId, index: usize, position: Vec3);
}

/// A per-frame participant registered with the host's animation driver.
pub trait Effect {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn update(&mut self, time: FrameTime, scene: &mut dyn Scene);
}

/// Per-frame callback registry supplied by the host.
///
/// Effects run once per frame in registration order. There is no
/// unregistration.
pub trait TickRegistry {
    fn register_tick(&mut self, effect: Box<dyn Effect>);
}

/// Capabilities a host exposes to effect initializers.
///
/// Either capability may be missing; initializers then log a warning and
/// create nothing.
#[derive(Default)]
pub struct Stage<'a> {
    pub scene: Option<&'a mut dyn Scene>,
    pub ticks: Option<&'a mut dyn TickRegistry>,
}

impl<'a> Stage<'a> {
    pub fn new(scene: &'a mut dyn Scene, ticks: &'a mut dyn TickRegistry) -> Self {
        Self {
            scene: Some(scene),
            ticks: Some(ticks),
        }
    }

    /// A stage with no capabilities at all.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Borrow both capabilities, or report the first missing one.
    pub fn require(
        &mut self,
        effect: &'static str,
    ) -> Result<(&mut dyn Scene, &mut dyn TickRegistry), EffectError> {
        let scene = self
            .scene
            .as_deref_mut()
            .ok_or(EffectError::EnvironmentUnavailable {
                effect,
                missing: "scene",
            })?;
        let ticks = self
            .ticks
            .as_deref_mut()
            .ok_or(EffectError::EnvironmentUnavailable {
                effect,
                missing: "tick registry",
            })?;
        Ok((scene, ticks))
    }
}

/// A host that can hand out its [`Stage`] capabilities.
pub trait StageHost {
    fn stage(&mut self) -> Stage<'_>;
}
