//! In-memory stage host: a flat node arena standing in for a render scene,
//! plus an ordered effect list standing in for the animation driver.
//!
//! Used by the command-line simulator and by tests that need to inspect what
//! the effects pushed to the scene.

use glam::{Quat, Vec3};

use crate::stage::{
    Effect, FrameTime, Material, NodeId, Scene, Stage, StageHost, TickRegistry, Transform, Visual,
};

/// One node of the headless scene.
#[derive(Clone, Debug)]
pub struct Node {
    pub parent: Option<NodeId>,
    /// Local transform. Sprites keep their position in `translation`.
    pub transform: Transform,
    pub visual: Visual,
}

impl Node {
    pub fn material(&self) -> Option<&Material> {
        match &self.visual {
            Visual::Group { .. } => None,
            Visual::Sprite { material, .. }
            | Visual::Quad { material, .. }
            | Visual::Points { material, .. } => Some(material),
        }
    }

    fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.visual {
            Visual::Group { .. } => None,
            Visual::Sprite { material, .. }
            | Visual::Quad { material, .. }
            | Visual::Points { material, .. } => Some(material),
        }
    }

    pub fn opacity(&self) -> Option<f32> {
        self.material().map(|m| m.opacity)
    }

    pub fn color(&self) -> Option<[f32; 3]> {
        self.material().map(|m| m.color)
    }

    pub fn scale(&self) -> Option<f32> {
        match &self.visual {
            Visual::Sprite { scale, .. } => Some(*scale),
            _ => None,
        }
    }

    pub fn quad_corners(&self) -> Option<[Vec3; 4]> {
        match &self.visual {
            Visual::Quad { corners, .. } => Some(*corners),
            _ => None,
        }
    }

    pub fn points(&self) -> Option<&[Vec3]> {
        match &self.visual {
            Visual::Points { positions, .. } => Some(positions),
            _ => None,
        }
    }
}

/// Flat node arena implementing [`Scene`].
#[derive(Clone, Debug, Default)]
pub struct HeadlessScene {
    nodes: Vec<Node>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Compose parent transforms to find a node's local origin in world space.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_point(id, Vec3::ZERO)
    }

    /// Map `local` from `id`'s frame into world space.
    pub fn world_point(&self, id: NodeId, local: Vec3) -> Option<Vec3> {
        let mut point = local;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            point = node.transform.transform_point(point);
            current = node.parent;
        }
        Some(point)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let node = self.nodes.get_mut(id.0 as usize);
        if node.is_none() {
            log::trace!("Ignoring update for unknown node {}", id.0);
        }
        node
    }
}

impl Scene for HeadlessScene {
    fn add(&mut self, parent: Option<NodeId>, visual: Visual) -> NodeId {
        let transform = match &visual {
            Visual::Group { transform } => *transform,
            Visual::Sprite { position, .. } => Transform::from_translation(*position),
            Visual::Quad { .. } | Visual::Points { .. } => Transform::IDENTITY,
        };
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent,
            transform,
            visual,
        });
        id
    }

    fn set_transform(&mut self, node: NodeId, transform: Transform) {
        if let Some(node) = self.node_mut(node) {
            node.transform = transform;
        }
    }

    fn set_position(&mut self, node: NodeId, position: Vec3) {
        if let Some(node) = self.node_mut(node) {
            node.transform.translation = position;
            if let Visual::Sprite { position: p, .. } = &mut node.visual {
                *p = position;
            }
        }
    }

    fn set_rotation(&mut self, node: NodeId, rotation: Quat) {
        if let Some(node) = self.node_mut(node) {
            node.transform.rotation = rotation;
        }
    }

    fn set_opacity(&mut self, node: NodeId, opacity: f32) {
        if let Some(material) = self.node_mut(node).and_then(Node::material_mut) {
            material.opacity = opacity;
        }
    }

    fn set_color(&mut self, node: NodeId, color: [f32; 3]) {
        if let Some(material) = self.node_mut(node).and_then(Node::material_mut) {
            material.color = color;
        }
    }

    fn set_scale(&mut self, node: NodeId, scale: f32) {
        if let Some(Node {
            visual: Visual::Sprite { scale: s, .. },
            ..
        }) = self.node_mut(node)
        {
            *s = scale;
        }
    }

    fn set_quad(&mut self, node: NodeId, corners: [Vec3; 4]) {
        if let Some(Node {
            visual: Visual::Quad { corners: c, .. },
            ..
        }) = self.node_mut(node)
        {
            *c = corners;
        }
    }

    fn set_point(&mut self, node: NodeId, index: usize, position: Vec3) {
        if let Some(Node {
            visual: Visual::Points { positions, .. },
            ..
        }) = self.node_mut(node)
            && let Some(point) = positions.get_mut(index)
        {
            *point = position;
        }
    }
}

/// Ordered effect list implementing [`TickRegistry`].
#[derive(Default)]
pub struct TickDriver {
    effects: Vec<Box<dyn Effect>>,
}

impl TickDriver {
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|e| e.name()).collect()
    }

    /// Run every effect once, in registration order.
    pub fn run(&mut self, time: FrameTime, scene: &mut dyn Scene) {
        for effect in &mut self.effects {
            effect.update(time, scene);
        }
    }
}

impl TickRegistry for TickDriver {
    fn register_tick(&mut self, effect: Box<dyn Effect>) {
        log::debug!("Registered tick for {}", effect.name());
        self.effects.push(effect);
    }
}

/// Headless scene plus tick driver.
#[derive(Default)]
pub struct HeadlessStage {
    scene: HeadlessScene,
    driver: TickDriver,
    elapsed: f32,
    frames: u64,
}

impl HeadlessStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &HeadlessScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut HeadlessScene {
        &mut self.scene
    }

    pub fn driver(&self) -> &TickDriver {
        &self.driver
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.scene.node(id)
    }

    pub fn node_count(&self) -> usize {
        self.scene.node_count()
    }

    /// See [`HeadlessScene::world_position`].
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.scene.world_position(id)
    }

    pub fn effect_count(&self) -> usize {
        self.driver.len()
    }

    /// Seconds of simulated time driven so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Run every registered effect once with the given frame time.
    pub fn advance(&mut self, time: FrameTime) {
        self.elapsed = time.elapsed;
        self.frames += 1;
        self.driver.run(time, &mut self.scene);
    }

    /// Advance by `delta` seconds from the current elapsed time.
    pub fn step(&mut self, delta: f32) {
        self.advance(FrameTime::new(self.elapsed + delta, delta));
    }
}

impl StageHost for HeadlessStage {
    fn stage(&mut self) -> Stage<'_> {
        Stage::new(&mut self.scene, &mut self.driver)
    }
}
