//! Orbital clusters: scattered "solar systems", each a glowing point-cloud
//! core with bodies on tilted circular orbits around it.
//!
//! Cluster origins come from [`PlacementSampler`]; every cluster gets a random
//! yaw and its own jittered copy of [`ORBIT_TEMPLATE`]. All clusters are
//! driven by a single [`ClusterField`] effect.

use std::sync::Arc;

use cosmic_config::ClusterConfig;
use glam::{Quat, Vec3};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::color::hsl_to_rgb;
use crate::error::EffectError;
use crate::sampling::{between, unit_sphere};
use crate::stage::{Effect, FrameTime, Material, NodeId, Scene, Stage, Transform, Visual};
use crate::texture::SoftTexture;

pub mod orbit;
pub mod placement;

pub use orbit::{ORBIT_TEMPLATE, OrbitTemplate, OrbitingBody, orbit_position, orbit_ring};
pub use placement::{Placement, PlacementSampler};

const EFFECT_NAME: &str = "clusters";

/// Core spin rate about the vertical axis, radians per second.
const CORE_SPIN_RATE: f32 = 0.25;

/// One cluster: a core point cloud plus its orbiting bodies.
#[derive(Clone, Debug)]
pub struct Cluster {
    /// Generation order within the field.
    pub index: usize,
    pub origin: Vec3,
    /// Placement ignored the spacing constraint.
    pub relaxed: bool,
    pub yaw: f32,
    /// Core rotation accumulated so far.
    pub spin: f32,
    group: NodeId,
    core: NodeId,
    bodies: Vec<OrbitingBody>,
}

impl Cluster {
    fn build(
        index: usize,
        placement: Placement,
        config: &ClusterConfig,
        texture: &Arc<SoftTexture>,
        rng: &mut impl Rng,
        scene: &mut dyn Scene,
    ) -> Self {
        let yaw = rng.random::<f32>() * std::f32::consts::TAU;
        let group = scene.add(
            None,
            Visual::Group {
                transform: Transform {
                    translation: placement.position,
                    rotation: Quat::from_rotation_y(yaw),
                },
            },
        );

        let (positions, colors) = core_cloud(config.core_particles, config.core_radius, rng);
        let core = scene.add(
            Some(group),
            Visual::Points {
                positions,
                colors: Some(colors),
                size: 14.0,
                material: Material::glow([1.0, 1.0, 1.0], 0.95, Some(Arc::clone(texture))),
            },
        );

        let mut bodies = Vec::with_capacity(ORBIT_TEMPLATE.len());
        for template in &ORBIT_TEMPLATE {
            bodies.push(OrbitingBody::spawn(
                template,
                rng,
                group,
                config.orbit_segments,
                texture,
                scene,
            ));
        }

        Self {
            index,
            origin: placement.position,
            relaxed: placement.relaxed,
            yaw,
            spin: 0.0,
            group,
            core,
            bodies,
        }
    }

    pub fn update(&mut self, time: FrameTime, scene: &mut dyn Scene) {
        self.spin += time.delta * CORE_SPIN_RATE;
        scene.set_rotation(self.core, Quat::from_rotation_y(self.spin));
        for body in &mut self.bodies {
            body.update(time, scene);
        }
    }

    pub fn bodies(&self) -> &[OrbitingBody] {
        &self.bodies
    }

    pub fn group_node(&self) -> NodeId {
        self.group
    }

    pub fn core_node(&self) -> NodeId {
        self.core
    }
}

/// Dense spherical point cloud with warm per-point color jitter.
///
/// Radii are uniform in `[0, radius)` and directions uniform on the sphere.
pub fn core_cloud(
    count: usize,
    radius: f32,
    rng: &mut impl Rng,
) -> (Vec<Vec3>, Vec<[f32; 3]>) {
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);
    for _ in 0..count {
        let r = rng.random::<f32>() * radius;
        positions.push(unit_sphere(rng) * r);
        colors.push(hsl_to_rgb(
            between(rng, 0.08, 0.11),
            0.85,
            between(rng, 0.55, 0.65),
        ));
    }
    (positions, colors)
}

/// Every cluster, driven as one effect.
pub struct ClusterField {
    clusters: Vec<Cluster>,
}

impl ClusterField {
    /// Place and build `config.count` clusters.
    pub fn new(
        config: &ClusterConfig,
        texture: Arc<SoftTexture>,
        mut rng: ChaCha8Rng,
        scene: &mut dyn Scene,
    ) -> Self {
        let sampler = PlacementSampler::from_config(config);
        let mut origins = Vec::with_capacity(config.count);
        let mut clusters = Vec::with_capacity(config.count);

        for index in 0..config.count {
            let placement = sampler.place(&mut rng, &origins);
            origins.push(placement.position);
            clusters.push(Cluster::build(
                index, placement, config, &texture, &mut rng, scene,
            ));
        }

        let field = Self { clusters };
        if field.relaxed_count() > 0 {
            log::debug!(
                "{} of {} clusters placed without spacing guarantee",
                field.relaxed_count(),
                field.len()
            );
        }
        field
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn origins(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.clusters.iter().map(|c| c.origin)
    }

    /// Clusters whose placement exhausted the attempt budget.
    pub fn relaxed_count(&self) -> usize {
        self.clusters.iter().filter(|c| c.relaxed).count()
    }

    pub fn update(&mut self, time: FrameTime, scene: &mut dyn Scene) {
        for cluster in &mut self.clusters {
            cluster.update(time, scene);
        }
    }
}

impl Effect for ClusterField {
    fn name(&self) -> &'static str {
        EFFECT_NAME
    }

    fn update(&mut self, time: FrameTime, scene: &mut dyn Scene) {
        ClusterField::update(self, time, scene);
    }
}

/// Create the cluster field on the stage and register it with the tick driver.
///
/// Nothing is created when the stage lacks a scene or tick registry.
pub fn init_clusters(
    stage: &mut Stage<'_>,
    config: &ClusterConfig,
    rng: ChaCha8Rng,
) -> Result<(), EffectError> {
    let (scene, ticks) = stage.require(EFFECT_NAME)?;
    let texture = SoftTexture::shared(config.texture_size);
    let field = ClusterField::new(config, texture, rng, scene);
    log::info!(
        "Cluster field ready with {} clusters ({} relaxed)",
        field.len(),
        field.relaxed_count()
    );
    ticks.register_tick(Box::new(field));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessScene, HeadlessStage};
    use crate::stage::StageHost;
    use rand::SeedableRng;

    fn light_config(count: usize) -> ClusterConfig {
        ClusterConfig {
            count,
            core_particles: 200,
            orbit_segments: 32,
            texture_size: 8,
            ..ClusterConfig::default()
        }
    }

    fn field(count: usize, seed: u64, scene: &mut HeadlessScene) -> ClusterField {
        ClusterField::new(
            &light_config(count),
            SoftTexture::shared(8),
            ChaCha8Rng::seed_from_u64(seed),
            scene,
        )
    }

    #[test]
    fn test_each_cluster_gets_one_body_per_template() {
        let mut scene = HeadlessScene::new();
        let field = field(4, 1, &mut scene);
        assert_eq!(field.len(), 4);
        for cluster in field.clusters() {
            assert_eq!(cluster.bodies().len(), ORBIT_TEMPLATE.len());
        }
        // Group + core per cluster, pivot + ring + body + sprite per orbit.
        assert_eq!(scene.node_count(), 4 * (2 + ORBIT_TEMPLATE.len() * 4));
    }

    #[test]
    fn test_origins_respect_spacing() {
        let mut scene = HeadlessScene::new();
        let field = field(24, 2, &mut scene);
        let clusters = field.clusters();
        for (i, a) in clusters.iter().enumerate() {
            for b in &clusters[..i] {
                if a.relaxed || b.relaxed {
                    continue;
                }
                assert!(a.origin.distance(b.origin) >= 540.0);
            }
        }
    }

    #[test]
    fn test_core_cloud_within_radius() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (positions, colors) = core_cloud(1000, 90.0, &mut rng);
        assert_eq!(positions.len(), 1000);
        assert_eq!(colors.len(), 1000);
        assert!(positions.iter().all(|p| p.length() <= 90.0 + 1e-3));
        for [r, g, b] in colors {
            assert!(r >= g && g >= b, "core color not warm: {r} {g} {b}");
        }
    }

    #[test]
    fn test_group_carries_origin_and_yaw() {
        let mut scene = HeadlessScene::new();
        let field = field(3, 4, &mut scene);
        for cluster in field.clusters() {
            let group = scene.node(cluster.group_node()).unwrap();
            assert_eq!(group.transform.translation, cluster.origin);
            assert!((0.0..std::f32::consts::TAU).contains(&cluster.yaw));
        }
    }

    #[test]
    fn test_update_spins_core_and_moves_bodies() {
        let mut scene = HeadlessScene::new();
        let mut field = field(2, 5, &mut scene);
        for frame in 1..=10 {
            field.update(FrameTime::new(frame as f32 * 0.1, 0.1), &mut scene);
        }
        for cluster in field.clusters() {
            assert!((cluster.spin - 0.25).abs() < 1e-5);
            let core = scene.node(cluster.core_node()).unwrap();
            assert!(core.transform.rotation.abs_diff_eq(Quat::from_rotation_y(cluster.spin), 1e-6));
            for body in cluster.bodies() {
                let expected = orbit_position(body.distance, body.speed, 1.0);
                assert!((body.local_position - expected).length() < 1e-4);
                // Distance from the cluster origin is preserved by yaw and tilt.
                let world = scene.world_position(body.sprite_node()).unwrap();
                assert!((world.distance(cluster.origin) - body.distance).abs() < 0.05);
            }
        }
    }

    #[test]
    fn test_init_without_capabilities_is_a_no_op() {
        let mut stage = Stage::unavailable();
        let result = init_clusters(&mut stage, &light_config(2), ChaCha8Rng::seed_from_u64(6));
        assert!(matches!(result, Err(EffectError::EnvironmentUnavailable { .. })));
    }

    #[test]
    fn test_init_registers_one_effect_for_all_clusters() {
        let mut host = HeadlessStage::new();
        let mut stage = host.stage();
        init_clusters(&mut stage, &light_config(3), ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_eq!(host.effect_count(), 1);
        assert_eq!(host.driver().names(), vec![EFFECT_NAME]);
    }
}
