//! Meteor pool: a fixed arena of falling streaks that fade out and respawn in
//! place.
//!
//! Every meteor owns a glow sprite at its head and a quad trailing behind it.
//! The quad geometry is rebuilt from position, velocity and fade each frame.
//! Records are allocated once; expiry resets a record instead of freeing it.

use std::sync::Arc;

use cosmic_config::MeteorConfig;
use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::color::hsl_to_rgb;
use crate::error::EffectError;
use crate::sampling::{between, spread};
use crate::stage::{Effect, FrameTime, Material, NodeId, Scene, Stage, Transform, Visual};
use crate::texture::SoftTexture;

pub mod streak;

pub use streak::{STREAK_INDICES, build_streak_quad};

const EFFECT_NAME: &str = "meteors";

/// Hue bases for meteor colors: warm reds/oranges/yellows and cool blues.
const HUE_BASES: [f32; 5] = [0.02, 0.07, 0.12, 0.58, 0.65];

/// Spawn heights lie in `[SPAWN_HEIGHT, 2 * SPAWN_HEIGHT)`.
const SPAWN_HEIGHT: f32 = 160.0;
/// Horizontal spawn spread as a multiple of the spawn bounds.
const SPAWN_SPREAD: f32 = 1.4;
/// Recycle distance from the origin as a multiple of the spawn bounds.
const ESCAPE_FACTOR: f32 = 2.2;

/// One pooled meteor.
#[derive(Clone, Debug)]
pub struct Meteor {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds since the last (re)spawn.
    pub lifetime: f32,
    /// Lifetime at which the meteor is recycled.
    pub max_lifetime: f32,
    pub tail_length: f32,
    /// Half-width of the streak at its head.
    pub tail_width: f32,
    pub color: [f32; 3],
    pub sprite_scale: f32,
    pub sprite_base_opacity: f32,
    pub tail_base_opacity: f32,
    sprite: NodeId,
    tail: NodeId,
}

impl Meteor {
    fn unspawned(sprite: NodeId, tail: NodeId) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            lifetime: 0.0,
            max_lifetime: 4.0,
            tail_length: 30.0,
            tail_width: 1.0,
            color: [1.0, 1.0, 1.0],
            sprite_scale: 1.0,
            sprite_base_opacity: 0.8,
            tail_base_opacity: 0.8,
            sprite,
            tail,
        }
    }

    /// Remaining-life fraction in `[0, 1]`: 1 at spawn, 0 at expiry.
    pub fn fade_factor(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            return 0.0;
        }
        (1.0 - self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
    }

    pub fn sprite_opacity(&self) -> f32 {
        ((0.35 + self.fade_factor() * 0.5) * self.sprite_base_opacity).clamp(0.0, 1.0)
    }

    pub fn tail_opacity(&self) -> f32 {
        ((0.2 + self.fade_factor() * 0.5) * self.tail_base_opacity).clamp(0.0, 1.0)
    }

    /// Current streak corners; see [`build_streak_quad`].
    pub fn streak(&self, fade: f32) -> [Vec3; 4] {
        build_streak_quad(
            self.position,
            self.velocity,
            self.tail_width,
            self.tail_length,
            fade,
        )
    }

    pub fn sprite_node(&self) -> NodeId {
        self.sprite
    }

    pub fn tail_node(&self) -> NodeId {
        self.tail
    }
}

/// Fixed-size pool of meteors driven once per frame.
pub struct MeteorPool {
    config: MeteorConfig,
    rng: ChaCha8Rng,
    group: NodeId,
    meteors: Vec<Meteor>,
    respawns: u64,
}

impl MeteorPool {
    /// Allocate `config.count` meteors under a new group node and spawn each.
    pub fn new(
        config: &MeteorConfig,
        texture: Arc<SoftTexture>,
        rng: ChaCha8Rng,
        scene: &mut dyn Scene,
    ) -> Self {
        let group = scene.add(
            None,
            Visual::Group {
                transform: Transform::IDENTITY,
            },
        );

        let mut meteors = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            let sprite = scene.add(
                Some(group),
                Visual::Sprite {
                    position: Vec3::ZERO,
                    scale: 1.0,
                    material: Material::glow([1.0, 1.0, 1.0], 0.85, Some(Arc::clone(&texture))),
                },
            );
            let tail = scene.add(
                Some(group),
                Visual::Quad {
                    corners: [Vec3::ZERO; 4],
                    indices: STREAK_INDICES,
                    material: Material {
                        double_sided: true,
                        ..Material::glow([1.0, 1.0, 1.0], 0.8, None)
                    },
                },
            );
            meteors.push(Meteor::unspawned(sprite, tail));
        }

        let mut pool = Self {
            config: config.clone(),
            rng,
            group,
            meteors,
            respawns: 0,
        };
        for index in 0..pool.meteors.len() {
            pool.spawn(index, scene);
        }
        pool
    }

    /// Number of pooled meteors. Constant for the pool's lifetime.
    pub fn len(&self) -> usize {
        self.meteors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meteors.is_empty()
    }

    pub fn group(&self) -> NodeId {
        self.group
    }

    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    pub fn meteor(&self, index: usize) -> Option<&Meteor> {
        self.meteors.get(index)
    }

    /// Direct access for hosts and tests that need to force a state.
    pub fn meteor_mut(&mut self, index: usize) -> Option<&mut Meteor> {
        self.meteors.get_mut(index)
    }

    /// Fade factor of the meteor at `index`; see [`Meteor::fade_factor`].
    pub fn fade_factor(&self, index: usize) -> Option<f32> {
        self.meteors.get(index).map(Meteor::fade_factor)
    }

    /// Number of recycles since construction (initial spawns excluded).
    pub fn respawn_count(&self) -> u64 {
        self.respawns
    }

    /// Respawn the meteor at `index` in place. Out-of-range indices are ignored.
    pub fn reset(&mut self, index: usize, scene: &mut dyn Scene) {
        if index < self.meteors.len() {
            self.spawn(index, scene);
            self.respawns += 1;
        }
    }

    /// Advance every meteor by `delta` seconds and recycle the expired ones.
    pub fn update(&mut self, delta: f32, scene: &mut dyn Scene) {
        let escape_distance = self.config.spawn_bounds * ESCAPE_FACTOR;

        for index in 0..self.meteors.len() {
            let meteor = &mut self.meteors[index];
            meteor.lifetime += delta;
            meteor.position += meteor.velocity * delta;
            scene.set_position(meteor.sprite, meteor.position);

            let fade = meteor.fade_factor();
            scene.set_quad(meteor.tail, meteor.streak(fade));
            scene.set_opacity(meteor.sprite, meteor.sprite_opacity());
            scene.set_opacity(meteor.tail, meteor.tail_opacity());

            let expired = meteor.lifetime >= meteor.max_lifetime
                || meteor.position.y < self.config.despawn_y
                || meteor.position.length() > escape_distance;
            if expired {
                self.reset(index, scene);
            }
        }
    }

    fn spawn(&mut self, index: usize, scene: &mut dyn Scene) {
        let config = &self.config;
        let rng = &mut self.rng;
        let meteor = &mut self.meteors[index];

        let spawn_range = config.spawn_bounds * SPAWN_SPREAD;
        meteor.position = Vec3::new(
            spread(rng, spawn_range),
            between(rng, SPAWN_HEIGHT, SPAWN_HEIGHT * 2.0),
            spread(rng, spawn_range),
        );
        meteor.velocity =
            random_direction(rng) * between(rng, config.min_speed, config.max_speed);
        meteor.lifetime = 0.0;
        meteor.max_lifetime = between(rng, config.min_lifetime, config.max_lifetime);
        meteor.tail_length = between(rng, 45.0, 185.0) * 2.4;
        meteor.tail_width = between(rng, 0.8, 2.4) * meteor.tail_length * 0.01;
        meteor.color = random_color(rng);
        meteor.sprite_scale = between(rng, 3.0, 8.0) * 1.5;
        meteor.sprite_base_opacity = between(rng, 0.65, 0.9);
        meteor.tail_base_opacity = between(rng, 0.5, 0.85);

        scene.set_scale(meteor.sprite, meteor.sprite_scale);
        scene.set_color(meteor.sprite, meteor.color);
        scene.set_opacity(meteor.sprite, meteor.sprite_base_opacity);
        scene.set_position(meteor.sprite, meteor.position);
        scene.set_color(meteor.tail, meteor.color);
        scene.set_opacity(meteor.tail, meteor.tail_base_opacity);
        scene.set_quad(meteor.tail, meteor.streak(1.0));
    }
}

impl Effect for MeteorPool {
    fn name(&self) -> &'static str {
        EFFECT_NAME
    }

    fn update(&mut self, time: FrameTime, scene: &mut dyn Scene) {
        MeteorPool::update(self, time.delta, scene);
    }
}

/// Downward-biased unit direction.
fn random_direction(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(spread(rng, 2.0), between(rng, -2.0, -0.4), spread(rng, 2.0)).normalize()
}

fn random_color(rng: &mut impl Rng) -> [f32; 3] {
    let base = HUE_BASES[rng.random_range(0..HUE_BASES.len())];
    let hue = (base + rng.random::<f32>() * 0.05).rem_euclid(1.0);
    let saturation = between(rng, 0.45, 0.9);
    let lightness = between(rng, 0.5, 0.85);
    hsl_to_rgb(hue, saturation, lightness)
}

/// Create the meteor pool on the stage and register it with the tick driver.
///
/// Nothing is created when the stage lacks a scene or tick registry.
pub fn init_meteors(
    stage: &mut Stage<'_>,
    config: &MeteorConfig,
    rng: ChaCha8Rng,
) -> Result<(), EffectError> {
    let (scene, ticks) = stage.require(EFFECT_NAME)?;
    let texture = SoftTexture::shared(config.texture_size);
    let pool = MeteorPool::new(config, texture, rng, scene);
    log::info!("Meteor pool ready with {} meteors", pool.len());
    ticks.register_tick(Box::new(pool));
    Ok(())
}
