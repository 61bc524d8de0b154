//! Ambient space effects: a pool of falling meteors with glowing streak tails
//! and a field of orbital clusters ("solar systems") scattered through space.
//!
//! Effects never reach for a global scene. A host hands them a [`Stage`]
//! holding a [`Scene`] and a [`TickRegistry`]; [`Bootstrap`] brings every
//! enabled family up once the host signals readiness. [`HeadlessStage`] is an
//! in-memory host for simulation and tests.

pub mod bootstrap;
pub mod cluster;
pub mod color;
pub mod error;
pub mod headless;
pub mod meteor;
pub mod sampling;
pub mod stage;
pub mod texture;

pub use bootstrap::{Bootstrap, BootstrapReport, DetachedHost, FamilyStatus};
pub use cluster::{Cluster, ClusterField, OrbitingBody, PlacementSampler, init_clusters};
pub use error::EffectError;
pub use headless::{HeadlessScene, HeadlessStage, TickDriver};
pub use meteor::{Meteor, MeteorPool, build_streak_quad, init_meteors};
pub use stage::{
    Blending, Effect, FrameTime, Material, NodeId, Scene, Stage, StageHost, TickRegistry,
    Transform, Visual,
};
pub use texture::SoftTexture;
