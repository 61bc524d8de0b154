//! End-to-end runs of the effects against the headless host.

use cosmic_config::{Config, MeteorConfig};
use cosmic_effects::cluster::ORBIT_TEMPLATE;
use cosmic_effects::{
    Bootstrap, FamilyStatus, HeadlessScene, HeadlessStage, MeteorPool, SoftTexture,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn three_meteors(scene: &mut HeadlessScene) -> MeteorPool {
    let config = MeteorConfig {
        count: 3,
        ..MeteorConfig::default()
    };
    MeteorPool::new(
        &config,
        SoftTexture::shared(config.texture_size),
        ChaCha8Rng::seed_from_u64(2024),
        scene,
    )
}

#[test]
fn three_meteors_fall_and_fade_over_ten_frames() {
    let mut scene = HeadlessScene::new();
    let mut pool = three_meteors(&mut scene);
    let start: Vec<_> = pool.meteors().iter().map(|m| m.position).collect();

    for _ in 0..10 {
        pool.update(0.1, &mut scene);
        assert_eq!(pool.len(), 3);
        for (index, meteor) in pool.meteors().iter().enumerate() {
            let fade = pool.fade_factor(index).unwrap();
            assert!((0.0..=1.0).contains(&fade));
            let sprite = scene.node(meteor.sprite_node()).unwrap();
            assert!((0.0..=1.0).contains(&sprite.opacity().unwrap()));
            let tail = scene.node(meteor.tail_node()).unwrap();
            assert!(tail.quad_corners().unwrap().iter().all(|c| c.is_finite()));
        }
    }

    // Shortest lifetime is 2.4 s, so nothing has been recycled after 1 s.
    assert_eq!(pool.respawn_count(), 0);
    for (meteor, before) in pool.meteors().iter().zip(&start) {
        assert_ne!(meteor.position, *before);
        assert!(meteor.position.y < before.y);
        assert!((meteor.lifetime - 1.0).abs() < 1e-4);
        let sprite = scene.node(meteor.sprite_node()).unwrap();
        assert_eq!(sprite.transform.translation, meteor.position);
    }
}

#[test]
fn forced_expiry_recycles_only_that_meteor() {
    let mut scene = HeadlessScene::new();
    let mut pool = three_meteors(&mut scene);
    let nodes = scene.node_count();

    let forced = pool.meteor_mut(1).unwrap();
    forced.lifetime = forced.max_lifetime;
    let untouched_lifetime = pool.meteor(0).unwrap().lifetime;

    pool.update(0.1, &mut scene);

    assert_eq!(pool.respawn_count(), 1);
    assert_eq!(pool.meteor(1).unwrap().lifetime, 0.0);
    assert!((pool.meteor(0).unwrap().lifetime - untouched_lifetime - 0.1).abs() < 1e-6);
    assert_eq!(scene.node_count(), nodes);
}

#[test]
fn bootstrap_drives_both_families_through_the_stage() {
    let mut config = Config::default();
    config.meteors.count = 3;
    config.clusters.count = 2;
    config.clusters.core_particles = 64;
    config.clusters.orbit_segments = 32;

    let mut seed = 40;
    let mut bootstrap = Bootstrap::with_rng_source(config, move || {
        seed += 1;
        ChaCha8Rng::seed_from_u64(seed)
    });
    let mut host = HeadlessStage::new();
    assert!(bootstrap.start(None).is_none());

    let report = bootstrap.on_ready(&mut host).cloned().unwrap();
    assert_eq!(report.meteors, FamilyStatus::Started);
    assert_eq!(report.clusters, FamilyStatus::Started);

    // Meteors: group + sprite and tail each. Clusters: group + core, then
    // pivot, ring, body and sprite per orbit.
    let expected_nodes = (1 + 3 * 2) + 2 * (2 + ORBIT_TEMPLATE.len() * 4);
    assert_eq!(host.node_count(), expected_nodes);

    for _ in 0..30 {
        host.step(1.0 / 60.0);
    }
    assert_eq!(host.frame_count(), 30);
    assert!((host.elapsed() - 0.5).abs() < 1e-4);
    assert_eq!(host.node_count(), expected_nodes);
    assert!(bootstrap.on_ready(&mut host).is_none());
}
