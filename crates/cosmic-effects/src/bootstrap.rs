//! One-shot startup: waits for the host to become ready, then brings up each
//! enabled effect family independently.

use cosmic_config::Config;
use rand_chacha::ChaCha8Rng;

use crate::cluster::init_clusters;
use crate::error::EffectError;
use crate::meteor::init_meteors;
use crate::sampling::entropy_rng;
use crate::stage::{Stage, StageHost};

/// Outcome of one effect family's initialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FamilyStatus {
    Started,
    Disabled,
    /// The host lacked a capability; carries the rendered error.
    Unavailable(String),
}

impl FamilyStatus {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

/// What the readiness handler did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapReport {
    pub meteors: FamilyStatus,
    pub clusters: FamilyStatus,
}

/// Initializes the effects at most once per instance.
pub struct Bootstrap {
    config: Config,
    rng_source: Box<dyn FnMut() -> ChaCha8Rng>,
    report: Option<BootstrapReport>,
}

impl Bootstrap {
    /// Effects draw their randomness from OS entropy.
    pub fn new(config: Config) -> Self {
        Self::with_rng_source(config, entropy_rng)
    }

    /// Each effect family gets its own generator from `rng_source`.
    pub fn with_rng_source(
        config: Config,
        rng_source: impl FnMut() -> ChaCha8Rng + 'static,
    ) -> Self {
        Self {
            config,
            rng_source: Box::new(rng_source),
            report: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.report.is_some()
    }

    pub fn report(&self) -> Option<&BootstrapReport> {
        self.report.as_ref()
    }

    /// Initialize right away when the host is already present; otherwise wait
    /// for [`Bootstrap::on_ready`].
    pub fn start(&mut self, host: Option<&mut dyn StageHost>) -> Option<&BootstrapReport> {
        match host {
            Some(host) => self.on_ready(host),
            None => {
                log::debug!("Stage host not ready; deferring effect startup");
                None
            }
        }
    }

    /// Host readiness event. Only the first call does anything; the report is
    /// returned on that call only.
    pub fn on_ready(&mut self, host: &mut dyn StageHost) -> Option<&BootstrapReport> {
        if self.report.is_some() {
            log::debug!("Effects already initialized; ignoring readiness event");
            return None;
        }

        let mut stage = host.stage();
        let meteors = if self.config.meteors.enabled {
            let rng = (self.rng_source)();
            family_status(init_meteors(&mut stage, &self.config.meteors, rng))
        } else {
            FamilyStatus::Disabled
        };
        let clusters = if self.config.clusters.enabled {
            let rng = (self.rng_source)();
            family_status(init_clusters(&mut stage, &self.config.clusters, rng))
        } else {
            FamilyStatus::Disabled
        };

        self.report = Some(BootstrapReport { meteors, clusters });
        self.report.as_ref()
    }
}

fn family_status(result: Result<(), EffectError>) -> FamilyStatus {
    match result {
        Ok(()) => FamilyStatus::Started,
        Err(err) => {
            log::warn!("Effect skipped: {err}");
            FamilyStatus::Unavailable(err.to_string())
        }
    }
}

/// Host with no scene and no tick registry, as seen outside a render context.
#[derive(Default)]
pub struct DetachedHost;

impl StageHost for DetachedHost {
    fn stage(&mut self) -> Stage<'_> {
        Stage::unavailable()
    }
}
