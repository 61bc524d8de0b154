//! Effect initialization errors.

/// Errors surfaced by effect initializers.
///
/// Per-frame updates cannot fail; only setup can find the host lacking.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    /// The host stage is missing a capability the effect needs.
    #[error("{effect}: stage is missing its {missing}")]
    EnvironmentUnavailable {
        effect: &'static str,
        missing: &'static str,
    },
}
