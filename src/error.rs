//! construction errors.
use thiserror::Error;

/// invalid tracer configuration.
///
/// construction is the one place this crate fails loudly: bad values are
/// rejected, never clamped. everything after construction is fail-safe.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sampling fraction {0} is outside [0, 1]")]
    Fraction(f64),
    #[error("span store capacity must be positive")]
    Capacity,
}
