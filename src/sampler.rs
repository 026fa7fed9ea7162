//! trace sampling decisions.
use rand::Rng;

/// decides, once per trace root, whether the whole trace is recorded.
/// children never draw again; they inherit the root's decision.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sampler {
    fraction: f64,
}

impl Sampler {
    pub(crate) fn new(fraction: f64) -> Self {
        Sampler { fraction }
    }

    /// one uniform draw in [0, 1) against the fraction.
    /// the endpoints skip the rng so 1.0 always samples and 0.0 never
    /// does, whatever the draw. safe to call from any thread.
    pub(crate) fn should_sample(&self) -> bool {
        if self.fraction >= 1.0 {
            return true;
        }
        if self.fraction <= 0.0 {
            return false;
        }
        rand::thread_rng().gen::<f64>() < self.fraction
    }
}
