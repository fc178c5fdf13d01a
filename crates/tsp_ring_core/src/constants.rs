pub(crate) const DEFAULT_MAX_CYCLES: u32 = 1_000;
pub(crate) const DEFAULT_LEARNING_RATE: f64 = 0.05;
pub(crate) const DEFAULT_GAIN: f64 = 50.0;
pub(crate) const DEFAULT_UPDATE_INTERVAL: u32 = 5;
pub(crate) const DEFAULT_POINT_SEED: u64 = 12_345;

/// Survival counter granted to fresh neurons and re-armed winners.
pub(crate) const INITIAL_LIFE: u8 = 3;

/// Squared-distance threshold for matching a settled neuron back to the
/// city it covers.
pub(crate) const MATCH_EPSILON: f64 = 1e-12;
