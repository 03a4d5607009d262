//! A tool to generate and clamp noise.

use rand_distr::{Normal, Distribution};


/// Calculates the normal distribution at the given mean and standard deviation and clamps
/// the output value between the given minimum and maximum, if standard deviation is `0.` the
/// mean is always returned
pub fn limited_distr(mean: f32, std: f32, minimum: f32, maximum: f32) -> f32 {
    if std == 0.0 {
        return mean;
    }

    let normal = match Normal::new(mean, std) {
        Ok(normal_value) => normal_value,
        Err(_e) => return mean, // nonfinite std falls back to the mean
    };
    let output: f32 = normal.sample(&mut rand::thread_rng());

    output.max(minimum).min(maximum)
}

/// Parameters used in generating noise to perturb a voltage series
#[derive(Debug, Clone, Copy)]
pub struct GaussianParameters {
    /// Mean of the distribution
    pub mean: f32,
    /// Standard deviation of the distribution
    pub std: f32,
    /// Maximum cutoff value
    pub max: f32,
    /// Minimum cutoff value
    pub min: f32,
}

impl Default for GaussianParameters {
    fn default() -> Self {
        GaussianParameters {
            mean: 1.0,
            std: 0.0,
            max: 2.0,
            min: 0.0,
        }
    }
}

impl GaussianParameters {
    /// Samples a multiplicative noise factor from the parameterized distribution
    pub fn get_factor(&self) -> f32 {
        limited_distr(self.mean, self.std, self.min, self.max)
    }
}
