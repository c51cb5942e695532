use super::DataError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyDistribution {
    /// Uniform over the whole key space.
    Linear,
    /// Normal around the middle of the key space, std dev of 1/15 of it.
    Gaussian,
}

impl KeyDistribution {
    pub const ALL: [KeyDistribution; 2] = [KeyDistribution::Linear, KeyDistribution::Gaussian];

    pub fn label(&self) -> &'static str {
        match self {
            KeyDistribution::Linear => "LinearRandom",
            KeyDistribution::Gaussian => "GaussianRandom",
        }
    }
}

impl fmt::Display for KeyDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDistribution::Linear => f.write_str("linear"),
            KeyDistribution::Gaussian => f.write_str("gaussian"),
        }
    }
}

/// Draws keys in `[0, db_size)` following a [`KeyDistribution`].
pub struct KeyGenerator {
    distribution: KeyDistribution,
    db_size: u32,
    normal: Normal<f64>,
    rng: StdRng,
}

impl KeyGenerator {
    pub fn new(distribution: KeyDistribution, db_size: u32, seed: u64) -> Result<Self, DataError> {
        if db_size == 0 {
            return Err(DataError::EmptyDataSet);
        }
        let size = f64::from(db_size);
        let normal = Normal::new(size / 2.0, size / 15.0).map_err(|_| DataError::EmptyDataSet)?;

        Ok(Self {
            distribution,
            db_size,
            normal,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn distribution(&self) -> KeyDistribution {
        self.distribution
    }

    pub fn next_key(&mut self) -> u32 {
        match self.distribution {
            KeyDistribution::Linear => self.rng.gen_range(0..self.db_size),
            KeyDistribution::Gaussian => {
                let sample = self.normal.sample(&mut self.rng).round();
                // 超出範圍的樣本貼齊邊界
                sample.clamp(0.0, f64::from(self.db_size - 1)) as u32
            }
        }
    }
}

impl Iterator for KeyGenerator {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        Some(self.next_key())
    }
}
