// src/simulation/sampler.rs

use rand::Rng;
use std::f64::consts::PI;

/// Normal distribution sampled with the Box-Muller transform.
///
/// The random source is supplied per draw, so callers decide between a
/// seeded `StdRng` (tests, reproducible runs) and `thread_rng()`.
#[derive(Debug, Clone, Copy)]
pub struct BoxMullerNormal {
    mean: f64,
    std_dev: f64,
}

impl BoxMullerNormal {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// One draw; uses the cosine branch only.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // gen() is in [0, 1); shift u1 into (0, 1] so ln() stays finite.
        let u1 = 1.0 - rng.gen::<f64>();
        let u2 = rng.gen::<f64>();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        self.mean + self.std_dev * z
    }

    /// One draw floored at zero. Demand cannot be negative.
    pub fn sample_demand<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.sample(rng).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn same_seed_same_draws() {
        let normal = BoxMullerNormal::new(100.0, 15.0);
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(normal.sample(&mut a), normal.sample(&mut b));
        }
    }

    #[test]
    fn moments_are_close_to_parameters() {
        let normal = BoxMullerNormal::new(50.0, 5.0);
        let mut rng = StdRng::seed_from_u64(42);
        let draws: Vec<f64> = (0..50_000).map(|_| normal.sample(&mut rng)).collect();
        let mean = stats::mean(&draws).unwrap();
        let sd = stats::std_dev(&draws).unwrap();
        assert!((mean - 50.0).abs() < 0.2, "mean was {mean}");
        assert!((sd - 5.0).abs() < 0.2, "std dev was {sd}");
    }

    #[test]
    fn demand_draws_are_never_negative() {
        let normal = BoxMullerNormal::new(1.0, 10.0);
        let mut rng = StdRng::seed_from_u64(3);
        assert!((0..10_000).all(|_| normal.sample_demand(&mut rng) >= 0.0));
    }

    #[test]
    fn zero_spread_returns_mean() {
        let normal = BoxMullerNormal::new(12.5, 0.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(normal.sample(&mut rng), 12.5);
    }
}
