//! Lasso region sampling
//!
//! Draws candidates inside the polygon's bounding box with a center-biased
//! distribution and keeps those that pass the parity test. The number of
//! attempts is capped, so a pathologically thin polygon returns fewer points
//! instead of spinning.

use rand::Rng;

use crate::core::config::SamplingConfig;
use crate::geometry::{NormalizedPoint, Polygon};

use super::jitter::centered_pair;

/// Result of one sampling run
#[derive(Debug, Clone, PartialEq)]
pub struct SampleOutcome {
    /// Accepted points, all inside the polygon
    pub points: Vec<NormalizedPoint>,
    /// Number of points asked for
    pub requested: usize,
    /// Candidates drawn before stopping
    pub attempts: usize,
}

impl SampleOutcome {
    /// Whether the attempt budget ran out before reaching the target
    pub fn is_exhausted(&self) -> bool {
        self.points.len() < self.requested
    }
}

/// Region sampler bound to a sampling configuration
#[derive(Debug, Clone, Default)]
pub struct RegionSampler {
    config: SamplingConfig,
}

impl RegionSampler {
    /// Create a sampler
    pub fn new(config: SamplingConfig) -> Self {
        Self { config }
    }

    /// Sample up to `target_count` points with the configured attempt budget
    pub fn sample<R: Rng + ?Sized>(
        &self,
        polygon: &Polygon,
        target_count: usize,
        rng: &mut R,
    ) -> SampleOutcome {
        self.sample_with_budget(polygon, target_count, self.config.attempt_multiplier, rng)
    }

    /// Sample with an explicit attempts-per-point multiplier
    pub fn sample_with_budget<R: Rng + ?Sized>(
        &self,
        polygon: &Polygon,
        target_count: usize,
        max_attempt_multiplier: usize,
        rng: &mut R,
    ) -> SampleOutcome {
        let bounds = polygon.bounding_box();
        let max_attempts = target_count.saturating_mul(max_attempt_multiplier);
        let mut points = Vec::with_capacity(target_count);
        let mut attempts = 0;

        while points.len() < target_count && attempts < max_attempts {
            attempts += 1;
            let (fx, fy) = centered_pair(rng, &self.config);
            let candidate = bounds.point_at(fx, fy);
            if polygon.contains(candidate) {
                points.push(candidate);
            }
        }

        let outcome = SampleOutcome {
            points,
            requested: target_count,
            attempts,
        };
        if outcome.is_exhausted() {
            log::debug!(
                "Region sampling exhausted {} attempts: placed {} of {}",
                outcome.attempts,
                outcome.points.len(),
                target_count
            );
        }
        outcome
    }
}

/// Sample a polygon with default sampling parameters
pub fn sample<R: Rng + ?Sized>(
    polygon: &Polygon,
    target_count: usize,
    max_attempt_multiplier: usize,
    rng: &mut R,
) -> Vec<NormalizedPoint> {
    RegionSampler::default()
        .sample_with_budget(polygon, target_count, max_attempt_multiplier, rng)
        .points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pentagon() -> Polygon {
        Polygon::new(vec![
            NormalizedPoint::new(0.50, 0.10),
            NormalizedPoint::new(0.90, 0.40),
            NormalizedPoint::new(0.75, 0.90),
            NormalizedPoint::new(0.25, 0.90),
            NormalizedPoint::new(0.10, 0.40),
        ])
        .unwrap()
    }

    #[test]
    fn test_reaches_target_inside_polygon() {
        let polygon = pentagon();
        assert!(polygon.fill_ratio() >= 0.05);

        let mut rng = StdRng::seed_from_u64(42);
        let outcome = RegionSampler::default().sample(&polygon, 50, &mut rng);

        assert_eq!(outcome.points.len(), 50);
        assert!(outcome.attempts <= 50 * 20);
        assert!(!outcome.is_exhausted());
        assert!(outcome.points.iter().all(|p| polygon.contains(*p)));
    }

    #[test]
    fn test_points_stay_within_bounding_box() {
        let polygon = Polygon::rectangle(NormalizedPoint::new(0.2, 0.3), NormalizedPoint::new(0.6, 0.5));
        let mut rng = StdRng::seed_from_u64(9);
        let points = sample(&polygon, 200, 20, &mut rng);

        assert_eq!(points.len(), 200);
        for p in points {
            assert!(p.x >= 0.2 && p.x <= 0.6);
            assert!(p.y >= 0.3 && p.y <= 0.5);
        }
    }

    #[test]
    fn test_sliver_is_bounded() {
        // Collinear vertices: zero area, nothing is ever inside
        let sliver = Polygon::new(vec![
            NormalizedPoint::new(0.1, 0.1),
            NormalizedPoint::new(0.5, 0.5),
            NormalizedPoint::new(0.9, 0.9),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = RegionSampler::default().sample(&sliver, 50, &mut rng);

        assert!(outcome.points.len() < 50);
        assert!(outcome.is_exhausted());
        assert_eq!(outcome.attempts, 50 * 20);
    }

    #[test]
    fn test_thin_diagonal_returns_fewer() {
        let sliver = Polygon::new(vec![
            NormalizedPoint::new(0.1, 0.1),
            NormalizedPoint::new(0.9, 0.9),
            NormalizedPoint::new(0.9, 0.9005),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = RegionSampler::default().sample(&sliver, 50, &mut rng);

        assert!(outcome.points.len() < 50);
        assert!(outcome.attempts <= 1000);
    }

    #[test]
    fn test_zero_target_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        let outcome = RegionSampler::default().sample(&pentagon(), 0, &mut rng);
        assert!(outcome.points.is_empty());
        assert_eq!(outcome.attempts, 0);
    }
}
