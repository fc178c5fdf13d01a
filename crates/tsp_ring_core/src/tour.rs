use crate::node::Point;

/// One stop of an extracted route: the original input index of the city and
/// its coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TourStop {
    pub index: usize,
    pub point: Point,
}

/// A closed route over every input city, in ring order.
#[derive(Debug, Default)]
pub struct Tour {
    pub stops: Vec<TourStop>,
}

impl Tour {
    pub fn new(stops: Vec<TourStop>) -> Self {
        Self { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Closed-cycle edge metrics; edges longer than `threshold_factor`
    /// times the average count as spikes.
    pub fn tour_metrics(&self, threshold_factor: f64) -> TourMetrics {
        let n = self.len();

        if n < 2 {
            log::info!("metrics: n < 2 so there's nothing to report");
            return TourMetrics::default();
        }

        let distances: Vec<f64> = (0..n)
            .map(|i| self.stops[i].point.dist(&self.stops[(i + 1) % n].point))
            .collect();
        let total: f64 = distances.iter().sum();
        let average = total / (n as f64);
        let threshold = average * threshold_factor;
        let spikes = distances.iter().filter(|d| **d > threshold).count();
        let longest = distances.iter().copied().fold(0.0_f64, f64::max);

        log::info!(
            "metrics: n={n} total={total:.4} longest={longest:.4} avg={average:.4} spike_threshold={threshold:.4} spikes={spikes}",
        );

        TourMetrics {
            longest,
            spikes,
            total,
            average,
            threshold,
        }
    }
}

#[derive(Debug, Default)]
pub struct TourMetrics {
    pub longest: f64,
    pub spikes: usize,
    pub total: f64,
    pub average: f64,
    pub threshold: f64,
}
