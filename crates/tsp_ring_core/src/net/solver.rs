use crate::constants::{
    DEFAULT_GAIN, DEFAULT_LEARNING_RATE, DEFAULT_MAX_CYCLES, DEFAULT_UPDATE_INTERVAL,
    MATCH_EPSILON,
};
use crate::error::{Error, Result};
use crate::node::{Point, centroid};
use crate::tour::{Tour, TourStop};

use super::ring::Ring;
use super::survey;

const ERR_NO_POINTS: &str = "at least one point is required";
const ERR_INVALID_POINT: &str = "input contains non-finite coordinates";
const ERR_GAIN: &str = "gain must be a positive finite number";
const ERR_LEARNING_RATE: &str = "learning-rate must be in (0, 1)";
const ERR_UPDATE_INTERVAL: &str = "update-interval must be >= 1";
const ERR_NOT_RUNNABLE: &str = "solver is not initialized";

/// Lifecycle of one solving run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverPhase {
    Idle,
    Initialized,
    Running,
    Converged,
    Stopped,
}

/// Engine parameters for one solving run.
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    /// Hard cycle ceiling; the run forced-stops here even without
    /// convergence.
    pub max_cycles: u32,
    /// Multiplicative gain decay per cycle (`alpha`).
    pub learning_rate: f64,
    /// Initial spread of the relaxation kernel; large gain moves many
    /// neurons per point, small gain only nearby ones.
    pub gain: f64,
    /// Cycles between convergence checks and progress callbacks.
    pub update_interval: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
            learning_rate: DEFAULT_LEARNING_RATE,
            gain: DEFAULT_GAIN,
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }
}

/// Callbacks invoked synchronously by the solver, never concurrently.
pub trait SolverObserver {
    /// After each `update_interval`-th cycle and once on `stop()`.
    /// `tour_length` is `None` while the ring is empty (stalled run).
    fn on_progress(&mut self, _cycle: u32, _tour_length: Option<f64>, _ring: &[Point]) {}

    /// Exactly once per run, on convergence or the forced `max_cycles`
    /// stop. `None` means no 1:1 neuron-to-city matching was reached.
    fn on_finished(&mut self, _tour: Option<&Tour>) {}
}

/// Observer that ignores every callback.
pub struct NullObserver;

impl SolverObserver for NullObserver {}

/// The solving state machine: owns the point set and the ring, runs survey
/// cycles, decays the gain, and watches the measured tour length for
/// stabilization.
///
/// Single-threaded by design; one scheduler at a time may drive `step()`.
pub struct Solver {
    config: SolverConfig,
    points: Vec<Point>,
    ring: Ring,
    cycle: u32,
    current_gain: f64,
    last_tour_length: Option<f64>,
    phase: SolverPhase,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            current_gain: config.gain,
            config,
            points: Vec::new(),
            ring: Ring::empty(),
            cycle: 0,
            last_tour_length: None,
            phase: SolverPhase::Idle,
        }
    }

    /// Starts a fresh run: validates input and config, then seeds a
    /// single-neuron ring at the point centroid. On error no prior state is
    /// disturbed and the phase is left as it was.
    pub fn init(&mut self, points: Vec<Point>) -> Result<()> {
        if points.is_empty() {
            return Err(Error::invalid_input(ERR_NO_POINTS));
        }
        if points.iter().any(|p| !p.is_valid()) {
            return Err(Error::invalid_input(ERR_INVALID_POINT));
        }
        if !self.config.gain.is_finite() || self.config.gain <= 0.0 {
            return Err(Error::invalid_input(ERR_GAIN));
        }
        let alpha = self.config.learning_rate;
        if !alpha.is_finite() || alpha <= 0.0 || alpha >= 1.0 {
            return Err(Error::invalid_input(ERR_LEARNING_RATE));
        }
        if self.config.update_interval == 0 {
            return Err(Error::invalid_input(ERR_UPDATE_INTERVAL));
        }

        self.ring = Ring::new(centroid(&points));
        self.points = points;
        self.cycle = 0;
        self.current_gain = self.config.gain;
        self.last_tour_length = None;
        self.phase = SolverPhase::Initialized;

        log::debug!(
            "solver: init n={} gain={} learning_rate={} max_cycles={}",
            self.points.len(),
            self.config.gain,
            self.config.learning_rate,
            self.config.max_cycles
        );
        Ok(())
    }

    pub fn phase(&self) -> SolverPhase {
        self.phase
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn current_gain(&self) -> f64 {
        self.current_gain
    }

    pub fn last_tour_length(&self) -> Option<f64> {
        self.last_tour_length
    }

    pub fn ring_len(&self) -> u32 {
        self.ring.len()
    }

    pub fn ring_positions(&self) -> Vec<Point> {
        self.ring.positions()
    }

    /// Runs exactly one survey cycle. Every `update_interval` cycles the
    /// tour length is measured; a measurement bit-identical to the previous
    /// one signals convergence, and `cycle >= max_cycles` forces it. Once
    /// `Converged`, further calls are no-ops reporting `Converged`.
    pub fn step(&mut self, observer: &mut dyn SolverObserver) -> Result<SolverPhase> {
        match self.phase {
            SolverPhase::Converged => return Ok(SolverPhase::Converged),
            SolverPhase::Idle | SolverPhase::Stopped => {
                return Err(Error::invalid_input(ERR_NOT_RUNNABLE));
            }
            SolverPhase::Initialized | SolverPhase::Running => {}
        }
        self.phase = SolverPhase::Running;

        survey::run_cycle(&mut self.ring, &self.points, self.current_gain);
        self.current_gain *= 1.0 - self.config.learning_rate;

        let mut converged = false;
        if self.cycle % self.config.update_interval == 0 {
            let measured = (!self.ring.is_empty()).then(|| self.ring.tour_length());
            match measured {
                Some(length) if self.last_tour_length == Some(length) => converged = true,
                Some(length) => self.last_tour_length = Some(length),
                // Stalled run: nothing to measure, nothing to converge on.
                None => {}
            }
            let snapshot = self.ring.positions();
            observer.on_progress(self.cycle + 1, measured, &snapshot);
        }
        self.cycle += 1;

        if converged || self.cycle >= self.config.max_cycles {
            self.phase = SolverPhase::Converged;
            let tour = self.extract_tour();
            log::info!(
                "solver: complete cycles={} neurons={} solved={}",
                self.cycle,
                self.ring.len(),
                tour.is_some()
            );
            observer.on_finished(tour.as_ref());
        }
        Ok(self.phase)
    }

    /// Blocking loop of `step()` until the run converges (or forced-stops
    /// at `max_cycles`, which reports as `Converged` too).
    pub fn run_to_completion(&mut self, observer: &mut dyn SolverObserver) -> Result<SolverPhase> {
        log::info!(
            "solver: start n={} max_cycles={} gain={} learning_rate={}",
            self.points.len(),
            self.config.max_cycles,
            self.config.gain,
            self.config.learning_rate
        );
        loop {
            if self.step(observer)? == SolverPhase::Converged {
                return Ok(SolverPhase::Converged);
            }
        }
    }

    /// Forces the run into `Stopped`: emits one final progress callback
    /// with the ring still intact, then clears it.
    pub fn stop(&mut self, observer: &mut dyn SolverObserver) {
        self.phase = SolverPhase::Stopped;
        let snapshot = self.ring.positions();
        observer.on_progress(self.cycle, self.last_tour_length, &snapshot);
        self.ring.clear();
        log::debug!("solver: stopped at cycle={}", self.cycle);
    }

    /// The solved route, valid only once the ring holds exactly one neuron
    /// per city and every neuron has settled onto one. `None` otherwise.
    pub fn extract_tour(&self) -> Option<Tour> {
        if self.points.is_empty() || self.ring.len() as usize != self.points.len() {
            return None;
        }
        let mut stops = Vec::with_capacity(self.points.len());
        for id in self.ring.ids() {
            stops.push(self.find_point(self.ring.node(id).position())?);
        }
        Some(Tour::new(stops))
    }

    fn find_point(&self, position: Point) -> Option<TourStop> {
        self.points
            .iter()
            .enumerate()
            .find(|(_, p)| p.squared_dist(&position) <= MATCH_EPSILON)
            .map(|(index, p)| TourStop { index, point: *p })
    }
}

#[cfg(test)]
mod tests {
    use super::{NullObserver, Solver, SolverConfig, SolverObserver, SolverPhase};
    use crate::node::Point;
    use crate::tour::Tour;

    #[derive(Default)]
    struct Recording {
        progress: Vec<(u32, Option<f64>)>,
        finished: Vec<bool>,
        last_tour: Option<Vec<usize>>,
    }

    impl SolverObserver for Recording {
        fn on_progress(&mut self, cycle: u32, tour_length: Option<f64>, _ring: &[Point]) {
            self.progress.push((cycle, tour_length));
        }

        fn on_finished(&mut self, tour: Option<&Tour>) {
            self.finished.push(tour.is_some());
            self.last_tour = tour.map(|t| t.stops.iter().map(|s| s.index).collect());
        }
    }

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn init_rejects_an_empty_point_collection() {
        let mut solver = Solver::new(SolverConfig::default());
        let err = solver.init(Vec::new()).expect_err("empty input should fail");
        assert!(err.to_string().contains("at least one point"));
        assert_eq!(solver.phase(), SolverPhase::Idle);
    }

    #[test]
    fn init_rejects_non_finite_coordinates() {
        let mut solver = Solver::new(SolverConfig::default());
        let err = solver
            .init(vec![Point::new(f64::NAN, 0.0)])
            .expect_err("non-finite input should fail");
        assert!(err.to_string().contains("non-finite"));
        assert_eq!(solver.phase(), SolverPhase::Idle);
    }

    #[test]
    fn init_rejects_non_positive_gain() {
        let mut solver = Solver::new(SolverConfig {
            gain: 0.0,
            ..SolverConfig::default()
        });
        let err = solver.init(unit_square()).expect_err("zero gain should fail");
        assert!(err.to_string().contains("gain"));
    }

    #[test]
    fn init_rejects_learning_rate_outside_the_open_unit_interval() {
        for learning_rate in [0.0, 1.0, -0.5, 1.5] {
            let mut solver = Solver::new(SolverConfig {
                learning_rate,
                ..SolverConfig::default()
            });
            solver
                .init(unit_square())
                .expect_err("out-of-range learning rate should fail");
        }
    }

    #[test]
    fn init_rejects_zero_update_interval() {
        let mut solver = Solver::new(SolverConfig {
            update_interval: 0,
            ..SolverConfig::default()
        });
        let err = solver
            .init(unit_square())
            .expect_err("zero interval should fail");
        assert!(err.to_string().contains("update-interval"));
    }

    #[test]
    fn init_seeds_a_single_neuron_at_the_centroid() {
        let mut solver = Solver::new(SolverConfig::default());
        solver.init(unit_square()).expect("init");

        assert_eq!(solver.phase(), SolverPhase::Initialized);
        assert_eq!(solver.ring_len(), 1);
        let seed = solver.ring_positions()[0];
        assert!((seed.x - 0.5).abs() < 1e-12);
        assert!((seed.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn step_before_init_is_a_usage_error() {
        let mut solver = Solver::new(SolverConfig::default());
        solver
            .step(&mut NullObserver)
            .expect_err("uninitialized step should fail");
    }

    #[test]
    fn current_gain_decays_multiplicatively() {
        let config = SolverConfig {
            // Interval large enough that no second measurement can
            // converge the run mid-test.
            update_interval: 1_000,
            ..SolverConfig::default()
        };
        let mut solver = Solver::new(config);
        solver.init(unit_square()).expect("init");

        for _ in 0..10 {
            solver.step(&mut NullObserver).expect("step");
        }

        let expected = config.gain * (1.0 - config.learning_rate).powi(10);
        assert!((solver.current_gain() - expected).abs() < 1e-9);
    }

    #[test]
    fn single_point_run_converges_immediately_with_zero_length() {
        let mut solver = Solver::new(SolverConfig::default());
        solver.init(vec![Point::new(0.25, 0.75)]).expect("init");

        let mut observer = Recording::default();
        let phase = solver.run_to_completion(&mut observer).expect("run");

        assert_eq!(phase, SolverPhase::Converged);
        assert_eq!(observer.progress.first(), Some(&(1, Some(0.0))));
        assert_eq!(solver.last_tour_length(), Some(0.0));
        assert!(solver.cycle() <= 2 * solver.config.update_interval);
        assert_eq!(observer.finished, vec![true]);
        assert_eq!(observer.last_tour.as_deref(), Some(&[0][..]));
    }

    #[test]
    fn unit_square_run_finds_the_perimeter_tour() {
        let mut solver = Solver::new(SolverConfig::default());
        solver.init(unit_square()).expect("init");

        let mut observer = Recording::default();
        let phase = solver.run_to_completion(&mut observer).expect("run");
        assert_eq!(phase, SolverPhase::Converged);
        assert!(solver.cycle() < SolverConfig::default().max_cycles);

        let tour = solver.extract_tour().expect("a 1:1 tour should exist");
        assert_eq!(tour.len(), 4);

        let mut indices: Vec<usize> = tour.stops.iter().map(|s| s.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3]);

        // Only perimeter orders reach 4.0; any diagonal crossing is longer.
        let total = tour.tour_metrics(10.0).total;
        assert!((total - 4.0).abs() < 1e-6, "tour length was {total}");
        assert_eq!(observer.finished, vec![true]);
    }

    #[test]
    fn convergence_is_idempotent() {
        let mut solver = Solver::new(SolverConfig::default());
        solver.init(vec![Point::new(0.5, 0.5)]).expect("init");

        let mut observer = Recording::default();
        solver.run_to_completion(&mut observer).expect("run");
        assert_eq!(solver.phase(), SolverPhase::Converged);

        for _ in 0..3 {
            let phase = solver.step(&mut observer).expect("step after convergence");
            assert_eq!(phase, SolverPhase::Converged);
        }
        // The completion callback did not fire again.
        assert_eq!(observer.finished.len(), 1);
    }

    #[test]
    fn extract_tour_is_none_before_a_bijection_exists() {
        let mut solver = Solver::new(SolverConfig::default());
        solver.init(unit_square()).expect("init");
        // One neuron, four cities.
        assert!(solver.extract_tour().is_none());
    }

    #[test]
    fn stop_reports_progress_then_clears_the_ring() {
        let mut solver = Solver::new(SolverConfig::default());
        solver.init(unit_square()).expect("init");
        solver.step(&mut NullObserver).expect("step");

        let mut observer = Recording::default();
        solver.stop(&mut observer);

        assert_eq!(solver.phase(), SolverPhase::Stopped);
        assert_eq!(observer.progress.len(), 1);
        assert!(solver.ring_positions().is_empty());
        solver
            .step(&mut NullObserver)
            .expect_err("stepping a stopped solver should fail");
    }

    #[test]
    fn a_stopped_solver_can_be_reinitialized() {
        let mut solver = Solver::new(SolverConfig::default());
        solver.init(unit_square()).expect("init");
        solver.stop(&mut NullObserver);

        solver.init(vec![Point::new(0.1, 0.2)]).expect("re-init");
        assert_eq!(solver.phase(), SolverPhase::Initialized);
        assert_eq!(solver.cycle(), 0);
        assert_eq!(solver.ring_len(), 1);
    }
}
