use std::{fmt::Write as _, fs, time::Instant};

use log::{debug, info, warn};

use tsp_ring_core::{
    Point, Result, Solver, SolverInput, SolverObserver, SolverOptions, Tour, logging,
};

const SPIKE_THRESHOLD_FACTOR: f64 = 10.0;

/// Logs engine progress; the CLI's stand-in for the original canvas.
struct CycleReporter;

impl SolverObserver for CycleReporter {
    fn on_progress(&mut self, cycle: u32, tour_length: Option<f64>, ring: &[Point]) {
        match tour_length {
            Some(length) => debug!(
                "solver.cycle: cycle={cycle} neurons={} tour_len={length:.4}",
                ring.len()
            ),
            None => debug!("solver.cycle: cycle={cycle} neurons=0 stalled"),
        }
    }

    fn on_finished(&mut self, tour: Option<&Tour>) {
        match tour {
            Some(tour) => info!("solver: finished stops={}", tour.len()),
            None => warn!("solver: finished without a one-to-one tour"),
        }
    }
}

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;
    let input = SolverInput::from_options(&options)?;
    let n = input.points_len();

    info!("input: n={n}");
    info!("options: {options}");

    let mut solver = Solver::new(options.solver_config());
    solver.init(input.into_points())?;
    solver.run_to_completion(&mut CycleReporter)?;

    let Some(tour) = solver.extract_tour() else {
        warn!(
            "output: no solution after cycle={} (neurons={} points={n})",
            solver.cycle(),
            solver.ring_len()
        );
        return Ok(());
    };

    write_route(&options, &tour)?;

    info!(
        "output: n={} time={:.2}s",
        tour.len(),
        now.elapsed().as_secs_f32()
    );

    tour.tour_metrics(SPIKE_THRESHOLD_FACTOR);

    Ok(())
}

/// One `index,x,y` line per stop, to stdout or `--output`.
fn write_route(options: &SolverOptions, tour: &Tour) -> Result<()> {
    match options.output_path() {
        Some(path) => {
            let mut out = String::new();
            for stop in &tour.stops {
                let _ = writeln!(out, "{},{}", stop.index, stop.point);
            }
            fs::write(path, out)?;
        }
        None => {
            for stop in &tour.stops {
                println!("{},{}", stop.index, stop.point);
            }
        }
    }
    Ok(())
}
