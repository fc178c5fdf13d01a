//! Euclidean TSP approximation with a self-organizing neuron ring.
//! A ring of movable neurons is relaxed toward the cities each cycle with a
//! distance-weighted Gaussian kernel, pruned when starved and duplicated
//! when overused, until the measured tour length stabilizes.

mod constants;
mod error;
mod io;
pub mod logging;
mod net;
mod node;
mod tour;

pub use error::{Error, Result};
pub use io::input::SolverInput;
pub use io::options::{LogFormat, LogLevel, SolverOptions};
pub use net::neuron::{Neuron, NeuronId};
pub use net::ring::Ring;
pub use net::solver::{NullObserver, Solver, SolverConfig, SolverObserver, SolverPhase};
pub use node::Point;
pub use tour::{Tour, TourMetrics, TourStop};
