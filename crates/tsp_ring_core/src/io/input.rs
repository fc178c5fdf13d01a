use std::{fs, io::Read};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::io::options::SolverOptions;
use crate::node::Point;
use crate::{Error, Result};

/// The city collection for one solving run.
#[derive(Clone, Debug)]
pub struct SolverInput {
    pub points: Vec<Point>,
}

impl SolverInput {
    pub fn new(points: &[Point]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }

    /// Acquires points per the options: a seeded random batch when
    /// `point_count > 0`, otherwise `x,y` tokens from the input file or
    /// stdin.
    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        let points = if options.point_count > 0 {
            generate_points(options.point_count, options.seed)
        } else if let Some(path) = options.input_path() {
            parse_points(&fs::read_to_string(path)?)?
        } else {
            read_points_from_stdin()?
        };
        Ok(Self { points })
    }

    pub fn points_len(&self) -> usize {
        self.points.len()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

fn read_points_from_stdin() -> Result<Vec<Point>> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    parse_points(&input)
}

fn parse_points(input: &str) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    for (idx, tok) in input.split_whitespace().enumerate() {
        let mut it = tok.split(',');
        let x_s = it
            .next()
            .ok_or_else(|| Error::invalid_data(format!("Token {}: missing x", idx + 1)))?;
        let y_s = it
            .next()
            .ok_or_else(|| Error::invalid_data(format!("Token {}: missing y", idx + 1)))?;

        if it.next().is_some() {
            return Err(Error::invalid_data(format!(
                "Token {}: expected 'x,y' but got extra comma fields: {tok}",
                idx + 1
            )));
        }

        let x: f64 = x_s.parse().map_err(|_| {
            Error::invalid_data(format!("Token {}: invalid x: {}", idx + 1, x_s))
        })?;
        let y: f64 = y_s.parse().map_err(|_| {
            Error::invalid_data(format!("Token {}: invalid y: {}", idx + 1, y_s))
        })?;

        points.push(Point::new(x, y));
    }

    if points.is_empty() {
        return Err(Error::invalid_input("No points provided."));
    }

    Ok(points)
}

/// Random cities uniformly over the unit square, reproducible per seed.
fn generate_points(count: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Point::new(rng.random::<f64>(), rng.random::<f64>()))
        .collect()
}
