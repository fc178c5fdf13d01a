use std::{env, fmt, path::Path};

use log::LevelFilter;

use crate::constants::{
    DEFAULT_GAIN, DEFAULT_LEARNING_RATE, DEFAULT_MAX_CYCLES, DEFAULT_POINT_SEED,
    DEFAULT_UPDATE_INTERVAL,
};
use crate::net::solver::SolverConfig;
use crate::{Error, Result};

/// Runtime options for the ring-network solver and its CLI surface.
#[derive(Clone, Debug)]
pub struct SolverOptions {
    /// Number of random cities to generate; 0 means read points from
    /// `--input` or stdin instead.
    pub point_count: usize,
    /// Seed for random city generation.
    pub seed: u64,
    /// Hard ceiling on survey cycles.
    pub max_cycles: u32,
    /// Gain decay per cycle (`alpha`).
    pub learning_rate: f64,
    /// Initial relaxation kernel spread.
    pub gain: f64,
    /// Cycles between convergence checks and progress reports.
    pub update_interval: u32,
    /// Structured logging level.
    pub log_level: LogLevel,
    /// Logging output format.
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs and metrics. Empty means stderr.
    pub log_output: String,
    /// Optional input file path for points. Empty means stdin.
    pub input: String,
    /// Optional output file path for the ordered route. Empty means stdout.
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --log-level: {value} (expected error|warn|info|debug|trace|off)"
            ))),
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Off => "off",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::invalid_input(format!(
                "Invalid value for --log-format: {value} (expected compact|pretty)"
            ))),
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
        }
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            point_count: 0,
            seed: DEFAULT_POINT_SEED,
            max_cycles: DEFAULT_MAX_CYCLES,
            learning_rate: DEFAULT_LEARNING_RATE,
            gain: DEFAULT_GAIN,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = split_arg(raw_name, &mut args);

            match name.as_str() {
                "point-count" => options.point_count = parse_value(&name, value)?,
                "seed" => options.seed = parse_value(&name, value)?,
                "max-cycles" => options.max_cycles = parse_value(&name, value)?,
                "learning-rate" => options.learning_rate = parse_value(&name, value)?,
                "gain" => options.gain = parse_value(&name, value)?,
                "update-interval" => options.update_interval = parse_value(&name, value)?,
                "log-level" => options.log_level = LogLevel::parse(&require_value(&name, value)?)?,
                "log-format" => {
                    options.log_format = LogFormat::parse(&require_value(&name, value)?)?;
                }
                "log-timestamp" => {
                    options.log_timestamp = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "no-log-timestamp" => {
                    if value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    options.log_timestamp = false;
                }
                "log-output" => options.log_output = require_value(&name, value)?,
                "input" => options.input = require_value(&name, value)?,
                "output" => options.output = require_value(&name, value)?,
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-ring [options] [--input points.txt]\n",
            "  tsp-ring [options] < points.txt\n",
            "  tsp-ring --point-count 100\n\n",
            "Options:\n",
            "  --point-count <usize>  generate this many random cities (0 = read input)\n",
            "  --seed <u64>\n",
            "  --max-cycles <u32>\n",
            "  --learning-rate <f64>\n",
            "  --gain <f64>\n",
            "  --update-interval <u32>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-ring --point-count 100 --log-level info\n",
            "  tsp-ring --input points.txt --output route.txt\n",
            "  tsp-ring --gain=25 --learning-rate=0.02 < points.txt\n",
            "  tsp-ring --log-level=debug --log-format=pretty --log-output run.log < points.txt\n",
        )
    }

    /// Engine-facing subset of the options.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            max_cycles: self.max_cycles,
            learning_rate: self.learning_rate,
            gain: self.gain,
            update_interval: self.update_interval,
        }
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_empty_path(&self.log_output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_empty_path(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_empty_path(&self.output)
    }
}

impl fmt::Display for SolverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "point_count={} seed={} max_cycles={} learning_rate={} gain={} update_interval={} \
             log_level={} log_format={} log_timestamp={} log_output={} input={} output={}",
            self.point_count,
            self.seed,
            self.max_cycles,
            self.learning_rate,
            self.gain,
            self.update_interval,
            self.log_level.tag(),
            self.log_format.tag(),
            self.log_timestamp,
            display_or_dash(&self.log_output),
            display_or_dash(&self.input),
            display_or_dash(&self.output),
        )
    }
}

fn display_or_dash(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() { "-" } else { value }
}

fn non_empty_path(value: &str) -> Option<&Path> {
    let value = value.trim();
    if value.is_empty() || value == "-" {
        None
    } else {
        Some(Path::new(value))
    }
}

fn require_value(name: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::invalid_input(format!("Missing value for --{name}")))
}

fn parse_value<T>(name: &str, value: Option<String>) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let raw = require_value(name, value)?;
    raw.parse::<T>()
        .map_err(|e| Error::invalid_input(format!("Invalid value for --{name}: {raw} ({e})")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}

fn split_arg(
    raw_name: &str,
    args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
) -> (String, Option<String>) {
    if let Some((k, v)) = raw_name.split_once('=') {
        return (k.to_string(), Some(v.to_string()));
    }

    let value = match args.peek() {
        Some(next) if !next.starts_with("--") => args.next(),
        _ => None,
    };

    (raw_name.to_string(), value)
}
