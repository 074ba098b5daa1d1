//! Smoke tests for the [plotly.express][] Python visualization library.
//!
//! Usage
//! -----
//!
//! The harness loads the iris sample dataset, builds seven charts with
//! plotly.express, appends the textual form of every figure to
//! `run_tests_<date>_<n>.txt` and opens each chart for visual
//! inspection.  The checking is done by a human; the dumps of two runs
//! can be compared to spot changes.
//!
//! ```no_run
//! use px_smoke::{express::Express, runner::{self, ShowWindow}};
//! let px = Express::new()?;
//! let today = chrono::Local::now().date_naive();
//! let path = runner::run(&px, ".", today, &mut ShowWindow)?;
//! println!("figures written to {}", path.display());
//! # Ok::<(), px_smoke::Error>(())
//! ```
//!
//! [plotly.express]: https://plotly.com/python/plotly-express/

use std::fmt::{Display, Formatter};
use pyo3::PyErr;

pub mod chart;
pub mod express;
pub mod naming;
pub mod runner;

/// Possible errors of the smoke-test harness.
#[derive(Debug)]
pub enum Error {
    /// The Python library "plotly" was not found.
    NoPlotly,
    /// Every candidate output name for `date` is already taken.
    NamesExhausted { date: String, tried: u32 },
    /// The figure of the test `test` has an empty textual form.
    EmptyFigure { test: &'static str },
    /// Reading or writing the filesystem failed.
    Io(std::io::Error),
    /// Other Python errors.
    Python(PyErr),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Error::NoPlotly =>
                write!(f, "The plotly library has not been found.\n\
Please install it.  See https://plotly.com/python/getting-started/"),
            Error::NamesExhausted { date, tried } =>
                write!(f, "No unused output file name for {}: tried {} \
                           run numbers", date, tried),
            Error::EmptyFigure { test } =>
                write!(f, "The figure of {} has an empty description", test),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Python(e) => write!(f, "Python error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Python(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self { Error::Io(e) }
}

impl From<PyErr> for Error {
    fn from(e: PyErr) -> Self { Error::Python(e) }
}
