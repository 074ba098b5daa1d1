//! The plot-library capability and its plotly.express implementation.

use lazy_static::lazy_static;
use pyo3::{
    prelude::*,
    intern,
    types::{PyDict, PyModule},
};
use crate::{chart::Chart, Error};

/// A chart built by a [`PlotLibrary`], prior to rendering.
pub trait Figure {
    /// Textual description of the figure (its traces and layout).
    fn repr(&self) -> Result<String, Error>;

    /// Render the figure for interactive inspection.
    fn show(&self) -> Result<(), Error>;
}

/// What the smoke tests need from a plotting library: a sample dataset
/// and a way to turn a [`Chart`] into a figure.
pub trait PlotLibrary {
    /// Immutable tabular dataset owned by the library.
    type Frame;
    /// Figures built by the library.
    type Figure: Figure;

    /// Load the iris flower measurements.
    fn iris(&self) -> Result<Self::Frame, Error>;

    /// Call the constructor described by `chart` on `data`.
    fn build(&self, data: &Self::Frame, chart: &Chart)
             -> Result<Self::Figure, Error>;
}

/// Import and return a handle to the module `$m`.
macro_rules! pyimport { ($m: literal) => {
    Python::with_gil(|py|
        PyModule::import_bound(py, $m).map(|m| m.unbind()))
}}

lazy_static! {
    static ref EXPRESS: Result<Py<PyModule>, PyErr> = {
        pyimport!("plotly.express")
    };
}

/// Handle to the `plotly.express` Python module.
#[derive(Debug)]
pub struct Express {
    px: Py<PyModule>,
}

/// A pandas DataFrame returned by `plotly.express.data`.
#[derive(Debug)]
pub struct DataFrame {
    df: PyObject,
}

/// An instance of `plotly.graph_objects.Figure`.
#[derive(Debug)]
pub struct PlotlyFigure {
    fig: PyObject,
}

impl Express {
    /// Return a handle to plotly.express.
    ///
    /// Return an error if plotly is not present on the system.
    // ⚠ The import may lock Python's GIL; keep it outside `with_gil`.
    pub fn new() -> Result<Express, Error> {
        let px = EXPRESS.as_ref().map_err(|_| Error::NoPlotly)?;
        Ok(Python::with_gil(|py| Express { px: px.clone_ref(py) }))
    }
}

impl PlotLibrary for Express {
    type Frame = DataFrame;
    type Figure = PlotlyFigure;

    fn iris(&self) -> Result<DataFrame, Error> {
        Python::with_gil(|py| {
            let df = self.px.bind(py)
                .getattr(intern!(py, "data"))?
                .call_method0(intern!(py, "iris"))?;
            Ok(DataFrame { df: df.unbind() })
        })
    }

    fn build(&self, data: &DataFrame, chart: &Chart)
             -> Result<PlotlyFigure, Error> {
        Python::with_gil(|py| {
            let kwargs = PyDict::new_bound(py);
            for (k, v) in chart.kwargs() {
                kwargs.set_item(k, v)?;
            }
            let fig = self.px.bind(py)
                .getattr(chart.kind().function())?
                .call((data.df.clone_ref(py),), Some(&kwargs))?;
            Ok(PlotlyFigure { fig: fig.unbind() })
        })
    }
}

impl Figure for PlotlyFigure {
    /// Python's `str(fig)`.
    fn repr(&self) -> Result<String, Error> {
        Python::with_gil(|py| {
            let s: String = self.fig.bind(py).str()?.extract()?;
            Ok(s)
        })
    }

    /// Open the figure with plotly's default renderer (usually a
    /// browser tab).
    fn show(&self) -> Result<(), Error> {
        Python::with_gil(|py| {
            self.fig.bind(py).call_method0(intern!(py, "show"))?;
            Ok(())
        })
    }
}
