//! Pure descriptions of plotly.express calls.
//!
//! A [`Chart`] says which constructor to call, which dataset columns go
//! to which channel and which options to pass.  It holds no Python
//! object, so the seven smoke tests can be inspected (and faked)
//! without an interpreter.

use std::fmt::{self, Display, Formatter};

/// The plotly.express constructors exercised by the smoke tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bar,
    Scatter,
    DensityContour,
    Pie,
    Scatter3d,
}

impl Kind {
    /// Name of the function in the `plotly.express` module.
    pub fn function(self) -> &'static str {
        match self {
            Kind::Bar => "bar",
            Kind::Scatter => "scatter",
            Kind::DensityContour => "density_contour",
            Kind::Pie => "pie",
            Kind::Scatter3d => "scatter_3d",
        }
    }
}

/// Which role a dataset column plays in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    X,
    Y,
    Z,
    Values,
    Names,
}

impl Channel {
    fn keyword(self) -> &'static str {
        match self {
            Channel::X => "x",
            Channel::Y => "y",
            Channel::Z => "z",
            Channel::Values => "values",
            Channel::Names => "names",
        }
    }
}

/// Arrangement of bars sharing a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarMode {
    Group,
    Overlay,
    Relative,
}

/// Kind of the small distribution plot drawn along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marginal {
    Violin,
    Box,
    Rug,
    Histogram,
}

/// Regression overlay method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trendline {
    /// Ordinary least squares.
    Ols,
    Lowess,
}

impl BarMode {
    fn as_str(self) -> &'static str {
        match self {
            BarMode::Group => "group",
            BarMode::Overlay => "overlay",
            BarMode::Relative => "relative",
        }
    }
}

impl Marginal {
    fn as_str(self) -> &'static str {
        match self {
            Marginal::Violin => "violin",
            Marginal::Box => "box",
            Marginal::Rug => "rug",
            Marginal::Histogram => "histogram",
        }
    }
}

impl Trendline {
    fn as_str(self) -> &'static str {
        match self {
            Trendline::Ols => "ols",
            Trendline::Lowess => "lowess",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Options {
    color: Option<&'static str>,
    title: Option<&'static str>,
    barmode: Option<BarMode>,
    marginal_x: Option<Marginal>,
    marginal_y: Option<Marginal>,
    trendline: Option<Trendline>,
    facet_col: Option<&'static str>,
}

/// One plot-construction call, with its column encodings and options.
///
/// # Example
///
/// ```
/// use px_smoke::chart::{Chart, Trendline};
/// let c = Chart::scatter("sepal_width", "sepal_length")
///     .color("species")
///     .trendline(Trendline::Ols);
/// assert_eq!(c.kwargs()[0], ("x", "sepal_width"));
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    kind: Kind,
    columns: Vec<(Channel, &'static str)>,
    options: Options,
}

macro_rules! set_option {
    ($(#[$doc: meta])* $name: ident : $ty: ty) => {
        $(#[$doc])*
        pub fn $name(mut self, v: $ty) -> Self {
            self.options.$name = Some(v);
            self
        }
    };
}

impl Chart {
    fn new(kind: Kind, columns: Vec<(Channel, &'static str)>) -> Self {
        Chart { kind, columns, options: Options::default() }
    }

    pub fn bar(x: &'static str, y: &'static str) -> Self {
        Self::new(Kind::Bar, vec![(Channel::X, x), (Channel::Y, y)])
    }

    pub fn scatter(x: &'static str, y: &'static str) -> Self {
        Self::new(Kind::Scatter, vec![(Channel::X, x), (Channel::Y, y)])
    }

    pub fn density_contour(x: &'static str, y: &'static str) -> Self {
        Self::new(Kind::DensityContour,
                  vec![(Channel::X, x), (Channel::Y, y)])
    }

    /// Pie chart whose sector sizes sum `values` per distinct `names`.
    pub fn pie(values: &'static str, names: &'static str) -> Self {
        Self::new(Kind::Pie,
                  vec![(Channel::Values, values), (Channel::Names, names)])
    }

    pub fn scatter_3d(x: &'static str, y: &'static str,
                      z: &'static str) -> Self {
        Self::new(Kind::Scatter3d,
                  vec![(Channel::X, x), (Channel::Y, y), (Channel::Z, z)])
    }

    set_option!(
        /// Group (and color) the marks by this categorical column.
        color: &'static str);
    set_option!(title: &'static str);
    set_option!(barmode: BarMode);
    set_option!(marginal_x: Marginal);
    set_option!(marginal_y: Marginal);
    set_option!(trendline: Trendline);
    set_option!(
        /// Split the data into side-by-side subplots, one per value of
        /// this column.
        facet_col: &'static str);

    pub fn kind(&self) -> Kind { self.kind }

    pub fn title_text(&self) -> Option<&'static str> { self.options.title }

    /// Keyword arguments of the call, columns first, then the options
    /// that are set, in a fixed order.
    pub fn kwargs(&self) -> Vec<(&'static str, &'static str)> {
        let o = &self.options;
        let mut kw: Vec<_> = self.columns.iter()
            .map(|&(ch, col)| (ch.keyword(), col))
            .collect();
        let opts = [
            ("color", o.color),
            ("facet_col", o.facet_col),
            ("barmode", o.barmode.map(BarMode::as_str)),
            ("marginal_x", o.marginal_x.map(Marginal::as_str)),
            ("marginal_y", o.marginal_y.map(Marginal::as_str)),
            ("trendline", o.trendline.map(Trendline::as_str)),
            ("title", o.title),
        ];
        kw.extend(opts.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))));
        kw
    }
}

impl Display for Chart {
    /// Python-like rendering of the call, e.g.
    /// `px.pie(values='sepal_length', names='species')`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "px.{}(", self.kind.function())?;
        for (i, (k, v)) in self.kwargs().iter().enumerate() {
            if i > 0 { f.write_str(", ")? }
            write!(f, "{}='{}'", k, v)?;
        }
        f.write_str(")")
    }
}
