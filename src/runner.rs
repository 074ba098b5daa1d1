//! The seven smoke tests and the harness running them in sequence.

use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use chrono::NaiveDate;
use tracing::{debug, info};
use crate::{
    chart::{BarMode, Chart, Marginal, Trendline},
    express::{Figure, PlotLibrary},
    naming, Error,
};

/// A named smoke test: one chart built from the iris dataset.
#[derive(Debug, Clone)]
pub struct Case {
    pub name: &'static str,
    pub chart: Chart,
}

/// The smoke tests, in the order they run.
pub fn cases() -> Vec<Case> {
    let case = |name, chart| Case { name, chart };
    vec![
        case("test_bar",
             Chart::bar("sepal_width", "petal_width")
             .title("Bar plot")
             .barmode(BarMode::Group)),
        case("test_scatter",
             Chart::scatter("sepal_width", "sepal_length")
             .color("species")
             .title("Scatter plot")),
        case("test_scatter_with_trendline_and_boxes",
             Chart::scatter("sepal_width", "sepal_length")
             .color("species")
             .marginal_y(Marginal::Violin)
             .marginal_x(Marginal::Box)
             .trendline(Trendline::Ols)
             .title("Scatter plot with trendline and boxes")),
        case("test_density_plot",
             Chart::density_contour("sepal_length", "sepal_width")
             .color("species")
             .title("Density plot")),
        case("test_pie",
             Chart::pie("sepal_length", "species")
             .title("Pie Chart")),
        case("test_3D_plot",
             Chart::scatter_3d("sepal_length", "sepal_width", "petal_width")
             .color("species")
             .title("3D plot")),
        // One subplot per species, each with its own trendline.
        case("test_multiple_charts",
             Chart::scatter("sepal_width", "sepal_length")
             .color("species")
             .facet_col("species")
             .trendline(Trendline::Ols)
             .title("Multiple charts")),
    ]
}

/// Where figures go once their description is written.
pub trait Viewer {
    fn view<F: Figure>(&mut self, test: &str, fig: &F) -> Result<(), Error>;
}

/// Display each figure with the library's renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowWindow;

impl Viewer for ShowWindow {
    fn view<F: Figure>(&mut self, _: &str, fig: &F) -> Result<(), Error> {
        fig.show()
    }
}

/// Do not display anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Viewer for Headless {
    fn view<F: Figure>(&mut self, test: &str, _: &F) -> Result<(), Error> {
        debug!(test, "display skipped");
        Ok(())
    }
}

/// Append the record of one test: a `<test>:` line, the figure
/// description and a newline.
pub fn write_record(out: &mut impl Write, test: &str, repr: &str)
                    -> std::io::Result<()> {
    writeln!(out, "{}:", test)?;
    out.write_all(repr.as_bytes())?;
    out.write_all(b"\n")
}

/// Run `cases` in order against the dataset `data`.
///
/// Each figure is fully built before anything about it is written, so
/// the first failure leaves no header of the failing test (or any later
/// one) in `out`.
pub fn run_cases<L, W, V>(lib: &L, data: &L::Frame, cases: &[Case],
                          out: &mut W, viewer: &mut V) -> Result<(), Error>
where L: PlotLibrary, W: Write, V: Viewer {
    for case in cases {
        info!(test = case.name, title = case.chart.title_text().unwrap_or(""),
              chart = %case.chart, "building figure");
        let fig = lib.build(data, &case.chart)?;
        let repr = fig.repr()?;
        if repr.is_empty() {
            return Err(Error::EmptyFigure { test: case.name })
        }
        write_record(out, case.name, &repr)?;
        viewer.view(case.name, &fig)?;
    }
    Ok(())
}

/// Load the iris dataset, create the first unused output file of
/// `today` in `dir` and run all the smoke tests.  Return the path of
/// the output file.
pub fn run<L, V>(lib: &L, dir: impl AsRef<Path>, today: NaiveDate,
                 viewer: &mut V) -> Result<PathBuf, Error>
where L: PlotLibrary, V: Viewer {
    let iris = lib.iris()?;
    let (path, file) = naming::create_in(dir, &naming::date_stamp(today))?;
    info!(path = %path.display(), "writing figure descriptions");
    let mut out = BufWriter::new(file);
    run_cases(lib, &iris, &cases(), &mut out, viewer)?;
    out.flush()?;
    Ok(path)
}

/// Whether `path` has the same content as the previous run of the same
/// day.  `None` if there is no previous run.
pub fn matches_previous(path: &Path) -> Result<Option<bool>, Error> {
    let prev = match naming::previous_run(path) {
        Some(p) if p.try_exists()? => p,
        _ => return Ok(None),
    };
    Ok(Some(fs::read(&prev)? == fs::read(path)?))
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use crate::chart::Kind;

    /// Renders each chart as its Python call.
    #[derive(Default)]
    struct Fake {
        fail_on: Option<Kind>,
        empty: bool,
        built: RefCell<Vec<Chart>>,
    }

    struct FakeFigure(String);

    impl Figure for FakeFigure {
        fn repr(&self) -> Result<String, Error> { Ok(self.0.clone()) }
        fn show(&self) -> Result<(), Error> { Ok(()) }
    }

    impl PlotLibrary for Fake {
        type Frame = &'static str;
        type Figure = FakeFigure;

        fn iris(&self) -> Result<&'static str, Error> { Ok("iris") }

        fn build(&self, data: &&'static str, chart: &Chart)
                 -> Result<FakeFigure, Error> {
            if self.fail_on == Some(chart.kind()) {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::Other, "construction failed")))
            }
            self.built.borrow_mut().push(chart.clone());
            if self.empty {
                return Ok(FakeFigure(String::new()))
            }
            Ok(FakeFigure(format!("Figure({}, data={})", chart, data)))
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Viewer for Recorder {
        fn view<F: Figure>(&mut self, test: &str, _: &F)
                           -> Result<(), Error> {
            self.0.push(test.to_string());
            Ok(())
        }
    }

    const ORDER: [&str; 7] = [
        "test_bar",
        "test_scatter",
        "test_scatter_with_trendline_and_boxes",
        "test_density_plot",
        "test_pie",
        "test_3D_plot",
        "test_multiple_charts"];

    fn headers(text: &str) -> Vec<&str> {
        text.lines()
            .filter(|l| l.starts_with("test_") && l.ends_with(':'))
            .map(|l| l.trim_end_matches(':'))
            .collect()
    }

    fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() }

    #[test]
    fn seven_cases_in_order() {
        let names: Vec<_> = cases().iter().map(|c| c.name).collect();
        assert_eq!(names, ORDER);
        assert_eq!(cases()[2].chart.to_string(),
                   "px.scatter(x='sepal_width', y='sepal_length', \
                    color='species', marginal_x='box', \
                    marginal_y='violin', trendline='ols', \
                    title='Scatter plot with trendline and boxes')");
        assert_eq!(cases()[4].chart.kind(), Kind::Pie);
    }

    #[test]
    fn record_layout() -> std::io::Result<()> {
        let mut out = vec![];
        write_record(&mut out, "test_pie", "Figure({})")?;
        assert_eq!(out, b"test_pie:\nFigure({})\n");
        Ok(())
    }

    #[test]
    fn every_header_followed_by_its_figure() -> Result<(), Error> {
        let lib = Fake::default();
        let mut out = vec![];
        let mut viewer = Recorder::default();
        run_cases(&lib, &"iris", &cases(), &mut out, &mut viewer)?;
        let text = String::from_utf8(out).unwrap();
        assert_eq!(headers(&text), ORDER);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 14);
        for (pair, case) in lines.chunks(2).zip(cases()) {
            assert_eq!(pair[0], format!("{}:", case.name));
            assert_eq!(pair[1], format!("Figure({}, data=iris)", case.chart));
        }
        assert_eq!(viewer.0, ORDER);
        assert_eq!(lib.built.borrow().len(), 7);
        Ok(())
    }

    #[test]
    fn stops_at_first_failure() {
        let lib = Fake { fail_on: Some(Kind::DensityContour),
                         ..Fake::default() };
        let mut out = vec![];
        let mut viewer = Recorder::default();
        let r = run_cases(&lib, &"iris", &cases(), &mut out, &mut viewer);
        assert!(r.is_err());
        let text = String::from_utf8(out).unwrap();
        assert_eq!(headers(&text), &ORDER[.. 3]);
        assert_eq!(viewer.0, &ORDER[.. 3]);
    }

    #[test]
    fn empty_description_is_an_error() {
        let lib = Fake { empty: true, ..Fake::default() };
        let mut out = vec![];
        let r = run_cases(&lib, &"iris", &cases(), &mut out, &mut Headless);
        assert!(matches!(r, Err(Error::EmptyFigure { test: "test_bar" })));
        assert!(out.is_empty());
    }

    #[test]
    fn two_runs_same_day() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let lib = Fake::default();
        let first = run(&lib, dir.path(), day(), &mut Headless)?;
        let second = run(&lib, dir.path(), day(), &mut Headless)?;
        assert_eq!(first, dir.path().join("run_tests_01Jan2024_0.txt"));
        assert_eq!(second, dir.path().join("run_tests_01Jan2024_1.txt"));
        let text = fs::read_to_string(&second)?;
        assert_eq!(headers(&text), ORDER);
        assert_eq!(matches_previous(&first)?, None);
        assert_eq!(matches_previous(&second)?, Some(true));
        Ok(())
    }

    struct Counted<'a>(&'a Cell<u32>);

    impl Figure for Counted<'_> {
        fn repr(&self) -> Result<String, Error> { Ok("Figure()".into()) }
        fn show(&self) -> Result<(), Error> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    struct CountingLib<'a>(&'a Cell<u32>);

    impl<'a> PlotLibrary for CountingLib<'a> {
        type Frame = ();
        type Figure = Counted<'a>;

        fn iris(&self) -> Result<(), Error> { Ok(()) }

        fn build(&self, _: &(), _: &Chart) -> Result<Counted<'a>, Error> {
            Ok(Counted(self.0))
        }
    }

    #[test]
    fn show_window_shows_every_figure() -> Result<(), Error> {
        let shown = Cell::new(0);
        let mut out = vec![];
        run_cases(&CountingLib(&shown), &(), &cases(), &mut out,
                  &mut ShowWindow)?;
        assert_eq!(shown.get(), 7);
        let mut out = vec![];
        let shown_headless = Cell::new(0);
        run_cases(&CountingLib(&shown_headless), &(), &cases(), &mut out,
                  &mut Headless)?;
        assert_eq!(shown_headless.get(), 0);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_skipped() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let link = dir.path().join("run_tests_01Jan2024_0.txt");
        std::os::unix::fs::symlink(dir.path().join("gone"), &link)?;
        let path = run(&Fake::default(), dir.path(), day(), &mut Headless)?;
        assert_eq!(path, dir.path().join("run_tests_01Jan2024_1.txt"));
        assert_eq!(headers(&fs::read_to_string(&path)?), ORDER);
        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        Ok(())
    }

    #[test]
    fn earlier_output_untouched() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let earlier = dir.path().join("run_tests_01Jan2024_0.txt");
        fs::write(&earlier, "test_bar:\nFigure()\n")?;
        let path = run(&Fake::default(), dir.path(), day(), &mut Headless)?;
        assert_eq!(path, dir.path().join("run_tests_01Jan2024_1.txt"));
        assert_eq!(fs::read(&earlier)?, b"test_bar:\nFigure()\n");
        Ok(())
    }

    #[test]
    fn failed_run_leaves_partial_file() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let lib = Fake { fail_on: Some(Kind::Scatter3d), ..Fake::default() };
        assert!(run(&lib, dir.path(), day(), &mut Headless).is_err());
        let path = dir.path().join("run_tests_01Jan2024_0.txt");
        let text = fs::read_to_string(&path)?;
        assert_eq!(headers(&text), &ORDER[.. 5]);
        let again = run(&Fake::default(), dir.path(), day(), &mut Headless)?;
        assert_eq!(again, dir.path().join("run_tests_01Jan2024_1.txt"));
        assert_eq!(matches_previous(&again)?, Some(false));
        Ok(())
    }
}
