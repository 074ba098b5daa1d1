use chrono::Local;
use tracing::info;
use px_smoke::{express::Express, runner::{self, ShowWindow}};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let px = Express::new()?;
    let today = Local::now().date_naive();
    let path = runner::run(&px, ".", today, &mut ShowWindow)?;
    match runner::matches_previous(&path)? {
        Some(true) => info!(path = %path.display(),
                            "same figures as the previous run"),
        Some(false) => info!(path = %path.display(),
                             "figures differ from the previous run"),
        None => info!(path = %path.display(), "first run of the day"),
    }
    Ok(())
}
