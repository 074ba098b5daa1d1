//! Output file names: `run_tests_<date>_<n>.txt`, with `n` the first
//! run number of the day not yet taken.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};
use chrono::NaiveDate;
use tracing::debug;
use crate::Error;

/// Bound on the run numbers probed for a single day.
pub const MAX_RUNS_PER_DAY: u32 = 10_000;

/// Return the output file name of run `num` on `date`.
pub fn gen_file_name(date: &str, num: u32) -> String {
    format!("run_tests_{}_{}.txt", date, num)
}

/// Format `date` as it appears in file names, e.g. `01Jan2024`.
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%d%b%Y").to_string()
}

/// Return the first name `gen_file_name(date, n)`, n = 0, 1,…, for
/// which `exists` answers `false`.
///
/// An error of `exists` is returned as is.  If no name is free among
/// the first [`MAX_RUNS_PER_DAY`], return [`Error::NamesExhausted`].
pub fn allocate<F>(date: &str, exists: F) -> Result<String, Error>
where F: FnMut(&str) -> io::Result<bool> {
    allocate_from(date, 0, exists).map(|(_, name)| name)
}

fn allocate_from<F>(date: &str, start: u32, mut exists: F)
                    -> Result<(u32, String), Error>
where F: FnMut(&str) -> io::Result<bool> {
    for num in start .. MAX_RUNS_PER_DAY {
        let name = gen_file_name(date, num);
        if !exists(&name)? {
            return Ok((num, name))
        }
        debug!(%name, "output file already exists");
    }
    Err(Error::NamesExhausted { date: date.to_string(),
                                tried: MAX_RUNS_PER_DAY })
}

/// Whether `path` names a directory entry, without following symlinks.
fn entry_exists(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Same as [`allocate`] with names looked up in the directory `dir`.
/// Dangling symlinks count as taken.
pub fn allocate_in(dir: impl AsRef<Path>, date: &str)
                   -> Result<PathBuf, Error> {
    let dir = dir.as_ref();
    let name = allocate(date, |name| entry_exists(&dir.join(name)))?;
    Ok(dir.join(name))
}

/// Create the first free output file of `date` in `dir`.
pub fn create_in(dir: impl AsRef<Path>, date: &str)
                 -> Result<(PathBuf, File), Error> {
    let dir = dir.as_ref();
    create_with(dir, date, |name| entry_exists(&dir.join(name)))
}

/// Create the first output file of `date` in `dir` that `exists`
/// reports free.  The file is never truncated: if a name turns out to
/// be taken when creating it, the next run number is tried.
pub fn create_with<F>(dir: &Path, date: &str, mut exists: F)
                      -> Result<(PathBuf, File), Error>
where F: FnMut(&str) -> io::Result<bool> {
    let mut start = 0;
    loop {
        let (num, name) = allocate_from(date, start, &mut exists)?;
        let path = dir.join(name);
        match File::options().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "created concurrently");
                start = num + 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Path of the run preceding `path` on the same day, if `path` is an
/// output file with a positive run number.
pub fn previous_run(path: &Path) -> Option<PathBuf> {
    let stem = path.file_name()?.to_str()?
        .strip_prefix("run_tests_")?
        .strip_suffix(".txt")?;
    let (date, num) = stem.rsplit_once('_')?;
    let num: u32 = num.parse().ok()?;
    let prev = num.checked_sub(1)?;
    Some(path.with_file_name(gen_file_name(date, prev)))
}
