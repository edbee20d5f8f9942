use std::fs;
use std::path::{Path, PathBuf};

use rs_ngram_core::ModelReport;

use crate::io::with_default_extension;

/// Extension given to export paths that have none.
pub(crate) const EXTENSION: &str = "bin";

/// Writes `report` to `path` as `postcard` bytes.
///
/// Returns the path actually written, with `.bin` added if `path` had no
/// extension.
pub(crate) fn save<P: AsRef<Path>>(report: &ModelReport, path: P) -> Result<PathBuf, Box<dyn std::error::Error>> {
	let output = with_default_extension(path, EXTENSION)?;
	let bytes = postcard::to_stdvec(report)?;
	fs::write(&output, bytes)?;
	Ok(output)
}
