use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Reads a whole text file into memory.
///
/// The error message names the file, since several inputs are read in a row.
pub(crate) fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let filename = filename.as_ref();
	let mut contents = String::new();
	File::open(filename)
		.and_then(|mut file| file.read_to_string(&mut contents))
		.map_err(|err| io::Error::new(err.kind(), format!("{}: {err}", filename.display())))?;
	Ok(contents)
}

/// Returns `path` with `default_extension` appended when it has none.
///
/// Examples:
/// - `out/report` + `"bin"` → `out/report.bin`
/// - `out/report.dat` + `"bin"` → `out/report.dat`
pub(crate) fn with_default_extension<P: AsRef<Path>>(path: P, default_extension: &str) -> io::Result<PathBuf> {
	let path = path.as_ref();
	if path.file_name().is_none() {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, "Output path has no filename"));
	}

	let mut output = path.to_path_buf();
	if output.extension().is_none() {
		output.set_extension(default_extension);
	}
	Ok(output)
}
