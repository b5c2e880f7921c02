use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Builds the file path of an entry stored in `dir`.
///
/// The extension is appended, never substituted, so dotted names survive.
///
/// Example:
/// `models` + `"shakespeare"` + `"bin"` → `models/shakespeare.bin`
pub(crate) fn build_entry_path<P: AsRef<Path>>(dir: P, name: &str, extension: &str) -> PathBuf {
	dir.as_ref().join(format!("{name}.{extension}"))
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./models/shakespeare.bin"` → `"shakespeare"`
/// - `"shakespeare.bin"` → `"shakespeare"`
pub(crate) fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
