use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{NGramError, Result};
use crate::io::{build_entry_path, get_filename, list_files};
use crate::model::ngram_model::Model;

/// Leading bytes of every stored model.
const MAGIC: &[u8; 4] = b"NGRM";

/// Extension of model files inside the store directory.
const EXTENSION: &str = "bin";

/// On-disk layout, tagged by format version.
///
/// The write side borrows the model; both sides encode the same bytes.
#[derive(Serialize)]
enum ModelFormatRef<'a> {
	V1(&'a Model),
}

#[derive(Deserialize)]
enum ModelFormat {
	V1(Model),
}

/// Directory of named models, one `<name>.bin` file each.
///
/// # Guarantees
/// - Names are unique: [`ModelStore::create`] never overwrites
/// - Writes go to a temporary file in the same directory and are renamed
///   into place, so a reader sees either the old or the new model
/// - File handles only live for the duration of a call
#[derive(Debug, Clone)]
pub struct ModelStore {
	root: PathBuf,
}

impl ModelStore {
	/// Opens the store rooted at `root`, creating the directory if needed.
	pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
		let root = root.as_ref().to_path_buf();
		fs::create_dir_all(&root).map_err(|e| NGramError::io(e, Some(root.clone())))?;
		debug!("opened model store at {}", root.display());
		Ok(Self { root })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Checks that `name` can be used as a store key.
	///
	/// # Errors
	/// Returns [`NGramError::InvalidName`] for empty names, names starting
	/// with `.`, and names holding whitespace, control characters, or path
	/// separators.
	pub fn validate_name(name: &str) -> Result<()> {
		let valid = !name.is_empty()
			&& !name.starts_with('.')
			&& !name.chars().any(|c| c.is_whitespace() || c.is_control() || c == '/' || c == '\\');
		if valid { Ok(()) } else { Err(NGramError::InvalidName(name.to_owned())) }
	}

	fn path_for(&self, name: &str) -> Result<PathBuf> {
		Self::validate_name(name)?;
		Ok(build_entry_path(&self.root, name, EXTENSION))
	}

	pub fn exists(&self, name: &str) -> Result<bool> {
		Ok(self.path_for(name)?.is_file())
	}

	/// Stores a new model.
	///
	/// # Errors
	/// Returns [`NGramError::NameAlreadyExists`] if the name is taken, even
	/// when another process claimed it while this one was writing.
	pub fn create(&self, model: &Model) -> Result<()> {
		let path = self.path_for(model.name())?;
		if path.exists() {
			return Err(NGramError::NameAlreadyExists(model.name().to_owned()));
		}

		let temp = self.write_temp(model)?;
		temp.persist_noclobber(&path).map_err(|e| {
			if e.error.kind() == ErrorKind::AlreadyExists {
				NGramError::NameAlreadyExists(model.name().to_owned())
			} else {
				NGramError::io(e.error, Some(path.clone()))
			}
		})?;

		info!("created model '{}' (n = {}, {} context(s))", model.name(), model.order(), model.table().len());
		Ok(())
	}

	/// Atomically replaces an existing model.
	///
	/// # Errors
	/// Returns [`NGramError::ModelNotFound`] if nothing is stored under the name.
	pub fn replace(&self, model: &Model) -> Result<()> {
		let path = self.path_for(model.name())?;
		if !path.is_file() {
			return Err(NGramError::ModelNotFound(model.name().to_owned()));
		}

		let temp = self.write_temp(model)?;
		temp.persist(&path).map_err(|e| NGramError::io(e.error, Some(path.clone())))?;

		info!("updated model '{}' ({} context(s))", model.name(), model.table().len());
		Ok(())
	}

	/// Loads a stored model.
	///
	/// # Errors
	/// - [`NGramError::ModelNotFound`] if nothing is stored under the name
	/// - [`NGramError::CorruptModel`] if the bytes do not decode
	pub fn load(&self, name: &str) -> Result<Model> {
		let path = self.path_for(name)?;
		let bytes = fs::read(&path).map_err(|e| match e.kind() {
			ErrorKind::NotFound => NGramError::ModelNotFound(name.to_owned()),
			_ => NGramError::io(e, Some(path.clone())),
		})?;
		debug!("read {} byte(s) from {}", bytes.len(), path.display());
		Self::decode(name, &bytes)
	}

	/// Names of all stored models, sorted alphabetically.
	///
	/// Files whose stem is not a valid model name are skipped, so every
	/// listed name can be loaded or deleted.
	pub fn list(&self) -> Result<Vec<String>> {
		let files = list_files(&self.root, EXTENSION).map_err(|e| NGramError::io(e, Some(self.root.clone())))?;

		let mut names = Vec::with_capacity(files.len());
		for file in &files {
			let name = get_filename(file).map_err(|e| NGramError::io(e, Some(self.root.join(file))))?;
			if Self::validate_name(&name).is_ok() {
				names.push(name);
			} else {
				debug!("skipping {file}: not a valid model name");
			}
		}

		// Sort the stems, not the file names: "a-b.bin" sorts before "a.bin"
		names.sort();
		Ok(names)
	}

	/// Removes a stored model.
	///
	/// # Errors
	/// Returns [`NGramError::ModelNotFound`] if nothing is stored under the name.
	pub fn delete(&self, name: &str) -> Result<()> {
		let path = self.path_for(name)?;
		fs::remove_file(&path).map_err(|e| match e.kind() {
			ErrorKind::NotFound => NGramError::ModelNotFound(name.to_owned()),
			_ => NGramError::io(e, Some(path.clone())),
		})?;
		info!("deleted model '{name}'");
		Ok(())
	}

	/// Serializes `model` into a synced temporary file inside the store.
	///
	/// The temporary file is removed on drop unless persisted.
	fn write_temp(&self, model: &Model) -> Result<NamedTempFile> {
		let bytes = Self::encode(model)?;
		let io_err = |e| NGramError::io(e, Some(self.root.clone()));

		let mut temp = NamedTempFile::new_in(&self.root).map_err(io_err)?;
		temp.write_all(&bytes).map_err(io_err)?;
		temp.as_file().sync_all().map_err(io_err)?;
		debug!("wrote {} byte(s) to {}", bytes.len(), temp.path().display());
		Ok(temp)
	}

	fn encode(model: &Model) -> Result<Vec<u8>> {
		let mut bytes = MAGIC.to_vec();
		bytes.extend(postcard::to_stdvec(&ModelFormatRef::V1(model))?);
		Ok(bytes)
	}

	fn decode(name: &str, bytes: &[u8]) -> Result<Model> {
		let corrupt = |reason: String| NGramError::CorruptModel { name: name.to_owned(), reason };

		let payload = bytes.strip_prefix(MAGIC.as_slice()).ok_or_else(|| corrupt("bad magic bytes".to_owned()))?;
		let mut model = match postcard::from_bytes::<ModelFormat>(payload).map_err(|e| corrupt(e.to_string()))? {
			ModelFormat::V1(model) => model,
		};

		let table = model.table();
		if table.order() < 2 {
			return Err(corrupt(format!("order {} is below 2", table.order())));
		}
		for (context, distribution) in table.iter() {
			if context.len() != table.context_len() {
				return Err(corrupt(format!("context length differs from n - 1 = {}", table.context_len())));
			}
			if distribution.iter().any(|(_, count)| count == 0) {
				return Err(corrupt(format!("zero count after context {context:?}")));
			}
			if distribution.checked_total().is_none() {
				return Err(corrupt(format!("counts after context {context:?} overflow")));
			}
		}

		if model.name() != name {
			warn!("model stored as '{name}' calls itself '{}', using '{name}'", model.name());
			model.set_name(name);
		}
		Ok(model)
	}
}
