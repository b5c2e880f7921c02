//! Error type shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = NGramError> = std::result::Result<T, E>;

/// Failures raised while training, storing, or generating from n-gram models.
///
/// Running into an unseen context during generation is not an error; see
/// [`crate::model::generator::Outcome`].
#[derive(Debug, Error)]
pub enum NGramError {
	/// The requested order is below 2.
	#[error("invalid order {n}: n must be >= 2")]
	InvalidOrder { n: usize },

	/// The model name cannot be used as a store key.
	#[error("invalid model name {0:?}: names must be non-empty, must not start with '.', and must not contain whitespace or path separators")]
	InvalidName(String),

	#[error("model '{0}' already exists, use tune to extend it or pick another name")]
	NameAlreadyExists(String),

	#[error("no such model: '{0}'")]
	ModelNotFound(String),

	/// Tuning or merging with an order different from the model's own.
	#[error("order mismatch: model has n = {expected}, got n = {found}")]
	OrderMismatch { expected: usize, found: usize },

	/// Generation needs at least `n - 1` start tokens.
	#[error("start sequence has {found} token(s), the model needs at least {required}")]
	InsufficientStartContext { required: usize, found: usize },

	/// A training source could not be read.
	#[error("cannot read source {path:?}: {source}")]
	SourceUnreadable {
		source: std::io::Error,
		path: PathBuf,
	},

	/// Filesystem failure inside the model store.
	#[error("io error while processing {path:?}: {source}")]
	Io {
		source: std::io::Error,
		path: Option<PathBuf>,
	},

	#[error("serialization error: {0}")]
	Serialization(String),

	/// Stored bytes exist but do not decode into a model.
	#[error("model '{name}' is corrupt: {reason}")]
	CorruptModel { name: String, reason: String },
}

impl From<postcard::Error> for NGramError {
	fn from(err: postcard::Error) -> Self {
		Self::Serialization(err.to_string())
	}
}

impl NGramError {
	/// Wraps an IO error with the path it concerns.
	pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
		Self::Io { source, path }
	}

	/// Process exit code used by the command line front-end.
	pub fn exit_code(&self) -> i32 {
		match self {
			Self::ModelNotFound(_) => 3,
			Self::NameAlreadyExists(_) => 4,
			Self::SourceUnreadable { .. } => 6,
			Self::InvalidOrder { .. }
			| Self::InvalidName(_)
			| Self::OrderMismatch { .. }
			| Self::InsufficientStartContext { .. } => 2,
			Self::Io { .. } | Self::Serialization(_) | Self::CorruptModel { .. } => 1,
		}
	}
}
