use log::{debug, info};
use rand::Rng;

use crate::error::{NGramError, Result};
use crate::model::generator::{Generation, Generator, StartSeed};
use crate::model::ngram_model::{Model, ModelSummary};
use crate::store::ModelStore;
use crate::tokenizer::tokenize;

/// High-level operations over a model store.
///
/// Each method is one complete operation: it loads what it needs, works on
/// an in-memory copy, and commits to the store only once everything
/// succeeded. A failed call leaves the store as it was.
#[derive(Debug, Clone)]
pub struct Engine {
	store: ModelStore,
}

impl Engine {
	pub fn new(store: ModelStore) -> Self {
		Self { store }
	}

	/// Opens (and creates if needed) the store directory at `path`.
	pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
		Ok(Self::new(ModelStore::open(path)?))
	}

	pub fn store(&self) -> &ModelStore {
		&self.store
	}

	/// Trains a new model named `name` of order `n` on `text`.
	///
	/// # Errors
	/// - [`NGramError::InvalidName`] / [`NGramError::NameAlreadyExists`]
	/// - [`NGramError::InvalidOrder`] if `n < 2`
	pub fn train(&self, name: &str, text: &str, n: usize) -> Result<Model> {
		if self.store.exists(name)? {
			return Err(NGramError::NameAlreadyExists(name.to_owned()));
		}

		let tokens = tokenize(text);
		debug!("tokenized training source into {} token(s)", tokens.len());
		let model = Model::train(name, &tokens, n)?;
		self.store.create(&model)?;
		Ok(model)
	}

	/// Adds `text` to the existing model `name`.
	///
	/// When `n` is given it must equal the model's order.
	///
	/// # Errors
	/// - [`NGramError::ModelNotFound`]
	/// - [`NGramError::OrderMismatch`]
	pub fn tune(&self, name: &str, text: &str, n: Option<usize>) -> Result<Model> {
		let mut model = self.store.load(name)?;
		let tokens = tokenize(text);
		let windows = model.tune(&tokens, n)?;
		self.store.replace(&model)?;
		info!("tuned '{name}' with {} token(s), {windows} window(s)", tokens.len());
		Ok(model)
	}

	/// Generates up to `length` tokens from model `name`.
	///
	/// `start` is tokenized like training text; without it the walk starts
	/// from a random observed context.
	///
	/// # Errors
	/// - [`NGramError::ModelNotFound`]
	/// - [`NGramError::InsufficientStartContext`]
	pub fn generate<R: Rng>(&self, name: &str, length: usize, start: Option<&str>, rng: R) -> Result<Generation> {
		let model = self.store.load(name)?;
		let seed = match start {
			Some(text) => StartSeed::Custom(tokenize(text)),
			None => StartSeed::Random,
		};

		let mut generator = Generator::new(model.table(), rng);
		let start = generator.start_tokens(&seed)?;
		generator.generate(&start, length)
	}

	/// Names of all stored models, sorted.
	pub fn list(&self) -> Result<Vec<String>> {
		self.store.list()
	}

	pub fn delete(&self, name: &str) -> Result<()> {
		self.store.delete(name)
	}

	pub fn info(&self, name: &str) -> Result<ModelSummary> {
		Ok(self.store.load(name)?.summary())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::generator::Outcome;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use tempfile::TempDir;

	fn engine() -> (TempDir, Engine) {
		let dir = tempfile::tempdir().unwrap();
		let engine = Engine::open(dir.path().join("models")).unwrap();
		(dir, engine)
	}

	#[test]
	fn end_to_end_trigram() {
		let (_dir, engine) = engine();
		engine.train("cats", "the cat sat. the cat ran.", 3).unwrap();

		for seed in 0..10 {
			let generation = engine.generate("cats", 2, Some("the cat"), StdRng::seed_from_u64(seed)).unwrap();
			assert_eq!(generation.emitted(), 2);
			let first = generation.generated()[0].as_str();
			assert!(matches!(first, "sat" | "ran"), "unexpected {first}");
		}
	}

	#[test]
	fn train_rejects_taken_names_without_touching_them() {
		let (_dir, engine) = engine();
		let original = engine.train("cats", "the cat sat.", 2).unwrap();
		assert!(matches!(engine.train("cats", "other text", 2), Err(NGramError::NameAlreadyExists(_))));
		assert_eq!(engine.store().load("cats").unwrap(), original);
	}

	#[test]
	fn invalid_order_stores_nothing() {
		let (_dir, engine) = engine();
		assert!(matches!(engine.train("cats", "the cat", 1), Err(NGramError::InvalidOrder { n: 1 })));
		assert!(engine.list().unwrap().is_empty());
	}

	#[test]
	fn tune_persists_merged_counts() {
		let (_dir, engine) = engine();
		engine.train("cats", "the cat sat.", 3).unwrap();
		engine.tune("cats", "the cat ran.", None).unwrap();

		let model = engine.store().load("cats").unwrap();
		let after = model.table().get(&["the", "cat"]).unwrap();
		assert_eq!(after.count("sat"), 1);
		assert_eq!(after.count("ran"), 1);
		assert_eq!(model.metadata().tune_count, 1);
	}

	#[test]
	fn failed_tune_leaves_store_untouched() {
		let (_dir, engine) = engine();
		let original = engine.train("cats", "the cat sat.", 3).unwrap();
		assert!(matches!(
			engine.tune("cats", "the dog ran.", Some(2)),
			Err(NGramError::OrderMismatch { expected: 3, found: 2 })
		));
		assert_eq!(engine.store().load("cats").unwrap(), original);
		assert!(matches!(engine.tune("dogs", "woof", None), Err(NGramError::ModelNotFound(_))));
	}

	#[test]
	fn generate_reports_unseen_context() {
		let (_dir, engine) = engine();
		engine.train("cats", "the cat sat.", 2).unwrap();
		let generation = engine.generate("cats", 5, Some("The cat"), StdRng::seed_from_u64(0)).unwrap();
		assert_eq!(generation.tokens(), ["the", "cat", "sat", "."]);
		assert_eq!(generation.outcome(), &Outcome::UnseenContext(vec![".".to_owned()]));
	}

	#[test]
	fn generate_without_start_on_empty_model() {
		let (_dir, engine) = engine();
		engine.train("tiny", "hi", 2).unwrap();
		assert!(matches!(
			engine.generate("tiny", 3, None, StdRng::seed_from_u64(0)),
			Err(NGramError::InsufficientStartContext { required: 1, found: 0 })
		));
		assert!(matches!(
			engine.generate("missing", 3, None, StdRng::seed_from_u64(0)),
			Err(NGramError::ModelNotFound(_))
		));
	}

	#[test]
	fn info_summarises_stored_model() {
		let (_dir, engine) = engine();
		engine.train("cats", "the cat sat. the cat ran.", 3).unwrap();
		let summary = engine.info("cats").unwrap();
		assert_eq!(summary.name, "cats");
		assert_eq!(summary.order, 3);
		assert_eq!(summary.observations, 6);
	}
}
