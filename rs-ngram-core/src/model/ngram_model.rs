use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::frequency_table::FrequencyTable;
use super::trainer;
use crate::error::Result;
use crate::tokenizer::Token;

/// Bookkeeping carried alongside a model's table.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelMetadata {
	/// Total tokens ingested across training and every tune.
	pub corpus_tokens: u64,
	/// Number of corpora ingested (training counts as one).
	pub corpora: u32,
	/// Number of successful tunes.
	pub tune_count: u32,
	/// Unix seconds.
	pub created_at: u64,
	/// Unix seconds of the last train or tune.
	pub updated_at: u64,
}

/// A named n-gram model: a frequency table plus metadata.
///
/// # Lifecycle
/// - Created by [`Model::train`]
/// - Extended in place by [`Model::tune`]
/// - Read-only for generation
///
/// The last `n - 1` ingested tokens are kept so that a tune continues the
/// text where the previous corpus ended: training on A then tuning on B
/// counts exactly the windows of A followed by B.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Model {
	name: String,
	metadata: ModelMetadata,
	table: FrequencyTable,
	tail: Vec<Token>,
}

/// Summary of a model, as printed by `info`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelSummary {
	pub name: String,
	pub order: usize,
	pub contexts: usize,
	pub observations: u64,
	pub vocabulary: usize,
	pub metadata: ModelMetadata,
}

fn now() -> u64 {
	SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Last `len` tokens of `tokens` (all of them if shorter).
fn tail_of<S: AsRef<str>>(tokens: &[S], len: usize) -> Vec<Token> {
	tokens[tokens.len().saturating_sub(len)..].iter().map(|t| t.as_ref().to_owned()).collect()
}

impl Model {
	/// Trains a new model of order `n` from `tokens`.
	///
	/// # Errors
	/// Returns [`crate::NGramError::InvalidOrder`] if `n < 2`.
	pub fn train<S: AsRef<str>>(name: &str, tokens: &[S], n: usize) -> Result<Self> {
		let table = trainer::train(tokens, n)?;
		let tail = tail_of(tokens, table.context_len());
		let timestamp = now();
		Ok(Self {
			name: name.to_owned(),
			metadata: ModelMetadata {
				corpus_tokens: tokens.len() as u64,
				corpora: 1,
				tune_count: 0,
				created_at: timestamp,
				updated_at: timestamp,
			},
			table,
			tail,
		})
	}

	/// Adds another corpus to the model.
	///
	/// The corpus is counted as if appended to everything ingested so far,
	/// including the windows that straddle the boundary. When `n` is given
	/// it must match the model's order.
	///
	/// Returns the number of windows counted.
	///
	/// # Errors
	/// Returns [`crate::NGramError::OrderMismatch`] on a differing `n`, in which
	/// case the model is left untouched.
	pub fn tune<S: AsRef<str>>(&mut self, tokens: &[S], n: Option<usize>) -> Result<usize> {
		let joined: Vec<&str> = self.tail.iter().map(String::as_str).chain(tokens.iter().map(|t| t.as_ref())).collect();
		let windows = match n {
			Some(n) => trainer::tune_with_order(&mut self.table, &joined, n)?,
			None => trainer::tune(&mut self.table, &joined),
		};
		self.tail = tail_of(&joined, self.table.context_len());
		self.metadata.corpus_tokens += tokens.len() as u64;
		self.metadata.corpora += 1;
		self.metadata.tune_count += 1;
		self.metadata.updated_at = now();
		Ok(windows)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn set_name(&mut self, name: &str) {
		self.name = name.to_owned();
	}

	pub fn order(&self) -> usize {
		self.table.order()
	}

	pub fn table(&self) -> &FrequencyTable {
		&self.table
	}

	#[cfg(test)]
	pub(crate) fn table_mut(&mut self) -> &mut FrequencyTable {
		&mut self.table
	}

	pub fn metadata(&self) -> &ModelMetadata {
		&self.metadata
	}

	pub fn summary(&self) -> ModelSummary {
		ModelSummary {
			name: self.name.clone(),
			order: self.table.order(),
			contexts: self.table.len(),
			observations: self.table.observations(),
			vocabulary: self.table.vocabulary().len(),
			metadata: self.metadata.clone(),
		}
	}
}
