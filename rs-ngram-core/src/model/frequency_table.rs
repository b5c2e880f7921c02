use std::collections::{BTreeSet, HashMap};

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::distribution::Distribution;
use crate::error::{NGramError, Result};
use crate::tokenizer::Token;

/// Ordered tuple of `n - 1` tokens preceding a prediction.
pub type Context = Vec<Token>;

/// Counts of next tokens for every context of a fixed order `n`.
///
/// # Responsibilities
/// - Count every `n`-token window of a token sequence
/// - Look up the next-token distribution of a context
/// - Merge with another table of the same order `n`
///
/// # Invariants
/// - `n` is always >= 2
/// - Every key in `contexts` has exactly `n - 1` tokens
/// - Counts only grow: nothing is ever decremented or removed
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FrequencyTable {
	/// The order of the table (number of tokens in a window)
	n: usize,

	/// Mapping from a context (length n-1) to what followed it
	contexts: HashMap<Context, Distribution>,
}

impl FrequencyTable {
	/// Creates an empty table of order `n`.
	///
	/// # Errors
	/// Returns [`NGramError::InvalidOrder`] if `n < 2`.
	pub fn new(n: usize) -> Result<Self> {
		if n < 2 {
			return Err(NGramError::InvalidOrder { n });
		}
		Ok(Self { n, contexts: HashMap::new() })
	}

	/// Order of the table.
	pub fn order(&self) -> usize {
		self.n
	}

	/// Length of every context in the table (`n - 1`).
	pub fn context_len(&self) -> usize {
		self.n - 1
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.contexts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.contexts.is_empty()
	}

	/// Adds every `n`-token window of `tokens` to the table.
	///
	/// Returns the number of windows counted. A sequence shorter than `n`
	/// contributes nothing.
	pub fn add_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) -> usize {
		if tokens.len() < self.n {
			debug!("{} token(s) is shorter than n = {}, nothing to count", tokens.len(), self.n);
			return 0;
		}

		let mut windows = 0;
		for window in tokens.windows(self.n) {
			let (context, next) = window.split_at(self.n - 1);
			let context: Context = context.iter().map(|t| t.as_ref().to_owned()).collect();
			self.contexts.entry(context).or_default().add(next[0].as_ref());
			windows += 1;
		}
		windows
	}

	/// Returns the distribution observed after `context`, if any.
	pub fn get<S: AsRef<str>>(&self, context: &[S]) -> Option<&Distribution> {
		if context.len() != self.context_len() {
			return None;
		}
		let key: Context = context.iter().map(|t| t.as_ref().to_owned()).collect();
		self.contexts.get(&key)
	}

	/// Iterates every context with its distribution, in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&Context, &Distribution)> {
		self.contexts.iter()
	}

	/// Total number of windows counted into the table.
	pub fn observations(&self) -> u64 {
		self.contexts.values().map(Distribution::total).sum()
	}

	/// Distinct tokens appearing anywhere in the table.
	pub fn vocabulary(&self) -> BTreeSet<&str> {
		let mut vocabulary = BTreeSet::new();
		for (context, distribution) in &self.contexts {
			vocabulary.extend(context.iter().map(String::as_str));
			vocabulary.extend(distribution.iter().map(|(token, _)| token));
		}
		vocabulary
	}

	/// Picks one observed context uniformly at random.
	///
	/// Contexts are sorted before drawing so a seeded random source always
	/// picks the same one. Returns `None` for an empty table.
	pub fn random_context<R: Rng>(&self, rng: &mut R) -> Option<&Context> {
		if self.contexts.is_empty() {
			return None;
		}
		let mut keys: Vec<&Context> = self.contexts.keys().collect();
		keys.sort();
		Some(keys[rng.random_range(0..keys.len())])
	}

	/// Sets the distribution of `context`, bypassing counting.
	#[cfg(test)]
	pub(crate) fn insert(&mut self, context: Context, distribution: Distribution) {
		self.contexts.insert(context, distribution);
	}

	/// Merges another table into this one.
	///
	/// # Notes
	/// - Both tables must have the same order `n`.
	/// - Counts for matching contexts and tokens are summed.
	///
	/// # Errors
	/// Returns [`NGramError::OrderMismatch`] if the orders differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.n != other.n {
			return Err(NGramError::OrderMismatch { expected: self.n, found: other.n });
		}

		for (key, distribution) in &other.contexts {
			if let Some(existing) = self.contexts.get_mut(key) {
				existing.merge(distribution);
			} else {
				self.contexts.insert(key.clone(), distribution.clone());
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tokenizer::tokenize;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn rejects_orders_below_two() {
		assert!(matches!(FrequencyTable::new(0), Err(NGramError::InvalidOrder { n: 0 })));
		assert!(matches!(FrequencyTable::new(1), Err(NGramError::InvalidOrder { n: 1 })));
		assert!(FrequencyTable::new(2).is_ok());
	}

	#[test]
	fn counts_sliding_windows() {
		let mut table = FrequencyTable::new(3).unwrap();
		let windows = table.add_tokens(&tokenize("the cat sat. the cat ran."));
		assert_eq!(windows, 6);

		let after_the_cat = table.get(&["the", "cat"]).unwrap();
		assert_eq!(after_the_cat.count("sat"), 1);
		assert_eq!(after_the_cat.count("ran"), 1);
		assert_eq!(after_the_cat.total(), 2);
		assert_eq!(table.observations(), 6);
		assert!(table.iter().all(|(context, _)| context.len() == 2));
	}

	#[test]
	fn short_input_gives_empty_table() {
		let mut table = FrequencyTable::new(4).unwrap();
		assert_eq!(table.add_tokens(&["a", "b", "c"]), 0);
		assert!(table.is_empty());
		assert_eq!(table.observations(), 0);
	}

	#[test]
	fn lookup_with_wrong_length_finds_nothing() {
		let mut table = FrequencyTable::new(3).unwrap();
		table.add_tokens(&["a", "b", "c"]);
		assert!(table.get(&["b"]).is_none());
		assert!(table.get(&["a", "b"]).is_some());
	}

	#[test]
	fn merge_requires_same_order() {
		let mut bigram = FrequencyTable::new(2).unwrap();
		let trigram = FrequencyTable::new(3).unwrap();
		assert!(matches!(
			bigram.merge(&trigram),
			Err(NGramError::OrderMismatch { expected: 2, found: 3 })
		));
	}

	#[test]
	fn merge_equals_counting_both() {
		let a = tokenize("one two three two three");
		let b = tokenize("two three one");

		let mut merged = FrequencyTable::new(2).unwrap();
		merged.add_tokens(&a);
		let mut other = FrequencyTable::new(2).unwrap();
		other.add_tokens(&b);
		merged.merge(&other).unwrap();

		let mut expected = FrequencyTable::new(2).unwrap();
		expected.add_tokens(&a);
		expected.add_tokens(&b);
		assert_eq!(merged, expected);
	}

	#[test]
	fn vocabulary_collects_all_tokens() {
		let mut table = FrequencyTable::new(2).unwrap();
		table.add_tokens(&tokenize("a b a c"));
		assert_eq!(table.vocabulary().into_iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
	}

	#[test]
	fn random_context_is_reproducible() {
		let mut table = FrequencyTable::new(2).unwrap();
		table.add_tokens(&tokenize("a b c d e f g"));
		let first = table.random_context(&mut StdRng::seed_from_u64(5)).cloned();
		let second = table.random_context(&mut StdRng::seed_from_u64(5)).cloned();
		assert!(first.is_some());
		assert_eq!(first, second);
		assert!(FrequencyTable::new(2).unwrap().random_context(&mut StdRng::seed_from_u64(5)).is_none());
	}
}
