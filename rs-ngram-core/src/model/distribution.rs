use std::collections::BTreeMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::tokenizer::Token;

/// Next-token distribution of a single context.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate next-token occurrences during training and tuning
/// - Sample the next token using weighted random sampling
/// - Merge with the distribution of the same context from another table
///
/// ## Invariants
/// - Each count is strictly positive
/// - Entries are kept sorted by token, so sampling with a seeded
///   random source is reproducible across processes
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Distribution {
	/// Example: { "sat" => 42, "ran" => 3 }
	counts: BTreeMap<Token, u64>,
}

impl Distribution {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one more occurrence of `token`.
	pub fn add(&mut self, token: &str) {
		self.add_count(token, 1);
	}

	/// Adds `count` occurrences of `token`. A zero count is ignored.
	pub fn add_count(&mut self, token: &str, count: u64) {
		if count == 0 {
			return;
		}
		match self.counts.get_mut(token) {
			Some(existing) => *existing += count,
			None => {
				self.counts.insert(token.to_owned(), count);
			}
		}
	}

	/// Number of times `token` was observed, 0 if never.
	pub fn count(&self, token: &str) -> u64 {
		self.counts.get(token).copied().unwrap_or(0)
	}

	/// Sum of all counts.
	pub fn total(&self) -> u64 {
		self.counts.values().sum()
	}

	/// Sum of all counts, `None` if it does not fit in a `u64`.
	pub fn checked_total(&self) -> Option<u64> {
		self.counts.values().try_fold(0u64, |total, count| total.checked_add(*count))
	}

	/// Builds a distribution from raw counts, bypassing the positivity check.
	#[cfg(test)]
	pub(crate) fn from_counts(counts: BTreeMap<Token, u64>) -> Self {
		Self { counts }
	}

	/// Number of distinct next tokens.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates `(token, count)` pairs in token order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.counts.iter().map(|(token, count)| (token.as_str(), *count))
	}

	/// Samples a token with probability proportional to its count.
	///
	/// One uniform draw in `[0, total)` is walked down the running
	/// prefix sum of the counts.
	///
	/// Returns `None` if the distribution is empty.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (token, count) in &self.counts {
			if r < *count {
				return Some(token.as_str());
			}
			r -= count;
		}

		// Unreachable while the counts sum to `total`
		None
	}

	/// Adds every count of `other` to this distribution.
	pub fn merge(&mut self, other: &Self) {
		for (token, count) in &other.counts {
			self.add_count(token, *count);
		}
	}
}
