use log::debug;
use rand::Rng;

use super::frequency_table::{Context, FrequencyTable};
use crate::error::{NGramError, Result};
use crate::tokenizer::{Token, detokenize};

/// Strategy used to select the starting context.
///
/// # Variants
/// - `Random`: start from a context picked among the observed ones.
/// - `Custom(tokens)`: start from the given tokens; the last `n - 1` of
///   them form the first context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartSeed {
	Random,
	Custom(Vec<Token>),
}

/// Why a generation stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
	/// The requested number of tokens was emitted.
	Completed,
	/// The current context was never observed in training, so generation
	/// stopped early. Carries the missing context.
	UnseenContext(Context),
}

/// Result of a generation: the seed tokens followed by the emitted ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generation {
	tokens: Vec<Token>,
	seed_len: usize,
	requested: usize,
	outcome: Outcome,
}

impl Generation {
	/// Seed tokens followed by generated tokens.
	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	pub fn into_tokens(self) -> Vec<Token> {
		self.tokens
	}

	/// The seed part of the output.
	pub fn seed(&self) -> &[Token] {
		&self.tokens[..self.seed_len]
	}

	/// Only the tokens produced by sampling.
	pub fn generated(&self) -> &[Token] {
		&self.tokens[self.seed_len..]
	}

	pub fn emitted(&self) -> usize {
		self.tokens.len() - self.seed_len
	}

	pub fn requested(&self) -> usize {
		self.requested
	}

	pub fn outcome(&self) -> &Outcome {
		&self.outcome
	}

	/// `true` when the requested length was reached.
	pub fn is_complete(&self) -> bool {
		self.outcome == Outcome::Completed
	}

	/// Whole output joined with single spaces.
	pub fn text(&self) -> String {
		detokenize(&self.tokens)
	}
}

/// Autoregressive sampler over a frequency table.
///
/// # Responsibilities
/// - Validate and normalize the start sequence
/// - Sample each next token from the distribution of the last `n - 1` tokens
/// - Stop on an unseen context instead of inventing a token
///
/// The random source is owned by the generator, so a seeded source gives
/// reproducible output.
#[derive(Debug)]
pub struct Generator<'a, R> {
	table: &'a FrequencyTable,
	rng: R,
}

impl<'a, R: Rng> Generator<'a, R> {
	pub fn new(table: &'a FrequencyTable, rng: R) -> Self {
		Self { table, rng }
	}

	/// Samples one next token for `context`.
	///
	/// Returns `None` if the context is unseen.
	pub fn predict<S: AsRef<str>>(&mut self, context: &[S]) -> Option<Token> {
		self.table.get(context)?.sample(&mut self.rng).map(str::to_owned)
	}

	/// Resolves a [`StartSeed`] into normalized start tokens.
	///
	/// # Errors
	/// Returns [`NGramError::InsufficientStartContext`] when a random start is
	/// requested from an empty table.
	pub fn start_tokens(&mut self, seed: &StartSeed) -> Result<Vec<Token>> {
		match seed {
			StartSeed::Custom(tokens) => Ok(tokens.iter().map(|t| t.to_lowercase()).collect()),
			StartSeed::Random => match self.table.random_context(&mut self.rng) {
				Some(context) => Ok(context.clone()),
				None => Err(NGramError::InsufficientStartContext {
					required: self.table.context_len(),
					found: 0,
				}),
			},
		}
	}

	/// Starts a lazy walk from `start`.
	///
	/// The walk yields generated tokens (not the seed) until it meets an
	/// unseen context, and never ends otherwise.
	///
	/// # Errors
	/// Returns [`NGramError::InsufficientStartContext`] if `start` holds fewer
	/// than `n - 1` tokens.
	pub fn walk<S: AsRef<str>>(&mut self, start: &[S]) -> Result<Walk<'_, 'a, R>> {
		let required = self.table.context_len();
		if start.len() < required {
			return Err(NGramError::InsufficientStartContext { required, found: start.len() });
		}

		let context: Context = start[start.len() - required..]
			.iter()
			.map(|t| t.as_ref().to_lowercase())
			.collect();
		Ok(Walk { generator: self, context, halted: None })
	}

	/// Generates up to `length` tokens after `start`.
	///
	/// The output begins with the normalized `start` tokens verbatim.
	/// Fewer than `length` tokens are emitted only when an unseen context is
	/// reached, which [`Generation::outcome`] reports.
	///
	/// # Errors
	/// Returns [`NGramError::InsufficientStartContext`] if `start` holds fewer
	/// than `n - 1` tokens.
	pub fn generate<S: AsRef<str>>(&mut self, start: &[S], length: usize) -> Result<Generation> {
		let mut tokens: Vec<Token> = start.iter().map(|t| t.as_ref().to_lowercase()).collect();
		let seed_len = tokens.len();

		let mut walk = self.walk(start)?;
		tokens.extend(walk.by_ref().take(length));

		let outcome = match walk.halted.take() {
			Some(context) => {
				debug!("generation halted on unseen context {context:?} after {} of {length} token(s)", tokens.len() - seed_len);
				Outcome::UnseenContext(context)
			}
			None => Outcome::Completed,
		};

		Ok(Generation { tokens, seed_len, requested: length, outcome })
	}
}

/// Lazy token stream returned by [`Generator::walk`].
#[derive(Debug)]
pub struct Walk<'g, 'a, R> {
	generator: &'g mut Generator<'a, R>,
	context: Context,
	halted: Option<Context>,
}

impl<R> Walk<'_, '_, R> {
	/// The context the walk stopped on, once it has stopped.
	pub fn halted_on(&self) -> Option<&Context> {
		self.halted.as_ref()
	}
}

impl<R: Rng> Iterator for Walk<'_, '_, R> {
	type Item = Token;

	fn next(&mut self) -> Option<Token> {
		if self.halted.is_some() {
			return None;
		}

		match self.generator.predict(&self.context) {
			Some(token) => {
				// Slide the window: drop the oldest, append the new token
				self.context.remove(0);
				self.context.push(token.clone());
				Some(token)
			}
			None => {
				self.halted = Some(self.context.clone());
				None
			}
		}
	}
}
