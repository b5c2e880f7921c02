use log::debug;

use super::frequency_table::FrequencyTable;
use crate::error::{NGramError, Result};

/// Builds a fresh table of order `n` from a token sequence.
///
/// # Errors
/// Returns [`NGramError::InvalidOrder`] if `n < 2`.
pub fn train<S: AsRef<str>>(tokens: &[S], n: usize) -> Result<FrequencyTable> {
	let mut table = FrequencyTable::new(n)?;
	let windows = table.add_tokens(tokens);
	debug!("trained order-{n} table on {} token(s): {windows} window(s), {} context(s)", tokens.len(), table.len());
	Ok(table)
}

/// Adds the windows of a token sequence to an existing table.
///
/// Counts are added to existing entries. Only windows inside `tokens` are
/// counted; [`crate::Model::tune`] prefixes the previous corpus's tail to
/// also count the windows across the boundary.
///
/// Returns the number of windows counted.
pub fn tune<S: AsRef<str>>(table: &mut FrequencyTable, tokens: &[S]) -> usize {
	let before = table.len();
	let windows = table.add_tokens(tokens);
	debug!("tuned order-{} table: {windows} window(s), {} new context(s)", table.order(), table.len() - before);
	windows
}

/// Same as [`tune`], first checking that the caller expects the table's order.
///
/// # Errors
/// Returns [`NGramError::OrderMismatch`] if `n` differs from the table order.
pub fn tune_with_order<S: AsRef<str>>(table: &mut FrequencyTable, tokens: &[S], n: usize) -> Result<usize> {
	if table.order() != n {
		return Err(NGramError::OrderMismatch { expected: table.order(), found: n });
	}
	Ok(tune(table, tokens))
}
