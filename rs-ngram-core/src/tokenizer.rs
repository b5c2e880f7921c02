//! Word-level tokenizer.
//!
//! Splits raw text into lowercase word tokens and single-character
//! punctuation tokens. Whitespace only separates tokens.

/// A normalized word or a single punctuation character.
pub type Token = String;

/// Returns `true` for characters that belong inside a word token.
///
/// Apostrophes (straight and typographic) are kept so that contractions
/// such as `don't` stay a single token.
fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '\'' || c == '\u{2019}'
}

/// Converts raw text into a sequence of tokens.
///
/// - Maximal runs of alphanumeric/apostrophe characters form one lowercased word
/// - Every other non-whitespace character is a token on its own (`"..."` gives three `"."`)
/// - Whitespace is discarded
///
/// Never fails; empty or blank input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<Token> {
	let mut tokens = Vec::new();
	let mut word = String::new();

	for c in text.chars() {
		if is_word_char(c) {
			word.extend(c.to_lowercase());
			continue;
		}

		if !word.is_empty() {
			tokens.push(std::mem::take(&mut word));
		}
		if !c.is_whitespace() {
			tokens.push(c.to_lowercase().collect());
		}
	}

	if !word.is_empty() {
		tokens.push(word);
	}
	tokens
}

/// Joins tokens back into text, separated by single spaces.
///
/// `tokenize(&detokenize(&tokens)) == tokens` for any tokenizer output.
pub fn detokenize<S: AsRef<str>>(tokens: &[S]) -> String {
	tokens.iter().map(|t| t.as_ref()).collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_words_and_punctuation() {
		assert_eq!(
			tokenize("Today is a nice day. I feel fine."),
			vec!["today", "is", "a", "nice", "day", ".", "i", "feel", "fine", "."]
		);
	}

	#[test]
	fn empty_and_blank_input() {
		assert!(tokenize("").is_empty());
		assert!(tokenize(" \t\n  ").is_empty());
	}

	#[test]
	fn case_insensitive() {
		assert_eq!(tokenize("THE The the"), vec!["the", "the", "the"]);
	}

	#[test]
	fn contractions_stay_whole() {
		assert_eq!(tokenize("Don't stop, it’s fine"), vec!["don't", "stop", ",", "it’s", "fine"]);
	}

	#[test]
	fn each_punctuation_mark_is_a_token() {
		assert_eq!(tokenize("wait...what?!"), vec!["wait", ".", ".", ".", "what", "?", "!"]);
	}

	#[test]
	fn unicode_words_are_lowercased() {
		assert_eq!(tokenize("Élan CAFÉ 42x"), vec!["élan", "café", "42x"]);
	}

	#[test]
	fn detokenize_is_inverse_of_tokenize() {
		let tokens = tokenize("Hello, World!  It's\tme...");
		let text = detokenize(&tokens);
		assert_eq!(text, "hello , world ! it's me . . .");
		assert_eq!(tokenize(&text), tokens);
	}
}
