use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Normalizes raw text into lowercase alphabetic tokens.
///
/// - Converts every character to lowercase
/// - Replaces every character outside `a..=z` by a space
/// - Splits on whitespace, dropping empty pieces
///
/// Example: `"Don't PANIC!"` → `["don", "t", "panic"]`
pub fn normalize(text: &str) -> Vec<String> {
	let cleaned: String = text
		.chars()
		.flat_map(char::to_lowercase)
		.map(|c| if c.is_ascii_lowercase() { c } else { ' ' })
		.collect();
	cleaned.split_whitespace().map(str::to_owned).collect()
}

/// Ordered sequence of normalized tokens.
///
/// A corpus is immutable once built: estimators only borrow its tokens.
/// Several corpora can be concatenated into one; adjacent parts are joined
/// without any boundary marker, so a bigram may span two parts.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
	tokens: Vec<String>,
}

impl Corpus {
	/// Builds a corpus from raw text, normalizing it first.
	pub fn from_text(text: &str) -> Self {
		Self { tokens: normalize(text) }
	}

	/// Builds a corpus from tokens that are already normalized.
	pub fn from_tokens<I, S>(tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { tokens: tokens.into_iter().map(Into::into).collect() }
	}

	/// Concatenates corpora in order.
	pub fn concat<'a, I>(parts: I) -> Self
	where
		I: IntoIterator<Item = &'a Corpus>,
	{
		let tokens = parts.into_iter().flat_map(|part| part.tokens.iter().cloned()).collect();
		Self { tokens }
	}

	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}

/// Set of distinct word types tracked by the model.
///
/// Every vocabulary word gets an explicit unigram entry, even when it never
/// occurs in the corpus. Kept sorted so tables built from it are
/// deterministic.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
	words: BTreeSet<String>,
}

impl Vocabulary {
	/// Builds a vocabulary from any sequence of words (duplicates are ignored).
	pub fn from_words<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { words: words.into_iter().map(Into::into).collect() }
	}

	/// Builds a vocabulary from the word types of one or more corpora.
	pub fn from_corpora<'a, I>(corpora: I) -> Self
	where
		I: IntoIterator<Item = &'a Corpus>,
	{
		Self::from_words(corpora.into_iter().flat_map(|corpus| corpus.tokens().iter().cloned()))
	}

	pub fn contains(&self, word: &str) -> bool {
		self.words.contains(word)
	}

	/// Iterates over the words in ascending order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.words.iter().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}
}
