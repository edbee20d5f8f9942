use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Order of an n-gram model: how many consecutive tokens form one key.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Order {
	Unigram,
	Bigram,
}

impl Order {
	/// Every supported order, lowest first.
	pub const ALL: [Order; 2] = [Order::Unigram, Order::Bigram];

	/// Number of tokens in one n-gram of this order.
	pub fn size(self) -> usize {
		match self {
			Order::Unigram => 1,
			Order::Bigram => 2,
		}
	}
}

impl fmt::Display for Order {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Order::Unigram => write!(f, "unigram"),
			Order::Bigram => write!(f, "bigram"),
		}
	}
}

/// An ordered tuple of consecutive tokens.
///
/// Equality, hashing and ordering are by value, word by word.
///
/// # Invariants
/// - Holds at least one word
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NGram(Vec<String>);

impl NGram {
	/// Builds an n-gram from its words.
	///
	/// Returns `None` if `words` is empty.
	pub fn new<I, S>(words: I) -> Option<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let words: Vec<String> = words.into_iter().map(Into::into).collect();
		if words.is_empty() { None } else { Some(Self(words)) }
	}

	/// Builds an n-gram from a borrowed window of tokens.
	pub(crate) fn from_window(window: &[String]) -> Self {
		Self(window.to_vec())
	}

	pub fn unigram(word: &str) -> Self {
		Self(vec![word.to_owned()])
	}

	pub fn bigram(first: &str, second: &str) -> Self {
		Self(vec![first.to_owned(), second.to_owned()])
	}

	pub fn words(&self) -> &[String] {
		&self.0
	}

	/// Leading word of the n-gram.
	pub fn first(&self) -> &str {
		&self.0[0]
	}
}

impl fmt::Display for NGram {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.join(" "))
	}
}

/// Lets tables keyed by `NGram` be queried with a borrowed token window.
impl Borrow<[String]> for NGram {
	fn borrow(&self) -> &[String] {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_joins_words() {
		assert_eq!(NGram::bigram("new", "york").to_string(), "new york");
		assert_eq!(NGram::unigram("york").to_string(), "york");
	}

	#[test]
	fn empty_ngram_is_rejected() {
		assert!(NGram::new(Vec::<String>::new()).is_none());
		assert_eq!(NGram::new(["a", "b"]), Some(NGram::bigram("a", "b")));
	}

	#[test]
	fn ordering_is_word_by_word() {
		assert!(NGram::bigram("a", "z") < NGram::bigram("b", "a"));
		assert_eq!(NGram::bigram("a", "b").first(), "a");
		assert_eq!(Order::Bigram.size(), 2);
	}
}
