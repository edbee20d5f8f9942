use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::precision::Precision;
use super::frequency::FrequencyTable;
use super::ngram::{NGram, Order};

/// Relative-frequency (Maximum Likelihood) probabilities of one order.
///
/// Every entry of the source frequency table gets a probability, so
/// unigrams include the zero-count vocabulary words and bigrams only the
/// observed pairs. Values are rounded to the configured precision.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MleTable {
	order: Order,
	probabilities: HashMap<NGram, f64>,
}

impl MleTable {
	/// `P(w) = count(w) / N` for every unigram of `unigrams`.
	pub fn unigrams(unigrams: &FrequencyTable, precision: Precision) -> Self {
		let sample_size = unigrams.sample_size();
		let probabilities = unigrams
			.iter()
			.map(|(ngram, count)| (ngram.clone(), precision.round(ratio(count, sample_size))))
			.collect();

		debug!("unigram MLE over sample size {sample_size}");
		Self { order: Order::Unigram, probabilities }
	}

	/// `P(w1 w2) = count(w1 w2) / count(w1) * count(w1) / N` for every
	/// observed bigram, where `N` is the unigram sample size (the number of
	/// tokens), so the second factor is the unigram relative frequency.
	///
	/// The two factors reduce to `count(w1 w2) / N`. A leading word with a
	/// zero unigram count yields a probability of 0.
	pub fn bigrams(bigrams: &FrequencyTable, unigrams: &FrequencyTable, precision: Precision) -> Self {
		let sample_size = unigrams.sample_size();
		let probabilities = bigrams
			.iter()
			.map(|(ngram, count)| {
				let leading = unigrams.count_words(&ngram.words()[..1]);
				let probability = if leading == 0 {
					0.0
				} else {
					ratio(count, leading) * ratio(leading, sample_size)
				};
				(ngram.clone(), precision.round(probability))
			})
			.collect();

		debug!("bigram MLE over sample size {sample_size}");
		Self { order: Order::Bigram, probabilities }
	}

	pub fn order(&self) -> Order {
		self.order
	}

	/// Returns the probability of `ngram`, 0 when it has no entry.
	pub fn get(&self, ngram: &NGram) -> f64 {
		self.probabilities.get(ngram).copied().unwrap_or(0.0)
	}

	/// Iterates over `(n-gram, probability)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&NGram, f64)> {
		self.probabilities.iter().map(|(ngram, p)| (ngram, *p))
	}

	/// Entries holding one of the `n` highest distinct probabilities.
	///
	/// Sorted by probability descending, then by n-gram ascending. Ties on
	/// the last kept value are all included, so more than `n` rows may come
	/// back.
	pub fn top(&self, n: usize) -> Vec<(&NGram, f64)> {
		let mut rows: Vec<(&NGram, f64)> = self.iter().collect();
		rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

		let mut distinct = 0;
		let mut last = None;
		rows.into_iter()
			.take_while(|(_, p)| {
				if last != Some(*p) {
					distinct += 1;
					last = Some(*p);
				}
				distinct <= n
			})
			.collect()
	}

	pub fn len(&self) -> usize {
		self.probabilities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.probabilities.is_empty()
	}
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
	if denominator == 0 {
		return 0.0;
	}
	numerator as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::corpus::{Corpus, Vocabulary};

	fn precision(digits: u32) -> Precision {
		Precision::new(digits).unwrap()
	}

	#[test]
	fn unigram_probabilities_are_rounded_relative_frequencies() {
		let corpus = Corpus::from_tokens(["a", "a", "b"]);
		let vocabulary = Vocabulary::from_words(["a", "b", "c"]);
		let unigrams = FrequencyTable::extract(&corpus, &vocabulary, Order::Unigram);
		let mle = MleTable::unigrams(&unigrams, precision(3));

		assert_eq!(mle.get(&NGram::unigram("a")), 0.667);
		assert_eq!(mle.get(&NGram::unigram("b")), 0.333);
		assert_eq!(mle.get(&NGram::unigram("c")), 0.0);
		assert_eq!(mle.len(), 3);
	}

	#[test]
	fn bigram_probabilities_reduce_to_joint_frequency() {
		let corpus = Corpus::from_tokens(["a", "b", "a", "b", "c"]);
		let vocabulary = Vocabulary::from_words(["a", "b", "c"]);
		let unigrams = FrequencyTable::extract(&corpus, &vocabulary, Order::Unigram);
		let bigrams = FrequencyTable::extract(&corpus, &vocabulary, Order::Bigram);
		let mle = MleTable::bigrams(&bigrams, &unigrams, precision(4));

		// N is the token count (5), not the number of pairs (4)
		assert_eq!(mle.get(&NGram::bigram("a", "b")), 0.4);
		assert_eq!(mle.get(&NGram::bigram("b", "a")), 0.2);
		assert_eq!(mle.get(&NGram::bigram("b", "c")), 0.2);
		assert_eq!(mle.get(&NGram::bigram("c", "a")), 0.0);
		assert_eq!(mle.len(), 3);
	}

	#[test]
	fn bigram_second_factor_is_the_unigram_relative_frequency() {
		let corpus = Corpus::from_tokens(["a", "b", "a"]);
		let vocabulary = Vocabulary::from_corpora([&corpus]);
		let unigrams = FrequencyTable::extract(&corpus, &vocabulary, Order::Unigram);
		let bigrams = FrequencyTable::extract(&corpus, &vocabulary, Order::Bigram);
		let mle = MleTable::bigrams(&bigrams, &unigrams, precision(3));

		// (1 / 1) * (1 / 3) and (1 / 2) * (2 / 3)
		assert_eq!(mle.get(&NGram::bigram("b", "a")), 0.333);
		assert_eq!(mle.get(&NGram::bigram("a", "b")), 0.333);
	}

	#[test]
	fn top_keeps_ties_of_distinct_values() {
		let corpus = Corpus::from_tokens(["a", "a", "a", "b", "b", "c", "c", "d"]);
		let vocabulary = Vocabulary::from_corpora([&corpus]);
		let unigrams = FrequencyTable::extract(&corpus, &vocabulary, Order::Unigram);
		let mle = MleTable::unigrams(&unigrams, precision(3));

		let top: Vec<(String, f64)> = mle.top(2).into_iter().map(|(g, p)| (g.to_string(), p)).collect();
		assert_eq!(top, [("a".to_owned(), 0.375), ("b".to_owned(), 0.25), ("c".to_owned(), 0.25)]);
		assert_eq!(mle.top(10).len(), 4);
	}

	#[test]
	fn unknown_leading_word_yields_zero() {
		// The unigram table comes from a different corpus on purpose
		let vocabulary = Vocabulary::from_words(["a", "b"]);
		let unigrams = FrequencyTable::extract(&Corpus::from_tokens(["b"]), &vocabulary, Order::Unigram);
		let bigrams = FrequencyTable::extract(&Corpus::from_tokens(["a", "b"]), &vocabulary, Order::Bigram);
		let mle = MleTable::bigrams(&bigrams, &unigrams, precision(2));
		assert_eq!(mle.get(&NGram::bigram("a", "b")), 0.0);
	}
}
