use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, Vocabulary};
use super::ngram::{NGram, Order};

/// Chunks per CPU when counting in parallel.
const CHUNK_FACTOR: usize = 4;

/// Below this many windows, counting stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 1 << 16;

/// Occurrence counts of every n-gram of one order in a corpus.
///
/// # Responsibilities
/// - Count overlapping windows of `order.size()` tokens in a single pass
/// - Materialize a zero entry for every vocabulary word absent from the
///   corpus (unigrams only)
/// - Track the number of unseen bigrams as a single scalar, since the
///   `|V|²` key space is too large to enumerate
///
/// # Invariants
/// - `sample_size` is the sum of all counts: the corpus length for
///   unigrams, the corpus length minus one for bigrams
/// - Bigram entries all have a count >= 1
/// - The table is never mutated after extraction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FrequencyTable {
	/// Order of every key in `counts`.
	order: Order,

	/// Mapping from an n-gram to its number of occurrences.
	counts: HashMap<NGram, u64>,

	/// Total number of counted windows.
	sample_size: u64,

	/// Number of n-grams of the key space that were never observed.
	zero_count: u64,
}

impl FrequencyTable {
	/// Counts every n-gram of `order` in `corpus`.
	///
	/// - Tokens outside `vocabulary` are still counted under their own key
	/// - Work is split across `num_cpus` chunks when the corpus is large;
	///   the result is identical to a sequential count
	pub fn extract(corpus: &Corpus, vocabulary: &Vocabulary, order: Order) -> Self {
		let windows = count_windows(corpus.tokens(), order.size());
		let sample_size: u64 = windows.values().sum();

		let mut counts: HashMap<NGram, u64> = windows
			.into_iter()
			.map(|(window, count)| (NGram::from_window(window), count))
			.collect();

		let zero_count = match order {
			Order::Unigram => {
				let out_of_vocabulary = counts.keys().filter(|ngram| !vocabulary.contains(ngram.first())).count();
				if out_of_vocabulary > 0 {
					warn!("{out_of_vocabulary} corpus word type(s) are missing from the vocabulary");
				}

				let mut unseen = 0;
				for word in vocabulary.iter() {
					counts.entry(NGram::unigram(word)).or_insert_with(|| {
						unseen += 1;
						0
					});
				}
				unseen
			}
			Order::Bigram => {
				let vocabulary_size = vocabulary.len() as u64;
				vocabulary_size.saturating_mul(vocabulary_size).saturating_sub(counts.len() as u64)
			}
		};

		debug!(
			"{order} table: {} entries, sample size {sample_size}, {zero_count} unseen",
			counts.len()
		);

		Self { order, counts, sample_size, zero_count }
	}

	pub fn order(&self) -> Order {
		self.order
	}

	/// Returns the count of `ngram`, 0 when it was never observed.
	pub fn get(&self, ngram: &NGram) -> u64 {
		self.count_words(ngram.words())
	}

	/// Same as `get`, from the borrowed words of an n-gram.
	pub(crate) fn count_words(&self, words: &[String]) -> u64 {
		self.counts.get(words).copied().unwrap_or(0)
	}

	/// Sum of all counts (N).
	pub fn sample_size(&self) -> u64 {
		self.sample_size
	}

	/// Number of n-grams with a zero count.
	///
	/// For unigrams this is the number of materialized zero entries; for
	/// bigrams it is derived as `|V|² - observed()`.
	pub fn zero_count(&self) -> u64 {
		self.zero_count
	}

	/// Number of distinct n-grams observed at least once.
	pub fn observed(&self) -> usize {
		self.counts.values().filter(|&&count| count > 0).count()
	}

	/// Number of materialized entries, zero counts included.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(n-gram, count)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&NGram, u64)> {
		self.counts.iter().map(|(ngram, count)| (ngram, *count))
	}
}

/// Counts every window of `n` consecutive tokens.
///
/// Large inputs are split into chunks of window start positions; each
/// chunk borrows its tokens plus the `n - 1` following ones so that no
/// window is lost or counted twice. Partial counts come back over a channel
/// and are summed.
fn count_windows(tokens: &[String], n: usize) -> HashMap<&[String], u64> {
	let windows = (tokens.len() + 1).saturating_sub(n);
	if windows < PARALLEL_THRESHOLD {
		return count_sequential(tokens, n);
	}

	let chunks = num_cpus::get() * CHUNK_FACTOR;
	let chunk_size = windows.div_ceil(chunks);

	thread::scope(|scope| {
		let (tx, rx) = mpsc::channel();
		for start in (0..windows).step_by(chunk_size) {
			let end = (start + chunk_size).min(windows);
			let slice = &tokens[start..end + n - 1];
			let tx = tx.clone();
			scope.spawn(move || {
				// The receiver outlives every worker of the scope
				let _ = tx.send(count_sequential(slice, n));
			});
		}
		drop(tx);

		let mut total = HashMap::new();
		for partial in rx.iter() {
			merge(&mut total, partial);
		}
		total
	})
}

fn count_sequential(tokens: &[String], n: usize) -> HashMap<&[String], u64> {
	let mut counts = HashMap::new();
	for window in tokens.windows(n) {
		*counts.entry(window).or_insert(0) += 1;
	}
	counts
}

/// Sums the occurrences of `other` into `total`.
fn merge<'a>(total: &mut HashMap<&'a [String], u64>, other: HashMap<&'a [String], u64>) {
	if total.is_empty() {
		*total = other;
		return;
	}
	for (window, count) in other {
		*total.entry(window).or_insert(0) += count;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_owned).collect()
	}

	#[test]
	fn unigrams_include_unseen_vocabulary_words() {
		let corpus = Corpus::from_tokens(["a", "a", "b"]);
		let vocabulary = Vocabulary::from_words(["a", "b", "c"]);
		let table = FrequencyTable::extract(&corpus, &vocabulary, Order::Unigram);

		assert_eq!(table.get(&NGram::unigram("a")), 2);
		assert_eq!(table.get(&NGram::unigram("b")), 1);
		assert_eq!(table.get(&NGram::unigram("c")), 0);
		assert_eq!(table.len(), 3);
		assert_eq!(table.observed(), 2);
		assert_eq!(table.zero_count(), 1);
		assert_eq!(table.sample_size(), 3);
	}

	#[test]
	fn bigrams_only_materialize_observed_pairs() {
		let corpus = Corpus::from_tokens(["a", "b", "a", "b", "c"]);
		let vocabulary = Vocabulary::from_words(["a", "b", "c"]);
		let table = FrequencyTable::extract(&corpus, &vocabulary, Order::Bigram);

		assert_eq!(table.get(&NGram::bigram("a", "b")), 2);
		assert_eq!(table.get(&NGram::bigram("b", "a")), 1);
		assert_eq!(table.get(&NGram::bigram("b", "c")), 1);
		assert_eq!(table.get(&NGram::bigram("c", "a")), 0);
		assert_eq!(table.len(), 3);
		assert_eq!(table.sample_size(), 4);
		assert_eq!(table.zero_count(), 9 - 3);
	}

	#[test]
	fn out_of_vocabulary_tokens_are_counted() {
		let corpus = Corpus::from_tokens(["a", "x", "a"]);
		let vocabulary = Vocabulary::from_words(["a"]);
		let table = FrequencyTable::extract(&corpus, &vocabulary, Order::Unigram);
		assert_eq!(table.get(&NGram::unigram("x")), 1);
		assert_eq!(table.sample_size(), 3);
	}

	#[test]
	fn single_token_has_no_bigram() {
		let corpus = Corpus::from_tokens(["a"]);
		let vocabulary = Vocabulary::from_words(["a"]);
		let table = FrequencyTable::extract(&corpus, &vocabulary, Order::Bigram);
		assert!(table.is_empty());
		assert_eq!(table.sample_size(), 0);
		assert_eq!(table.zero_count(), 1);
	}

	#[test]
	fn parallel_count_matches_sequential() {
		let words = ["the", "cat", "sat", "on", "mat", "and", "the", "dog"];
		let text: Vec<String> = (0..PARALLEL_THRESHOLD * 2 + 17)
			.map(|i| words[(i * 7 + i / 3) % words.len()].to_owned())
			.collect();

		for n in 1..=2 {
			let parallel = count_windows(&text, n);
			let sequential = count_sequential(&text, n);
			assert_eq!(parallel, sequential);
			assert_eq!(parallel.values().sum::<u64>() as usize, text.len() + 1 - n);
		}
	}

	#[test]
	fn merge_sums_counts() {
		let left = tokens("a b a");
		let right = tokens("a c");
		let mut total = count_sequential(&left, 1);
		merge(&mut total, count_sequential(&right, 1));
		assert_eq!(total[&left[..1]], 3);
		assert_eq!(total[&right[1..2]], 1);
	}
}
