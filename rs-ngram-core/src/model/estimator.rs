use std::panic;
use std::thread;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, Vocabulary};
use crate::error::{EstimationError, Result};
use super::config::EstimationConfig;
use super::frequency::FrequencyTable;
use super::good_turing::GoodTuringEstimate;
use super::mle::MleTable;
use super::ngram::Order;

/// High-level pipeline running every estimator over one corpus.
///
/// # Responsibilities
/// - Validate the corpus, vocabulary and configuration once
/// - Extract the unigram and bigram tables concurrently
/// - Run MLE and Simple Good-Turing per order, concurrently
///
/// # Invariants
/// - Corpus and vocabulary are non-empty
#[derive(Debug, Clone)]
pub struct Estimator {
	corpus: Corpus,
	vocabulary: Vocabulary,
	config: EstimationConfig,
}

impl Estimator {
	/// Creates an estimator over `corpus` with word types from `vocabulary`.
	///
	/// # Errors
	/// - `EmptyCorpus` if the corpus has no token
	/// - `EmptyVocabulary` if the vocabulary has no word type
	pub fn new(corpus: Corpus, vocabulary: Vocabulary, config: EstimationConfig) -> Result<Self> {
		if corpus.is_empty() {
			return Err(EstimationError::EmptyCorpus);
		}
		if vocabulary.is_empty() {
			return Err(EstimationError::EmptyVocabulary);
		}
		Ok(Self { corpus, vocabulary, config })
	}

	pub fn corpus(&self) -> &Corpus {
		&self.corpus
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	pub fn config(&self) -> EstimationConfig {
		self.config
	}

	/// Runs every estimator and collects the results.
	///
	/// A Good-Turing failure of one order is stored in its report; the other
	/// order is still estimated.
	pub fn run(&self) -> ModelReport {
		info!(
			"estimating over {} tokens and {} word types",
			self.corpus.len(),
			self.vocabulary.len()
		);

		let (unigrams, bigrams) = thread::scope(|scope| {
			let unigrams = scope.spawn(|| FrequencyTable::extract(&self.corpus, &self.vocabulary, Order::Unigram));
			let bigrams = scope.spawn(|| FrequencyTable::extract(&self.corpus, &self.vocabulary, Order::Bigram));
			(join(unigrams), join(bigrams))
		});

		let precision = self.config.precision();
		let unigram_mle = MleTable::unigrams(&unigrams, precision);
		let bigram_mle = MleTable::bigrams(&bigrams, &unigrams, precision);

		let (unigram_gt, bigram_gt) = thread::scope(|scope| {
			let unigram = scope.spawn(|| GoodTuringEstimate::estimate(&unigrams, precision));
			let bigram = scope.spawn(|| GoodTuringEstimate::estimate(&bigrams, precision));
			(join(unigram), join(bigram))
		});

		ModelReport {
			config: self.config,
			unigram: OrderReport::new(unigrams, unigram_mle, unigram_gt),
			bigram: OrderReport::new(bigrams, bigram_mle, bigram_gt),
		}
	}
}

/// Waits for a scoped worker, forwarding its panic if it had one.
fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
	handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload))
}

/// Everything estimated for one order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderReport {
	frequencies: FrequencyTable,
	mle: MleTable,
	good_turing: std::result::Result<GoodTuringEstimate, EstimationError>,
}

impl OrderReport {
	fn new(frequencies: FrequencyTable, mle: MleTable, good_turing: Result<GoodTuringEstimate>) -> Self {
		if let Err(err) = &good_turing {
			warn!("{} Good-Turing estimation failed: {err}", frequencies.order());
		}
		Self { frequencies, mle, good_turing }
	}

	pub fn order(&self) -> Order {
		self.frequencies.order()
	}

	pub fn frequencies(&self) -> &FrequencyTable {
		&self.frequencies
	}

	pub fn mle(&self) -> &MleTable {
		&self.mle
	}

	/// Simple Good-Turing estimate, or the reason it could not be computed.
	pub fn good_turing(&self) -> std::result::Result<&GoodTuringEstimate, &EstimationError> {
		self.good_turing.as_ref()
	}
}

/// Result of one `Estimator::run`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelReport {
	config: EstimationConfig,
	unigram: OrderReport,
	bigram: OrderReport,
}

impl ModelReport {
	pub fn config(&self) -> EstimationConfig {
		self.config
	}

	pub fn unigram(&self) -> &OrderReport {
		&self.unigram
	}

	pub fn bigram(&self) -> &OrderReport {
		&self.bigram
	}

	/// Report of `order`.
	pub fn order(&self, order: Order) -> &OrderReport {
		match order {
			Order::Unigram => &self.unigram,
			Order::Bigram => &self.bigram,
		}
	}

	/// Reports of every order, lowest first.
	pub fn iter(&self) -> impl Iterator<Item = &OrderReport> {
		Order::ALL.into_iter().map(|order| self.order(order))
	}

	/// True when every order produced a Good-Turing estimate.
	pub fn is_complete(&self) -> bool {
		self.iter().all(|report| report.good_turing.is_ok())
	}
}
