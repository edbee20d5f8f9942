//! Word n-gram probability estimation library.
//!
//! This crate provides a batch frequency-estimation engine including:
//! - Corpus normalization and vocabulary construction
//! - Unigram and bigram frequency extraction
//! - Maximum Likelihood Estimation (relative frequencies)
//! - Simple Good-Turing smoothing with log-log linear regression
//!   (Gale & Sampson, "Good-Turing Frequency Estimation Without Tears")
//! - Fixed-precision decimal rounding of every reported value
//!
//! All tables are computed from scratch per (corpus, vocabulary, order)
//! and are immutable once built.

/// Corpus and vocabulary types, plus text normalization.
pub mod corpus;

/// Error taxonomy shared by every estimation component.
pub mod error;

/// Frequency tables, estimators and the high-level pipeline.
pub mod model;

/// Fixed-precision decimal rounding.
pub mod precision;

pub use corpus::{Corpus, Vocabulary};
pub use error::{EstimationError, Result};
pub use model::config::EstimationConfig;
pub use model::estimator::{Estimator, ModelReport, OrderReport};
pub use model::frequency::FrequencyTable;
pub use model::good_turing::{CountSource, GoodTuringEstimate};
pub use model::mle::MleTable;
pub use model::ngram::{NGram, Order};
pub use precision::Precision;
