//! Top-level module for the n-gram estimation pipeline.
//!
//! This module provides:
//! - N-gram keys and orders (`NGram`, `Order`)
//! - Occurrence counting (`FrequencyTable`)
//! - Relative-frequency probabilities (`MleTable`)
//! - Simple Good-Turing smoothing (`GoodTuringEstimate`)
//! - Run parameters (`EstimationConfig`) and the `Estimator` pipeline

/// Validated parameters of one estimation run.
pub mod config;

/// High-level pipeline running every estimator over a corpus.
///
/// Extracts both orders concurrently and bundles frequencies, MLE and
/// Good-Turing results into a serializable `ModelReport`.
pub mod estimator;

/// Single-pass n-gram counting, parallelized over CPU chunks.
///
/// Materializes zero counts for unseen unigrams and tracks unseen bigrams
/// as a scalar.
pub mod frequency;

/// Simple Good-Turing estimation (Gale & Sampson).
///
/// Groups n-grams by frequency, fits the log-log line and switches from
/// empirical to smoothed counts once they agree.
pub mod good_turing;

/// Maximum Likelihood (relative frequency) probabilities.
pub mod mle;

/// Order enum and n-gram key type.
pub mod ngram;

/// Ordinary least squares line fit.
mod regression;

pub use regression::LinearFit;
