use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ngram::Order;

pub type Result<T> = std::result::Result<T, EstimationError>;

/// Failures raised while estimating n-gram probabilities.
///
/// Every variant describes a statistically degenerate input. They are
/// deterministic: running the same corpus and vocabulary again fails the
/// same way, so callers should report them rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EstimationError {
	/// The token sequence contains no token.
	EmptyCorpus,
	/// The vocabulary contains no word type.
	EmptyVocabulary,
	/// Precision must be at least one fractional digit.
	InvalidPrecision { provided: u32 },
	/// The number of reported rows must be at least one.
	InvalidTopN { provided: usize },
	/// No n-gram of this order was observed at all.
	EmptySample { order: Order },
	/// No n-gram occurs exactly once, so the reserved mass `n1 / N` is undefined.
	NoSingletons { order: Order },
	/// The log-log regression needs at least two distinct non-zero counts.
	InsufficientRegressionPoints { order: Order, distinct: usize },
}

impl fmt::Display for EstimationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::EmptyCorpus => write!(f, "corpus contains no token"),
			Self::EmptyVocabulary => write!(f, "vocabulary contains no word type"),
			Self::InvalidPrecision { provided } => {
				write!(f, "precision must be >= 1 (provided: {provided})")
			}
			Self::InvalidTopN { provided } => write!(f, "top-n must be >= 1 (provided: {provided})"),
			Self::EmptySample { order } => write!(f, "no {order} observed in the corpus"),
			Self::NoSingletons { order } => write!(
				f,
				"no {order} occurs exactly once: unseen probability mass is undefined"
			),
			Self::InsufficientRegressionPoints { order, distinct } => write!(
				f,
				"{order} counts take {distinct} distinct non-zero value(s), at least 2 are needed for the regression"
			),
		}
	}
}

impl std::error::Error for EstimationError {}
