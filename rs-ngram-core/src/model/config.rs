use serde::{Deserialize, Serialize};

use crate::error::{EstimationError, Result};
use crate::precision::Precision;

/// Number of rows reported when nothing else is requested.
pub const DEFAULT_TOP_N: usize = 10;

/// Parameters of one estimation run.
///
/// # Responsibilities
/// - Carry the rounding precision applied to every reported probability
/// - Carry how many top entries a report shows
///
/// # Invariants
/// - `top_n >= 1`
/// - `precision` keeps at least one fractional digit
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EstimationConfig {
	/// Rounding applied to probabilities.
	precision: Precision,

	/// Number of distinct top values shown per table.
	top_n: usize,
}

impl EstimationConfig {
	/// Creates a configuration from raw user input.
	///
	/// # Errors
	/// - `InvalidPrecision` if `digits` is 0
	/// - `InvalidTopN` if `top_n` is 0
	pub fn new(digits: u32, top_n: usize) -> Result<Self> {
		let precision = Precision::new(digits)?;
		if top_n == 0 {
			return Err(EstimationError::InvalidTopN { provided: top_n });
		}
		Ok(Self { precision, top_n })
	}

	pub fn precision(&self) -> Precision {
		self.precision
	}

	pub fn top_n(&self) -> usize {
		self.top_n
	}
}

impl Default for EstimationConfig {
	fn default() -> Self {
		Self { precision: Precision::default(), top_n: DEFAULT_TOP_N }
	}
}
