use serde::{Deserialize, Serialize};

/// Straight line `y = intercept + slope * x` fitted by ordinary least squares.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
	/// `a` in `log10(Z) = a + b * log10(r)`.
	pub intercept: f64,
	/// `b` in `log10(Z) = a + b * log10(r)`.
	pub slope: f64,
}

impl LinearFit {
	/// Fits a line through the points `(xs[i], ys[i])`.
	///
	/// - `Sxy = Σxy - Σx·Σy / n`
	/// - `Sxx = Σx² - (Σx)² / n`
	/// - `slope = Sxy / Sxx`, `intercept = mean(y) - slope * mean(x)`
	///
	/// # Notes
	/// - Both slices must have the same length, at least 2, with at least
	///   two distinct x values; this is not checked here.
	pub fn fit(xs: &[f64], ys: &[f64]) -> Self {
		let n = xs.len() as f64;

		let sum_x: f64 = xs.iter().sum();
		let sum_y: f64 = ys.iter().sum();
		let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
		let sum_xx: f64 = xs.iter().map(|x| x * x).sum();

		let s_xy = sum_xy - (sum_x * sum_y) / n;
		let s_xx = sum_xx - (sum_x * sum_x) / n;

		let slope = s_xy / s_xx;
		let intercept = sum_y / n - slope * (sum_x / n);

		Self { intercept, slope }
	}

	/// Evaluates the line at `x`.
	pub fn predict(&self, x: f64) -> f64 {
		self.intercept + self.slope * x
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_close(actual: f64, expected: f64) {
		assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
	}

	#[test]
	fn exact_line_is_recovered() {
		let xs = [0.0, 1.0, 2.0, 3.0];
		let ys: Vec<f64> = xs.iter().map(|x| 0.5 - 2.0 * x).collect();
		let fit = LinearFit::fit(&xs, &ys);
		assert_close(fit.slope, -2.0);
		assert_close(fit.intercept, 0.5);
		assert_close(fit.predict(10.0), -19.5);
	}

	#[test]
	fn two_points_define_the_line() {
		let fit = LinearFit::fit(&[1.0, 3.0], &[2.0, 6.0]);
		assert_close(fit.slope, 2.0);
		assert_close(fit.intercept, 0.0);
	}

	#[test]
	fn noisy_points_follow_least_squares() {
		// Sxy = 11 - 6 * 5 / 3 = 1, Sxx = 14 - 36 / 3 = 2
		let fit = LinearFit::fit(&[1.0, 2.0, 3.0], &[1.0, 2.0, 2.0]);
		assert_close(fit.slope, 0.5);
		assert_close(fit.intercept, 5.0 / 3.0 - 1.0);
	}

	#[test]
	fn flat_points_give_zero_slope() {
		let fit = LinearFit::fit(&[0.0, 0.30103], &[0.0, 0.0]);
		assert_close(fit.slope, 0.0);
		assert_close(fit.intercept, 0.0);
	}
}
