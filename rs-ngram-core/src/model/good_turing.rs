use std::collections::BTreeMap;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{EstimationError, Result};
use crate::precision::Precision;
use super::frequency::FrequencyTable;
use super::ngram::{NGram, Order};
use super::regression::LinearFit;

/// Critical value of the empirical/smoothed comparison (p < 0.05).
pub const CONFIDENCE_FACTOR: f64 = 1.96;

/// Which estimate produced the smoothed count of a frequency.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountSource {
	/// `(r + 1) * n_next / n_r`, from the raw frequency-of-frequencies.
	Empirical,
	/// `(r + 1) * S(r + 1) / S(r)`, from the fitted log-log line.
	Smoothed,
}

/// Simple Good-Turing estimate for one n-gram order.
///
/// Follows Gale & Sampson: frequencies of frequencies are averaged into
/// Z values, a line is fitted through `(log10 r, log10 Z)`, and each
/// frequency `r` gets a smoothed count `r*` taken from the raw counts until
/// they are no longer significantly different from the fitted line. From
/// that point on, every larger frequency uses the line.
///
/// All tables are keyed by frequency `r` and iterate in ascending order.
///
/// # Invariants
/// - Every `r` in `frequencies_of_frequencies` has `n_r >= 1`
/// - An `r = 0` row exists only for unigrams with unseen vocabulary words
/// - Once a frequency uses `CountSource::Smoothed`, every larger one does too
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GoodTuringEstimate {
	order: Order,

	/// N, sum of `r * n_r` over observed frequencies.
	sample_size: u64,

	/// Members of every frequency group, sorted.
	groups: BTreeMap<u64, Vec<NGram>>,

	/// `r -> n_r`.
	frequencies_of_frequencies: BTreeMap<u64, u64>,

	/// `r -> Z(r)` for observed frequencies.
	z_values: BTreeMap<u64, f64>,

	/// Line fitted through `(log10 r, log10 Z(r))`.
	fit: LinearFit,

	/// `r -> r*`.
	smoothed_counts: BTreeMap<u64, f64>,

	/// `r ->` estimate that produced `r*`.
	sources: BTreeMap<u64, CountSource>,

	/// `r -> p_r`, the probability of each single n-gram seen `r` times.
	probabilities: BTreeMap<u64, f64>,

	/// P0, total mass reserved for unseen n-grams.
	reserved_mass: f64,

	/// Sum of `p_r` over observed frequencies, one term per distinct `r`.
	total_observed: f64,

	/// `n1 / zero_count`, bigrams only.
	unseen_per_item: Option<f64>,
}

impl GoodTuringEstimate {
	/// Runs the Simple Good-Turing procedure over a frequency table.
	///
	/// # Errors
	/// - `EmptySample` if no n-gram was observed
	/// - `NoSingletons` if no n-gram occurs exactly once
	/// - `InsufficientRegressionPoints` if fewer than two distinct non-zero
	///   counts exist
	pub fn estimate(table: &FrequencyTable, precision: Precision) -> Result<Self> {
		let order = table.order();

		let mut groups: BTreeMap<u64, Vec<NGram>> = BTreeMap::new();
		for (ngram, count) in table.iter() {
			groups.entry(count).or_default().push(ngram.clone());
		}
		for members in groups.values_mut() {
			members.sort_unstable();
		}

		let frequencies_of_frequencies: BTreeMap<u64, u64> =
			groups.iter().map(|(r, members)| (*r, members.len() as u64)).collect();
		let observed: Vec<(u64, u64)> = frequencies_of_frequencies.range(1..).map(|(r, n)| (*r, *n)).collect();

		let sample_size: u64 = observed.iter().map(|(r, n)| r * n).sum();
		if sample_size == 0 {
			return Err(EstimationError::EmptySample { order });
		}

		let singletons = frequencies_of_frequencies
			.get(&1)
			.copied()
			.ok_or(EstimationError::NoSingletons { order })?;
		let reserved_mass = precision.round(singletons as f64 / sample_size as f64);
		debug!("{order}: N = {sample_size}, n1 = {singletons}, P0 = {reserved_mass}");

		if observed.len() < 2 {
			return Err(EstimationError::InsufficientRegressionPoints { order, distinct: observed.len() });
		}

		let z_values = z_values(&observed);
		let (log_r, log_z): (Vec<f64>, Vec<f64>) =
			z_values.iter().map(|(r, z)| ((*r as f64).log10(), z.log10())).unzip();
		let fit = LinearFit::fit(&log_r, &log_z);
		debug!("{order}: log10(Z) = {} + {} * log10(r)", fit.intercept, fit.slope);

		let mut smoothed_counts = BTreeMap::new();
		let mut sources = BTreeMap::new();

		if let Some(&unseen) = frequencies_of_frequencies.get(&0) {
			// The first observed frequency plays the role of the next row
			let r_star = observed[0].1 as f64 / unseen as f64;
			smoothed_counts.insert(0, r_star);
			sources.insert(0, CountSource::Empirical);
		}

		let mut switched = false;
		for (i, &(r, n_r)) in observed.iter().enumerate() {
			let smoothed = (r + 1) as f64 * smoothed_z(&fit, r + 1) / smoothed_z(&fit, r);

			let (r_star, source) = match observed.get(i + 1) {
				Some(&(_, n_next)) if !switched => {
					let next_ratio = n_next as f64 / n_r as f64;
					let empirical = (r + 1) as f64 * next_ratio;
					let deviation =
						((r + 1) as f64).powi(2) * (n_next as f64 / (n_r as f64).powi(2)) * (1.0 + next_ratio);
					let threshold = CONFIDENCE_FACTOR * deviation.sqrt();

					trace!("{order}: r = {r}, x = {empirical}, y = {smoothed}, threshold = {threshold}");
					if (empirical - smoothed).abs() > threshold {
						(empirical, CountSource::Empirical)
					} else {
						(smoothed, CountSource::Smoothed)
					}
				}
				// Last frequency with nothing to compare against: take the fitted line
				_ => (smoothed, CountSource::Smoothed),
			};

			if source == CountSource::Smoothed && !switched {
				switched = true;
				debug!("{order}: switched to smoothed counts at r = {r}");
			}
			smoothed_counts.insert(r, r_star);
			sources.insert(r, source);
		}

		let renormalizer: f64 = observed.iter().map(|(r, n)| *n as f64 * smoothed_counts[r]).sum();

		let mut probabilities = BTreeMap::new();
		if frequencies_of_frequencies.contains_key(&0) {
			probabilities.insert(0, reserved_mass);
		}
		for (r, _) in &observed {
			let p_r = precision.round((1.0 - reserved_mass) * smoothed_counts[r] / renormalizer);
			probabilities.insert(*r, p_r);
		}

		let total_observed: f64 = probabilities.range(1..).map(|(_, p)| p).sum();

		let unseen_per_item = match order {
			Order::Bigram if table.zero_count() > 0 => Some(singletons as f64 / table.zero_count() as f64),
			_ => None,
		};

		debug!("{order}: N' = {renormalizer}, total observed = {total_observed}");

		Ok(Self {
			order,
			sample_size,
			groups,
			frequencies_of_frequencies,
			z_values,
			fit,
			smoothed_counts,
			sources,
			probabilities,
			reserved_mass,
			total_observed,
			unseen_per_item,
		})
	}

	pub fn order(&self) -> Order {
		self.order
	}

	pub fn sample_size(&self) -> u64 {
		self.sample_size
	}

	/// `r ->` n-grams observed exactly `r` times.
	pub fn groups(&self) -> &BTreeMap<u64, Vec<NGram>> {
		&self.groups
	}

	/// N-grams observed exactly `r` times (empty if none).
	pub fn members(&self, r: u64) -> &[NGram] {
		self.groups.get(&r).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn frequencies_of_frequencies(&self) -> &BTreeMap<u64, u64> {
		&self.frequencies_of_frequencies
	}

	pub fn z_values(&self) -> &BTreeMap<u64, f64> {
		&self.z_values
	}

	pub fn fit(&self) -> LinearFit {
		self.fit
	}

	pub fn smoothed_counts(&self) -> &BTreeMap<u64, f64> {
		&self.smoothed_counts
	}

	pub fn sources(&self) -> &BTreeMap<u64, CountSource> {
		&self.sources
	}

	/// First observed frequency whose count comes from the fitted line.
	pub fn switch_point(&self) -> Option<u64> {
		self.sources
			.range(1..)
			.find(|(_, source)| **source == CountSource::Smoothed)
			.map(|(r, _)| *r)
	}

	pub fn probabilities(&self) -> &BTreeMap<u64, f64> {
		&self.probabilities
	}

	/// Probability of one n-gram observed `r` times.
	pub fn probability(&self, r: u64) -> Option<f64> {
		self.probabilities.get(&r).copied()
	}

	/// The `n` observed frequencies whose n-grams have the highest
	/// probability, as `(r, p_r)` pairs.
	///
	/// Ties on probability put the larger frequency first. The unseen row
	/// is never part of the result.
	pub fn top_groups(&self, n: usize) -> Vec<(u64, f64)> {
		let mut rows: Vec<(u64, f64)> = self.probabilities.range(1..).map(|(r, p)| (*r, *p)).collect();
		rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
		rows.truncate(n);
		rows
	}

	/// P0, the mass reserved for all unseen n-grams together.
	pub fn reserved_mass(&self) -> f64 {
		self.reserved_mass
	}

	/// Sum of `p_r` over distinct observed frequencies.
	///
	/// Each frequency contributes once, whatever the size of its group, so
	/// this does not add up to `1 - P0`.
	pub fn total_observed(&self) -> f64 {
		self.total_observed
	}

	/// Per-bigram estimate for unseen bigrams, `n1 / zero_count`.
	///
	/// `None` for unigrams and when every bigram of the vocabulary was seen.
	pub fn unseen_per_item(&self) -> Option<f64> {
		self.unseen_per_item
	}
}

/// Averages `n_r` over the gap between neighboring observed frequencies.
///
/// `Z(r) = 2 * n_r / (next - prev)` where `prev` is the previous observed
/// frequency (0 for the first) and `next` the following one (`2r - prev`
/// for the last).
fn z_values(observed: &[(u64, u64)]) -> BTreeMap<u64, f64> {
	observed
		.iter()
		.enumerate()
		.map(|(i, &(r, n))| {
			let prev = if i == 0 { 0 } else { observed[i - 1].0 };
			let next = match observed.get(i + 1) {
				Some(&(next, _)) => next,
				None => 2 * r - prev,
			};
			(r, 2.0 * n as f64 / (next - prev) as f64)
		})
		.collect()
}

/// `S(r) = 10^(a + b * log10 r)`.
fn smoothed_z(fit: &LinearFit, r: u64) -> f64 {
	10f64.powf(fit.predict((r as f64).log10()))
}
