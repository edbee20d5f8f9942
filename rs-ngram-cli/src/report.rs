use std::io::{self, Write};

use rs_ngram_core::{ModelReport, OrderReport, Precision};

/// Size of the vocabulary sources, printed before any table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Totals {
	/// Tokens read from the word file and every input file.
	pub tokens: usize,
	/// Distinct word types among them.
	pub types: usize,
}

/// Prints totals, then the MLE and Good-Turing top rows of every order.
pub(crate) fn write_report<W: Write>(out: &mut W, totals: &Totals, report: &ModelReport) -> io::Result<()> {
	writeln!(out, "total tokens\t=\t{}", thousands(totals.tokens as u64))?;
	writeln!(out, "total types\t=\t{}", thousands(totals.types as u64))?;

	let precision = report.config().precision();
	let top_n = report.config().top_n();
	for order_report in report.iter() {
		write_mle(out, order_report, precision, top_n)?;
		write_good_turing(out, order_report, precision, top_n)?;
	}
	Ok(())
}

fn write_mle<W: Write>(out: &mut W, report: &OrderReport, precision: Precision, top_n: usize) -> io::Result<()> {
	writeln!(out, "\nTop {top_n} {}s (MLE)\n", report.order())?;
	for (ngram, probability) in report.mle().top(top_n) {
		let count = report.frequencies().get(ngram);
		write_row(out, &ngram.to_string(), &precision.format(probability), &thousands(count))?;
	}
	Ok(())
}

fn write_good_turing<W: Write>(
	out: &mut W,
	report: &OrderReport,
	precision: Precision,
	top_n: usize,
) -> io::Result<()> {
	let order = report.order();
	writeln!(out, "\nTop {top_n} {order}s (GT)\n")?;

	let estimate = match report.good_turing() {
		Ok(estimate) => estimate,
		Err(err) => return writeln!(out, "{order} Good-Turing estimate unavailable: {err}"),
	};

	for (r, probability) in estimate.top_groups(top_n) {
		let smoothed = precision.format(estimate.smoothed_counts()[&r]);
		for ngram in estimate.members(r) {
			write_row(out, &ngram.to_string(), &precision.format(probability), &smoothed)?;
		}
	}

	writeln!(out, "\ntotal observed probability\t:\t{}", precision.format(estimate.total_observed()))?;
	writeln!(out, "total unobserved probability\t:\t{}", precision.format(estimate.reserved_mass()))?;
	if let Some(per_item) = estimate.unseen_per_item() {
		writeln!(out, "unobserved probability per {order}\t:\t{}", precision.format(per_item))?;
	}
	Ok(())
}

fn write_row<W: Write>(out: &mut W, ngram: &str, probability: &str, last: &str) -> io::Result<()> {
	writeln!(out, "{ngram:<40}      {probability:<40}     {last}")
}

/// Formats an integer with `,` between groups of three digits.
pub(crate) fn thousands(value: u64) -> String {
	let digits = value.to_string();
	let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, digit) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			formatted.push(',');
		}
		formatted.push(digit);
	}
	formatted
}
