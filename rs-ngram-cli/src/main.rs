use std::iter;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use rs_ngram_core::model::config::DEFAULT_TOP_N;
use rs_ngram_core::precision::DEFAULT_DIGITS;
use rs_ngram_core::{Corpus, EstimationConfig, Estimator, Vocabulary};

use report::Totals;

mod export;
mod io;
mod report;

/// Unigram and bigram probabilities by MLE and Simple Good-Turing.
///
/// Example: `ngram-estimate -N 2 -P 4 -w linux.w -i 28054.txt`
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
	/// Number of distinct top probability values reported per table
	#[arg(short = 'N', long = "top-n", default_value_t = DEFAULT_TOP_N)]
	top_n: usize,

	/// Fractional digits kept in every reported probability
	#[arg(short = 'P', long, default_value_t = DEFAULT_DIGITS)]
	precision: u32,

	/// Word list completing the vocabulary
	#[arg(short, long)]
	words: PathBuf,

	/// Text files forming the corpus, concatenated in order
	#[arg(short, long = "input", num_args = 1.., required = true)]
	inputs: Vec<PathBuf>,

	/// Also write the full report to this file (postcard, `.bin` if no extension)
	#[arg(long)]
	export: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let args = Args::parse();
	let config = EstimationConfig::new(args.precision, args.top_n)?;

	let words = Corpus::from_text(&io::read_text(&args.words)?);
	let inputs = args
		.inputs
		.iter()
		.map(|path| io::read_text(path).map(|text| Corpus::from_text(&text)))
		.collect::<std::io::Result<Vec<_>>>()?;

	// The vocabulary covers the word list and the corpus itself
	let sources: Vec<&Corpus> = iter::once(&words).chain(&inputs).collect();
	let vocabulary = Vocabulary::from_corpora(sources.iter().copied());
	let totals = Totals {
		tokens: sources.iter().map(|corpus| corpus.len()).sum(),
		types: vocabulary.len(),
	};
	info!("read {} input file(s), {} tokens", inputs.len(), totals.tokens);

	let corpus = Corpus::concat(&inputs);
	let report = Estimator::new(corpus, vocabulary, config)?.run();

	let stdout = std::io::stdout();
	report::write_report(&mut stdout.lock(), &totals, &report)?;

	if let Some(path) = &args.export {
		let written = export::save(&report, path)?;
		info!("report written to {}", written.display());
	}

	if !report.is_complete() {
		return Err("Good-Turing estimation failed for at least one order".into());
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flags_follow_the_short_names() {
		let args = Args::try_parse_from([
			"ngram-estimate", "-N", "2", "-P", "4", "-w", "linux.w", "-i", "a.txt", "b.txt",
		])
		.unwrap();
		assert_eq!(args.top_n, 2);
		assert_eq!(args.precision, 4);
		assert_eq!(args.words, PathBuf::from("linux.w"));
		assert_eq!(args.inputs, [PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
		assert!(args.export.is_none());
	}

	#[test]
	fn input_is_required() {
		assert!(Args::try_parse_from(["ngram-estimate", "-w", "linux.w"]).is_err());
	}

	#[test]
	fn defaults_apply() {
		let args = Args::try_parse_from(["ngram-estimate", "-w", "w", "-i", "x", "--export", "out"]).unwrap();
		assert_eq!(args.top_n, DEFAULT_TOP_N);
		assert_eq!(args.precision, DEFAULT_DIGITS);
		assert_eq!(args.export, Some(PathBuf::from("out")));
	}
}
