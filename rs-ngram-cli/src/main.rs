use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_ngram_core::{Engine, NGramError, Outcome};

const DEFAULT_MODELS_DIR: &str = "models";

#[derive(Parser, Debug)]
#[command(author, version, about = "Command line n-gram training and autoregression", long_about = None)]
struct Cli {
	/// Directory holding the models
	#[arg(long, global = true, value_name = "DIR", env = "NGRAM_MODELS_DIR", default_value = DEFAULT_MODELS_DIR)]
	path: PathBuf,

	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, global = true, action = ArgAction::Count)]
	quiet: u8,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// List available models
	List,
	/// Delete a model
	Delete(NameArgs),
	/// Build a new model from a text file
	Train(TrainArgs),
	/// Extend an existing model with another text file
	Tune(TuneArgs),
	/// Generate text from a model
	Generate(GenerateArgs),
	/// Show a model's order, size, and history
	Info(NameArgs),
}

#[derive(Args, Debug)]
struct NameArgs {
	/// Model name
	#[arg(long)]
	name: String,
}

#[derive(Args, Debug)]
struct TrainArgs {
	/// Name of the new model
	#[arg(long)]
	name: String,

	/// Text file to learn from
	#[arg(long, value_name = "PATH")]
	source: PathBuf,

	/// Window size (context length is n - 1)
	#[arg(long)]
	n: usize,
}

#[derive(Args, Debug)]
struct TuneArgs {
	/// Name of the model to extend
	#[arg(long)]
	name: String,

	/// Text file to learn from
	#[arg(long, value_name = "PATH")]
	source: PathBuf,

	/// Expected window size; must match the model when given
	#[arg(long)]
	n: Option<usize>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
	/// Model to generate from
	#[arg(long)]
	name: String,

	/// Number of tokens to generate after the start text
	#[arg(long, value_name = "COUNT")]
	length: usize,

	/// Start text (at least n - 1 tokens); a random observed context otherwise
	#[arg(long, value_name = "TEXT")]
	start: Option<String>,

	/// Seed for reproducible output
	#[arg(long, value_name = "SEED")]
	seed: Option<u64>,
}

fn init_logging(verbose: u8, quiet: u8) {
	use log::LevelFilter;

	let level = if quiet > 0 {
		match quiet {
			1 => LevelFilter::Warn,
			_ => LevelFilter::Error,
		}
	} else {
		match verbose {
			0 => LevelFilter::Info,
			1 => LevelFilter::Debug,
			_ => LevelFilter::Trace,
		}
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
	builder.format_timestamp_millis();
	builder.filter_level(level);
	let _ = builder.try_init();
}

/// Reads a training source; this is the only place text files are opened.
fn read_source(path: &Path) -> Result<String, NGramError> {
	fs::read_to_string(path).map_err(|source| NGramError::SourceUnreadable { source, path: path.to_path_buf() })
}

fn run(cli: Cli) -> Result<()> {
	let engine = Engine::open(&cli.path).with_context(|| format!("opening models directory {}", cli.path.display()))?;

	match cli.command {
		Commands::List => {
			for name in engine.list()? {
				println!("{name}");
			}
		}
		Commands::Delete(args) => {
			engine.delete(&args.name).map_err(|err| {
				if matches!(err, NGramError::ModelNotFound(_)) {
					warn!("use the list command to check the available models first");
				}
				err
			})?;
		}
		Commands::Train(args) => {
			let text = read_source(&args.source)?;
			let model = engine
				.train(&args.name, &text, args.n)
				.with_context(|| format!("training model '{}'", args.name))?;
			info!("trained '{}' from {}: {} context(s)", model.name(), args.source.display(), model.table().len());
		}
		Commands::Tune(args) => {
			let text = read_source(&args.source)?;
			let model = engine
				.tune(&args.name, &text, args.n)
				.with_context(|| format!("tuning model '{}'", args.name))?;
			info!("'{}' now has {} context(s) after {} tune(s)", model.name(), model.table().len(), model.metadata().tune_count);
		}
		Commands::Generate(args) => {
			let rng = match args.seed {
				Some(seed) => StdRng::seed_from_u64(seed),
				None => StdRng::from_rng(&mut rand::rng()),
			};
			let generation = engine
				.generate(&args.name, args.length, args.start.as_deref(), rng)
				.with_context(|| format!("generating from model '{}'", args.name))?;

			if let Outcome::UnseenContext(context) = generation.outcome() {
				warn!(
					"stopped after {} of {} token(s): context {:?} was never seen in training",
					generation.emitted(),
					generation.requested(),
					context.join(" ")
				);
			}
			println!("{}", generation.text());
		}
		Commands::Info(args) => {
			let summary = engine.info(&args.name)?;
			println!("Name:          {}", summary.name);
			println!("Order (n):     {}", summary.order);
			println!("Contexts:      {}", summary.contexts);
			println!("Observations:  {}", summary.observations);
			println!("Vocabulary:    {}", summary.vocabulary);
			println!("Corpus tokens: {}", summary.metadata.corpus_tokens);
			println!("Corpora:       {}", summary.metadata.corpora);
			println!("Tunes:         {}", summary.metadata.tune_count);
		}
	}

	Ok(())
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	if let Err(err) = run(cli) {
		eprintln!("error: {err:#}");
		let code = err.downcast_ref::<NGramError>().map_or(1, NGramError::exit_code);
		process::exit(code);
	}
}
