//! N-gram language model engine.
//!
//! This crate provides a word-level n-gram system including:
//! - Tokenization into lowercase words and punctuation marks
//! - Fixed-order frequency tables with training and incremental tuning
//! - A directory-backed store of named models with atomic writes
//! - Seeded, weighted autoregressive generation
//!
//! ```no_run
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rs_ngram_core::Engine;
//!
//! # fn main() -> rs_ngram_core::Result<()> {
//! let engine = Engine::open("models")?;
//! engine.train("cats", "the cat sat. the cat ran.", 3)?;
//! let generation = engine.generate("cats", 5, Some("the cat"), StdRng::seed_from_u64(7))?;
//! println!("{}", generation.text());
//! # Ok(())
//! # }
//! ```

/// High-level train/tune/generate/list/delete operations.
pub mod engine;

/// Crate error type and result alias.
pub mod error;

/// Core n-gram models and generation logic.
pub mod model;

/// Persistent storage of named models.
pub mod store;

/// Text to token conversion.
pub mod tokenizer;

/// Filesystem helpers (listing, path building).
///
/// Not exposed
pub(crate) mod io;

pub use engine::Engine;
pub use error::{NGramError, Result};
pub use model::frequency_table::{Context, FrequencyTable};
pub use model::generator::{Generation, Generator, Outcome, StartSeed};
pub use model::ngram_model::{Model, ModelMetadata, ModelSummary};
pub use store::ModelStore;
pub use tokenizer::{Token, detokenize, tokenize};
