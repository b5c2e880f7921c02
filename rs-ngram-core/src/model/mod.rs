//! N-gram model engine.
//!
//! This module provides:
//! - Next-token distributions with weighted sampling (`Distribution`)
//! - Fixed-order context tables (`FrequencyTable`)
//! - Training and incremental tuning over token sequences (`trainer`)
//! - Named models with metadata (`Model`)
//! - Autoregressive generation (`Generator`)

/// Autoregressive generation over a frequency table.
///
/// Exposes seeded weighted sampling, start-sequence handling, and the
/// distinction between a completed generation and an early halt.
pub mod generator;

/// Named model: a frequency table plus training metadata.
pub mod ngram_model;

/// Fixed-order (`n >= 2`) context table.
///
/// Handles sliding-window counting, context lookup, and merging.
pub mod frequency_table;

/// Train and tune entry points over token sequences.
pub mod trainer;

/// Next-token counts of a single context.
///
/// Tracks observed continuations and supports weighted random sampling.
pub mod distribution;
