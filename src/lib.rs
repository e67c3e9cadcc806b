//! wavsplice - PCM editing and WAV encoding
//!
//! Takes decoded multi-channel floating-point audio and produces trimmed,
//! joined, or split buffers, then serializes them as 16-bit PCM WAV.
//!
//! # Architecture
//!
//! The caller composes the pieces, leaves first:
//! - [`engine::buffer`]: the decoded sample buffer
//! - [`engine::ops`]: pure editing operations over buffers
//! - [`engine::wav`]: buffer to WAV bytes
//! - [`engine::io`]: decoder and output sink around the core

pub mod cli;
pub mod engine;
pub mod error;

pub use error::{Result, SpliceError};
