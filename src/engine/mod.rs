//! Audio Engine Module
//!
//! Core editing engine including:
//! - Sample buffer model
//! - Trim / concatenate / segment operations
//! - WAV encoding
//! - Decoding and output I/O

pub mod buffer;
pub mod io;
pub mod ops;
pub mod wav;

pub use buffer::{AudioFormat, SampleBuffer};
pub use io::{decode_file, write_output, Decoder, OutputName, WavDecoder, WrittenFile};
pub use ops::{concatenate, segment, trim};
pub use wav::{encode, encode_with, quantize_sample, write_wav, EncodeOptions, SampleLayout};
