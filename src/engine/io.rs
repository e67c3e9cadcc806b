//! Audio file I/O for wavsplice
//!
//! The editing core only sees decoded [`SampleBuffer`]s. This module holds the
//! pieces on either side of it: a [`Decoder`] that turns file bytes into a
//! buffer, and a sink that stores encoded bytes under a default file name.
//!
//! Decoding converts every supported sample format to 32-bit float without
//! resampling or remixing.

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader};
use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::engine::buffer::SampleBuffer;
use crate::error::{Result, SpliceError};

// ============================================================================
// Decoding
// ============================================================================

/// Turns encoded audio bytes into a decoded buffer
pub trait Decoder {
    /// Decode a complete in-memory file
    ///
    /// # Errors
    /// * `Decode` - if the bytes are not audio this decoder understands
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer>;
}

/// Decoder for uncompressed WAV (integer PCM at 8/16/24/32 bits, 32-bit float)
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl Decoder for WavDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer> {
        let reader = WavReader::new(Cursor::new(bytes)).map_err(|e| SpliceError::Decode {
            reason: format!("Failed to open WAV data: {}", e),
            source: Some(Box::new(e)),
        })?;

        let spec = reader.spec();
        debug!(
            "decoding WAV: {} Hz, {} channels, {} bits {:?}",
            spec.sample_rate, spec.channels, spec.bits_per_sample, spec.sample_format
        );

        let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

        SampleBuffer::from_interleaved(spec.sample_rate, spec.channels, &samples).map_err(|e| {
            SpliceError::Decode {
                reason: format!("WAV data does not describe a valid buffer: {}", e),
                source: Some(Box::new(e)),
            }
        })
    }
}

/// Read a file from disk and decode it
///
/// # Errors
/// * `FileNotFound` - if the file does not exist
/// * `Io` - if the file cannot be read
/// * `Decode` - if the decoder rejects the contents
pub fn decode_file<D: Decoder + ?Sized>(decoder: &D, path: &Path) -> Result<SampleBuffer> {
    if !path.exists() {
        return Err(SpliceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path)?;
    let buffer = decoder.decode(&bytes)?;
    info!(
        "Loaded {} ({}, {:.3}s)",
        path.display(),
        buffer.format(),
        buffer.duration_secs()
    );
    Ok(buffer)
}

/// Read samples from a WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let decode_err = |bits: u16| {
        move |e: hound::Error| SpliceError::Decode {
            reason: format!("Failed to read {}-bit samples: {}", bits, e),
            source: Some(Box::new(e)),
        }
    };

    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(decode_err(bits_per_sample)),
        SampleFormat::Int => match bits_per_sample {
            // hound hands 8-bit unsigned data back as signed
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(decode_err(8)),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(decode_err(16)),
            24 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 8388608.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(decode_err(24)),
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f64 / 2147483648.0) as f32))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(decode_err(32)),
            _ => Err(SpliceError::Decode {
                reason: format!("{}-bit integer audio is not supported", bits_per_sample),
                source: None,
            }),
        },
    }
}

// ============================================================================
// Output sink
// ============================================================================

/// Default file name for an editing result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputName {
    Trimmed,
    Joined,
    /// 1-based segment number
    Segment(usize),
}

impl OutputName {
    pub fn file_name(&self) -> String {
        match self {
            OutputName::Trimmed => "trimmed_audio.wav".to_string(),
            OutputName::Joined => "joined_audio.wav".to_string(),
            OutputName::Segment(n) => format!("audio_segment_{}.wav", n),
        }
    }

    /// Names for `count` segments, numbered from 1
    pub fn segments(count: usize) -> impl Iterator<Item = OutputName> {
        (1..=count).map(OutputName::Segment)
    }
}

impl fmt::Display for OutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// A file written by [`write_output`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub len: usize,
    /// Lowercase hex SHA-256 of the contents
    pub sha256: String,
}

/// Store encoded bytes as `dir/<default name>`
///
/// Creates `dir` if needed and overwrites an existing file of the same name.
pub fn write_output(dir: &Path, name: OutputName, bytes: &[u8]) -> Result<WrittenFile> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name.file_name());
    fs::write(&path, bytes)?;

    let written = WrittenFile {
        path,
        len: bytes.len(),
        sha256: sha256_hex(bytes),
    };
    info!("Wrote {} ({} bytes)", written.path.display(), written.len);
    Ok(written)
}

/// Hex-encoded SHA-256 digest
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

// ============================================================================
// Tests
// ============================================================================
