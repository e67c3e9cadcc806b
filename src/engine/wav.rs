//! WAV encoding
//!
//! Serializes a [`SampleBuffer`] into a canonical 44-byte-header, 16-bit PCM
//! WAV stream. Encoding has no error path: every well-formed buffer, including
//! an empty one, has exactly one byte representation.
//!
//! By default sample data is written as one contiguous block per channel,
//! which is the layout files produced by this tool have always had. Most WAV
//! readers expect frames interleaved instead; pass [`SampleLayout::Interleaved`]
//! when the output must play back correctly in other software.

use std::io::{self, Write};

use crate::engine::buffer::SampleBuffer;

/// Size of the RIFF + fmt + data chunk headers
pub const WAV_HEADER_LEN: usize = 44;

/// Bits per encoded sample
pub const BITS_PER_SAMPLE: u16 = 16;

const BYTES_PER_SAMPLE: usize = (BITS_PER_SAMPLE / 8) as usize;

/// `fmt ` chunk body size for plain PCM
const FMT_CHUNK_LEN: u32 = 16;

/// WAVE_FORMAT_PCM
const FORMAT_PCM: u16 = 1;

/// Order of sample data after the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleLayout {
    /// All frames of channel 0, then all frames of channel 1, ...
    #[default]
    ChannelBlocks,
    /// Frame by frame: L, R, L, R, ... for stereo
    Interleaved,
}

/// Encoder configuration
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Sample data layout (default: per-channel blocks)
    pub layout: SampleLayout,
}

impl EncodeOptions {
    /// Options for output that standard WAV players read correctly
    pub fn interleaved() -> Self {
        Self {
            layout: SampleLayout::Interleaved,
        }
    }
}

/// Header fields derived from a buffer's dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channel_count: u16,
    pub sample_rate: u32,
    /// Length of the sample data in bytes
    pub data_len: u32,
}

impl WavHeader {
    pub fn for_buffer(buffer: &SampleBuffer) -> Self {
        let data_len = buffer.frame_count() * buffer.channel_count() as usize * BYTES_PER_SAMPLE;
        Self {
            channel_count: buffer.channel_count(),
            sample_rate: buffer.sample_rate(),
            data_len: data_len as u32,
        }
    }

    /// Bytes per frame across all channels
    pub fn block_align(&self) -> u16 {
        self.channel_count.wrapping_mul(BYTES_PER_SAMPLE as u16)
    }

    /// Bytes per second
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate
            .wrapping_mul(self.channel_count as u32)
            .wrapping_mul(BYTES_PER_SAMPLE as u32)
    }

    /// Value of the RIFF chunk size field: total file length minus 8
    pub fn riff_len(&self) -> u32 {
        self.data_len.wrapping_add(WAV_HEADER_LEN as u32 - 8)
    }

    pub fn to_bytes(&self) -> [u8; WAV_HEADER_LEN] {
        let mut header = [0u8; WAV_HEADER_LEN];

        // RIFF header
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&self.riff_len().to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");

        // fmt chunk
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
        header[20..22].copy_from_slice(&FORMAT_PCM.to_le_bytes());
        header[22..24].copy_from_slice(&self.channel_count.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate().to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align().to_le_bytes());
        header[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

        // data chunk
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&self.data_len.to_le_bytes());

        header
    }
}

/// Convert a float sample to signed 16-bit PCM
///
/// The sample is clipped to [-1.0, 1.0], then negative values scale by 32768
/// and the rest by 32767 so both ends of the i16 range are reachable.
/// NaN encodes as silence.
#[inline]
pub fn quantize_sample(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    let clamped = sample.clamp(-1.0, 1.0) as f64;
    let scaled = if clamped < 0.0 {
        clamped * 32768.0
    } else {
        clamped * 32767.0
    };
    scaled.round() as i16
}

/// Expected encoded length of a buffer in bytes
pub fn encoded_len(buffer: &SampleBuffer) -> usize {
    WAV_HEADER_LEN + buffer.frame_count() * buffer.channel_count() as usize * BYTES_PER_SAMPLE
}

/// Encode with the default per-channel block layout
pub fn encode(buffer: &SampleBuffer) -> Vec<u8> {
    encode_with(buffer, &EncodeOptions::default())
}

/// Encode with an explicit sample layout
pub fn encode_with(buffer: &SampleBuffer, options: &EncodeOptions) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(encoded_len(buffer));
    bytes.extend_from_slice(&WavHeader::for_buffer(buffer).to_bytes());

    match options.layout {
        SampleLayout::ChannelBlocks => {
            for channel in buffer.channels() {
                for &sample in channel {
                    bytes.extend_from_slice(&quantize_sample(sample).to_le_bytes());
                }
            }
        }
        SampleLayout::Interleaved => {
            let channels: Vec<&[f32]> = buffer.channels().collect();
            for frame in 0..buffer.frame_count() {
                for channel in &channels {
                    bytes.extend_from_slice(&quantize_sample(channel[frame]).to_le_bytes());
                }
            }
        }
    }

    bytes
}

/// Stream the encoded bytes into a writer
pub fn write_wav<W: Write>(
    writer: &mut W,
    buffer: &SampleBuffer,
    options: &EncodeOptions,
) -> io::Result<()> {
    writer.write_all(&encode_with(buffer, options))?;
    writer.flush()
}

// ============================================================================
// Tests
// ============================================================================
