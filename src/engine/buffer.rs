//! Sample Buffer
//!
//! Provides the decoded audio buffer every editing operation reads from and
//! writes into. Samples are stored non-interleaved as 32-bit floats, one
//! `Vec<f32>` per channel.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpliceError};

/// Frame positions within this many ULPs of a whole frame snap to it.
///
/// `frames / rate * rate` is not always exact in floating point, and a plain
/// `floor` would then drop the last frame of an identity trim. Anything
/// further away than rounding noise floors as requested.
const FRAME_SNAP_ULPS: f64 = 4.0;

// ============================================================================
// Audio Format
// ============================================================================

/// Sample rate and channel count shared by buffers that can be combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Samples per second
    pub sample_rate: u32,
    /// Number of discrete channels
    pub channel_count: u16,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channel_count: u16) -> Self {
        Self {
            sample_rate,
            channel_count,
        }
    }

    /// Human readable channel configuration ("mono", "stereo", "6-channel")
    pub fn layout_name(&self) -> String {
        match self.channel_count {
            1 => "mono".to_string(),
            2 => "stereo".to_string(),
            n => format!("{}-channel", n),
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz {}", self.sample_rate, self.layout_name())
    }
}

// ============================================================================
// Sample Buffer
// ============================================================================

/// Decoded multi-channel audio
///
/// Sample rate and channel count are fixed at construction. Editing never
/// happens in place: operations in [`crate::engine::ops`] read their sources
/// and write into freshly created buffers.
///
/// # Example
/// ```
/// use wavsplice::engine::buffer::SampleBuffer;
///
/// // One second of stereo silence
/// let buffer = SampleBuffer::create(44100, 2, 44100).unwrap();
/// assert_eq!(buffer.channel_count(), 2);
/// assert_eq!(buffer.frame_count(), 44100);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    channel_count: u16,
    frame_count: usize,
    /// Outer Vec is channels, inner Vec is frames
    samples: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Create a zero-filled buffer
    ///
    /// # Errors
    /// * `InvalidDimensions` - if `sample_rate` is 0 or `channel_count` is 0
    pub fn create(sample_rate: u32, channel_count: u16, frame_count: usize) -> Result<Self> {
        validate_format(sample_rate, channel_count as usize)?;

        Ok(Self {
            sample_rate,
            channel_count,
            frame_count,
            samples: vec![vec![0.0_f32; frame_count]; channel_count as usize],
        })
    }

    /// Adopt already decoded per-channel sample data
    ///
    /// # Errors
    /// * `InvalidDimensions` - if the sample rate is 0, there are no channels
    ///   (or more than `u16::MAX`), or the channels differ in length
    pub fn from_channels(sample_rate: u32, samples: Vec<Vec<f32>>) -> Result<Self> {
        validate_format(sample_rate, samples.len())?;

        let frame_count = samples[0].len();
        if let Some((index, channel)) = samples
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != frame_count)
        {
            return Err(SpliceError::InvalidDimensions {
                reason: format!(
                    "channel {} has {} frames, channel 0 has {}",
                    index,
                    channel.len(),
                    frame_count
                ),
            });
        }

        Ok(Self {
            sample_rate,
            channel_count: samples.len() as u16,
            frame_count,
            samples,
        })
    }

    /// Create a buffer from frame-ordered data (L, R, L, R, ... for stereo)
    ///
    /// # Errors
    /// * `InvalidDimensions` - if the format is invalid or the data length is
    ///   not a multiple of the channel count
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: u16,
        interleaved: &[f32],
    ) -> Result<Self> {
        validate_format(sample_rate, channel_count as usize)?;

        let channels = channel_count as usize;
        if interleaved.len() % channels != 0 {
            return Err(SpliceError::InvalidDimensions {
                reason: format!(
                    "interleaved data length {} is not divisible by channel count {}",
                    interleaved.len(),
                    channels
                ),
            });
        }

        let frame_count = interleaved.len() / channels;
        let mut samples = vec![Vec::with_capacity(frame_count); channels];
        for frame in interleaved.chunks_exact(channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                samples[ch].push(sample);
            }
        }

        Ok(Self {
            sample_rate,
            channel_count,
            frame_count,
            samples,
        })
    }

    /// Samples per second
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels
    #[inline]
    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Number of samples per channel
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Check if the buffer has no frames
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// Sample rate and channel count of this buffer
    #[inline]
    pub fn format(&self) -> AudioFormat {
        AudioFormat::new(self.sample_rate, self.channel_count)
    }

    /// Length in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.frame_count as f64 / self.sample_rate as f64
    }

    /// Get immutable access to a channel's samples
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.samples[index]
    }

    /// Iterate over all channels in order
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.samples.iter().map(|ch| ch.as_slice())
    }

    /// Give up the buffer and keep its channel data
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.samples
    }

    /// Clamp a time to `[0, duration]`
    ///
    /// Editing operations reject out-of-range times; callers that prefer to
    /// fit a request to the audio use this first. NaN clamps to 0.
    pub fn clamp_seconds(&self, seconds: f64) -> f64 {
        if seconds.is_nan() {
            return 0.0;
        }
        seconds.clamp(0.0, self.duration_secs())
    }

    /// Convert a time to a frame index: `floor(seconds * sample_rate)`
    ///
    /// Callers must pass a finite, non-negative time.
    pub(crate) fn frame_at(&self, seconds: f64) -> usize {
        let position = seconds * self.sample_rate as f64;
        let nearest = position.round();
        let tolerance = position.abs() * FRAME_SNAP_ULPS * f64::EPSILON;
        if (position - nearest).abs() <= tolerance {
            nearest as usize
        } else {
            position.floor() as usize
        }
    }

    #[inline]
    pub(crate) fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.samples[index]
    }
}

fn validate_format(sample_rate: u32, channel_count: usize) -> Result<()> {
    if sample_rate == 0 {
        return Err(SpliceError::InvalidDimensions {
            reason: "sample rate must be positive".to_string(),
        });
    }
    if channel_count == 0 {
        return Err(SpliceError::InvalidDimensions {
            reason: "a buffer needs at least one channel".to_string(),
        });
    }
    if channel_count > u16::MAX as usize {
        return Err(SpliceError::InvalidDimensions {
            reason: format!(
                "{} channels exceeds the maximum of {}",
                channel_count,
                u16::MAX
            ),
        });
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(44100, 1, 0 ; "empty mono")]
    #[test_case(44100, 2, 44100 ; "one second stereo")]
    #[test_case(8000, 6, 17 ; "odd length surround")]
    fn test_create_is_silent(sample_rate: u32, channels: u16, frames: usize) {
        let buffer = SampleBuffer::create(sample_rate, channels, frames).unwrap();

        assert_eq!(buffer.sample_rate(), sample_rate);
        assert_eq!(buffer.channel_count(), channels);
        assert_eq!(buffer.frame_count(), frames);
        assert_eq!(buffer.channels().count(), channels as usize);
        for channel in buffer.channels() {
            assert_eq!(channel.len(), frames);
            assert!(channel.iter().all(|&s| s == 0.0));
        }
    }

    #[test]
    fn test_create_rejects_zero_sample_rate() {
        let result = SampleBuffer::create(0, 2, 100);
        assert!(matches!(result, Err(SpliceError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_create_rejects_zero_channels() {
        let result = SampleBuffer::create(44100, 0, 100);
        assert!(matches!(result, Err(SpliceError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_from_channels_rejects_ragged_data() {
        let result = SampleBuffer::from_channels(44100, vec![vec![0.0; 4], vec![0.0; 3]]);
        match result {
            Err(SpliceError::InvalidDimensions { reason }) => {
                assert!(reason.contains("channel 1"));
            }
            other => panic!("Expected InvalidDimensions, got: {:?}", other),
        }
    }

    #[test]
    fn test_from_channels_rejects_no_channels() {
        let result = SampleBuffer::from_channels(44100, Vec::new());
        assert!(matches!(result, Err(SpliceError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_from_interleaved_stereo() {
        let buffer =
            SampleBuffer::from_interleaved(48000, 2, &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();

        assert_eq!(buffer.frame_count(), 3);
        assert_eq!(buffer.channel(0), &[0.1_f32, 0.3, 0.5]);
        assert_eq!(buffer.channel(1), &[0.2_f32, 0.4, 0.6]);
    }

    #[test]
    fn test_from_interleaved_invalid_length() {
        // 5 samples can't be evenly split into stereo
        let result = SampleBuffer::from_interleaved(48000, 2, &[0.1, 0.2, 0.3, 0.4, 0.5]);
        assert!(result.is_err());
    }

    #[test]
    fn test_duration() {
        let buffer = SampleBuffer::create(48000, 1, 24000).unwrap();
        assert!((buffer.duration_secs() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(AudioFormat::new(44100, 1).to_string(), "44100 Hz mono");
        assert_eq!(AudioFormat::new(48000, 2).to_string(), "48000 Hz stereo");
        assert_eq!(AudioFormat::new(48000, 6).to_string(), "48000 Hz 6-channel");
    }

    #[test]
    fn test_clamp_seconds() {
        let buffer = SampleBuffer::create(1000, 1, 2000).unwrap();
        assert_eq!(buffer.clamp_seconds(-1.0), 0.0);
        assert_eq!(buffer.clamp_seconds(1.5), 1.5);
        assert_eq!(buffer.clamp_seconds(10.0), 2.0);
        assert_eq!(buffer.clamp_seconds(f64::NAN), 0.0);
    }

    #[test]
    fn test_frame_at_floors() {
        let buffer = SampleBuffer::create(1000, 1, 2000).unwrap();
        assert_eq!(buffer.frame_at(0.0), 0);
        assert_eq!(buffer.frame_at(0.0015), 1);
        assert_eq!(buffer.frame_at(0.0019), 1);
        assert_eq!(buffer.frame_at(1.0), 1000);
    }

    #[test]
    fn test_frame_at_full_duration_keeps_last_frame() {
        // Lengths whose duration is not exactly representable
        for frames in [1usize, 7, 1001, 44099, 96_001] {
            let buffer = SampleBuffer::create(44100, 1, frames).unwrap();
            assert_eq!(buffer.frame_at(buffer.duration_secs()), frames);
        }
    }

    #[test]
    fn test_frame_at_does_not_round_up_near_misses() {
        let buffer = SampleBuffer::create(1000, 1, 100).unwrap();
        // 10.9999995 frames is short of frame 11 by far more than rounding error
        assert_eq!(buffer.frame_at(0.0109999995), 10);
        assert_eq!(buffer.frame_at(0.010999999999), 10);
        assert_eq!(buffer.frame_at(0.011), 11);
    }
}
