//! Buffer editing operations
//!
//! Trim, concatenate and segment. Every operation validates its inputs up
//! front and either returns complete new buffers or an error; sources are
//! only ever read.

use log::debug;

use crate::engine::buffer::SampleBuffer;
use crate::error::{Result, SpliceError};

/// Minimum number of buffers `concatenate` accepts
pub const MIN_CONCAT_INPUTS: usize = 2;

/// Cut the `[start_secs, end_secs)` range out of `source`
///
/// Frame boundaries are `floor(t * sample_rate)` for both ends.
///
/// # Errors
/// * `InvalidRange` - if either time is not finite, `start_secs` is negative,
///   `start_secs >= end_secs`, or `end_secs` is past the end of the audio
/// * `OutOfBounds` - if the end frame lands past the last frame
pub fn trim(source: &SampleBuffer, start_secs: f64, end_secs: f64) -> Result<SampleBuffer> {
    let duration_secs = source.duration_secs();

    let in_range = start_secs.is_finite()
        && end_secs.is_finite()
        && start_secs >= 0.0
        && start_secs < end_secs
        && end_secs <= duration_secs;
    if !in_range {
        return Err(SpliceError::InvalidRange {
            start_secs,
            end_secs,
            duration_secs,
        });
    }

    let start = source.frame_at(start_secs);
    let end = source.frame_at(end_secs);
    if end > source.frame_count() {
        return Err(SpliceError::OutOfBounds {
            position: end as f64,
            lower: 0.0,
            upper: source.frame_count() as f64,
        });
    }

    debug!(
        "trim {:.3}s..{:.3}s -> frames {}..{} of {}",
        start_secs,
        end_secs,
        start,
        end,
        source.frame_count()
    );

    slice_frames(source, start, end)
}

/// Lay `sources` end to end along the time axis
///
/// No gap, crossfade, or reordering is applied.
///
/// # Errors
/// * `InsufficientInput` - if fewer than two buffers are given
/// * `IncompatibleFormat` - if any buffer's sample rate or channel count
///   differs from the first buffer's
pub fn concatenate(sources: &[SampleBuffer]) -> Result<SampleBuffer> {
    if sources.len() < MIN_CONCAT_INPUTS {
        return Err(SpliceError::InsufficientInput {
            count: sources.len(),
            required: MIN_CONCAT_INPUTS,
        });
    }

    let expected = sources[0].format();
    if let Some((index, mismatched)) = sources
        .iter()
        .enumerate()
        .find(|(_, buffer)| buffer.format() != expected)
    {
        return Err(SpliceError::IncompatibleFormat {
            index,
            expected,
            found: mismatched.format(),
        });
    }

    let total_frames: usize = sources.iter().map(SampleBuffer::frame_count).sum();
    debug!(
        "concatenate {} buffers ({}) -> {} frames",
        sources.len(),
        expected,
        total_frames
    );

    let mut joined = SampleBuffer::create(
        expected.sample_rate,
        expected.channel_count,
        total_frames,
    )?;

    let mut offset = 0;
    for source in sources {
        let len = source.frame_count();
        for ch in 0..expected.channel_count as usize {
            joined.channel_mut(ch)[offset..offset + len].copy_from_slice(source.channel(ch));
        }
        offset += len;
    }

    Ok(joined)
}

/// Split `source` at every time in `boundary_secs`
///
/// Boundaries may be given in any order and are sorted; repeated values
/// count once. Returns `boundaries + 1` buffers in time order.
///
/// # Errors
/// * `EmptyBoundarySet` - if no boundary is given
/// * `OutOfBounds` - if a boundary is not strictly inside the audio
pub fn segment(source: &SampleBuffer, boundary_secs: &[f64]) -> Result<Vec<SampleBuffer>> {
    if boundary_secs.is_empty() {
        return Err(SpliceError::EmptyBoundarySet);
    }

    let duration_secs = source.duration_secs();
    if let Some(&bad) = boundary_secs
        .iter()
        .find(|&&t| !(t.is_finite() && t > 0.0 && t < duration_secs))
    {
        return Err(SpliceError::OutOfBounds {
            position: bad,
            lower: 0.0,
            upper: duration_secs,
        });
    }

    let mut sorted = boundary_secs.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();

    let mut cuts = Vec::with_capacity(sorted.len() + 2);
    cuts.push(0);
    cuts.extend(sorted.iter().map(|&t| source.frame_at(t)));
    cuts.push(source.frame_count());

    debug!(
        "segment {} frames at {:?} -> {} parts",
        source.frame_count(),
        &cuts[1..cuts.len() - 1],
        cuts.len() - 1
    );

    cuts.windows(2)
        .map(|pair| slice_frames(source, pair[0], pair[1]))
        .collect()
}

/// Copy frames `start..end` of every channel into a new buffer
fn slice_frames(source: &SampleBuffer, start: usize, end: usize) -> Result<SampleBuffer> {
    let mut sliced = SampleBuffer::create(source.sample_rate(), source.channel_count(), end - start)?;
    for ch in 0..source.channel_count() as usize {
        sliced
            .channel_mut(ch)
            .copy_from_slice(&source.channel(ch)[start..end]);
    }
    Ok(sliced)
}

// ============================================================================
// Tests
// ============================================================================
