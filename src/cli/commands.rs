//! CLI Command Implementations
//!
//! Each command decodes its inputs, runs one editing operation, encodes the
//! result and writes it under its default file name.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;
use walkdir::WalkDir;

use crate::engine::{
    concatenate, decode_file, encode_with, segment, trim, write_output, AudioFormat,
    EncodeOptions, OutputName, SampleBuffer, WavDecoder, WrittenFile,
};
use crate::error::Result;

/// Trim a file to `[start, end)` seconds.
pub fn trim_file(
    input: &Path,
    start: f64,
    end: f64,
    clamp: bool,
    output_dir: &Path,
    options: &EncodeOptions,
) -> Result<WrittenFile> {
    info!("Trimming {} from {}s to {}s", input.display(), start, end);

    let source = decode_file(&WavDecoder, input)?;

    let (start, end) = if clamp {
        let clamped = (source.clamp_seconds(start), source.clamp_seconds(end));
        if clamped != (start, end) {
            warn!(
                "Range clamped to {:.3}s..{:.3}s (audio is {:.3}s)",
                clamped.0,
                clamped.1,
                source.duration_secs()
            );
        }
        clamped
    } else {
        (start, end)
    };

    let trimmed = trim(&source, start, end)?;
    let written = write_output(output_dir, OutputName::Trimmed, &encode_with(&trimmed, options))?;
    print_written(&written);

    Ok(written)
}

/// Join files end to end.
///
/// With `dir`, every `.wav` file below it is appended after `inputs`, sorted
/// by path.
pub fn join_files(
    inputs: &[PathBuf],
    dir: Option<&Path>,
    output_dir: &Path,
    options: &EncodeOptions,
) -> Result<WrittenFile> {
    let mut paths = inputs.to_vec();
    if let Some(dir) = dir {
        paths.extend(collect_wav_files(dir)?);
    }
    info!("Joining {} files", paths.len());

    let sources = paths
        .iter()
        .map(|path| decode_file(&WavDecoder, path))
        .collect::<Result<Vec<SampleBuffer>>>()?;

    let joined = concatenate(&sources)?;
    let written = write_output(output_dir, OutputName::Joined, &encode_with(&joined, options))?;
    print_written(&written);

    Ok(written)
}

/// Split a file at the given times.
pub fn split_file(
    input: &Path,
    at: &[f64],
    output_dir: &Path,
    options: &EncodeOptions,
) -> Result<Vec<WrittenFile>> {
    info!("Splitting {} at {:?}", input.display(), at);

    let source = decode_file(&WavDecoder, input)?;
    let parts = segment(&source, at)?;

    let mut written = Vec::with_capacity(parts.len());
    for (part, name) in parts.iter().zip(OutputName::segments(parts.len())) {
        let file = write_output(output_dir, name, &encode_with(part, options))?;
        print_written(&file);
        written.push(file);
    }

    println!("Split into {} segments.", written.len());
    Ok(written)
}

/// Summary printed by the `info` command
#[derive(Debug, Clone, Serialize)]
pub struct AudioInfo {
    pub path: PathBuf,
    #[serde(flatten)]
    pub format: AudioFormat,
    pub frame_count: usize,
    pub duration_secs: f64,
}

impl AudioInfo {
    pub fn from_buffer(path: &Path, buffer: &SampleBuffer) -> Self {
        Self {
            path: path.to_path_buf(),
            format: buffer.format(),
            frame_count: buffer.frame_count(),
            duration_secs: buffer.duration_secs(),
        }
    }
}

/// Print format and length of a file.
pub fn show_info(input: &Path, json: bool) -> Result<AudioInfo> {
    let buffer = decode_file(&WavDecoder, input)?;
    let summary = AudioInfo::from_buffer(input, &buffer);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("File:     {}", summary.path.display());
        println!("Format:   {}", summary.format);
        println!("Frames:   {}", summary.frame_count);
        println!("Duration: {:.3}s", summary.duration_secs);
    }

    Ok(summary)
}

fn collect_wav_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let is_wav = entry
            .path()
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("wav"))
            .unwrap_or(false);
        if entry.file_type().is_file() && is_wav {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

fn print_written(file: &WrittenFile) {
    println!(
        "Wrote {} ({} bytes, sha256 {})",
        file.path.display(),
        file.len,
        file.sha256
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{encode, SampleLayout};
    use std::fs;
    use tempfile::tempdir;

    fn write_fixture(path: &Path, sample_rate: u32, frames: usize) {
        let samples: Vec<f32> = (0..frames).map(|i| (i % 100) as f32 / 200.0).collect();
        let buffer = SampleBuffer::from_channels(sample_rate, vec![samples]).unwrap();
        fs::write(path, encode(&buffer)).unwrap();
    }

    #[test]
    fn test_trim_file_writes_default_name() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        write_fixture(&input, 8000, 8000);

        let written = trim_file(
            &input,
            0.25,
            0.75,
            false,
            dir.path(),
            &EncodeOptions::default(),
        )
        .unwrap();

        assert_eq!(written.path, dir.path().join("trimmed_audio.wav"));
        assert_eq!(written.len, 44 + 4000 * 2);
    }

    #[test]
    fn test_trim_file_clamps_on_request() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        write_fixture(&input, 8000, 8000);
        let options = EncodeOptions::default();

        assert!(trim_file(&input, 0.5, 5.0, false, dir.path(), &options).is_err());

        let written = trim_file(&input, 0.5, 5.0, true, dir.path(), &options).unwrap();
        assert_eq!(written.len, 44 + 4000 * 2);
    }

    #[test]
    fn test_join_files_with_dir() {
        let dir = tempdir().unwrap();
        let parts = dir.path().join("parts");
        fs::create_dir_all(&parts).unwrap();
        write_fixture(&parts.join("b.wav"), 8000, 300);
        write_fixture(&parts.join("a.wav"), 8000, 200);
        fs::write(parts.join("notes.txt"), "not audio").unwrap();

        let first = dir.path().join("first.wav");
        write_fixture(&first, 8000, 100);

        let out = dir.path().join("out");
        let written = join_files(&[first], Some(parts.as_path()), &out, &EncodeOptions::default()).unwrap();

        assert_eq!(written.path, out.join("joined_audio.wav"));
        assert_eq!(written.len, 44 + 600 * 2);
    }

    #[test]
    fn test_collect_wav_files_sorted() {
        let dir = tempdir().unwrap();
        write_fixture(&dir.path().join("2.wav"), 8000, 10);
        write_fixture(&dir.path().join("1.WAV"), 8000, 10);
        fs::write(dir.path().join("3.txt"), "x").unwrap();

        let found = collect_wav_files(dir.path()).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["1.WAV", "2.wav"]);
    }

    #[test]
    fn test_split_file_numbers_segments() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        write_fixture(&input, 8000, 8000);

        let options = EncodeOptions {
            layout: SampleLayout::Interleaved,
        };
        let written = split_file(&input, &[0.5, 0.25], dir.path(), &options).unwrap();

        let names: Vec<PathBuf> = written.iter().map(|w| w.path.clone()).collect();
        assert_eq!(
            names,
            vec![
                dir.path().join("audio_segment_1.wav"),
                dir.path().join("audio_segment_2.wav"),
                dir.path().join("audio_segment_3.wav"),
            ]
        );
        assert_eq!(written[0].len, 44 + 2000 * 2);
        assert_eq!(written[2].len, 44 + 4000 * 2);
    }

    #[test]
    fn test_show_info() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        write_fixture(&input, 16000, 8000);

        let summary = show_info(&input, true).unwrap();
        assert_eq!(summary.format, AudioFormat::new(16000, 1));
        assert_eq!(summary.frame_count, 8000);
        assert!((summary.duration_secs - 0.5).abs() < 1e-12);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["sample_rate"], 16000);
        assert_eq!(json["channel_count"], 1);
    }
}
