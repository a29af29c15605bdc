// Integration tests for WAV probing
//
// These tests verify that we can read WAV data and extract the metrics
// the processing pipeline records (duration, sample rate, channels).
// Fixtures are generated in memory; no audio files are checked in.

mod helpers;

use anyhow::Result;
use clip_ingest::AudioFile;
use helpers::wav_bytes;

#[test]
fn parse_reports_mono_16khz_metrics() -> Result<()> {
    let audio = AudioFile::parse(&wav_bytes(2.0, 16000, 1))?;

    assert!((audio.duration_seconds - 2.0).abs() < 0.01);
    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);

    Ok(())
}

#[test]
fn parse_reports_stereo_metrics() -> Result<()> {
    let audio = AudioFile::parse(&wav_bytes(0.5, 44100, 2))?;

    assert!((audio.duration_seconds - 0.5).abs() < 0.01);
    assert_eq!(audio.sample_rate, 44100);
    assert_eq!(audio.channels, 2);

    Ok(())
}

#[test]
fn open_reads_from_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sample.wav");
    std::fs::write(&path, wav_bytes(1.0, 8000, 1))?;

    let audio = AudioFile::open(&path)?;
    assert!((audio.duration_seconds - 1.0).abs() < 0.01);
    assert_eq!(audio.sample_rate, 8000);

    Ok(())
}

#[test]
fn open_nonexistent_file_fails() {
    let result = AudioFile::open("/nonexistent/path/to/audio.wav");

    assert!(result.is_err(), "opening nonexistent file should fail");
}

#[test]
fn parse_rejects_non_wav_bytes() {
    assert!(AudioFile::parse(b"definitely not a RIFF header").is_err());
    assert!(AudioFile::parse(&[]).is_err());
}
