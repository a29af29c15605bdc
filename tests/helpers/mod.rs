// Shared fakes and fixtures for the integration tests.
//
// The object store and transcoder fakes implement the real traits so the
// handlers under test run unmodified, without a network or a subprocess.

#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use axum::body::Body;
use axum::http::Request;
use clip_ingest::{TranscodeOutput, Transcoder};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

pub const MULTIPART_BOUNDARY: &str = "clip-ingest-test-boundary";

/// In-memory object store with introspection for assertions.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }
}

#[async_trait::async_trait]
impl clip_ingest::ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("no object stored under {key}"))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Object store whose every operation fails, for transient-error paths.
pub struct FailingObjectStore;

#[async_trait::async_trait]
impl clip_ingest::ObjectStore for FailingObjectStore {
    async fn put(&self, _key: &str, _bytes: &[u8]) -> Result<()> {
        bail!("simulated storage outage")
    }

    async fn get(&self, _key: &str) -> Result<Vec<u8>> {
        bail!("simulated storage outage")
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        bail!("simulated storage outage")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Transcoder returning canned metrics without spawning anything.
pub struct StubTranscoder {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl StubTranscoder {
    pub fn new(duration_seconds: f64, sample_rate: u32, channels: u16) -> Self {
        Self {
            duration_seconds,
            sample_rate,
            channels,
        }
    }
}

#[async_trait::async_trait]
impl Transcoder for StubTranscoder {
    async fn transcode(&self, input: &[u8]) -> Result<TranscodeOutput> {
        Ok(TranscodeOutput {
            audio: input.to_vec(),
            duration_seconds: self.duration_seconds,
            sample_rate: self.sample_rate,
            channels: self.channels,
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Transcoder that always fails, as a crashed or unsupported-input run.
pub struct FailingTranscoder;

#[async_trait::async_trait]
impl Transcoder for FailingTranscoder {
    async fn transcode(&self, _input: &[u8]) -> Result<TranscodeOutput> {
        bail!("simulated codec failure")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Silent 16-bit PCM WAV of the given shape, entirely in memory.
pub fn wav_bytes(duration_seconds: f64, sample_rate: u32, channels: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let frames = (duration_seconds * sample_rate as f64) as u32;
        for _ in 0..frames * channels as u32 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    cursor.into_inner()
}

/// Multipart POST /clips request carrying one file field.
pub fn multipart_request(filename: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/clips")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Multipart POST /clips request with only a text field, no file.
pub fn multipart_text_request(name: &str, value: &str) -> Request<Body> {
    let body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
         {value}\r\n\
         --{MULTIPART_BOUNDARY}--\r\n"
    );

    Request::builder()
        .method("POST")
        .uri("/clips")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn response_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
