//! Object storage boundary
//!
//! Raw clip bytes live in an object store addressed by key; the service
//! only ever calls put/get/delete. The trait keeps the boundary narrow so
//! an S3-compatible backend can slot in and tests can substitute an
//! in-memory fake.

mod fs;

pub use fs::FsObjectStore;

use anyhow::Result;

/// Durable blob storage addressed by key.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under a key, overwriting any existing object.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Fetch the bytes stored under a key. Missing keys are an error.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Remove an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}
