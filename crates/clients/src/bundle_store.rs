//! Object storage for interview bundles (resumes, question sets, Q&A
//! analyses). Backed by any S3-compatible store; MinIO in development.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors from bundle storage operations.
#[derive(Debug, Error)]
pub enum BundleStoreError {
    #[error("bundle store request failed: {0}")]
    Upstream(String),

    #[error("bundle is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON document storage keyed by object path.
///
/// Paths are built by `parley_core::object_paths`; the store itself treats
/// them as opaque keys.
#[async_trait]
pub trait BundleStore: Send + Sync {
    /// Store a JSON document at `path`, overwriting any existing object.
    async fn put_json(&self, path: &str, value: &serde_json::Value)
        -> Result<(), BundleStoreError>;

    /// Fetch the JSON document at `path`, or `None` if no object exists.
    async fn get_json(&self, path: &str) -> Result<Option<serde_json::Value>, BundleStoreError>;

    /// Whether an object exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, BundleStoreError>;
}

/// `BundleStore` backed by an S3-compatible service.
pub struct S3BundleStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BundleStore {
    /// Connect to an S3-compatible endpoint with static credentials.
    ///
    /// Path-style addressing is forced so bucket names resolve against
    /// MinIO and other non-AWS endpoints.
    pub async fn connect(
        endpoint: &str,
        region: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
    ) -> Self {
        let credentials = Credentials::from_keys(access_key, secret_key, None);
        let base = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .load()
            .await;
        let s3_config = aws_sdk_s3::config::Builder::from(&base)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl BundleStore for S3BundleStore {
    async fn put_json(
        &self,
        path: &str,
        value: &serde_json::Value,
    ) -> Result<(), BundleStoreError> {
        let body = serde_json::to_vec(value)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|err| BundleStoreError::Upstream(err.to_string()))?;
        tracing::debug!(%path, "Stored bundle");
        Ok(())
    }

    async fn get_json(&self, path: &str) -> Result<Option<serde_json::Value>, BundleStoreError> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await;
        let output = match result {
            Ok(output) => output,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => {
                return Ok(None);
            }
            Err(err) => return Err(BundleStoreError::Upstream(err.to_string())),
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|err| BundleStoreError::Upstream(err.to_string()))?
            .into_bytes();
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn exists(&self, path: &str) -> Result<bool, BundleStoreError> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(false),
            Err(err) => Err(BundleStoreError::Upstream(err.to_string())),
        }
    }
}

/// In-memory `BundleStore` for tests.
#[derive(Default)]
pub struct MemoryBundleStore {
    objects: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryBundleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BundleStore for MemoryBundleStore {
    async fn put_json(
        &self,
        path: &str,
        value: &serde_json::Value,
    ) -> Result<(), BundleStoreError> {
        self.objects
            .write()
            .await
            .insert(path.to_string(), value.clone());
        Ok(())
    }

    async fn get_json(&self, path: &str) -> Result<Option<serde_json::Value>, BundleStoreError> {
        Ok(self.objects.read().await.get(path).cloned())
    }

    async fn exists(&self, path: &str) -> Result<bool, BundleStoreError> {
        Ok(self.objects.read().await.contains_key(path))
    }
}
