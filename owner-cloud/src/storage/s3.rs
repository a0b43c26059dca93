//! S3-backed object store

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;

use super::{ObjectStore, StorageError, key_from_locator, static_url};

#[derive(Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    region: String,
    presign_expiry: Duration,
}

impl S3ObjectStore {
    pub fn new(client: S3Client, bucket: String, region: String, presign_expiry: Duration) -> Self {
        Self {
            client,
            bucket,
            region,
            presign_expiry,
        }
    }

    /// Build a client from the default AWS credential chain for `region`
    pub async fn connect(bucket: String, region: String, presign_expiry: Duration) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()))
            .load()
            .await;
        Self::new(S3Client::new(&aws_config), bucket, region, presign_expiry)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(bytes.into())
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(DisplayErrorContext(&e).to_string()))?;

        tracing::info!(bucket = %self.bucket, key = %key, "Object stored");
        Ok(static_url(&self.bucket, &self.region, key))
    }

    async fn delete(&self, locator: &str) -> Result<(), StorageError> {
        let key = key_from_locator(&self.bucket, &self.region, locator)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| StorageError::Delete(DisplayErrorContext(&e).to_string()))?;

        tracing::info!(bucket = %self.bucket, key = %key, "Object deleted");
        Ok(())
    }

    async fn presign(&self, locator: &str) -> Result<String, StorageError> {
        let key = key_from_locator(&self.bucket, &self.region, locator)?;
        let presigning = PresigningConfig::expires_in(self.presign_expiry)
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Presign(DisplayErrorContext(&e).to_string()))?;

        Ok(presigned.uri().to_string())
    }
}
