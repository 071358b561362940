//! Storage locations (S3, GCS, Azure, local)

use super::pattern::GlobFilter;
use crate::config::Credentials;
use crate::error::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A root inside an object store
#[derive(Clone)]
pub struct StorageLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// Original URL scheme for logging
    scheme: String,
    /// Display URL of the root, for logging
    root_url: String,
}

impl fmt::Debug for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageLocation")
            .field("scheme", &self.scheme)
            .field("root", &self.root_url)
            .finish_non_exhaustive()
    }
}

impl StorageLocation {
    /// Open an existing location to read from
    ///
    /// Local roots must already exist.
    pub fn open_input(url: &str, credentials: &Credentials) -> Result<Self> {
        Self::parse(url, credentials, false)
    }

    /// Open a location to write to, creating local roots as needed
    pub fn open_output(url: &str, credentials: &Credentials) -> Result<Self> {
        Self::parse(url, credentials, true)
    }

    /// Wrap an existing store
    pub fn from_store(
        store: Arc<dyn ObjectStore>,
        prefix: impl Into<String>,
        scheme: impl Into<String>,
    ) -> Self {
        let prefix = prefix.into().trim_matches('/').to_string();
        let scheme = scheme.into();
        Self {
            store,
            root_url: format!("{scheme}://{prefix}"),
            prefix,
            scheme,
        }
    }

    /// Parse a location URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` or `s3a://bucket/path/` - AWS S3
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/`, `./path/` or `file:///path` - Local filesystem
    fn parse(url: &str, credentials: &Credentials, create: bool) -> Result<Self> {
        if let Some(rest) = url
            .strip_prefix("s3://")
            .or_else(|| url.strip_prefix("s3a://"))
        {
            Self::parse_s3(rest, credentials)
        } else if let Some(rest) = url.strip_prefix("gs://") {
            Self::parse_gcs(rest)
        } else if let Some(rest) = url.strip_prefix("az://") {
            Self::parse_azure(rest)
        } else {
            Self::parse_local(url, create)
        }
    }

    /// Split `bucket/some/prefix/` into bucket and prefix
    fn split_bucket(without_scheme: &str) -> Result<(&str, String)> {
        let (bucket, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].trim_matches('/').to_string(),
            ),
            None => (without_scheme, String::new()),
        };
        if bucket.is_empty() {
            return Err(Error::config(format!(
                "Storage URL has no bucket: {without_scheme}"
            )));
        }
        Ok((bucket, prefix))
    }

    /// Build an S3 store with explicit keys
    fn parse_s3(without_scheme: &str, credentials: &Credentials) -> Result<Self> {
        let (bucket, prefix) = Self::split_bucket(without_scheme)?;
        let (key_id, secret) = credentials.require_keys()?;

        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_access_key_id(key_id)
            .with_secret_access_key(secret);

        if let Some(region) = &credentials.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &credentials.endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            root_url: join_url(&format!("s3://{bucket}"), &prefix),
            prefix,
            scheme: "s3".to_string(),
        })
    }

    /// Build a GCS store
    fn parse_gcs(without_scheme: &str) -> Result<Self> {
        let (bucket, prefix) = Self::split_bucket(without_scheme)?;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            root_url: join_url(&format!("gs://{bucket}"), &prefix),
            prefix,
            scheme: "gs".to_string(),
        })
    }

    /// Build an Azure Blob store
    fn parse_azure(without_scheme: &str) -> Result<Self> {
        let (container, prefix) = Self::split_bucket(without_scheme)?;

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            root_url: join_url(&format!("az://{container}"), &prefix),
            prefix,
            scheme: "az".to_string(),
        })
    }

    /// Open a local filesystem root
    fn parse_local(path: &str, create: bool) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        if create {
            std::fs::create_dir_all(path)
                .map_err(|e| Error::storage(format!("Failed to create directory {path}: {e}")))?;
        }

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::storage(format!("Failed to open local store {path}: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
            root_url: format!("file://{}", path.trim_end_matches('/')),
        })
    }

    /// Get the scheme (s3, gs, az, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Resolve a path relative to this root
    fn resolve(&self, relative: &str) -> Result<ObjectPath> {
        let relative = relative.trim_matches('/');
        let joined = match (self.prefix.is_empty(), relative.is_empty()) {
            (true, _) => relative.to_string(),
            (false, true) => self.prefix.clone(),
            (false, false) => format!("{}/{relative}", self.prefix),
        };
        ObjectPath::parse(&joined).map_err(|e| Error::storage(format!("Invalid path {joined}: {e}")))
    }

    /// Strip this root's prefix from a listed object path
    fn relative<'a>(&self, path: &'a ObjectPath) -> &'a str {
        let raw = path.as_ref();
        if self.prefix.is_empty() {
            return raw;
        }
        raw.strip_prefix(self.prefix.as_str())
            .map_or(raw, |rest| rest.trim_start_matches('/'))
    }

    /// Display form of a relative path, for logging
    pub fn url(&self, relative: &str) -> String {
        join_url(&self.root_url, relative)
    }

    /// List relative paths matching a glob, sorted
    ///
    /// Only the literal leading segments of the pattern are listed, so a
    /// pattern whose prefix does not exist yields an empty list.
    pub async fn list_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let filter = GlobFilter::new(pattern)?;
        let list_root = self.resolve(filter.prefix())?;
        debug!("Listing {} for {}", self.url(filter.prefix()), filter.as_str());

        let objects: Vec<_> = self.store.list(Some(&list_root)).try_collect().await?;

        let mut matched: Vec<String> = objects
            .iter()
            .map(|meta| self.relative(&meta.location))
            .filter(|rel| filter.matches(rel))
            .map(str::to_string)
            .collect();
        matched.sort();
        Ok(matched)
    }

    /// Read an object fully
    pub async fn read(&self, relative: &str) -> Result<Bytes> {
        let path = self.resolve(relative)?;
        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| Error::storage(format!("Failed to read {path}: {e}")))?;
        Ok(result.bytes().await?)
    }

    /// Write bytes to a relative path, returning its display URL
    pub async fn write(&self, relative: &str, data: Bytes) -> Result<String> {
        let path = self.resolve(relative)?;

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::storage(format!("Failed to write {path}: {e}")))?;

        Ok(self.url(relative))
    }

    /// Delete every object under a relative prefix, returning how many went
    pub async fn delete_prefix(&self, relative: &str) -> Result<usize> {
        let root = self.resolve(relative)?;
        let objects: Vec<_> = self.store.list(Some(&root)).try_collect().await?;

        for meta in &objects {
            self.store
                .delete(&meta.location)
                .await
                .map_err(|e| Error::storage(format!("Failed to delete {}: {e}", meta.location)))?;
        }

        Ok(objects.len())
    }
}

fn join_url(root: &str, relative: &str) -> String {
    let relative = relative.trim_matches('/');
    if relative.is_empty() {
        root.to_string()
    } else if root.ends_with("://") {
        format!("{root}{relative}")
    } else {
        format!("{}/{relative}", root.trim_end_matches('/'))
    }
}
