//! Pipeline configuration
//!
//! Loaded from a YAML file. Credentials are carried in this struct and handed
//! to the storage builders; nothing here touches the process environment.

use crate::error::{Error, Result};
use crate::output::{ParquetWriterConfig, DEFAULT_ROW_GROUP_SIZE};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Default session time zone used for timestamp derivation
pub const DEFAULT_TIME_ZONE: &str = "America/Los_Angeles";

/// Default config file name looked up by the CLI
pub const DEFAULT_CONFIG_FILE: &str = "pipeline.yaml";

// ============================================================================
// Top-Level Pipeline Config
// ============================================================================

/// Complete pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Raw data root (holds `song_data/` and `log_data/`)
    pub input: String,

    /// Root under which the five table paths are written
    pub output: String,

    /// IANA zone used to derive calendar parts from epoch timestamps
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Object store credentials
    #[serde(default)]
    pub credentials: Credentials,

    /// Encoding of the written table files
    #[serde(default)]
    pub parquet: ParquetSettings,

    /// Managed cluster shape for the `cluster-command` helper
    #[serde(default)]
    pub cluster: ClusterConfig,
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

impl PipelineConfig {
    /// Create a config for the given roots with default settings
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            time_zone: default_time_zone(),
            credentials: Credentials::default(),
            parquet: ParquetSettings::default(),
            cluster: ClusterConfig::default(),
        }
    }

    /// Override the input root
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    /// Override the output root
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Set the session time zone
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Set the object store credentials
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Parse the configured time zone
    pub fn tz(&self) -> Result<Tz> {
        self.time_zone.parse::<Tz>().map_err(|e| {
            Error::invalid_value("time_zone", format!("'{}': {e}", self.time_zone))
        })
    }

    /// Check the config for fatal problems before any data is touched
    pub fn validate(&self) -> Result<()> {
        if self.input.trim().is_empty() {
            return Err(Error::missing_field("input"));
        }
        if self.output.trim().is_empty() {
            return Err(Error::missing_field("output"));
        }
        self.tz()?;
        ParquetWriterConfig::try_from(&self.parquet)?;

        if is_s3_url(&self.input) || is_s3_url(&self.output) {
            self.credentials.require_keys()?;
        }

        Ok(())
    }
}

/// Whether a storage URL points at S3
fn is_s3_url(url: &str) -> bool {
    url.starts_with("s3://") || url.starts_with("s3a://")
}

// ============================================================================
// Credentials
// ============================================================================

/// Access keys for S3-compatible storage
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key id
    #[serde(default)]
    pub aws_access_key_id: Option<String>,

    /// Secret access key
    #[serde(default)]
    pub aws_secret_access_key: Option<String>,

    /// Bucket region
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint (S3-compatible stores)
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Credentials {
    /// Create credentials from an access key pair
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            aws_access_key_id: Some(access_key_id.into()),
            aws_secret_access_key: Some(secret_access_key.into()),
            region: None,
            endpoint: None,
        }
    }

    /// Set the region
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Return both keys, failing on whichever is missing or blank
    pub fn require_keys(&self) -> Result<(&str, &str)> {
        let key_id = non_blank(self.aws_access_key_id.as_deref())
            .ok_or_else(|| Error::missing_field("credentials.aws_access_key_id"))?;
        let secret = non_blank(self.aws_secret_access_key.as_deref())
            .ok_or_else(|| Error::missing_field("credentials.aws_secret_access_key"))?;
        Ok((key_id, secret))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field(
                "aws_secret_access_key",
                &self.aws_secret_access_key.as_ref().map(|_| "********"),
            )
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

// ============================================================================
// Parquet
// ============================================================================

/// File encoding settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParquetSettings {
    /// `snappy`, `zstd` or `uncompressed`
    #[serde(default = "default_compression")]
    pub compression: String,

    /// Maximum rows per row group
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,

    /// Dictionary-encode columns
    #[serde(default = "default_true")]
    pub dictionary: bool,

    /// Write page statistics
    #[serde(default = "default_true")]
    pub statistics: bool,
}

fn default_compression() -> String {
    "snappy".to_string()
}

fn default_row_group_size() -> usize {
    DEFAULT_ROW_GROUP_SIZE
}

impl Default for ParquetSettings {
    fn default() -> Self {
        Self {
            compression: default_compression(),
            row_group_size: default_row_group_size(),
            dictionary: true,
            statistics: true,
        }
    }
}

// ============================================================================
// Cluster
// ============================================================================

/// Shape of the managed cluster that runs the job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Cluster name
    #[serde(default = "default_cluster_name")]
    pub name: String,

    /// Managed service release label
    #[serde(default = "default_release_label")]
    pub release_label: String,

    /// Number of nodes
    #[serde(default = "default_instance_count")]
    pub instance_count: u32,

    /// Node instance type
    #[serde(default = "default_instance_type")]
    pub instance_type: String,

    /// Applications installed on the cluster
    #[serde(default = "default_applications")]
    pub applications: Vec<String>,

    /// SSH key pair name
    #[serde(default)]
    pub key_name: Option<String>,

    /// Subnet to launch into
    #[serde(default)]
    pub subnet_id: Option<String>,

    /// Security group of the master node
    #[serde(default)]
    pub master_security_group: Option<String>,

    /// Security group of the worker nodes
    #[serde(default)]
    pub slave_security_group: Option<String>,

    /// Named CLI profile
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Bootstrap script run on every node
    #[serde(default)]
    pub bootstrap_script: Option<String>,

    /// Verify TLS certificates when calling the provider API
    #[serde(default = "default_true")]
    pub verify_ssl: bool,
}

fn default_cluster_name() -> String {
    "emr-sandbox".to_string()
}

fn default_release_label() -> String {
    "emr-5.28.0".to_string()
}

fn default_instance_count() -> u32 {
    3
}

fn default_instance_type() -> String {
    "m5.xlarge".to_string()
}

fn default_applications() -> Vec<String> {
    vec!["Spark".to_string(), "Hive".to_string()]
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: default_cluster_name(),
            release_label: default_release_label(),
            instance_count: default_instance_count(),
            instance_type: default_instance_type(),
            applications: default_applications(),
            key_name: None,
            subnet_id: None,
            master_security_group: None,
            slave_security_group: None,
            profile: default_profile(),
            bootstrap_script: None,
            verify_ssl: true,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a pipeline config from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        }
    })?;
    load_config_from_str(&content)
}

/// Load a pipeline config from a YAML string
///
/// Only parses; call [`PipelineConfig::validate`] once CLI overrides are applied.
pub fn load_config_from_str(yaml: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig = serde_yaml::from_str(yaml)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r"
input: s3a://udacity-dend/
output: s3a://lake-bucket/TempData/DataLakeETL/
credentials:
  aws_access_key_id: AKIAEXAMPLE
  aws_secret_access_key: secret
  region: us-west-2
parquet:
  compression: zstd
  row_group_size: 50000
cluster:
  instance_count: 5
  subnet_id: subnet-086f716ac1da230fb
";

    #[test]
    fn test_load_full_config() {
        let config = load_config_from_str(FULL).unwrap();
        assert_eq!(config.input, "s3a://udacity-dend/");
        assert_eq!(config.time_zone, DEFAULT_TIME_ZONE);
        assert_eq!(config.credentials.region.as_deref(), Some("us-west-2"));
        assert_eq!(config.parquet.compression, "zstd");
        assert_eq!(config.parquet.row_group_size, 50_000);
        assert!(config.parquet.dictionary);
        assert_eq!(config.cluster.instance_count, 5);
        assert_eq!(config.cluster.instance_type, "m5.xlarge");
        assert_eq!(
            config.cluster.subnet_id.as_deref(),
            Some("subnet-086f716ac1da230fb")
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_s3_roots_require_keys() {
        let config = PipelineConfig::new("s3://in/", "/tmp/out");
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required config field: credentials.aws_access_key_id"
        );

        let config = config.with_credentials(Credentials {
            aws_access_key_id: Some("AKIA".to_string()),
            aws_secret_access_key: Some("  ".to_string()),
            ..Credentials::default()
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("aws_secret_access_key"));
    }

    #[test]
    fn test_local_roots_need_no_keys() {
        let config = PipelineConfig::new("./data", "./out");
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_roots_rejected() {
        assert!(PipelineConfig::new("", "./out").validate().is_err());
        assert!(PipelineConfig::new("./data", " ").validate().is_err());
    }

    #[test]
    fn test_unknown_time_zone() {
        let config = PipelineConfig::new("./data", "./out").with_time_zone("Mars/Olympus");
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("time_zone"));
    }

    #[test]
    fn test_parquet_defaults() {
        let config = load_config_from_str("input: ./data\noutput: ./out\n").unwrap();
        assert_eq!(config.parquet, ParquetSettings::default());
        assert_eq!(config.parquet.compression, "snappy");
        assert_eq!(config.parquet.row_group_size, DEFAULT_ROW_GROUP_SIZE);
    }

    #[test]
    fn test_unknown_compression() {
        let mut config = PipelineConfig::new("./data", "./out");
        config.parquet.compression = "lzma".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("parquet.compression"));
    }

    #[test]
    fn test_secret_is_masked_in_debug() {
        let creds = Credentials::new("AKIA", "very-secret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("AKIA"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
