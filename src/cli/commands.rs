//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Song catalog and activity log ETL
#[derive(Parser, Debug)]
#[command(name = "songlake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML), defaults to ./pipeline.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Raw data root, overrides `input` from the config file
    #[arg(short, long, global = true)]
    pub input: Option<String>,

    /// Output root, overrides `output` from the config file
    /// Supports: /path, s3://bucket/path, s3a://bucket/path, gs://bucket/path, az://container/path
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Summary format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Build every table
    Run,

    /// Build the songs and artists tables
    Songs,

    /// Build the users, time and songplays tables
    Logs,

    /// Print the command that provisions the cluster
    ClusterCommand,

    /// Load and check the configuration
    Validate,
}

/// Summary output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
