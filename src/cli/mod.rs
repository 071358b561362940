//! CLI module
//!
//! Command-line interface for running the pipeline.
//!
//! # Commands
//!
//! - `run` - Build all five tables
//! - `songs` - Build the songs and artists tables
//! - `logs` - Build the users, time and songplays tables
//! - `cluster-command` - Print the cluster provisioning command
//! - `validate` - Load and check the configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
