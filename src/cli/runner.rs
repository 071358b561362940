//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cluster::ClusterCommand;
use crate::config::{load_config, ClusterConfig, PipelineConfig, DEFAULT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::pipeline::{Pipeline, RunStats, Stage};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run => self.run_stage(Stage::All).await,
            Commands::Songs => self.run_stage(Stage::Catalog).await,
            Commands::Logs => self.run_stage(Stage::Events).await,
            Commands::ClusterCommand => self.cluster_command(),
            Commands::Validate => self.validate(),
        }
    }

    /// Path of the config file to read
    fn config_path(&self) -> PathBuf {
        self.cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Read the config file, or build one from the root overrides
    ///
    /// A missing default config file is tolerated only when both roots were
    /// given on the command line.
    fn read_config(&self) -> Result<PipelineConfig> {
        let path = self.config_path();
        let config = match load_config(&path) {
            Ok(config) => config,
            Err(Error::FileNotFound { .. }) if self.cli.config.is_none() => {
                match (&self.cli.input, &self.cli.output) {
                    (Some(input), Some(output)) => PipelineConfig::new(input, output),
                    _ => {
                        return Err(Error::config(format!(
                            "No config file at {} (use --config, or pass both --input and --output)",
                            path.display()
                        )))
                    }
                }
            }
            Err(e) => return Err(e),
        };

        let mut config = config;
        if let Some(input) = &self.cli.input {
            config = config.with_input(input);
        }
        if let Some(output) = &self.cli.output {
            config = config.with_output(output);
        }
        Ok(config)
    }

    /// Read and validate the config
    fn load_config(&self) -> Result<PipelineConfig> {
        let config = self.read_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Run pipeline stages
    async fn run_stage(&self, stage: Stage) -> Result<()> {
        let config = self.load_config()?;
        let mut pipeline = Pipeline::from_config(&config)?;
        let stats = pipeline.run(stage).await?;

        self.output_message(&run_summary(stage, &stats));
        Ok(())
    }

    /// Print the cluster provisioning command
    fn cluster_command(&self) -> Result<()> {
        let cluster = if self.cli.config.is_none() && !Path::new(DEFAULT_CONFIG_FILE).exists() {
            ClusterConfig::default()
        } else {
            load_config(self.config_path())?.cluster
        };

        println!("{}", ClusterCommand::new(&cluster));
        Ok(())
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Config is valid: {} -> {} ({})",
                    config.input, config.output, config.time_zone
                )
            }
        }));

        Ok(())
    }

    /// Output a JSON message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Summary message for a finished run
fn run_summary(stage: Stage, stats: &RunStats) -> Value {
    let tables: Vec<Value> = stats
        .tables
        .iter()
        .map(|t| {
            json!({
                "url": t.table_url,
                "rows": t.rows,
                "files": t.files,
            })
        })
        .collect();

    json!({
        "type": "SUMMARY",
        "summary": {
            "stage": stage.to_string(),
            "files_read": stats.files_read,
            "records_read": stats.records_read,
            "records_dropped": stats.records_dropped,
            "tables": tables,
            "duration_ms": stats.duration_ms,
        }
    })
}
