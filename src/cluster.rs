//! Managed cluster provisioning command
//!
//! Renders the `aws emr create-cluster` invocation for a [`ClusterConfig`].
//! The command is only rendered; running it is left to the operator.

use crate::config::ClusterConfig;
use std::fmt;

/// Program the rendered command invokes
pub const CLUSTER_PROGRAM: &str = "aws";

/// A rendered cluster provisioning command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterCommand {
    args: Vec<String>,
}

impl ClusterCommand {
    /// Render the command for a cluster config
    pub fn new(config: &ClusterConfig) -> Self {
        let mut args: Vec<String> = vec![
            "emr".into(),
            "create-cluster".into(),
            "--name".into(),
            config.name.clone(),
            "--use-default-roles".into(),
            "--release-label".into(),
            config.release_label.clone(),
            "--instance-count".into(),
            config.instance_count.to_string(),
        ];

        if !config.applications.is_empty() {
            args.push("--applications".into());
            args.extend(config.applications.iter().map(|app| format!("Name={app}")));
        }

        let attributes = ec2_attributes(config);
        if !attributes.is_empty() {
            args.push("--ec2-attributes".into());
            args.push(attributes);
        }

        args.push("--instance-type".into());
        args.push(config.instance_type.clone());
        args.push("--profile".into());
        args.push(config.profile.clone());

        if let Some(script) = &config.bootstrap_script {
            args.push("--bootstrap-actions".into());
            args.push(format!("Path={script}"));
        }
        if !config.verify_ssl {
            args.push("--no-verify-ssl".into());
        }

        Self { args }
    }
}

fn ec2_attributes(config: &ClusterConfig) -> String {
    [
        ("KeyName", config.key_name.as_deref()),
        ("SubnetId", config.subnet_id.as_deref()),
        ("EmrManagedMasterSecurityGroup", config.master_security_group.as_deref()),
        ("EmrManagedSlaveSecurityGroup", config.slave_security_group.as_deref()),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|v| format!("{key}={v}")))
    .collect::<Vec<_>>()
    .join(",")
}

/// Quote an argument for a POSIX shell when it needs it
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=.,/:@+%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

impl fmt::Display for ClusterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CLUSTER_PROGRAM}")?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}
