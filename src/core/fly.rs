use std::process::Command;

use serde::Serialize;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::pipeline::PipelinePlan;
use crate::utils::shell;

/// A `fly ... set-pipeline ...` invocation.
///
/// Argument order matches the original automation: target alias, action,
/// optional credentials file, var bindings, pipeline name, config file.
#[derive(Debug, Clone, Serialize)]
pub struct FlyCommand {
    pub target: String,
    pub pipeline: String,
    pub config: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    pub vars: Vec<(String, String)>,
}

impl FlyCommand {
    /// Build the set-pipeline invocation for a resolved plan, binding the
    /// branch var in both the primary and feature paths.
    pub fn set_pipeline(settings: &Settings, plan: &PipelinePlan) -> Self {
        Self {
            target: settings.target.clone(),
            pipeline: plan.pipeline.clone(),
            config: plan.config.clone(),
            credentials: settings.credentials.clone(),
            vars: vec![("branch".to_string(), plan.branch.clone())],
        }
    }

    /// Argument vector handed to the fly binary. Credentials paths are
    /// tilde-expanded here; fly receives the resolved path.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-t".to_string(),
            self.target.clone(),
            "set-pipeline".to_string(),
        ];

        if let Some(credentials) = &self.credentials {
            args.push("-l".to_string());
            args.push(shellexpand::tilde(credentials).to_string());
        }

        for (key, value) in &self.vars {
            args.push("--var".to_string());
            args.push(format!("{}={}", key, value));
        }

        args.push("-p".to_string());
        args.push(self.pipeline.clone());
        args.push("-c".to_string());
        args.push(self.config.clone());

        args
    }

    /// Single-line rendering of the invocation for dry runs and logs.
    pub fn display(&self) -> String {
        shell::join("fly", &self.args())
    }

    /// Run fly with inherited stdio so its prompt and output own the
    /// terminal. Returns the child's exit code; a nonzero code is not an
    /// error here — the caller passes it through as the process exit status.
    pub fn status(&self) -> Result<i32> {
        let status = Command::new("fly")
            .args(self.args())
            .status()
            .map_err(|e| Error::fly_spawn_failed(self.display(), e.to_string()))?;

        Ok(status.code().unwrap_or(1))
    }
}
