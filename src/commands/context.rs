use clap::Args;
use serde::Serialize;

use flypipe::pipeline::PipelinePlan;
use flypipe::{config, git, pipeline};

use super::CmdResult;

#[derive(Args)]
pub struct ContextArgs {
    /// Report for this branch instead of querying git
    #[arg(long)]
    pub branch: Option<String>,
}

#[derive(Serialize)]
pub struct ContextOutput {
    pub command: String,
    pub cwd: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PipelinePlan>,
    pub settings: config::Settings,
    pub settings_path: String,
}

/// Report what a `set` invocation would resolve to from the current
/// directory. No side effects beyond the git queries: outside a checkout
/// the branch and plan are simply absent.
pub fn run(args: ContextArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ContextOutput> {
    let settings = config::load()?;
    let settings_path = config::settings_path()?;

    let cwd = std::env::current_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| ".".to_string());

    let repo_root = git::repo_root(".");
    let branch = match args.branch {
        Some(branch) => Some(branch),
        None => {
            if repo_root.is_some() {
                git::current_branch(".").ok()
            } else {
                None
            }
        }
    };

    let plan = branch
        .as_deref()
        .map(|branch| pipeline::resolve(&settings, branch));

    Ok((
        ContextOutput {
            command: "context.run".to_string(),
            cwd,
            repo_root,
            branch,
            plan,
            settings,
            settings_path: settings_path.to_string_lossy().to_string(),
        },
        0,
    ))
}
