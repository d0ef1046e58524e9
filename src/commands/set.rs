use clap::Args;
use serde::Serialize;

use flypipe::fly::FlyCommand;
use flypipe::log_status;
use flypipe::{config, git, pipeline};

use super::CmdResult;

#[derive(Args)]
pub struct SetArgs {
    /// Concourse target alias (overrides configured target)
    #[arg(long)]
    pub target: Option<String>,

    /// Credentials file passed to fly via -l (supports ~)
    #[arg(long)]
    pub credentials: Option<String>,

    /// Pipeline template file (overrides configured template)
    #[arg(long)]
    pub template: Option<String>,

    /// Pipeline name prefix (overrides configured prefix)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Branch treated as the main line (overrides configured primary branch)
    #[arg(long)]
    pub primary_branch: Option<String>,

    /// Use this branch instead of querying git
    #[arg(long)]
    pub branch: Option<String>,

    /// Resolve and render without invoking fly
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
pub struct SetOutput {
    pub command: String,
    pub branch: String,
    pub pipeline: String,
    pub template: String,
    pub config: String,
    pub derived: bool,
    /// Occurrences of the placeholder token replaced in the derived file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacements: Option<usize>,
    pub target: String,
    pub fly: String,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

pub fn run(args: SetArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<SetOutput> {
    let mut settings = config::load()?;
    apply_overrides(&mut settings, &args);

    let branch = resolve_branch(args.branch.as_deref())?;

    let plan = pipeline::resolve(&settings, &branch);
    let replacements = pipeline::prepare(&plan)?;

    if let Some(count) = replacements {
        log_status!(
            "set",
            "Derived {} from {} ({} replacements)",
            plan.config,
            plan.template,
            count
        );
    }

    let fly = FlyCommand::set_pipeline(&settings, &plan);

    if args.dry_run {
        log_status!("set", "Dry run, not invoking: {}", fly.display());
        return Ok((output(&plan, &settings.target, &fly, true, replacements, None), 0));
    }

    log_status!("set", "Setting pipeline '{}' on target '{}'", plan.pipeline, settings.target);
    let exit_code = fly.status()?;

    Ok((
        output(&plan, &settings.target, &fly, false, replacements, Some(exit_code)),
        exit_code,
    ))
}

fn apply_overrides(settings: &mut config::Settings, args: &SetArgs) {
    if let Some(target) = &args.target {
        settings.target = target.clone();
    }
    if let Some(credentials) = &args.credentials {
        settings.credentials = Some(credentials.clone());
    }
    if let Some(template) = &args.template {
        settings.template = template.clone();
    }
    if let Some(prefix) = &args.prefix {
        settings.prefix = prefix.clone();
    }
    if let Some(primary_branch) = &args.primary_branch {
        settings.primary_branch = primary_branch.clone();
    }
}

fn resolve_branch(explicit: Option<&str>) -> flypipe::Result<String> {
    let branch = match explicit {
        Some(branch) => branch.trim().to_string(),
        None => {
            if !git::is_git_repo(".") {
                return Err(flypipe::Error::git_not_a_repository(".".to_string()));
            }
            git::current_branch(".")?
        }
    };

    if branch.is_empty() {
        return Err(flypipe::Error::validation_invalid_argument(
            "branch",
            "Branch name cannot be empty",
            explicit.map(|s| s.to_string()),
        ));
    }

    Ok(branch)
}

fn output(
    plan: &flypipe::pipeline::PipelinePlan,
    target: &str,
    fly: &FlyCommand,
    dry_run: bool,
    replacements: Option<usize>,
    exit_code: Option<i32>,
) -> SetOutput {
    SetOutput {
        command: "set.run".to_string(),
        branch: plan.branch.clone(),
        pipeline: plan.pipeline.clone(),
        template: plan.template.clone(),
        config: plan.config.clone(),
        derived: plan.derived,
        replacements,
        target: target.to_string(),
        fly: fly.display(),
        dry_run,
        exit_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with(f: impl FnOnce(&mut SetArgs)) -> SetArgs {
        let mut args = SetArgs {
            target: None,
            credentials: None,
            template: None,
            prefix: None,
            primary_branch: None,
            branch: None,
            dry_run: false,
        };
        f(&mut args);
        args
    }

    #[test]
    fn flags_override_persisted_settings() {
        let mut settings = config::Settings::default();
        let args = args_with(|a| {
            a.target = Some("prod".to_string());
            a.credentials = Some("~/c.yml".to_string());
            a.template = Some("ci/pipeline.yml".to_string());
            a.prefix = Some("tool".to_string());
            a.primary_branch = Some("main".to_string());
        });

        apply_overrides(&mut settings, &args);

        assert_eq!(settings.target, "prod");
        assert_eq!(settings.credentials.as_deref(), Some("~/c.yml"));
        assert_eq!(settings.template, "ci/pipeline.yml");
        assert_eq!(settings.prefix, "tool");
        assert_eq!(settings.primary_branch, "main");
    }

    #[test]
    fn absent_flags_leave_settings_untouched() {
        let mut settings = config::Settings::default();
        apply_overrides(&mut settings, &args_with(|_| {}));
        assert_eq!(settings, config::Settings::default());
    }

    #[test]
    fn explicit_branch_is_trimmed() {
        assert_eq!(resolve_branch(Some("  feature-x \n")).unwrap(), "feature-x");
    }

    #[test]
    fn empty_explicit_branch_is_rejected() {
        let err = resolve_branch(Some("   ")).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }
}
