//! Two-path pipeline resolution.
//!
//! The primary branch keeps the fixed template and fixed pipeline name; any
//! other branch gets a derived per-branch configuration file and a
//! `<prefix>-<branch>` pipeline name. There are no other states.

use std::path::Path;

use serde::Serialize;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::template;

/// Literal token in the template replaced with the branch name.
pub const PLACEHOLDER_TOKEN: &str = "snapshot";

/// Resolved plan for one invocation: which config file fly receives, under
/// which pipeline name, and whether that file must first be derived.
#[derive(Debug, Clone, Serialize)]
pub struct PipelinePlan {
    pub branch: String,
    pub pipeline: String,
    /// Template file the plan starts from.
    pub template: String,
    /// Config file handed to fly: the template itself on the primary
    /// branch, the derived per-branch file otherwise.
    pub config: String,
    pub derived: bool,
}

/// Pipeline name for a branch: the bare prefix on the primary branch,
/// `<prefix>-<branch>` otherwise.
pub fn pipeline_name(prefix: &str, primary_branch: &str, branch: &str) -> String {
    if branch == primary_branch {
        prefix.to_string()
    } else {
        format!("{}-{}", prefix, branch)
    }
}

/// Per-branch config filename derived from the template path:
/// `pipeline.yml` + `feature-x` → `pipeline-feature-x.yml`, preserving any
/// leading directory.
pub fn derived_config_path(template: &str, branch: &str) -> String {
    let path = Path::new(template);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| template.to_string());
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent
            .join(format!("{}-{}{}", stem, branch, ext))
            .to_string_lossy()
            .to_string(),
        _ => format!("{}-{}{}", stem, branch, ext),
    }
}

/// Resolve the plan for `branch` under `settings`. Pure; no file I/O.
pub fn resolve(settings: &Settings, branch: &str) -> PipelinePlan {
    let primary = branch == settings.primary_branch;
    let config = if primary {
        settings.template.clone()
    } else {
        derived_config_path(&settings.template, branch)
    };

    PipelinePlan {
        branch: branch.to_string(),
        pipeline: pipeline_name(&settings.prefix, &settings.primary_branch, branch),
        template: settings.template.clone(),
        config,
        derived: !primary,
    }
}

/// Materialize the plan: on the feature path, derive the per-branch config
/// file by token substitution and return the replacement count. The primary
/// path performs no templating and returns None.
///
/// The template must exist on both paths; the original automation surfaced
/// a missing template as a hard failure before anything reached fly.
pub fn prepare(plan: &PipelinePlan) -> Result<Option<usize>> {
    let template = Path::new(&plan.template);
    if !template.exists() {
        return Err(Error::template_not_found(plan.template.clone()));
    }

    if !plan.derived {
        return Ok(None);
    }

    let count = template::substitute_file(
        template,
        Path::new(&plan.config),
        PLACEHOLDER_TOKEN,
        &plan.branch,
    )?;
    Ok(Some(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn primary_branch_uses_fixed_template_and_name() {
        let settings = Settings::default();
        let plan = resolve(&settings, "master");

        assert_eq!(plan.pipeline, "sts4");
        assert_eq!(plan.config, "pipeline.yml");
        assert!(!plan.derived);
    }

    #[test]
    fn feature_branch_gets_derived_file_and_prefixed_name() {
        let settings = Settings::default();
        let plan = resolve(&settings, "feature-x");

        assert_eq!(plan.pipeline, "sts4-feature-x");
        assert_eq!(plan.config, "pipeline-feature-x.yml");
        assert!(plan.derived);
    }

    #[test]
    fn derived_path_preserves_template_directory() {
        assert_eq!(
            derived_config_path("ci/pipeline.yml", "feature-x"),
            "ci/pipeline-feature-x.yml"
        );
    }

    #[test]
    fn custom_primary_branch_is_honored() {
        let mut settings = Settings::default();
        settings.primary_branch = "main".to_string();

        assert!(!resolve(&settings, "main").derived);
        assert_eq!(resolve(&settings, "master").pipeline, "sts4-master");
    }

    #[test]
    fn prepare_on_primary_branch_never_writes_a_derived_file() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("pipeline.yml");
        fs::write(&template, "branch: snapshot\n").unwrap();

        let mut settings = Settings::default();
        settings.template = template.to_string_lossy().to_string();
        let plan = resolve(&settings, "master");

        let result = prepare(&plan).unwrap();

        assert!(result.is_none());
        assert!(!dir.path().join("pipeline-master.yml").exists());
        // template itself is untouched
        assert_eq!(fs::read_to_string(&template).unwrap(), "branch: snapshot\n");
    }

    #[test]
    fn prepare_on_feature_branch_substitutes_into_derived_file() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("pipeline.yml");
        fs::write(&template, "branch: snapshot\nname: snapshot-ci\n").unwrap();

        let mut settings = Settings::default();
        settings.template = template.to_string_lossy().to_string();
        let plan = resolve(&settings, "feature-x");

        let count = prepare(&plan).unwrap();

        assert_eq!(count, Some(2));
        let derived = dir.path().join("pipeline-feature-x.yml");
        assert_eq!(plan.config, derived.to_string_lossy().to_string());
        assert_eq!(
            fs::read_to_string(derived).unwrap(),
            "branch: feature-x\nname: feature-x-ci\n"
        );
    }

    #[test]
    fn prepare_fails_when_template_is_missing() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.template = dir
            .path()
            .join("pipeline.yml")
            .to_string_lossy()
            .to_string();

        let err = prepare(&resolve(&settings, "master")).unwrap_err();
        assert_eq!(err.code.as_str(), "template.not_found");

        let err = prepare(&resolve(&settings, "feature-x")).unwrap_err();
        assert_eq!(err.code.as_str(), "template.not_found");
    }
}
