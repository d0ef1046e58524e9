use std::process::Command;

use crate::error::{Error, Result};
use crate::utils::command;

/// Get the abbreviated name of the branch currently checked out in `dir`.
///
/// Runs `git rev-parse --abbrev-ref HEAD` and returns trimmed stdout.
/// Fails if `dir` is not inside a repository checkout or git is unavailable;
/// the command line and stderr are carried in the error details.
pub fn current_branch(dir: &str) -> Result<String> {
    const ARGS: [&str; 3] = ["rev-parse", "--abbrev-ref", "HEAD"];

    let output = Command::new("git")
        .args(ARGS)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::git_command_failed(format!("git {}", ARGS.join(" ")), e.to_string()))?;

    if !output.status.success() {
        return Err(Error::git_command_failed(
            format!("git {}", ARGS.join(" ")),
            command::error_text(&output),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Get the root directory of the repository containing `dir`.
/// Returns None if `dir` is not within a git repository.
pub fn repo_root(dir: &str) -> Option<String> {
    command::run_in_optional(dir, "git", &["rev-parse", "--show-toplevel"])
}

pub fn is_git_repo(dir: &str) -> bool {
    command::succeeded_in(dir, "git", &["rev-parse", "--git-dir"])
}
