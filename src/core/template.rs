//! Literal token substitution for pipeline templates.
//!
//! The pipeline template carries a fixed literal token; deriving a per-branch
//! configuration is a pure textual replacement of that token. No YAML
//! awareness — bytes other than the token pass through untouched.

use std::path::Path;

use crate::error::Result;
use crate::utils::io;

/// Replace every exact occurrence of `token` with `replacement`.
///
/// Preserves all other characters and line breaks. With no occurrences the
/// output is identical to the input.
pub fn replace_token(content: &str, token: &str, replacement: &str) -> String {
    content.replace(token, replacement)
}

/// Count occurrences of `token` in `content`.
pub fn occurrences(content: &str, token: &str) -> usize {
    content.matches(token).count()
}

/// Read `input`, substitute `token` with `replacement`, write to `output`.
///
/// Creates or overwrites `output`. Returns the number of occurrences
/// replaced. Fails if `input` does not exist or `output` is not writable.
pub fn substitute_file(
    input: &Path,
    output: &Path,
    token: &str,
    replacement: &str,
) -> Result<usize> {
    let content = io::read_file(input, &format!("read template {}", input.display()))?;
    let count = occurrences(&content, token);
    let rendered = replace_token(&content, token, replacement);
    io::write_file(
        output,
        &rendered,
        &format!("write derived config {}", output.display()),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn replaces_token_within_a_line() {
        assert_eq!(
            replace_token("  branch: snapshot", "snapshot", "feature-x"),
            "  branch: feature-x"
        );
    }

    #[test]
    fn input_without_token_is_unchanged() {
        let input = "jobs:\n- name: build\n  plan: []\n";
        assert_eq!(replace_token(input, "snapshot", "feature-x"), input);
    }

    #[test]
    fn replaces_every_occurrence() {
        let input = "name: snapshot\nalias: snapshot-snapshot\n";
        assert_eq!(
            replace_token(input, "snapshot", "b"),
            "name: b\nalias: b-b\n"
        );
        assert_eq!(occurrences(input, "snapshot"), 3);
    }

    #[test]
    fn substitution_is_a_fixed_point_once_token_is_gone() {
        let once = replace_token("branch: snapshot\n", "snapshot", "feature-x");
        let twice = replace_token(&once, "snapshot", "feature-x");
        assert_eq!(once, twice);
    }

    #[test]
    fn preserves_line_breaks_and_trailing_newline() {
        let input = "a: snapshot\r\nb: snapshot\n\nc: end";
        let output = replace_token(input, "snapshot", "x");
        assert_eq!(output, "a: x\r\nb: x\n\nc: end");
    }

    #[test]
    fn substitute_file_writes_rendered_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("pipeline.yml");
        let output = dir.path().join("pipeline-feature-x.yml");
        fs::write(&input, "resources:\n- name: repo\n  branch: snapshot\n").unwrap();

        let count = substitute_file(&input, &output, "snapshot", "feature-x").unwrap();

        assert_eq!(count, 1);
        let rendered = fs::read_to_string(&output).unwrap();
        assert_eq!(rendered, "resources:\n- name: repo\n  branch: feature-x\n");
    }

    #[test]
    fn substitute_file_overwrites_existing_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("pipeline.yml");
        let output = dir.path().join("pipeline-feature-x.yml");
        fs::write(&input, "branch: snapshot\n").unwrap();
        fs::write(&output, "stale content\n").unwrap();

        substitute_file(&input, &output, "snapshot", "feature-x").unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "branch: feature-x\n"
        );
    }

    #[test]
    fn substitute_file_fails_for_missing_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("missing.yml");
        let output = dir.path().join("out.yml");

        let err = substitute_file(&input, &output, "snapshot", "x").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert!(!output.exists());
    }
}
