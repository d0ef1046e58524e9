//! Shell quoting for displayed command lines.

/// Quote a single argument for display in a shell command line.
///
/// Arguments made only of safe characters pass through unchanged; anything
/// else is wrapped in single quotes with embedded quotes escaped as `'\''`.
pub fn quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '=' | ':' | '~' | '@'));

    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

/// Join a program and its arguments into a display command line.
pub fn join(program: &str, args: &[String]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(quote(program));
    parts.extend(args.iter().map(|a| quote(a)));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_arguments_pass_through() {
        assert_eq!(quote("set-pipeline"), "set-pipeline");
        assert_eq!(quote("branch=feature-x"), "branch=feature-x");
        assert_eq!(quote("~/credentials.yml"), "~/credentials.yml");
    }

    #[test]
    fn arguments_with_spaces_are_quoted() {
        assert_eq!(quote("branch=my branch"), "'branch=my branch'");
    }

    #[test]
    fn embedded_single_quotes_are_escaped() {
        assert_eq!(quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn join_builds_a_full_command_line() {
        let args = vec!["-t".to_string(), "tools".to_string()];
        assert_eq!(join("fly", &args), "fly -t tools");
    }
}
