use clap::Args;
use serde::Serialize;

use flypipe::log_status;
use flypipe::{pipeline, template};

use super::CmdResult;

#[derive(Args)]
pub struct RenderArgs {
    /// Template file to read
    pub input: String,

    /// Replacement value (typically a branch name)
    pub value: String,

    /// Output file; defaults to the derived per-branch name
    #[arg(long)]
    pub output: Option<String>,

    /// Placeholder token to replace
    #[arg(long, default_value = pipeline::PLACEHOLDER_TOKEN)]
    pub token: String,
}

#[derive(Serialize)]
pub struct RenderOutput {
    pub command: String,
    pub input: String,
    pub output: String,
    pub token: String,
    pub value: String,
    pub replacements: usize,
}

pub fn run(args: RenderArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RenderOutput> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| pipeline::derived_config_path(&args.input, &args.value));

    let replacements = template::substitute_file(
        std::path::Path::new(&args.input),
        std::path::Path::new(&output),
        &args.token,
        &args.value,
    )?;

    log_status!(
        "render",
        "Replaced {} occurrences of '{}' into {}",
        replacements,
        args.token,
        output
    );

    Ok((
        RenderOutput {
            command: "render.run".to_string(),
            input: args.input,
            output,
            token: args.token,
            value: args.value,
            replacements,
        },
        0,
    ))
}
