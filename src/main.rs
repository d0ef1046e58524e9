use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    /// fly owns the terminal; nothing is printed around it.
    Passthrough,
}

mod commands;
mod output;
mod tty;

use commands::{config, context, render, set};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "flypipe")]
#[command(version = VERSION)]
#[command(about = "CLI for per-branch Concourse pipeline automation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the Concourse pipeline for the current branch
    Set(set::SetArgs),
    /// Render a per-branch config file from a template
    Render(render::RenderArgs),
    /// Show what a set invocation would resolve to here
    Context(context::ContextArgs),
    /// Manage persisted flypipe settings
    Config(config::ConfigArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Set(args) if !args.dry_run => ResponseMode::Passthrough,
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let mode = response_mode(&cli.command);

    if let ResponseMode::Json = mode {
        tty::status("flypipe is working...");
    }

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    match mode {
        ResponseMode::Json => {
            if output::print_json_result(json_result).is_err() {
                return std::process::ExitCode::from(1);
            }
        }
        // Passthrough failures (e.g. fly missing) still surface as JSON so
        // the caller gets a structured error rather than silence.
        ResponseMode::Passthrough => {
            if let Err(err) = json_result {
                if output::print_result::<serde_json::Value>(Err(err)).is_err() {
                    return std::process::ExitCode::from(1);
                }
            }
        }
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
