use clap::{Args, Subcommand};
use serde::Serialize;

use flypipe::config::{self, Settings};

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display effective settings (defaults merged with the config file)
    Show,
    /// Set a settings key (target, primary_branch, prefix, template, credentials)
    Set {
        /// Key to set
        key: String,
        /// Value to store
        value: String,
    },
    /// Reset a settings key to its default
    Unset {
        /// Key to reset
        key: String,
    },
    /// Show the path to the settings file
    Path,
}

#[derive(Serialize)]
pub struct ConfigOutput {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

pub fn run(args: ConfigArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show => show(),
        ConfigCommand::Set { key, value } => set(&key, &value),
        ConfigCommand::Unset { key } => unset(&key),
        ConfigCommand::Path => path(),
    }
}

fn show() -> CmdResult<ConfigOutput> {
    let settings = config::load()?;
    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            settings: Some(settings),
            path: None,
            exists: None,
            key: None,
        },
        0,
    ))
}

fn set(key: &str, value: &str) -> CmdResult<ConfigOutput> {
    let mut settings = config::load()?;
    settings.set_key(key, value)?;
    config::save(&settings)?;

    Ok((
        ConfigOutput {
            command: "config.set".to_string(),
            settings: Some(settings),
            path: None,
            exists: None,
            key: Some(key.to_string()),
        },
        0,
    ))
}

fn unset(key: &str) -> CmdResult<ConfigOutput> {
    let mut settings = config::load()?;
    settings.unset_key(key)?;
    config::save(&settings)?;

    Ok((
        ConfigOutput {
            command: "config.unset".to_string(),
            settings: Some(settings),
            path: None,
            exists: None,
            key: Some(key.to_string()),
        },
        0,
    ))
}

fn path() -> CmdResult<ConfigOutput> {
    let path = config::settings_path()?;
    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            settings: None,
            exists: Some(path.exists()),
            path: Some(path.to_string_lossy().to_string()),
            key: None,
        },
        0,
    ))
}
