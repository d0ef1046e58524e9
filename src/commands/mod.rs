pub type CmdResult<T> = flypipe::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod config;
pub mod context;
pub mod render;
pub mod set;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (flypipe::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Set(args) => dispatch!(args, global, set),
        crate::Commands::Render(args) => dispatch!(args, global, render),
        crate::Commands::Context(args) => dispatch!(args, global, context),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
