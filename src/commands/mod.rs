pub type CmdResult<T> = lazify::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod report;
pub mod rewrite;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (lazify::Result<serde_json::Value>, i32) {
    crate::tty::status("lazify is working...");

    match command {
        crate::Commands::Rewrite(args) => dispatch!(args, global, rewrite),
        crate::Commands::Report(_) => {
            let err = lazify::Error::validation_invalid_argument(
                "output_mode",
                "Command does not support JSON output",
            );
            (Err(err), 2)
        }
    }
}

pub(crate) fn run_text(
    command: crate::Commands,
    _global: &GlobalArgs,
) -> lazify::Result<(String, i32)> {
    match command {
        crate::Commands::Report(args) => report::run_text(args),
        _ => Err(lazify::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support text output",
        )),
    }
}
