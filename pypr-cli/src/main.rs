//! pypr-client: relay one command to the pyprland daemon.
//!
//! # Usage
//!
//! ```text
//! pypr-client <command> [args...]
//! pypr-client help
//! pypr-client edit
//! pypr-client [-v|-vv] <command> [args...]
//! ```
//!
//! Exit codes: 0 success, 1 usage error, 2 environment error,
//! 3 connection error, 4 command error reported by the daemon.

mod commands;
mod logging;

use clap::{ArgAction, Parser};

use pypr_ipc::{ClientError, Environment, ExitCode};

#[derive(Parser, Debug)]
#[command(
    name = "pypr-client",
    version,
    about = "Send a command to the running pyprland daemon",
    long_about = None,
    disable_help_flag = true,
)]
struct Cli {
    /// Log to stderr: -v for info, -vv for debug. RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Command word followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    words: Vec<String>,
}

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --version lands here too and is not an error.
            let code = if err.use_stderr() {
                ExitCode::UsageError
            } else {
                ExitCode::Success
            };
            let _ = err.print();
            return code.into();
        }
    };

    logging::init_tracing(cli.verbose);

    let env = Environment::capture();
    match commands::run(cli.words, &env) {
        Ok(code) => code.into(),
        Err(err) => {
            report(&err);
            err.exit_code().into()
        }
    }
}

fn report(err: &ClientError) {
    tracing::debug!(error = ?err, "command failed");
    eprintln!("Error: {err}");
    if let Some(hint) = err.hint() {
        eprintln!("{hint}");
    }
}
