//! `pypr-client edit`: open the config in an editor, then ask for a reload.

use std::path::{Path, PathBuf};
use std::process::Command;

use pypr_ipc::endpoint::HOME;
use pypr_ipc::{ClientError, Environment, ExitCode};

use super::relay;

pub const CONFIG_FILE: &str = ".config/hypr/pyprland.toml";

const DEFAULT_EDITOR: &str = "vi";

pub fn run(env: &Environment) -> Result<ExitCode, ClientError> {
    let config = config_path(env)?;
    let editor = editor(env);
    open_in_editor(&editor, &config)?;
    relay::run(&["reload".to_string()], env)
}

pub fn config_path(env: &Environment) -> Result<PathBuf, ClientError> {
    let home = env.get(HOME).ok_or(ClientError::HomeNotFound)?;
    Ok(Path::new(home).join(CONFIG_FILE))
}

/// `$EDITOR`, else `$VISUAL`, else `vi`.
pub fn editor(env: &Environment) -> String {
    env.get("EDITOR")
        .or_else(|| env.get("VISUAL"))
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

fn open_in_editor(editor: &str, config: &Path) -> Result<(), ClientError> {
    // Editors such as `code --wait` carry their own arguments.
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(DEFAULT_EDITOR);

    tracing::info!(editor, config = %config.display(), "opening configuration");
    let status = Command::new(program)
        .args(parts)
        .arg(config)
        .status()
        .map_err(|err| ClientError::Editor {
            editor: editor.to_string(),
            reason: err.to_string(),
        })?;

    if !status.success() {
        return Err(ClientError::Editor {
            editor: editor.to_string(),
            reason: format!("exited with {status}"),
        });
    }
    Ok(())
}
