use std::io::{self, Write};

use pypr_ipc::{ClientError, ExitCode};

pub const HELP_TEXT: &str = "\
Syntax: pypr-client <command> [args...]

Local commands:
edit                 Edit the configuration file, then reload it.
help                 Show this help.

Daemon commands:
dumpjson             Dump the configuration in JSON format.
exit                 Exit the daemon.
version              Show the version.
reload               Load the configuration (new plugins will be added & config updated). [pyprland]
toggle_special       [name] Toggles switching the focused window to the special workspace \"name\" (default: minimized). [toggle_special]
attract_lost         Brings lost floating windows to the current workspace. [lost_windows]
shift_monitors       <+1/-1> Swaps monitors' workspaces in the given direction. [shift_monitors]
toggle_dpms          Toggle dpms on/off for every monitor. [toggle_dpms]
zoom                 [factor] zooms to \"factor\" or toggles zoom level if factor is omitted. [magnify]
expose               Expose every client on the active workspace. [expose]
bar                  Start gBar on the first available monitor. [menubar]
change_workspace     <+1/-1> Switch workspaces of current monitor, avoiding displayed workspaces. [workspaces_follow_focus]
fetch_client_menu    Select a client window and move it to the active workspace. [fetch_client_menu]
unfetch_client       Return a window back to its origin. [fetch_client_menu]
layout_center        <toggle|next|prev> turn on/off or change the active window. [layout_center]
relayout             Recompute & apply every monitors's layout. [monitors]
attach               Attach the focused window to the last focused scratchpad. [scratchpads]
hide                 <name> hides scratchpad \"name\". [scratchpads]
show                 <name> shows scratchpad \"name\". [scratchpads]
toggle               <name> toggles visibility of scratchpad \"name\". [scratchpads]
menu                 [name] Shows the menu, if \"name\" is provided, will only show this sub-menu. [shortcuts_menu]
wall                 <next|clear> skip the current background image or stop displaying it. [wallpapers]

Dashes in the command name are accepted: toggle-special == toggle_special.
";

/// Print the static command list without contacting the daemon.
pub fn run() -> Result<ExitCode, ClientError> {
    let mut out = io::stdout().lock();
    out.write_all(HELP_TEXT.as_bytes())
        .and_then(|()| out.flush())
        .map_err(ClientError::Output)?;
    Ok(ExitCode::Success)
}
