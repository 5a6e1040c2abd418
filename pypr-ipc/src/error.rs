use std::path::PathBuf;

use thiserror::Error;

/// Process exit status shared by every client build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    /// No command, command too long, bad flags.
    UsageError = 1,
    /// The socket path could not be derived from the environment.
    EnvError = 2,
    /// The daemon is absent or the exchange broke off.
    ConnectionError = 3,
    /// The daemon answered with an `ERROR:` envelope.
    CommandError = 4,
}

impl ExitCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code())
    }
}

/// Everything that can end an invocation early.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no command provided")]
    NoCommand,

    #[error("Command too long ({len} characters, max {max}).")]
    RequestTooLong { len: usize, max: usize },

    #[error(
        "cannot locate the pyprland socket: set HYPRLAND_INSTANCE_SIGNATURE and XDG_RUNTIME_DIR, \
         NIRI_SOCKET, XDG_DATA_HOME or HOME"
    )]
    EndpointUnresolved,

    #[error("cannot determine home directory; set $HOME")]
    HomeNotFound,

    #[error("socket path too long (max {max} characters): {path}")]
    EndpointTooLong { path: PathBuf, max: usize },

    #[error("Cannot connect to pyprland daemon at {socket}.")]
    DaemonNotRunning {
        socket: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to connect to {socket}: {source}")]
    Connect {
        socket: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to send command to daemon: {0}")]
    Send(#[source] std::io::Error),

    #[error("failed to complete command transmission: {0}")]
    Shutdown(#[source] std::io::Error),

    #[error("failed to read response from daemon: {0}")]
    Receive(#[source] std::io::Error),

    #[error("failed to write daemon reply: {0}")]
    Output(#[source] std::io::Error),

    /// Message carried by an `ERROR:` reply.
    #[error("{0}")]
    Command(String),

    #[error("editor `{editor}` failed: {reason}")]
    Editor { editor: String, reason: String },
}

impl ClientError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ClientError::NoCommand
            | ClientError::RequestTooLong { .. }
            | ClientError::Editor { .. } => ExitCode::UsageError,
            ClientError::EndpointUnresolved
            | ClientError::HomeNotFound
            | ClientError::EndpointTooLong { .. } => ExitCode::EnvError,
            ClientError::DaemonNotRunning { .. }
            | ClientError::Connect { .. }
            | ClientError::Send(_)
            | ClientError::Shutdown(_)
            | ClientError::Receive(_)
            | ClientError::Output(_) => ExitCode::ConnectionError,
            ClientError::Command(_) => ExitCode::CommandError,
        }
    }

    /// Follow-up line printed under the message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ClientError::NoCommand => Some(
                "Usage: pypr-client <command> [args...]\nTry 'pypr-client help' for available commands.",
            ),
            ClientError::EndpointUnresolved => Some("Are you running under Hyprland or Niri?"),
            ClientError::DaemonNotRunning { .. } => {
                Some("Is the daemon running? Start it with: pypr (no arguments)")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_failure_class() {
        let io = || std::io::Error::from(std::io::ErrorKind::BrokenPipe);

        assert_eq!(ClientError::NoCommand.exit_code().code(), 1);
        assert_eq!(
            ClientError::RequestTooLong { len: 2000, max: 1023 }
                .exit_code()
                .code(),
            1
        );
        assert_eq!(ClientError::EndpointUnresolved.exit_code().code(), 2);
        assert_eq!(ClientError::HomeNotFound.exit_code().code(), 2);
        assert_eq!(
            ClientError::DaemonNotRunning {
                socket: PathBuf::from("/run/x.sock"),
                source: io(),
            }
            .exit_code()
            .code(),
            3
        );
        assert_eq!(ClientError::Receive(io()).exit_code().code(), 3);
        assert_eq!(ClientError::Command("nope".into()).exit_code().code(), 4);
    }

    #[test]
    fn too_long_message_reports_character_limit() {
        let err = ClientError::RequestTooLong {
            len: 1500,
            max: 1023,
        };
        assert_eq!(err.to_string(), "Command too long (1500 characters, max 1023).");
    }

    #[test]
    fn transport_messages_are_lowercase_clauses() {
        let io = || std::io::Error::from(std::io::ErrorKind::ConnectionReset);
        assert_eq!(ClientError::NoCommand.to_string(), "no command provided");
        assert!(ClientError::Receive(io())
            .to_string()
            .starts_with("failed to read response from daemon: "));
        assert!(ClientError::Send(io())
            .to_string()
            .starts_with("failed to send command to daemon: "));
    }

    #[test]
    fn command_error_displays_daemon_text_only() {
        let err = ClientError::Command("bad command".into());
        assert_eq!(err.to_string(), "bad command");
        assert!(err.hint().is_none());
    }
}
