//! Daemon socket discovery.
//!
//! The daemon listens on `.pyprland.sock` in a directory that depends on the
//! compositor it runs under. Resolution is a pure function of an
//! [`Environment`] snapshot so tests never touch the real process env.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ClientError;

pub const SOCKET_FILE: &str = ".pyprland.sock";

/// Longest socket path the transport accepts, in bytes.
pub const MAX_ENDPOINT_LEN: usize = 255;

pub const HYPRLAND_INSTANCE_SIGNATURE: &str = "HYPRLAND_INSTANCE_SIGNATURE";
pub const XDG_RUNTIME_DIR: &str = "XDG_RUNTIME_DIR";
pub const NIRI_SOCKET: &str = "NIRI_SOCKET";
pub const XDG_DATA_HOME: &str = "XDG_DATA_HOME";
pub const HOME: &str = "HOME";

/// Immutable copy of the variables the client cares about.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, OsString>,
}

impl Environment {
    /// Snapshot the current process environment.
    pub fn capture() -> Self {
        Self::from_pairs(std::env::vars_os().filter_map(|(key, value)| {
            key.into_string().ok().map(|key| (key, value))
        }))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<OsString>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Value of `key`; empty values count as unset.
    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars
            .get(key)
            .map(OsString::as_os_str)
            .filter(|value| !value.is_empty())
    }
}

/// Which environment rule produced an [`Endpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    Hyprland,
    Niri,
    DataHome,
    Home,
}

impl fmt::Display for EndpointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EndpointSource::Hyprland => "hyprland",
            EndpointSource::Niri => "niri",
            EndpointSource::DataHome => "xdg-data-home",
            EndpointSource::Home => "home",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: PathBuf,
    source: EndpointSource,
}

impl Endpoint {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> EndpointSource {
        self.source
    }
}

struct Rule {
    source: EndpointSource,
    build: fn(&Environment) -> Option<PathBuf>,
}

/// Evaluated top-down; the first rule yielding a path wins.
const RULES: [Rule; 4] = [
    Rule {
        source: EndpointSource::Hyprland,
        build: hyprland_socket,
    },
    Rule {
        source: EndpointSource::Niri,
        build: niri_socket,
    },
    Rule {
        source: EndpointSource::DataHome,
        build: data_home_socket,
    },
    Rule {
        source: EndpointSource::Home,
        build: home_socket,
    },
];

fn hyprland_socket(env: &Environment) -> Option<PathBuf> {
    let signature = env.get(HYPRLAND_INSTANCE_SIGNATURE)?;
    let runtime_dir = env.get(XDG_RUNTIME_DIR)?;
    Some(
        Path::new(runtime_dir)
            .join("hypr")
            .join(signature)
            .join(SOCKET_FILE),
    )
}

fn niri_socket(env: &Environment) -> Option<PathBuf> {
    let niri = Path::new(env.get(NIRI_SOCKET)?);
    let dir = match niri.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Some(dir.join(SOCKET_FILE))
}

fn data_home_socket(env: &Environment) -> Option<PathBuf> {
    env.get(XDG_DATA_HOME)
        .map(|data_home| Path::new(data_home).join(SOCKET_FILE))
}

fn home_socket(env: &Environment) -> Option<PathBuf> {
    env.get(HOME).map(|home| {
        Path::new(home)
            .join(".local")
            .join("share")
            .join(SOCKET_FILE)
    })
}

/// Locate the daemon socket for this environment.
pub fn resolve(env: &Environment) -> Result<Endpoint, ClientError> {
    let (path, source) = RULES
        .iter()
        .find_map(|rule| (rule.build)(env).map(|path| (path, rule.source)))
        .ok_or(ClientError::EndpointUnresolved)?;

    if path.as_os_str().len() > MAX_ENDPOINT_LEN {
        return Err(ClientError::EndpointTooLong {
            path,
            max: MAX_ENDPOINT_LEN,
        });
    }

    tracing::debug!(socket = %path.display(), %source, "resolved daemon socket");
    Ok(Endpoint { path, source })
}
