//! Client side of the pyprland control socket.
//!
//! - [`endpoint`] locates the daemon socket from the environment
//! - [`request`] frames the command words
//! - [`session`] owns the connection: send, half-close, read to EOF
//! - [`reply`] classifies the reply envelope

mod error;
pub mod endpoint;
pub mod reply;
pub mod request;
pub mod session;

pub use endpoint::{resolve, Endpoint, EndpointSource, Environment};
pub use error::{ClientError, ExitCode};
pub use reply::{Passthrough, ReplyKind, Response};
pub use request::Request;
pub use session::{exchange, Overflow, RawReply, Session};
