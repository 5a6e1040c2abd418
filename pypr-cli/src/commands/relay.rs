//! Send the command words to the daemon and render its reply.

use std::io;

use pypr_ipc::{exchange, resolve, ClientError, Environment, ExitCode, Passthrough, Request, Response};

pub fn run(words: &[String], env: &Environment) -> Result<ExitCode, ClientError> {
    let request = Request::encode(words)?;
    let endpoint = resolve(env)?;

    let mut stream = Passthrough::new(io::stdout(), io::stderr());
    let reply = exchange(&endpoint, &request, |event| stream.feed(event))?;
    if reply.overflowed {
        return stream.finish().map_err(ClientError::Output);
    }

    match Response::classify(&reply.bytes) {
        Response::Error(message) => Err(ClientError::Command(message)),
        response => {
            response
                .write_to(&mut io::stdout().lock())
                .map_err(ClientError::Output)?;
            Ok(response.exit_code())
        }
    }
}
