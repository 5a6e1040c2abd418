use std::ffi::OsString;

use pypr_ipc::endpoint::XDG_DATA_HOME;
use pypr_ipc::{
    exchange, resolve, ClientError, Endpoint, Environment, ExitCode, Passthrough, Request,
    Response, Session,
};
use pypr_test_utils::tracing_setup::init_test_tracing;
use pypr_test_utils::MockDaemon;

fn endpoint_for(daemon: &MockDaemon) -> Endpoint {
    let env = Environment::from_pairs([(XDG_DATA_HOME, OsString::from(daemon.dir()))]);
    let endpoint = resolve(&env).expect("resolve");
    assert_eq!(endpoint.path(), daemon.socket());
    endpoint
}

fn no_overflow(_: pypr_ipc::Overflow<'_>) -> std::io::Result<()> {
    panic!("reply should fit in the buffer")
}

#[test]
fn daemon_sees_newline_framed_request_then_eof() {
    init_test_tracing();
    let daemon = MockDaemon::replying("OK\n", 1);
    let endpoint = endpoint_for(&daemon);

    let request = Request::encode(["toggle", "term"]).unwrap();
    let reply = exchange(&endpoint, &request, no_overflow).expect("exchange");

    assert_eq!(Response::classify(&reply.bytes), Response::Ok(None));
    assert_eq!(daemon.requests(), vec![b"toggle term\n".to_vec()]);
}

#[test]
fn echo_round_trip_reproduces_request() {
    let daemon = MockDaemon::echo_ok(1);
    let endpoint = endpoint_for(&daemon);

    let request = Request::encode(["layout_center", "next"]).unwrap();
    let reply = exchange(&endpoint, &request, no_overflow).expect("exchange");
    let response = Response::classify(&reply.bytes);

    let mut out = Vec::new();
    response.write_to(&mut out).unwrap();
    assert_eq!(out, request.as_bytes());
    assert_eq!(response.exit_code(), ExitCode::Success);
}

#[test]
fn error_envelope_classifies_as_command_error() {
    let daemon = MockDaemon::replying("ERROR: bad command\n", 1);
    let endpoint = endpoint_for(&daemon);

    let reply = exchange(&endpoint, &Request::encode(["bogus"]).unwrap(), no_overflow)
        .expect("exchange");
    let response = Response::classify(&reply.bytes);
    assert_eq!(response, Response::Error("bad command".into()));
    assert_eq!(response.exit_code().code(), 4);
}

#[test]
fn empty_reply_is_success_without_output() {
    let daemon = MockDaemon::replying(Vec::new(), 1);
    let endpoint = endpoint_for(&daemon);

    let reply = exchange(&endpoint, &Request::encode(["exit"]).unwrap(), no_overflow)
        .expect("exchange");
    assert!(reply.bytes.is_empty());
    assert_eq!(reply.total_len, 0);
    assert_eq!(Response::classify(&reply.bytes).exit_code(), ExitCode::Success);
}

#[test]
fn same_request_twice_gives_same_classification() {
    let daemon = MockDaemon::replying("pyprland 2.3.1\n", 2);
    let endpoint = endpoint_for(&daemon);
    let request = Request::encode(["version"]).unwrap();

    let first = exchange(&endpoint, &request, no_overflow).expect("first");
    let second = exchange(&endpoint, &request, no_overflow).expect("second");

    assert_eq!(
        Response::classify(&first.bytes),
        Response::classify(&second.bytes)
    );
    assert_eq!(daemon.requests().len(), 2);
}

#[test]
fn oversized_reply_streams_through_passthrough() {
    let mut body = b"OK\n".to_vec();
    body.extend(std::iter::repeat(b'x').take(10_000));
    body.push(b'\n');
    let daemon = MockDaemon::replying(body, 1);
    let endpoint = endpoint_for(&daemon);

    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut stream = Passthrough::new(&mut out, &mut err);
    let mut session = Session::connect(&endpoint)
        .expect("connect")
        .with_reply_capacity(1024);
    session
        .send(&Request::encode(["dumpjson"]).unwrap())
        .expect("send");
    let reply = session
        .receive(|event| stream.feed(event))
        .expect("receive");
    drop(session);

    assert!(reply.overflowed);
    assert_eq!(reply.bytes.len(), 1024);
    assert_eq!(reply.total_len, 10_004);
    assert_eq!(stream.finish().unwrap(), ExitCode::Success);
    assert_eq!(out.len(), 10_001);
    assert!(out.iter().take(10_000).all(|b| *b == b'x'));
    assert!(err.is_empty());
}

#[test]
fn unbound_socket_reports_daemon_not_running() {
    let daemon = MockDaemon::idle();
    let env = Environment::from_pairs([(XDG_DATA_HOME, OsString::from(daemon.dir()))]);
    let endpoint = resolve(&env).expect("resolve");
    drop(daemon);

    let err = exchange(&endpoint, &Request::encode(["reload"]).unwrap(), no_overflow)
        .unwrap_err();
    assert!(
        matches!(err, ClientError::DaemonNotRunning { .. }),
        "unexpected error: {err}"
    );
    assert_eq!(err.exit_code(), ExitCode::ConnectionError);
    assert!(err.hint().unwrap().contains("Is the daemon running?"));
}

#[test]
fn reset_mid_reply_discards_partial_bytes() {
    init_test_tracing();
    let daemon = MockDaemon::resetting("OK partial");
    let endpoint = endpoint_for(&daemon);

    let err = exchange(
        &endpoint,
        &Request::encode(["toggle", "term"]).unwrap(),
        no_overflow,
    )
    .unwrap_err();
    assert!(
        matches!(err, ClientError::Receive(_)),
        "unexpected error: {err}"
    );
    assert_eq!(err.exit_code(), ExitCode::ConnectionError);
    assert!(err
        .to_string()
        .starts_with("failed to read response from daemon: "));
}
