//! End-to-end handshake tests against a scripted remote host.

use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use elevate::{ElevateError, StaticPassword, run, shell};
use test_support::ScriptedConnection;
use transport::BoxError;

/// Password source that counts how often it is asked.
fn counting_source(
    counter: &Arc<AtomicUsize>,
    password: &str,
) -> impl FnMut() -> Result<String, BoxError> + use<> {
    let counter = Arc::clone(counter);
    let password = password.to_owned();
    move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(password.clone())
    }
}

#[test]
fn passwordless_host_never_asks_the_source() {
    let connection = ScriptedConnection::passwordless();
    let calls = Arc::new(AtomicUsize::new(0));

    let elevated = run(&connection, counting_source(&calls, "unused"), &["ls"]).unwrap();
    drop(elevated);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let log = connection.log();
    assert_eq!(log.started, ["sudo -S -n /bin/sh -c 'echo READY;'ls"]);
    assert!(log.stdin.is_empty());
}

#[test]
fn password_host_asks_the_source_exactly_once() {
    let connection = ScriptedConnection::password_required();
    let calls = Arc::new(AtomicUsize::new(0));

    let elevated = run(
        &connection,
        counting_source(&calls, "hunter2"),
        &["whoami"],
    )
    .unwrap();
    drop(elevated);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let log = connection.log();
    assert!(log.started[0].starts_with("sudo -S -p "));
    assert_eq!(log.stdin, b"hunter2\n");
}

#[test]
fn nonce_tokens_differ_across_invocations() {
    let connection = ScriptedConnection::password_required();

    run(&connection, StaticPassword::new("pw"), &["true"]).unwrap();
    run(&connection, StaticPassword::new("pw"), &["true"]).unwrap();

    let log = connection.log();
    let first = prompt_token(&log.started[0]);
    let second = prompt_token(&log.started[1]);
    assert_ne!(first, second);
}

#[test]
fn missing_ready_marker_is_a_sentinel_and_closes_the_session() {
    let connection = ScriptedConnection::passwordless().without_ready_marker();

    let error = run(&connection, StaticPassword::new("pw"), &["true"]).unwrap_err();
    assert!(matches!(error, ElevateError::NoReadyMarker));

    let log = connection.log();
    assert_eq!(log.opened_sessions, log.closed_sessions);
}

#[test]
fn missing_prompt_is_a_sentinel() {
    let connection = ScriptedConnection::password_required().without_prompt();

    let error = run(&connection, StaticPassword::new("pw"), &["true"]).unwrap_err();
    assert!(matches!(error, ElevateError::NoPasswordPrompt));

    let log = connection.log();
    assert_eq!(log.opened_sessions, log.closed_sessions);
    // The password was never written anywhere.
    assert!(log.stdin.is_empty());
}

#[test]
fn password_source_failure_is_classified_and_closes_the_session() {
    let connection = ScriptedConnection::password_required();
    let source = || Err::<String, BoxError>("vault sealed".into());

    let error = run(&connection, source, &["true"]).unwrap_err();
    assert!(matches!(error, ElevateError::PasswordSource(_)));

    let log = connection.log();
    assert_eq!(log.opened_sessions, log.closed_sessions);
}

#[test]
fn broken_probe_is_a_policy_check_failure() {
    let connection = ScriptedConnection::broken_probe();

    let error = run(&connection, StaticPassword::new("pw"), &["true"]).unwrap_err();
    assert!(matches!(error, ElevateError::PolicyCheck(_)));
}

#[test]
fn hello_world_end_to_end_with_password_and_cr_noise() {
    let connection = ScriptedConnection::password_required()
        .with_cr_noise()
        .stdout_body(b"hello world\n");

    let elevated = run(
        &connection,
        StaticPassword::new("pass word"),
        &["printf", r"%s\n", "hello world"],
    )
    .unwrap();

    let (_stdin, mut stdout, mut stderr, _session) = elevated.into_parts();

    let mut out = Vec::new();
    stdout.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"hello world\n");

    let mut diag = Vec::new();
    stderr.read_to_end(&mut diag).unwrap();
    assert!(diag.is_empty());

    let log = connection.log();
    assert_eq!(log.stdin, b"pass word\n");
}

#[test]
fn wait_closes_stdin_and_reports_the_exit_status() {
    let connection = ScriptedConnection::passwordless();

    let elevated = run(&connection, StaticPassword::new("pw"), &["true"]).unwrap();
    elevated.wait().unwrap();

    let log = connection.log();
    assert!(log.stdin_closed);
}

#[test]
fn non_zero_exit_surfaces_through_wait() {
    let connection = ScriptedConnection::passwordless().exit_status(3);

    let elevated = run(&connection, StaticPassword::new("pw"), &["false"]).unwrap();
    let error = elevated.wait().unwrap_err();
    assert!(matches!(error, transport::RunError::ExitStatus(3)));
}

#[test]
fn shell_runs_the_fixed_command() {
    let connection = ScriptedConnection::passwordless();

    let elevated = shell(&connection, StaticPassword::new("pw")).unwrap();
    drop(elevated);

    let log = connection.log();
    assert_eq!(log.started, ["sudo -S -n /bin/sh -c 'echo READY;''sh -'"]);
}

/// Pulls the `-p` token back out of a started command line.
fn prompt_token(command: &str) -> String {
    let mut tokens = command.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "-p" {
            return tokens.next().expect("token follows -p").to_owned();
        }
    }
    panic!("no -p option in {command}");
}
