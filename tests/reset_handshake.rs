// Author: Lukas Bower
// Purpose: Validate the reset handshake and the idle-on-exit invariant.
#![forbid(unsafe_code)]

use packlink::line::mock::MockLine;
use packlink::{Error, Session, TraceConfig};

fn session_over(handle: &MockLine) -> Session<MockLine> {
    Session::with_line(handle.clone(), TraceConfig::default()).expect("mock session")
}

#[test]
fn reset_happy_path_echoes_the_sync_octet() {
    let handle = MockLine::new();
    // 0xAA arrives bit-mirrored as 0x55 on the wire.
    handle.push_reply_wire(&[0x55]);
    let mut session = session_over(&handle);

    session.reset().expect("reset");
    assert_eq!(session.acc(), 0x04);
    // The host transmitted exactly the mirrored sync octet.
    assert_eq!(handle.tx_bytes(), vec![0x55]);
    assert!(handle.is_idle());
}

#[test]
fn reset_mismatch_surfaces_and_ends_idle() {
    let handle = MockLine::new();
    handle.push_reply_wire(&[0x00]);
    let mut session = session_over(&handle);

    match session.reset() {
        Err(Error::SyncMismatch { got }) => assert_eq!(got, 0x00),
        other => panic!("expected a sync mismatch, got {other:?}"),
    }
    assert!(handle.is_idle());
}

#[test]
fn reset_timeout_surfaces_and_ends_idle() {
    let handle = MockLine::new();
    let mut session = session_over(&handle);

    assert!(matches!(session.reset(), Err(Error::Timeout)));
    assert!(handle.is_idle());
}

#[test]
fn opening_a_session_drives_the_line_idle() {
    let handle = MockLine::new();
    let _session = session_over(&handle);
    assert!(handle.is_idle());
}

#[test]
fn closing_a_session_leaves_the_line_idle() {
    let handle = MockLine::new();
    let session = session_over(&handle);
    session.close().expect("close");
    assert!(handle.is_idle());
}
