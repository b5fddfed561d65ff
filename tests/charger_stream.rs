// Author: Lukas Bower
// Purpose: Drive the charger emulation end to end over the mock line.
#![forbid(unsafe_code)]

use std::time::Duration;

use packlink::charger::RunMode;
use packlink::line::mock::MockLine;
use packlink::{CancelToken, Error, Session, TraceConfig};

const CONFIGURE_REPLY: [u8; 5] = [0x81, 0x04, 0x00, 0x00, 0x85];
const SNAPSHOT_REPLY: [u8; 8] = [0x81, 0x04, 0x03, 0x00, 0x00, 0x00, 0x00, 0x88];
const KEEPALIVE_REPLY: [u8; 9] = [0x81, 0x04, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x89];

fn session_over(handle: &MockLine) -> Session<MockLine> {
    Session::with_line(handle.clone(), TraceConfig::default()).expect("mock session")
}

fn script_opening(handle: &MockLine) {
    handle.push_reply_wire(&[0x55]);
    handle.push_reply(&CONFIGURE_REPLY);
    handle.push_reply(&SNAPSHOT_REPLY);
    handle.push_reply(&KEEPALIVE_REPLY);
    handle.push_reply(&CONFIGURE_REPLY);
    handle.push_reply(&SNAPSHOT_REPLY);
}

/// Split the captured LSB-domain transmit stream into protocol frames,
/// using each frame's known length: sync is one octet, configure is 13,
/// everything else in the cadence is 5.
fn split_frames(tx: &[u8]) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    let mut rest = tx;
    while !rest.is_empty() {
        let len = match rest[0] {
            0xAA => 1,
            0x60 => 13,
            _ => 5,
        };
        frames.push(rest[..len].to_vec());
        rest = &rest[len..];
    }
    frames
}

#[test]
fn two_second_run_walks_the_cadence() {
    let handle = MockLine::new();
    script_opening(&handle);
    handle.set_fallback_reply(&KEEPALIVE_REPLY);
    let mut session = session_over(&handle);

    session
        .run_charger(RunMode::For(Duration::from_secs(2)), &CancelToken::new())
        .expect("charger run");
    assert!(handle.is_idle());

    let tx = packlink_wire::reversed(&handle.tx_bytes());
    let frames = split_frames(&tx);

    // Opening cadence: sync, configure(2), snapshot, keepalive,
    // configure(1), snapshot.
    assert_eq!(frames[0], vec![0xAA]);
    assert_eq!(frames[1][0], 0x60);
    assert_eq!(frames[1][9], 2);
    assert_eq!(frames[2][0], 0x61);
    assert_eq!(frames[3][0], 0x62);
    assert_eq!(frames[4][0], 0x60);
    assert_eq!(frames[4][9], 1);
    assert_eq!(frames[5][0], 0x61);

    // Both snapshots were emitted with the pinned ACC and the counter ends
    // one step along its rotation.
    assert_eq!(frames[2][1], 0x04);
    assert_eq!(frames[5][1], 0x04);
    assert_eq!(session.acc(), 0x0C);

    // The streaming loop got at least one keepalive out in two seconds,
    // each carrying the advanced counter.
    let streaming: Vec<_> = frames[6..].iter().collect();
    assert!(
        (1..=5).contains(&streaming.len()),
        "unexpected keepalive count {}",
        streaming.len()
    );
    for frame in streaming {
        assert_eq!(frame[0], 0x62);
        assert_eq!(frame[1], 0x0C);
    }
}

#[test]
fn cancellation_aborts_and_idles() {
    let handle = MockLine::new();
    script_opening(&handle);
    let mut session = session_over(&handle);

    let cancel = CancelToken::new();
    cancel.cancel();
    // The first cancellable sleep sits right after the opening snapshot.
    let outcome = session.run_charger(RunMode::Forever, &cancel);
    assert!(matches!(outcome, Err(Error::Cancelled)));
    assert!(handle.is_idle());
}

#[test]
fn nack_during_the_cadence_aborts_and_idles() {
    let handle = MockLine::new();
    handle.push_reply_wire(&[0x55]);
    handle.push_reply(&[0x82, 0x01]);
    let mut session = session_over(&handle);

    let outcome = session.run_charger(
        RunMode::For(Duration::from_secs(2)),
        &CancelToken::new(),
    );
    assert!(matches!(
        outcome,
        Err(Error::NotAcknowledged { status: 0x82 })
    ));
    assert!(handle.is_idle());
}
