// Author: Lukas Bower
// Purpose: Exercise register reads, decodes, and the note write end to end.
#![forbid(unsafe_code)]

use chrono::TimeZone;
use packlink::line::mock::MockLine;
use packlink::schema::ids;
use packlink::{Error, Session, TraceConfig, Value};

fn session_over(handle: &MockLine) -> Session<MockLine> {
    Session::with_line(handle.clone(), TraceConfig::default()).expect("mock session")
}

fn push_sync(handle: &MockLine) {
    handle.push_reply_wire(&[0x55]);
}

#[test]
fn wall_clock_read_emits_the_documented_wire_bytes() {
    let handle = MockLine::new();
    push_sync(&handle);
    // 0x81 data reply, ACC echo, 4 payload octets of POSIX seconds.
    handle.push_reply(&[0x81, 0x04, 0x04, 0x66, 0xD9, 0xF2, 0xA0, 0x03, 0x5A]);
    let mut session = session_over(&handle);

    let value = session.read(ids::WALL_CLOCK).expect("read");

    // Sync first, then the read command for 0x0037/4, all bit-mirrored.
    assert_eq!(
        handle.tx_bytes(),
        vec![0x55, 0x80, 0x20, 0xC0, 0x00, 0xEC, 0x20, 0x00, 0xC2]
    );
    let expected = chrono::Utc.timestamp_opt(0x66D9_F2A0, 0).single().unwrap();
    assert_eq!(value, Value::Date(expected));
    assert!(handle.is_idle());
}

#[test]
fn serial_register_decodes_type_and_number() {
    let handle = MockLine::new();
    push_sync(&handle);
    handle.push_reply(&[
        0x81, 0x04, 0x05, 0x00, 0x28, 0x0C, 0x4A, 0x3F, 0x01, 0x47,
    ]);
    let mut session = session_over(&handle);

    let value = session.read(ids::SERIAL).expect("read");
    assert_eq!(
        value,
        Value::Serial {
            battery_type: 40,
            serial: 806_207,
        }
    );
    assert!(handle.is_idle());
}

#[test]
fn write_note_pads_to_twenty_dashes() {
    let handle = MockLine::new();
    push_sync(&handle);
    for _ in 0..20 {
        handle.push_reply(&[0x80, 0x04]);
    }
    let mut session = session_over(&handle);

    session.write_note("HELLO").expect("write note");

    let tx = packlink_wire::reversed(&handle.tx_bytes());
    // One sync octet, then twenty 8-octet write frames.
    assert_eq!(tx.len(), 1 + 20 * 8);
    assert_eq!(tx[0], 0xAA);
    let expected_text = b"HELLO---------------";
    for (index, expected_octet) in expected_text.iter().enumerate() {
        let frame = &tx[1 + index * 8..1 + (index + 1) * 8];
        assert_eq!(frame[0], 0x01);
        assert_eq!(frame[1], 0x04);
        assert_eq!(frame[2], 0x05);
        let address = u16::from_be_bytes([frame[3], frame[4]]);
        assert_eq!(address, 0x0023 + index as u16);
        assert_eq!(frame[5], *expected_octet);
    }
    assert!(handle.is_idle());
}

#[test]
fn oversized_note_is_rejected_before_any_traffic() {
    let handle = MockLine::new();
    let mut session = session_over(&handle);

    assert!(matches!(
        session.write_note("THIS NOTE IS FAR TOO LONG"),
        Err(Error::NoteTooLong { length: 25 })
    ));
    assert!(handle.tx_bytes().is_empty());
    assert!(handle.is_idle());
}

#[test]
fn refused_window_decodes_to_the_sentinel_value() {
    let handle = MockLine::new();
    push_sync(&handle);
    handle.push_reply(&[0x82, 0x01]);
    let mut session = session_over(&handle);

    let value = session.read(ids::SENTINEL).expect("read");
    assert_eq!(value, Value::None);
    assert!(handle.is_idle());
}

#[test]
fn unknown_register_id_misses_without_traffic() {
    let handle = MockLine::new();
    let mut session = session_over(&handle);

    assert!(matches!(session.read(9999), Err(Error::SchemaMiss(9999))));
    assert!(handle.tx_bytes().is_empty());
}

#[test]
fn raw_window_read_returns_payload_octets() {
    let handle = MockLine::new();
    push_sync(&handle);
    handle.push_reply(&[0x81, 0x04, 0x02, 0xBE, 0xEF, 0x02, 0x34]);
    let mut session = session_over(&handle);

    let payload = session.read_window(0x0010, 2).expect("read window");
    assert_eq!(payload, vec![0xBE, 0xEF]);
    assert!(handle.is_idle());
}
