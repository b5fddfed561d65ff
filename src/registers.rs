// Author: Lukas Bower
// Purpose: Read and write pack memory over the 0x01 opcode.

//! Register access primitives.
//!
//! These operate on an already-reset link and do not touch the line state;
//! the session orchestrator owns the reset-before and idle-after of every
//! public operation. The ACC byte of a memory command is pinned at `0x04`
//! in both directions. Only the third byte selects the direction.

use log::debug;
use packlink_wire as wire;
use packlink_wire::Reply;

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::line::SignalLine;
use crate::link::Link;

/// One hit recorded by the discovery scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHit {
    /// Address that answered.
    pub address: u16,
    /// Requested payload length.
    pub length: u8,
    /// Payload octets of the `0x81` reply.
    pub payload: Vec<u8>,
}

/// Read `length` octets starting at `address`.
pub fn read<L: SignalLine>(link: &mut Link<L>, address: u16, length: u8) -> Result<Vec<u8>> {
    let [hi, lo] = address.to_be_bytes();
    let frame = wire::command(
        wire::OP_MEMORY,
        wire::ACC_INITIAL,
        wire::SUB_READ,
        &[hi, lo, length],
    );
    let raw = link.transact(&frame, length as usize + 5)?;
    match Reply::parse(&raw)? {
        Reply::Data { payload, .. } => {
            if payload.len() != length as usize {
                return Err(Error::Malformed {
                    expected: length as usize + 5,
                    actual: raw.len(),
                });
            }
            Ok(payload)
        }
        Reply::Nack { code } => {
            debug!("read {address:#06x}/{length} refused with code {code:#04x}");
            Err(Error::NotAcknowledged {
                status: wire::ST_NACK,
            })
        }
        Reply::WriteAck { .. } => Err(Error::NotAcknowledged {
            status: wire::ST_WRITE_OK,
        }),
    }
}

/// Write a single octet at `address`. The pack acknowledges with the short
/// `0x80` reply.
pub fn write_byte<L: SignalLine>(link: &mut Link<L>, address: u16, value: u8) -> Result<()> {
    let [hi, lo] = address.to_be_bytes();
    let frame = wire::command(
        wire::OP_MEMORY,
        wire::ACC_INITIAL,
        wire::SUB_WRITE,
        &[hi, lo, value],
    );
    let raw = link.transact(&frame, 2)?;
    match Reply::parse(&raw)? {
        Reply::WriteAck { .. } => Ok(()),
        Reply::Nack { .. } => Err(Error::NotAcknowledged {
            status: wire::ST_NACK,
        }),
        Reply::Data { .. } => Err(Error::NotAcknowledged {
            status: wire::ST_DATA,
        }),
    }
}

/// Brute-force discovery sweep: try every length in `0..max_length` at
/// every address in `start..stop`, recording each address/length pair the
/// pack answers with data. Refusals and timeouts are part of the terrain
/// and are skipped; anything else aborts the scan.
pub fn scan<L: SignalLine>(
    link: &mut Link<L>,
    start: u16,
    stop: u16,
    max_length: u8,
    cancel: &CancelToken,
) -> Result<Vec<ScanHit>> {
    let mut hits = Vec::new();
    for address in start..stop {
        for length in 0..max_length {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            match read(link, address, length) {
                Ok(payload) => {
                    debug!("scan hit at {address:#06x}/{length}");
                    hits.push(ScanHit {
                        address,
                        length,
                        payload,
                    });
                }
                Err(Error::NotAcknowledged { .. })
                | Err(Error::Timeout)
                | Err(Error::Malformed { .. }) => {}
                Err(other) => return Err(other),
            }
        }
    }
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::mock::MockLine;
    use crate::link::TraceConfig;

    fn link_over(handle: &MockLine) -> Link<MockLine> {
        Link::new(handle.clone(), TraceConfig::default())
    }

    #[test]
    fn read_returns_the_payload_window() {
        let handle = MockLine::new();
        handle.push_reply(&[0x81, 0x04, 0x02, 0xAB, 0xCD, 0x01, 0xFF]);
        let mut link = link_over(&handle);
        let payload = read(&mut link, 0x0010, 2).unwrap();
        assert_eq!(payload, vec![0xAB, 0xCD]);

        let tx = packlink_wire::reversed(&handle.tx_bytes());
        assert_eq!(&tx[..6], &[0x01, 0x04, 0x03, 0x00, 0x10, 0x02]);
    }

    #[test]
    fn read_surfaces_nack() {
        let handle = MockLine::new();
        handle.push_reply(&[0x82, 0x01]);
        let mut link = link_over(&handle);
        assert!(matches!(
            read(&mut link, 0x9152, 2),
            Err(Error::NotAcknowledged { status: 0x82 })
        ));
    }

    #[test]
    fn read_rejects_short_data() {
        let handle = MockLine::new();
        // Header declares two octets but the requested window was four.
        handle.push_reply(&[0x81, 0x04, 0x02, 0xAB, 0xCD, 0x01, 0xFF, 0x00, 0x00]);
        let mut link = link_over(&handle);
        assert!(matches!(
            read(&mut link, 0x0010, 4),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn write_byte_frames_the_subcommand() {
        let handle = MockLine::new();
        handle.push_reply(&[0x80, 0x04]);
        let mut link = link_over(&handle);
        write_byte(&mut link, 0x0023, b'H').unwrap();

        let tx = packlink_wire::reversed(&handle.tx_bytes());
        assert_eq!(&tx[..6], &[0x01, 0x04, 0x05, 0x00, 0x23, 0x48]);
    }

    #[test]
    fn scan_records_only_data_replies() {
        let handle = MockLine::new();
        // Length 0 refused, length 1 answered.
        handle.push_reply(&[0x82, 0x01]);
        handle.push_reply(&[0x81, 0x04, 0x01, 0x5A, 0x00, 0xE0]);
        let mut link = link_over(&handle);
        let hits = scan(&mut link, 0x0100, 0x0101, 2, &CancelToken::new()).unwrap();
        assert_eq!(
            hits,
            vec![ScanHit {
                address: 0x0100,
                length: 1,
                payload: vec![0x5A],
            }]
        );
    }

    #[test]
    fn scan_cancellation_propagates() {
        let handle = MockLine::new();
        let mut link = link_over(&handle);
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            scan(&mut link, 0x0000, 0x0010, 4, &cancel),
            Err(Error::Cancelled)
        ));
    }
}
