// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Assemble command frames and classify inbound reply envelopes.
// Author: Lukas Bower

//! Command assembly and reply classification.
//!
//! A command frame is `opcode | acc | subcmd-or-length | args… | checksum`,
//! where the checksum is the unsigned 16-bit sum of every preceding octet,
//! appended big-endian. Replies open with a status discriminator: `0x81`
//! carries a length-prefixed payload, `0x80` acknowledges a write, and
//! `0x82` collapses the reply to two octets with no checksum.

use crate::{ST_DATA, ST_NACK, ST_WRITE_OK};

/// Errors produced while classifying a reply envelope.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    /// Reply buffer shorter than its envelope requires.
    #[error("truncated reply: expected {expected} octets, got {actual}")]
    Truncated {
        /// Octet count the envelope calls for.
        expected: usize,
        /// Octet count actually available.
        actual: usize,
    },
    /// First octet is not a recognised status discriminator.
    #[error("unexpected status octet {0:#04x}")]
    UnexpectedStatus(u8),
}

/// Unsigned 16-bit additive checksum, truncated to 16 bits.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, &octet| sum.wrapping_add(octet as u16))
}

/// Assemble a command frame: three-octet header, arguments, trailing
/// big-endian checksum.
#[must_use]
pub fn command(opcode: u8, acc: u8, third: u8, args: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(args.len() + 5);
    frame.push(opcode);
    frame.push(acc);
    frame.push(third);
    frame.extend_from_slice(args);
    let sum = checksum(&frame);
    frame.extend_from_slice(&sum.to_be_bytes());
    frame
}

/// Octets still to read after the first, per the two-stage read rule.
///
/// A `0x82` opener collapses the reply to two octets regardless of the
/// caller's expectation; anything else is read out to `expected` octets.
/// The first octet must already be in the LSB domain.
#[must_use]
pub fn tail_len(first: u8, expected: usize) -> usize {
    if first == ST_NACK {
        1
    } else {
        expected.saturating_sub(1)
    }
}

/// A classified inbound reply, in the LSB domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `0x81` data reply carrying the echoed ACC and payload window.
    Data {
        /// ACC echoed from the request that elicited this reply.
        acc_echo: u8,
        /// Payload octets between the header and the checksum.
        payload: Vec<u8>,
    },
    /// `0x80` two-octet write acknowledgement.
    WriteAck {
        /// Trailing octet of the acknowledgement.
        code: u8,
    },
    /// `0x82` two-octet NACK. Carries no checksum.
    Nack {
        /// Refusal code following the status octet.
        code: u8,
    },
}

impl Reply {
    /// Classify a complete reply buffer.
    pub fn parse(raw: &[u8]) -> Result<Reply, WireError> {
        let first = *raw.first().ok_or(WireError::Truncated {
            expected: 2,
            actual: 0,
        })?;
        match first {
            ST_NACK | ST_WRITE_OK => {
                if raw.len() < 2 {
                    return Err(WireError::Truncated {
                        expected: 2,
                        actual: raw.len(),
                    });
                }
                if first == ST_NACK {
                    Ok(Reply::Nack { code: raw[1] })
                } else {
                    Ok(Reply::WriteAck { code: raw[1] })
                }
            }
            ST_DATA => {
                if raw.len() < 5 {
                    return Err(WireError::Truncated {
                        expected: 5,
                        actual: raw.len(),
                    });
                }
                let declared = raw[2] as usize;
                if declared + 5 > raw.len() {
                    return Err(WireError::Truncated {
                        expected: declared + 5,
                        actual: raw.len(),
                    });
                }
                Ok(Reply::Data {
                    acc_echo: raw[1],
                    payload: raw[3..3 + declared].to_vec(),
                })
            }
            other => Err(WireError::UnexpectedStatus(other)),
        }
    }

    /// Verify the trailing checksum of a framed reply. Diagnostic only;
    /// receive-path correctness never depends on it.
    #[must_use]
    pub fn verify_checksum(raw: &[u8]) -> bool {
        if raw.len() < 2 {
            return false;
        }
        let (body, tail) = raw.split_at(raw.len() - 2);
        checksum(body).to_be_bytes() == [tail[0], tail[1]]
    }
}
