// Author: Lukas Bower
// Purpose: Define the error surface of the pack link core.

//! Error kinds surfaced by the link, register, and session layers.
//!
//! There is no local recovery anywhere in the core: the protocol tolerates
//! repeated resets, so callers retry whole sessions instead. Every error
//! path returns the line to idle before the error surfaces.

use std::io;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The UART could not be opened or configured.
    #[error("serial port unavailable: {0}")]
    PortUnavailable(#[from] serialport::Error),
    /// A read did not complete within the port timeout. Never retried here.
    #[error("timed out waiting for the pack")]
    Timeout,
    /// The reset handshake returned something other than the sync octet.
    #[error("sync mismatch: pack answered {got:#04x}")]
    SyncMismatch {
        /// Octet received in place of the sync echo, already bit-mirrored.
        got: u8,
    },
    /// Reply status was neither data-OK nor write-OK.
    #[error("not acknowledged: status {status:#04x}")]
    NotAcknowledged {
        /// Status discriminator that opened the reply.
        status: u8,
    },
    /// Reply was shorter than its envelope requires.
    #[error("malformed reply: expected {expected} octets, got {actual}")]
    Malformed {
        /// Octet count the envelope calls for.
        expected: usize,
        /// Octet count actually received.
        actual: usize,
    },
    /// Register ID outside the schema table. A programmer error.
    #[error("register id {0} is not in the schema")]
    SchemaMiss(u16),
    /// The user note exceeds the 20-octet persistent field.
    #[error("note is {length} bytes; the pack stores at most 20")]
    NoteTooLong {
        /// Byte length of the rejected note.
        length: usize,
    },
    /// The operation was cancelled. The line was idled before this surfaced.
    #[error("cancelled")]
    Cancelled,
    /// Any other I/O failure on the port.
    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::TimedOut {
            Error::Timeout
        } else {
            Error::Io(err)
        }
    }
}

impl From<packlink_wire::WireError> for Error {
    fn from(err: packlink_wire::WireError) -> Self {
        match err {
            packlink_wire::WireError::Truncated { expected, actual } => {
                Error::Malformed { expected, actual }
            }
            packlink_wire::WireError::UnexpectedStatus(status) => {
                Error::NotAcknowledged { status }
            }
        }
    }
}
