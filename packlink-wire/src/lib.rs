// Author: Lukas Bower
// Purpose: Provide the pure frame codec for the one-wire pack link.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Pure codec for the bit-reversed one-wire charger protocol.
//!
//! Everything in this crate is I/O free: octet bit mirroring, the additive
//! trailing checksum, command frame assembly, and classification of inbound
//! reply envelopes. The link layer owns the serial port and applies these
//! helpers on both the transmit and receive paths.

mod bits;
mod frame;

pub use bits::{reverse, reverse_in_place, reversed};
pub use frame::{checksum, command, tail_len, Reply, WireError};

/// Synchronisation octet exchanged during the reset handshake.
pub const SYNC: u8 = 0xAA;

/// Memory access opcode, parameterised by the read/write subcommand.
pub const OP_MEMORY: u8 = 0x01;
/// Calibration exchange opcode.
pub const OP_CALIBRATE: u8 = 0x55;
/// Charger configuration opcode.
pub const OP_CONFIGURE: u8 = 0x60;
/// Telemetry snapshot opcode.
pub const OP_SNAPSHOT: u8 = 0x61;
/// Charger keepalive opcode.
pub const OP_KEEPALIVE: u8 = 0x62;

/// Status octet opening a data reply.
pub const ST_DATA: u8 = 0x81;
/// Status octet acknowledging a write.
pub const ST_WRITE_OK: u8 = 0x80;
/// Status octet opening a two-octet NACK reply. Receive-side only; the host
/// never transmits it.
pub const ST_NACK: u8 = 0x82;

/// Memory subcommand selecting a read.
pub const SUB_READ: u8 = 0x03;
/// Memory subcommand selecting a single-octet write.
pub const SUB_WRITE: u8 = 0x05;

/// The acknowledgement counter rotation. Only snapshot and calibration
/// exchanges advance it; memory commands pin the counter at the first entry.
pub const ACC_CYCLE: [u8; 3] = [0x04, 0x0C, 0x1C];
/// Initial acknowledgement counter value, restored at every link reset and
/// before every configure exchange.
pub const ACC_INITIAL: u8 = 0x04;

/// Charge cutoff current advertised by the emulated charger, in mA.
pub const CUTOFF_CURRENT: u16 = 300;
/// Maximum charge current advertised by the emulated charger, in mA.
pub const MAX_CURRENT: u16 = 6000;
