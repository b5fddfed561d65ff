// Author: Lukas Bower
// Purpose: Root library for the Packlink pack diagnostic stack.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! One-wire diagnostic link for 18 V cordless-tool battery packs.
//!
//! The packs speak a proprietary half-duplex serial protocol to their
//! chargers: bit-reversed 8-N-2 framing at 4800 baud, a BREAK-based reset
//! handshake, and a small command set guarded by an acknowledgement counter.
//! This crate impersonates a charger well enough to keep a pack awake and
//! streaming telemetry, reads the pack's diagnostic memory map through a
//! typed register schema, and writes the one persistent user-note field.
//!
//! [`Session`] is the host-facing entry point. The layers below it stay
//! public for tooling that needs them: the [`link`] controller, the
//! [`charger`] emulator, the [`registers`] accessors and the [`schema`]
//! decoder.
//!
//! ```no_run
//! use packlink::{Session, TraceConfig};
//!
//! let mut session = Session::open("/dev/ttyUSB0", TraceConfig::default())?;
//! let clock = session.read(packlink::schema::ids::WALL_CLOCK)?;
//! println!("pack clock: {clock}");
//! session.close()?;
//! # Ok::<(), packlink::Error>(())
//! ```

pub mod cancel;
pub mod charger;
pub mod error;
pub mod line;
pub mod link;
pub mod registers;
pub mod report;
pub mod schema;
pub mod session;

pub use cancel::CancelToken;
pub use charger::{ChargerPhase, RunMode};
pub use error::{Error, Result};
pub use line::{SignalLine, UartLine};
pub use link::{Link, TraceConfig};
pub use report::HealthReport;
pub use schema::{RegisterDef, RegisterKind, Value};
pub use session::Session;
