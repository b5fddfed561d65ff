// Author: Lukas Bower
// Purpose: Mimic a charger closely enough that the pack streams telemetry.

//! Charger emulator.
//!
//! A real charger walks the pack through a fixed cadence before it will
//! stream: configure for bulk charge, snapshot, keepalive, reconfigure for
//! maintenance, snapshot again, then a keepalive roughly every 500 ms.
//! Breaking the cadence drops the pack back to sleep, so the phases below
//! are driven in order and in real time.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use packlink_wire as wire;

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::line::SignalLine;
use crate::link::Link;

/// Settle delay after the first snapshot.
const SNAPSHOT_SETTLE: Duration = Duration::from_millis(600);
/// Keepalive cadence while streaming.
const KEEPALIVE_PERIOD: Duration = Duration::from_millis(500);
/// Cancellation poll granularity inside the cadence sleeps.
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Reply lengths, in octets, for each charger exchange.
const CONFIGURE_REPLY: usize = 5;
const SNAPSHOT_REPLY: usize = 8;
const KEEPALIVE_REPLY: usize = 9;
const CALIBRATE_REPLY: usize = 8;

/// Charge state argument of the configure exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChargeState {
    /// Maintenance charge, the steady state.
    Maintenance = 1,
    /// Bulk charge, the opening state.
    Bulk = 2,
}

/// Phases of the emulation, in transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargerPhase {
    /// No link activity; the line sits idle.
    Disconnected,
    /// Reset handshake completed.
    Reset,
    /// Configured for bulk charge.
    Configured2,
    /// First snapshot committed.
    SnapshottedA,
    /// First keepalive answered.
    Keepalive,
    /// Reconfigured for maintenance charge.
    Configured1,
    /// Second snapshot committed.
    SnapshottedB,
    /// Keepalive loop running.
    Streaming,
    /// Emulation stopped; the line is idled before this phase surfaces.
    Aborted,
}

/// How long to keep the streaming loop alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Stream until cancelled.
    Forever,
    /// Stream until the given time has elapsed since the run started.
    For(Duration),
}

/// The emulator. Borrows the link for the duration of a run.
pub struct Charger<'a, L: SignalLine> {
    link: &'a mut Link<L>,
    phase: ChargerPhase,
}

impl<'a, L: SignalLine> Charger<'a, L> {
    /// Wrap a link. The emulation starts disconnected.
    pub fn new(link: &'a mut Link<L>) -> Self {
        Self {
            link,
            phase: ChargerPhase::Disconnected,
        }
    }

    /// Current phase of the emulation.
    #[must_use]
    pub fn phase(&self) -> ChargerPhase {
        self.phase
    }

    /// Send a configure exchange. The ACC is pinned back to its initial
    /// value first, as a real charger does on every reconfiguration.
    pub fn configure(&mut self, state: ChargeState) -> Result<Vec<u8>> {
        self.link.reset_acc();
        let mut args = Vec::with_capacity(8);
        args.extend_from_slice(&wire::CUTOFF_CURRENT.to_be_bytes());
        args.extend_from_slice(&wire::MAX_CURRENT.to_be_bytes());
        args.extend_from_slice(&wire::MAX_CURRENT.to_be_bytes());
        args.push(state as u8);
        args.push(13);
        let frame = wire::command(wire::OP_CONFIGURE, self.link.acc(), 0x08, &args);
        let reply = self.link.transact(&frame, CONFIGURE_REPLY)?;
        self.accept(&reply)
    }

    /// Snapshot exchange: the pack commits a fresh telemetry frame into its
    /// accessible RAM. Advances the ACC.
    pub fn snapshot(&mut self) -> Result<Vec<u8>> {
        self.rotating_exchange(wire::OP_SNAPSHOT, SNAPSHOT_REPLY)
    }

    /// Keepalive exchange. Leaves the ACC untouched.
    pub fn keepalive(&mut self) -> Result<Vec<u8>> {
        let frame = wire::command(wire::OP_KEEPALIVE, self.link.acc(), 0x00, &[]);
        let reply = self.link.transact(&frame, KEEPALIVE_REPLY)?;
        self.accept(&reply)
    }

    /// Calibration exchange. Advances the ACC like a snapshot.
    pub fn calibrate(&mut self) -> Result<Vec<u8>> {
        self.rotating_exchange(wire::OP_CALIBRATE, CALIBRATE_REPLY)
    }

    fn rotating_exchange(&mut self, opcode: u8, expected: usize) -> Result<Vec<u8>> {
        let acc = self.link.acc();
        let frame = wire::command(opcode, acc, 0x00, &[]);
        self.link.send(&frame)?;
        // The counter rotates as soon as the command is out, before the
        // reply lands.
        self.link.advance_acc();
        let reply = self.link.read_reply(expected)?;
        self.accept_with_acc(&reply, acc)
    }

    fn accept(&mut self, reply: &[u8]) -> Result<Vec<u8>> {
        let expected_acc = self.link.acc();
        self.accept_with_acc(reply, expected_acc)
    }

    fn accept_with_acc(&mut self, reply: &[u8], sent_acc: u8) -> Result<Vec<u8>> {
        match reply.first() {
            Some(&wire::ST_NACK) => Err(Error::NotAcknowledged {
                status: wire::ST_NACK,
            }),
            Some(&wire::ST_DATA) if reply.len() > 1 && reply[1] != sent_acc => {
                log::warn!(
                    "acc echo {:#04x} does not match the request acc {:#04x}",
                    reply[1],
                    sent_acc
                );
                Ok(reply.to_vec())
            }
            Some(_) => Ok(reply.to_vec()),
            None => Err(Error::Malformed {
                expected: 2,
                actual: 0,
            }),
        }
    }

    /// Run the full emulation: reset, the opening cadence, then the
    /// streaming loop until `mode` expires or `cancel` fires. The line is
    /// idled on every way out.
    pub fn run(&mut self, mode: RunMode, cancel: &CancelToken) -> Result<()> {
        let started = Instant::now();
        let outcome = self.drive(mode, cancel, started);
        self.phase = ChargerPhase::Aborted;
        let idled = self.link.idle();
        self.phase = ChargerPhase::Disconnected;
        debug!("charger emulation ended after {:?}", started.elapsed());
        outcome.and(idled)
    }

    fn drive(&mut self, mode: RunMode, cancel: &CancelToken, started: Instant) -> Result<()> {
        info!("impersonating a charger ({mode:?})");
        self.link.reset()?;
        self.phase = ChargerPhase::Reset;

        self.configure(ChargeState::Bulk)?;
        self.phase = ChargerPhase::Configured2;
        self.snapshot()?;
        self.phase = ChargerPhase::SnapshottedA;

        sleep_cancellable(SNAPSHOT_SETTLE, cancel)?;
        self.keepalive()?;
        self.phase = ChargerPhase::Keepalive;

        self.configure(ChargeState::Maintenance)?;
        self.phase = ChargerPhase::Configured1;
        self.snapshot()?;
        self.phase = ChargerPhase::SnapshottedB;

        self.phase = ChargerPhase::Streaming;
        loop {
            if let RunMode::For(limit) = mode {
                if started.elapsed() >= limit {
                    return Ok(());
                }
            }
            sleep_cancellable(KEEPALIVE_PERIOD, cancel)?;
            self.keepalive()?;
        }
    }
}

/// Sleep in short slices so a cancellation lands promptly.
fn sleep_cancellable(total: Duration, cancel: &CancelToken) -> Result<()> {
    let deadline = Instant::now() + total;
    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        thread::sleep(CANCEL_POLL.min(deadline - now));
    }
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
    fn snapshot_rotates_the_acc() {
        let handle = MockLine::new();
        handle.push_reply(&[0x81, 0x04, 0x03, 0x00, 0x00, 0x00, 0x00, 0x88]);
        let mut link = link_over(&handle);
        let mut charger = Charger::new(&mut link);
        charger.snapshot().unwrap();
        assert_eq!(link.acc(), 0x0C);
    }

    #[test]
    fn calibrate_rotates_the_acc() {
        let handle = MockLine::new();
        handle.push_reply(&[0x81, 0x04, 0x03, 0x00, 0x00, 0x00, 0x00, 0x88]);
        let mut link = link_over(&handle);
        let mut charger = Charger::new(&mut link);
        charger.calibrate().unwrap();
        assert_eq!(link.acc(), 0x0C);
    }

    #[test]
    fn keepalive_keeps_the_acc() {
        let handle = MockLine::new();
        handle.push_reply(&[0x81, 0x04, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x89]);
        let mut link = link_over(&handle);
        let mut charger = Charger::new(&mut link);
        charger.keepalive().unwrap();
        assert_eq!(link.acc(), 0x04);
    }

    #[test]
    fn nack_reply_is_not_acknowledged() {
        let handle = MockLine::new();
        handle.push_reply(&[0x82, 0x01]);
        let mut link = link_over(&handle);
        let mut charger = Charger::new(&mut link);
        assert!(matches!(
            charger.keepalive(),
            Err(Error::NotAcknowledged { status: 0x82 })
        ));
    }

    #[test]
    fn configure_pins_the_acc_and_frames_the_currents() {
        let handle = MockLine::new();
        handle.push_reply(&[0x81, 0x04, 0x00, 0x00, 0x85]);
        let mut link = link_over(&handle);
        link.advance_acc();
        let mut charger = Charger::new(&mut link);
        charger.configure(ChargeState::Bulk).unwrap();

        let tx = packlink_wire::reversed(&handle.tx_bytes());
        assert_eq!(tx[0], 0x60);
        assert_eq!(tx[1], 0x04);
        assert_eq!(tx[2], 0x08);
        // 300 mA cutoff, 6000 mA twice, bulk state, trailing 13.
        assert_eq!(&tx[3..11], &[0x01, 0x2C, 0x17, 0x70, 0x17, 0x70, 0x02, 0x0D]);
        assert_eq!(link.acc(), 0x04);
    }

    #[test]
    fn cancellation_interrupts_the_settle_sleep() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            sleep_cancellable(Duration::from_secs(5), &cancel),
            Err(Error::Cancelled)
        ));
    }
}
