// Author: Lukas Bower
// Purpose: Drive the reset handshake, ACC rotation, and framed exchanges.

//! Link controller.
//!
//! Owns the signal line, the session-scoped acknowledgement counter, and the
//! trace configuration. All framed traffic funnels through [`Link::transact`]:
//! flush, mirror, write, then the two-stage read keyed on the first status
//! octet. The controller is the only mutator of the ACC.

use std::thread;
use std::time::Duration;

use log::debug;
use packlink_wire as wire;

use crate::error::{Error, Result};
use crate::line::SignalLine;

/// BREAK/DTR hold on each half of the reset choreography.
const RESET_HOLD: Duration = Duration::from_millis(300);
/// Settle delay between the sync echo and the first frame.
const POST_SYNC_DELAY: Duration = Duration::from_millis(10);

/// Wire trace gating, passed in at construction.
///
/// The lexically scoped replacement for a global verbosity flag: callers
/// that want TX/RX hex on the log build their link (or session) with the
/// flags set, and nothing else in the process is affected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceConfig {
    /// Log transmitted frames, LSB domain, at debug level.
    pub tx: bool,
    /// Log received frames, LSB domain, at debug level.
    pub rx: bool,
}

impl TraceConfig {
    /// Trace both directions.
    #[must_use]
    pub fn verbose() -> Self {
        Self { tx: true, rx: true }
    }
}

/// The link controller.
pub struct Link<L: SignalLine> {
    line: L,
    acc: u8,
    trace: TraceConfig,
}

impl<L: SignalLine> Link<L> {
    /// Wrap a signal line. The ACC starts at its initial value; the caller
    /// decides when to drive the line to idle.
    pub fn new(line: L, trace: TraceConfig) -> Self {
        Self {
            line,
            acc: wire::ACC_INITIAL,
            trace,
        }
    }

    /// Current acknowledgement counter.
    #[must_use]
    pub fn acc(&self) -> u8 {
        self.acc
    }

    /// Rotate the ACC one step through its cycle. Called immediately after
    /// a snapshot or calibration command is sent, never for memory access.
    pub fn advance_acc(&mut self) {
        let index = wire::ACC_CYCLE
            .iter()
            .position(|&value| value == self.acc)
            .unwrap_or(0);
        self.acc = wire::ACC_CYCLE[(index + 1) % wire::ACC_CYCLE.len()];
    }

    /// Pin the ACC back to its initial value.
    pub fn reset_acc(&mut self) {
        self.acc = wire::ACC_INITIAL;
    }

    /// Drive the line to idle: BREAK and DTR both asserted. The pack stops
    /// seeing a charger on its signal pin.
    pub fn idle(&mut self) -> Result<()> {
        self.line.set_break(true)?;
        self.line.set_dtr(true)?;
        Ok(())
    }

    /// Drive the line high: BREAK and DTR both released.
    pub fn high(&mut self) -> Result<()> {
        self.line.set_break(false)?;
        self.line.set_dtr(false)?;
        Ok(())
    }

    /// Pulse the signal pin high for `duration`, then return to idle.
    pub fn high_for(&mut self, duration: Duration) -> Result<()> {
        self.high()?;
        thread::sleep(duration);
        self.idle()
    }

    /// Run the reset handshake.
    ///
    /// Holds the line idle then high for 300 ms each, transmits the sync
    /// octet and expects it echoed within the port timeout. On any failure
    /// the line is idled before the error surfaces.
    pub fn reset(&mut self) -> Result<()> {
        self.reset_acc();
        self.idle()?;
        thread::sleep(RESET_HOLD);
        self.high()?;
        thread::sleep(RESET_HOLD);
        self.send(&[wire::SYNC])?;

        let mut first = [0u8; 1];
        if let Err(err) = self.line.read_wire(&mut first) {
            let _ = self.idle();
            return Err(err);
        }
        let echoed = wire::reverse(first[0]);
        if self.trace.rx {
            debug!("rx {:02X}", echoed);
        }
        if echoed != wire::SYNC {
            let _ = self.idle();
            return Err(Error::SyncMismatch { got: echoed });
        }
        debug!("pack synchronised");
        thread::sleep(POST_SYNC_DELAY);
        Ok(())
    }

    /// Transmit LSB-domain octets: flush stale input, mirror, write.
    pub fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.line.flush_input()?;
        if self.trace.tx {
            debug!("tx {}", hex::encode_upper(frame));
        }
        self.line.write_wire(&wire::reversed(frame))?;
        Ok(())
    }

    /// Read one reply with the two-stage rule: one octet first, then either
    /// the single NACK octet or the rest of the expected envelope. Returns
    /// the LSB-domain reply.
    pub fn read_reply(&mut self, expected: usize) -> Result<Vec<u8>> {
        let mut first = [0u8; 1];
        self.line.read_wire(&mut first)?;
        let opener = wire::reverse(first[0]);

        let tail_len = wire::tail_len(opener, expected);
        let mut tail = vec![0u8; tail_len];
        self.line.read_wire(&mut tail)?;
        wire::reverse_in_place(&mut tail);

        let mut reply = Vec::with_capacity(tail_len + 1);
        reply.push(opener);
        reply.extend_from_slice(&tail);
        if self.trace.rx {
            debug!("rx {}", hex::encode_upper(&reply));
        }
        Ok(reply)
    }

    /// One lockstep exchange: send `frame`, wait for its reply.
    pub fn transact(&mut self, frame: &[u8], expected: usize) -> Result<Vec<u8>> {
        self.send(frame)?;
        self.read_reply(expected)
    }

    /// Scope the line to idle: the returned guard derefs to the link and
    /// drives [`Link::idle`] when dropped, on every exit path.
    pub fn idle_guard(&mut self) -> IdleGuard<'_, L> {
        IdleGuard { link: self }
    }
}

/// Guaranteed-release guard over the link; see [`Link::idle_guard`].
pub struct IdleGuard<'a, L: SignalLine> {
    link: &'a mut Link<L>,
}

impl<L: SignalLine> std::ops::Deref for IdleGuard<'_, L> {
    type Target = Link<L>;

    fn deref(&self) -> &Link<L> {
        self.link
    }
}

impl<L: SignalLine> std::ops::DerefMut for IdleGuard<'_, L> {
    fn deref_mut(&mut self) -> &mut Link<L> {
        self.link
    }
}

impl<L: SignalLine> Drop for IdleGuard<'_, L> {
    fn drop(&mut self) {
        if let Err(err) = self.link.idle() {
            log::warn!("failed to idle the line: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::mock::MockLine;

    #[test]
    fn acc_cycle_returns_after_three_steps() {
        let mut link = Link::new(MockLine::new(), TraceConfig::default());
        assert_eq!(link.acc(), 0x04);
        link.advance_acc();
        assert_eq!(link.acc(), 0x0C);
        link.advance_acc();
        assert_eq!(link.acc(), 0x1C);
        link.advance_acc();
        assert_eq!(link.acc(), 0x04);
    }

    #[test]
    fn send_mirrors_octets_onto_the_wire() {
        let handle = MockLine::new();
        let mut link = Link::new(handle.clone(), TraceConfig::default());
        link.send(&[0x01, 0x04, 0x03, 0x00, 0x37, 0x04, 0x00, 0x43])
            .unwrap();
        assert_eq!(
            handle.tx_bytes(),
            vec![0x80, 0x20, 0xC0, 0x00, 0xEC, 0x20, 0x00, 0xC2]
        );
        assert_eq!(handle.flushes(), 1);
    }

    #[test]
    fn nack_opener_consumes_exactly_two_octets() {
        let handle = MockLine::new();
        // A NACK followed by unrelated noise the reader must not touch.
        handle.push_reply(&[0x82, 0x07, 0xDE, 0xAD]);
        let mut link = Link::new(handle.clone(), TraceConfig::default());
        let reply = link.read_reply(64).unwrap();
        assert_eq!(reply, vec![0x82, 0x07]);
        // The noise is still queued.
        let mut rest = [0u8; 2];
        let mut line = handle.clone();
        crate::line::SignalLine::read_wire(&mut line, &mut rest).unwrap();
        assert_eq!(packlink_wire::reversed(&rest), vec![0xDE, 0xAD]);
    }

    #[test]
    fn idle_guard_idles_on_drop() {
        let handle = MockLine::new();
        let mut link = Link::new(handle.clone(), TraceConfig::default());
        link.high().unwrap();
        assert!(!handle.is_idle());
        {
            let _guard = link.idle_guard();
        }
        assert!(handle.is_idle());
    }
}
