// Author: Lukas Bower
// Purpose: Own the UART and its control lines behind the SignalLine seam.

//! Serial line driver.
//!
//! The pack's signal pin is driven through two UART control lines: the idle
//! state asserts both BREAK and DTR, the active state releases both. Control
//! line changes are unbuffered and take effect within 10 ms of the call.
//! Data octets cross this layer raw; bit mirroring happens in the link
//! controller above.

use std::io::{Read, Write};
use std::time::Duration;

use crate::error::Result;

/// Line rate of the pack link.
pub const BAUD_RATE: u32 = 4800;
/// Read timeout, authoritative for every single-frame wait.
pub const READ_TIMEOUT: Duration = Duration::from_millis(800);

/// Raw octet transport plus the two control lines the pack watches.
pub trait SignalLine {
    /// Write raw wire octets.
    fn write_wire(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read exactly `buf.len()` wire octets within the port timeout.
    fn read_wire(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Discard any pending input octets.
    fn flush_input(&mut self) -> Result<()>;

    /// Assert or release the BREAK condition.
    fn set_break(&mut self, asserted: bool) -> Result<()>;

    /// Assert or release DTR.
    fn set_dtr(&mut self, asserted: bool) -> Result<()>;
}

/// Production driver over a [`serialport`] handle: 4800 baud, 8 data bits,
/// no parity, 2 stop bits, no flow control.
pub struct UartLine {
    port: Box<dyn serialport::SerialPort>,
}

impl UartLine {
    /// Open `port_name` with the pack's wire parameters.
    pub fn open(port_name: &str) -> Result<Self> {
        let port = serialport::new(port_name, BAUD_RATE)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::Two)
            .flow_control(serialport::FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()?;
        Ok(Self { port })
    }

    /// Enumerate serial ports visible on this host.
    pub fn available() -> Result<Vec<serialport::SerialPortInfo>> {
        Ok(serialport::available_ports()?)
    }
}

impl SignalLine for UartLine {
    fn write_wire(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        Ok(())
    }

    fn read_wire(&mut self, buf: &mut [u8]) -> Result<()> {
        self.port.read_exact(buf)?;
        Ok(())
    }

    fn flush_input(&mut self) -> Result<()> {
        self.port.clear(serialport::ClearBuffer::Input)?;
        Ok(())
    }

    fn set_break(&mut self, asserted: bool) -> Result<()> {
        if asserted {
            self.port.set_break()?;
        } else {
            self.port.clear_break()?;
        }
        Ok(())
    }

    fn set_dtr(&mut self, asserted: bool) -> Result<()> {
        self.port.write_data_terminal_ready(asserted)?;
        Ok(())
    }
}

pub mod mock {
    //! In-process test double for the pack line.
    //!
    //! Clones share one scripted state, so a test keeps a handle while the
    //! session owns another. Replies are queued as a flat octet stream in
    //! wire (MSB) order; an exhausted script surfaces as a read timeout
    //! without sleeping. An optional fallback pattern serves loops whose
    //! exchange count depends on wall-clock timing.

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::SignalLine;
    use crate::error::{Error, Result};

    /// Recorded control-line transition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum LineEvent {
        /// BREAK asserted or released.
        Break(bool),
        /// DTR asserted or released.
        Dtr(bool),
    }

    #[derive(Default)]
    struct State {
        rx: VecDeque<u8>,
        fallback: Vec<u8>,
        fallback_pos: usize,
        tx: Vec<u8>,
        events: Vec<LineEvent>,
        flushes: usize,
        break_asserted: bool,
        dtr_asserted: bool,
    }

    /// Scripted in-process line.
    #[derive(Clone, Default)]
    pub struct MockLine {
        shared: Arc<Mutex<State>>,
    }

    impl MockLine {
        /// Create a line with an empty script.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue reply octets already in wire (MSB) order.
        pub fn push_reply_wire(&self, bytes: &[u8]) {
            self.shared.lock().unwrap().rx.extend(bytes.iter().copied());
        }

        /// Queue reply octets given in the LSB domain; they are mirrored
        /// into wire order, the way the pack would emit them.
        pub fn push_reply(&self, bytes: &[u8]) {
            self.push_reply_wire(&packlink_wire::reversed(bytes));
        }

        /// Install a repeating LSB-domain reply served once the script is
        /// exhausted.
        pub fn set_fallback_reply(&self, bytes: &[u8]) {
            let mut state = self.shared.lock().unwrap();
            state.fallback = packlink_wire::reversed(bytes);
            state.fallback_pos = 0;
        }

        /// Every octet written so far, in wire order.
        #[must_use]
        pub fn tx_bytes(&self) -> Vec<u8> {
            self.shared.lock().unwrap().tx.clone()
        }

        /// Every control-line transition so far, in order.
        #[must_use]
        pub fn events(&self) -> Vec<LineEvent> {
            self.shared.lock().unwrap().events.clone()
        }

        /// Number of input flushes requested.
        #[must_use]
        pub fn flushes(&self) -> usize {
            self.shared.lock().unwrap().flushes
        }

        /// Whether the line currently sits in the idle state, BREAK and DTR
        /// both asserted.
        #[must_use]
        pub fn is_idle(&self) -> bool {
            let state = self.shared.lock().unwrap();
            state.break_asserted && state.dtr_asserted
        }
    }

    impl SignalLine for MockLine {
        fn write_wire(&mut self, bytes: &[u8]) -> Result<()> {
            self.shared.lock().unwrap().tx.extend_from_slice(bytes);
            Ok(())
        }

        fn read_wire(&mut self, buf: &mut [u8]) -> Result<()> {
            let mut state = self.shared.lock().unwrap();
            for slot in buf.iter_mut() {
                if let Some(octet) = state.rx.pop_front() {
                    *slot = octet;
                } else if !state.fallback.is_empty() {
                    let pos = state.fallback_pos;
                    *slot = state.fallback[pos];
                    state.fallback_pos = (pos + 1) % state.fallback.len();
                } else {
                    return Err(Error::Timeout);
                }
            }
            Ok(())
        }

        fn flush_input(&mut self) -> Result<()> {
            // The script stays intact: a hardware flush clears line noise,
            // not replies the pack has yet to send.
            self.shared.lock().unwrap().flushes += 1;
            Ok(())
        }

        fn set_break(&mut self, asserted: bool) -> Result<()> {
            let mut state = self.shared.lock().unwrap();
            state.break_asserted = asserted;
            state.events.push(LineEvent::Break(asserted));
            Ok(())
        }

        fn set_dtr(&mut self, asserted: bool) -> Result<()> {
            let mut state = self.shared.lock().unwrap();
            state.dtr_asserted = asserted;
            state.events.push(LineEvent::Dtr(asserted));
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn exhausted_script_times_out() {
            let mut line = MockLine::new();
            line.push_reply_wire(&[0x55]);
            let mut buf = [0u8; 1];
            assert!(line.read_wire(&mut buf).is_ok());
            assert!(matches!(line.read_wire(&mut buf), Err(Error::Timeout)));
        }

        #[test]
        fn fallback_serves_cyclically() {
            let mut line = MockLine::new();
            line.set_fallback_reply(&[0x01, 0x02]);
            let mut buf = [0u8; 5];
            line.read_wire(&mut buf).unwrap();
            let lsb = packlink_wire::reversed(&buf);
            assert_eq!(lsb, vec![0x01, 0x02, 0x01, 0x02, 0x01]);
        }

        #[test]
        fn clones_observe_writes() {
            let handle = MockLine::new();
            let mut owned = handle.clone();
            owned.write_wire(&[0xAB]).unwrap();
            assert_eq!(handle.tx_bytes(), vec![0xAB]);
        }
    }
}
