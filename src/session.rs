// Author: Lukas Bower
// Purpose: Tie the link, charger, and schema into host-facing operations.

//! Session orchestrator.
//!
//! A [`Session`] owns the link for the lifetime of one port. Every public
//! operation resets the pack, drives its exchanges in lockstep, and leaves
//! the line idle on the way out, whether it succeeded, failed, or was
//! cancelled. Leaving the line high between operations makes the pack count
//! a charge that never happened.

use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::cancel::CancelToken;
use crate::charger::{Charger, RunMode};
use crate::error::{Error, Result};
use crate::line::{SignalLine, UartLine};
use crate::link::{Link, TraceConfig};
use crate::registers::{self, ScanHit};
use crate::schema::{self, Value};

/// Pause between the priming sweep and the authoritative pass, giving the
/// pack time to commit the refreshed usage RAM.
const PRIME_SETTLE: Duration = Duration::from_millis(100);

/// The coarse sweep list: one `(address, length)` window per block of the
/// known banks. A few holes are left opaque on purpose; the pack refuses
/// reads there.
pub const SWEEP_LIST: &[(u16, u8)] = &[
    (0x0000, 0x20),
    (0x0020, 0x20),
    (0x4000, 0x16),
    (0x6000, 0x20),
    (0x9000, 0x20),
    (0x9020, 0x20),
    (0x9040, 0x20),
    (0x9060, 0x20),
    (0x9080, 0x20),
    (0x90A0, 0x20),
    (0x90C0, 0x20),
    (0x90E0, 0x20),
    (0x9100, 0x20),
    (0x9120, 0x20),
    (0x9140, 0x12),
    (0x9152, 0x02),
    (0xA000, 0x06),
];

/// One window of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepWindow {
    /// Window start address.
    pub address: u16,
    /// Window length in octets.
    pub length: u8,
    /// Raw payload, or `None` where the pack refused or stayed silent.
    pub data: Option<Vec<u8>>,
}

/// A host session over one serial port.
pub struct Session<L: SignalLine> {
    link: Link<L>,
}

impl Session<UartLine> {
    /// Open the named port and leave the line idle.
    pub fn open(port_name: &str, trace: TraceConfig) -> Result<Self> {
        info!("opening {port_name}");
        Self::with_line(UartLine::open(port_name)?, trace)
    }
}

impl<L: SignalLine> Session<L> {
    /// Wrap an already-open line and drive it to idle.
    pub fn with_line(line: L, trace: TraceConfig) -> Result<Self> {
        let mut link = Link::new(line, trace);
        link.idle()?;
        Ok(Self { link })
    }

    /// Current acknowledgement counter. Diagnostic.
    #[must_use]
    pub fn acc(&self) -> u8 {
        self.link.acc()
    }

    /// Run one reset handshake, then return the line to idle.
    pub fn reset(&mut self) -> Result<()> {
        let mut guard = self.link.idle_guard();
        guard.reset()
    }

    /// Pulse the pack's signal pin high for `duration`, then idle.
    pub fn high_for(&mut self, duration: Duration) -> Result<()> {
        self.link.high_for(duration)
    }

    /// Read and decode one register.
    ///
    /// A refused window decodes to [`Value::None`]; the documented
    /// always-empty sentinel is therefore not an error.
    pub fn read(&mut self, id: u16) -> Result<Value> {
        Ok(self.read_many(&[id])?.remove(0))
    }

    /// Read and decode a set of registers under a single reset.
    pub fn read_many(&mut self, ids: &[u16]) -> Result<Vec<Value>> {
        let defs: Vec<&schema::RegisterDef> = ids
            .iter()
            .map(|&id| schema::lookup(id).ok_or(Error::SchemaMiss(id)))
            .collect::<Result<_>>()?;

        let mut guard = self.link.idle_guard();
        guard.reset()?;
        let mut values = Vec::with_capacity(defs.len());
        for def in defs {
            match registers::read(&mut *guard, def.address, def.length) {
                Ok(payload) => values.push(schema::decode(def, &payload)),
                Err(Error::NotAcknowledged { .. }) | Err(Error::Malformed { .. }) => {
                    debug!("{} ({:#06x}) did not answer", def.label, def.address);
                    values.push(Value::None);
                }
                Err(other) => return Err(other),
            }
        }
        Ok(values)
    }

    /// Read one raw memory window, schema or not.
    pub fn read_window(&mut self, address: u16, length: u8) -> Result<Vec<u8>> {
        let mut guard = self.link.idle_guard();
        guard.reset()?;
        registers::read(&mut *guard, address, length)
    }

    /// Write one raw octet of pack memory.
    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        let mut guard = self.link.idle_guard();
        guard.reset()?;
        registers::write_byte(&mut *guard, address, value)
    }

    /// Sweep every window of the sweep list and return the raw payloads.
    pub fn read_all(&mut self) -> Result<Vec<SweepWindow>> {
        let mut guard = self.link.idle_guard();
        guard.reset()?;
        sweep(&mut *guard, true)
    }

    /// Read registers for a report: one full priming sweep is discarded,
    /// because reading the `0x9xxx` bank is what refreshes the pack's
    /// cumulative-usage RAM, then a second pass collects the values.
    pub fn report_registers(&mut self, ids: &[u16]) -> Result<Vec<Value>> {
        {
            let mut guard = self.link.idle_guard();
            guard.reset()?;
            debug!("priming sweep");
            sweep(&mut *guard, false)?;
        }
        thread::sleep(PRIME_SETTLE);
        self.read_many(ids)
    }

    /// Write the persistent user note, at most 20 bytes, padded with `-`.
    pub fn write_note(&mut self, text: &str) -> Result<()> {
        let def = schema::lookup(schema::ids::USER_NOTE).expect("user note row");
        let capacity = def.length as usize;
        if text.len() > capacity {
            return Err(Error::NoteTooLong { length: text.len() });
        }
        info!("writing note {text:?}");

        let mut padded = text.as_bytes().to_vec();
        padded.resize(capacity, b'-');

        let mut guard = self.link.idle_guard();
        guard.reset()?;
        for (offset, &octet) in padded.iter().enumerate() {
            registers::write_byte(&mut *guard, def.address + offset as u16, octet)?;
        }
        Ok(())
    }

    /// Impersonate a charger until `mode` expires or `cancel` fires.
    pub fn run_charger(&mut self, mode: RunMode, cancel: &CancelToken) -> Result<()> {
        let mut guard = self.link.idle_guard();
        Charger::new(&mut *guard).run(mode, cancel)
    }

    /// Brute-force discovery scan over `start..stop`.
    pub fn scan(
        &mut self,
        start: u16,
        stop: u16,
        max_length: u8,
        cancel: &CancelToken,
    ) -> Result<Vec<ScanHit>> {
        let mut guard = self.link.idle_guard();
        guard.reset()?;
        registers::scan(&mut *guard, start, stop, max_length, cancel)
    }

    /// Close the session. The line is guaranteed idle afterwards.
    pub fn close(mut self) -> Result<()> {
        self.link.idle()
    }
}

impl<L: SignalLine> Drop for Session<L> {
    fn drop(&mut self) {
        let _ = self.link.idle();
    }
}

/// Walk the sweep list on an already-reset link. Refusals and silence are
/// recorded as empty windows, not errors.
fn sweep<L: SignalLine>(link: &mut Link<L>, keep: bool) -> Result<Vec<SweepWindow>> {
    let mut windows = Vec::new();
    for &(address, length) in SWEEP_LIST {
        let data = match registers::read(link, address, length) {
            Ok(payload) => Some(payload),
            Err(Error::NotAcknowledged { .. })
            | Err(Error::Malformed { .. })
            | Err(Error::Timeout) => None,
            Err(other) => return Err(other),
        };
        if keep {
            windows.push(SweepWindow {
                address,
                length,
                data,
            });
        }
    }
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_list_covers_the_usage_ram_contiguously() {
        let mut next = 0x9000u16;
        for &(address, length) in SWEEP_LIST {
            if (0x9000..0x9152).contains(&address) {
                assert_eq!(address, next, "gap before {address:#06x}");
                next = address + length as u16;
            }
        }
        assert_eq!(next, 0x9152);
    }

    #[test]
    fn sweep_windows_fit_one_frame() {
        for &(_, length) in SWEEP_LIST {
            // Reply envelope is payload + 5 octets and must stay within the
            // 64-octet frame bound.
            assert!(length as usize + 5 <= 64);
        }
    }
}
