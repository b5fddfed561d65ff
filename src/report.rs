// Author: Lukas Bower
// Purpose: Aggregate report registers into a pack health summary.

//! Pack health report.
//!
//! Collecting a report is the one operation that needs the priming sweep:
//! the cumulative counters live in the `0x9xxx` RAM, which only refreshes
//! when that bank is read, so the orchestrator sweeps once, discards, and
//! reads again. Collection is tolerant of missing windows; a field the pack
//! refuses to serve renders as absent rather than failing the report.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::line::SignalLine;
use crate::schema::{self, format_hms, ids, Value};
use crate::session::Session;

/// Community-observed battery type codes. Incomplete; unknown codes render
/// with the raw number.
const BATTERY_TYPES: &[(u16, f64, &str)] = &[
    (36, 1.5, "Compact 1.5 Ah"),
    (37, 2.0, "Compact 2.0 Ah"),
    (38, 3.0, "Standard 3.0 Ah"),
    (39, 4.0, "Extended 4.0 Ah"),
    (40, 5.0, "Extended 5.0 Ah"),
    (41, 6.0, "High Output 6.0 Ah"),
    (42, 8.0, "High Output 8.0 Ah"),
    (43, 12.0, "High Output 12.0 Ah"),
    (44, 3.0, "Compact High Output 3.0 Ah"),
    (45, 2.5, "Compact 2.5 Ah"),
    (48, 6.0, "Forge 6.0 Ah"),
    (49, 12.0, "Forge 12.0 Ah"),
];

/// Charger-side counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChargeStats {
    /// Charges on a communicating charger.
    pub redlink_count: u32,
    /// Charges on a non-communicating charger.
    pub dumb_count: u32,
    /// All charges.
    pub total_count: u32,
    /// Cumulative seconds on charge.
    pub total_time_s: u32,
    /// Cumulative seconds idling on a charger after full.
    pub idle_time_s: u32,
    /// Charges started with any cell below 2.5 V.
    pub low_voltage_count: u32,
}

/// Tool-side counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageStats {
    /// Total discharge in ampere-hours.
    pub total_discharge_ah: f64,
    /// Equivalent full cycles, when the pack capacity is known.
    pub discharge_cycles: Option<f64>,
    /// Times run to empty.
    pub to_empty_count: u32,
    /// Overheat events.
    pub overheat_count: u32,
    /// Overcurrent events.
    pub overcurrent_count: u32,
    /// Low-voltage events.
    pub low_voltage_count: u32,
    /// Low-voltage bounce events.
    pub low_voltage_bounce_count: u32,
    /// Seconds on tool above the 10 A histogram floor.
    pub tool_time_s: u32,
}

/// One bucket of the discharge-current histogram.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramEntry {
    /// Bucket label, straight from the schema.
    pub bucket: &'static str,
    /// Seconds spent in the bucket.
    pub seconds: u32,
    /// Share of the total tool time, in percent.
    pub share_pct: u8,
}

/// The assembled health report.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Report generation time, host clock.
    pub generated: DateTime<Utc>,
    /// Battery type code from the serial register.
    pub battery_type: u16,
    /// Type description, or `Unknown` for codes not yet observed.
    pub description: String,
    /// Nominal capacity, when the type code is known.
    pub capacity_ah: Option<f64>,
    /// Electronic serial. Does not match the case serial.
    pub serial: u32,
    /// Manufacture date.
    pub manufacture_date: Option<DateTime<Utc>>,
    /// Days since the first charge.
    pub days_since_first_charge: Option<u64>,
    /// Days since the last charge, per the pack's own clock.
    pub days_since_last_charge: Option<i64>,
    /// Days since the last tool use, per the pack's own clock.
    pub days_since_last_tool_use: Option<i64>,
    /// Sum of the cell voltages, in volts.
    pub pack_voltage: f64,
    /// Per-cell voltages in millivolts.
    pub cell_voltages: [u16; 5],
    /// Spread between the highest and lowest cell, in millivolts.
    pub imbalance_mv: u16,
    /// Pack temperature, when either thermistor answered.
    pub temperature_c: Option<f64>,
    /// Charger-side counters.
    pub charge: ChargeStats,
    /// Tool-side counters.
    pub usage: UsageStats,
    /// Discharge-current histogram.
    pub histogram: Vec<HistogramEntry>,
}

impl HealthReport {
    /// Register IDs a report needs, histogram buckets included.
    #[must_use]
    pub fn register_ids() -> Vec<u16> {
        let mut list = vec![
            ids::SERIAL,
            ids::MANUFACTURE_DATE,
            ids::DAYS_SINCE_FIRST_CHARGE,
            ids::LAST_CHARGE_DATE,
            ids::LAST_TOOL_USE_DATE,
            ids::WALL_CLOCK,
            ids::CELL_VOLTAGES,
            ids::PACK_THERMISTOR,
            ids::FORGE_TEMPERATURE,
            ids::TOTAL_CHARGE_COUNT,
            ids::REDLINK_CHARGE_COUNT,
            ids::DUMB_CHARGE_COUNT,
            ids::TOTAL_CHARGE_TIME,
            ids::CHARGER_IDLE_TIME,
            ids::LOW_VOLTAGE_CHARGES,
            ids::TOTAL_DISCHARGE,
            ids::DISCHARGED_TO_EMPTY,
            ids::OVERHEAT_EVENTS,
            ids::OVERCURRENT_EVENTS,
            ids::LOW_VOLTAGE_EVENTS,
            ids::LOW_VOLTAGE_BOUNCE,
        ];
        list.extend(
            ids::DISCHARGE_HISTOGRAM_START
                ..ids::DISCHARGE_HISTOGRAM_START + ids::DISCHARGE_HISTOGRAM_LEN,
        );
        list
    }

    /// Collect a report over an open session. Takes 5 to 10 seconds on a
    /// real pack; the priming sweep dominates.
    pub fn collect<L: SignalLine>(session: &mut Session<L>) -> Result<Self> {
        info!("collecting health report; this takes a few seconds");
        let ids_list = Self::register_ids();
        let values = session.report_registers(&ids_list)?;
        static NO_VALUE: Value = Value::None;
        let value_of = |id: u16| -> &Value {
            ids_list
                .iter()
                .position(|&candidate| candidate == id)
                .map_or(&NO_VALUE, |index| &values[index])
        };

        let uint_of = |id: u16| -> u32 {
            match value_of(id) {
                Value::Uint(value) => *value as u32,
                _ => 0,
            }
        };
        let seconds_of = |id: u16| -> u32 {
            match value_of(id) {
                Value::Duration { seconds } => *seconds,
                _ => 0,
            }
        };
        let date_of = |id: u16| -> Option<DateTime<Utc>> {
            match value_of(id) {
                Value::Date(date) => Some(*date),
                _ => None,
            }
        };

        let (battery_type, serial) = match value_of(ids::SERIAL) {
            Value::Serial {
                battery_type,
                serial,
            } => (*battery_type, *serial),
            _ => (0, 0),
        };
        let known = BATTERY_TYPES
            .iter()
            .find(|&&(code, _, _)| code == battery_type);

        let cell_voltages = match value_of(ids::CELL_VOLTAGES) {
            Value::CellVolts(cells) => *cells,
            _ => [0; 5],
        };
        let pack_voltage = cell_voltages.iter().map(|&mv| mv as u32).sum::<u32>() as f64 / 1000.0;
        let imbalance_mv = cell_voltages.iter().max().unwrap_or(&0)
            - cell_voltages.iter().min().unwrap_or(&0);

        let temperature_c = match value_of(ids::PACK_THERMISTOR) {
            Value::Celsius(celsius) => Some(*celsius),
            _ => match value_of(ids::FORGE_TEMPERATURE) {
                Value::Celsius(celsius) => Some(*celsius),
                _ => None,
            },
        };

        let pack_clock = date_of(ids::WALL_CLOCK);
        let days_between = |earlier: Option<DateTime<Utc>>| -> Option<i64> {
            Some((pack_clock? - earlier?).num_days())
        };

        let capacity_ah = known.map(|&(_, ah, _)| ah);
        let total_discharge_ah = uint_of(ids::TOTAL_DISCHARGE) as f64 / 3600.0;

        let mut histogram = Vec::with_capacity(ids::DISCHARGE_HISTOGRAM_LEN as usize);
        let mut tool_time_s = 0u32;
        for offset in 0..ids::DISCHARGE_HISTOGRAM_LEN {
            let id = ids::DISCHARGE_HISTOGRAM_START + offset;
            let def = schema::lookup(id).expect("histogram row");
            let seconds = seconds_of(id);
            tool_time_s += seconds;
            histogram.push(HistogramEntry {
                bucket: def.label,
                seconds,
                share_pct: 0,
            });
        }
        for entry in &mut histogram {
            entry.share_pct = if tool_time_s > 0 {
                ((entry.seconds as f64 / tool_time_s as f64) * 100.0).round() as u8
            } else {
                0
            };
        }

        Ok(Self {
            generated: Utc::now(),
            battery_type,
            description: known
                .map(|&(_, _, name)| name.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            capacity_ah,
            serial,
            manufacture_date: date_of(ids::MANUFACTURE_DATE),
            days_since_first_charge: match value_of(ids::DAYS_SINCE_FIRST_CHARGE) {
                Value::Uint(days) => Some(*days),
                _ => None,
            },
            days_since_last_charge: days_between(date_of(ids::LAST_CHARGE_DATE)),
            days_since_last_tool_use: days_between(date_of(ids::LAST_TOOL_USE_DATE)),
            pack_voltage,
            cell_voltages,
            imbalance_mv,
            temperature_c,
            charge: ChargeStats {
                redlink_count: uint_of(ids::REDLINK_CHARGE_COUNT),
                dumb_count: uint_of(ids::DUMB_CHARGE_COUNT),
                total_count: uint_of(ids::TOTAL_CHARGE_COUNT),
                total_time_s: seconds_of(ids::TOTAL_CHARGE_TIME),
                idle_time_s: seconds_of(ids::CHARGER_IDLE_TIME),
                low_voltage_count: uint_of(ids::LOW_VOLTAGE_CHARGES),
            },
            usage: UsageStats {
                total_discharge_ah,
                discharge_cycles: capacity_ah.map(|ah| total_discharge_ah / ah),
                to_empty_count: uint_of(ids::DISCHARGED_TO_EMPTY),
                overheat_count: uint_of(ids::OVERHEAT_EVENTS),
                overcurrent_count: uint_of(ids::OVERCURRENT_EVENTS),
                low_voltage_count: uint_of(ids::LOW_VOLTAGE_EVENTS),
                low_voltage_bounce_count: uint_of(ids::LOW_VOLTAGE_BOUNCE),
                tool_time_s,
            },
            histogram,
        })
    }

    /// Render the report for a terminal.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Type: {} [{}]", self.battery_type, self.description);
        let _ = writeln!(
            out,
            "E-serial: {} (does NOT match the case serial)",
            self.serial
        );
        if let Some(date) = self.manufacture_date {
            let _ = writeln!(out, "Manufacture date: {}", date.format("%Y-%m-%d"));
        }
        if let Some(days) = self.days_since_first_charge {
            let _ = writeln!(out, "Days since first charge: {days}");
        }
        if let Some(days) = self.days_since_last_charge {
            let _ = writeln!(out, "Days since last charge: {days}");
        }
        if let Some(days) = self.days_since_last_tool_use {
            let _ = writeln!(out, "Days since last tool use: {days}");
        }
        let _ = writeln!(out, "Pack voltage: {:.2} V", self.pack_voltage);
        let _ = writeln!(out, "Cell voltages (mV): {:?}", self.cell_voltages);
        let _ = writeln!(out, "Cell imbalance (mV): {}", self.imbalance_mv);
        if let Some(celsius) = self.temperature_c {
            let _ = writeln!(out, "Temperature (deg C): {celsius:.2}");
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "CHARGING STATS:");
        let _ = writeln!(
            out,
            "Charge count [redlink, dumb, (total)]: {}, {}, ({})",
            self.charge.redlink_count, self.charge.dumb_count, self.charge.total_count
        );
        let _ = writeln!(
            out,
            "Total charge time: {}",
            format_hms(self.charge.total_time_s)
        );
        let _ = writeln!(
            out,
            "Time idling on charger: {}",
            format_hms(self.charge.idle_time_s)
        );
        let _ = writeln!(
            out,
            "Low-voltage charges (any cell < 2.5 V): {}",
            self.charge.low_voltage_count
        );

        let _ = writeln!(out);
        let _ = writeln!(out, "TOOL USE STATS:");
        let _ = writeln!(
            out,
            "Total discharge (Ah): {:.2}",
            self.usage.total_discharge_ah
        );
        if let Some(cycles) = self.usage.discharge_cycles {
            let _ = writeln!(out, "Equivalent full cycles: {cycles:.2}");
        }
        let _ = writeln!(
            out,
            "Times discharged to empty: {}",
            self.usage.to_empty_count
        );
        let _ = writeln!(out, "Times overheated: {}", self.usage.overheat_count);
        let _ = writeln!(out, "Overcurrent events: {}", self.usage.overcurrent_count);
        let _ = writeln!(out, "Low-voltage events: {}", self.usage.low_voltage_count);
        let _ = writeln!(
            out,
            "Low-voltage bounce: {}",
            self.usage.low_voltage_bounce_count
        );
        let _ = writeln!(
            out,
            "Total time on tool (> 10 A): {}",
            format_hms(self.usage.tool_time_s)
        );

        let _ = writeln!(out);
        let _ = writeln!(out, "DISCHARGE HISTOGRAM:");
        for entry in &self.histogram {
            let bar = "X".repeat(entry.share_pct as usize);
            let _ = writeln!(
                out,
                "{:<26} {:>9} {:3}% {}",
                entry.bucket,
                format_hms(entry.seconds),
                entry.share_pct,
                bar
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_register_ids_are_all_in_the_schema() {
        for id in HealthReport::register_ids() {
            assert!(schema::lookup(id).is_some(), "id {id} missing");
        }
    }

    #[test]
    fn known_type_codes_resolve() {
        let known = BATTERY_TYPES
            .iter()
            .find(|&&(code, _, _)| code == 40)
            .unwrap();
        assert_eq!(known.1, 5.0);
    }
}
