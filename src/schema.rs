// Author: Lukas Bower
// Purpose: Map pack memory windows to typed semantic values.

//! Register schema and decoders.
//!
//! The table below is the community memory map of the pack: one row per
//! known window, keyed by its index. Rows labelled `Unknown` read back
//! reliably but have not been attributed; they are kept so sweeps cover the
//! full banks. Decoding is pure: a payload either matches its row and
//! yields a typed [`Value`], or it decodes to [`Value::None`].

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Thermistor calibration: ADC code `0x0180` corresponds to 10 kΩ at 50 °C.
const ADC_1: f64 = 0x0180 as f64;
/// Thermistor calibration: ADC code `0x022E` corresponds to 20 kΩ at 35 °C.
const ADC_2: f64 = 0x022E as f64;
const R_1: f64 = 10_000.0;
const R_2: f64 = 20_000.0;
const T_1: f64 = 50.0;
const T_2: f64 = 35.0;

/// Semantic interpretation of a register window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegisterKind {
    /// Big-endian unsigned integer, 1 to 4 octets.
    Uint,
    /// 4-octet big-endian POSIX seconds, UTC.
    Date,
    /// 4-octet big-endian second count rendered `H:MM:SS`.
    Hms,
    /// Fixed-length text window, padded with `-`.
    Ascii,
    /// 2-octet battery type code plus 3-octet electronic serial.
    Serial,
    /// 2-octet thermistor ADC code, converted to °C.
    AdcTherm,
    /// Integer °C plus 1/256 °C fraction.
    DecTemp,
    /// Five big-endian millivolt pairs, one per series cell.
    CellVolts,
    /// Opaque window, rendered as hex.
    Raw,
}

/// One row of the register table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDef {
    /// Start of the window in pack memory.
    pub address: u16,
    /// Window length in octets.
    pub length: u8,
    /// How the window decodes.
    pub kind: RegisterKind,
    /// Human-readable attribution.
    pub label: &'static str,
}

impl RegisterDef {
    const fn new(address: u16, length: u8, kind: RegisterKind, label: &'static str) -> Self {
        Self {
            address,
            length,
            kind,
            label,
        }
    }
}

/// A decoded register value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    /// Unsigned integer.
    Uint(u64),
    /// UTC timestamp.
    Date(DateTime<Utc>),
    /// Duration in seconds.
    Duration {
        /// Second count as stored by the pack.
        seconds: u32,
    },
    /// Text window, padding included.
    Text(String),
    /// Battery type code and electronic serial.
    Serial {
        /// Type code identifying the pack model.
        battery_type: u16,
        /// Electronic serial; distinct from the case serial.
        serial: u32,
    },
    /// Temperature in °C, rounded to two decimals.
    Celsius(f64),
    /// Per-cell voltages in millivolts.
    CellVolts([u16; 5]),
    /// Opaque octets.
    Raw(Vec<u8>),
    /// Sentinel for anything that did not decode.
    None,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uint(value) => write!(f, "{value}"),
            Value::Date(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S")),
            Value::Duration { seconds } => write!(f, "{}", format_hms(*seconds)),
            Value::Text(text) => write!(f, "\"{text}\""),
            Value::Serial {
                battery_type,
                serial,
            } => write!(f, "Type: {battery_type:3}, Serial: {serial}"),
            Value::Celsius(celsius) => write!(f, "{celsius:.2}"),
            Value::CellVolts(cells) => write!(
                f,
                "1: {:4}, 2: {:4}, 3: {:4}, 4: {:4}, 5: {:4}",
                cells[0], cells[1], cells[2], cells[3], cells[4]
            ),
            Value::Raw(bytes) => write!(f, "{}", hex::encode_upper(bytes)),
            Value::None => write!(f, "-"),
        }
    }
}

/// Render a second count as `H:MM:SS`.
#[must_use]
pub fn format_hms(seconds: u32) -> String {
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Convert a thermistor ADC code to °C.
///
/// The thermistor resistance is linearly interpolated from the ADC code
/// through the two calibration points, then mapped linearly to temperature.
/// Linear in code, not logarithmic in resistance: the approximation is
/// deliberate and matches the pack's own firmware tables.
#[must_use]
pub fn adc_to_celsius(code: u16) -> f64 {
    let resistance = R_1 + (code as f64 - ADC_1) * (R_2 - R_1) / (ADC_2 - ADC_1);
    T_1 + (T_2 - T_1) * (resistance - R_1) / (R_2 - R_1)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Look up a register row by ID.
#[must_use]
pub fn lookup(id: u16) -> Option<&'static RegisterDef> {
    REGISTERS.get(id as usize)
}

/// Decode a payload window against its row. Pure; never panics. A payload
/// whose length does not match the row decodes to [`Value::None`].
#[must_use]
pub fn decode(def: &RegisterDef, payload: &[u8]) -> Value {
    if payload.len() != def.length as usize {
        return Value::None;
    }
    match def.kind {
        RegisterKind::Uint => {
            if payload.is_empty() || payload.len() > 8 {
                return Value::None;
            }
            let value = payload
                .iter()
                .fold(0u64, |acc, &octet| (acc << 8) | octet as u64);
            Value::Uint(value)
        }
        RegisterKind::Date => {
            let seconds = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
            match Utc.timestamp_opt(seconds as i64, 0).single() {
                Some(date) => Value::Date(date),
                None => Value::None,
            }
        }
        RegisterKind::Hms => {
            let seconds = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
            Value::Duration { seconds }
        }
        RegisterKind::Ascii => Value::Text(String::from_utf8_lossy(payload).into_owned()),
        RegisterKind::Serial => Value::Serial {
            battery_type: u16::from_be_bytes([payload[0], payload[1]]),
            serial: u32::from_be_bytes([0, payload[2], payload[3], payload[4]]),
        },
        RegisterKind::AdcTherm => {
            let code = u16::from_be_bytes([payload[0], payload[1]]);
            Value::Celsius(round2(adc_to_celsius(code)))
        }
        RegisterKind::DecTemp => {
            Value::Celsius(round2(payload[0] as f64 + payload[1] as f64 / 256.0))
        }
        RegisterKind::CellVolts => {
            let mut cells = [0u16; 5];
            for (index, cell) in cells.iter_mut().enumerate() {
                *cell = u16::from_be_bytes([payload[index * 2], payload[index * 2 + 1]]);
            }
            Value::CellVolts(cells)
        }
        RegisterKind::Raw => Value::Raw(payload.to_vec()),
    }
}

/// Well-known register IDs, kept in lockstep with the table below.
pub mod ids {
    /// Battery type and electronic serial.
    pub const SERIAL: u16 = 3;
    /// Manufacture date.
    pub const MANUFACTURE_DATE: u16 = 5;
    /// Date of first charge.
    pub const FIRST_CHARGE_DATE: u16 = 6;
    /// Days since first charge.
    pub const DAYS_SINCE_FIRST_CHARGE: u16 = 7;
    /// Date of last charge.
    pub const LAST_CHARGE_DATE: u16 = 8;
    /// Date of last tool use.
    pub const LAST_TOOL_USE_DATE: u16 = 9;
    /// The 20-octet persistent user note.
    pub const USER_NOTE: u16 = 13;
    /// The pack's wall clock.
    pub const WALL_CLOCK: u16 = 14;
    /// Live cell voltages.
    pub const CELL_VOLTAGES: u16 = 18;
    /// Pack thermistor.
    pub const PACK_THERMISTOR: u16 = 24;
    /// Forge-variant pack temperature.
    pub const FORGE_TEMPERATURE: u16 = 30;
    /// Total charge count.
    pub const TOTAL_CHARGE_COUNT: u16 = 40;
    /// Redlink (communicating) charge count.
    pub const REDLINK_CHARGE_COUNT: u16 = 41;
    /// Dumb (non-communicating) charge count.
    pub const DUMB_CHARGE_COUNT: u16 = 42;
    /// Cumulative time on charge.
    pub const TOTAL_CHARGE_TIME: u16 = 43;
    /// Cumulative time idling on a charger.
    pub const CHARGER_IDLE_TIME: u16 = 44;
    /// Total discharge in ampere-seconds.
    pub const TOTAL_DISCHARGE: u16 = 45;
    /// Discharged-to-empty count.
    pub const DISCHARGED_TO_EMPTY: u16 = 46;
    /// Overheat events.
    pub const OVERHEAT_EVENTS: u16 = 47;
    /// Overcurrent events.
    pub const OVERCURRENT_EVENTS: u16 = 48;
    /// Low-voltage events.
    pub const LOW_VOLTAGE_EVENTS: u16 = 49;
    /// Low-voltage bounce events.
    pub const LOW_VOLTAGE_BOUNCE: u16 = 50;
    /// Charges started with any cell below 2.5 V.
    pub const LOW_VOLTAGE_CHARGES: u16 = 51;
    /// First bucket of the discharge-current histogram.
    pub const DISCHARGE_HISTOGRAM_START: u16 = 52;
    /// Bucket count of the discharge-current histogram.
    pub const DISCHARGE_HISTOGRAM_LEN: u16 = 20;
    /// The documented always-empty window at `0x9152`.
    pub const SENTINEL: u16 = 167;
}

use RegisterKind::{AdcTherm, Ascii, CellVolts, Date, DecTemp, Hms, Raw, Serial, Uint};

/// The register table. Indices are the public register IDs.
pub const REGISTERS: &[RegisterDef] = &[
    // Identity bank, 0x00xx.
    RegisterDef::new(0x0000, 1, Uint, "Protocol revision"),
    RegisterDef::new(0x0001, 1, Uint, "Memory map revision"),
    RegisterDef::new(0x0002, 2, Uint, "Hardware revision"),
    RegisterDef::new(0x0004, 5, Serial, "Battery type and electronic serial"),
    RegisterDef::new(0x0009, 2, Uint, "Firmware revision"),
    RegisterDef::new(0x000B, 4, Date, "Manufacture date"),
    RegisterDef::new(0x000F, 4, Date, "Date of first charge"),
    RegisterDef::new(0x0013, 2, Uint, "Days since first charge"),
    RegisterDef::new(0x0015, 4, Date, "Date of last charge"),
    RegisterDef::new(0x0019, 4, Date, "Date of last tool use"),
    RegisterDef::new(0x001D, 2, Uint, "Capacity code"),
    RegisterDef::new(0x001F, 2, Uint, "Cell chemistry code"),
    RegisterDef::new(0x0021, 2, Uint, "Pack configuration flags"),
    RegisterDef::new(0x0023, 20, Ascii, "User note"),
    RegisterDef::new(0x0037, 4, Date, "Pack wall clock"),
    RegisterDef::new(0x003B, 2, Uint, "Clock drift trim"),
    RegisterDef::new(0x003D, 2, Uint, "Unknown (0x003D)"),
    RegisterDef::new(0x003F, 1, Uint, "Unknown (0x003F)"),
    // Live telemetry bank, 0x40xx.
    RegisterDef::new(0x4000, 10, CellVolts, "Cell voltages"),
    RegisterDef::new(0x4000, 2, Uint, "Cell 1 voltage (mV)"),
    RegisterDef::new(0x4002, 2, Uint, "Cell 2 voltage (mV)"),
    RegisterDef::new(0x4004, 2, Uint, "Cell 3 voltage (mV)"),
    RegisterDef::new(0x4006, 2, Uint, "Cell 4 voltage (mV)"),
    RegisterDef::new(0x4008, 2, Uint, "Cell 5 voltage (mV)"),
    RegisterDef::new(0x400A, 2, AdcTherm, "Pack thermistor"),
    RegisterDef::new(0x400C, 2, Uint, "Stack voltage (mV)"),
    RegisterDef::new(0x400E, 2, Uint, "Unknown (0x400E)"),
    RegisterDef::new(0x4010, 2, Uint, "State of charge"),
    RegisterDef::new(0x4012, 2, AdcTherm, "Connector thermistor"),
    RegisterDef::new(0x4014, 2, Uint, "Unknown (0x4014)"),
    // Forge-variant telemetry bank, 0x60xx.
    RegisterDef::new(0x6000, 2, DecTemp, "Forge pack temperature"),
    RegisterDef::new(0x6002, 2, Uint, "Forge status word"),
    RegisterDef::new(0x6004, 4, Raw, "Forge telemetry (0x6004)"),
    RegisterDef::new(0x6008, 4, Raw, "Forge telemetry (0x6008)"),
    RegisterDef::new(0x600C, 2, Raw, "Forge telemetry (0x600C)"),
    RegisterDef::new(0x600E, 2, Raw, "Forge telemetry (0x600E)"),
    RegisterDef::new(0x6010, 4, Raw, "Forge telemetry (0x6010)"),
    RegisterDef::new(0x6014, 4, Raw, "Forge telemetry (0x6014)"),
    RegisterDef::new(0x6018, 4, Raw, "Forge telemetry (0x6018)"),
    RegisterDef::new(0x601C, 4, Raw, "Forge telemetry (0x601C)"),
    // Cumulative-usage RAM, 0x9000..0x9152. Reading this bank refreshes it.
    RegisterDef::new(0x9000, 2, Uint, "Total charge count"),
    RegisterDef::new(0x9002, 2, Uint, "Redlink charge count"),
    RegisterDef::new(0x9004, 2, Uint, "Dumb charge count"),
    RegisterDef::new(0x9006, 4, Hms, "Total charge time"),
    RegisterDef::new(0x900A, 4, Hms, "Time idling on charger"),
    RegisterDef::new(0x900E, 4, Uint, "Total discharge (A s)"),
    RegisterDef::new(0x9012, 2, Uint, "Discharged-to-empty count"),
    RegisterDef::new(0x9014, 2, Uint, "Overheat events"),
    RegisterDef::new(0x9016, 2, Uint, "Overcurrent events"),
    RegisterDef::new(0x9018, 2, Uint, "Low-voltage events"),
    RegisterDef::new(0x901A, 2, Uint, "Low-voltage bounce events"),
    RegisterDef::new(0x901C, 2, Uint, "Low-voltage charge count"),
    // Discharge time by current bucket.
    RegisterDef::new(0x901E, 4, Hms, "Discharge time 10-20 A"),
    RegisterDef::new(0x9022, 4, Hms, "Discharge time 20-30 A"),
    RegisterDef::new(0x9026, 4, Hms, "Discharge time 30-40 A"),
    RegisterDef::new(0x902A, 4, Hms, "Discharge time 40-50 A"),
    RegisterDef::new(0x902E, 4, Hms, "Discharge time 50-60 A"),
    RegisterDef::new(0x9032, 4, Hms, "Discharge time 60-70 A"),
    RegisterDef::new(0x9036, 4, Hms, "Discharge time 70-80 A"),
    RegisterDef::new(0x903A, 4, Hms, "Discharge time 80-90 A"),
    RegisterDef::new(0x903E, 4, Hms, "Discharge time 90-100 A"),
    RegisterDef::new(0x9042, 4, Hms, "Discharge time 100-110 A"),
    RegisterDef::new(0x9046, 4, Hms, "Discharge time 110-120 A"),
    RegisterDef::new(0x904A, 4, Hms, "Discharge time 120-130 A"),
    RegisterDef::new(0x904E, 4, Hms, "Discharge time 130-140 A"),
    RegisterDef::new(0x9052, 4, Hms, "Discharge time 140-150 A"),
    RegisterDef::new(0x9056, 4, Hms, "Discharge time 150-160 A"),
    RegisterDef::new(0x905A, 4, Hms, "Discharge time 160-170 A"),
    RegisterDef::new(0x905E, 4, Hms, "Discharge time 170-180 A"),
    RegisterDef::new(0x9062, 4, Hms, "Discharge time 180-190 A"),
    RegisterDef::new(0x9066, 4, Hms, "Discharge time 190-200 A"),
    RegisterDef::new(0x906A, 4, Hms, "Discharge time > 200 A"),
    // Charge start-voltage buckets.
    RegisterDef::new(0x906E, 2, Uint, "Charges started < 15.0 V"),
    RegisterDef::new(0x9070, 2, Uint, "Charges started 15.0-15.5 V"),
    RegisterDef::new(0x9072, 2, Uint, "Charges started 15.5-16.0 V"),
    RegisterDef::new(0x9074, 2, Uint, "Charges started 16.0-16.5 V"),
    RegisterDef::new(0x9076, 2, Uint, "Charges started 16.5-17.0 V"),
    RegisterDef::new(0x9078, 2, Uint, "Charges started 17.0-17.5 V"),
    RegisterDef::new(0x907A, 2, Uint, "Charges started 17.5-18.0 V"),
    RegisterDef::new(0x907C, 2, Uint, "Charges started 18.0-18.5 V"),
    RegisterDef::new(0x907E, 2, Uint, "Charges started 18.5-19.0 V"),
    RegisterDef::new(0x9080, 2, Uint, "Charges started 19.0-19.5 V"),
    RegisterDef::new(0x9082, 2, Uint, "Charges started 19.5-20.0 V"),
    RegisterDef::new(0x9084, 2, Uint, "Charges started > 20.0 V"),
    // Charge end-voltage buckets.
    RegisterDef::new(0x9086, 2, Uint, "Charges ended < 18.0 V"),
    RegisterDef::new(0x9088, 2, Uint, "Charges ended 18.0-18.5 V"),
    RegisterDef::new(0x908A, 2, Uint, "Charges ended 18.5-19.0 V"),
    RegisterDef::new(0x908C, 2, Uint, "Charges ended 19.0-19.5 V"),
    RegisterDef::new(0x908E, 2, Uint, "Charges ended 19.5-20.0 V"),
    RegisterDef::new(0x9090, 2, Uint, "Charges ended 20.0-20.5 V"),
    RegisterDef::new(0x9092, 2, Uint, "Charges ended 20.5-21.0 V"),
    RegisterDef::new(0x9094, 2, Uint, "Charges ended 21.0-21.5 V"),
    RegisterDef::new(0x9096, 2, Uint, "Charges ended 21.5-22.0 V"),
    RegisterDef::new(0x9098, 2, Uint, "Charges ended 22.0-22.5 V"),
    RegisterDef::new(0x909A, 2, Uint, "Charges ended 22.5-23.0 V"),
    RegisterDef::new(0x909C, 2, Uint, "Charges ended > 23.0 V"),
    // Charge start-temperature buckets.
    RegisterDef::new(0x909E, 2, Uint, "Charges started < 0 deg C"),
    RegisterDef::new(0x90A0, 2, Uint, "Charges started 0-10 deg C"),
    RegisterDef::new(0x90A2, 2, Uint, "Charges started 10-20 deg C"),
    RegisterDef::new(0x90A4, 2, Uint, "Charges started 20-30 deg C"),
    RegisterDef::new(0x90A6, 2, Uint, "Charges started 30-40 deg C"),
    RegisterDef::new(0x90A8, 2, Uint, "Charges started 40-50 deg C"),
    RegisterDef::new(0x90AA, 2, Uint, "Charges started 50-60 deg C"),
    RegisterDef::new(0x90AC, 2, Uint, "Charges started > 60 deg C"),
    // Charge duration buckets.
    RegisterDef::new(0x90AE, 4, Hms, "Charge time < 15 min"),
    RegisterDef::new(0x90B2, 4, Hms, "Charge time 15-30 min"),
    RegisterDef::new(0x90B6, 4, Hms, "Charge time 30-45 min"),
    RegisterDef::new(0x90BA, 4, Hms, "Charge time 45-60 min"),
    RegisterDef::new(0x90BE, 4, Hms, "Charge time 60-90 min"),
    RegisterDef::new(0x90C2, 4, Hms, "Charge time 90-120 min"),
    RegisterDef::new(0x90C6, 4, Hms, "Charge time 120-180 min"),
    RegisterDef::new(0x90CA, 4, Hms, "Charge time > 180 min"),
    // Charge end-temperature buckets.
    RegisterDef::new(0x90CE, 2, Uint, "Charges ended < 0 deg C"),
    RegisterDef::new(0x90D0, 2, Uint, "Charges ended 0-10 deg C"),
    RegisterDef::new(0x90D2, 2, Uint, "Charges ended 10-20 deg C"),
    RegisterDef::new(0x90D4, 2, Uint, "Charges ended 20-30 deg C"),
    RegisterDef::new(0x90D6, 2, Uint, "Charges ended 30-40 deg C"),
    RegisterDef::new(0x90D8, 2, Uint, "Charges ended 40-50 deg C"),
    RegisterDef::new(0x90DA, 2, Uint, "Charges ended 50-60 deg C"),
    RegisterDef::new(0x90DC, 2, Uint, "Charges ended > 60 deg C"),
    // Cell-imbalance-at-charge buckets.
    RegisterDef::new(0x90DE, 2, Uint, "Charges with imbalance < 20 mV"),
    RegisterDef::new(0x90E0, 2, Uint, "Charges with imbalance 20-40 mV"),
    RegisterDef::new(0x90E2, 2, Uint, "Charges with imbalance 40-60 mV"),
    RegisterDef::new(0x90E4, 2, Uint, "Charges with imbalance 60-80 mV"),
    RegisterDef::new(0x90E6, 2, Uint, "Charges with imbalance 80-100 mV"),
    RegisterDef::new(0x90E8, 2, Uint, "Charges with imbalance 100-120 mV"),
    RegisterDef::new(0x90EA, 2, Uint, "Charges with imbalance 120-140 mV"),
    RegisterDef::new(0x90EC, 2, Uint, "Charges with imbalance > 140 mV"),
    // Charge termination counters.
    RegisterDef::new(0x90EE, 2, Uint, "Charges ended by full detect"),
    RegisterDef::new(0x90F0, 2, Uint, "Charges ended by temperature"),
    RegisterDef::new(0x90F2, 2, Uint, "Charges ended by fault"),
    RegisterDef::new(0x90F4, 2, Uint, "Charges ended by removal"),
    // Last-charge record.
    RegisterDef::new(0x90F6, 10, CellVolts, "Cell voltages at last charge start"),
    RegisterDef::new(0x9100, 10, CellVolts, "Cell voltages at last charge end"),
    RegisterDef::new(0x910A, 4, Hms, "Last charge duration"),
    RegisterDef::new(0x910E, 2, AdcTherm, "Temperature at last charge start"),
    RegisterDef::new(0x9110, 2, AdcTherm, "Temperature at last charge end"),
    RegisterDef::new(0x9112, 4, Uint, "Last charge delivered (A s)"),
    RegisterDef::new(0x9116, 4, Uint, "Lifetime charge delivered (A s)"),
    RegisterDef::new(0x911A, 2, Uint, "Deep-sleep events"),
    RegisterDef::new(0x911C, 2, Uint, "Watchdog resets"),
    RegisterDef::new(0x911E, 2, Uint, "Fault flags"),
    // Unattributed tail of the usage RAM.
    RegisterDef::new(0x9120, 2, Uint, "Unknown (0x9120)"),
    RegisterDef::new(0x9122, 2, Uint, "Unknown (0x9122)"),
    RegisterDef::new(0x9124, 2, Uint, "Unknown (0x9124)"),
    RegisterDef::new(0x9126, 2, Uint, "Unknown (0x9126)"),
    RegisterDef::new(0x9128, 2, Uint, "Unknown (0x9128)"),
    RegisterDef::new(0x912A, 2, Uint, "Unknown (0x912A)"),
    RegisterDef::new(0x912C, 2, Uint, "Unknown (0x912C)"),
    RegisterDef::new(0x912E, 2, Uint, "Unknown (0x912E)"),
    RegisterDef::new(0x9130, 2, Uint, "Unknown (0x9130)"),
    RegisterDef::new(0x9132, 2, Uint, "Unknown (0x9132)"),
    RegisterDef::new(0x9134, 2, Uint, "Unknown (0x9134)"),
    RegisterDef::new(0x9136, 2, Uint, "Unknown (0x9136)"),
    RegisterDef::new(0x9138, 2, Uint, "Unknown (0x9138)"),
    RegisterDef::new(0x913A, 2, Uint, "Unknown (0x913A)"),
    RegisterDef::new(0x913C, 2, Uint, "Unknown (0x913C)"),
    RegisterDef::new(0x913E, 2, Uint, "Unknown (0x913E)"),
    RegisterDef::new(0x9140, 2, Uint, "Unknown (0x9140)"),
    RegisterDef::new(0x9142, 2, Uint, "Unknown (0x9142)"),
    RegisterDef::new(0x9144, 2, Uint, "Unknown (0x9144)"),
    RegisterDef::new(0x9146, 2, Uint, "Unknown (0x9146)"),
    RegisterDef::new(0x9148, 2, Uint, "Unknown (0x9148)"),
    RegisterDef::new(0x914A, 2, Uint, "Unknown (0x914A)"),
    RegisterDef::new(0x914C, 2, Uint, "Unknown (0x914C)"),
    RegisterDef::new(0x914E, 2, Uint, "Unknown (0x914E)"),
    RegisterDef::new(0x9150, 2, Uint, "Unknown (0x9150)"),
    // Documented always-empty window.
    RegisterDef::new(0x9152, 2, Raw, "Always-empty sentinel"),
    // Opaque trailer bank, 0xA0xx.
    RegisterDef::new(0xA000, 6, Raw, "Opaque trailer"),
    RegisterDef::new(0xA000, 2, Raw, "Unknown (0xA000)"),
    RegisterDef::new(0xA002, 2, Raw, "Unknown (0xA002)"),
    RegisterDef::new(0xA004, 2, Raw, "Unknown (0xA004)"),
];
