// Author: Lukas Bower
// Purpose: Command-line surface over the Packlink session API.

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use packlink::charger::RunMode;
use packlink::schema::{self, REGISTERS};
use packlink::{CancelToken, HealthReport, Session, TraceConfig, UartLine};

#[derive(Parser)]
#[command(
    about = "One-wire diagnostic tool for 18 V pack batteries",
    after_help = "Wire UART-TX to the pack's J2 pin, UART-RX to J1 and \
                  ground to ground to impersonate a charger."
)]
struct Cli {
    /// Serial port the adapter enumerates as.
    #[arg(long, global = true, default_value = "/dev/ttyUSB0")]
    port: String,

    /// Log TX/RX frames in hex (also needs RUST_LOG=debug).
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List serial ports visible on this host
    Ports,
    /// Run one reset handshake against the pack
    Reset,
    /// Read and decode one register by ID
    Read {
        /// Register ID; see `dump` for the table
        id: u16,
    },
    /// Read a raw memory window
    Peek {
        /// Start address, decimal or 0x-prefixed hex
        #[arg(value_parser = parse_addr)]
        address: u16,
        /// Window length in octets
        length: u8,
    },
    /// Read and decode every known register
    Dump,
    /// Read the coarse sweep windows and print them as hex
    Sweep,
    /// Collect and print a pack health report
    Health {
        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write the persistent 20-character user note
    Note {
        /// Text to store; shorter notes are padded with '-'
        text: String,
    },
    /// Impersonate a charger so the pack streams telemetry
    Charge {
        /// How long to keep the emulation up
        #[arg(long, value_parser = humantime::parse_duration, default_value = "30s")]
        duration: Duration,
        /// Stream until the process is killed instead
        #[arg(long, conflicts_with = "duration")]
        forever: bool,
    },
    /// Brute-force scan an address range for readable windows
    Scan {
        /// First address to probe
        #[arg(long, value_parser = parse_addr, default_value = "0x0000")]
        start: u16,
        /// First address left unprobed
        #[arg(long, value_parser = parse_addr, default_value = "0x0100")]
        stop: u16,
        /// Lengths to try at each address, exclusive upper bound
        #[arg(long, default_value_t = 8)]
        max_len: u8,
    },
    /// Pulse the pack's signal pin high, then return to idle
    Pulse {
        /// Pulse width
        #[arg(long, value_parser = humantime::parse_duration, default_value = "1s")]
        duration: Duration,
    },
}

fn parse_addr(text: &str) -> Result<u16, String> {
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
    } else {
        text.parse()
    };
    parsed.map_err(|err| format!("bad address {text:?}: {err}"))
}

/// Token fired by Ctrl-C, so interrupting a long-running command still
/// walks the library's cancellation path and leaves the line idle.
fn cancel_on_interrupt() -> anyhow::Result<CancelToken> {
    let token = CancelToken::new();
    let fired = token.clone();
    ctrlc::set_handler(move || fired.cancel()).context("installing the Ctrl-C handler")?;
    Ok(token)
}

fn open_session(cli: &Cli) -> anyhow::Result<Session<UartLine>> {
    let trace = if cli.trace {
        TraceConfig::verbose()
    } else {
        TraceConfig::default()
    };
    Session::open(&cli.port, trace).with_context(|| format!("opening {}", cli.port))
}

fn ports() -> anyhow::Result<()> {
    let listed = UartLine::available()?;
    if listed.is_empty() {
        println!("no serial ports found");
    }
    for info in listed {
        println!("{}", info.port_name);
    }
    Ok(())
}

fn dump(session: &mut Session<UartLine>) -> anyhow::Result<()> {
    let ids: Vec<u16> = (0..REGISTERS.len() as u16).collect();
    let values = session.read_many(&ids)?;
    println!("{:>3} {:6} {:>3} {:9} {:<34} VALUE", "ID", "ADDR", "LEN", "TYPE", "LABEL");
    for (id, value) in ids.iter().zip(values) {
        let def = schema::lookup(*id).expect("table id");
        println!(
            "{:>3} {:#06x} {:>3} {:9} {:<34} {}",
            id,
            def.address,
            def.length,
            format!("{:?}", def.kind),
            def.label,
            value
        );
    }
    Ok(())
}

fn sweep(session: &mut Session<UartLine>) -> anyhow::Result<()> {
    for window in session.read_all()? {
        match window.data {
            Some(data) => println!("{:#06x}: {}", window.address, hex_spaced(&data)),
            None => println!("{:#06x}: (no answer)", window.address),
        }
    }
    Ok(())
}

fn hex_spaced(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|octet| format!("{octet:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::Ports = cli.cmd {
        return ports();
    }

    let mut session = open_session(&cli)?;
    match &cli.cmd {
        Command::Ports => unreachable!("handled above"),
        Command::Reset => {
            session.reset()?;
            println!("pack answered the sync octet");
        }
        Command::Read { id } => {
            let value = session.read(*id)?;
            println!("{value}");
        }
        Command::Peek { address, length } => {
            let payload = session.read_window(*address, *length)?;
            println!("{}", hex_spaced(&payload));
        }
        Command::Dump => dump(&mut session)?,
        Command::Sweep => sweep(&mut session)?,
        Command::Health { json } => {
            let report = HealthReport::collect(&mut session)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render());
            }
        }
        Command::Note { text } => {
            session.write_note(text)?;
            println!("note written");
        }
        Command::Charge { duration, forever } => {
            let mode = if *forever {
                RunMode::Forever
            } else {
                RunMode::For(*duration)
            };
            match session.run_charger(mode, &cancel_on_interrupt()?) {
                Ok(()) => println!("emulation finished; line is idle"),
                Err(packlink::Error::Cancelled) => println!("cancelled; line is idle"),
                Err(err) => return Err(err.into()),
            }
        }
        Command::Scan {
            start,
            stop,
            max_len,
        } => {
            match session.scan(*start, *stop, *max_len, &cancel_on_interrupt()?) {
                Ok(hits) => {
                    for hit in &hits {
                        println!(
                            "{:#06x} len {:>2}: {}",
                            hit.address,
                            hit.length,
                            hex_spaced(&hit.payload)
                        );
                    }
                    println!("{} readable windows", hits.len());
                }
                Err(packlink::Error::Cancelled) => println!("cancelled; line is idle"),
                Err(err) => return Err(err.into()),
            }
        }
        Command::Pulse { duration } => {
            session.high_for(*duration)?;
            println!("pulsed {}", humantime::format_duration(*duration));
        }
    }
    session.close()?;
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
