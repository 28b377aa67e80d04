//! `pynq`: command-line tool for Pynq-Z2 mailbox register words.
//!
//! ```text
//! USAGE:
//!   pynq decode <word>... [--int] [--round]   Decode raw register words
//!   pynq encode <value> [--int]               Register word for a value
//!   pynq simulate imu                         IMU driver on a software mailbox
//!   pynq simulate ranger [--cycles N]         Ranger driver on a software mailbox
//! ```
//!
//! Words are accepted in hex (`0x3f800000`) or decimal. Board settings for
//! `simulate` come from `PYNQ_FCLK0_MHZ`, `PYNQ_MAILBOX_WORDS` and
//! `PYNQ_COMMAND_TIMEOUT_MS`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pynq_chip::codec::{decode_float, decode_int, encode_float, encode_int, round_display};
use pynq_chip::RegisterWord;
use pynq_driver::{BoardConfig, GroveGroup, GroveImu, GroveUsRanger, SoftwareMailbox};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Raw IMU sample served by `simulate imu`: level board, heading 45°.
const IMU_SAMPLE: [f32; 11] = [
    0.0, 0.0, 16384.0, 131.0, -65.5, 0.0, 2048.0, 2048.0, -1024.0, 24.37, 100_812.5,
];

#[derive(Parser)]
#[command(name = "pynq", about = "Pynq-Z2 mailbox register tool", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Decode register words as IEEE-754 floats (or integers with --int).
    Decode {
        /// Words in hex (0x...) or decimal.
        #[arg(required = true)]
        words: Vec<String>,
        /// Decode as two's-complement integers.
        #[arg(long)]
        int: bool,
        /// Round floats to two decimals.
        #[arg(long)]
        round: bool,
    },
    /// Print the register word holding a value.
    Encode {
        /// Float value (or integer with --int).
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Encode as a two's-complement integer.
        #[arg(long)]
        int: bool,
    },
    /// Run a driver against a scripted software mailbox.
    Simulate {
        #[command(subcommand)]
        sensor: Sensor,
    },
}

#[derive(Subcommand)]
enum Sensor {
    /// Grove IMU 10DOF on the I2C connector.
    Imu,
    /// Grove ultrasonic ranger on G1.
    Ranger {
        /// Echo length in FCLK0 cycles.
        #[arg(long, default_value_t = 1_160_000)]
        cycles: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Cmd::Decode { words, int, round } => cmd_decode(&words, int, round)?,
        Cmd::Encode { value, int } => cmd_encode(&value, int)?,
        Cmd::Simulate { sensor: Sensor::Imu } => cmd_simulate_imu()?,
        Cmd::Simulate {
            sensor: Sensor::Ranger { cycles },
        } => cmd_simulate_ranger(cycles)?,
    }

    Ok(())
}

/// Parse `0x`-prefixed hex or plain decimal into a register word.
fn parse_word(text: &str) -> Result<u32> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => text.replace('_', "").parse::<u32>(),
    };
    parsed.with_context(|| format!("Invalid register word: {text:?}"))
}

fn cmd_decode(words: &[String], int: bool, round: bool) -> Result<()> {
    for text in words {
        let word = RegisterWord(parse_word(text)?);
        if int {
            println!("{word}  {}", decode_int(word.bits()));
        } else {
            let value = decode_float(word.bits());
            let value = if round { round_display(value) } else { value };
            println!("{word}  {value}");
        }
    }
    Ok(())
}

fn cmd_encode(value: &str, int: bool) -> Result<()> {
    let word = if int {
        let v: i32 = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid integer: {value:?}"))?;
        encode_int(v)
    } else {
        let v: f32 = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid float: {value:?}"))?;
        encode_float(v)
    };
    println!("{}", RegisterWord(word));
    Ok(())
}

fn cmd_simulate_imu() -> Result<()> {
    let config = BoardConfig::from_env();
    debug!("Simulating IMU with {config:?}");
    let mailbox = SoftwareMailbox::from_config(&config).with_float_response(0x3, &IMU_SAMPLE);
    let mut imu = GroveImu::new(mailbox, GroveGroup::I2c)?;

    let sample = imu.get_data()?;
    let shown = sample.rounded();
    println!("Accel (g)      : {:?}", shown.accel);
    println!("Gyro  (°/s)    : {:?}", shown.gyro);
    println!("Compass (µT)   : {:?}", shown.compass);
    println!("Temperature    : {:.2} °C", sample.temperature);
    println!("Pressure       : {:.2} Pa", sample.pressure);
    println!("Heading        : {:.2}°", sample.heading());
    match sample.tilt_heading() {
        Ok(tilt) => println!("Tilt heading   : {tilt:.2}°"),
        Err(e) => println!("Tilt heading   : unavailable ({e})"),
    }
    println!("Pressure (atm) : {:.4}", sample.atm());
    println!("Altitude       : {:.2} m", sample.altitude_hypsometric()?);
    Ok(())
}

fn cmd_simulate_ranger(cycles: u32) -> Result<()> {
    let config = BoardConfig::from_env();
    debug!("Simulating ranger with {config:?}");
    let mailbox = SoftwareMailbox::from_config(&config).with_response(0x3, &[cycles]);
    let mut ranger = GroveUsRanger::new(mailbox, GroveGroup::G1, config.clone())?;

    println!("FCLK0          : {} MHz", config.fclk0_mhz);
    println!("Echo           : {cycles} cycles");
    println!("Distance       : {:.2} cm", ranger.distance_cm()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_word_formats() {
        assert_eq!(parse_word("0x3f800000").unwrap(), 0x3F80_0000);
        assert_eq!(parse_word("0XFFFFFFFF").unwrap(), u32::MAX);
        assert_eq!(parse_word("0x3f80_0000").unwrap(), 0x3F80_0000);
        assert_eq!(parse_word("1065353216").unwrap(), 0x3F80_0000);
        assert!(parse_word("0x1_0000_0000").is_err());
        assert!(parse_word("-1").is_err());
        assert!(parse_word("pi").is_err());
    }

    #[test]
    fn negative_value_is_accepted() {
        let cli = Cli::try_parse_from(["pynq", "encode", "-1.5"]).unwrap();
        assert!(matches!(cli.command, Cmd::Encode { ref value, int: false } if value == "-1.5"));
    }

    #[test]
    fn ranger_defaults() {
        let cli = Cli::try_parse_from(["pynq", "simulate", "ranger"]).unwrap();
        assert!(matches!(
            cli.command,
            Cmd::Simulate {
                sensor: Sensor::Ranger { cycles: 1_160_000 }
            }
        ));
    }
}
