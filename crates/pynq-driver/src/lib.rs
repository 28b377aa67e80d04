//! Host-side drivers for Grove peripherals on the Pynq-Z2 Arduino co-processor.
//!
//! Each peripheral is served by a fixed program running on the Arduino
//! MicroBlaze. The host side is thin: write arguments into the shared mailbox,
//! issue an opcode, wait for the acknowledge, read raw words back and decode
//! them with [`pynq_chip::codec`].
//!
//! # Layers
//!
//! ```text
//! drivers::*        GroveImu, GroveUsRanger, GrovePCounter, ...
//!      │            pin validation, opcodes, unit scaling
//!      ▼
//! Mailbox (trait)   load_program / write_mailbox / read_mailbox /
//!      │            write_blocking_command
//!      ▼
//! transport         board support layer, or SoftwareMailbox for CI
//! ```
//!
//! # Quick start
//!
//! ```
//! use pynq_driver::{GroveImu, GroveGroup, SoftwareMailbox};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let readings = [16384.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 4096.0, 0.0, 22.5, 101_325.0];
//! let mailbox = SoftwareMailbox::default().with_float_response(0x3, &readings);
//!
//! let mut imu = GroveImu::new(mailbox, GroveGroup::I2c)?;
//! let sample = imu.get_data()?;
//! assert_eq!(sample.accel[0], 1.0);
//! assert!((imu.heading()? - 90.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod backends;
mod config;
pub mod drivers;
mod error;
mod mailbox;

pub use backends::SoftwareMailbox;
pub use config::{BoardConfig, ENV_COMMAND_TIMEOUT_MS, ENV_FCLK0_MHZ, ENV_MAILBOX_WORDS};
pub use drivers::{
    Brightness, DhtReading, Direction, Gesture, GestureSensor, GroveAutoAlarm, GroveGesGame,
    GroveImu, GroveMulti, GrovePCounter, GrovePSensor, GroveUsRanger, ImuReading, LineReading,
    LineTracker, RunUsRanger,
};
pub use error::{PynqError, Result};
pub use mailbox::{Mailbox, CONFIG_IOP_SWITCH};
pub use pynq_chip::{AnalogChannel, GroveGroup};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        AnalogChannel, BoardConfig, GroveGroup, Mailbox, PynqError, Result, SoftwareMailbox,
    };
}
