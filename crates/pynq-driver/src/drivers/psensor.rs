//! Mini PIR sensor switching a relay

use crate::error::Result;
use crate::mailbox::{configure, Mailbox};
use pynq_chip::GroveGroup;

/// Grove mini PIR plus relay
#[derive(Debug)]
pub struct GrovePSensor<M: Mailbox> {
    mailbox: M,
}

impl<M: Mailbox> GrovePSensor<M> {
    /// Program file.
    pub const PROGRAM: &'static str = "arduino_grove_psensor.bin";
    const READ_PIR: u32 = 0x3;
    const WRITE_RELAY: u32 = 0x5;

    /// Load the program with the PIR on `pir` (default G3) and relay on `relay` (default G5)
    ///
    /// # Errors
    ///
    /// Returns error if either connector is not G1–G7 or the program cannot
    /// be started.
    pub fn new(mut mailbox: M, pir: GroveGroup, relay: GroveGroup) -> Result<Self> {
        let pir_pin = super::require_digital("mini PIR", pir)?;
        let relay_pin = super::require_digital("relay", relay)?;
        configure(&mut mailbox, Self::PROGRAM, &[pir_pin, relay_pin])?;
        Ok(Self { mailbox })
    }

    /// True when the PIR sees something in front of it
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn read_pir(&mut self) -> Result<bool> {
        self.mailbox.write_blocking_command(Self::READ_PIR)?;
        Ok(self.mailbox.read_word(0)? != 0)
    }

    /// Close (`true`) or open the relay
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn write_relay(&mut self, on: bool) -> Result<()> {
        self.mailbox.write_mailbox(0, &[u32::from(on)])?;
        self.mailbox.write_blocking_command(Self::WRITE_RELAY)
    }

    /// Release the mailbox
    pub fn into_inner(self) -> M {
        self.mailbox
    }
}
