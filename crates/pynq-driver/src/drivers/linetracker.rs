//! Dual line tracker on the analog header

use crate::error::{PynqError, Result};
use crate::mailbox::{configure, Mailbox};
use pynq_chip::codec::{decode_float, decode_int};
use pynq_chip::AnalogChannel;

/// One sample from both trackers
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineReading {
    /// Left tracker digital level
    pub digital_left: i32,
    /// Right tracker digital level
    pub digital_right: i32,
    /// Left tracker analog voltage
    pub analog_left: f32,
    /// Right tracker analog voltage
    pub analog_right: f32,
}

/// Left and right line trackers on two analog channels
#[derive(Debug)]
pub struct LineTracker<M: Mailbox> {
    mailbox: M,
}

impl<M: Mailbox> LineTracker<M> {
    /// Program file.
    pub const PROGRAM: &'static str = "arduino_linetracker.bin";
    const READ_LT_DATA: u32 = 0x3;

    /// Load the program with the trackers on `left` and `right`
    ///
    /// # Errors
    ///
    /// Returns error if the program cannot be started.
    pub fn new(mut mailbox: M, left: AnalogChannel, right: AnalogChannel) -> Result<Self> {
        configure(&mut mailbox, Self::PROGRAM, &[left.index(), right.index()])?;
        Ok(Self { mailbox })
    }

    /// Load the program with the shield default channels (left A3, right A2)
    ///
    /// # Errors
    ///
    /// Returns error if the program cannot be started.
    pub fn with_default_channels(mailbox: M) -> Result<Self> {
        Self::new(mailbox, AnalogChannel::A3, AnalogChannel::A2)
    }

    /// Read both trackers
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn read(&mut self) -> Result<LineReading> {
        self.mailbox.write_blocking_command(Self::READ_LT_DATA)?;
        match self.mailbox.read_mailbox(0, 4)?.as_slice() {
            &[dl, dr, al, ar, ..] => Ok(LineReading {
                digital_left: decode_int(dl),
                digital_right: decode_int(dr),
                analog_left: decode_float(al),
                analog_right: decode_float(ar),
            }),
            short => Err(PynqError::out_of_range(format!(
                "line tracker returned {} words, expected 4",
                short.len()
            ))),
        }
    }

    /// Release the mailbox
    pub fn into_inner(self) -> M {
        self.mailbox
    }
}
