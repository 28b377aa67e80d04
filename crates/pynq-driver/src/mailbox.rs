//! Mailbox abstraction for co-processor programs
//!
//! Every Grove program speaks the same handshake: arguments are written into
//! the shared mailbox, an opcode is issued and acknowledged, results are read
//! back as raw words. Drivers only see this trait; the transport that moves
//! the words is supplied by the caller.

use crate::error::{PynqError, Result};
use pynq_chip::codec::{decode_float, decode_int};
use std::fmt::Debug;

/// Opcode every program understands: apply the pin configuration at offset 0.
pub const CONFIG_IOP_SWITCH: u32 = 0x1;

/// Host side of a co-processor mailbox
pub trait Mailbox: Debug + Send {
    /// Download and start the named co-processor program
    ///
    /// # Errors
    ///
    /// Returns error if the program cannot be found or started.
    fn load_program(&mut self, program: &str) -> Result<()>;

    /// Write `words` starting at mailbox word `offset`
    ///
    /// # Errors
    ///
    /// Returns error if the range falls outside the mailbox.
    fn write_mailbox(&mut self, offset: usize, words: &[u32]) -> Result<()>;

    /// Read `count` words starting at mailbox word `offset`
    ///
    /// # Errors
    ///
    /// Returns error if the range falls outside the mailbox.
    fn read_mailbox(&mut self, offset: usize, count: usize) -> Result<Vec<u32>>;

    /// Issue `opcode` and block until the program acknowledges it
    ///
    /// # Errors
    ///
    /// Returns error if the command is not acknowledged in time.
    fn write_blocking_command(&mut self, opcode: u32) -> Result<()>;

    /// Read a single word
    ///
    /// # Errors
    ///
    /// Returns error if `offset` falls outside the mailbox or the transport
    /// returns no word.
    fn read_word(&mut self, offset: usize) -> Result<u32> {
        let words = self.read_mailbox(offset, 1)?;
        words.first().copied().ok_or_else(|| {
            PynqError::out_of_range(format!("mailbox returned no word at offset {offset}"))
        })
    }

    /// Read `count` words and decode them as IEEE-754 floats
    ///
    /// # Errors
    ///
    /// Returns error if the range falls outside the mailbox.
    fn read_floats(&mut self, offset: usize, count: usize) -> Result<Vec<f32>> {
        Ok(self
            .read_mailbox(offset, count)?
            .into_iter()
            .map(decode_float)
            .collect())
    }

    /// Read `count` words and decode them as two's-complement integers
    ///
    /// # Errors
    ///
    /// Returns error if the range falls outside the mailbox.
    fn read_ints(&mut self, offset: usize, count: usize) -> Result<Vec<i32>> {
        Ok(self
            .read_mailbox(offset, count)?
            .into_iter()
            .map(decode_int)
            .collect())
    }
}

impl<M: Mailbox + ?Sized> Mailbox for Box<M> {
    fn load_program(&mut self, program: &str) -> Result<()> {
        (**self).load_program(program)
    }

    fn write_mailbox(&mut self, offset: usize, words: &[u32]) -> Result<()> {
        (**self).write_mailbox(offset, words)
    }

    fn read_mailbox(&mut self, offset: usize, count: usize) -> Result<Vec<u32>> {
        (**self).read_mailbox(offset, count)
    }

    fn write_blocking_command(&mut self, opcode: u32) -> Result<()> {
        (**self).write_blocking_command(opcode)
    }
}

/// Load `program`, write `pins` at offset 0 and apply them.
///
/// Shared construction sequence for every driver. An empty pin list skips the
/// mailbox write, as for programs on fixed I2C pins.
pub(crate) fn configure<M: Mailbox>(mailbox: &mut M, program: &str, pins: &[u32]) -> Result<()> {
    mailbox.load_program(program)?;
    if !pins.is_empty() {
        mailbox.write_mailbox(0, pins)?;
    }
    mailbox.write_blocking_command(CONFIG_IOP_SWITCH)?;
    tracing::info!("Configured {program} with pins {pins:?}");
    Ok(())
}
