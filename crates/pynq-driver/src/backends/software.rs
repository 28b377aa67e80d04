//! Software mailbox backend
//!
//! Implements [`Mailbox`] over an in-memory word array. Responses are scripted
//! per opcode: when an opcode is issued, its scripted words are copied into
//! the mailbox at offset 0, which is where every Grove program leaves its
//! results. Issued opcodes and host writes are recorded so tests can check
//! the exact command sequence a driver produces.

use crate::config::BoardConfig;
use crate::error::{PynqError, Result};
use crate::mailbox::Mailbox;
use pynq_chip::codec::{encode_float, encode_int};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// In-memory co-processor mailbox
#[derive(Debug, Clone)]
pub struct SoftwareMailbox {
    words: Vec<u32>,
    program: Option<String>,
    missing_programs: HashSet<String>,
    responses: HashMap<u32, Vec<u32>>,
    stalled: HashSet<u32>,
    timeout_ms: u64,
    commands: Vec<u32>,
    writes: Vec<(usize, Vec<u32>)>,
}

impl Default for SoftwareMailbox {
    fn default() -> Self {
        Self::from_config(&BoardConfig::default())
    }
}

impl SoftwareMailbox {
    /// Mailbox of `size` zeroed words
    pub fn new(size: usize) -> Self {
        Self {
            words: vec![0; size],
            program: None,
            missing_programs: HashSet::new(),
            responses: HashMap::new(),
            stalled: HashSet::new(),
            timeout_ms: BoardConfig::default().command_timeout_ms,
            commands: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Mailbox sized and timed from the board configuration
    pub fn from_config(config: &BoardConfig) -> Self {
        let mut mailbox = Self::new(config.mailbox_words);
        mailbox.timeout_ms = config.command_timeout_ms;
        mailbox
    }

    /// Script raw words returned by `opcode`
    #[must_use]
    pub fn with_response(mut self, opcode: u32, words: &[u32]) -> Self {
        self.set_response(opcode, words);
        self
    }

    /// Script float readings returned by `opcode`
    #[must_use]
    pub fn with_float_response(self, opcode: u32, values: &[f32]) -> Self {
        let words: Vec<u32> = values.iter().copied().map(encode_float).collect();
        self.with_response(opcode, &words)
    }

    /// Script integer readings returned by `opcode`
    #[must_use]
    pub fn with_int_response(self, opcode: u32, values: &[i32]) -> Self {
        let words: Vec<u32> = values.iter().copied().map(encode_int).collect();
        self.with_response(opcode, &words)
    }

    /// Make `opcode` never acknowledge
    #[must_use]
    pub fn with_stalled(mut self, opcode: u32) -> Self {
        self.stalled.insert(opcode);
        self
    }

    /// Make loading `program` fail
    #[must_use]
    pub fn with_missing_program(mut self, program: &str) -> Self {
        self.missing_programs.insert(program.to_string());
        self
    }

    /// Replace the scripted response for `opcode`
    pub fn set_response(&mut self, opcode: u32, words: &[u32]) {
        self.responses.insert(opcode, words.to_vec());
    }

    /// Currently loaded program
    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    /// Opcodes issued so far, oldest first
    pub fn commands(&self) -> &[u32] {
        &self.commands
    }

    /// Host writes so far as `(offset, words)`, oldest first
    pub fn writes(&self) -> &[(usize, Vec<u32>)] {
        &self.writes
    }

    /// Mailbox contents
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    fn check_bounds(&self, offset: usize, count: usize) -> Result<()> {
        let in_bounds = offset
            .checked_add(count)
            .is_some_and(|end| end <= self.words.len());
        if in_bounds {
            Ok(())
        } else {
            Err(PynqError::OutOfBounds {
                offset,
                count,
                limit: self.words.len(),
            })
        }
    }
}

impl Mailbox for SoftwareMailbox {
    fn load_program(&mut self, program: &str) -> Result<()> {
        if self.missing_programs.contains(program) {
            return Err(PynqError::program_load(program, "program binary not found"));
        }
        debug!("Loading program {program}");
        self.words.fill(0);
        self.program = Some(program.to_string());
        Ok(())
    }

    fn write_mailbox(&mut self, offset: usize, words: &[u32]) -> Result<()> {
        self.check_bounds(offset, words.len())?;
        trace!("Write {} words @ {offset}: {words:x?}", words.len());
        self.words[offset..offset + words.len()].copy_from_slice(words);
        self.writes.push((offset, words.to_vec()));
        Ok(())
    }

    fn read_mailbox(&mut self, offset: usize, count: usize) -> Result<Vec<u32>> {
        self.check_bounds(offset, count)?;
        let words = self.words[offset..offset + count].to_vec();
        trace!("Read {count} words @ {offset}: {words:x?}");
        Ok(words)
    }

    fn write_blocking_command(&mut self, opcode: u32) -> Result<()> {
        let Some(program) = self.program.as_deref() else {
            return Err(PynqError::init_failed(format!(
                "command {opcode:#x} issued before any program was loaded"
            )));
        };
        debug!("{program}: command {opcode:#x}");
        self.commands.push(opcode);

        if self.stalled.contains(&opcode) {
            return Err(PynqError::Timeout {
                opcode,
                duration_ms: self.timeout_ms,
            });
        }

        if let Some(response) = self.responses.get(&opcode) {
            self.check_bounds(0, response.len())?;
            self.words[..response.len()].copy_from_slice(response);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_response_lands_at_offset_zero() {
        let mut mb = SoftwareMailbox::new(8).with_response(0x3, &[7, 8, 9]);
        mb.load_program("test.bin").unwrap();
        mb.write_blocking_command(0x3).unwrap();
        assert_eq!(mb.read_mailbox(0, 3).unwrap(), vec![7, 8, 9]);
        assert_eq!(mb.commands(), &[0x3]);
    }

    #[test]
    fn float_and_int_helpers() {
        let mut mb = SoftwareMailbox::new(4)
            .with_float_response(0x3, &[1.0, -2.5])
            .with_int_response(0x5, &[-1]);
        mb.load_program("test.bin").unwrap();
        mb.write_blocking_command(0x3).unwrap();
        assert_eq!(mb.read_floats(0, 2).unwrap(), vec![1.0, -2.5]);
        mb.write_blocking_command(0x5).unwrap();
        assert_eq!(mb.read_ints(0, 1).unwrap(), vec![-1]);
        assert_eq!(mb.read_word(0).unwrap(), 0xFFFF_FFFF);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut mb = SoftwareMailbox::new(4);
        assert!(matches!(
            mb.read_mailbox(3, 2),
            Err(PynqError::OutOfBounds { offset: 3, count: 2, limit: 4 })
        ));
        assert!(mb.write_mailbox(usize::MAX, &[1]).is_err());
    }

    #[test]
    fn command_requires_program() {
        let mut mb = SoftwareMailbox::new(4);
        assert!(matches!(
            mb.write_blocking_command(0x1),
            Err(PynqError::InitFailed { .. })
        ));
    }

    #[test]
    fn stalled_opcode_times_out() {
        let config = BoardConfig::default().with_command_timeout_ms(250);
        let mut mb = SoftwareMailbox::from_config(&config).with_stalled(0x3);
        mb.load_program("test.bin").unwrap();
        match mb.write_blocking_command(0x3) {
            Err(PynqError::Timeout { opcode, duration_ms }) => {
                assert_eq!(opcode, 0x3);
                assert_eq!(duration_ms, 250);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn missing_program_fails_to_load() {
        let mut mb = SoftwareMailbox::default().with_missing_program("gone.bin");
        assert!(matches!(
            mb.load_program("gone.bin"),
            Err(PynqError::ProgramLoad { .. })
        ));
        assert_eq!(mb.program(), None);
    }
}
