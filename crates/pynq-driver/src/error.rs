//! Error types for Grove driver operations

use thiserror::Error;

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, PynqError>;

/// Errors that can occur while driving a co-processor program
#[derive(Debug, Error)]
pub enum PynqError {
    /// Connector or pin assignment not accepted by the program
    #[error("Invalid pin for {peripheral}: {reason}")]
    InvalidPin {
        /// Peripheral being configured
        peripheral: &'static str,
        /// What was wrong with the assignment
        reason: String,
    },

    /// Command argument outside the accepted range
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Reason for rejection
        reason: String,
    },

    /// Co-processor program reported a failed initialisation
    #[error("Initialization failed: {reason}")]
    InitFailed {
        /// Reason for failure
        reason: String,
    },

    /// Co-processor program could not be loaded
    #[error("Failed to load program {program}: {reason}")]
    ProgramLoad {
        /// Program file name
        program: String,
        /// Reason for failure
        reason: String,
    },

    /// Command was not acknowledged in time
    #[error("Command {opcode:#x} not acknowledged after {duration_ms}ms")]
    Timeout {
        /// Opcode that was issued
        opcode: u32,
        /// Timeout duration in milliseconds
        duration_ms: u64,
    },

    /// Mailbox access outside the shared region
    #[error("Mailbox access out of bounds: offset={offset}, count={count}, limit={limit}")]
    OutOfBounds {
        /// First word accessed
        offset: usize,
        /// Number of words accessed
        count: usize,
        /// Mailbox size in words
        limit: usize,
    },

    /// Decoded readings do not produce a meaningful result
    #[error("Value out of range or device not connected: {reason}")]
    OutOfRange {
        /// Which computation failed
        reason: String,
    },

    /// I/O error from the transport
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error
        #[from]
        source: std::io::Error,
    },
}

impl PynqError {
    /// Create an invalid pin error
    pub fn invalid_pin(peripheral: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidPin {
            peripheral,
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create an initialization error
    pub fn init_failed(reason: impl Into<String>) -> Self {
        Self::InitFailed {
            reason: reason.into(),
        }
    }

    /// Create a program load error
    pub fn program_load(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProgramLoad {
            program: program.into(),
            reason: reason.into(),
        }
    }

    /// Create an out-of-range error
    pub fn out_of_range(reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            reason: reason.into(),
        }
    }
}
