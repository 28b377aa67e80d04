//! Mailbox implementations
//!
//! The hardware transport is provided by the board support layer and plugs in
//! through [`Mailbox`](crate::Mailbox). This crate ships the software mailbox,
//! which scripts co-processor responses in memory for CI and for exercising
//! drivers without a board.

pub mod software;

pub use software::SoftwareMailbox;
