//! Command-line runner for the helio ledger client.
//!
//! Each subcommand is one of the small before/after scripts (transfer,
//! airdrop, balance, program invoke), with failures propagated to the
//! exit code instead of printed and swallowed.

pub mod cli;
pub mod commands;
pub mod hex;
pub mod keyfile;
