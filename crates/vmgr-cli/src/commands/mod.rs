//! Subcommand implementations

pub mod disk;
pub mod host_account;
