//! Command implementations for the tote CLI.
//!
//! - [`build`] - bundle all targets and commit them together
//! - [`check`] - validate config, entries and the version source
//! - [`init`] - write a default `tote.toml`
//! - [`verify`] - check outputs already on disk

pub mod build;
pub mod check;
pub mod init;
pub mod utils;
pub mod verify;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use init::execute as init_execute;
pub use verify::execute as verify_execute;
