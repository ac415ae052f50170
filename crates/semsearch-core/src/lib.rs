//! Shared plumbing for the semsearch tools.
//!
//! Holds the layered [`Config`] (defaults, config file, environment) and
//! the logger setup used by the `semsearch` binary.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod logging;

pub use config::Config;
