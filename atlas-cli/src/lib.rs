//! Atlas CLI - command-line reports over a policy atlas dataset.
//!
//! The binary (`policy-atlas`) only parses arguments, loads configuration
//! and installs logging; every subcommand is implemented in [`commands`]
//! so it can be driven from tests.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub use atlas_common;
pub use atlas_core;

pub mod commands;

pub use commands::{execute, load_atlas, parse_area, Command};
