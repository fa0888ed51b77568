//! Bayes Dice Core Library
//!
//! This library provides:
//! - The belief engine: prior/likelihood/posterior over die side-counts
//! - The session driver: hidden die selection, roll simulation, scoring
//! - Output rendering, logging setup and exit codes for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod exit_codes;
pub mod inference;
pub mod logging;
pub mod output;
pub mod session;
