//! # Turnr Library
//!
//! Internal library for the turnr binary application
//!
//! This library exists to enable testing of complex internals and provide clean
//! separation between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! The library is organized into several layers:
//!
//! - **Entry Point**: `Turnr` struct provides the main application API with resource management
//! - **Core Logic**: `core` module contains the timer state machine, LED policy, and main loop
//! - **Boards**: `board` module with the collaborator traits plus terminal and headless backends
//! - **Audio**: `audio` module for tone synthesis and cue resolution
//! - **Configuration**: `config` module for TOML-based settings with a generated default file
//! - **Commands**: `commands` module for CLI subcommands (hardware check)
//! - **Infrastructure**: signal handling, lock file, logging, and terminal utilities

// Import macros from the logger module for use in all submodules
#[macro_use]
pub mod common;

// Public API modules
pub mod args;
pub mod audio;
pub mod board;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;

// Internal modules
mod turnr;

// Re-export for binary
pub use turnr::Turnr;
