//! Command-line command handlers for turnr.
//!
//! One-shot commands live here, each in its own submodule. The default
//! `run` action is not a command; it goes through [`crate::Turnr`].

pub mod test;
