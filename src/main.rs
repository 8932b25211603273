//! Main application entry point and CLI dispatch.
//!
//! Parses the command line, wires the optional custom configuration
//! directory, and hands control to the matching action:
//!
//! - `args`: Command-line argument parsing and help/version display
//! - `Turnr`: the normal timer session (builder pattern)
//! - `commands::test`: the hardware check subcommand
//!
//! Everything else lives in the library so integration tests can reach it.

use anyhow::Result;

use turnr::Turnr;
use turnr::args::{self, CliAction, ParsedArgs};
use turnr::commands;
use turnr::config;

fn main() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp | CliAction::ShowHelpDueToError => {
            args::display_help();
            Ok(())
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            Turnr::new(debug_enabled).run()
        }
        CliAction::TestCommand {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::test::handle_test_command(debug_enabled)
        }
    }
}
