//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. It supports the standard help,
//! version, and debug flags while gracefully handling unknown options.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the normal timer session with these settings
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Run the hardware check subcommand
    TestCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// Processes the arguments and determines what action should be taken:
    /// a subcommand if one appears, otherwise a normal run shaped by the
    /// flags. Help and version requests take precedence over everything.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut unknown_arg_found = false;
        let mut config_dir: Option<String> = None;

        // Convert to vector for easier indexed access
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        // Find the first non-flag argument, which could be a subcommand.
        // --config consumes the following argument, so skip over it.
        let mut potential_command_idx = None;
        let mut idx = 0;
        while idx < args_vec.len() {
            let arg = &args_vec[idx];
            if arg.starts_with('-') {
                if matches!(arg.as_str(), "--config" | "-c") {
                    idx += 2;
                } else {
                    idx += 1;
                }
            } else {
                potential_command_idx = Some(idx);
                break;
            }
        }

        if let Some(cmd_idx) = potential_command_idx {
            let command = &args_vec[cmd_idx];

            // Extract debug flag and config dir from anywhere in args
            let debug_enabled = args_vec.iter().any(|arg| arg == "--debug" || arg == "-d");
            let config_dir = args_vec
                .iter()
                .position(|arg| arg == "--config" || arg == "-c")
                .and_then(|idx| args_vec.get(idx + 1))
                .cloned();

            // Help/version flags take precedence over any command
            if args_vec
                .iter()
                .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
            {
                return ParsedArgs {
                    action: CliAction::ShowVersion,
                };
            }
            if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
                return ParsedArgs {
                    action: CliAction::ShowHelp,
                };
            }

            // A second bare word after the command is a conflict, not an
            // argument; no turnr command takes positional arguments
            let conflicting_command = args_vec
                .iter()
                .skip(cmd_idx + 1)
                .find(|arg| !arg.starts_with('-') && Some(*arg) != config_dir.as_ref());
            if let Some(conflict) = conflicting_command {
                log_error!(
                    "Cannot use multiple commands at once: '{}' and '{}'",
                    command,
                    conflict
                );
                return ParsedArgs {
                    action: CliAction::ShowHelpDueToError,
                };
            }

            match command.as_str() {
                "test" | "t" => {
                    return ParsedArgs {
                        action: CliAction::TestCommand {
                            debug_enabled,
                            config_dir,
                        },
                    };
                }
                _ => {
                    log_warning!("Unknown command: {}", command);
                    return ParsedArgs {
                        action: CliAction::ShowHelpDueToError,
                    };
                }
            }
        }

        // Flag-only invocation
        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = &args_vec[i];
            match arg_str.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--config" | "-c" => {
                    // Parse: --config <directory>
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        config_dir = Some(args_vec[i + 1].clone());
                        i += 1; // Skip the parsed argument
                    } else {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        unknown_arg_found = true;
                    }
                }
                _ => {
                    if arg_str.starts_with('-') {
                        log_warning!("Unknown option: {arg_str}");
                        unknown_arg_found = true;
                    }
                    // Non-option arguments were already handled as commands
                }
            }
            i += 1;
        }

        // Determine the action based on parsed flags
        let action = if display_version {
            CliAction::ShowVersion
        } else if display_help || unknown_arg_found {
            if unknown_arg_found {
                CliAction::ShowHelpDueToError
            } else {
                CliAction::ShowHelp
            }
        } else {
            CliAction::Run {
                debug_enabled,
                config_dir,
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("turnr [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("test, t                Check board wiring: blink the LED, play every cue");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args() {
        let args = vec!["turnr"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_debug_flag() {
        let args = vec!["turnr", "--debug"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_debug_short_flag() {
        let args = vec!["turnr", "-d"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_help_flag() {
        let args = vec!["turnr", "--help"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_version_flag() {
        let args = vec!["turnr", "--version"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_version_short_flags() {
        let args1 = vec!["turnr", "-V"];
        let parsed1 = ParsedArgs::parse(args1);
        assert_eq!(parsed1.action, CliAction::ShowVersion);

        let args2 = vec!["turnr", "-v"];
        let parsed2 = ParsedArgs::parse(args2);
        assert_eq!(parsed2.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_multiple_flags() {
        let args = vec!["turnr", "--debug", "--help"];
        let parsed = ParsedArgs::parse(args);
        // Help takes precedence
        assert_eq!(parsed.action, CliAction::ShowHelp);
    }

    #[test]
    fn test_version_takes_precedence() {
        let args = vec!["turnr", "--version", "--help", "--debug"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let args = vec!["turnr", "--unknown"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_mixed_valid_and_invalid() {
        let args = vec!["turnr", "--debug", "--invalid"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_config_dir() {
        let args = vec!["turnr", "--config", "/tmp/turnr-test"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: false,
                config_dir: Some("/tmp/turnr-test".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_config_dir_missing_value() {
        let args = vec!["turnr", "--config"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_test_subcommand() {
        let args = vec!["turnr", "test"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::TestCommand {
                debug_enabled: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_test_subcommand_short() {
        let args = vec!["turnr", "t"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::TestCommand {
                debug_enabled: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_debug_with_test_subcommand() {
        let args = vec!["turnr", "-d", "test"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::TestCommand {
                debug_enabled: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_test_subcommand_with_debug_after() {
        let args = vec!["turnr", "test", "-d"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::TestCommand {
                debug_enabled: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_test_subcommand_with_config_dir() {
        let args = vec!["turnr", "test", "--config", "/tmp/turnr-test"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::TestCommand {
                debug_enabled: false,
                config_dir: Some("/tmp/turnr-test".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_command() {
        let args = vec!["turnr", "blink"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_multiple_commands_rejected() {
        let args = vec!["turnr", "test", "test"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_help_beats_test_subcommand() {
        let args = vec!["turnr", "test", "--help"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowHelp);
    }
}
