//! Command-line interface for regdesk.
//!
//! This module provides the CLI structure and command handlers for the
//! `regdesk` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DeleteCommand, ExportCommand, ExportFormat, LanguageCategoryArg, ListCommand,
    LoginCommand, OutputFormat, RecentCommand, ReferenceCommand, RegisterCommand, ShowCommand,
    StatsCommand,
};

/// regdesk - Registration desk
///
/// Collects registration records, validates them against the intake rules,
/// and reports on the stored collection.
#[derive(Debug, Parser)]
#[command(name = "regdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a new registration
    Register(RegisterCommand),

    /// List registrations, one page at a time
    List(ListCommand),

    /// Show the most recent registrations
    Recent(RecentCommand),

    /// Show one registration
    Show(ShowCommand),

    /// Edit a registration
    Edit {
        /// Registration id
        id: i64,
    },

    /// Delete one or more registrations
    Delete(DeleteCommand),

    /// Show dashboard statistics
    Stats(StatsCommand),

    /// Export registrations or summary reports
    Export(ExportCommand),

    /// Start a dashboard session
    Login(LoginCommand),

    /// End the dashboard session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Browse reference data
    #[command(subcommand)]
    Reference(ReferenceCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    /// Whether the command belongs to the dashboard and needs a login.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::List(_)
                | Self::Recent(_)
                | Self::Show(_)
                | Self::Edit { .. }
                | Self::Delete(_)
                | Self::Stats(_)
                | Self::Export(_)
        )
    }
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Gender, Status};
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Whoami,
        }
    }

    #[test]
    fn test_cli_debug() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "regdesk");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_register_flags() {
        let args = vec![
            "regdesk",
            "register",
            "--name",
            "Asha Rao",
            "--gender",
            "female",
            "--languages",
            "Kannada,English",
            "--type",
            "agency",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Register(cmd) = cli.command else {
            panic!("expected register");
        };
        assert_eq!(cmd.name.as_deref(), Some("Asha Rao"));
        assert_eq!(cmd.languages, vec!["Kannada", "English"]);
        assert_eq!(cmd.registration_type.as_deref(), Some("agency"));
    }

    #[test]
    fn test_parse_list_filters() {
        let args = vec![
            "regdesk", "list", "--page", "3", "--gender", "female", "--status", "active",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::List(cmd) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(cmd.page, 3);
        assert_eq!(cmd.gender, Some(Gender::Female));
        assert_eq!(cmd.status, Some(Status::Active));
        assert_eq!(cmd.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_list_rejects_unknown_status() {
        let args = vec!["regdesk", "list", "--status", "pending"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_delete_many() {
        let args = vec!["regdesk", "delete", "1", "2", "3"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Delete(cmd) = cli.command else {
            panic!("expected delete");
        };
        assert_eq!(cmd.ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_delete_requires_id() {
        assert!(Cli::try_parse_from(vec!["regdesk", "delete"]).is_err());
    }

    #[test]
    fn test_parse_export_date_range() {
        let args = vec![
            "regdesk", "export", "json", "--since", "2024-01-01", "--until", "2024-01-31",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Export(cmd) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(cmd.format, ExportFormat::Json);
        assert!(cmd.since.is_some());
        assert!(cmd.until.is_some());
    }

    #[test]
    fn test_parse_export_range_needs_both_ends() {
        let args = vec!["regdesk", "export", "json", "--since", "2024-01-01"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_export_ids() {
        let args = vec!["regdesk", "export", "csv", "--ids", "5,7", "-o", "-"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Export(cmd) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(cmd.ids, vec![5, 7]);
        assert_eq!(cmd.output, Some(PathBuf::from("-")));
    }

    #[test]
    fn test_parse_login() {
        let args = vec!["regdesk", "login", "-u", "admin", "-p", "admin123", "--remember"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Login(cmd) = cli.command else {
            panic!("expected login");
        };
        assert_eq!(cmd.username, "admin");
        assert!(cmd.remember);
    }

    #[test]
    fn test_parse_reference_areas() {
        let args = vec!["regdesk", "reference", "areas", "Mysore", "Mangalore"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Reference(ReferenceCommand::Areas { .. })
        ));
    }

    #[test]
    fn test_requires_auth() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().command;

        assert!(parse(&["regdesk", "list"]).requires_auth());
        assert!(parse(&["regdesk", "stats"]).requires_auth());
        assert!(parse(&["regdesk", "edit", "1"]).requires_auth());
        assert!(!parse(&["regdesk", "register"]).requires_auth());
        assert!(!parse(&["regdesk", "reference", "states"]).requires_auth());
        assert!(!parse(&["regdesk", "login"]).requires_auth());
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["regdesk", "-c", "/custom/config.toml", "whoami"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(vec!["regdesk", "-v", "stats"]).unwrap();
        assert_eq!(cli.verbose, 1);

        let cli = Cli::try_parse_from(vec!["regdesk", "-q", "stats"]).unwrap();
        assert!(cli.quiet);
    }
}
