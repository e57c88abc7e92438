//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::record::{Gender, RegistrationForm, Status};
use crate::reference::LanguageCategory;

/// Register command arguments.
///
/// Fields can come from a JSON form file, from flags, or both; flags win.
#[derive(Debug, Default, Args)]
pub struct RegisterCommand {
    /// Read the form from a JSON file
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub dob: Option<String>,

    /// Gender (male, female, other)
    #[arg(long)]
    pub gender: Option<String>,

    /// First address line
    #[arg(long)]
    pub address1: Option<String>,

    /// Second address line
    #[arg(long)]
    pub address2: Option<String>,

    /// State
    #[arg(long)]
    pub state: Option<String>,

    /// City within the state
    #[arg(long)]
    pub city: Option<String>,

    /// Six digit postal code
    #[arg(long)]
    pub postal_code: Option<String>,

    /// Additional cities, comma separated
    #[arg(long, value_delimiter = ',')]
    pub cities: Vec<String>,

    /// Areas of the selected cities, comma separated
    #[arg(long, value_delimiter = ',')]
    pub areas: Vec<String>,

    /// Pin codes of the state, comma separated
    #[arg(long, value_delimiter = ',')]
    pub pins: Vec<String>,

    /// Languages known, comma separated
    #[arg(long, value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Status (active, inactive, suspended)
    #[arg(long)]
    pub status: Option<String>,

    /// Registrant type (individual, agency, subagency)
    #[arg(long = "type", value_name = "TYPE")]
    pub registration_type: Option<String>,

    /// Onboarding date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub onboarding_date: Option<String>,

    /// Print the stored record as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl RegisterCommand {
    /// Overlay the flags that were given onto `form`.
    pub fn apply_to(&self, form: &mut RegistrationForm) {
        let overlay = |target: &mut String, value: &Option<String>| {
            if let Some(v) = value {
                target.clone_from(v);
            }
        };

        overlay(&mut form.name, &self.name);
        overlay(&mut form.date_of_birth, &self.dob);
        overlay(&mut form.address_line1, &self.address1);
        overlay(&mut form.address_line2, &self.address2);
        overlay(&mut form.state, &self.state);
        overlay(&mut form.city, &self.city);
        overlay(&mut form.postal_code, &self.postal_code);
        overlay(&mut form.status, &self.status);
        overlay(&mut form.registration_type, &self.registration_type);
        overlay(&mut form.onboarding_date, &self.onboarding_date);

        if self.gender.is_some() {
            form.gender.clone_from(&self.gender);
        }

        let overlay_list = |target: &mut Vec<String>, values: &[String]| {
            if !values.is_empty() {
                *target = values.to_vec();
            }
        };

        overlay_list(&mut form.cities, &self.cities);
        overlay_list(&mut form.areas, &self.areas);
        overlay_list(&mut form.pin_codes, &self.pins);
        overlay_list(&mut form.languages, &self.languages);
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Filter by name (case-insensitive substring)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Filter by state
    #[arg(short, long)]
    pub state: Option<String>,

    /// Filter by gender
    #[arg(short, long)]
    pub gender: Option<Gender>,

    /// Filter by status
    #[arg(long)]
    pub status: Option<Status>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Recent command arguments.
#[derive(Debug, Args)]
pub struct RecentCommand {
    /// How many records to show (defaults to the configured limit)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Registration id
    pub id: i64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Registration ids to delete
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<i64>,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// What to export
    #[arg(value_enum)]
    pub format: ExportFormat,

    /// Write to this file instead of the default file name; `-` for stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only export these ids, comma separated
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<i64>,

    /// Only records created on or after this date (YYYY-MM-DD)
    #[arg(long, requires = "until")]
    pub since: Option<NaiveDate>,

    /// Only records created on or before this date (YYYY-MM-DD)
    #[arg(long, requires = "since")]
    pub until: Option<NaiveDate>,
}

impl ExportCommand {
    /// File written when `--output` is not given.
    #[must_use]
    pub fn default_file_name(&self) -> &'static str {
        match self.format {
            ExportFormat::Json if !self.ids.is_empty() => "selected_registrations.json",
            ExportFormat::Json if self.since.is_some() => "date_range_report.json",
            ExportFormat::Json => "all_registrations.json",
            ExportFormat::Csv => "registrations.csv",
            ExportFormat::Summary => "summary_report.txt",
            ExportFormat::Report => "summary_report.doc",
        }
    }
}

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Username
    #[arg(short, long, default_value = "")]
    pub username: String,

    /// Password
    #[arg(short, long, default_value = "")]
    pub password: String,

    /// Remember the username for next time
    #[arg(short, long)]
    pub remember: bool,
}

/// Reference data commands.
#[derive(Debug, Subcommand)]
pub enum ReferenceCommand {
    /// List all states
    States,

    /// List the cities of a state
    Cities {
        /// State name
        state: String,
    },

    /// List the pin codes of a state
    Pins {
        /// State name
        state: String,
    },

    /// List the areas of one or more cities
    Areas {
        /// City names
        #[arg(required = true, num_args = 1..)]
        cities: Vec<String>,
    },

    /// List known languages
    Languages {
        /// Only languages in this category
        #[arg(long, value_enum)]
        category: Option<LanguageCategoryArg>,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Language category argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageCategoryArg {
    /// Scheduled languages
    Scheduled,
    /// Major languages
    Major,
    /// Regional languages
    Regional,
}

impl From<LanguageCategoryArg> for LanguageCategory {
    fn from(arg: LanguageCategoryArg) -> Self {
        match arg {
            LanguageCategoryArg::Scheduled => Self::Scheduled,
            LanguageCategoryArg::Major => Self::Major,
            LanguageCategoryArg::Regional => Self::Regional,
        }
    }
}

/// Export kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// JSON array of records
    Json,
    /// CSV table
    Csv,
    /// Plain-text summary report
    Summary,
    /// Summary report as a word-processor document
    Report,
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}
