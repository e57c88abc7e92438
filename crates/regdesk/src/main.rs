//! `regdesk` - CLI for the registration desk
//!
//! This binary provides the command-line interface for submitting
//! registrations and for the dashboard views over the stored collection.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::{bail, Context};
use chrono::{Local, Utc};
use clap::Parser;

use regdesk::cli::{
    Cli, Command, ConfigCommand, DeleteCommand, ExportCommand, ExportFormat, ListCommand,
    LoginCommand, OutputFormat, RecentCommand, ReferenceCommand, RegisterCommand, ShowCommand,
};
use regdesk::export::{self, ReportSummary};
use regdesk::record::{Registration, RegistrationForm};
use regdesk::reference::ReferenceData;
use regdesk::session::{remembered_user, Session, StaticAuthenticator};
use regdesk::stats::{self, DashboardSummary, RecordFilter, WeeklyTrend};
use regdesk::store::{KeyValueStore, RecordStore, Scope, SqliteStore};
use regdesk::validation::FormValidator;
use regdesk::{init_logging, Config, Error};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    if cli.command.requires_auth() {
        session(&config)?.require_auth()?;
    }

    // Execute the command
    match cli.command {
        Command::Register(cmd) => handle_register(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Recent(cmd) => handle_recent(&config, &cmd),
        Command::Show(cmd) => handle_show(&config, &cmd),
        Command::Edit { id } => handle_edit(&config, id),
        Command::Delete(cmd) => handle_delete(&config, &cmd),
        Command::Stats(cmd) => handle_stats(&config, cmd.json),
        Command::Export(cmd) => handle_export(&config, &cmd),
        Command::Login(cmd) => handle_login(&config, &cmd),
        Command::Logout => {
            session(&config)?.logout()?;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => handle_whoami(&config),
        Command::Reference(cmd) => {
            handle_reference(&cmd);
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn local_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let path = config.database_path();
    SqliteStore::open(&path, Scope::Local)
        .with_context(|| format!("failed to open {}", path.display()))
}

fn session(config: &Config) -> anyhow::Result<Session<SqliteStore>> {
    let path = config.database_path();
    let store = SqliteStore::open(&path, Scope::Session)
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Session::new(store))
}

fn records(config: &Config) -> anyhow::Result<RecordStore<SqliteStore>> {
    Ok(RecordStore::open(local_store(config)?))
}

fn handle_register(config: &Config, cmd: &RegisterCommand) -> anyhow::Result<()> {
    let mut form = match &cmd.file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<RegistrationForm>(&raw)
                .with_context(|| format!("{} is not a registration form", path.display()))?
        }
        None => RegistrationForm::default(),
    };
    cmd.apply_to(&mut form);

    let now = Utc::now();
    let validator = FormValidator::new(
        config.validation.clone(),
        now.with_timezone(&Local).date_naive(),
    );
    let reference = ReferenceData::builtin();
    let mut store = records(config)?;

    match store.register(form, &validator, &reference, now) {
        Ok(record) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(record)?);
            } else {
                println!("Registration successful! Id: {}", record.id);
            }
            Ok(())
        }
        Err(Error::Validation(report)) => {
            eprintln!("Please fix the following fields:");
            for (field, error) in report.iter() {
                eprintln!("  {field}: {error}");
            }
            bail!("registration rejected ({} invalid fields)", report.len())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_table<'a>(rows: impl IntoIterator<Item = &'a Registration>) {
    println!(
        "{:<15} {:<24} {:<7} {:<20} {:<16} {:<10} {:<10}",
        "ID", "Name", "Gender", "State", "City", "Status", "Created"
    );
    println!("{}", "-".repeat(106));
    for r in rows {
        println!(
            "{:<15} {:<24} {:<7} {:<20} {:<16} {:<10} {:<10}",
            r.id,
            truncate(&r.name, 24),
            r.gender,
            truncate(&r.state, 20),
            truncate(&r.city, 16),
            r.status,
            r.timestamp.with_timezone(&Local).format("%Y-%m-%d"),
        );
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let store = records(config)?;
    let filter = RecordFilter {
        name: cmd.name.clone(),
        state: cmd.state.clone(),
        gender: cmd.gender,
        status: cmd.status,
    };
    let matching = filter.apply(store.records());
    let page = stats::paginate(&matching, cmd.page, config.dashboard.page_size);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
        OutputFormat::Table => {
            if page.total_items == 0 {
                println!("No registrations found.");
                return Ok(());
            }
            print_table(page.items.iter().copied());
            println!();
            println!(
                "Page {} of {} ({} registrations)",
                page.page, page.total_pages, page.total_items
            );
        }
    }
    Ok(())
}

fn handle_recent(config: &Config, cmd: &RecentCommand) -> anyhow::Result<()> {
    let store = records(config)?;
    let limit = cmd.limit.unwrap_or(config.dashboard.recent_limit);
    let latest = stats::recent(store.records(), limit);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&latest)?);
    } else if latest.is_empty() {
        println!("No registrations yet.");
    } else {
        print_table(latest);
    }
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let store = records(config)?;
    let record = store.get(cmd.id).ok_or_else(|| Error::not_found(cmd.id))?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    let today = Local::now().date_naive();
    println!("Registration {}", record.id);
    println!("------------------------------");
    println!("Name:            {}", record.name);
    println!(
        "Date of birth:   {} (age {})",
        record.date_of_birth,
        record.age_on(today)
    );
    println!("Gender:          {}", record.gender);
    println!("Address:         {}", record.address_line1);
    if !record.address_line2.is_empty() {
        println!("                 {}", record.address_line2);
    }
    println!("State:           {}", record.state);
    println!("City:            {}", record.city);
    println!("Postal code:     {}", record.postal_code);
    println!("Cities:          {}", record.cities.join(", "));
    println!("Areas:           {}", record.areas.join(", "));
    println!("Pin codes:       {}", record.pin_codes.join(", "));
    println!("Languages:       {}", record.languages.join(", "));
    println!("Status:          {}", record.status);
    println!("Type:            {}", record.registration_type);
    println!("Onboarding date: {}", record.onboarding_date);
    println!(
        "Created:         {}",
        record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

fn handle_edit(config: &Config, id: i64) -> anyhow::Result<()> {
    let store = records(config)?;
    store.get(id).ok_or_else(|| Error::not_found(id))?;
    println!("Editing registration {id} is not available yet.");
    Ok(())
}

fn handle_delete(config: &Config, cmd: &DeleteCommand) -> anyhow::Result<()> {
    let mut store = records(config)?;
    let removed = store.remove_many(&cmd.ids);

    if removed > 0 {
        store.persist()?;
    }
    println!("Deleted {removed} registration(s).");
    Ok(())
}

fn handle_stats(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = records(config)?;
    let records = store.records();
    let now = Local::now();

    let summary = DashboardSummary::compute(records, &now);
    let trend = WeeklyTrend::compute(records, &now);
    let top_states = stats::top_n(stats::tally_states(records), config.dashboard.top_n);
    let top_languages = stats::top_n(stats::tally_languages(records), config.dashboard.top_n);

    if json {
        let report = serde_json::json!({
            "summary": summary,
            "trend": trend,
            "top_states": top_states,
            "top_languages": top_languages,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Overview");
    println!("========");
    println!("Total registrations: {}", summary.total);
    println!("Today:               {}", summary.today);
    println!("Active users:        {}", summary.status.active);
    println!("Inactive users:      {}", summary.status.inactive);
    println!("Suspended users:     {}", summary.status.suspended);
    println!();

    println!("Analytics");
    println!("=========");
    println!(
        "Top state:           {}",
        summary.top_state.as_deref().unwrap_or("-")
    );
    println!(
        "Top language:        {}",
        summary.top_language.as_deref().unwrap_or("-")
    );
    println!("Average age:         {:.1} years", summary.average_age);
    println!("Cities covered:      {}", summary.distinct_cities);
    println!();

    println!("Status");
    for status in regdesk::record::Status::ALL {
        println!(
            "  {:<12} {:>5} ({:.1}%)",
            status.as_str(),
            summary.status.get(*status),
            summary.status.percent(*status)
        );
    }

    println!("Type");
    for kind in regdesk::record::RegistrationType::ALL {
        println!(
            "  {:<12} {:>5} ({:.1}%)",
            kind.as_str(),
            summary.types.get(*kind),
            summary.types.percent(*kind)
        );
    }

    println!("Gender");
    for gender in regdesk::record::Gender::ALL {
        println!(
            "  {:<12} {:>5} ({:.1}%)",
            gender.as_str(),
            summary.genders.get(*gender),
            summary.genders.percent(*gender)
        );
    }

    println!("Age");
    for (label, count) in summary.ages.entries() {
        println!(
            "  {:<12} {:>5} ({:.1}%)",
            label,
            count,
            stats::percentage(count, summary.ages.total())
        );
    }
    println!();

    println!("Top states");
    for (state, count) in &top_states {
        println!("  {state:<40} {count:>5}");
    }
    println!("Top languages");
    for (language, count) in &top_languages {
        println!("  {language:<40} {count:>5}");
    }
    println!();

    println!("This week vs last week");
    for (i, day) in WeeklyTrend::DAY_LABELS.iter().enumerate() {
        println!(
            "  {day}  last {:>4}  this {:>4}",
            trend.last_week[i], trend.this_week[i]
        );
    }
    Ok(())
}

fn handle_export(config: &Config, cmd: &ExportCommand) -> anyhow::Result<()> {
    let store = records(config)?;

    let mut selection: Vec<&Registration> = match (cmd.since, cmd.until) {
        (Some(since), Some(until)) => stats::in_date_range(store.records(), since, until),
        _ => store.records().iter().collect(),
    };
    if !cmd.ids.is_empty() {
        selection.retain(|r| cmd.ids.contains(&r.id));
    }
    if let (Some(since), Some(until)) = (cmd.since, cmd.until) {
        println!(
            "Found {} registrations between {since} and {until}",
            selection.len()
        );
    }

    let now = Local::now();
    let content = match cmd.format {
        ExportFormat::Json => export::to_json(&selection)?,
        ExportFormat::Csv => export::to_csv(selection.iter().copied(), &Local),
        ExportFormat::Summary | ExportFormat::Report => {
            let chosen: Vec<Registration> = selection.iter().map(|r| (*r).clone()).collect();
            let summary = ReportSummary::from_records(&chosen);
            if cmd.format == ExportFormat::Summary {
                export::summary_text(&summary, &now)
            } else {
                export::summary_html(&summary, &now)
            }
        }
    };

    let output = cmd
        .output
        .clone()
        .unwrap_or_else(|| cmd.default_file_name().into());
    if output == Path::new("-") {
        println!("{content}");
    } else {
        std::fs::write(&output, content)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!(
            "Exported {} registrations to {}",
            selection.len(),
            output.display()
        );
    }
    Ok(())
}

fn handle_login(config: &Config, cmd: &LoginCommand) -> anyhow::Result<()> {
    let mut local = local_store(config)?;
    let mut session = session(config)?;

    let username = if cmd.username.is_empty() {
        remembered_user(&local)?.unwrap_or_default()
    } else {
        cmd.username.clone()
    };

    let remember: Option<&mut dyn KeyValueStore> = if cmd.remember {
        Some(&mut local)
    } else {
        None
    };

    session.login(
        &StaticAuthenticator::from_config(&config.auth),
        &username,
        &cmd.password,
        remember,
        Utc::now(),
    )?;
    println!("Login successful! Welcome, {username}.");
    Ok(())
}

fn handle_whoami(config: &Config) -> anyhow::Result<()> {
    let session = session(config)?;
    if !session.is_authenticated()? {
        println!("Not logged in.");
        return Ok(());
    }

    let username = session.username()?.unwrap_or_default();
    match session.login_time()? {
        Some(at) => println!(
            "{username} (since {})",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        None => println!("{username}"),
    }
    Ok(())
}

fn handle_reference(cmd: &ReferenceCommand) {
    let reference = ReferenceData::builtin();

    match cmd {
        ReferenceCommand::States => {
            for state in reference.states() {
                println!("{state}");
            }
        }
        ReferenceCommand::Cities { state } => {
            for city in reference.cities(state) {
                println!("{city}");
            }
        }
        ReferenceCommand::Pins { state } => {
            for pin in reference.pin_codes(state) {
                println!("{pin}");
            }
        }
        ReferenceCommand::Areas { cities } => {
            for area in reference.areas_for(cities) {
                println!("{area}");
            }
        }
        ReferenceCommand::Languages { category } => match category {
            Some(category) => {
                for language in reference.languages_in((*category).into()) {
                    println!("{}", language.name);
                }
            }
            None => {
                for language in reference.languages() {
                    println!("{:<20} {}", language.name, language.category);
                }
            }
        },
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Dashboard]");
                println!("  Page size:          {}", config.dashboard.page_size);
                println!("  Top N:              {}", config.dashboard.top_n);
                println!("  Recent limit:       {}", config.dashboard.recent_limit);
                println!();
                println!("[Validation]");
                println!("  Max age (years):    {}", config.validation.max_age_years);
                println!("  Min name length:    {}", config.validation.min_name_length);
                println!(
                    "  Min address length: {}",
                    config.validation.min_address_length
                );
                println!();
                println!("[Auth]");
                println!("  Username:           {}", config.auth.username);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_with_database(name: &str) -> Config {
        let path: PathBuf =
            std::env::temp_dir().join(format!("regdesk_{name}_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut config = Config::default();
        config.storage.database_path = Some(path);
        config
    }

    fn stored_record(id: i64) -> Registration {
        let form = RegistrationForm {
            name: "Asha Rao".to_string(),
            date_of_birth: "2010-06-15".to_string(),
            gender: Some("female".to_string()),
            address_line1: "12 Lake Road".to_string(),
            state: "Karnataka".to_string(),
            city: "Mysore".to_string(),
            postal_code: "570001".to_string(),
            status: "active".to_string(),
            registration_type: "individual".to_string(),
            onboarding_date: "2024-06-01".to_string(),
            ..RegistrationForm::default()
        };
        Registration::from_form(form, id, Utc::now()).unwrap()
    }

    #[test]
    fn test_delete_unknown_id_is_a_no_op() {
        let config = config_with_database("delete_unknown");
        let mut store = records(&config).unwrap();
        store.append(stored_record(7));
        store.persist().unwrap();

        let cmd = DeleteCommand { ids: vec![42] };
        assert!(handle_delete(&config, &cmd).is_ok());
        assert_eq!(records(&config).unwrap().len(), 1);

        let _ = std::fs::remove_file(config.database_path());
    }

    #[test]
    fn test_delete_known_id() {
        let config = config_with_database("delete_known");
        let mut store = records(&config).unwrap();
        store.append(stored_record(7));
        store.append(stored_record(8));
        store.persist().unwrap();

        let cmd = DeleteCommand { ids: vec![7, 42] };
        handle_delete(&config, &cmd).unwrap();

        let reloaded = records(&config).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.get(8).is_some());

        let _ = std::fs::remove_file(config.database_path());
    }
}
