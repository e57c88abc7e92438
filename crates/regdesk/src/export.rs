//! Exporters for the registrations table and summary reports.

use std::fmt::{Display, Write as _};

use chrono::{DateTime, Datelike, TimeZone};
use serde::Serialize;

use crate::error::Result;
use crate::record::Registration;
use crate::stats::{GenderCounts, StatusCounts};

/// Header row of the CSV export.
pub const CSV_HEADER: &str = "ID,Name,DOB,Gender,State,City,Status,Type,Created Date";

/// Render records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Render records as CSV.
///
/// Name, state, and city are quoted. The created date is the record
/// timestamp as `M/D/YYYY` in `tz`.
pub fn to_csv<'a, Tz: TimeZone>(
    records: impl IntoIterator<Item = &'a Registration>,
    tz: &Tz,
) -> String {
    let mut out = String::from(CSV_HEADER);

    for r in records {
        let created = r.timestamp.with_timezone(tz);
        let _ = write!(
            out,
            "\n{},{},{},{},{},{},{},{},{}/{}/{}",
            r.id,
            quote(&r.name),
            r.date_of_birth.format(crate::record::DATE_FORMAT),
            r.gender,
            quote(&r.state),
            quote(&r.city),
            r.status,
            r.registration_type,
            created.month(),
            created.day(),
            created.year(),
        );
    }

    out
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Figures shown in the summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Number of records.
    pub total: usize,
    /// Counts per status.
    pub status: StatusCounts,
    /// Counts per gender.
    pub genders: GenderCounts,
}

impl ReportSummary {
    /// Summarize `records`.
    #[must_use]
    pub fn from_records(records: &[Registration]) -> Self {
        Self {
            total: records.len(),
            status: StatusCounts::from_records(records),
            genders: GenderCounts::from_records(records),
        }
    }
}

fn generated_at<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Plain-text summary report.
pub fn summary_text<Tz: TimeZone>(summary: &ReportSummary, generated: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!(
        "REGISTRATION SUMMARY REPORT
============================

Generated: {generated}

OVERALL STATISTICS
------------------
Total Registrations: {total}
Active Users: {active}
Inactive Users: {inactive}
Suspended Users: {suspended}

GENDER DISTRIBUTION
-------------------
Male: {male}
Female: {female}
Other: {other}

============================
End of Report
",
        generated = generated_at(generated),
        total = summary.total,
        active = summary.status.active,
        inactive = summary.status.inactive,
        suspended = summary.status.suspended,
        male = summary.genders.male,
        female = summary.genders.female,
        other = summary.genders.other,
    )
}

/// HTML summary report that word processors open as a document.
pub fn summary_html<Tz: TimeZone>(summary: &ReportSummary, generated: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let row = |label: &str, value: usize| format!("<tr><td>{label}</td><td>{value}</td></tr>\n");

    let mut out = String::from(
        "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
         xmlns:w='urn:schemas-microsoft-com:office:word'>\n\
         <head><meta charset='utf-8'><title>Summary Report</title></head>\n\
         <body>\n\
         <h1>Registration Summary Report</h1>\n",
    );
    let _ = writeln!(out, "<p>Generated: {}</p>", generated_at(generated));

    out.push_str("<h2>Overall Statistics</h2>\n<table border=\"1\" cellpadding=\"10\">\n");
    out.push_str(&row("Total Registrations", summary.total));
    out.push_str(&row("Active Users", summary.status.active));
    out.push_str(&row("Inactive Users", summary.status.inactive));
    out.push_str(&row("Suspended Users", summary.status.suspended));
    out.push_str("</table>\n");

    out.push_str("<h2>Gender Distribution</h2>\n<table border=\"1\" cellpadding=\"10\">\n");
    out.push_str(&row("Male", summary.genders.male));
    out.push_str(&row("Female", summary.genders.female));
    out.push_str(&row("Other", summary.genders.other));
    out.push_str("</table>\n</body>\n</html>\n");

    out
}
