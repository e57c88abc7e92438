//! Dashboard statistics.
//!
//! Every function here is pure over a slice of [`Registration`]s. The caller
//! supplies "now" or "today" so results are reproducible.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::record::{Gender, Registration, RegistrationType, Status};

/// Milliseconds in one day, the width of a trend slot.
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Age in whole years on `today` for someone born on `dob`.
///
/// One less than the year difference while the birthday has not yet been
/// reached this year. Negative for dates of birth in the future.
#[must_use]
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// `part` as a percentage of `total`, rounded to one decimal.
///
/// A zero `total` is treated as one.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(part: usize, total: usize) -> f64 {
    round_one(part as f64 / total.max(1) as f64 * 100.0)
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Registrations per account status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Active accounts.
    pub active: usize,
    /// Inactive accounts.
    pub inactive: usize,
    /// Suspended accounts.
    pub suspended: usize,
}

impl StatusCounts {
    /// Count the records by status.
    #[must_use]
    pub fn from_records(records: &[Registration]) -> Self {
        records.iter().fold(Self::default(), |mut counts, r| {
            match r.status {
                Status::Active => counts.active += 1,
                Status::Inactive => counts.inactive += 1,
                Status::Suspended => counts.suspended += 1,
            }
            counts
        })
    }

    /// Count for one status.
    #[must_use]
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Active => self.active,
            Status::Inactive => self.inactive,
            Status::Suspended => self.suspended,
        }
    }

    /// Sum over all statuses.
    #[must_use]
    pub fn total(&self) -> usize {
        self.active + self.inactive + self.suspended
    }

    /// Share of `status`, one decimal.
    #[must_use]
    pub fn percent(&self, status: Status) -> f64 {
        percentage(self.get(status), self.total())
    }
}

/// Registrations per registrant type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    /// Individuals.
    pub individual: usize,
    /// Agencies.
    pub agency: usize,
    /// Sub-agencies.
    pub subagency: usize,
}

impl TypeCounts {
    /// Count the records by type.
    #[must_use]
    pub fn from_records(records: &[Registration]) -> Self {
        records.iter().fold(Self::default(), |mut counts, r| {
            match r.registration_type {
                RegistrationType::Individual => counts.individual += 1,
                RegistrationType::Agency => counts.agency += 1,
                RegistrationType::Subagency => counts.subagency += 1,
            }
            counts
        })
    }

    /// Count for one type.
    #[must_use]
    pub fn get(&self, kind: RegistrationType) -> usize {
        match kind {
            RegistrationType::Individual => self.individual,
            RegistrationType::Agency => self.agency,
            RegistrationType::Subagency => self.subagency,
        }
    }

    /// Share of `kind`, one decimal.
    #[must_use]
    pub fn percent(&self, kind: RegistrationType) -> f64 {
        percentage(
            self.get(kind),
            self.individual + self.agency + self.subagency,
        )
    }
}

/// Registrations per gender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    /// Male registrants.
    pub male: usize,
    /// Female registrants.
    pub female: usize,
    /// Everyone else.
    pub other: usize,
}

impl GenderCounts {
    /// Count the records by gender.
    #[must_use]
    pub fn from_records(records: &[Registration]) -> Self {
        records.iter().fold(Self::default(), |mut counts, r| {
            match r.gender {
                Gender::Male => counts.male += 1,
                Gender::Female => counts.female += 1,
                Gender::Other => counts.other += 1,
            }
            counts
        })
    }

    /// Count for one gender.
    #[must_use]
    pub fn get(&self, gender: Gender) -> usize {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
            Gender::Other => self.other,
        }
    }

    /// Share of `gender`, one decimal.
    #[must_use]
    pub fn percent(&self, gender: Gender) -> f64 {
        percentage(self.get(gender), self.male + self.female + self.other)
    }
}

/// Number of records created on `today`, both in UTC.
#[must_use]
pub fn count_today(records: &[Registration], today: NaiveDate) -> usize {
    records
        .iter()
        .filter(|r| r.timestamp.date_naive() == today)
        .count()
}

/// Age distribution in the four dashboard groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgeBuckets {
    /// Ages 5 and under.
    pub up_to_5: usize,
    /// Ages 6 to 10.
    pub from_6_to_10: usize,
    /// Ages 11 to 15.
    pub from_11_to_15: usize,
    /// Ages 16 and over.
    pub from_16: usize,
}

impl AgeBuckets {
    /// Display labels, in bucket order.
    pub const LABELS: [&'static str; 4] = ["0-5", "6-10", "11-15", "16-17"];

    /// Place every record into a bucket by its age on `today`.
    #[must_use]
    pub fn from_records(records: &[Registration], today: NaiveDate) -> Self {
        records.iter().fold(Self::default(), |mut buckets, r| {
            match r.age_on(today) {
                ..=5 => buckets.up_to_5 += 1,
                6..=10 => buckets.from_6_to_10 += 1,
                11..=15 => buckets.from_11_to_15 += 1,
                _ => buckets.from_16 += 1,
            }
            buckets
        })
    }

    /// `(label, count)` pairs in bucket order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, usize); 4] {
        [
            (Self::LABELS[0], self.up_to_5),
            (Self::LABELS[1], self.from_6_to_10),
            (Self::LABELS[2], self.from_11_to_15),
            (Self::LABELS[3], self.from_16),
        ]
    }

    /// Total records bucketed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.up_to_5 + self.from_6_to_10 + self.from_11_to_15 + self.from_16
    }
}

/// Count occurrences, most frequent first.
///
/// Ties keep the order in which values first appeared.
fn tally<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Registrations per state, most frequent first.
#[must_use]
pub fn tally_states(records: &[Registration]) -> Vec<(String, usize)> {
    tally(records.iter().map(|r| r.state.as_str()))
}

/// Mentions per language across all records, most frequent first.
#[must_use]
pub fn tally_languages(records: &[Registration]) -> Vec<(String, usize)> {
    tally(
        records
            .iter()
            .flat_map(|r| r.languages.iter().map(String::as_str)),
    )
}

/// The first `n` entries of a tally.
#[must_use]
pub fn top_n(mut tally: Vec<(String, usize)>, n: usize) -> Vec<(String, usize)> {
    tally.truncate(n);
    tally
}

/// Most common state, if there are any records.
#[must_use]
pub fn top_state(records: &[Registration]) -> Option<String> {
    tally_states(records).into_iter().next().map(|(s, _)| s)
}

/// Most common language, if any record lists one.
#[must_use]
pub fn top_language(records: &[Registration]) -> Option<String> {
    tally_languages(records).into_iter().next().map(|(l, _)| l)
}

/// Mean age on `today`, one decimal. Zero for no records.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_age(records: &[Registration], today: NaiveDate) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: i64 = records.iter().map(|r| i64::from(r.age_on(today))).sum();
    round_one(total as f64 / records.len() as f64)
}

/// Number of distinct primary cities.
#[must_use]
pub fn distinct_cities(records: &[Registration]) -> usize {
    records
        .iter()
        .map(|r| r.city.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Registrations per weekday for this week and the one before.
///
/// Weeks start on Sunday at midnight in the timezone of the `now` passed to
/// [`WeeklyTrend::compute`]. Slot 0 is Sunday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeeklyTrend {
    /// Counts for the current week.
    pub this_week: [usize; 7],
    /// Counts for the previous week.
    pub last_week: [usize; 7],
}

impl WeeklyTrend {
    /// Weekday labels, slot order.
    pub const DAY_LABELS: [&'static str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

    /// Bucket records relative to the week containing `now`.
    ///
    /// Records older than last week, or after the end of this week, are
    /// ignored.
    #[must_use]
    pub fn compute<Tz: TimeZone>(records: &[Registration], now: &DateTime<Tz>) -> Self {
        let start = week_start(now).with_timezone(&Utc);
        let mut trend = Self::default();

        for record in records {
            let elapsed = (record.timestamp - start).num_milliseconds();
            let slot = elapsed.div_euclid(MILLIS_PER_DAY);
            if let Ok(i) = usize::try_from(slot) {
                if i < 7 {
                    trend.this_week[i] += 1;
                }
            } else if let Ok(i) = usize::try_from(slot + 7) {
                trend.last_week[i] += 1;
            }
        }

        trend
    }

    /// Largest count in either week, at least one.
    #[must_use]
    pub fn max(&self) -> usize {
        self.this_week
            .iter()
            .chain(&self.last_week)
            .copied()
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

/// Midnight of the most recent Sunday at or before `now`, in `now`'s zone.
#[must_use]
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();
    let sunday = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
    let midnight = sunday.and_time(NaiveTime::MIN);

    // A DST gap can swallow midnight; fall back to the UTC reading.
    tz.from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    /// Items on this page.
    pub items: &'a [T],
    /// 1-based page number.
    pub page: usize,
    /// Number of pages, at least one.
    pub total_pages: usize,
    /// Items across all pages.
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    /// Whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slice out 1-based page `page` of `size` items.
///
/// Page 0 is treated as page 1. Pages past the end are empty.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, size: usize) -> Page<'_, T> {
    let size = size.max(1);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());

    Page {
        items: &items[start..end],
        page,
        total_pages: items.len().div_ceil(size).max(1),
        total_items: items.len(),
    }
}

/// Criteria for the registrations table.
///
/// Unset or empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Exact state.
    pub state: Option<String>,
    /// Exact gender.
    pub gender: Option<Gender>,
    /// Exact status.
    pub status: Option<Status>,
}

impl RecordFilter {
    /// Whether no criteria are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        non_empty(self.name.as_deref()).is_none()
            && non_empty(self.state.as_deref()).is_none()
            && self.gender.is_none()
            && self.status.is_none()
    }

    /// Whether `record` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, record: &Registration) -> bool {
        let name = non_empty(self.name.as_deref())
            .is_none_or(|n| record.name.to_lowercase().contains(&n.to_lowercase()));
        let state = non_empty(self.state.as_deref()).is_none_or(|s| record.state == s);
        let gender = self.gender.is_none_or(|g| record.gender == g);
        let status = self.status.is_none_or(|s| record.status == s);

        name && state && gender && status
    }

    /// Matching records in collection order.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [Registration]) -> Vec<&'a Registration> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// The last `n` records, newest first.
#[must_use]
pub fn recent(records: &[Registration], n: usize) -> Vec<&Registration> {
    records.iter().rev().take(n).collect()
}

/// Records whose UTC creation date lies in `[start, end]`.
#[must_use]
pub fn in_date_range(
    records: &[Registration],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&Registration> {
    records
        .iter()
        .filter(|r| (start..=end).contains(&r.timestamp.date_naive()))
        .collect()
}

/// Everything the overview and analytics panels show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Number of records.
    pub total: usize,
    /// Records created today (UTC).
    pub today: usize,
    /// Counts per status.
    pub status: StatusCounts,
    /// Counts per registrant type.
    pub types: TypeCounts,
    /// Counts per gender.
    pub genders: GenderCounts,
    /// Age distribution.
    pub ages: AgeBuckets,
    /// Most common state.
    pub top_state: Option<String>,
    /// Most common language.
    pub top_language: Option<String>,
    /// Mean age, one decimal.
    pub average_age: f64,
    /// Distinct primary cities.
    pub distinct_cities: usize,
}

impl DashboardSummary {
    /// Summarize `records` as of `now`.
    ///
    /// Ages use the calendar date of `now` in its own zone; the today count
    /// uses the UTC date.
    #[must_use]
    pub fn compute<Tz: TimeZone>(records: &[Registration], now: &DateTime<Tz>) -> Self {
        let local_today = now.date_naive();
        let utc_today = now.with_timezone(&Utc).date_naive();

        Self {
            total: records.len(),
            today: count_today(records, utc_today),
            status: StatusCounts::from_records(records),
            types: TypeCounts::from_records(records),
            genders: GenderCounts::from_records(records),
            ages: AgeBuckets::from_records(records, local_today),
            top_state: top_state(records),
            top_language: top_language(records),
            average_age: average_age(records, local_today),
            distinct_cities: distinct_cities(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::record;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn created_at(id: i64, timestamp: DateTime<Utc>) -> Registration {
        let mut r = record(id, "Goa", Status::Active);
        r.timestamp = timestamp;
        r
    }

    #[test]
    fn test_age_before_and_on_birthday() {
        let dob = date(2010, 6, 15);
        assert_eq!(age_on(dob, date(2024, 6, 14)), 13);
        assert_eq!(age_on(dob, date(2024, 6, 15)), 14);
    }

    #[test]
    fn test_age_leap_day_birthday() {
        let dob = date(2008, 2, 29);
        assert_eq!(age_on(dob, date(2024, 2, 28)), 15);
        assert_eq!(age_on(dob, date(2024, 2, 29)), 16);
        assert_eq!(age_on(dob, date(2023, 3, 1)), 15);
    }

    #[test]
    fn test_age_future_dob_is_negative() {
        assert_eq!(age_on(date(2025, 1, 1), date(2024, 6, 1)), -1);
    }

    #[test]
    fn test_percentage() {
        assert!((percentage(2, 3) - 66.7).abs() < f64::EPSILON);
        assert!((percentage(1, 3) - 33.3).abs() < f64::EPSILON);
        assert!((percentage(0, 0)).abs() < f64::EPSILON);
        assert!((percentage(3, 0) - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_status_counts() {
        let records = vec![
            record(1, "Goa", Status::Active),
            record(2, "Goa", Status::Active),
            record(3, "Goa", Status::Inactive),
        ];
        let counts = StatusCounts::from_records(&records);

        assert_eq!(
            counts,
            StatusCounts {
                active: 2,
                inactive: 1,
                suspended: 0
            }
        );
        assert_eq!(counts.total(), 3);
        assert!((counts.percent(Status::Active) - 66.7).abs() < f64::EPSILON);
        assert!((counts.percent(Status::Suspended)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_status_counts_empty() {
        let counts = StatusCounts::from_records(&[]);
        assert_eq!(counts.total(), 0);
        assert!((counts.percent(Status::Active)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_type_and_gender_counts() {
        let mut a = record(1, "Goa", Status::Active);
        a.registration_type = RegistrationType::Agency;
        a.gender = Gender::Female;
        let b = record(2, "Goa", Status::Active);

        let types = TypeCounts::from_records(&[a.clone(), b.clone()]);
        assert_eq!(types.get(RegistrationType::Agency), 1);
        assert_eq!(types.get(RegistrationType::Individual), 1);
        assert!((types.percent(RegistrationType::Agency) - 50.0).abs() < f64::EPSILON);

        let genders = GenderCounts::from_records(&[a, b]);
        assert_eq!(genders.female, 1);
        assert_eq!(genders.male, 1);
        assert_eq!(genders.other, 0);
    }

    #[test]
    fn test_count_today_uses_utc_date() {
        let records = vec![
            created_at(1, at(2024, 6, 14, 0, 0, 0)),
            created_at(2, at(2024, 6, 14, 23, 59, 59)),
            created_at(3, at(2024, 6, 13, 23, 59, 59)),
        ];
        assert_eq!(count_today(&records, date(2024, 6, 14)), 2);
    }

    #[test]
    fn test_age_buckets() {
        let today = date(2024, 6, 14);
        let with_dob = |id, dob| {
            let mut r = record(id, "Goa", Status::Active);
            r.date_of_birth = dob;
            r
        };
        let records = vec![
            with_dob(1, date(2019, 6, 14)), // 5
            with_dob(2, date(2018, 6, 14)), // 6
            with_dob(3, date(2014, 6, 14)), // 10
            with_dob(4, date(2009, 6, 14)), // 15
            with_dob(5, date(2008, 6, 14)), // 16
        ];

        let buckets = AgeBuckets::from_records(&records, today);
        assert_eq!(
            buckets.entries(),
            [("0-5", 1), ("6-10", 2), ("11-15", 1), ("16-17", 1)]
        );
        assert_eq!(buckets.total(), 5);
    }

    #[test]
    fn test_tally_tie_keeps_first_appearance() {
        let records = vec![
            record(1, "Goa", Status::Active),
            record(2, "Delhi", Status::Active),
        ];
        let tally = tally_states(&records);
        assert_eq!(tally[0].0, "Goa");
        assert_eq!(tally[1].0, "Delhi");
        assert_eq!(top_state(&records).as_deref(), Some("Goa"));
    }

    #[test]
    fn test_tally_orders_by_count() {
        let records = vec![
            record(1, "Goa", Status::Active),
            record(2, "Delhi", Status::Active),
            record(3, "Kerala", Status::Active),
            record(4, "Kerala", Status::Active),
        ];
        let tally = tally_states(&records);
        assert_eq!(
            tally,
            vec![
                ("Kerala".to_string(), 2),
                ("Goa".to_string(), 1),
                ("Delhi".to_string(), 1)
            ]
        );
        assert_eq!(top_n(tally, 2).len(), 2);
    }

    #[test]
    fn test_tally_languages() {
        let mut a = record(1, "Goa", Status::Active);
        a.languages = vec!["Hindi".to_string(), "Konkani".to_string()];
        let mut b = record(2, "Goa", Status::Active);
        b.languages = vec!["Konkani".to_string()];

        assert_eq!(top_language(&[a.clone(), b.clone()]).as_deref(), Some("Konkani"));
        assert_eq!(tally_languages(&[a, b]).len(), 2);
        assert_eq!(top_language(&[]), None);
    }

    #[test]
    fn test_average_age() {
        let today = date(2024, 6, 14);
        let mut a = record(1, "Goa", Status::Active);
        a.date_of_birth = date(2010, 6, 14); // 14
        let mut b = record(2, "Goa", Status::Active);
        b.date_of_birth = date(2011, 6, 14); // 13
        let mut c = record(3, "Goa", Status::Active);
        c.date_of_birth = date(2011, 6, 14); // 13

        assert!((average_age(&[a, b, c], today) - 13.3).abs() < f64::EPSILON);
        assert!((average_age(&[], today)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distinct_cities() {
        let mut a = record(1, "Goa", Status::Active);
        a.city = "Panaji".to_string();
        let mut b = record(2, "Goa", Status::Active);
        b.city = "Panaji".to_string();
        let c = record(3, "Goa", Status::Active);

        assert_eq!(distinct_cities(&[a, b, c]), 2);
    }

    #[test]
    fn test_week_start_is_sunday_midnight() {
        // Wednesday
        let now = at(2024, 6, 12, 10, 30, 0);
        assert_eq!(week_start(&now), at(2024, 6, 9, 0, 0, 0));

        // Sunday itself
        let sunday = at(2024, 6, 9, 0, 0, 1);
        assert_eq!(week_start(&sunday), at(2024, 6, 9, 0, 0, 0));
    }

    #[test]
    fn test_week_start_in_offset_zone() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        // Sunday 02:00 in IST, still Saturday in UTC
        let now = ist.with_ymd_and_hms(2024, 6, 9, 2, 0, 0).unwrap();
        let start = week_start(&now);

        assert_eq!(start, ist.with_ymd_and_hms(2024, 6, 9, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_weekly_trend_boundaries() {
        let now = at(2024, 6, 12, 10, 0, 0);
        let records = vec![
            created_at(1, at(2024, 6, 9, 0, 0, 0)),    // this week, Sun
            created_at(2, at(2024, 6, 8, 23, 59, 59)), // last week, Sat
            created_at(3, at(2024, 6, 2, 0, 0, 0)),    // last week, Sun
            created_at(4, at(2024, 6, 1, 23, 59, 59)), // too old
            created_at(5, at(2024, 6, 12, 9, 0, 0)),   // this week, Wed
            created_at(6, at(2024, 6, 16, 0, 0, 0)),   // next week
        ];

        let trend = WeeklyTrend::compute(&records, &now);
        assert_eq!(trend.this_week, [1, 0, 0, 1, 0, 0, 0]);
        assert_eq!(trend.last_week, [1, 0, 0, 0, 0, 0, 1]);
        assert_eq!(trend.max(), 1);
    }

    #[test]
    fn test_weekly_trend_empty() {
        let trend = WeeklyTrend::compute(&[], &at(2024, 6, 12, 0, 0, 0));
        assert_eq!(trend, WeeklyTrend::default());
        assert_eq!(trend.max(), 1);
    }

    #[test]
    fn test_paginate_last_partial_page() {
        let items: Vec<u32> = (0..25).collect();
        let page = paginate(&items, 3, 10);

        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0], 20);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 25);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_paginate_edges() {
        let items: Vec<u32> = (0..25).collect();

        let first = paginate(&items, 0, 10);
        assert_eq!(first.page, 1);
        assert_eq!(first.items.len(), 10);

        let past_end = paginate(&items, 9, 10);
        assert!(past_end.items.is_empty());

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_filter_matches() {
        let mut a = record(1, "Goa", Status::Active);
        a.name = "Asha Rao".to_string();
        a.gender = Gender::Female;
        let mut b = record(2, "Delhi", Status::Suspended);
        b.name = "Ravi Kumar".to_string();

        let records = vec![a, b];

        let by_name = RecordFilter {
            name: Some("RAO".to_string()),
            ..RecordFilter::default()
        };
        assert_eq!(by_name.apply(&records).len(), 1);
        assert_eq!(by_name.apply(&records)[0].id, 1);

        let by_status = RecordFilter {
            status: Some(Status::Suspended),
            state: Some("Delhi".to_string()),
            ..RecordFilter::default()
        };
        assert_eq!(by_status.apply(&records)[0].id, 2);

        let by_gender = RecordFilter {
            gender: Some(Gender::Other),
            ..RecordFilter::default()
        };
        assert!(by_gender.apply(&records).is_empty());
    }

    #[test]
    fn test_filter_empty_criteria_match_all() {
        let records = vec![
            record(1, "Goa", Status::Active),
            record(2, "Delhi", Status::Inactive),
        ];
        let filter = RecordFilter {
            name: Some(String::new()),
            state: Some(String::new()),
            ..RecordFilter::default()
        };

        assert!(filter.is_empty());
        assert_eq!(filter.apply(&records).len(), 2);
    }

    #[test]
    fn test_recent_newest_first() {
        let records: Vec<_> = (1..=12).map(|id| record(id, "Goa", Status::Active)).collect();
        let latest = recent(&records, 10);

        assert_eq!(latest.len(), 10);
        assert_eq!(latest[0].id, 12);
        assert_eq!(latest[9].id, 3);
        assert_eq!(recent(&records[..2], 10).len(), 2);
    }

    #[test]
    fn test_in_date_range_inclusive() {
        let records = vec![
            created_at(1, at(2024, 6, 1, 0, 0, 0)),
            created_at(2, at(2024, 6, 10, 12, 0, 0)),
            created_at(3, at(2024, 6, 30, 23, 59, 59)),
            created_at(4, at(2024, 7, 1, 0, 0, 0)),
        ];
        let found = in_date_range(&records, date(2024, 6, 1), date(2024, 6, 30));

        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_dashboard_summary() {
        let mut a = created_at(1, at(2024, 6, 14, 9, 0, 0));
        a.languages = vec!["Hindi".to_string()];
        let mut b = created_at(2, at(2024, 6, 13, 9, 0, 0));
        b.status = Status::Inactive;
        b.state = "Delhi".to_string();

        let summary = DashboardSummary::compute(&[a, b], &at(2024, 6, 14, 12, 0, 0));
        assert_eq!(summary.total, 2);
        assert_eq!(summary.today, 1);
        assert_eq!(summary.status.active, 1);
        assert_eq!(summary.status.inactive, 1);
        assert_eq!(summary.top_state.as_deref(), Some("Goa"));
        assert_eq!(summary.top_language.as_deref(), Some("Hindi"));
        assert_eq!(summary.distinct_cities, 1);
        assert!((summary.average_age - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dashboard_summary_empty() {
        let summary = DashboardSummary::compute(&[], &at(2024, 6, 14, 12, 0, 0));
        assert_eq!(summary.total, 0);
        assert!(summary.top_state.is_none());
        assert!((summary.average_age).abs() < f64::EPSILON);
    }
}
