//! Storage layer for regdesk.
//!
//! The record collection is persisted as one JSON array under
//! [`REGISTRATION_DATA_KEY`] in a [`KeyValueStore`]. [`RecordStore`] owns the
//! in-memory copy and writes the whole collection back on [`persist`].
//! Entries that do not parse as a [`Registration`] are kept aside and written
//! back untouched.
//!
//! [`persist`]: RecordStore::persist

pub mod backend;
pub mod schema;

pub use backend::{KeyValueStore, MemoryStore, Scope, SqliteStore};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{Registration, RegistrationForm};
use crate::reference::ReferenceData;
use crate::validation::{check_references, FormValidator};

/// Key holding the serialized record collection.
pub const REGISTRATION_DATA_KEY: &str = "registrationData";

/// The ordered collection of registrations and its backing store.
///
/// Records are kept in insertion order. Mutations only touch memory until
/// [`RecordStore::persist`] is called.
#[derive(Debug)]
pub struct RecordStore<S> {
    backend: S,
    records: Vec<Registration>,
    unreadable: Vec<Value>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Wrap `backend` with an empty collection. Nothing is read.
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            records: Vec::new(),
            unreadable: Vec::new(),
        }
    }

    /// Wrap `backend` and load whatever it holds.
    pub fn open(backend: S) -> Self {
        let mut store = Self::new(backend);
        store.load();
        store
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// Missing, unreadable, or non-array data leaves the collection empty.
    /// Array entries that are not valid registrations are skipped but kept
    /// for [`RecordStore::persist`]. Returns the number of records loaded.
    pub fn load(&mut self) -> usize {
        self.records.clear();
        self.unreadable.clear();

        let entries = match self.backend.get(REGISTRATION_DATA_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Value>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Discarding malformed {}: {}", REGISTRATION_DATA_KEY, e);
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No {} stored yet", REGISTRATION_DATA_KEY);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read {}: {}", REGISTRATION_DATA_KEY, e);
                Vec::new()
            }
        };

        for (index, entry) in entries.into_iter().enumerate() {
            match Registration::deserialize(&entry) {
                Ok(record) => self.records.push(record),
                Err(e) => {
                    warn!("Skipping unreadable registration at index {}: {}", index, e);
                    self.unreadable.push(entry);
                }
            }
        }

        debug!(
            "Loaded {} registrations ({} unreadable)",
            self.records.len(),
            self.unreadable.len()
        );
        self.records.len()
    }

    /// Write the full collection back to the backend.
    ///
    /// Unreadable entries found by the last load follow the records.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn persist(&mut self) -> Result<()> {
        let mut entries = self
            .records
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<Value>>>()?;
        entries.extend(self.unreadable.iter().cloned());

        let raw = serde_json::to_string(&entries)?;
        self.backend.set(REGISTRATION_DATA_KEY, &raw)?;
        info!("Persisted {} registrations", self.records.len());
        Ok(())
    }

    /// Number of stored entries skipped by the last load.
    #[must_use]
    pub fn unreadable_count(&self) -> usize {
        self.unreadable.len()
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Registration] {
        &self.records
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Registration> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The id a record created at `now` would get.
    ///
    /// Ids are Unix milliseconds, bumped past the last id when the clock has
    /// not advanced.
    #[must_use]
    pub fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let millis = now.timestamp_millis();
        self.records
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(millis, |last| millis.max(last.saturating_add(1)))
    }

    /// Add a record at the end of the collection. Not persisted.
    pub fn append(&mut self, record: Registration) {
        self.records.push(record);
    }

    /// Remove the record with `id`. Not persisted.
    ///
    /// Returns whether a record was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        before != self.records.len()
    }

    /// Remove every record whose id is in `ids`. Not persisted.
    ///
    /// Returns the number of records removed.
    pub fn remove_many(&mut self, ids: &[i64]) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&r.id));
        before - self.records.len()
    }

    /// Validate `form`, store it as a new record, and persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every failing field, or a
    /// storage error if persisting fails. The record stays in memory when
    /// only the persist step fails.
    pub fn register(
        &mut self,
        form: RegistrationForm,
        validator: &FormValidator,
        reference: &ReferenceData,
        now: DateTime<Utc>,
    ) -> Result<&Registration> {
        let mut report = validator.validate_form(&form);
        report.merge(check_references(&form, reference));
        if !report.is_valid() {
            debug!("Rejected registration with {} errors", report.len());
            return Err(Error::Validation(report));
        }

        let id = self.next_id(now);
        let timestamp = self.records.last().map_or(now, |r| r.timestamp.max(now));
        let record = Registration::from_form(form, id, timestamp)?;

        self.append(record);
        self.persist()?;
        info!("Registered record {}", id);

        self.get(id).ok_or_else(|| Error::not_found(id))
    }

    /// Borrow the backend.
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Give back the backend.
    pub fn into_backend(self) -> S {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;
    use crate::record::fixtures::{record, valid_form};
    use crate::record::Status;
    use crate::validation::{Field, FieldError};
    use chrono::{NaiveDate, TimeZone};

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::internal("unreadable"))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::internal("read only"))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(Error::internal("read only"))
        }
    }

    fn validator() -> FormValidator {
        FormValidator::new(
            ValidationConfig::default(),
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 14, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_load_absent_is_empty() {
        let store = RecordStore::open(MemoryStore::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        crate::logging::init_test_logging();

        let mut backend = MemoryStore::new();
        backend.set(REGISTRATION_DATA_KEY, "{not json").unwrap();

        let store = RecordStore::open(backend);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let mut backend = MemoryStore::new();
        backend
            .set(REGISTRATION_DATA_KEY, r#"[{"id": 1, "name": "x"}]"#)
            .unwrap();

        let store = RecordStore::open(backend);
        assert_eq!(store.len(), 0);
        assert_eq!(store.unreadable_count(), 1);
    }

    #[test]
    fn test_load_keeps_readable_records_and_preserves_the_rest() {
        crate::logging::init_test_logging();

        let mut bad = serde_json::to_value(record(2, "Goa", Status::Active)).unwrap();
        bad["status"] = Value::from("pending");
        let good = serde_json::to_value(record(1, "Delhi", Status::Active)).unwrap();

        let mut backend = MemoryStore::new();
        backend
            .set(
                REGISTRATION_DATA_KEY,
                &serde_json::to_string(&vec![good, bad.clone()]).unwrap(),
            )
            .unwrap();

        let mut store = RecordStore::open(backend);
        assert_eq!(store.len(), 1);
        assert_eq!(store.unreadable_count(), 1);
        assert!(store.get(1).is_some());

        store
            .register(valid_form(), &validator(), &ReferenceData::builtin(), now())
            .unwrap();

        let raw = store.backend().get(REGISTRATION_DATA_KEY).unwrap().unwrap();
        let stored: Vec<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0]["id"], Value::from(1));
        assert_eq!(stored[1]["id"], Value::from(now().timestamp_millis()));
        assert_eq!(stored[2], bad);

        let reloaded = RecordStore::open(store.into_backend());
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.unreadable_count(), 1);
    }

    #[test]
    fn test_load_unreadable_is_empty() {
        let mut store = RecordStore::new(ReadOnlyStore);
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_persist_load_round_trip() {
        let mut store = RecordStore::new(MemoryStore::new());
        store.append(record(3, "Goa", Status::Active));
        store.append(record(1, "Delhi", Status::Inactive));
        store.append(record(2, "Kerala", Status::Suspended));
        store.persist().unwrap();

        let reloaded = RecordStore::open(store.into_backend());
        let ids: Vec<i64> = reloaded.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(reloaded.get(1), Some(&record(1, "Delhi", Status::Inactive)));
    }

    #[test]
    fn test_persist_round_trip_through_sqlite() {
        let backend = SqliteStore::open_in_memory(Scope::Local).unwrap();
        let mut store = RecordStore::new(backend);
        store.append(record(7, "Goa", Status::Active));
        store.persist().unwrap();

        store.load();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0], record(7, "Goa", Status::Active));
    }

    #[test]
    fn test_persist_failure_propagates() {
        let mut store = RecordStore::new(ReadOnlyStore);
        store.append(record(1, "Goa", Status::Active));
        assert!(store.persist().is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut store = RecordStore::new(MemoryStore::new());
        store.append(record(1, "Goa", Status::Active));
        store.append(record(2, "Goa", Status::Active));

        assert!(store.remove(1));
        assert!(!store.remove(1));
        assert_eq!(store.len(), 1);
        assert!(store.get(2).is_some());
    }

    #[test]
    fn test_remove_many() {
        let mut store = RecordStore::new(MemoryStore::new());
        for id in 1..=4 {
            store.append(record(id, "Goa", Status::Active));
        }

        assert_eq!(store.remove_many(&[1, 3, 99]), 2);
        let ids: Vec<i64> = store.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_next_id_is_unique() {
        let mut store = RecordStore::new(MemoryStore::new());
        let now = now();
        assert_eq!(store.next_id(now), now.timestamp_millis());

        store.append(record(now.timestamp_millis(), "Goa", Status::Active));
        assert_eq!(store.next_id(now), now.timestamp_millis() + 1);
    }

    #[test]
    fn test_register_valid_form() {
        let mut store = RecordStore::new(MemoryStore::new());
        let reference = ReferenceData::builtin();

        let registered = store
            .register(valid_form(), &validator(), &reference, now())
            .unwrap();
        assert_eq!(registered.id, now().timestamp_millis());
        assert_eq!(registered.name, "Asha Rao");
        assert_eq!(registered.timestamp, now());

        let reloaded = RecordStore::open(store.into_backend());
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_register_twice_same_instant() {
        let mut store = RecordStore::new(MemoryStore::new());
        let reference = ReferenceData::builtin();

        let first = store
            .register(valid_form(), &validator(), &reference, now())
            .unwrap()
            .id;
        let second = store
            .register(valid_form(), &validator(), &reference, now())
            .unwrap()
            .id;
        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_register_invalid_form() {
        let mut store = RecordStore::new(MemoryStore::new());
        let reference = ReferenceData::builtin();
        let mut form = valid_form();
        form.postal_code = "12345".to_string();

        let err = store
            .register(form, &validator(), &reference, now())
            .unwrap_err();
        let report = err.validation_report().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.get(Field::PostalCode),
            Some(&FieldError::PostalCodeFormat)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_register_unknown_city() {
        let mut store = RecordStore::new(MemoryStore::new());
        let reference = ReferenceData::builtin();
        let mut form = valid_form();
        form.city = "Atlantis".to_string();

        let err = store
            .register(form, &validator(), &reference, now())
            .unwrap_err();
        assert!(err.is_validation_error());
        assert!(err.validation_report().unwrap().get(Field::City).is_some());
    }

    #[test]
    fn test_register_persist_failure() {
        let mut store = RecordStore::new(ReadOnlyStore);
        let reference = ReferenceData::builtin();

        let result = store.register(valid_form(), &validator(), &reference, now());
        assert!(result.is_err());
        assert!(!result.unwrap_err().is_validation_error());
    }
}
