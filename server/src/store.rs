//! Insertion-ordered, in-memory record store.
//!
//! # Design
//! A `RecordStore` is owned by the application state rather than living in a
//! module-level global, so every router built by [`crate::app`] starts from an
//! empty, isolated store. Lookups are linear scans over a `Vec`, which keeps
//! insertion order for listings.
//!
//! Ids come from a counter that only moves forward. A deleted id is never
//! handed out again, even when the store becomes empty.

/// A record that can be kept in a [`RecordStore`].
pub trait Record: Clone {
    /// Validated fields for a new record, everything except the id.
    type Draft;
    /// Partial update. Fields that are not provided leave the record as is.
    type Patch;

    fn id(&self) -> u64;

    fn from_draft(id: u64, draft: Self::Draft) -> Self;

    fn apply(&mut self, patch: Self::Patch);
}

#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    records: Vec<R>,
    next_id: u64,
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The id the next insert will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn get(&self, id: u64) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn find<P>(&self, predicate: P) -> Option<&R>
    where
        P: Fn(&R) -> bool,
    {
        self.records.iter().find(|record| predicate(record))
    }

    pub fn insert(&mut self, draft: R::Draft) -> R {
        let record = R::from_draft(self.next_id, draft);
        self.next_id += 1;
        self.records.push(record.clone());
        record
    }

    /// Apply `patch` to the record with `id` and return its new state.
    pub fn update(&mut self, id: u64, patch: R::Patch) -> Option<R> {
        let record = self.records.iter_mut().find(|record| record.id() == id)?;
        record.apply(patch);
        Some(record.clone())
    }

    pub fn remove(&mut self, id: u64) -> Option<R> {
        let index = self.records.iter().position(|record| record.id() == id)?;
        Some(self.records.remove(index))
    }
}
