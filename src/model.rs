//! Core data model.
//!
//! A ledger maps worker names to their accounting record. Names are
//! case-sensitive keys; the serialized form is a plain JSON object so the
//! data file stays hand-editable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Worker Record
// ---------------------------------------------------------------------------

/// Per-worker accounting tuple.
///
/// All fields are signed: negative amounts are accepted by every command
/// and applied as given.
///
/// Missing fields read as 0. Any other key is rejected rather than dropped
/// on the next save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkerRecord {
    /// Units of work ever recorded.
    pub total: i64,
    /// Units of work recorded since the last reset.
    pub today: i64,
    /// Units of work not yet paid for. Independently overridable.
    pub due: i64,
    /// Currency paid so far.
    pub paid_amount: i64,
}

impl WorkerRecord {
    /// Record `amount` units of work: bumps total, today and due together.
    ///
    /// Leaves the record untouched if any field would overflow.
    pub fn add_work(&mut self, amount: i64) -> Result<()> {
        let total = checked(self.total, amount)?;
        let today = checked(self.today, amount)?;
        let due = checked(self.due, amount)?;
        self.total = total;
        self.today = today;
        self.due = due;
        Ok(())
    }

    /// Record a payment. Never compared against `due`.
    pub fn pay(&mut self, amount: i64) -> Result<()> {
        self.paid_amount = checked(self.paid_amount, amount)?;
        Ok(())
    }

    /// Overwrite the outstanding amount.
    pub fn set_due(&mut self, amount: i64) {
        self.due = amount;
    }
}

fn checked(current: i64, amount: i64) -> Result<i64> {
    current.checked_add(amount).ok_or(Error::AmountOutOfRange)
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// The full name -> record mapping, persisted as one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    workers: BTreeMap<String, WorkerRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn get(&self, name: &str) -> Option<&WorkerRecord> {
        self.workers.get(name)
    }

    /// Strict lookup for read paths.
    pub fn require(&self, name: &str) -> Result<&WorkerRecord> {
        self.workers
            .get(name)
            .ok_or_else(|| Error::UnknownWorker(name.to_string()))
    }

    /// Strict lookup for mutating paths. Never creates a record.
    pub fn require_mut(&mut self, name: &str) -> Result<&mut WorkerRecord> {
        self.workers
            .get_mut(name)
            .ok_or_else(|| Error::UnknownWorker(name.to_string()))
    }

    /// Get-or-create. Only the add-work path may call this.
    pub fn entry(&mut self, name: &str) -> &mut WorkerRecord {
        self.workers.entry(name.to_string()).or_default()
    }

    /// Zero every worker's `today`; nothing else changes.
    pub fn reset_today(&mut self) {
        for record in self.workers.values_mut() {
            record.today = 0;
        }
    }

    /// Records ordered by `total` descending, ties by name ascending.
    pub fn ranked(&self) -> Vec<(&str, &WorkerRecord)> {
        let mut rows: Vec<_> = self
            .workers
            .iter()
            .map(|(name, record)| (name.as_str(), record))
            .collect();
        rows.sort_by(|a, b| b.1.total.cmp(&a.1.total).then_with(|| a.0.cmp(b.0)));
        rows
    }
}
