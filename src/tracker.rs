//! Command handlers. The public API for reading and mutating the ledger.
//!
//! Every mutating handler runs the same template: authorize, load, apply,
//! save, confirm. Read-only handlers load and report without the gate.

use std::time::Instant;

use opentelemetry::KeyValue;
use tracing::{info, warn};

use crate::auth::{AdminGate, CallerId};
use crate::command::{Command, Invocation};
use crate::error::{Error, Result};
use crate::model::WorkerRecord;
use crate::storage::LedgerStore;
use crate::telemetry::command::{record_outcome, start_command_span};
use crate::telemetry::metrics;

/// One row of the `list` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub name: String,
    pub record: WorkerRecord,
}

/// What a successful command produced. Rendering to text lives in
/// [`crate::messages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Help,
    WorkAdded { name: String, amount: i64 },
    Paid { name: String, amount: i64 },
    DueSet { name: String, amount: i64 },
    TodayReset { workers: usize },
    /// Records ordered by total, highest first. Never empty.
    Listing(Vec<Standing>),
    /// `list` on an empty ledger.
    NoData,
    Details { name: String, record: WorkerRecord },
}

/// The command handler. Owns the store and the admin gate.
#[derive(Debug)]
pub struct Tracker {
    store: LedgerStore,
    gate: AdminGate,
}

impl Tracker {
    pub fn new(store: LedgerStore, gate: AdminGate) -> Self {
        Self { store, gate }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Handle one raw command line from `caller`.
    ///
    /// For mutating verbs the admin check runs before argument validation,
    /// so a non-admin never learns anything about argument shape.
    pub fn handle_line(&self, caller: CallerId, line: &str) -> Result<Reply> {
        let invocation = Invocation::parse(line)?;
        let verb = invocation.verb;
        self.observe(verb.as_str(), caller, || {
            if verb.is_mutating() {
                self.gate.authorize(caller)?;
            }
            let command = Command::from_invocation(&invocation)?;
            self.dispatch(caller, command)
        })
    }

    /// Handle an already-validated command.
    pub fn execute(&self, caller: CallerId, command: Command) -> Result<Reply> {
        let verb = command.verb();
        self.observe(verb.as_str(), caller, || self.dispatch(caller, command))
    }

    fn dispatch(&self, caller: CallerId, command: Command) -> Result<Reply> {
        match command {
            Command::Start => Ok(Reply::Help),
            Command::AddWork { name, amount } => self.add_work(caller, &name, amount),
            Command::Pay { name, amount } => self.pay(caller, &name, amount),
            Command::SetDue { name, amount } => self.set_due(caller, &name, amount),
            Command::ResetToday => self.reset_today(caller),
            Command::List => self.list(),
            Command::Details { name } => self.details(&name),
        }
    }

    /// Wrap one command in a span, a duration sample and a result counter.
    fn observe<F>(&self, command: &str, caller: CallerId, f: F) -> Result<Reply>
    where
        F: FnOnce() -> Result<Reply>,
    {
        let span = start_command_span(command, self.gate.is_admin(caller));
        let started = Instant::now();
        let result = span.in_scope(f);

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        record_outcome(&span, outcome);
        if let Err(Error::StorageCorrupt { path, source }) = &result {
            warn!(path = %path.display(), %source, "ledger file unreadable");
        }

        let labels = [
            KeyValue::new("command", command.to_string()),
            KeyValue::new("result", outcome),
        ];
        metrics::commands_handled().add(1, &labels);
        metrics::command_duration_ms().record(
            started.elapsed().as_secs_f64() * 1000.0,
            &[KeyValue::new("command", command.to_string())],
        );

        result
    }

    // -----------------------------------------------------------------------
    // Mutating handlers (admin only)
    // -----------------------------------------------------------------------

    /// Record work. The only handler that creates missing workers.
    pub fn add_work(&self, caller: CallerId, name: &str, amount: i64) -> Result<Reply> {
        self.gate.authorize(caller)?;
        self.store
            .update(|ledger| ledger.entry(name).add_work(amount))?;
        info!(worker = name, amount, "work added");
        Ok(Reply::WorkAdded {
            name: name.to_string(),
            amount,
        })
    }

    /// Record a payment to an existing worker.
    pub fn pay(&self, caller: CallerId, name: &str, amount: i64) -> Result<Reply> {
        self.gate.authorize(caller)?;
        self.store
            .update(|ledger| ledger.require_mut(name)?.pay(amount))?;
        info!(worker = name, amount, "payment recorded");
        Ok(Reply::Paid {
            name: name.to_string(),
            amount,
        })
    }

    /// Overwrite an existing worker's outstanding amount.
    pub fn set_due(&self, caller: CallerId, name: &str, amount: i64) -> Result<Reply> {
        self.gate.authorize(caller)?;
        self.store.update(|ledger| {
            ledger.require_mut(name)?.set_due(amount);
            Ok(())
        })?;
        info!(worker = name, amount, "due overwritten");
        Ok(Reply::DueSet {
            name: name.to_string(),
            amount,
        })
    }

    /// Zero `today` for every worker.
    pub fn reset_today(&self, caller: CallerId) -> Result<Reply> {
        self.gate.authorize(caller)?;
        let workers = self.store.update(|ledger| {
            ledger.reset_today();
            Ok(ledger.len())
        })?;
        info!(workers, "today reset");
        Ok(Reply::TodayReset { workers })
    }

    // -----------------------------------------------------------------------
    // Read-only handlers (any caller)
    // -----------------------------------------------------------------------

    pub fn list(&self) -> Result<Reply> {
        let ledger = self.store.load()?;
        if ledger.is_empty() {
            return Ok(Reply::NoData);
        }
        let rows = ledger
            .ranked()
            .into_iter()
            .map(|(name, record)| Standing {
                name: name.to_string(),
                record: *record,
            })
            .collect();
        Ok(Reply::Listing(rows))
    }

    pub fn details(&self, name: &str) -> Result<Reply> {
        let ledger = self.store.load()?;
        let record = *ledger.require(name)?;
        Ok(Reply::Details {
            name: name.to_string(),
            record,
        })
    }
}
