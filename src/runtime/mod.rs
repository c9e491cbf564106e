/*!
runtime - Scan-cycle driver.

Overview
========
`Runtime` owns a loaded `Program` and its `TagStore` and drives the
five-phase scan described in spec.md §4.6:

1. Increment scan counter, record `start_time`.
2. `snapshot_tags()` then `clear_pending()`.
3. Execute every cyclic OB's networks in order, statements in order.
   Startup/interrupt OBs are reserved and not run by this driver.
4. `commit_pending()` on success; on error, `discard_pending()` instead
   and propagate the error without poisoning `scan_number`.
5. Assemble a `ScanResult` from the scan number, duration, and the
   committed tag values.

`scan` accepts an optional clock override (milliseconds) so tests can
drive timers deterministically; both the timer clock and the reported
duration share this one reading, per spec.md §4.6.
*/

pub mod clock;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PlcError, PlcResult};
use crate::exec::StatementExecutor;
use crate::ir::{validate_program, Program};
use crate::tag_store::{TagId, TagStore};
use crate::value::TagValue;

use clock::{Clock, MonotonicClock};

/// The outcome of one scan, handed to `RuntimeManager` observers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanResult {
    pub scan_number: u64,
    pub scan_duration_ms: i64,
    pub tag_values: HashMap<TagId, TagValue>,
}

pub struct Runtime {
    program: Option<Program>,
    store: TagStore,
    scan_number: u64,
    clock: Box<dyn Clock>,
}

impl Runtime {
    pub fn new() -> Self {
        Runtime {
            program: None,
            store: TagStore::new(),
            scan_number: 0,
            clock: Box::new(MonotonicClock::new()),
        }
    }

    /// Validate and install `program`, replacing any previously loaded one.
    /// Does not reset tag state — callers that want a clean slate should
    /// call `reset` first.
    pub fn load(&mut self, program: Program) -> PlcResult<()> {
        validate_program(&program)?;
        self.program = Some(program);
        Ok(())
    }

    pub fn set_tag(&mut self, tag: impl Into<TagId>, value: TagValue) {
        self.store.initialize(tag, value);
    }

    pub fn get_tag(&self, tag: &str) -> Option<TagValue> {
        self.store.current(tag).cloned()
    }

    pub fn all_tags(&self) -> HashMap<TagId, TagValue> {
        self.store.all_current()
    }

    /// Run one scan. `clock_override_ms`, when given, is used both as the
    /// timer clock reading and as the duration's start/end basis (so an
    /// overridden scan always reports zero duration — deterministic tests
    /// care about timer behavior, not wall-clock timing).
    pub fn scan(&mut self, clock_override_ms: Option<i64>) -> PlcResult<ScanResult> {
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| PlcError::validation("no program loaded"))?;

        self.scan_number += 1;
        let start_time = clock_override_ms.unwrap_or_else(|| self.clock.now_ms());

        self.store.snapshot_tags();
        self.store.clear_pending();

        let mut scan_err = None;
        'networks: for ob in program.cyclic_obs() {
            for network in &ob.networks {
                for statement in &network.statements {
                    if let Err(e) = StatementExecutor::execute(&mut self.store, statement, start_time) {
                        scan_err = Some(e);
                        break 'networks;
                    }
                }
            }
        }

        if let Some(err) = scan_err {
            self.store.discard_pending();
            tracing::error!(scan_number = self.scan_number, error = %err, "scan aborted, pending discarded");
            return Err(err);
        }

        self.store.commit_pending();
        let end_time = clock_override_ms.unwrap_or_else(|| self.clock.now_ms());
        let result = ScanResult {
            scan_number: self.scan_number,
            scan_duration_ms: end_time - start_time,
            tag_values: self.store.all_current(),
        };
        tracing::debug!(
            scan_number = result.scan_number,
            duration_ms = result.scan_duration_ms,
            "scan committed"
        );
        Ok(result)
    }

    /// Run `n` scans back to back, stopping and propagating on the first
    /// scan error.
    pub fn scan_n(&mut self, n: usize) -> PlcResult<Vec<ScanResult>> {
        let mut results = Vec::with_capacity(n);
        for _ in 0..n {
            results.push(self.scan(None)?);
        }
        Ok(results)
    }

    /// Clear all tag state and the scan counter. The loaded program, if
    /// any, is kept.
    pub fn reset(&mut self) {
        self.store.reset();
        self.scan_number = 0;
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
