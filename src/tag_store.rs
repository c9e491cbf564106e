/*!
tag_store.rs - Symbolic key/value store with three scan-phase layers plus
edge memory.

Overview
========
`TagStore` is the foundation for scan-cycle semantics: it holds
`current` (committed between scans), `snapshot` (frozen at scan start),
`pending` (writes accumulated during the in-progress scan), and an edge
memory keyed by `(tag id, edge kind)` that survives across scans.

Invariants (see spec.md §4.1 / §8 P1-P4)
=========================================
- Between scans: `current` and `snapshot` agree; `pending` is empty.
- During a scan: operand reads consult `pending` first, else `snapshot`;
  never `current` directly.
- At scan end: every key in `pending` is copied into `current`. `pending`
  is NOT cleared by commit; the next scan's `clear_pending` does that.
- Edge memory keys are independent per edge kind (`rising`/`falling`).

This module does not interpret expressions or statements; it is the pure
storage layer other components build on.
*/

use std::collections::HashMap;

use crate::ir::EdgeKind;
use crate::value::TagValue;

/// Canonical tag identifier. A thin `String` wrapper kept here (rather
/// than scattering raw `String` everywhere) so call sites read clearly.
pub type TagId = String;

#[derive(Debug, Default)]
pub struct TagStore {
    current: HashMap<TagId, TagValue>,
    snapshot: HashMap<TagId, TagValue>,
    pending: HashMap<TagId, TagValue>,
    edge_memory: HashMap<(TagId, EdgeKind), bool>,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `current` and `snapshot` with an initial value for `tag`. Used
    /// before the first scan to populate inputs.
    pub fn initialize(&mut self, tag: impl Into<TagId>, value: TagValue) {
        let tag = tag.into();
        self.current.insert(tag.clone(), value.clone());
        self.snapshot.insert(tag, value);
    }

    /// Replace `snapshot` with a copy of `current`. Called at scan start.
    pub fn snapshot_tags(&mut self) {
        self.snapshot = self.current.clone();
    }

    /// Empty `pending`. Called right after `snapshot_tags`.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Read `pending[tag]` if present, else `snapshot[tag]`, else `None`.
    pub fn read_pending_or_snapshot(&self, tag: &str) -> Option<&TagValue> {
        self.pending.get(tag).or_else(|| self.snapshot.get(tag))
    }

    /// Write `pending[tag] = value`. Last write within the scan wins.
    pub fn write_pending(&mut self, tag: impl Into<TagId>, value: TagValue) {
        self.pending.insert(tag.into(), value);
    }

    /// Copy every `(k, v)` in `pending` into `current`. Does not clear
    /// `pending` — the next scan's `clear_pending` does that.
    pub fn commit_pending(&mut self) {
        for (k, v) in self.pending.iter() {
            self.current.insert(k.clone(), v.clone());
        }
    }

    /// Discard `pending` without committing it (used when a scan aborts
    /// due to a runtime error, per spec.md §7).
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }

    pub fn get_edge_memory(&self, tag: &str, kind: EdgeKind) -> bool {
        self.edge_memory
            .get(&(tag.to_string(), kind))
            .copied()
            .unwrap_or(false)
    }

    pub fn set_edge_memory(&mut self, tag: impl Into<TagId>, kind: EdgeKind, value: bool) {
        self.edge_memory.insert((tag.into(), kind), value);
    }

    /// Committed value of `tag`, if any.
    pub fn current(&self, tag: &str) -> Option<&TagValue> {
        self.current.get(tag)
    }

    /// Snapshot of every committed tag value.
    pub fn all_current(&self) -> HashMap<TagId, TagValue> {
        self.current.clone()
    }

    /// Empty all four maps.
    pub fn reset(&mut self) {
        self.current.clear();
        self.snapshot.clear();
        self.pending.clear();
        self.edge_memory.clear();
    }
}

/// Map a physical address of the form `%[IQMDB]<byte>.<bit>` to its
/// synthetic tag id: `%I0.0` -> `__addr_I0_0`. Address and tag id
/// namespaces share one map, so this is the sole translation point.
pub fn address_to_tag_id(address: &str) -> TagId {
    let mapped: String = address
        .chars()
        .map(|c| if c == '%' || c == '.' { '_' } else { c })
        .collect();
    format!("__addr{mapped}")
}
