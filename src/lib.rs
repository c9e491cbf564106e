/*!
ladder-plc - IEC 61131-3 scan-cycle Ladder Logic runtime.

Overview
========
A deterministic software PLC: a ladder-diagram (LAD) JSON front end
compiles down to a small intermediate representation (IR), which a
five-phase scan-cycle driver executes against a layered tag store.

Module map
==========
- `error`       : the crate-wide `PlcError` taxonomy.
- `value`       : `TagValue` and the timer/counter/latch instance types.
- `tag_store`   : the current/snapshot/pending/edge-memory layers.
- `ir`          : expressions, statements, networks, organization blocks.
- `eval`        : the expression evaluator.
- `instructions`: TON/TOF/TP, CTU/CTD/CTUD, SR/RS as pure functions.
- `exec`        : the statement executor.
- `compiler`    : the LAD JSON format and its lowering into IR.
- `runtime`     : the scan driver (`Runtime`) and its clock abstraction.
- `manager`     : `RuntimeManager`, the embedding façade.
*/

pub mod compiler;
pub mod error;
pub mod eval;
pub mod exec;
pub mod instructions;
pub mod ir;
pub mod manager;
pub mod runtime;
pub mod tag_store;
pub mod value;

#[cfg(test)]
mod scenarios;

pub use error::{PlcError, PlcResult};
pub use manager::RuntimeManager;
pub use runtime::{Runtime, ScanResult};
