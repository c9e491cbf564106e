/*!
instructions - Function-block call dispatch.

Overview
========
`call` is the single entry point `exec::StatementExecutor` uses for
`Statement::Call`. It resolves the instance's current value (constructing
a fresh instance of the appropriate kind on first use), evaluates the
named inputs the caller already resolved to `TagValue`s, invokes the
matching pure primitive (timer/counter/latch), and returns the new
instance value plus a map of named outputs to write back.

Function name -> family:
  TON, TOF, TP          -> timer
  CTU, CTD, CTUD        -> counter
  SR, RS                -> latch
Anything else is `UnsupportedCall`.
*/

pub mod counter;
pub mod latch;
pub mod timer;

use std::collections::BTreeMap;

use crate::error::{PlcError, PlcResult};
use crate::value::{CounterInstance, CounterKind, LatchInstance, LatchKind, TagValue, TimerInstance, TimerKind};

fn input_bool(inputs: &BTreeMap<String, TagValue>, name: &str) -> bool {
    inputs.get(name).map(TagValue::to_bool).unwrap_or(false)
}

fn input_i64(inputs: &BTreeMap<String, TagValue>, name: &str) -> i64 {
    inputs.get(name).map(TagValue::to_number).unwrap_or(0.0) as i64
}

fn input_i32(inputs: &BTreeMap<String, TagValue>, name: &str) -> i32 {
    inputs.get(name).map(TagValue::to_number).unwrap_or(0.0) as i32
}

/// Invoke the function-block primitive named `function`.
///
/// `old` is the instance's current pending-or-snapshot value (absent on
/// first call). `now` is the scan's clock reading. Returns the new
/// instance value and the named outputs to write to their operands.
pub fn call(
    function: &str,
    old: Option<&TagValue>,
    inputs: &BTreeMap<String, TagValue>,
    now: i64,
    statement_id: &str,
) -> PlcResult<(TagValue, BTreeMap<String, TagValue>)> {
    match function {
        "TON" | "TOF" | "TP" => {
            let kind = match function {
                "TON" => TimerKind::Ton,
                "TOF" => TimerKind::Tof,
                _ => TimerKind::Tp,
            };
            let current = match old {
                Some(TagValue::Timer(t)) => *t,
                _ => TimerInstance::new(kind),
            };
            let input = input_bool(inputs, "IN");
            let preset_ms = input_i64(inputs, "PT");
            let next = match kind {
                TimerKind::Ton => timer::ton(&current, input, preset_ms, now),
                TimerKind::Tof => timer::tof(&current, input, preset_ms, now),
                TimerKind::Tp => timer::tp(&current, input, preset_ms, now),
            };
            let mut outputs = BTreeMap::new();
            outputs.insert("Q".to_string(), TagValue::Bool(next.output));
            outputs.insert("ET".to_string(), TagValue::Time(next.elapsed_ms));
            Ok((TagValue::Timer(next), outputs))
        }
        "CTU" | "CTD" | "CTUD" => {
            let kind = match function {
                "CTU" => CounterKind::Ctu,
                "CTD" => CounterKind::Ctd,
                _ => CounterKind::Ctud,
            };
            let current = match old {
                Some(TagValue::Counter(c)) => *c,
                _ => CounterInstance::new(kind),
            };
            let pv = input_i32(inputs, "PV");
            let mut outputs = BTreeMap::new();
            let next = match kind {
                CounterKind::Ctu => {
                    let cu = input_bool(inputs, "CU");
                    let r = input_bool(inputs, "R");
                    let next = counter::ctu(&current, cu, r, pv);
                    outputs.insert("Q".to_string(), TagValue::Bool(next.q));
                    next
                }
                CounterKind::Ctd => {
                    let cd = input_bool(inputs, "CD");
                    let ld = input_bool(inputs, "LD");
                    let next = counter::ctd(&current, cd, ld, pv);
                    outputs.insert("Q".to_string(), TagValue::Bool(next.q));
                    next
                }
                CounterKind::Ctud => {
                    let cu = input_bool(inputs, "CU");
                    let cd = input_bool(inputs, "CD");
                    let r = input_bool(inputs, "R");
                    let ld = input_bool(inputs, "LD");
                    let next = counter::ctud(&current, cu, cd, r, ld, pv);
                    outputs.insert("QU".to_string(), TagValue::Bool(next.qu));
                    outputs.insert("QD".to_string(), TagValue::Bool(next.qd));
                    next
                }
            };
            outputs.insert("CV".to_string(), TagValue::Int(next.current as i64));
            Ok((TagValue::Counter(next), outputs))
        }
        "SR" | "RS" => {
            let kind = if function == "SR" { LatchKind::Sr } else { LatchKind::Rs };
            let current = match old {
                Some(TagValue::Latch(l)) => *l,
                _ => LatchInstance::new(kind),
            };
            let s = input_bool(inputs, "S");
            let r = input_bool(inputs, "R");
            let next = if kind == LatchKind::Sr {
                latch::sr(&current, s, r)
            } else {
                latch::rs(&current, s, r)
            };
            let mut outputs = BTreeMap::new();
            outputs.insert("Q".to_string(), TagValue::Bool(next.q));
            Ok((TagValue::Latch(next), outputs))
        }
        other => Err(PlcError::UnsupportedCall {
            name: other.to_string(),
            statement_id: statement_id.to_string(),
        }),
    }
}
