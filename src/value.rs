/*!
value.rs - Dynamic tag value union and the coercion rules used by the
expression evaluator.

Overview
========
A tag's value is one of: boolean, integer, real, time (milliseconds as an
integer), or a structured instance value (timer, counter, latch). Internal
numeric storage does not distinguish INT/DINT/REAL (a single `f64` covers
both, per the design note in spec.md §9); `Time` is kept as a separate
variant because timer semantics operate on it directly. The one place the
number is NOT allowed to be a plain float is `Counter::cv`, which must be
representable exactly across [-32768, 32767] — it is stored as `i32`.

Serialization
=============
`TagValue` derives `Serialize`/`Deserialize` with an internally tagged
`"type"` discriminator so the same encoder/decoder serves both watch
snapshots and program literals (spec.md §9 design note).
*/

use serde::{Deserialize, Serialize};

pub const COUNTER_MIN: i32 = -32768;
pub const COUNTER_MAX: i32 = 32767;

/// Timer function block kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    #[serde(rename = "TON")]
    Ton,
    #[serde(rename = "TOF")]
    Tof,
    #[serde(rename = "TP")]
    Tp,
}

/// Timer instance state, created lazily on first call with a given
/// instance tag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimerInstance {
    pub kind: TimerKind,
    #[serde(rename = "IN")]
    pub input: bool,
    #[serde(rename = "PT")]
    pub preset_ms: i64,
    #[serde(rename = "Q")]
    pub output: bool,
    #[serde(rename = "ET")]
    pub elapsed_ms: i64,
    /// Internal: wall-clock timestamp (ms) the current timing run started.
    pub start_time: Option<i64>,
    /// Internal: TP one-shot guard — true while a pulse is in progress.
    pub triggered: bool,
}

impl TimerInstance {
    pub fn new(kind: TimerKind) -> Self {
        TimerInstance {
            kind,
            input: false,
            preset_ms: 0,
            output: false,
            elapsed_ms: 0,
            start_time: None,
            triggered: false,
        }
    }
}

/// Counter function block kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterKind {
    #[serde(rename = "CTU")]
    Ctu,
    #[serde(rename = "CTD")]
    Ctd,
    #[serde(rename = "CTUD")]
    Ctud,
}

/// Counter instance state, created lazily on first call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterInstance {
    pub kind: CounterKind,
    #[serde(rename = "PV")]
    pub preset: i32,
    #[serde(rename = "CV")]
    pub current: i32,
    #[serde(rename = "Q")]
    pub q: bool,
    #[serde(rename = "QU")]
    pub qu: bool,
    #[serde(rename = "QD")]
    pub qd: bool,
    /// Previous-scan value of CU, for edge detection.
    pub prev_cu: bool,
    /// Previous-scan value of CD, for edge detection.
    pub prev_cd: bool,
}

impl CounterInstance {
    pub fn new(kind: CounterKind) -> Self {
        CounterInstance {
            kind,
            preset: 0,
            current: 0,
            q: false,
            qu: false,
            qd: false,
            prev_cu: false,
            prev_cd: false,
        }
    }
}

/// Bistable latch function block kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatchKind {
    #[serde(rename = "SR")]
    Sr,
    #[serde(rename = "RS")]
    Rs,
}

/// Latch instance state, created lazily on first call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatchInstance {
    pub kind: LatchKind,
    #[serde(rename = "Q")]
    pub q: bool,
}

impl LatchInstance {
    pub fn new(kind: LatchKind) -> Self {
        LatchInstance { kind, q: false }
    }
}

/// The dynamic value a tag can hold.
///
/// Adjacently tagged (`type` + `value`) rather than internally tagged:
/// serde cannot serialize an internally tagged newtype variant wrapping a
/// primitive (`Bool(bool)`, `Int(i64)`, ...), so the struct-style
/// `#[serde(tag = "type")]` representation used elsewhere in the IR
/// doesn't apply here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TagValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    Time(i64),
    Str(String),
    Timer(TimerInstance),
    Counter(CounterInstance),
    Latch(LatchInstance),
}

impl Default for TagValue {
    fn default() -> Self {
        TagValue::Bool(false)
    }
}

impl TagValue {
    /// `to_bool`: bool as-is; number non-zero -> true; non-empty string ->
    /// true; otherwise false. Structured (timer/counter/latch) values are
    /// opaque to the evaluator and coerce to false.
    pub fn to_bool(&self) -> bool {
        match self {
            TagValue::Bool(b) => *b,
            TagValue::Int(n) => *n != 0,
            TagValue::Real(n) => *n != 0.0,
            TagValue::Time(n) => *n != 0,
            TagValue::Str(s) => !s.is_empty(),
            TagValue::Timer(_) | TagValue::Counter(_) | TagValue::Latch(_) => false,
        }
    }

    /// `to_number`: number as-is; bool -> 1/0; numeric string parsed, else
    /// 0; structured values coerce to 0.
    pub fn to_number(&self) -> f64 {
        match self {
            TagValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            TagValue::Int(n) => *n as f64,
            TagValue::Real(n) => *n,
            TagValue::Time(n) => *n as f64,
            TagValue::Str(s) => s.parse::<f64>().unwrap_or(0.0),
            TagValue::Timer(_) | TagValue::Counter(_) | TagValue::Latch(_) => 0.0,
        }
    }
}
