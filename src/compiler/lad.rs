/*!
compiler/lad.rs - LAD (ladder diagram) JSON wire format.

Overview
========
Mirrors spec.md §6: a `LADProgram` has a version and an ordered list of
networks; each network has an ordered list of rungs; each rung has an
ordered list of elements. Elements discriminate on `type` into
`contact`, `coil`, and `branch`.

Operand strings may be either a plain tag name or a physical address
(`%I0.0`); `LadOperandRef::resolve` (used by the lowering pass) decides
which by checking for the leading `%`.
*/

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContactType {
    No,
    Nc,
    P,
    N,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoilType {
    Output,
    Set,
    Reset,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LadElement {
    Contact {
        contact_type: ContactType,
        operand: String,
    },
    Coil {
        coil_type: CoilType,
        operand: String,
    },
    Branch {
        branches: Vec<Vec<LadElement>>,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LadRung {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub elements: Vec<LadElement>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LadNetwork {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub rungs: Vec<LadRung>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LadProgram {
    pub version: String,
    #[serde(default)]
    pub networks: Vec<LadNetwork>,
}

/// Build an IR `Operand` from a LAD operand string, treating a leading
/// `%` as a physical address and anything else as a plain tag name.
pub(crate) fn operand_ref(raw: &str) -> crate::ir::Operand {
    if raw.starts_with('%') {
        crate::ir::Operand::address(raw)
    } else {
        crate::ir::Operand::tag(raw)
    }
}
