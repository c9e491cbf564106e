/*!
ir/stmt.rs - Statements, networks, organization blocks, and the program.

Overview
========
A `Statement` is one of `assignment`, `call`, `if`, or `comment`, each
carrying an `id` used for diagnostics and scan-error reporting. A
`Network` is an ordered sequence of statements; an `OrganizationBlock`
(OB) has a scheduling kind and an ordered list of networks; a `Program`
is a version string plus the OB list (plus reserved function/function-
block definition lists).
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::expr::{Expression, Operand};

/// The layout hint carried by a lowered coil (spec.md §4.5: "the coil's
/// type is conveyed as a layout hint; runtime treats OTE as plain
/// assignment"). Purely informational — never changes execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoilHint {
    Output,
    Set,
    Reset,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
    Assignment {
        id: String,
        target: Operand,
        expr: Expression,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        coil_hint: Option<CoilHint>,
    },
    Call {
        id: String,
        function: String,
        instance: Operand,
        #[serde(default)]
        inputs: BTreeMap<String, Expression>,
        #[serde(default)]
        outputs: BTreeMap<String, Operand>,
    },
    If {
        id: String,
        condition: Expression,
        then_block: Vec<Statement>,
        #[serde(default)]
        elsif_blocks: Vec<ElsifBlock>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        else_block: Option<Vec<Statement>>,
    },
    Comment { id: String, #[serde(default)] text: String },
}

impl Statement {
    pub fn id(&self) -> &str {
        match self {
            Statement::Assignment { id, .. } => id,
            Statement::Call { id, .. } => id,
            Statement::If { id, .. } => id,
            Statement::Comment { id, .. } => id,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElsifBlock {
    pub condition: Expression,
    pub block: Vec<Statement>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    pub statements: Vec<Statement>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObKind {
    Cyclic,
    Startup,
    Interrupt,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrganizationBlock {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ObKind,
    pub networks: Vec<Network>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Program {
    pub version: String,
    pub organization_blocks: Vec<OrganizationBlock>,
    /// Reserved.
    #[serde(default)]
    pub functions: Vec<serde_json::Value>,
    /// Reserved.
    #[serde(default)]
    pub function_blocks: Vec<serde_json::Value>,
}

impl Program {
    /// The cyclic OBs in declaration order (a program may name more than
    /// one; the driver iterates all of them, see `runtime::Runtime::scan`).
    pub fn cyclic_obs(&self) -> impl Iterator<Item = &OrganizationBlock> {
        self.organization_blocks
            .iter()
            .filter(|ob| ob.kind == ObKind::Cyclic)
    }
}
