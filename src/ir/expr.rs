/*!
ir/expr.rs - Operand references and the expression tree.

Overview
========
`Operand` resolves to exactly one of `{tag, address}`, with an optional
member path (reserved for struct access, not yet interpreted) and an
optional edge marker. `Expression` is a discriminated, arbitrarily deep,
acyclic tree: operand reference, literal, unary, binary, and a reserved
`Call` arm that the evaluator rejects with `UnsupportedCall`.

JSON shape mirrors spec.md §6: `expr_type` discriminates the variant.
*/

use serde::{Deserialize, Serialize};

use crate::tag_store::{address_to_tag_id, TagId};
use crate::value::TagValue;

/// Rising/falling transition detection marker on an operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Rising,
    Falling,
}

/// A reference to a tag or physical address, resolved at evaluation time.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Operand {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    /// Reserved for struct member access; not yet interpreted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub member_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub edge: Option<EdgeKind>,
}

impl Operand {
    pub fn tag(tag: impl Into<String>) -> Self {
        Operand {
            tag: Some(tag.into()),
            address: None,
            member_path: None,
            edge: None,
        }
    }

    pub fn address(address: impl Into<String>) -> Self {
        Operand {
            tag: None,
            address: Some(address.into()),
            member_path: None,
            edge: None,
        }
    }

    pub fn with_edge(mut self, edge: EdgeKind) -> Self {
        self.edge = Some(edge);
        self
    }

    /// Resolve to the canonical tag id, preferring `tag` over `address`.
    /// `None` means neither field was set — an `OperandUnresolved`
    /// condition the caller must report.
    pub fn resolve(&self) -> Option<TagId> {
        if let Some(t) = &self.tag {
            Some(t.clone())
        } else {
            self.address.as_deref().map(address_to_tag_id)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// A literal value carried directly in the expression tree.
///
/// Adjacently tagged (`data_type` + `value`): serde cannot serialize an
/// internally tagged newtype variant over a primitive, which every arm
/// here is.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "data_type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Literal {
    pub fn to_tag_value(&self) -> TagValue {
        match self {
            Literal::Bool(b) => TagValue::Bool(*b),
            Literal::Number(n) => TagValue::Real(*n),
            Literal::String(s) => TagValue::Str(s.clone()),
        }
    }
}

/// The expression tree. Recursive arms are boxed; no deferred-schema
/// trick is needed in a strictly typed representation (spec.md §9).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "expr_type", rename_all = "snake_case")]
pub enum Expression {
    Operand(Operand),
    Literal(Literal),
    Unary {
        op: UnaryOp,
        expr: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    /// Reserved; evaluator fails with `UnsupportedCall`.
    Call {
        name: String,
        #[serde(default)]
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn operand(operand: Operand) -> Self {
        Expression::Operand(operand)
    }

    pub fn literal_bool(value: bool) -> Self {
        Expression::Literal(Literal::Bool(value))
    }

    pub fn and(lhs: Expression, rhs: Expression) -> Self {
        Expression::Binary {
            op: BinaryOp::And,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn or(lhs: Expression, rhs: Expression) -> Self {
        Expression::Binary {
            op: BinaryOp::Or,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn not(expr: Expression) -> Self {
        Expression::Unary {
            op: UnaryOp::Not,
            expr: Box::new(expr),
        }
    }
}
