/*!
eval.rs - Expression evaluator.

Overview
========
A pure function from an expression tree plus `TagStore` state to a
`TagValue`, with one intentional side effect: reading an operand that
carries an edge marker updates the tag store's edge memory (spec.md
§4.2). No other operand read mutates anything.

Edge rule
=========
For an operand `op` with edge kind `k` resolving to tag `t`:
  1. `cur = to_bool(value_of(t))`.
  2. `prev = edge_memory(t, k)` (default false).
  3. `rising -> cur && !prev`; `falling -> !cur && prev`.
  4. Unconditionally set `edge_memory(t, k) = cur`.
Rising and falling memories for the same tag are independent (two
markers in one scan both fire/observe correctly, never merged).

Coercions
=========
`to_bool`/`to_number` live on `TagValue` (see value.rs). Comparisons
other than EQ/NE coerce both sides via `to_number`; EQ/NE use structural
equality. Binary operators always evaluate both sides (left before
right, no short-circuit), per spec.md §4.2.
*/

use crate::error::{PlcError, PlcResult};
use crate::ir::{BinaryOp, EdgeKind, Expression, Literal, Operand, UnaryOp};
use crate::tag_store::TagStore;
use crate::value::TagValue;

pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    /// Evaluate `expr` against `store`, attributing any error to
    /// `statement_id` for diagnostics.
    pub fn evaluate(
        store: &mut TagStore,
        expr: &Expression,
        statement_id: &str,
    ) -> PlcResult<TagValue> {
        match expr {
            Expression::Literal(lit) => Ok(lit.to_tag_value()),
            Expression::Operand(operand) => Self::evaluate_operand(store, operand, statement_id),
            Expression::Unary { op, expr } => {
                let v = Self::evaluate(store, expr, statement_id)?;
                Ok(match op {
                    UnaryOp::Not => TagValue::Bool(!v.to_bool()),
                    UnaryOp::Neg => TagValue::Real(-v.to_number()),
                })
            }
            Expression::Binary { op, lhs, rhs } => {
                // Both sides always evaluated, left before right.
                let left = Self::evaluate(store, lhs, statement_id)?;
                let right = Self::evaluate(store, rhs, statement_id)?;
                Self::apply_binary(*op, left, right, statement_id)
            }
            Expression::Call { name, .. } => Err(PlcError::UnsupportedCall {
                name: name.clone(),
                statement_id: statement_id.to_string(),
            }),
        }
    }

    fn evaluate_operand(
        store: &mut TagStore,
        operand: &Operand,
        statement_id: &str,
    ) -> PlcResult<TagValue> {
        let tag = operand.resolve().ok_or_else(|| PlcError::OperandUnresolved {
            statement_id: statement_id.to_string(),
        })?;
        let raw = store
            .read_pending_or_snapshot(&tag)
            .cloned()
            .unwrap_or(TagValue::Bool(false));

        match operand.edge {
            None => Ok(raw),
            Some(kind) => Ok(TagValue::Bool(Self::apply_edge(store, &tag, kind, &raw))),
        }
    }

    fn apply_edge(store: &mut TagStore, tag: &str, kind: EdgeKind, raw: &TagValue) -> bool {
        let cur = raw.to_bool();
        let prev = store.get_edge_memory(tag, kind);
        store.set_edge_memory(tag, kind, cur);
        match kind {
            EdgeKind::Rising => cur && !prev,
            EdgeKind::Falling => !cur && prev,
        }
    }

    fn apply_binary(
        op: BinaryOp,
        left: TagValue,
        right: TagValue,
        statement_id: &str,
    ) -> PlcResult<TagValue> {
        use BinaryOp::*;
        Ok(match op {
            And => TagValue::Bool(left.to_bool() && right.to_bool()),
            Or => TagValue::Bool(left.to_bool() || right.to_bool()),
            Xor => TagValue::Bool(left.to_bool() ^ right.to_bool()),
            Eq => TagValue::Bool(left == right),
            Ne => TagValue::Bool(left != right),
            Lt => TagValue::Bool(left.to_number() < right.to_number()),
            Gt => TagValue::Bool(left.to_number() > right.to_number()),
            Le => TagValue::Bool(left.to_number() <= right.to_number()),
            Ge => TagValue::Bool(left.to_number() >= right.to_number()),
            Add => TagValue::Real(left.to_number() + right.to_number()),
            Sub => TagValue::Real(left.to_number() - right.to_number()),
            Mul => TagValue::Real(left.to_number() * right.to_number()),
            Div => {
                let denom = right.to_number();
                if denom == 0.0 {
                    return Err(PlcError::DivisionByZero {
                        statement_id: statement_id.to_string(),
                    });
                }
                TagValue::Real(left.to_number() / denom)
            }
            Mod => {
                let denom = right.to_number();
                if denom == 0.0 {
                    return Err(PlcError::DivisionByZero {
                        statement_id: statement_id.to_string(),
                    });
                }
                TagValue::Real(left.to_number() % denom)
            }
        })
    }
}
