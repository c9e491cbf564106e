/*!
ir/validate.rs - Static validation of a loaded `Program`.

Overview
========
Deserialization already rejects unknown discriminators (serde's tagged
enums fail closed — an unrecognized `expr_type`/`type`/OB `type` simply
does not deserialize). This module adds the checks that are *syntactic*
but not representable in the type system:

  - Tag name syntax: `[A-Za-z][A-Za-z0-9_]*`.
  - Physical address syntax: `%[IQMDB]<byte>.<bit>`.
  - Operand resolvability: an operand with neither `tag` nor `address`
    is an `OperandUnresolved` condition, reported here as a
    `ValidationError` per spec.md §7 ("treated as ValidationError when
    detected statically").

Validation walks every operand reachable from every statement in every
network of every organization block, failing on the first problem found
(compiler diagnostics are reported per statement id, fail-fast).
*/

use crate::error::{PlcError, PlcResult};
use crate::ir::expr::{Expression, Operand};
use crate::ir::stmt::{Program, Statement};

/// Validate a tag name against `[A-Za-z][A-Za-z0-9_]*`.
pub fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a physical address against `%[IQMDB]<byte>.<bit>`.
pub fn is_valid_address(address: &str) -> bool {
    let Some(rest) = address.strip_prefix('%') else {
        return false;
    };
    let mut chars = rest.chars();
    match chars.next() {
        Some('I') | Some('Q') | Some('M') | Some('D') | Some('B') => {}
        _ => return false,
    }
    let remainder: String = chars.collect();
    let Some((byte_part, bit_part)) = remainder.split_once('.') else {
        return false;
    };
    !byte_part.is_empty()
        && !bit_part.is_empty()
        && byte_part.chars().all(|c| c.is_ascii_digit())
        && bit_part.chars().all(|c| c.is_ascii_digit())
}

fn validate_operand(operand: &Operand, statement_id: &str) -> PlcResult<()> {
    match (&operand.tag, &operand.address) {
        (None, None) => Err(PlcError::OperandUnresolved {
            statement_id: statement_id.to_string(),
        }),
        (Some(tag), _) if !is_valid_tag_name(tag) => Err(PlcError::validation(format!(
            "statement {statement_id}: invalid tag name {tag:?}"
        ))),
        (_, Some(addr)) if !is_valid_address(addr) => Err(PlcError::validation(format!(
            "statement {statement_id}: invalid address {addr:?}"
        ))),
        _ => Ok(()),
    }
}

fn validate_expression(expr: &Expression, statement_id: &str) -> PlcResult<()> {
    match expr {
        Expression::Operand(op) => validate_operand(op, statement_id),
        Expression::Literal(_) => Ok(()),
        Expression::Unary { expr, .. } => validate_expression(expr, statement_id),
        Expression::Binary { lhs, rhs, .. } => {
            validate_expression(lhs, statement_id)?;
            validate_expression(rhs, statement_id)
        }
        Expression::Call { args, .. } => {
            for arg in args {
                validate_expression(arg, statement_id)?;
            }
            Ok(())
        }
    }
}

fn validate_statement(statement: &Statement) -> PlcResult<()> {
    match statement {
        Statement::Assignment {
            id, target, expr, ..
        } => {
            validate_operand(target, id)?;
            validate_expression(expr, id)
        }
        Statement::Call {
            id,
            instance,
            inputs,
            outputs,
            ..
        } => {
            validate_operand(instance, id)?;
            for expr in inputs.values() {
                validate_expression(expr, id)?;
            }
            for operand in outputs.values() {
                validate_operand(operand, id)?;
            }
            Ok(())
        }
        Statement::If {
            id,
            condition,
            then_block,
            elsif_blocks,
            else_block,
        } => {
            validate_expression(condition, id)?;
            for s in then_block {
                validate_statement(s)?;
            }
            for elsif in elsif_blocks {
                validate_expression(&elsif.condition, id)?;
                for s in &elsif.block {
                    validate_statement(s)?;
                }
            }
            if let Some(block) = else_block {
                for s in block {
                    validate_statement(s)?;
                }
            }
            Ok(())
        }
        Statement::Comment { .. } => Ok(()),
    }
}

/// Validate every operand reachable from `program`. Returns the first
/// error found (fail-fast, per spec.md §4.5).
pub fn validate_program(program: &Program) -> PlcResult<()> {
    for ob in &program.organization_blocks {
        for network in &ob.networks {
            for statement in &network.statements {
                validate_statement(statement)?;
            }
        }
    }
    Ok(())
}
