/*!
compiler/lower.rs - LADCompiler: lowers a `LadProgram` into an IR
`Program`.

Lowering rules (spec.md §4.5)
==============================
- Each rung compiles to exactly one `assignment`, target = the coil's
  operand. The coil's `coil_type` is carried as a non-semantic
  `CoilHint` (runtime treats it as plain assignment).
- Elements before the coil compose left-to-right with `AND`: the first
  element's expression is the leftmost operand; each subsequent element
  is ANDed on the right, producing a left-leaning tree.
- `NO` -> operand, no edge. `NC` -> `NOT(operand)`. `P` -> operand with
  rising edge. `N` -> operand with falling edge.
- A branch of N >= 1 parallel paths lowers each path with the series
  rule above, then combines paths left-to-right with `OR`. A
  single-path branch is equivalent to its one path. An empty path is
  the literal `true`.
- A rung with no elements before the coil compiles to `target := true`.
- A rung with no coil is a compile error.

Diagnostics are reported per rung id; compilation fails fast on the
first error, as spec.md requires.
*/

use crate::error::{PlcError, PlcResult};
use crate::ir::{Expression, Network as IrNetwork, ObKind, OrganizationBlock, Program, Statement};

use super::lad::{operand_ref, CoilType, ContactType, LadElement, LadProgram};

pub struct LadCompiler;

impl LadCompiler {
    /// Compile a `LadProgram` into an IR `Program` whose single cyclic OB
    /// holds the networks in declaration order.
    pub fn compile(program: &LadProgram) -> PlcResult<Program> {
        let mut networks = Vec::with_capacity(program.networks.len());
        for (net_idx, network) in program.networks.iter().enumerate() {
            let net_id = if network.id.is_empty() {
                format!("net{net_idx}")
            } else {
                network.id.clone()
            };
            let mut statements = Vec::with_capacity(network.rungs.len());
            for (rung_idx, rung) in network.rungs.iter().enumerate() {
                let rung_id = if rung.id.is_empty() {
                    format!("{net_id}_rung{rung_idx}")
                } else {
                    rung.id.clone()
                };
                statements.push(Self::lower_rung(&rung_id, &rung.elements)?);
            }
            networks.push(IrNetwork {
                id: net_id,
                title: String::new(),
                comment: String::new(),
                statements,
            });
        }

        Ok(Program {
            version: program.version.clone(),
            organization_blocks: vec![OrganizationBlock {
                id: "ob_cyclic".to_string(),
                name: "Main".to_string(),
                kind: ObKind::Cyclic,
                networks,
            }],
            functions: Vec::new(),
            function_blocks: Vec::new(),
        })
    }

    /// Lower one rung into a single `assignment` statement.
    fn lower_rung(rung_id: &str, elements: &[LadElement]) -> PlcResult<Statement> {
        let coil_pos = elements
            .iter()
            .position(|e| matches!(e, LadElement::Coil { .. }));

        let Some(coil_pos) = coil_pos else {
            return Err(PlcError::validation(format!(
                "rung {rung_id}: no coil element"
            )));
        };

        let (coil_type, coil_operand) = match &elements[coil_pos] {
            LadElement::Coil { coil_type, operand } => (*coil_type, operand.clone()),
            _ => unreachable!(),
        };

        let condition = Self::lower_series(&elements[..coil_pos], rung_id)?;

        Ok(Statement::Assignment {
            id: rung_id.to_string(),
            target: operand_ref(&coil_operand),
            expr: condition,
            coil_hint: Some(match coil_type {
                CoilType::Output => crate::ir::CoilHint::Output,
                CoilType::Set => crate::ir::CoilHint::Set,
                CoilType::Reset => crate::ir::CoilHint::Reset,
            }),
        })
    }

    /// Lower a series of elements (a rung's body, or one branch path)
    /// into a left-leaning `AND` tree. An empty series is `true`.
    fn lower_series(elements: &[LadElement], rung_id: &str) -> PlcResult<Expression> {
        let mut iter = elements.iter();
        let Some(first) = iter.next() else {
            return Ok(Expression::literal_bool(true));
        };
        let mut acc = Self::lower_element(first, rung_id)?;
        for element in iter {
            let next = Self::lower_element(element, rung_id)?;
            acc = Expression::and(acc, next);
        }
        Ok(acc)
    }

    fn lower_element(element: &LadElement, rung_id: &str) -> PlcResult<Expression> {
        match element {
            LadElement::Contact {
                contact_type,
                operand,
            } => {
                let op_ref = operand_ref(operand);
                Ok(match contact_type {
                    ContactType::No => Expression::operand(op_ref),
                    ContactType::Nc => Expression::not(Expression::operand(op_ref)),
                    ContactType::P => {
                        Expression::operand(op_ref.with_edge(crate::ir::EdgeKind::Rising))
                    }
                    ContactType::N => {
                        Expression::operand(op_ref.with_edge(crate::ir::EdgeKind::Falling))
                    }
                })
            }
            LadElement::Branch { branches } => {
                if branches.is_empty() {
                    return Err(PlcError::validation(format!(
                        "rung {rung_id}: branch with no paths"
                    )));
                }
                let mut paths = branches
                    .iter()
                    .map(|path| Self::lower_series(path, rung_id));
                let mut acc = paths.next().unwrap()?;
                for path in paths {
                    acc = Expression::or(acc, path?);
                }
                Ok(acc)
            }
            LadElement::Coil { .. } => Err(PlcError::validation(format!(
                "rung {rung_id}: coil element not allowed inside a branch path"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lad::{LadNetwork, LadRung};

    fn ladprogram(rungs: Vec<LadRung>) -> LadProgram {
        LadProgram {
            version: "1.0".to_string(),
            networks: vec![LadNetwork {
                id: "n1".to_string(),
                rungs,
            }],
        }
    }

    fn contact(contact_type: ContactType, operand: &str) -> LadElement {
        LadElement::Contact {
            contact_type,
            operand: operand.to_string(),
        }
    }

    fn coil(operand: &str) -> LadElement {
        LadElement::Coil {
            coil_type: CoilType::Output,
            operand: operand.to_string(),
        }
    }

    #[test]
    fn single_no_contact_lowers_to_operand_assignment() {
        let program = ladprogram(vec![LadRung {
            id: "r1".to_string(),
            elements: vec![contact(ContactType::No, "start_button"), coil("motor_output")],
        }]);
        let ir = LadCompiler::compile(&program).unwrap();
        let stmt = &ir.organization_blocks[0].networks[0].statements[0];
        match stmt {
            Statement::Assignment { target, expr, .. } => {
                assert_eq!(target.tag.as_deref(), Some("motor_output"));
                assert!(matches!(expr, Expression::Operand(op) if op.tag.as_deref() == Some("start_button")));
            }
            _ => panic!("expected assignment"),
        }
    }

    #[test]
    fn series_contacts_fold_left_leaning_and() {
        let program = ladprogram(vec![LadRung {
            id: "r1".to_string(),
            elements: vec![
                contact(ContactType::No, "a"),
                contact(ContactType::No, "b"),
                coil("out"),
            ],
        }]);
        let ir = LadCompiler::compile(&program).unwrap();
        match &ir.organization_blocks[0].networks[0].statements[0] {
            Statement::Assignment { expr, .. } => match expr {
                Expression::Binary { op, lhs, .. } => {
                    assert_eq!(*op, crate::ir::BinaryOp::And);
                    assert!(matches!(**lhs, Expression::Operand(_)));
                }
                _ => panic!("expected AND"),
            },
            _ => panic!("expected assignment"),
        }
    }

    #[test]
    fn branch_combines_paths_with_or() {
        let program = ladprogram(vec![LadRung {
            id: "r1".to_string(),
            elements: vec![
                LadElement::Branch {
                    branches: vec![
                        vec![contact(ContactType::No, "start_button")],
                        vec![contact(ContactType::No, "seal_contact")],
                    ],
                },
                coil("motor_output"),
            ],
        }]);
        let ir = LadCompiler::compile(&program).unwrap();
        match &ir.organization_blocks[0].networks[0].statements[0] {
            Statement::Assignment { expr, .. } => {
                assert!(matches!(expr, Expression::Binary { op, .. } if *op == crate::ir::BinaryOp::Or));
            }
            _ => panic!("expected assignment"),
        }
    }

    #[test]
    fn no_elements_before_coil_is_literal_true() {
        let program = ladprogram(vec![LadRung {
            id: "r1".to_string(),
            elements: vec![coil("always_on")],
        }]);
        let ir = LadCompiler::compile(&program).unwrap();
        match &ir.organization_blocks[0].networks[0].statements[0] {
            Statement::Assignment { expr, .. } => {
                assert!(matches!(expr, Expression::Literal(crate::ir::Literal::Bool(true))));
            }
            _ => panic!("expected assignment"),
        }
    }

    #[test]
    fn rung_without_coil_is_compile_error() {
        let program = ladprogram(vec![LadRung {
            id: "r1".to_string(),
            elements: vec![contact(ContactType::No, "a")],
        }]);
        let err = LadCompiler::compile(&program).unwrap_err();
        assert!(matches!(err, PlcError::Validation { .. }));
    }

    #[test]
    fn nc_contact_lowers_to_not() {
        let program = ladprogram(vec![LadRung {
            id: "r1".to_string(),
            elements: vec![contact(ContactType::Nc, "stop_button"), coil("out")],
        }]);
        let ir = LadCompiler::compile(&program).unwrap();
        match &ir.organization_blocks[0].networks[0].statements[0] {
            Statement::Assignment { expr, .. } => {
                assert!(matches!(expr, Expression::Unary { op, .. } if *op == crate::ir::UnaryOp::Not));
            }
            _ => panic!("expected assignment"),
        }
    }
}
