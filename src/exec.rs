/*!
exec.rs - Statement executor.

Overview
========
Executes one statement, writing every effect to the tag store's
`pending` layer (spec.md §4.3). `execute` is called in source order by
the runtime driver for every statement of every network, so within-scan
feedback and last-write-wins fall out of plain sequential execution
against `TagStore::write_pending`.

Dispatch
========
- Assignment: evaluate, write `pending[target]`.
- Call: resolve the instance tag's current value (constructing a fresh
  instance on first use is the instruction dispatcher's job, not this
  executor's), evaluate named inputs, invoke the primitive, write the
  instance and named outputs back to `pending`.
- If: evaluate `condition`, else each `elsif` in order, else `else`; at
  most one branch runs.
- Comment: no-op.

Errors propagate unchanged — this executor never catches evaluator or
instruction-dispatch errors (spec.md §4.3 "Failure").
*/

use crate::error::{PlcError, PlcResult};
use crate::eval::ExpressionEvaluator;
use crate::instructions;
use crate::ir::Statement;
use crate::tag_store::TagStore;

pub struct StatementExecutor;

impl StatementExecutor {
    /// Execute `statement` against `store`, using `now` (milliseconds) as
    /// the clock for any function-block call it contains.
    pub fn execute(store: &mut TagStore, statement: &Statement, now: i64) -> PlcResult<()> {
        match statement {
            Statement::Assignment {
                id, target, expr, ..
            } => {
                let value = ExpressionEvaluator::evaluate(store, expr, id)?;
                let tag = target.resolve().ok_or_else(|| PlcError::OperandUnresolved {
                    statement_id: id.clone(),
                })?;
                store.write_pending(tag, value);
                Ok(())
            }
            Statement::Call {
                id,
                function,
                instance,
                inputs,
                outputs,
            } => Self::execute_call(store, id, function, instance, inputs, outputs, now),
            Statement::If {
                id,
                condition,
                then_block,
                elsif_blocks,
                else_block,
            } => Self::execute_if(store, id, condition, then_block, elsif_blocks, else_block, now),
            Statement::Comment { .. } => Ok(()),
        }
    }

    fn execute_call(
        store: &mut TagStore,
        id: &str,
        function: &str,
        instance: &crate::ir::Operand,
        inputs: &std::collections::BTreeMap<String, crate::ir::Expression>,
        outputs: &std::collections::BTreeMap<String, crate::ir::Operand>,
        now: i64,
    ) -> PlcResult<()> {
        let instance_tag = instance
            .resolve()
            .ok_or_else(|| PlcError::OperandUnresolved {
                statement_id: id.to_string(),
            })?;
        let old = store.read_pending_or_snapshot(&instance_tag).cloned();

        let mut evaluated_inputs = std::collections::BTreeMap::new();
        for (name, expr) in inputs {
            let value = ExpressionEvaluator::evaluate(store, expr, id)?;
            evaluated_inputs.insert(name.clone(), value);
        }

        let (new_instance, computed_outputs) =
            instructions::call(function, old.as_ref(), &evaluated_inputs, now, id)?;

        store.write_pending(instance_tag, new_instance);

        for (name, operand) in outputs {
            if let Some(value) = computed_outputs.get(name) {
                let tag = operand.resolve().ok_or_else(|| PlcError::OperandUnresolved {
                    statement_id: id.to_string(),
                })?;
                store.write_pending(tag, value.clone());
            }
        }
        Ok(())
    }

    fn execute_if(
        store: &mut TagStore,
        id: &str,
        condition: &crate::ir::Expression,
        then_block: &[Statement],
        elsif_blocks: &[crate::ir::ElsifBlock],
        else_block: &Option<Vec<Statement>>,
        now: i64,
    ) -> PlcResult<()> {
        if ExpressionEvaluator::evaluate(store, condition, id)?.to_bool() {
            for s in then_block {
                Self::execute(store, s, now)?;
            }
            return Ok(());
        }
        for elsif in elsif_blocks {
            if ExpressionEvaluator::evaluate(store, &elsif.condition, id)?.to_bool() {
                for s in &elsif.block {
                    Self::execute(store, s, now)?;
                }
                return Ok(());
            }
        }
        if let Some(block) = else_block {
            for s in block {
                Self::execute(store, s, now)?;
            }
        }
        Ok(())
    }
}
