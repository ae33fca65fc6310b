use crate::core::common::types::{DataType, Schema, Tuple};
use crate::core::common::OxiexecError;
use crate::core::execution::eval::EvalNode;
use crate::core::execution::{BoxedOperator, ExecutionOperator, TableStats};
use std::sync::Arc;

/// Passes through the child tuples for which the predicate is true.
/// `NULL` counts as false.
pub struct FilterExec {
    /// The input operator that provides tuples.
    input: BoxedOperator,
    predicate: EvalNode,
    schema: Arc<Schema>,
    scratch: Tuple,
}

impl FilterExec {
    pub fn new(input: BoxedOperator, predicate: EvalNode) -> Result<Self, OxiexecError> {
        let ty = predicate.result_type();
        if ty != DataType::Boolean && ty != DataType::Null {
            return Err(OxiexecError::type_mismatch("Boolean", &ty, "filter predicate"));
        }
        let schema = input.get_output_schema();
        Ok(Self { input, predicate, schema, scratch: Tuple::new() })
    }
}

impl ExecutionOperator for FilterExec {
    fn next(&mut self) -> Result<Option<&Tuple>, OxiexecError> {
        while let Some(tuple) = self.input.next()? {
            if self.predicate.eval_bool(&self.schema, tuple)? {
                // Returning `tuple` itself from inside the loop does not borrow-check.
                self.scratch.clone_from(tuple);
                return Ok(Some(&self.scratch));
            }
        }
        Ok(None)
    }

    fn get_output_schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn rescan(&mut self) -> Result<(), OxiexecError> {
        self.input.rescan()
    }

    fn close(&mut self) -> Result<(), OxiexecError> {
        self.input.close()
    }

    fn input_stats(&self) -> TableStats {
        self.input.input_stats()
    }
}

#[cfg(test)]
mod tests;
