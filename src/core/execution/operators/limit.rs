use crate::core::common::types::{Schema, Tuple};
use crate::core::common::OxiexecError;
use crate::core::execution::{BoxedOperator, ExecutionOperator, TableStats};
use std::sync::Arc;

/// Emits at most `limit` tuples of its child, then reports end of stream
/// without pulling the child again.
pub struct LimitExec {
    input: BoxedOperator,
    limit: u64,
    emitted: u64,
}

impl LimitExec {
    pub fn new(input: BoxedOperator, limit: u64) -> Self {
        Self { input, limit, emitted: 0 }
    }
}

impl ExecutionOperator for LimitExec {
    fn next(&mut self) -> Result<Option<&Tuple>, OxiexecError> {
        if self.emitted >= self.limit {
            return Ok(None);
        }
        let tuple = self.input.next()?;
        if tuple.is_some() {
            self.emitted += 1;
        }
        Ok(tuple)
    }

    fn get_output_schema(&self) -> Arc<Schema> {
        self.input.get_output_schema()
    }

    fn rescan(&mut self) -> Result<(), OxiexecError> {
        self.emitted = 0;
        self.input.rescan()
    }

    fn close(&mut self) -> Result<(), OxiexecError> {
        self.input.close()
    }

    fn input_stats(&self) -> TableStats {
        self.input.input_stats()
    }
}
